//! # Agora LLM
//!
//! Streaming generation backends for Agora debates.
//!
//! The debate engine consumes one contract, [`StreamingGenerator`]: a
//! connectivity probe, model discovery, and a `generate` call producing a
//! finite stream of text fragments. Two implementations ship here:
//!
//! | Backend | Type | Use |
//! |---------|------|-----|
//! | Ollama  | Local HTTP | Production |
//! | Mock    | In-process | Testing |
//!
//! ## Quick start
//!
//! ```rust
//! use agora_llm::{MockGenerator, StreamingGenerator, GenerateRequest};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() {
//!     let llm = MockGenerator::constant("Hello world");
//!     let mut stream = llm
//!         .generate(GenerateRequest::new("mock", "say hello"))
//!         .await
//!         .unwrap();
//!     while let Some(fragment) = stream.next().await {
//!         print!("{}", fragment.unwrap());
//!     }
//! }
//! ```

pub mod config;
pub mod mock;
pub mod ollama;
pub mod provider;

pub use config::OllamaConfig;
pub use mock::{MockGenerator, ScriptedTurn};
pub use ollama::OllamaClient;
pub use provider::{
    FragmentStream, GenerateOptions, GenerateRequest, StreamingGenerator, TransportError,
};
