//! # Agora Engine
//!
//! The debate orchestration engine: a [`DebateController`] drives one
//! turn at a time against a [`agora_llm::StreamingGenerator`], aggregating
//! streamed fragments into the shared transcript and emitting status and
//! snapshot events for the presentation layer.
//!
//! Concurrency model: one driving task per session. `stop` is a single
//! atomic flag checked after every fragment; `reset` is a hard interrupt
//! guarded by an epoch counter so an in-flight turn can never write into a
//! freshly cleared transcript.
//!
//! ```rust
//! use std::sync::Arc;
//! use agora_core::{AgentPair, AgentProfile, AgentSlot};
//! use agora_engine::{DebateConfig, DebateController};
//! use agora_llm::MockGenerator;
//!
//! #[tokio::main]
//! async fn main() {
//!     let agents = AgentPair::new(
//!         AgentProfile::for_slot(AgentSlot::First, "Optimist", "Argue for.", "mock"),
//!         AgentProfile::for_slot(AgentSlot::Second, "Skeptic", "Argue against.", "mock"),
//!     );
//!     let config = DebateConfig::new("Rust is fun", "Keep it short.", agents);
//!     let controller =
//!         DebateController::with_seed(Arc::new(MockGenerator::constant("Indeed.")), config, 7);
//!     // with an instant mock the loop runs straight to the message cap
//!     let outcome = controller.run().await.unwrap();
//!     assert_eq!(outcome, agora_engine::RunOutcome::LimitReached);
//! }
//! ```

pub mod aggregator;
pub mod controller;
pub mod events;
pub mod session;

pub use aggregator::{ResponseAggregator, TurnAborted, ERROR_SENTINEL};
pub use controller::{DebateConfig, DebateController, RunOutcome, StartError};
pub use events::{DebateEvent, DebateStatus};
pub use session::DebateSession;
