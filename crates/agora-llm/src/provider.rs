//! Streaming generator trait and common types

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from a generation backend.
///
/// A transport failure covers the whole call, whether it happens before
/// the first fragment or mid-sequence; malformed individual records are a
/// backend-internal concern and never surface here.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
}

/// Sampling options for one generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Sampling temperature
    pub temperature: f32,
    /// Top-k sampling parameter
    pub top_k: u32,
    /// Stop sequences; the debate engine passes exactly one, the opposing
    /// agent's name followed by `":"`
    pub stop: Vec<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_k: 40,
            stop: Vec::new(),
        }
    }
}

/// One generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier
    pub model: String,
    /// Full composed prompt
    pub prompt: String,
    /// Sampling options
    pub options: GenerateOptions,
}

impl GenerateRequest {
    /// Request with default sampling options
    pub fn new(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            prompt: prompt.to_string(),
            options: GenerateOptions::default(),
        }
    }

    /// Attach sampling options
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }
}

/// A finite, non-restartable sequence of text fragments.
///
/// An `Err` item means the call failed mid-sequence; the stream ends
/// after it.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, TransportError>> + Send>>;

/// Contract consumed by the debate engine
#[async_trait]
pub trait StreamingGenerator: Send + Sync {
    /// Backend name for logs and status output
    fn name(&self) -> &str;

    /// Connectivity probe; `false` means a debate must not start
    async fn is_available(&self) -> bool;

    /// Discover the models the backend serves
    async fn list_models(&self) -> Result<Vec<String>, TransportError>;

    /// Start one generation call, yielding fragments lazily
    async fn generate(&self, request: GenerateRequest) -> Result<FragmentStream, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_options() {
        let request = GenerateRequest::new("llama3", "hi").with_options(GenerateOptions {
            temperature: 0.5,
            top_k: 20,
            stop: vec!["Farmer:".to_string()],
        });
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3");
        assert_eq!(json["options"]["top_k"], 20);
        assert_eq!(json["options"]["stop"][0], "Farmer:");
    }
}
