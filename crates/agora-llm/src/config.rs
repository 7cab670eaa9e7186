//! Backend configuration
//!
//! Environment-driven settings for the Ollama client.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default Ollama endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Configuration for the Ollama backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL (env: OLLAMA_URL)
    pub base_url: String,
    /// Timeout for the connectivity probe and model discovery, seconds
    pub probe_timeout_secs: u64,
    /// Timeout for a whole generation call, seconds
    pub request_timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            probe_timeout_secs: 5,
            request_timeout_secs: 300,
        }
    }
}

impl OllamaConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string()),
            ..Self::default()
        }
    }

    /// Configuration for an explicit base URL, trailing slash trimmed
    pub fn with_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Probe timeout as a [`Duration`]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Generation call timeout as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OllamaConfig::default();
        assert_eq!(config.base_url, DEFAULT_OLLAMA_URL);
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.request_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_with_url_trims_trailing_slash() {
        let config = OllamaConfig::with_url("http://10.0.0.2:11434/");
        assert_eq!(config.base_url, "http://10.0.0.2:11434");
    }
}
