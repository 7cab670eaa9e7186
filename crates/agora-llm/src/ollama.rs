//! Ollama streaming backend
//!
//! Talks to an Ollama server over its HTTP API: `GET /api/tags` for the
//! connectivity probe and model discovery, `POST /api/generate` with
//! `stream: true` for generation. The response body is newline-delimited
//! JSON; each record may carry a `response` text fragment, and a record
//! flagged `done` ends the sequence. Unparseable records are skipped, not
//! fatal.

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::OllamaConfig;
use crate::provider::{FragmentStream, GenerateRequest, StreamingGenerator, TransportError};

/// `POST /api/generate` request body
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions<'a>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions<'a> {
    temperature: f32,
    top_k: u32,
    stop: &'a [String],
}

/// One NDJSON record from the generate stream
#[derive(Debug, Deserialize)]
struct OllamaChunk {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    done: bool,
}

/// `GET /api/tags` response body
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Outcome of parsing one stream record
#[derive(Debug, PartialEq, Eq)]
enum Record {
    /// A text fragment to append
    Fragment(String),
    /// End of the sequence; the final record may still carry a fragment
    Done(Option<String>),
    /// Blank, malformed or fragment-free record
    Skip,
}

/// Parse one newline-delimited record from the generate stream.
///
/// Malformed lines are skipped with a warning rather than failing the
/// sequence.
fn parse_record(line: &[u8]) -> Record {
    let line = match std::str::from_utf8(line) {
        Ok(s) => s.trim(),
        Err(_) => {
            warn!("skipping non-utf8 record in generate stream");
            return Record::Skip;
        }
    };
    if line.is_empty() {
        return Record::Skip;
    }
    match serde_json::from_str::<OllamaChunk>(line) {
        Ok(chunk) => {
            let fragment = chunk.response.filter(|text| !text.is_empty());
            if chunk.done {
                Record::Done(fragment)
            } else {
                match fragment {
                    Some(text) => Record::Fragment(text),
                    None => Record::Skip,
                }
            }
        }
        Err(err) => {
            warn!(error = %err, "skipping malformed record in generate stream");
            Record::Skip
        }
    }
}

/// Ollama client implementing [`StreamingGenerator`]
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Client with explicit configuration
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Client for a base URL with default timeouts
    pub fn with_url(base_url: &str) -> Self {
        Self::new(OllamaConfig::with_url(base_url))
    }

    /// Client configured from the environment (`OLLAMA_URL`)
    pub fn from_env() -> Self {
        Self::new(OllamaConfig::from_env())
    }

    /// The configured base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn classify(err: reqwest::Error) -> TransportError {
        if err.is_connect() || err.is_timeout() {
            TransportError::ConnectionFailed(err.to_string())
        } else {
            TransportError::RequestFailed(err.to_string())
        }
    }
}

#[async_trait]
impl StreamingGenerator for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.config.base_url);
        match self
            .client
            .get(&url)
            .timeout(self.config.probe_timeout())
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!(error = %err, url, "ollama probe failed");
                false
            }
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, TransportError> {
        let url = format!("{}/api/tags", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.config.probe_timeout())
            .send()
            .await
            .map_err(Self::classify)?;
        if !response.status().is_success() {
            return Err(TransportError::RequestFailed(format!(
                "status {}",
                response.status()
            )));
        }
        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn generate(&self, request: GenerateRequest) -> Result<FragmentStream, TransportError> {
        let url = format!("{}/api/generate", self.config.base_url);
        let body = OllamaGenerateRequest {
            model: &request.model,
            prompt: &request.prompt,
            stream: true,
            options: OllamaOptions {
                temperature: request.options.temperature,
                top_k: request.options.top_k,
                stop: &request.options.stop,
            },
        };

        debug!(model = %request.model, prompt_chars = request.prompt.len(), "starting generation");
        let response = self
            .client
            .post(&url)
            .timeout(self.config.request_timeout())
            .json(&body)
            .send()
            .await
            .map_err(Self::classify)?;
        if !response.status().is_success() {
            return Err(TransportError::RequestFailed(format!(
                "status {}",
                response.status()
            )));
        }

        let mut bytes = Box::pin(response.bytes_stream());
        let stream = async_stream::stream! {
            let mut buffer: Vec<u8> = Vec::new();
            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(err) => {
                        yield Err(TransportError::RequestFailed(err.to_string()));
                        return;
                    }
                };
                buffer.extend_from_slice(&chunk);
                while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    match parse_record(&line[..line.len() - 1]) {
                        Record::Fragment(text) => yield Ok(text),
                        Record::Done(last) => {
                            if let Some(text) = last {
                                yield Ok(text);
                            }
                            return;
                        }
                        Record::Skip => {}
                    }
                }
            }
            // transport may end the stream without a done record
            match parse_record(&buffer) {
                Record::Fragment(text) | Record::Done(Some(text)) => yield Ok(text),
                _ => {}
            }
        };
        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment_record() {
        assert_eq!(
            parse_record(br#"{"response": "Hel", "done": false}"#),
            Record::Fragment("Hel".to_string())
        );
    }

    #[test]
    fn test_parse_done_record() {
        assert_eq!(
            parse_record(br#"{"response": "", "done": true}"#),
            Record::Done(None)
        );
        assert_eq!(parse_record(br#"{"done": true}"#), Record::Done(None));
    }

    #[test]
    fn test_final_record_keeps_its_fragment() {
        assert_eq!(
            parse_record(br#"{"response": " end", "done": true}"#),
            Record::Done(Some(" end".to_string()))
        );
    }

    #[test]
    fn test_malformed_record_is_skipped() {
        assert_eq!(parse_record(b"not json at all"), Record::Skip);
        assert_eq!(parse_record(b"{\"response\": 42}"), Record::Skip);
    }

    #[test]
    fn test_blank_and_fragment_free_records_are_skipped() {
        assert_eq!(parse_record(b""), Record::Skip);
        assert_eq!(parse_record(b"   "), Record::Skip);
        assert_eq!(parse_record(br#"{"context": [1,2,3]}"#), Record::Skip);
        assert_eq!(parse_record(br#"{"response": ""}"#), Record::Skip);
    }

    #[tokio::test]
    #[ignore] // requires an Ollama server running locally
    async fn test_live_probe_and_models() {
        let client = OllamaClient::from_env();
        if client.is_available().await {
            let models = client.list_models().await.unwrap();
            assert!(!models.is_empty());
        }
    }
}
