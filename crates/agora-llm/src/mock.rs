//! Mock generator for testing
//!
//! Scriptable per-turn behavior without network access: each call to
//! `generate` consumes the next [`ScriptedTurn`], cycling once the script
//! runs out. Turns can stream fragments, fail before the first fragment,
//! or fail mid-sequence, which covers the whole transport error surface
//! the engine has to handle.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::provider::{FragmentStream, GenerateRequest, StreamingGenerator, TransportError};

/// Scripted behavior for one generation call
#[derive(Debug, Clone)]
pub enum ScriptedTurn {
    /// Stream these fragments, then end normally
    Fragments(Vec<String>),
    /// Fail the call before yielding anything
    FailBefore,
    /// Stream these fragments, then fail mid-sequence
    FailAfter(Vec<String>),
}

impl ScriptedTurn {
    /// Fragment turn from string slices
    pub fn fragments<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fragments(parts.into_iter().map(Into::into).collect())
    }
}

/// A mock [`StreamingGenerator`] driven by a script
#[derive(Debug)]
pub struct MockGenerator {
    name: String,
    turns: Vec<ScriptedTurn>,
    index: AtomicUsize,
    available: AtomicBool,
    /// Every request received, in call order
    requests: Mutex<Vec<GenerateRequest>>,
    /// Simulated per-fragment latency
    fragment_delay: Duration,
}

impl MockGenerator {
    /// Generator cycling through the given turns
    pub fn scripted(turns: Vec<ScriptedTurn>) -> Self {
        Self {
            name: "mock".to_string(),
            turns,
            index: AtomicUsize::new(0),
            available: AtomicBool::new(true),
            requests: Mutex::new(Vec::new()),
            fragment_delay: Duration::ZERO,
        }
    }

    /// Generator that always streams the same text as a single fragment
    pub fn constant(text: &str) -> Self {
        Self::scripted(vec![ScriptedTurn::fragments([text])])
    }

    /// Add simulated latency before each fragment
    pub fn with_fragment_delay(mut self, delay: Duration) -> Self {
        self.fragment_delay = delay;
        self
    }

    /// Toggle the availability probe
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// How many generation calls have been made
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    /// The requests received so far, in call order
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_turn(&self) -> Option<ScriptedTurn> {
        if self.turns.is_empty() {
            return None;
        }
        let idx = self.index.fetch_add(1, Ordering::SeqCst);
        Some(self.turns[idx % self.turns.len()].clone())
    }

    fn fragment_stream(&self, fragments: Vec<String>, fail_after: bool) -> FragmentStream {
        let delay = self.fragment_delay;
        Box::pin(async_stream::stream! {
            for fragment in fragments {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                yield Ok(fragment);
            }
            if fail_after {
                yield Err(TransportError::RequestFailed(
                    "scripted mid-stream failure".to_string(),
                ));
            }
        })
    }
}

#[async_trait]
impl StreamingGenerator for MockGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn list_models(&self) -> Result<Vec<String>, TransportError> {
        Ok(vec!["mock".to_string()])
    }

    async fn generate(&self, request: GenerateRequest) -> Result<FragmentStream, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        match self.next_turn() {
            None => Ok(self.fragment_stream(Vec::new(), false)),
            Some(ScriptedTurn::Fragments(fragments)) => Ok(self.fragment_stream(fragments, false)),
            Some(ScriptedTurn::FailAfter(fragments)) => Ok(self.fragment_stream(fragments, true)),
            Some(ScriptedTurn::FailBefore) => Err(TransportError::ConnectionFailed(
                "scripted pre-stream failure".to_string(),
            )),
        }
    }
}
