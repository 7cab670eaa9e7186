//! Per-turn response aggregation
//!
//! A [`ResponseAggregator`] drives one turn's transcript entry: it appends
//! the placeholder pair as soon as the turn starts (so consumers see a
//! typing indicator immediately), rewrites the last entry for every
//! fragment, and commits the final text once, trimmed, when the sequence
//! ends. A transport failure commits a literal sentinel instead; the turn
//! still counts.
//!
//! Every transcript write re-checks the session epoch under the state
//! mutex, so a turn that raced a `reset` aborts instead of writing stale
//! content into the cleared transcript.

use thiserror::Error;
use tracing::debug;

use agora_core::AgentSlot;

use crate::events::{DebateEvent, DebateStatus};
use crate::session::DebateSession;

/// Content committed for a turn whose generation call failed
pub const ERROR_SENTINEL: &str = "Error generating response.";

/// The session was reset while this turn was in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("turn aborted: session was reset mid-stream")]
pub struct TurnAborted;

/// Aggregates one turn's fragments into the shared transcript
pub struct ResponseAggregator<'a> {
    session: &'a DebateSession,
    speaker: String,
    epoch: u64,
    index: usize,
    buffer: String,
}

impl<'a> ResponseAggregator<'a> {
    /// Start a turn: append the placeholder entry pair (counting the turn)
    /// and announce that the agent is typing.
    ///
    /// `epoch` is the value observed when the turn was scheduled; if a
    /// reset has happened since, nothing is written.
    pub fn begin(
        session: &'a DebateSession,
        slot: AgentSlot,
        speaker: &str,
        epoch: u64,
    ) -> Result<Self, TurnAborted> {
        let index = {
            let mut inner = session.lock();
            if inner.epoch != epoch {
                return Err(TurnAborted);
            }
            inner.state.begin_entry(slot, speaker);
            inner.state.conversation.len() - 1
        };
        session.emit(DebateEvent::Status(DebateStatus::Typing {
            agent: speaker.to_string(),
        }));
        Ok(Self {
            session,
            speaker: speaker.to_string(),
            epoch,
            index,
            buffer: String::new(),
        })
    }

    /// Append a fragment, rewrite the in-flight entry, emit a snapshot
    pub fn push(&mut self, fragment: &str) -> Result<(), TurnAborted> {
        self.buffer.push_str(fragment);
        let snapshot = self.buffer.clone();
        self.write(&snapshot)
    }

    /// Aggregated text so far, untrimmed
    pub fn partial(&self) -> &str {
        &self.buffer
    }

    /// Commit the completed turn: trim once, rewrite, return the final
    /// text. Also the finalization path for a cancelled turn, which keeps
    /// whatever was aggregated.
    pub fn finish(self) -> Result<String, TurnAborted> {
        let content = self.buffer.trim().to_string();
        self.write(&content)?;
        debug!(speaker = %self.speaker, chars = content.len(), "turn committed");
        Ok(content)
    }

    /// Commit the error sentinel for a failed generation call
    pub fn fail(self) -> Result<(), TurnAborted> {
        self.write(ERROR_SENTINEL)?;
        debug!(speaker = %self.speaker, "turn committed with error sentinel");
        Ok(())
    }

    fn write(&self, content: &str) -> Result<(), TurnAborted> {
        {
            let mut inner = self.session.lock();
            if inner.epoch != self.epoch {
                return Err(TurnAborted);
            }
            inner.state.rewrite_last(&self.speaker, content);
        }
        self.session.emit(DebateEvent::Snapshot {
            index: self.index,
            speaker: self.speaker.clone(),
            content: content.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> DebateSession {
        DebateSession::new()
    }

    #[test]
    fn test_placeholder_appears_immediately() {
        let session = session();
        let _agg = ResponseAggregator::begin(&session, AgentSlot::First, "A", 0).unwrap();
        let state = session.state_snapshot();
        assert_eq!(state.message_count, 1);
        assert_eq!(state.conversation[0].content, "");
        assert_eq!(state.chat_history[0].content, "A: ");
    }

    #[test]
    fn test_snapshots_are_prefix_extensions() {
        let session = session();
        let mut events = session.subscribe();
        let mut agg = ResponseAggregator::begin(&session, AgentSlot::First, "A", 0).unwrap();
        for fragment in ["Hel", "lo", " world"] {
            agg.push(fragment).unwrap();
        }
        let content = agg.finish().unwrap();
        assert_eq!(content, "Hello world");

        let mut snapshots = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let DebateEvent::Snapshot { content, .. } = event {
                snapshots.push(content);
            }
        }
        assert_eq!(snapshots, ["Hel", "Hello", "Hello world", "Hello world"]);
        for pair in snapshots.windows(2) {
            assert!(pair[1].starts_with(pair[0].trim_end()));
        }
    }

    #[test]
    fn test_finish_trims_once() {
        let session = session();
        let mut agg = ResponseAggregator::begin(&session, AgentSlot::Second, "B", 0).unwrap();
        agg.push("  spaced  ").unwrap();
        assert_eq!(agg.finish().unwrap(), "spaced");
        let state = session.state_snapshot();
        assert_eq!(state.conversation[0].content, "spaced");
        assert_eq!(state.chat_history[0].content, "B: spaced");
    }

    #[test]
    fn test_fail_commits_sentinel() {
        let session = session();
        let agg = ResponseAggregator::begin(&session, AgentSlot::First, "A", 0).unwrap();
        agg.fail().unwrap();
        let state = session.state_snapshot();
        assert_eq!(state.conversation[0].content, ERROR_SENTINEL);
        assert_eq!(state.message_count, 1);
    }

    #[test]
    fn test_reset_mid_turn_aborts_writes() {
        let session = session();
        let mut agg = ResponseAggregator::begin(&session, AgentSlot::First, "A", 0).unwrap();
        agg.push("before reset").unwrap();
        session.reset();
        assert_eq!(agg.push("after reset"), Err(TurnAborted));
        let state = session.state_snapshot();
        assert!(state.conversation.is_empty());
        assert_eq!(state.message_count, 0);
    }

    #[test]
    fn test_begin_after_reset_with_stale_epoch_aborts() {
        let session = session();
        session.reset(); // epoch is now 1
        assert!(ResponseAggregator::begin(&session, AgentSlot::First, "A", 0).is_err());
        assert!(session.state_snapshot().conversation.is_empty());
    }
}
