//! Debate session state
//!
//! [`DebateState`] is the full mutable session record: transcript, display
//! history, message counter, current seat and running flag. All mutation
//! goes through the methods here so the structural invariant
//! `conversation.len() == chat_history.len() == message_count` holds at
//! every observable point, including mid-stream.

use serde::{Deserialize, Serialize};

use crate::agent::AgentSlot;
use crate::transcript::{ChatDisplayEntry, ConversationEntry};

/// The full mutable session record for one debate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebateState {
    /// Whether a driving task is currently running the debate
    pub running: bool,
    /// Canonical transcript, oldest first, append-only between resets
    pub conversation: Vec<ConversationEntry>,
    /// Presentation projection of the transcript, same length
    pub chat_history: Vec<ChatDisplayEntry>,
    /// Number of turns whose entry has been appended
    pub message_count: u32,
    /// Seat speaking the next (or in-flight) turn; unset until the first
    /// start since the last reset
    pub current_agent_index: Option<AgentSlot>,
}

impl DebateState {
    /// Fresh, empty session state
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the placeholder entry pair for a turn that is about to
    /// stream, counting the turn immediately.
    pub fn begin_entry(&mut self, slot: AgentSlot, speaker: &str) {
        self.conversation.push(ConversationEntry::placeholder(speaker));
        self.chat_history.push(ChatDisplayEntry::placeholder(slot, speaker));
        self.message_count += 1;
    }

    /// Rewrite the in-flight (last) entry pair with the aggregation
    /// buffer's current value.
    ///
    /// No-op on an empty transcript; the caller only invokes this between
    /// `begin_entry` and the end of the same turn.
    pub fn rewrite_last(&mut self, speaker: &str, content: &str) {
        if let Some(entry) = self.conversation.last_mut() {
            entry.content = content.to_string();
        }
        if let Some(entry) = self.chat_history.last_mut() {
            entry.set_content(speaker, content);
        }
    }

    /// Clear everything back to the just-created state
    pub fn reset(&mut self) {
        self.running = false;
        self.conversation.clear();
        self.chat_history.clear();
        self.message_count = 0;
        self.current_agent_index = None;
    }

    /// Structural invariant check, used by tests and debug assertions
    pub fn is_consistent(&self) -> bool {
        self.conversation.len() == self.chat_history.len()
            && self.conversation.len() == self.message_count as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_entry_counts_immediately() {
        let mut state = DebateState::new();
        state.begin_entry(AgentSlot::First, "A");
        assert_eq!(state.message_count, 1);
        assert!(state.is_consistent());
        assert_eq!(state.conversation[0].content, "");
        assert_eq!(state.chat_history[0].content, "A: ");
    }

    #[test]
    fn test_rewrite_last_updates_both_views() {
        let mut state = DebateState::new();
        state.begin_entry(AgentSlot::Second, "B");
        state.rewrite_last("B", "partial");
        assert_eq!(state.conversation[0].content, "partial");
        assert_eq!(state.chat_history[0].content, "B: partial");
        assert!(state.is_consistent());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = DebateState::new();
        state.running = true;
        state.current_agent_index = Some(AgentSlot::Second);
        state.begin_entry(AgentSlot::Second, "B");
        state.reset();
        assert!(!state.running);
        assert!(state.conversation.is_empty());
        assert!(state.chat_history.is_empty());
        assert_eq!(state.message_count, 0);
        assert_eq!(state.current_agent_index, None);
        assert!(state.is_consistent());
    }
}
