//! Transcript entry types
//!
//! The canonical transcript is a sequence of [`ConversationEntry`] values;
//! [`ChatDisplayEntry`] is the 1:1 presentation projection (role alternates
//! by seat, content carries a `"<name>: "` prefix) and can always be
//! rebuilt from the canonical form.

use serde::{Deserialize, Serialize};

use crate::agent::AgentSlot;

/// One completed (or in-progress) turn in the canonical transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// Display name of the speaking agent
    pub speaker: String,
    /// Generated text; empty while the turn is still streaming
    pub content: String,
}

impl ConversationEntry {
    /// A placeholder entry for a turn that has started streaming
    pub fn placeholder(speaker: &str) -> Self {
        Self {
            speaker: speaker.to_string(),
            content: String::new(),
        }
    }
}

/// Chat display role, alternating by seat rather than by meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// First seat
    User,
    /// Second seat
    Assistant,
}

impl ChatRole {
    /// Role shown for a given seat
    pub fn for_slot(slot: AgentSlot) -> Self {
        match slot {
            AgentSlot::First => Self::User,
            AgentSlot::Second => Self::Assistant,
        }
    }
}

/// One presentation-layer chat entry, derived from a [`ConversationEntry`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatDisplayEntry {
    /// Display role for the chat widget
    pub role: ChatRole,
    /// `"<name>: <content>"`
    pub content: String,
}

impl ChatDisplayEntry {
    /// Placeholder display entry for a turn that has started streaming
    pub fn placeholder(slot: AgentSlot, speaker: &str) -> Self {
        Self {
            role: ChatRole::for_slot(slot),
            content: format!("{}: ", speaker),
        }
    }

    /// Rewrite the displayed content for the current aggregation buffer
    pub fn set_content(&mut self, speaker: &str, content: &str) {
        self.content = format!("{}: {}", speaker, content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_alternates_by_seat() {
        assert_eq!(ChatRole::for_slot(AgentSlot::First), ChatRole::User);
        assert_eq!(ChatRole::for_slot(AgentSlot::Second), ChatRole::Assistant);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&ChatRole::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_display_entry_prefix() {
        let mut entry = ChatDisplayEntry::placeholder(AgentSlot::First, "Scientist");
        assert_eq!(entry.content, "Scientist: ");
        entry.set_content("Scientist", "the data is clear");
        assert_eq!(entry.content, "Scientist: the data is clear");
    }
}
