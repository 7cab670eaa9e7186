//! Events emitted to the presentation layer

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status transitions of a running debate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebateStatus {
    /// The debate loop has begun
    Started,
    /// The named agent is streaming a response
    Typing { agent: String },
    /// The named agent completed its turn normally
    Finished { agent: String },
    /// The named agent's turn failed at the transport
    Errored { agent: String },
    /// The debate was stopped cooperatively
    Stopped,
    /// The 1000-message cap was reached
    LimitReached,
    /// The session was reset
    Reset,
}

impl fmt::Display for DebateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "Debate started."),
            Self::Typing { agent } => write!(f, "{} is typing...", agent),
            Self::Finished { agent } => write!(f, "{} finished responding.", agent),
            Self::Errored { agent } => write!(f, "{} encountered an error.", agent),
            Self::Stopped => write!(f, "Debate stopped."),
            Self::LimitReached => write!(f, "Debate ended after reaching message limit."),
            Self::Reset => write!(f, "Debate reset."),
        }
    }
}

/// One event on the session's broadcast channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebateEvent {
    /// A status transition
    Status(DebateStatus),
    /// An incremental view of the in-flight transcript entry
    Snapshot {
        /// Index of the entry in the transcript
        index: usize,
        /// Speaking agent
        speaker: String,
        /// Aggregated content so far
        content: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        let agent = "Scientist".to_string();
        assert_eq!(
            DebateStatus::Typing { agent: agent.clone() }.to_string(),
            "Scientist is typing..."
        );
        assert_eq!(
            DebateStatus::Finished { agent: agent.clone() }.to_string(),
            "Scientist finished responding."
        );
        assert_eq!(
            DebateStatus::Errored { agent }.to_string(),
            "Scientist encountered an error."
        );
        assert_eq!(DebateStatus::Stopped.to_string(), "Debate stopped.");
        assert_eq!(
            DebateStatus::LimitReached.to_string(),
            "Debate ended after reaching message limit."
        );
    }
}
