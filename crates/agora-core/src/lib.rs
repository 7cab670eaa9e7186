//! # Agora Core
//!
//! Core types for the Agora debate engine: agent profiles, the transcript,
//! the debate state record, the turn scheduler, and the pure functions that
//! build per-turn context (memory window) and prompts.
//!
//! Everything here is synchronous and I/O-free; the orchestration layer in
//! `agora-engine` drives these types against a streaming generation service.

pub mod agent;
pub mod memory;
pub mod prompt;
pub mod scheduler;
pub mod state;
pub mod transcript;

pub use agent::{AgentPair, AgentProfile, AgentSlot};
pub use memory::memory_window;
pub use prompt::build_prompt;
pub use scheduler::{Advance, SchedulerPhase, StartOutcome, TurnScheduler, MESSAGE_LIMIT};
pub use state::DebateState;
pub use transcript::{ChatDisplayEntry, ChatRole, ConversationEntry};
