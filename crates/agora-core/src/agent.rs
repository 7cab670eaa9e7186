//! Agent profiles for Agora debates
//!
//! An [`AgentProfile`] is one configured debate participant: persona,
//! model, sampling parameters and memory budget. Profiles are immutable
//! for the duration of a debate except for the accumulating `memory`
//! field.

use serde::{Deserialize, Serialize};

/// Which of the two debate seats an agent occupies.
///
/// The seat decides the display role in the chat transcript (first seat
/// renders as `user`, second as `assistant`) and nothing else; it carries
/// no semantic meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentSlot {
    /// First configured agent
    First,
    /// Second configured agent
    Second,
}

impl AgentSlot {
    /// The opposing seat
    pub fn other(&self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Zero-based index into an [`AgentPair`]
    pub fn index(&self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    /// One-based seat number, used for fallback display names
    pub fn number(&self) -> usize {
        self.index() + 1
    }

    /// Seat for a zero-based index; anything non-zero is the second seat
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            Self::First
        } else {
            Self::Second
        }
    }
}

/// Configuration and running state for one debate participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Display name, never blank (falls back to "Agent N" by seat)
    pub name: String,
    /// Persona/system prompt, trimmed at construction
    pub system_prompt: String,
    /// Model identifier passed to the generation service
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Top-k sampling parameter
    pub top_k: u32,
    /// Context memory budget in characters
    pub memory_size: usize,
    /// Accumulated per-agent memory; part of agent identity, not yet
    /// consulted by the turn loop
    #[serde(default)]
    pub memory: String,
}

impl AgentProfile {
    /// Build a profile for a seat, normalizing the name and persona.
    ///
    /// A blank or whitespace-only name falls back to `"Agent 1"` /
    /// `"Agent 2"` depending on the seat.
    pub fn for_slot(slot: AgentSlot, name: &str, system_prompt: &str, model: &str) -> Self {
        let trimmed = name.trim();
        let name = if trimmed.is_empty() {
            format!("Agent {}", slot.number())
        } else {
            trimmed.to_string()
        };
        Self {
            name,
            system_prompt: system_prompt.trim().to_string(),
            model: model.to_string(),
            temperature: 1.0,
            top_k: 40,
            memory_size: 2000,
            memory: String::new(),
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the top-k sampling parameter
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the memory budget in characters
    pub fn with_memory_size(mut self, memory_size: usize) -> Self {
        self.memory_size = memory_size;
        self
    }

    /// The stop string that prevents this agent from being impersonated:
    /// its name followed by a colon.
    pub fn stop_marker(&self) -> String {
        format!("{}:", self.name)
    }
}

/// The two participants of a debate, indexed by [`AgentSlot`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentPair {
    agents: [AgentProfile; 2],
}

impl AgentPair {
    /// Pair two profiles in seat order
    pub fn new(first: AgentProfile, second: AgentProfile) -> Self {
        Self {
            agents: [first, second],
        }
    }

    /// The agent in the given seat
    pub fn get(&self, slot: AgentSlot) -> &AgentProfile {
        &self.agents[slot.index()]
    }

    /// The agent opposing the given seat
    pub fn opponent(&self, slot: AgentSlot) -> &AgentProfile {
        &self.agents[slot.other().index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_falls_back_to_seat() {
        let a = AgentProfile::for_slot(AgentSlot::First, "   ", "prompt", "llama3");
        assert_eq!(a.name, "Agent 1");
        let b = AgentProfile::for_slot(AgentSlot::Second, "", "prompt", "llama3");
        assert_eq!(b.name, "Agent 2");
    }

    #[test]
    fn test_name_and_prompt_trimmed() {
        let a = AgentProfile::for_slot(AgentSlot::First, "  Scientist  ", "  be rigorous  ", "m");
        assert_eq!(a.name, "Scientist");
        assert_eq!(a.system_prompt, "be rigorous");
    }

    #[test]
    fn test_stop_marker() {
        let a = AgentProfile::for_slot(AgentSlot::First, "Farmer", "", "m");
        assert_eq!(a.stop_marker(), "Farmer:");
    }

    #[test]
    fn test_pair_opponent() {
        let pair = AgentPair::new(
            AgentProfile::for_slot(AgentSlot::First, "A", "", "m"),
            AgentProfile::for_slot(AgentSlot::Second, "B", "", "m"),
        );
        assert_eq!(pair.get(AgentSlot::First).name, "A");
        assert_eq!(pair.opponent(AgentSlot::First).name, "B");
        assert_eq!(pair.opponent(AgentSlot::Second).name, "A");
    }

    #[test]
    fn test_slot_round_trip() {
        assert_eq!(AgentSlot::First.other(), AgentSlot::Second);
        assert_eq!(AgentSlot::Second.other(), AgentSlot::First);
        assert_eq!(AgentSlot::from_index(0), AgentSlot::First);
        assert_eq!(AgentSlot::from_index(1), AgentSlot::Second);
    }
}
