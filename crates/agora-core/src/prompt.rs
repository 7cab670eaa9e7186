//! Prompt composition for one debate turn

use crate::agent::AgentProfile;

/// Compose the full prompt for one turn of the debate.
///
/// Fixed layout: the agent's persona, the trimmed stage rules, the trimmed
/// topic line, the memory window (each included entry already
/// newline-terminated, possibly empty), then the agent's own name as a
/// completion cue with nothing after the colon. The stop sequence handed
/// to the generator is the *other* agent's [`AgentProfile::stop_marker`].
pub fn build_prompt(agent: &AgentProfile, topic: &str, stage_rules: &str, memory: &str) -> String {
    format!(
        "{}\n\n{}\n\nTopic: {}\n\n{}{}:",
        agent.system_prompt,
        stage_rules.trim(),
        topic.trim(),
        memory,
        agent.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentSlot;

    fn agent() -> AgentProfile {
        AgentProfile::for_slot(AgentSlot::First, "Scientist", "You are a scientist.", "llama3")
    }

    #[test]
    fn test_prompt_layout() {
        let prompt = build_prompt(&agent(), " Climate change ", " Keep it short. ", "A: hi\n");
        assert_eq!(
            prompt,
            "You are a scientist.\n\nKeep it short.\n\nTopic: Climate change\n\nA: hi\nScientist:"
        );
    }

    #[test]
    fn test_prompt_with_empty_memory() {
        let prompt = build_prompt(&agent(), "X", "Rules", "");
        assert_eq!(prompt, "You are a scientist.\n\nRules\n\nTopic: X\n\nScientist:");
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_prompt(&agent(), "X", "R", "m: 1\n");
        let b = build_prompt(&agent(), "X", "R", "m: 1\n");
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_ends_with_completion_cue() {
        let prompt = build_prompt(&agent(), "X", "R", "");
        assert!(prompt.ends_with("Scientist:"));
    }
}
