//! Bounded context memory for prompts
//!
//! Builds the textual excerpt of prior turns supplied as generation
//! context: newest entries are preferred, whole entries only, measured in
//! characters against a per-agent budget.

use crate::transcript::ConversationEntry;

/// Build a bounded memory window over the conversation history.
///
/// Walks `history` newest to oldest, rendering each entry as
/// `"<speaker>: <content>\n"` and accumulating its character length; the
/// first entry that would push the cumulative total past `budget` is
/// excluded entirely, together with everything older. Included entries are
/// returned in their original chronological order.
///
/// A `budget` of zero yields an empty string, as does a newest entry that
/// alone exceeds the budget. Entries are never truncated mid-text.
pub fn memory_window(history: &[ConversationEntry], budget: usize) -> String {
    let mut included = Vec::new();
    let mut used = 0usize;
    for entry in history.iter().rev() {
        let line = format!("{}: {}\n", entry.speaker, entry.content);
        used += line.chars().count();
        if used > budget {
            break;
        }
        included.push(line);
    }
    included.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(speaker: &str, content: &str) -> ConversationEntry {
        ConversationEntry {
            speaker: speaker.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(memory_window(&[], 100), "");
    }

    #[test]
    fn test_zero_budget() {
        let history = vec![entry("A", "hi")];
        assert_eq!(memory_window(&history, 0), "");
    }

    #[test]
    fn test_single_entry_within_budget() {
        let history = vec![entry("A", "hi")];
        assert_eq!(memory_window(&history, 100), "A: hi\n");
    }

    #[test]
    fn test_newest_entry_alone_over_budget_yields_empty() {
        let history = vec![entry("A", "a very long message indeed")];
        assert_eq!(memory_window(&history, 5), "");
    }

    #[test]
    fn test_trimming_excludes_older_entry_wholesale() {
        // "A: hello hello hello\n" is 21 chars; the older entry is 40.
        let older = entry("B", "x".repeat(37).as_str()); // "B: " + 37 = 40 + \n = 41
        let newest = entry("A", "hello hello hello");
        let history = vec![older, newest];
        let window = memory_window(&history, 50);
        assert_eq!(window, "A: hello hello hello\n");
    }

    #[test]
    fn test_chronological_order_preserved() {
        let history = vec![entry("A", "first"), entry("B", "second"), entry("A", "third")];
        let window = memory_window(&history, 1000);
        assert_eq!(window, "A: first\nB: second\nA: third\n");
    }

    #[test]
    fn test_budget_boundary_is_inclusive() {
        // exactly at the budget is still included
        let history = vec![entry("A", "hi")]; // "A: hi\n" = 6 chars
        assert_eq!(memory_window(&history, 6), "A: hi\n");
        assert_eq!(memory_window(&history, 5), "");
    }

    #[test]
    fn test_budget_counts_characters_not_bytes() {
        let history = vec![entry("Α", "αβγ")]; // multibyte speaker and content
        // "Α: αβγ\n" is 7 characters
        assert_eq!(memory_window(&history, 7), "Α: αβγ\n");
        assert_eq!(memory_window(&history, 6), "");
    }
}
