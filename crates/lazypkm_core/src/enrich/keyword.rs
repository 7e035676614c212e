//! Deterministic offline provider.
//!
//! Stands in for a language model when none is configured: summaries are
//! template text derived from the entry, and priorities follow keyword and
//! length heuristics over the task text.

use crate::enrich::{EnrichError, Enricher, PriorityRequest};
use crate::model::date::format_due_date;
use crate::model::task::Priority;
use std::collections::BTreeSet;

/// Words that force `Priority::High`.
const URGENT_KEYWORDS: &[&str] = &["critical", "deadline", "urgent"];
/// Prompt longer than this (in chars, preamble included) is at least
/// `Priority::Medium`.
const MEDIUM_PROMPT_CHARS: usize = 200;
/// Instruction header a model-backed provider sends ahead of the task text.
const PRIORITY_PREAMBLE: &str = "Analyze the following task and context to assign a priority \
level (low, medium, or high). Only return the priority level string itself.\n";

/// Keyword/length heuristic provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordEnricher;

impl KeywordEnricher {
    pub fn new() -> Self {
        Self
    }
}

impl Enricher for KeywordEnricher {
    fn summarize(&self, title: &str, content: &str) -> Result<String, EnrichError> {
        let focus = content
            .split_whitespace()
            .next()
            .or_else(|| title.split_whitespace().next())
            .unwrap_or("nothing");
        let unique_tokens = title
            .split_whitespace()
            .chain(content.split_whitespace())
            .map(str::to_lowercase)
            .collect::<BTreeSet<_>>()
            .len();
        Ok(format!(
            "AI Summary: A concise overview of the document, focusing on {focus} and covering {unique_tokens} unique tokens."
        ))
    }

    fn prioritize(&self, request: &PriorityRequest<'_>) -> Result<Priority, EnrichError> {
        let due = request
            .due_date
            .map(format_due_date)
            .unwrap_or_else(|| "unscheduled".to_string());
        let prompt = format!(
            "{PRIORITY_PREAMBLE}Task: {} (Due: {due})\nDescription: {}\nLinked Context: {}",
            request.title, request.description, request.linked_context
        );
        let lowered = prompt.to_lowercase();

        if URGENT_KEYWORDS.iter().any(|word| lowered.contains(word)) {
            return Ok(Priority::High);
        }
        if prompt.chars().count() > MEDIUM_PROMPT_CHARS {
            return Ok(Priority::Medium);
        }
        Ok(Priority::Low)
    }
}

#[cfg(test)]
mod tests {
    use super::KeywordEnricher;
    use crate::enrich::{Enricher, PriorityRequest};
    use crate::model::date::parse_due_date;
    use crate::model::task::Priority;

    fn request<'a>(description: &'a str, linked_context: &'a str) -> PriorityRequest<'a> {
        PriorityRequest {
            title: "Y",
            due_date: None,
            description,
            linked_context,
        }
    }

    #[test]
    fn urgent_keyword_in_linked_context_forces_high() {
        let priority = KeywordEnricher
            .prioritize(&request("plain", "this has a DEADLINE"))
            .unwrap();
        assert_eq!(priority, Priority::High);
    }

    #[test]
    fn long_text_is_medium_and_short_text_is_low() {
        let long = "word ".repeat(60);
        assert_eq!(
            KeywordEnricher.prioritize(&request(&long, "")).unwrap(),
            Priority::Medium
        );
        // Header plus an empty task body stays within the limit.
        assert_eq!(
            KeywordEnricher.prioritize(&request("", "")).unwrap(),
            Priority::Low
        );
    }

    #[test]
    fn length_rule_counts_the_instruction_header() {
        // 203 chars once the header is included; the task body alone is 67.
        let dated = PriorityRequest {
            due_date: parse_due_date("2025-01-01").ok(),
            ..request("", "hello world")
        };
        assert_eq!(KeywordEnricher.prioritize(&dated).unwrap(), Priority::Medium);
    }

    #[test]
    fn summary_is_deterministic_and_counts_unique_tokens() {
        let first = KeywordEnricher.summarize("X", "hello world hello").unwrap();
        let second = KeywordEnricher.summarize("X", "hello world hello").unwrap();
        assert_eq!(first, second);
        assert!(first.contains("focusing on hello"));
        assert!(first.contains("covering 3 unique tokens"));
    }
}
