//! Knowledge entry domain model.
//!
//! # Responsibility
//! - Define the free-text note record and its summary enrichment state.
//!
//! # Invariants
//! - `id` is stable and never reused for another entry.
//! - `is_summarized == true` iff `summary.is_some()`.
//! - Once summarized, an entry stays summarized until `reset_enrichment`.

use crate::model::date::timestamp_serde;
use crate::model::validation::{require_title, ValidationError};
use crate::model::EntityKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for knowledge entries.
pub type KnowledgeId = Uuid;

/// One piece of stored knowledge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "KnowledgeEntryWire")]
pub struct KnowledgeEntry {
    id: KnowledgeId,
    title: String,
    content: String,
    /// Insertion order is preserved; duplicates are kept as entered.
    tags: Vec<String>,
    #[serde(with = "timestamp_serde")]
    created_at: DateTime<Utc>,
    summary: Option<String>,
    is_summarized: bool,
}

impl KnowledgeEntry {
    /// Creates a new entry with a generated id and no summary.
    ///
    /// # Errors
    /// - `ValidationError::EmptyTitle` when `title` is blank.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), title, content, tags)
    }

    /// Creates an entry with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: KnowledgeId,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<Self, ValidationError> {
        if id.is_nil() {
            return Err(ValidationError::NilId {
                kind: EntityKind::Knowledge,
            });
        }
        Ok(Self {
            id,
            title: require_title(EntityKind::Knowledge, title.into())?,
            content: content.into(),
            tags,
            created_at: Utc::now(),
            summary: None,
            is_summarized: false,
        })
    }

    pub fn id(&self) -> KnowledgeId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn is_summarized(&self) -> bool {
        self.is_summarized
    }

    /// Commits an enrichment summary and marks the entry processed.
    pub fn apply_summary(&mut self, summary: impl Into<String>) {
        self.summary = Some(summary.into());
        self.is_summarized = true;
    }

    /// Clears the summary so the next enrichment cycle recomputes it.
    pub fn reset_enrichment(&mut self) {
        self.summary = None;
        self.is_summarized = false;
    }

    /// Text used by listings: the summary when present, else a content preview.
    pub fn display_summary(&self, preview_chars: usize) -> String {
        match self.summary.as_deref() {
            Some(summary) => summary.to_string(),
            None => {
                let mut preview: String = self.content.chars().take(preview_chars).collect();
                if self.content.chars().count() > preview_chars {
                    preview.push_str("...");
                }
                preview
            }
        }
    }
}

/// Decode-side shape with tolerant defaults for optional fields.
#[derive(Deserialize)]
struct KnowledgeEntryWire {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    title: String,
    content: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default = "Utc::now", with = "timestamp_serde")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    summary: Option<String>,
}

impl TryFrom<KnowledgeEntryWire> for KnowledgeEntry {
    type Error = ValidationError;

    fn try_from(wire: KnowledgeEntryWire) -> Result<Self, Self::Error> {
        let mut entry = Self::with_id(
            wire.id,
            wire.title,
            wire.content,
            wire.tags.unwrap_or_default(),
        )?;
        entry.created_at = wire.created_at;
        // `summary` is the source of truth for the processed flag; a stored
        // `is_summarized` without a summary decodes as unprocessed.
        if let Some(summary) = wire.summary {
            entry.apply_summary(summary);
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::KnowledgeEntry;

    #[test]
    fn display_summary_prefers_summary_then_truncated_content() {
        let mut entry =
            KnowledgeEntry::new("t", "abcdefghij", Vec::new()).expect("valid entry");
        assert_eq!(entry.display_summary(4), "abcd...");
        assert_eq!(entry.display_summary(20), "abcdefghij");

        entry.apply_summary("short");
        assert_eq!(entry.display_summary(4), "short");
    }

    #[test]
    fn reset_enrichment_clears_both_fields() {
        let mut entry = KnowledgeEntry::new("t", "c", Vec::new()).expect("valid entry");
        entry.apply_summary("s");
        entry.reset_enrichment();
        assert!(!entry.is_summarized());
        assert_eq!(entry.summary(), None);
    }
}
