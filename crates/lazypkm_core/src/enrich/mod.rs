//! Idempotent enrichment of knowledge entries and tasks.
//!
//! # Responsibility
//! - Define the provider seam (`Enricher`) for summaries and priorities.
//! - Run enrichment cycles that process each record at most once.
//!
//! # Invariants
//! - A cycle summarizes every pending entry before prioritizing any task.
//! - Providers never see mutable records; the engine commits their results.
//! - Partial progress is durable: a record committed before a failure stays
//!   committed, and the next cycle skips it.

pub mod engine;
pub mod keyword;

use crate::model::task::Priority;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use engine::{
    prioritization_context, run_cycle, CycleFailure, CycleReport, MISSING_LINK_PLACEHOLDER,
};
pub use keyword::KeywordEnricher;

/// Provider-side failure for one enrichment call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichError {
    pub message: String,
}

impl EnrichError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for EnrichError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "enrichment provider failed: {}", self.message)
    }
}

impl Error for EnrichError {}

/// Inputs for one prioritization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityRequest<'a> {
    pub title: &'a str,
    /// `None` for unscheduled tasks.
    pub due_date: Option<NaiveDate>,
    pub description: &'a str,
    /// Linked summary/content, the missing-link placeholder, or empty.
    pub linked_context: &'a str,
}

/// External enrichment provider.
///
/// Implementations may be deterministic fakes or blocking calls to a live
/// model; the engine only relies on this contract.
pub trait Enricher {
    fn summarize(&self, title: &str, content: &str) -> Result<String, EnrichError>;
    fn prioritize(&self, request: &PriorityRequest<'_>) -> Result<Priority, EnrichError>;
}
