//! Typed records for knowledge, task, schedule and assignment data.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the wire contract (field names, defaults, validation on decode).
//!
//! # Invariants
//! - Every record is identified by an id assigned once at creation.
//! - Records are mutated only through named operations that keep their
//!   enrichment/lifecycle flags consistent.
//! - Decoding a record applies the same validation as constructing one.

pub mod assignment;
pub mod date;
pub mod knowledge;
pub mod schedule;
pub mod task;
pub mod validation;

/// Entity kinds persisted by the store, one container per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Knowledge,
    Task,
    Schedule,
    Assignment,
}

impl EntityKind {
    /// Stable short name used in logs and container file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Knowledge => "knowledge",
            Self::Task => "tasks",
            Self::Schedule => "schedules",
            Self::Assignment => "assignments",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
