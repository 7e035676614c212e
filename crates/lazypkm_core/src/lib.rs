//! Core domain logic for LazyPKM.
//! This crate is the single source of truth for record, link and enrichment
//! invariants.

pub mod config;
pub mod enrich;
pub mod link;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod store;

pub use config::CoreConfig;
pub use enrich::{
    prioritization_context, run_cycle, CycleFailure, CycleReport, EnrichError, Enricher,
    KeywordEnricher, PriorityRequest, MISSING_LINK_PLACEHOLDER,
};
pub use link::resolver::{resolve_token, ResolveError};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LoggingError,
};
pub use model::assignment::{Assignment, AssignmentId, AssignmentStatus};
pub use model::date::{parse_due_date, InvalidDateError};
pub use model::knowledge::{KnowledgeEntry, KnowledgeId};
pub use model::schedule::{ScheduleSlot, ScheduleSlotId};
pub use model::task::{Priority, Task, TaskId, TaskStatus};
pub use model::validation::ValidationError;
pub use model::EntityKind;
pub use search::listing::{
    pending_tasks, schedules_on, search_knowledge, sorted_schedules, tasks_by_due_date,
    tasks_with_status, ScheduleOrder,
};
pub use service::assignment_book::{AssignmentBook, AssignmentError, LinkedTitle};
pub use service::session::{KnowledgeLink, Session, SessionError, SessionResult};
pub use store::{JsonFileStore, MemoryStore, RecordStore, StoreError, StoreResult, StoredRecord};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
