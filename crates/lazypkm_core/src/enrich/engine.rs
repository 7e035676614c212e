//! Enrichment cycle: summarize, then prioritize.

use crate::enrich::{EnrichError, Enricher, PriorityRequest};
use crate::model::knowledge::KnowledgeEntry;
use crate::model::task::Task;
use crate::model::EntityKind;
use log::{debug, info, warn};
use std::time::Instant;
use uuid::Uuid;

/// Linked context used when a task's knowledge link no longer resolves.
pub const MISSING_LINK_PLACEHOLDER: &str = "No linked content found.";

/// One record the provider failed on; it stays unprocessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleFailure {
    pub kind: EntityKind,
    pub id: Uuid,
    pub error: EnrichError,
}

/// Outcome of one enrichment cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Entries that received a summary in this cycle.
    pub summarized: usize,
    /// Tasks that received a priority in this cycle.
    pub prioritized: usize,
    pub failures: Vec<CycleFailure>,
}

impl CycleReport {
    /// The knowledge sequence changed and should be persisted.
    pub fn knowledge_updated(&self) -> bool {
        self.summarized > 0
    }

    /// The task sequence changed and should be persisted.
    pub fn tasks_updated(&self) -> bool {
        self.prioritized > 0
    }

    pub fn is_noop(&self) -> bool {
        !self.knowledge_updated() && !self.tasks_updated() && self.failures.is_empty()
    }
}

/// Linked context for prioritizing `task`.
///
/// - No link: empty string.
/// - Link resolves: the entry's summary, or its raw content when unsummarized.
/// - Link dangles: [`MISSING_LINK_PLACEHOLDER`].
pub fn prioritization_context(task: &Task, knowledge: &[KnowledgeEntry]) -> String {
    let Some(link_id) = task.knowledge_link_id() else {
        return String::new();
    };
    match knowledge.iter().find(|entry| entry.id() == link_id) {
        Some(entry) => entry.summary().unwrap_or(entry.content()).to_string(),
        None => MISSING_LINK_PLACEHOLDER.to_string(),
    }
}

/// Runs one enrichment cycle over both sequences in place.
///
/// Entries with `is_summarized == false` are summarized first, then pending
/// tasks with `is_prioritized == false` are prioritized, each phase in
/// sequence order. Provider failures are collected in the report and leave the
/// affected record unprocessed.
pub fn run_cycle<E>(
    knowledge: &mut [KnowledgeEntry],
    tasks: &mut [Task],
    enricher: &E,
) -> CycleReport
where
    E: Enricher + ?Sized,
{
    let started_at = Instant::now();
    let mut report = CycleReport::default();

    let pending_entries = knowledge.iter().filter(|e| !e.is_summarized()).count();
    let pending_tasks = tasks.iter().filter(|t| t.needs_prioritization()).count();
    info!(
        "event=enrich_cycle module=enrich status=start pending_knowledge={pending_entries} pending_tasks={pending_tasks}"
    );

    for entry in knowledge.iter_mut().filter(|e| !e.is_summarized()) {
        match enricher.summarize(entry.title(), entry.content()) {
            Ok(summary) => {
                entry.apply_summary(summary);
                report.summarized += 1;
                debug!("event=enrich_summarized module=enrich status=ok id={}", entry.id());
            }
            Err(error) => {
                warn!(
                    "event=enrich_failed module=enrich status=warn kind=knowledge id={} error={error}",
                    entry.id()
                );
                report.failures.push(CycleFailure {
                    kind: EntityKind::Knowledge,
                    id: entry.id(),
                    error,
                });
            }
        }
    }

    // Contexts read the knowledge sequence only, so summaries committed above
    // are visible here.
    let knowledge: &[KnowledgeEntry] = knowledge;
    for task in tasks.iter_mut().filter(|t| t.needs_prioritization()) {
        let linked_context = prioritization_context(task, knowledge);
        let request = PriorityRequest {
            title: task.title(),
            due_date: task.due_date(),
            description: task.description(),
            linked_context: &linked_context,
        };
        match enricher.prioritize(&request) {
            Ok(priority) => {
                task.apply_priority(priority);
                report.prioritized += 1;
                debug!(
                    "event=enrich_prioritized module=enrich status=ok id={} priority={priority}",
                    task.id()
                );
            }
            Err(error) => {
                warn!(
                    "event=enrich_failed module=enrich status=warn kind=tasks id={} error={error}",
                    task.id()
                );
                report.failures.push(CycleFailure {
                    kind: EntityKind::Task,
                    id: task.id(),
                    error,
                });
            }
        }
    }

    info!(
        "event=enrich_cycle module=enrich status=ok summarized={} prioritized={} failed={} duration_ms={}",
        report.summarized,
        report.prioritized,
        report.failures.len(),
        started_at.elapsed().as_millis()
    );
    report
}
