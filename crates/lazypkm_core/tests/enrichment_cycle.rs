use lazypkm_core::{
    prioritization_context, run_cycle, EnrichError, Enricher, KnowledgeEntry, Priority,
    PriorityRequest, Session, Task, MISSING_LINK_PLACEHOLDER,
};
use std::cell::{Cell, RefCell};

/// Counts provider calls and records the linked context of each prioritize call.
#[derive(Default)]
struct CountingEnricher {
    summaries: Cell<usize>,
    priorities: Cell<usize>,
    contexts: RefCell<Vec<String>>,
    fail_titles: Vec<&'static str>,
}

impl CountingEnricher {
    fn failing_on(titles: &[&'static str]) -> Self {
        Self {
            fail_titles: titles.to_vec(),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.summaries.get() + self.priorities.get()
    }
}

impl Enricher for CountingEnricher {
    fn summarize(&self, title: &str, _content: &str) -> Result<String, EnrichError> {
        self.summaries.set(self.summaries.get() + 1);
        if self.fail_titles.contains(&title) {
            return Err(EnrichError::new("provider unavailable"));
        }
        Ok(format!("summary of {title}"))
    }

    fn prioritize(&self, request: &PriorityRequest<'_>) -> Result<Priority, EnrichError> {
        self.priorities.set(self.priorities.get() + 1);
        self.contexts
            .borrow_mut()
            .push(request.linked_context.to_string());
        if self.fail_titles.contains(&request.title) {
            return Err(EnrichError::new("provider unavailable"));
        }
        Ok(Priority::High)
    }
}

#[test]
fn linked_task_and_entry_are_processed_once() {
    let mut session = Session::new();
    session
        .add_knowledge("Rust", "Ownership and borrowing", vec!["lang".into()])
        .unwrap();
    session
        .add_task("Study", "chapter 4", "2025-03-01", Some("1"))
        .unwrap();

    let enricher = CountingEnricher::default();
    let first = session.run_enrichment(&enricher);
    assert_eq!(first.summarized, 1);
    assert_eq!(first.prioritized, 1);
    assert!(first.knowledge_updated());
    assert!(first.tasks_updated());
    assert_eq!(enricher.calls(), 2);

    // Summary committed in phase one feeds the task's context in phase two.
    assert_eq!(enricher.contexts.borrow().as_slice(), ["summary of Rust"]);

    let entry = &session.knowledge()[0];
    assert!(entry.is_summarized());
    assert_eq!(entry.summary(), Some("summary of Rust"));
    let task = &session.tasks()[0];
    assert!(task.is_prioritized());
    assert_eq!(task.priority(), Priority::High);

    let second = session.run_enrichment(&enricher);
    assert!(second.is_noop());
    assert_eq!(enricher.calls(), 2);
    assert_eq!(session.knowledge()[0].summary(), Some("summary of Rust"));
}

#[test]
fn deleted_entry_yields_placeholder_context() {
    let mut session = Session::new();
    session.add_knowledge("Doomed", "soon gone", Vec::new()).unwrap();
    session.add_task("Follow up", "", "", Some("1")).unwrap();
    session.delete_knowledge("1").unwrap();

    let enricher = CountingEnricher::default();
    let report = session.run_enrichment(&enricher);
    assert_eq!(report.prioritized, 1);
    assert_eq!(
        enricher.contexts.borrow().as_slice(),
        [MISSING_LINK_PLACEHOLDER]
    );
}

#[test]
fn context_prefers_summary_then_content_then_empty() {
    let mut entry = KnowledgeEntry::new("k", "raw content", Vec::new()).unwrap();
    let linked = Task::new("t", "", None, Some(entry.id())).unwrap();
    let unlinked = Task::new("u", "", None, None).unwrap();

    assert_eq!(
        prioritization_context(&linked, std::slice::from_ref(&entry)),
        "raw content"
    );
    entry.apply_summary("condensed");
    assert_eq!(
        prioritization_context(&linked, std::slice::from_ref(&entry)),
        "condensed"
    );
    assert_eq!(prioritization_context(&unlinked, &[entry]), "");
    assert_eq!(prioritization_context(&linked, &[]), MISSING_LINK_PLACEHOLDER);
}

#[test]
fn provider_failure_is_reported_and_retried_next_cycle() {
    let mut knowledge = vec![
        KnowledgeEntry::new("flaky", "a", Vec::new()).unwrap(),
        KnowledgeEntry::new("steady", "b", Vec::new()).unwrap(),
    ];
    let mut tasks = vec![Task::new("flaky", "", None, None).unwrap()];

    let failing = CountingEnricher::failing_on(&["flaky"]);
    let report = run_cycle(&mut knowledge, &mut tasks, &failing);
    assert_eq!(report.summarized, 1);
    assert_eq!(report.prioritized, 0);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].id, knowledge[0].id());
    assert!(!knowledge[0].is_summarized());
    assert!(knowledge[1].is_summarized());
    assert!(!tasks[0].is_prioritized());

    let healthy = CountingEnricher::default();
    let retry = run_cycle(&mut knowledge, &mut tasks, &healthy);
    assert_eq!(retry.summarized, 1);
    assert_eq!(retry.prioritized, 1);
    assert!(retry.failures.is_empty());
    assert_eq!(healthy.calls(), 2);
}

#[test]
fn completed_tasks_are_never_prioritized() {
    let mut session = Session::new();
    session.add_task("done", "", "", None).unwrap();
    session.complete_task("1").unwrap();

    let enricher = CountingEnricher::default();
    let report = session.run_enrichment(&enricher);
    assert!(report.is_noop());
    assert_eq!(enricher.priorities.get(), 0);
}

#[test]
fn reset_enrichment_requeues_records() {
    let mut knowledge = vec![KnowledgeEntry::new("k", "c", Vec::new()).unwrap()];
    let mut tasks = vec![Task::new("t", "", None, None).unwrap()];
    let enricher = CountingEnricher::default();
    run_cycle(&mut knowledge, &mut tasks, &enricher);

    knowledge[0].reset_enrichment();
    tasks[0].reset_enrichment();
    let report = run_cycle(&mut knowledge, &mut tasks, &enricher);
    assert_eq!(report.summarized, 1);
    assert_eq!(report.prioritized, 1);
    assert_eq!(enricher.calls(), 4);
}
