//! Session: the single owner of all in-memory records between load and save.
//!
//! # Responsibility
//! - Provide the named create/link/complete/delete operations callers use.
//! - Track which collections changed since the last save.
//! - Bridge the store, the link resolver and the enrichment engine.
//!
//! # Invariants
//! - Every public mutation validates and resolves before changing state, so
//!   a failed call leaves the session untouched.
//! - Deleting a knowledge entry never touches tasks; their links dangle.
//! - Sessions are independent values; no state is shared between them.
//! - `save` writes only the kinds changed since load or the last save.

use crate::enrich::{run_cycle, CycleReport, Enricher};
use crate::link::resolver::{resolve_token, ResolveError};
use crate::model::assignment::{Assignment, AssignmentId};
use crate::model::date::due_date_or_unscheduled;
use crate::model::knowledge::{KnowledgeEntry, KnowledgeId};
use crate::model::schedule::ScheduleSlot;
use crate::model::task::{Task, TaskStatus};
use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use crate::search::listing::{
    pending_tasks, search_knowledge, sorted_schedules, tasks_with_status, ScheduleOrder,
};
use crate::service::assignment_book::{AssignmentBook, AssignmentError, LinkedTitle};
use crate::store::{RecordStore, StoreError};
use log::info;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from session operations.
#[derive(Debug)]
pub enum SessionError {
    Validation(ValidationError),
    /// A resolver token did not identify exactly one record of `kind`.
    Resolve {
        kind: EntityKind,
        source: ResolveError,
    },
    Assignment(AssignmentError),
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Resolve { kind, source } => write!(f, "{kind}: {source}"),
            Self::Assignment(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Resolve { source, .. } => Some(source),
            Self::Assignment(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<AssignmentError> for SessionError {
    fn from(value: AssignmentError) -> Self {
        Self::Assignment(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Resolution state of a task's weak knowledge reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnowledgeLink<'a> {
    Unlinked,
    Live(&'a KnowledgeEntry),
    /// The linked entry was deleted; the stale id is kept.
    Missing(KnowledgeId),
}

/// In-memory record sets plus dirty tracking.
#[derive(Debug, Default)]
pub struct Session {
    knowledge: Vec<KnowledgeEntry>,
    tasks: Vec<Task>,
    schedules: Vec<ScheduleSlot>,
    assignments: AssignmentBook,
    schedule_order: ScheduleOrder,
    dirty: BTreeSet<EntityKind>,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every collection from `store`.
    ///
    /// Missing or corrupt containers load as empty collections.
    pub fn load<S: RecordStore>(store: &S) -> SessionResult<Self> {
        let session = Self {
            knowledge: store.load()?,
            tasks: store.load()?,
            schedules: store.load()?,
            assignments: AssignmentBook::from_records(store.load()?),
            schedule_order: ScheduleOrder::default(),
            dirty: BTreeSet::new(),
        };
        info!(
            "event=session_load module=service status=ok knowledge={} tasks={} schedules={} assignments={}",
            session.knowledge.len(),
            session.tasks.len(),
            session.schedules.len(),
            session.assignments.len()
        );
        Ok(session)
    }

    /// Overwrites the container of every kind changed since load or the last
    /// save, then clears dirty state.
    ///
    /// Unchanged kinds are not written, so a container that loaded as empty
    /// because it was corrupt stays on disk as it was.
    pub fn save<S: RecordStore>(&mut self, store: &S) -> SessionResult<()> {
        for kind in &self.dirty {
            match kind {
                EntityKind::Knowledge => store.save(&self.knowledge)?,
                EntityKind::Task => store.save(&self.tasks)?,
                EntityKind::Schedule => store.save(&self.schedules)?,
                EntityKind::Assignment => store.save(self.assignments.as_slice())?,
            }
        }
        info!(
            "event=session_save module=service status=ok dirty_kinds={}",
            self.dirty.len()
        );
        self.dirty.clear();
        Ok(())
    }

    pub fn with_schedule_order(mut self, order: ScheduleOrder) -> Self {
        self.schedule_order = order;
        self
    }

    pub fn schedule_order(&self) -> ScheduleOrder {
        self.schedule_order
    }

    /// Whether any collection changed since load or the last save.
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_kind_dirty(&self, kind: EntityKind) -> bool {
        self.dirty.contains(&kind)
    }

    fn mark_dirty(&mut self, kind: EntityKind) {
        self.dirty.insert(kind);
    }

    pub fn knowledge(&self) -> &[KnowledgeEntry] {
        &self.knowledge
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn schedules(&self) -> &[ScheduleSlot] {
        &self.schedules
    }

    pub fn assignments(&self) -> &AssignmentBook {
        &self.assignments
    }

    pub fn find_knowledge(&self, id: KnowledgeId) -> Option<&KnowledgeEntry> {
        self.knowledge.iter().find(|entry| entry.id() == id)
    }

    /// Resolves a task's weak knowledge reference.
    pub fn knowledge_link<'a>(&'a self, task: &Task) -> KnowledgeLink<'a> {
        match task.knowledge_link_id() {
            None => KnowledgeLink::Unlinked,
            Some(id) => self
                .find_knowledge(id)
                .map_or(KnowledgeLink::Missing(id), KnowledgeLink::Live),
        }
    }

    // ---- knowledge ----

    /// Adds one knowledge entry.
    pub fn add_knowledge(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> SessionResult<&KnowledgeEntry> {
        let entry = KnowledgeEntry::new(title, content, tags)?;
        info!("event=knowledge_add module=service status=ok id={}", entry.id());
        self.knowledge.push(entry);
        self.mark_dirty(EntityKind::Knowledge);
        Ok(&self.knowledge[self.knowledge.len() - 1])
    }

    /// Resolves a token against the knowledge sequence as listed.
    pub fn resolve_knowledge(&self, token: &str) -> SessionResult<KnowledgeId> {
        resolve_token(token, &self.knowledge, KnowledgeEntry::id).map_err(|source| {
            SessionError::Resolve {
                kind: EntityKind::Knowledge,
                source,
            }
        })
    }

    /// Deletes one knowledge entry. Tasks linking to it keep the stale id.
    pub fn delete_knowledge(&mut self, token: &str) -> SessionResult<KnowledgeEntry> {
        let id = self.resolve_knowledge(token)?;
        let index = self
            .knowledge
            .iter()
            .position(|entry| entry.id() == id)
            .ok_or(SessionError::Resolve {
                kind: EntityKind::Knowledge,
                source: ResolveError::NotFound(token.to_string()),
            })?;
        let removed = self.knowledge.remove(index);
        let dangling = self
            .tasks
            .iter()
            .filter(|task| task.knowledge_link_id() == Some(id))
            .count();
        info!(
            "event=knowledge_delete module=service status=ok id={id} dangling_task_links={dangling}"
        );
        self.mark_dirty(EntityKind::Knowledge);
        Ok(removed)
    }

    /// Conjunctive keyword search over knowledge entries.
    pub fn search_knowledge(&self, query: &str) -> Vec<&KnowledgeEntry> {
        search_knowledge(&self.knowledge, query)
    }

    // ---- tasks ----

    /// Adds one task.
    ///
    /// `due_date` follows the boundary policy: malformed text is accepted and
    /// stored as unscheduled. `link_token`, when present and non-blank, must
    /// resolve to a knowledge entry or the task is not created.
    pub fn add_task(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: &str,
        link_token: Option<&str>,
    ) -> SessionResult<&Task> {
        let link_id = match link_token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => Some(self.resolve_knowledge(token)?),
            None => None,
        };
        let task = Task::new(title, description, due_date_or_unscheduled(due_date), link_id)?;
        info!(
            "event=task_add module=service status=ok id={} linked={}",
            task.id(),
            link_id.is_some()
        );
        self.tasks.push(task);
        self.mark_dirty(EntityKind::Task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Pending tasks, highest priority first.
    pub fn pending_tasks(&self) -> Vec<&Task> {
        pending_tasks(&self.tasks)
    }

    /// Completed tasks, highest priority first.
    pub fn completed_tasks(&self) -> Vec<&Task> {
        tasks_with_status(&self.tasks, TaskStatus::Complete)
    }

    /// Completes one pending task selected from the pending listing.
    pub fn complete_task(&mut self, token: &str) -> SessionResult<&Task> {
        let id = resolve_token(token, &self.pending_tasks(), |task| task.id()).map_err(
            |source| SessionError::Resolve {
                kind: EntityKind::Task,
                source,
            },
        )?;
        let index = self
            .tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or(SessionError::Resolve {
                kind: EntityKind::Task,
                source: ResolveError::NotFound(token.to_string()),
            })?;
        if self.tasks[index].mark_complete() {
            info!("event=task_complete module=service status=ok id={id}");
            self.mark_dirty(EntityKind::Task);
        }
        Ok(&self.tasks[index])
    }

    // ---- schedules ----

    pub fn add_schedule(
        &mut self,
        title: impl Into<String>,
        day_of_week: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        location: Option<String>,
    ) -> SessionResult<&ScheduleSlot> {
        let slot = ScheduleSlot::new(title, day_of_week, start_time, end_time, location)?;
        info!("event=schedule_add module=service status=ok id={}", slot.id());
        self.schedules.push(slot);
        self.mark_dirty(EntityKind::Schedule);
        Ok(&self.schedules[self.schedules.len() - 1])
    }

    /// Schedule slots in the session's day order.
    pub fn schedule_view(&self) -> Vec<&ScheduleSlot> {
        sorted_schedules(&self.schedules, self.schedule_order)
    }

    /// Removes one slot selected from [`Self::schedule_view`].
    pub fn remove_schedule(&mut self, token: &str) -> SessionResult<ScheduleSlot> {
        let id = resolve_token(token, &self.schedule_view(), |slot| slot.id()).map_err(
            |source| SessionError::Resolve {
                kind: EntityKind::Schedule,
                source,
            },
        )?;
        let index = self
            .schedules
            .iter()
            .position(|slot| slot.id() == id)
            .ok_or(SessionError::Resolve {
                kind: EntityKind::Schedule,
                source: ResolveError::NotFound(token.to_string()),
            })?;
        self.mark_dirty(EntityKind::Schedule);
        Ok(self.schedules.remove(index))
    }

    // ---- assignments ----

    pub fn add_assignment(
        &mut self,
        title: impl Into<String>,
        course: impl Into<String>,
        due_date: impl Into<String>,
        priority: i64,
        notes_markdown: impl Into<String>,
    ) -> SessionResult<&Assignment> {
        self.assignments
            .add(title, course, due_date, priority, notes_markdown)?;
        self.mark_dirty(EntityKind::Assignment);
        let added = &self.assignments.as_slice()[self.assignments.len() - 1];
        Ok(added)
    }

    /// Resolves a token against the due-date assignment listing.
    pub fn resolve_assignment(&self, token: &str) -> SessionResult<AssignmentId> {
        let displayed = self.assignments.list_by_due_date();
        self.assignments
            .resolve(token, &displayed)
            .map_err(|source| SessionError::Resolve {
                kind: EntityKind::Assignment,
                source,
            })
    }

    /// Links two assignments. Returns `false` when the link already existed.
    pub fn link_assignments(
        &mut self,
        source: AssignmentId,
        target: AssignmentId,
    ) -> SessionResult<bool> {
        let added = self.assignments.add_link(source, target)?;
        if added {
            self.mark_dirty(EntityKind::Assignment);
        }
        Ok(added)
    }

    pub fn unlink_assignments(
        &mut self,
        source: AssignmentId,
        target: AssignmentId,
    ) -> SessionResult<bool> {
        let removed = self.assignments.remove_link(source, target)?;
        if removed {
            self.mark_dirty(EntityKind::Assignment);
        }
        Ok(removed)
    }

    pub fn complete_assignment(&mut self, id: AssignmentId) -> SessionResult<bool> {
        let changed = self.assignments.complete(id)?;
        if changed {
            self.mark_dirty(EntityKind::Assignment);
        }
        Ok(changed)
    }

    /// Deletes an assignment and strips it from every other link list.
    pub fn delete_assignment(&mut self, id: AssignmentId) -> SessionResult<Assignment> {
        let removed = self.assignments.delete(id)?;
        self.mark_dirty(EntityKind::Assignment);
        Ok(removed)
    }

    pub fn linked_assignment_titles(&self, id: AssignmentId) -> SessionResult<Vec<LinkedTitle>> {
        Ok(self.assignments.linked_titles(id)?)
    }

    // ---- enrichment ----

    /// Runs one enrichment cycle and marks changed collections dirty.
    pub fn run_enrichment<E: Enricher + ?Sized>(&mut self, enricher: &E) -> CycleReport {
        let report = run_cycle(&mut self.knowledge, &mut self.tasks, enricher);
        if report.knowledge_updated() {
            self.mark_dirty(EntityKind::Knowledge);
        }
        if report.tasks_updated() {
            self.mark_dirty(EntityKind::Task);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::{KnowledgeLink, Session};
    use crate::model::EntityKind;

    #[test]
    fn failed_add_task_leaves_session_clean() {
        let mut session = Session::new();
        assert!(session.add_task("t", "d", "2025-01-01", Some("nope")).is_err());
        assert!(session.tasks().is_empty());
        assert!(!session.is_dirty());
    }

    #[test]
    fn knowledge_link_reports_missing_after_delete() {
        let mut session = Session::new();
        let entry_id = session.add_knowledge("k", "c", Vec::new()).unwrap().id();
        session.add_task("t", "d", "", Some("1")).unwrap();
        session.delete_knowledge(&entry_id.to_string()).unwrap();

        let task = &session.tasks()[0];
        assert_eq!(session.knowledge_link(task), KnowledgeLink::Missing(entry_id));
        assert!(session.is_kind_dirty(EntityKind::Knowledge));
    }
}
