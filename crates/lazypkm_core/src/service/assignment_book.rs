//! Assignment collection with actively maintained peer links.
//!
//! # Responsibility
//! - Assign sequential ids and own assignment create/complete/delete.
//! - Maintain the `linked_ids` graph between assignments.
//!
//! # Invariants
//! - Links only ever name assignments that exist in this book.
//! - Deleting an assignment strips its id from every remaining `linked_ids`.
//! - Within a session ids are not reused: `next_id` only grows. A book rebuilt
//!   from records restarts at the highest surviving id plus one.

use crate::link::resolver::{resolve_token, ResolveError};
use crate::model::assignment::{Assignment, AssignmentId};
use crate::model::date::parse_due_date;
use crate::model::validation::ValidationError;
use log::{info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from assignment book operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    Validation(ValidationError),
    NotFound(AssignmentId),
    /// `add_link(a, a)`.
    SelfLink(AssignmentId),
}

impl Display for AssignmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "assignment not found: {id}"),
            Self::SelfLink(id) => write!(f, "assignment {id} cannot link to itself"),
        }
    }
}

impl Error for AssignmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for AssignmentError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Id and title of one linked assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedTitle {
    pub id: AssignmentId,
    pub title: String,
}

/// Ordered assignment collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentBook {
    assignments: Vec<Assignment>,
    next_id: AssignmentId,
}

impl Default for AssignmentBook {
    fn default() -> Self {
        Self {
            assignments: Vec::new(),
            next_id: 1,
        }
    }
}

impl AssignmentBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from loaded records.
    ///
    /// Records repeating an earlier id are dropped, and links to ids that are
    /// not present are removed, so the loaded graph satisfies the book's
    /// invariants.
    pub fn from_records(records: Vec<Assignment>) -> Self {
        let mut seen = BTreeSet::new();
        let mut assignments = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert(record.id()) {
                assignments.push(record);
            } else {
                warn!(
                    "event=assignment_duplicate module=service status=warn id={}",
                    record.id()
                );
            }
        }

        for assignment in &mut assignments {
            let dangling: Vec<AssignmentId> = assignment
                .linked_ids()
                .iter()
                .copied()
                .filter(|id| !seen.contains(id))
                .collect();
            for id in dangling {
                assignment.unlink(id);
            }
        }

        let next_id = seen.iter().next_back().map_or(1, |max| max + 1);
        Self {
            assignments,
            next_id,
        }
    }

    pub fn as_slice(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Id the next `add` will assign.
    pub fn next_id(&self) -> AssignmentId {
        self.next_id
    }

    pub fn get(&self, id: AssignmentId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id() == id)
    }

    fn get_mut(&mut self, id: AssignmentId) -> Result<&mut Assignment, AssignmentError> {
        self.assignments
            .iter_mut()
            .find(|a| a.id() == id)
            .ok_or(AssignmentError::NotFound(id))
    }

    /// Creates an assignment with the next sequential id.
    ///
    /// # Errors
    /// - `AssignmentError::Validation` for a blank title or a priority
    ///   outside `[1, 5]`. No id is consumed on failure.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        course: impl Into<String>,
        due_date: impl Into<String>,
        priority: i64,
        notes_markdown: impl Into<String>,
    ) -> Result<&Assignment, AssignmentError> {
        let assignment = Assignment::new(
            self.next_id,
            title,
            course,
            due_date,
            priority,
            notes_markdown,
        )?;
        self.next_id += 1;
        info!(
            "event=assignment_add module=service status=ok id={}",
            assignment.id()
        );
        self.assignments.push(assignment);
        Ok(&self.assignments[self.assignments.len() - 1])
    }

    /// Marks one assignment complete. Returns `false` if it already was.
    pub fn complete(&mut self, id: AssignmentId) -> Result<bool, AssignmentError> {
        Ok(self.get_mut(id)?.mark_complete())
    }

    /// Links `source -> target`.
    ///
    /// Returns `Ok(false)` when the link already exists.
    ///
    /// # Errors
    /// - `SelfLink` when `source == target`.
    /// - `NotFound` when either id is absent.
    pub fn add_link(
        &mut self,
        source: AssignmentId,
        target: AssignmentId,
    ) -> Result<bool, AssignmentError> {
        if source == target {
            return Err(AssignmentError::SelfLink(source));
        }
        if self.get(target).is_none() {
            return Err(AssignmentError::NotFound(target));
        }
        Ok(self.get_mut(source)?.link_to(target))
    }

    /// Removes `source -> target`. Returns whether a link was removed.
    pub fn remove_link(
        &mut self,
        source: AssignmentId,
        target: AssignmentId,
    ) -> Result<bool, AssignmentError> {
        Ok(self.get_mut(source)?.unlink(target))
    }

    /// Deletes one assignment and every link pointing at it.
    pub fn delete(&mut self, id: AssignmentId) -> Result<Assignment, AssignmentError> {
        let index = self
            .assignments
            .iter()
            .position(|a| a.id() == id)
            .ok_or(AssignmentError::NotFound(id))?;
        let removed = self.assignments.remove(index);

        let mut cleaned = 0usize;
        for other in &mut self.assignments {
            if other.unlink(id) {
                cleaned += 1;
            }
        }
        info!("event=assignment_delete module=service status=ok id={id} links_removed={cleaned}");
        Ok(removed)
    }

    /// Id and title of each assignment `id` links to, in link order.
    pub fn linked_titles(&self, id: AssignmentId) -> Result<Vec<LinkedTitle>, AssignmentError> {
        let source = self.get(id).ok_or(AssignmentError::NotFound(id))?;
        Ok(source
            .linked_ids()
            .iter()
            .filter_map(|target| self.get(*target))
            .map(|target| LinkedTitle {
                id: target.id(),
                title: target.title().to_string(),
            })
            .collect())
    }

    /// Assignments by due date ascending; unparsable dates come last.
    pub fn list_by_due_date(&self) -> Vec<&Assignment> {
        let mut ordered: Vec<&Assignment> = self.assignments.iter().collect();
        ordered.sort_by_key(|a| {
            let due = parse_due_date(a.due_date()).ok();
            (due.is_none(), due)
        });
        ordered
    }

    /// Resolves a token against `displayed` (ordinal, id prefix or full id).
    pub fn resolve(
        &self,
        token: &str,
        displayed: &[&Assignment],
    ) -> Result<AssignmentId, ResolveError> {
        resolve_token(token, displayed, |a| a.id())
    }
}
