//! Assignment model for the peer-linked coursework variant.
//!
//! # Invariants
//! - `priority` lies in `[1, 5]`.
//! - `linked_ids` keeps insertion order, never contains duplicates and never
//!   contains the assignment's own id.

use crate::model::validation::{
    require_title, ValidationError, ASSIGNMENT_PRIORITY_MAX, ASSIGNMENT_PRIORITY_MIN,
};
use crate::model::EntityKind;
use serde::{Deserialize, Serialize};

/// Sequential identifier for assignments.
pub type AssignmentId = u64;

/// Assignment lifecycle state.
///
/// Capitalized legacy values (`Pending`, `Complete`) are accepted on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Complete")]
    Complete,
}

/// One coursework assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AssignmentWire")]
pub struct Assignment {
    id: AssignmentId,
    title: String,
    course: String,
    due_date: String,
    priority: u8,
    notes_markdown: String,
    status: AssignmentStatus,
    linked_ids: Vec<AssignmentId>,
}

impl Assignment {
    /// Creates a pending assignment.
    ///
    /// # Errors
    /// - `ValidationError::NilId` when `id == 0`.
    /// - `ValidationError::EmptyTitle` when `title` is blank.
    /// - `ValidationError::PriorityOutOfRange` when `priority` is outside `[1, 5]`.
    pub fn new(
        id: AssignmentId,
        title: impl Into<String>,
        course: impl Into<String>,
        due_date: impl Into<String>,
        priority: i64,
        notes_markdown: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if id == 0 {
            return Err(ValidationError::NilId {
                kind: EntityKind::Assignment,
            });
        }
        Ok(Self {
            id,
            title: require_title(EntityKind::Assignment, title.into())?,
            course: course.into(),
            due_date: due_date.into(),
            priority: validate_priority(priority)?,
            notes_markdown: notes_markdown.into(),
            status: AssignmentStatus::Pending,
            linked_ids: Vec::new(),
        })
    }

    pub fn id(&self) -> AssignmentId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn due_date(&self) -> &str {
        &self.due_date
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn notes_markdown(&self) -> &str {
        &self.notes_markdown
    }

    pub fn status(&self) -> AssignmentStatus {
        self.status
    }

    pub fn linked_ids(&self) -> &[AssignmentId] {
        &self.linked_ids
    }

    /// Returns `false` when already complete.
    pub fn mark_complete(&mut self) -> bool {
        if self.status == AssignmentStatus::Complete {
            return false;
        }
        self.status = AssignmentStatus::Complete;
        true
    }

    /// Appends `target` to `linked_ids` unless already present or equal to
    /// this assignment's id.
    ///
    /// Returns whether the link list changed.
    pub fn link_to(&mut self, target: AssignmentId) -> bool {
        if target == self.id || self.linked_ids.contains(&target) {
            return false;
        }
        self.linked_ids.push(target);
        true
    }

    /// Removes every occurrence of `target`. Returns whether anything was removed.
    pub fn unlink(&mut self, target: AssignmentId) -> bool {
        let before = self.linked_ids.len();
        self.linked_ids.retain(|id| *id != target);
        before != self.linked_ids.len()
    }
}

fn validate_priority(priority: i64) -> Result<u8, ValidationError> {
    if !(ASSIGNMENT_PRIORITY_MIN..=ASSIGNMENT_PRIORITY_MAX).contains(&priority) {
        return Err(ValidationError::PriorityOutOfRange(priority));
    }
    u8::try_from(priority).map_err(|_| ValidationError::PriorityOutOfRange(priority))
}

#[derive(Deserialize)]
struct AssignmentWire {
    id: AssignmentId,
    title: String,
    course: String,
    due_date: String,
    priority: i64,
    #[serde(default)]
    notes_markdown: String,
    #[serde(default)]
    status: AssignmentStatus,
    #[serde(default)]
    linked_ids: Option<Vec<AssignmentId>>,
}

impl TryFrom<AssignmentWire> for Assignment {
    type Error = ValidationError;

    fn try_from(wire: AssignmentWire) -> Result<Self, Self::Error> {
        let mut assignment = Self::new(
            wire.id,
            wire.title,
            wire.course,
            wire.due_date,
            wire.priority,
            wire.notes_markdown,
        )?;
        assignment.status = wire.status;
        // Replayed through `link_to` so stored duplicates or self-links are
        // dropped on decode.
        for target in wire.linked_ids.unwrap_or_default() {
            assignment.link_to(target);
        }
        Ok(assignment)
    }
}
