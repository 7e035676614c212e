//! Task domain model.
//!
//! # Responsibility
//! - Define the actionable task record, its lifecycle and priority state.
//!
//! # Invariants
//! - `status` only moves `pending -> complete`.
//! - `is_prioritized` is an explicit flag; it is never inferred from
//!   `priority`.
//! - `knowledge_link_id` is a weak reference and may name a deleted entry.

use crate::model::date::{due_date_serde, timestamp_serde};
use crate::model::knowledge::KnowledgeId;
use crate::model::validation::{require_title, ValidationError};
use crate::model::EntityKind;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for tasks.
pub type TaskId = Uuid;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Complete,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Complete => "complete",
        }
    }
}

/// Task priority with total order `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses provider output such as `" High\n"`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One personal task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskWire")]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    /// `None` means unscheduled.
    #[serde(with = "due_date_serde")]
    due_date: Option<NaiveDate>,
    status: TaskStatus,
    priority: Priority,
    knowledge_link_id: Option<KnowledgeId>,
    #[serde(with = "timestamp_serde")]
    created_at: DateTime<Utc>,
    is_prioritized: bool,
}

impl Task {
    /// Creates a pending, medium-priority, unprioritized task.
    ///
    /// # Errors
    /// - `ValidationError::EmptyTitle` when `title` is blank.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: Option<NaiveDate>,
        knowledge_link_id: Option<KnowledgeId>,
    ) -> Result<Self, ValidationError> {
        Self::with_id(
            Uuid::new_v4(),
            title,
            description,
            due_date,
            knowledge_link_id,
        )
    }

    /// Creates a task with a caller-provided id.
    pub fn with_id(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: Option<NaiveDate>,
        knowledge_link_id: Option<KnowledgeId>,
    ) -> Result<Self, ValidationError> {
        if id.is_nil() {
            return Err(ValidationError::NilId {
                kind: EntityKind::Task,
            });
        }
        Ok(Self {
            id,
            title: require_title(EntityKind::Task, title.into())?,
            description: description.into(),
            due_date,
            status: TaskStatus::Pending,
            priority: Priority::default(),
            knowledge_link_id,
            created_at: Utc::now(),
            is_prioritized: false,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn knowledge_link_id(&self) -> Option<KnowledgeId> {
        self.knowledge_link_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_prioritized(&self) -> bool {
        self.is_prioritized
    }

    /// Whether the next enrichment cycle should prioritize this task.
    pub fn needs_prioritization(&self) -> bool {
        self.is_pending() && !self.is_prioritized
    }

    /// Commits an enrichment priority and marks the task processed.
    pub fn apply_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.is_prioritized = true;
    }

    /// Clears the processed flag so the next cycle prioritizes again.
    ///
    /// The current priority is kept until a new one is committed.
    pub fn reset_enrichment(&mut self) {
        self.is_prioritized = false;
    }

    /// Moves the task to `complete`.
    ///
    /// Returns `false` when the task was already complete.
    pub fn mark_complete(&mut self) -> bool {
        if self.status == TaskStatus::Complete {
            return false;
        }
        self.status = TaskStatus::Complete;
        true
    }
}

#[derive(Deserialize)]
struct TaskWire {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    title: String,
    description: String,
    #[serde(with = "due_date_serde")]
    due_date: Option<NaiveDate>,
    #[serde(default)]
    status: TaskStatus,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    knowledge_link_id: Option<Uuid>,
    #[serde(default = "Utc::now", with = "timestamp_serde")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    is_prioritized: bool,
}

impl TryFrom<TaskWire> for Task {
    type Error = ValidationError;

    fn try_from(wire: TaskWire) -> Result<Self, Self::Error> {
        let mut task = Self::with_id(
            wire.id,
            wire.title,
            wire.description,
            wire.due_date,
            wire.knowledge_link_id,
        )?;
        task.status = wire.status;
        task.priority = wire.priority;
        task.created_at = wire.created_at;
        task.is_prioritized = wire.is_prioritized;
        Ok(task)
    }
}
