//! Validation errors shared by record constructors and decoders.

use crate::model::EntityKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lowest accepted assignment priority.
pub const ASSIGNMENT_PRIORITY_MIN: i64 = 1;
/// Highest accepted assignment priority.
pub const ASSIGNMENT_PRIORITY_MAX: i64 = 5;

/// Record-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `title` is empty or whitespace only.
    EmptyTitle { kind: EntityKind },
    /// Assignment priority outside `[1, 5]`.
    PriorityOutOfRange(i64),
    /// Identifier is the nil UUID or zero.
    NilId { kind: EntityKind },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle { kind } => write!(f, "{kind} title must not be empty"),
            Self::PriorityOutOfRange(value) => write!(
                f,
                "priority must be between {ASSIGNMENT_PRIORITY_MIN} and {ASSIGNMENT_PRIORITY_MAX}, got {value}"
            ),
            Self::NilId { kind } => write!(f, "{kind} id must not be nil"),
        }
    }
}

impl Error for ValidationError {}

/// Rejects blank titles and returns the title unchanged otherwise.
pub(crate) fn require_title(kind: EntityKind, title: String) -> Result<String, ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle { kind });
    }
    Ok(title)
}
