//! Weekly schedule slot model.
//!
//! Slots carry no links to other records and have an independent lifecycle.

use crate::model::validation::{require_title, ValidationError};
use crate::model::EntityKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for schedule slots.
pub type ScheduleSlotId = Uuid;

/// Calendar order of day names, Monday first.
const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// One recurring slot in a weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleSlotWire")]
pub struct ScheduleSlot {
    id: ScheduleSlotId,
    title: String,
    day_of_week: String,
    start_time: String,
    end_time: String,
    location: Option<String>,
}

impl ScheduleSlot {
    /// Creates a slot with a generated id.
    ///
    /// # Errors
    /// - `ValidationError::EmptyTitle` when `title` is blank.
    pub fn new(
        title: impl Into<String>,
        day_of_week: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        location: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: Uuid::new_v4(),
            title: require_title(EntityKind::Schedule, title.into())?,
            day_of_week: day_of_week.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            location: location.filter(|value| !value.trim().is_empty()),
        })
    }

    pub fn id(&self) -> ScheduleSlotId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn day_of_week(&self) -> &str {
        &self.day_of_week
    }

    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    pub fn end_time(&self) -> &str {
        &self.end_time
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Monday=0..Sunday=6, case-insensitive; `None` for unknown names.
    pub fn weekday_ordinal(&self) -> Option<usize> {
        weekday_ordinal(&self.day_of_week)
    }
}

/// Maps a day name to its calendar ordinal (Monday=0..Sunday=6).
pub fn weekday_ordinal(day: &str) -> Option<usize> {
    let normalized = day.trim().to_ascii_lowercase();
    WEEKDAYS.iter().position(|name| *name == normalized)
}

#[derive(Deserialize)]
struct ScheduleSlotWire {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    title: String,
    day_of_week: String,
    #[serde(default)]
    start_time: String,
    #[serde(default)]
    end_time: String,
    #[serde(default)]
    location: Option<String>,
}

impl TryFrom<ScheduleSlotWire> for ScheduleSlot {
    type Error = ValidationError;

    fn try_from(wire: ScheduleSlotWire) -> Result<Self, Self::Error> {
        if wire.id.is_nil() {
            return Err(ValidationError::NilId {
                kind: EntityKind::Schedule,
            });
        }
        let mut slot = Self::new(
            wire.title,
            wire.day_of_week,
            wire.start_time,
            wire.end_time,
            wire.location,
        )?;
        slot.id = wire.id;
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::weekday_ordinal;

    #[test]
    fn weekday_ordinal_is_case_insensitive() {
        assert_eq!(weekday_ordinal("Monday"), Some(0));
        assert_eq!(weekday_ordinal(" SUNDAY "), Some(6));
        assert_eq!(weekday_ordinal("Funday"), None);
    }
}
