//! Task, schedule and knowledge listings.

use crate::model::knowledge::KnowledgeEntry;
use crate::model::schedule::ScheduleSlot;
use crate::model::task::{Task, TaskStatus};
use std::cmp::Reverse;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Day ordering for schedule listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleOrder {
    /// Monday..Sunday; unrecognized day names follow, alphabetically.
    #[default]
    Calendar,
    /// Plain string order of `day_of_week`, so "Friday" sorts before "Monday".
    Lexicographic,
}

impl ScheduleOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Lexicographic => "lexicographic",
        }
    }
}

/// Unsupported `ScheduleOrder` name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScheduleOrder(pub String);

impl Display for UnknownScheduleOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported schedule order `{}`; expected calendar|lexicographic",
            self.0
        )
    }
}

impl Error for UnknownScheduleOrder {}

impl FromStr for ScheduleOrder {
    type Err = UnknownScheduleOrder;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "calendar" => Ok(Self::Calendar),
            "lexicographic" | "alphabetical" => Ok(Self::Lexicographic),
            other => Err(UnknownScheduleOrder(other.to_string())),
        }
    }
}

/// Tasks with `status`, highest priority first.
pub fn tasks_with_status(tasks: &[Task], status: TaskStatus) -> Vec<&Task> {
    let mut filtered: Vec<&Task> = tasks.iter().filter(|t| t.status() == status).collect();
    filtered.sort_by_key(|t| Reverse(t.priority()));
    filtered
}

/// Pending tasks, highest priority first; the view task ordinals refer to.
pub fn pending_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks_with_status(tasks, TaskStatus::Pending)
}

/// All tasks by due date ascending; unscheduled tasks come last.
pub fn tasks_by_due_date(tasks: &[Task]) -> Vec<&Task> {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by_key(|t| (t.due_date().is_none(), t.due_date()));
    ordered
}

/// Schedule slots ordered by day.
pub fn sorted_schedules(slots: &[ScheduleSlot], order: ScheduleOrder) -> Vec<&ScheduleSlot> {
    let mut ordered: Vec<&ScheduleSlot> = slots.iter().collect();
    match order {
        ScheduleOrder::Lexicographic => {
            ordered.sort_by(|a, b| a.day_of_week().cmp(b.day_of_week()))
        }
        ScheduleOrder::Calendar => ordered.sort_by_key(|slot| {
            let ordinal = slot.weekday_ordinal();
            (ordinal.is_none(), ordinal, slot.day_of_week().to_ascii_lowercase())
        }),
    }
    ordered
}

/// Slots whose day matches `day`, case-insensitively, in sequence order.
pub fn schedules_on<'a>(slots: &'a [ScheduleSlot], day: &str) -> Vec<&'a ScheduleSlot> {
    let wanted = day.trim();
    slots
        .iter()
        .filter(|slot| slot.day_of_week().trim().eq_ignore_ascii_case(wanted))
        .collect()
}

/// Conjunctive keyword search over title, content and tags.
///
/// Every whitespace-delimited token of `query` must occur, case-insensitively,
/// as a substring of the joined haystack. A blank query matches nothing.
pub fn search_knowledge<'a>(entries: &'a [KnowledgeEntry], query: &str) -> Vec<&'a KnowledgeEntry> {
    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if tokens.is_empty() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|entry| {
            let haystack = format!(
                "{} {} {}",
                entry.title(),
                entry.content(),
                entry.tags().join(" ")
            )
            .to_lowercase();
            tokens.iter().all(|token| haystack.contains(token.as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::ScheduleOrder;

    #[test]
    fn schedule_order_parses_known_names() {
        assert_eq!("Calendar".parse::<ScheduleOrder>(), Ok(ScheduleOrder::Calendar));
        assert_eq!(
            "alphabetical".parse::<ScheduleOrder>(),
            Ok(ScheduleOrder::Lexicographic)
        );
        assert!("weekly".parse::<ScheduleOrder>().is_err());
    }
}
