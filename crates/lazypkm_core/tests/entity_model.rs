use lazypkm_core::{
    parse_due_date, Assignment, AssignmentStatus, EntityKind, KnowledgeEntry, Priority,
    ScheduleSlot, Task, TaskStatus, ValidationError,
};
use uuid::Uuid;

#[test]
fn new_records_start_unprocessed_with_fresh_ids() {
    let entry = KnowledgeEntry::new("Title", "Body", vec!["t".into()]).unwrap();
    assert!(!entry.is_summarized());
    assert_eq!(entry.summary(), None);
    assert_eq!(entry.id().get_version_num(), 4);

    let other = KnowledgeEntry::new("Title", "Body", Vec::new()).unwrap();
    assert_ne!(entry.id(), other.id());

    let task = Task::new("Task", "desc", None, Some(entry.id())).unwrap();
    assert_eq!(task.status(), TaskStatus::Pending);
    assert_eq!(task.priority(), Priority::Medium);
    assert!(!task.is_prioritized());
    assert!(task.needs_prioritization());
    assert_eq!(task.knowledge_link_id(), Some(entry.id()));
}

#[test]
fn blank_titles_are_rejected_for_every_kind() {
    assert_eq!(
        KnowledgeEntry::new("  ", "c", Vec::new()).unwrap_err(),
        ValidationError::EmptyTitle {
            kind: EntityKind::Knowledge
        }
    );
    assert_eq!(
        Task::new("", "d", None, None).unwrap_err(),
        ValidationError::EmptyTitle {
            kind: EntityKind::Task
        }
    );
    assert_eq!(
        ScheduleSlot::new("\t", "Monday", "9", "10", None).unwrap_err(),
        ValidationError::EmptyTitle {
            kind: EntityKind::Schedule
        }
    );
    assert_eq!(
        Assignment::new(1, " ", "c", "2025-01-01", 3, "").unwrap_err(),
        ValidationError::EmptyTitle {
            kind: EntityKind::Assignment
        }
    );
}

#[test]
fn nil_and_zero_ids_are_rejected() {
    assert!(matches!(
        KnowledgeEntry::with_id(Uuid::nil(), "t", "c", Vec::new()),
        Err(ValidationError::NilId { .. })
    ));
    assert!(matches!(
        Task::with_id(Uuid::nil(), "t", "d", None, None),
        Err(ValidationError::NilId { .. })
    ));
    assert!(matches!(
        Assignment::new(0, "t", "c", "2025-01-01", 3, ""),
        Err(ValidationError::NilId { .. })
    ));
}

#[test]
fn task_completion_is_one_way_and_idempotent() {
    let mut task = Task::new("t", "", None, None).unwrap();
    assert!(task.mark_complete());
    assert!(!task.mark_complete());
    assert_eq!(task.status(), TaskStatus::Complete);
    assert!(!task.needs_prioritization());
}

#[test]
fn assignment_completion_is_idempotent() {
    let mut assignment = Assignment::new(3, "Quiz", "MATH", "2025-09-09", 2, "").unwrap();
    assert_eq!(assignment.status(), AssignmentStatus::Pending);
    assert!(assignment.mark_complete());
    assert!(!assignment.mark_complete());
    assert_eq!(assignment.priority(), 2);
}

#[test]
fn due_dates_must_be_strict_calendar_dates() {
    assert!(parse_due_date("2024-02-29").is_ok());
    for bad in ["2025-02-30", "2025-1-1", "01/02/2025", "", "2025-01-01T00:00"] {
        assert!(parse_due_date(bad).is_err(), "{bad:?} should be rejected");
    }
}

#[test]
fn schedule_location_blank_means_none() {
    let slot = ScheduleSlot::new("Lab", "Thursday", "13:00", "15:00", Some("  ".into())).unwrap();
    assert_eq!(slot.location(), None);
    assert_eq!(slot.weekday_ordinal(), Some(3));
}

#[test]
fn serialized_task_uses_wire_field_names() {
    let entry_id = Uuid::new_v4();
    let task = Task::new("t", "d", parse_due_date("2025-05-06").ok(), Some(entry_id)).unwrap();
    let value = serde_json::to_value(&task).unwrap();
    assert_eq!(value["due_date"], "2025-05-06");
    assert_eq!(value["status"], "pending");
    assert_eq!(value["priority"], "medium");
    assert_eq!(value["is_prioritized"], false);
    assert_eq!(value["knowledge_link_id"], entry_id.to_string());
}
