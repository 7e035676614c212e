use lazypkm_core::{
    Assignment, EntityKind, JsonFileStore, KnowledgeEntry, MemoryStore, Priority, RecordStore,
    ScheduleSlot, Session, StoreError, Task, TaskStatus,
};
use serde_json::json;
use std::fs;

#[test]
fn missing_containers_load_as_empty_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("never-created"));
    let session = Session::load(&store).unwrap();
    assert!(session.knowledge().is_empty());
    assert!(session.tasks().is_empty());
    assert!(session.schedules().is_empty());
    assert!(session.assignments().is_empty());
}

#[test]
fn save_then_load_reproduces_records_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());

    let mut session = Session::new();
    session
        .add_knowledge("First", "alpha", vec!["a".into(), "b".into()])
        .unwrap();
    session.add_knowledge("Second", "beta", Vec::new()).unwrap();
    session
        .add_task("Linked", "desc", "2025-02-03", Some("2"))
        .unwrap();
    session.add_task("Loose", "", "not a date", None).unwrap();
    session
        .add_schedule("Lecture", "Tuesday", "09:00", "10:30", Some("Hall B".into()))
        .unwrap();
    session
        .add_assignment("Essay", "ENG 202", "2025-11-25", 4, "# outline")
        .unwrap();
    session.save(&store).unwrap();
    assert!(!session.is_dirty());

    let reloaded = Session::load(&store).unwrap();
    assert_eq!(reloaded.knowledge(), session.knowledge());
    assert_eq!(reloaded.tasks(), session.tasks());
    assert_eq!(reloaded.schedules(), session.schedules());
    assert_eq!(reloaded.assignments(), session.assignments());

    for kind in [
        EntityKind::Knowledge,
        EntityKind::Task,
        EntityKind::Schedule,
        EntityKind::Assignment,
    ] {
        assert!(store.container_path(kind).is_file());
    }
    assert!(dir.path().join("tasks.json").is_file());
}

#[test]
fn save_of_loaded_data_is_a_fixed_point() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    let mut session = Session::new();
    session.add_knowledge("k", "c", Vec::new()).unwrap();
    session.add_task("t", "d", "2025-01-01", Some("1")).unwrap();
    session.save(&store).unwrap();
    let first = fs::read_to_string(dir.path().join("tasks.json")).unwrap();

    let reloaded = Session::load(&store).unwrap();
    store.save(reloaded.tasks()).unwrap();
    let second = fs::read_to_string(dir.path().join("tasks.json")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn corrupt_container_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("knowledge.json"), "{ not json").unwrap();
    fs::write(dir.path().join("tasks.json"), r#"{"title": "object"}"#).unwrap();
    fs::write(dir.path().join("schedules.json"), "").unwrap();

    let store = JsonFileStore::new(dir.path());
    let knowledge: Vec<KnowledgeEntry> = store.load().unwrap();
    let tasks: Vec<Task> = store.load().unwrap();
    let slots: Vec<ScheduleSlot> = store.load().unwrap();
    assert!(knowledge.is_empty());
    assert!(tasks.is_empty());
    assert!(slots.is_empty());
}

#[test]
fn session_save_leaves_corrupt_container_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let damaged = r#"[{"title":"precious","content":"data""#;
    fs::write(dir.path().join("knowledge.json"), damaged).unwrap();
    let store = JsonFileStore::new(dir.path());

    let mut session = Session::load(&store).unwrap();
    assert!(session.knowledge().is_empty());
    session.save(&store).unwrap();
    session.add_task("new task", "", "", None).unwrap();
    session.save(&store).unwrap();

    let on_disk = fs::read_to_string(dir.path().join("knowledge.json")).unwrap();
    assert_eq!(on_disk, damaged);
    assert!(dir.path().join("tasks.json").is_file());
    assert!(!dir.path().join("schedules.json").exists());
}

#[test]
fn non_utf8_container_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("knowledge.json"), [0xff, 0xfe, 0x00]).unwrap();
    let store = JsonFileStore::new(dir.path());
    let knowledge: Vec<KnowledgeEntry> = store.load().unwrap();
    assert!(knowledge.is_empty());
}

#[test]
fn unreadable_container_path_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("tasks.json")).unwrap();
    let store = JsonFileStore::new(dir.path());
    let err = store.load::<Task>().unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}

#[test]
fn invalid_records_are_skipped_and_defaults_filled() {
    let dir = tempfile::tempdir().unwrap();
    let contents = json!([
        {"title": "Minimal", "content": "only required fields"},
        {"title": "   ", "content": "blank title"},
        {"content": "missing title"},
        {
            "id": "6f1c4c2e-8a55-4a4f-9d0e-0d7e0f2f6a11",
            "title": "Legacy",
            "content": "naive timestamp",
            "tags": null,
            "created_at": "2024-05-01T08:30:00",
            "summary": "kept",
            "is_summarized": false
        }
    ]);
    fs::write(dir.path().join("knowledge.json"), contents.to_string()).unwrap();

    let store = JsonFileStore::new(dir.path());
    let entries: Vec<KnowledgeEntry> = store.load().unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].title(), "Minimal");
    assert!(entries[0].tags().is_empty());
    assert!(!entries[0].is_summarized());
    assert_eq!(entries[0].summary(), None);

    let legacy = &entries[1];
    assert_eq!(legacy.id().to_string(), "6f1c4c2e-8a55-4a4f-9d0e-0d7e0f2f6a11");
    assert_eq!(legacy.created_at().to_rfc3339(), "2024-05-01T08:30:00+00:00");
    assert!(legacy.is_summarized());
    assert_eq!(legacy.summary(), Some("kept"));
}

#[test]
fn task_wire_defaults_and_required_fields() {
    let store = MemoryStore::new();
    let contents = json!([
        {"title": "No due key", "description": "d"},
        {"title": "Null due", "description": "d", "due_date": null},
        {"title": "Bad due", "description": "d", "due_date": "03/04/2025"},
        {
            "title": "Full",
            "description": "d",
            "due_date": "2025-03-04",
            "status": "complete",
            "priority": "high",
            "is_prioritized": true
        }
    ]);
    store.put_raw(EntityKind::Task, contents.to_string());

    let tasks: Vec<Task> = store.load().unwrap();
    let titles: Vec<&str> = tasks.iter().map(Task::title).collect();
    assert_eq!(titles, ["Null due", "Bad due", "Full"]);

    assert_eq!(tasks[0].due_date(), None);
    assert_eq!(tasks[0].status(), TaskStatus::Pending);
    assert_eq!(tasks[0].priority(), Priority::Medium);
    assert!(!tasks[0].is_prioritized());
    assert_eq!(tasks[1].due_date(), None);

    assert_eq!(tasks[2].status(), TaskStatus::Complete);
    assert_eq!(tasks[2].priority(), Priority::High);
    assert!(tasks[2].is_prioritized());
    assert_eq!(
        tasks[2].due_date().map(|d| d.to_string()).as_deref(),
        Some("2025-03-04")
    );
}

#[test]
fn assignment_wire_accepts_legacy_status_and_rejects_bad_priority() {
    let store = MemoryStore::new();
    let contents = json!([
        {
            "id": 1, "title": "Essay", "course": "ENG", "due_date": "2025-11-25",
            "priority": 5, "status": "Complete", "linked_ids": [2, 2, 1]
        },
        {"id": 2, "title": "Lab", "course": "CHEM", "due_date": "2025-11-20", "priority": 3},
        {"id": 3, "title": "Too high", "course": "X", "due_date": "2025-01-01", "priority": 9},
        {"id": 4, "title": "No course", "due_date": "2025-01-01", "priority": 1}
    ]);
    store.put_raw(EntityKind::Assignment, contents.to_string());

    let assignments: Vec<Assignment> = store.load().unwrap();
    assert_eq!(assignments.len(), 2);
    assert_eq!(assignments[0].linked_ids(), &[2]);
    assert_eq!(
        assignments[0].status(),
        lazypkm_core::AssignmentStatus::Complete
    );
    assert_eq!(assignments[1].notes_markdown(), "");
}

#[test]
fn memory_store_round_trips_through_session() {
    let store = MemoryStore::new();
    let mut session = Session::new();
    session
        .add_schedule("Gym", "friday", "18:00", "19:00", None)
        .unwrap();
    session.save(&store).unwrap();

    let raw = store.raw(EntityKind::Schedule).unwrap();
    assert!(raw.trim_start().starts_with('['));
    let reloaded = Session::load(&store).unwrap();
    assert_eq!(reloaded.schedules(), session.schedules());
}
