use chrono::NaiveDate;
use taskdeck::domain::task::Priority;
use taskdeck::services::{ExportFormat, ScheduleView, TaskSummary};
use taskdeck::store::{snapshot, TaskPatch, TaskStore};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_full_task_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("tasks.json");
    let today = date("2024-03-15");

    // Build up a small list
    let mut store = TaskStore::new();
    let report = store
        .add("write report", Some(Priority::High), Some(today))
        .unwrap();
    store
        .add("book flights", None, Some(date("2024-03-16")))
        .unwrap();
    store.add("water plants", None, Some(today)).unwrap();
    store.add("sort photos", None, None).unwrap();

    // Edit one, complete one
    store
        .update(
            report.id,
            TaskPatch {
                text: Some("write quarterly report".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    store.toggle_complete(report.id).unwrap();

    // Survives a snapshot round trip
    snapshot::save(&store, &data_file).unwrap();
    let store = snapshot::load(&data_file).unwrap();
    assert_eq!(store.len(), 4);

    // Schedule view: both today-tasks sorted, tomorrow's in upcoming,
    // the undated task in neither
    let view = ScheduleView::build(store.tasks(), today);
    let today_texts: Vec<&str> = view.today.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(today_texts, ["water plants", "write quarterly report"]);
    assert_eq!(view.upcoming.len(), 1);
    assert_eq!(view.upcoming[0].text, "book flights");
    assert!(view.upcoming[0].is_due_soon(today));

    // Export splits completed from pending
    let summary = TaskSummary::build(store.tasks()).unwrap();
    assert_eq!(summary.completed.len(), 1);
    assert_eq!(summary.completed[0].text, "write quarterly report");
    assert_eq!(summary.pending.len(), 3);

    let out = dir.path().join("summary.pdf");
    summary.write_to_file(ExportFormat::Pdf, &out).unwrap();
    assert!(std::fs::read(&out).unwrap().starts_with(b"%PDF"));
}

#[test]
fn test_deleted_tasks_leave_every_view() {
    let mut store = TaskStore::new();
    let today = date("2024-03-15");
    let keep = store.add("keep me", None, Some(today)).unwrap();
    let discard = store.add("drop me", None, Some(today)).unwrap();

    assert!(store.remove(discard.id));

    let view = ScheduleView::build(store.tasks(), today);
    assert_eq!(view.today.len(), 1);
    assert_eq!(view.today[0].id, keep.id);

    let summary = TaskSummary::build(store.tasks()).unwrap();
    assert_eq!(summary.pending.len(), 1);
    assert!(summary.completed.is_empty());
}

#[test]
fn test_empty_store_cannot_export() {
    let store = TaskStore::new();
    assert!(TaskSummary::build(store.tasks()).is_err());
}
