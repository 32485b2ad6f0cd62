use chrono::{NaiveDate, Utc};

use crate::domain::task::Task;

/// Read-side split of the task list into "due today" and "upcoming",
/// each sorted by task text.
#[derive(Debug, Clone, Default)]
pub struct ScheduleView {
    pub today: Vec<Task>,
    pub upcoming: Vec<Task>,
}

impl ScheduleView {
    pub fn build(tasks: &[Task], today: NaiveDate) -> Self {
        let mut today_tasks: Vec<Task> = tasks
            .iter()
            .filter(|t| t.is_due_today(today))
            .cloned()
            .collect();

        // Anything else with a due date, including past-due tasks
        let mut upcoming: Vec<Task> = tasks
            .iter()
            .filter(|t| t.due_date.is_some() && !t.is_due_today(today))
            .cloned()
            .collect();

        today_tasks.sort_by(|a, b| a.text.cmp(&b.text));
        upcoming.sort_by(|a, b| a.text.cmp(&b.text));

        Self {
            today: today_tasks,
            upcoming,
        }
    }

    /// Build against the current UTC calendar date.
    pub fn for_now(tasks: &[Task]) -> Self {
        Self::build(tasks, Utc::now().date_naive())
    }

    pub fn is_empty(&self) -> bool {
        self.today.is_empty() && self.upcoming.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::Priority;
    use crate::store::TaskStore;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn store_with_schedule() -> TaskStore {
        let mut store = TaskStore::new();
        store
            .add("walk dog", None, Some(date("2024-03-15")))
            .unwrap();
        store
            .add("buy milk", Some(Priority::High), Some(date("2024-03-15")))
            .unwrap();
        store
            .add("file taxes", None, Some(date("2024-04-01")))
            .unwrap();
        store
            .add("call mom", None, Some(date("2024-03-01")))
            .unwrap();
        store.add("no due date", None, None).unwrap();
        store
    }

    #[test]
    fn test_partition_today_vs_upcoming() {
        let store = store_with_schedule();
        let view = ScheduleView::build(store.tasks(), date("2024-03-15"));

        let today: Vec<&str> = view.today.iter().map(|t| t.text.as_str()).collect();
        let upcoming: Vec<&str> = view.upcoming.iter().map(|t| t.text.as_str()).collect();

        assert_eq!(today, ["buy milk", "walk dog"]);
        // Past-due tasks land in upcoming, undated tasks in neither
        assert_eq!(upcoming, ["call mom", "file taxes"]);
    }

    #[test]
    fn test_sections_sorted_by_text() {
        let mut store = TaskStore::new();
        store.add("zebra", None, Some(date("2024-03-15"))).unwrap();
        store.add("apple", None, Some(date("2024-03-15"))).unwrap();
        store.add("mango", None, Some(date("2024-03-15"))).unwrap();

        let view = ScheduleView::build(store.tasks(), date("2024-03-15"));
        let today: Vec<&str> = view.today.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(today, ["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_is_empty() {
        let mut store = TaskStore::new();
        assert!(ScheduleView::build(store.tasks(), date("2024-03-15")).is_empty());

        // Undated tasks leave the view empty
        store.add("no due date", None, None).unwrap();
        assert!(ScheduleView::build(store.tasks(), date("2024-03-15")).is_empty());

        store.add("dated", None, Some(date("2024-05-01"))).unwrap();
        assert!(!ScheduleView::build(store.tasks(), date("2024-03-15")).is_empty());
    }
}
