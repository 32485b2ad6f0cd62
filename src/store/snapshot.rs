use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::task::Task;
use crate::store::task_store::TaskStore;

/// Load a store from a JSON snapshot. A missing file is an empty store.
pub fn load(path: &Path) -> Result<TaskStore> {
    if !path.exists() {
        debug!(path = %path.display(), "No snapshot found, starting empty");
        return Ok(TaskStore::new());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let tasks: Vec<Task> = serde_json::from_str(&raw)
        .with_context(|| format!("Snapshot {} is not valid", path.display()))?;

    debug!(path = %path.display(), count = tasks.len(), "Loaded snapshot");
    Ok(TaskStore::from_tasks(tasks))
}

/// Write the store back out, creating parent directories as needed.
pub fn save(store: &TaskStore, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(store.tasks())?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write snapshot {}", path.display()))?;

    debug!(path = %path.display(), count = store.len(), "Saved snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::Priority;
    use chrono::NaiveDate;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = load(&dir.path().join("tasks.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tasks.json");

        let mut store = TaskStore::new();
        let due = NaiveDate::parse_from_str("2024-03-15", "%Y-%m-%d").unwrap();
        let task = store.add("Buy milk", Some(Priority::High), Some(due)).unwrap();
        store.toggle_complete(task.id).unwrap();

        save(&store, &path).unwrap();
        let reloaded = load(&path).unwrap();

        assert_eq!(reloaded.tasks(), store.tasks());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "not json").unwrap();

        assert!(load(&path).is_err());
    }
}
