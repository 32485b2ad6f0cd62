use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::task::{Priority, Task};
use crate::domain::task_validation::{validate_text, ValidationError};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Task not found: {id}")]
    TaskNotFound { id: Uuid },

    #[error("No task matches id `{input}`")]
    NoMatch { input: String },

    #[error("Id `{input}` matches more than one task")]
    Ambiguous { input: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Fields of a task that can be changed after creation. `None` leaves the
/// field untouched; there is no way to clear a due date once set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.priority.is_none() && self.due_date.is_none()
    }
}

/// In-memory task list, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Append a new task. Priority defaults to Low when not given.
    pub fn add(
        &mut self,
        text: &str,
        priority: Option<Priority>,
        due_date: Option<NaiveDate>,
    ) -> Result<Task, StoreError> {
        let text = validate_text(text)?;
        let task = Task::with_schedule(text, priority.unwrap_or_default(), due_date);

        info!(task_id = %task.id, "Added task");
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Remove by id. Removing an id that is not present is not an error.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() < before;

        if removed {
            info!(task_id = %id, "Removed task");
        }
        removed
    }

    /// Flip the completed flag, returning the new value.
    pub fn toggle_complete(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::TaskNotFound { id })?;

        task.toggle_complete();
        debug!(task_id = %id, completed = task.completed, "Toggled task");
        Ok(task.completed)
    }

    /// Apply a patch. Fields the patch leaves unset keep their current value.
    pub fn update(&mut self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::TaskNotFound { id })?;

        if let Some(text) = patch.text {
            task.text = validate_text(&text)?;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = Some(due_date);
        }
        task.updated_at = Utc::now();

        debug!(task_id = %id, "Updated task");
        Ok(task.clone())
    }

    /// Resolve a full id or a unique id prefix, as typed on the command line.
    pub fn resolve(&self, input: &str) -> Result<Uuid, StoreError> {
        if let Ok(id) = Uuid::parse_str(input) {
            return match self.get(id) {
                Some(_) => Ok(id),
                None => Err(StoreError::TaskNotFound { id }),
            };
        }

        let needle = input.to_ascii_lowercase();
        let matches: Vec<Uuid> = self
            .tasks
            .iter()
            .filter(|t| t.id.to_string().starts_with(&needle))
            .map(|t| t.id)
            .collect();

        match matches.as_slice() {
            [] => Err(StoreError::NoMatch {
                input: input.to_string(),
            }),
            [id] => Ok(*id),
            _ => Err(StoreError::Ambiguous {
                input: input.to_string(),
            }),
        }
    }
}
