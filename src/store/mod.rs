pub mod snapshot;
pub mod task_store;

pub use task_store::{StoreError, TaskPatch, TaskStore};
