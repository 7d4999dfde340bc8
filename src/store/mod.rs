//! Task storage module with pluggable backends.
//!
//! Supports:
//! - `memory`: In-memory storage (non-persistent, for testing)
//! - `sqlite`: SQLite database (default)
//!
//! Every mutating call is one unit of work: the status refresh batch, the
//! priority shift plus insert, and an edit that moves a task all commit
//! together or not at all.

mod memory;
mod sqlite;

pub use memory::InMemoryTaskStore;
pub use sqlite::SqliteTaskStore;

use crate::task::{NewTask, Task, TaskId, TaskOrder, TaskPatch, ValidationError};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;

/// Errors from the storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to prepare storage directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Invalid task update: {0}")]
    Invalid(#[from] ValidationError),
}

/// Task store trait - implemented by all storage backends.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Whether this store persists data across restarts.
    fn is_persistent(&self) -> bool;

    /// Re-derive New/Stale for every non-completed task and persist the
    /// changes atomically. Returns how many tasks changed.
    async fn refresh_statuses(&self, today: NaiveDate) -> Result<usize, StoreError>;

    /// List all tasks in the given order.
    async fn list_tasks(&self, order: TaskOrder) -> Result<Vec<Task>, StoreError>;

    /// Get a single task by ID.
    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, StoreError>;

    /// Shift every task at or above the requested priority up by one, then
    /// insert the new task at that priority.
    async fn create_task(&self, task: NewTask, today: NaiveDate) -> Result<Task, StoreError>;

    /// Apply a partial update. Returns `None` if the task does not exist.
    ///
    /// The patch is validated before anything is read or written.
    async fn update_task(
        &self,
        id: TaskId,
        patch: TaskPatch,
        today: NaiveDate,
    ) -> Result<Option<Task>, StoreError>;

    /// Force the status to `Completed`. Returns `false` if the task does not exist.
    async fn complete_task(&self, id: TaskId) -> Result<bool, StoreError>;

    /// Hard delete. Other priorities are not renumbered.
    async fn delete_task(&self, id: TaskId) -> Result<bool, StoreError>;
}

/// Shared handle injected into request handlers.
pub type SharedTaskStore = Arc<dyn TaskStore>;

/// Task store type selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreType {
    Memory,
    #[default]
    Sqlite,
}

impl StoreType {
    /// Parse from environment variable value.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "memory" => Self::Memory,
            "sqlite" | "db" => Self::Sqlite,
            _ => Self::default(),
        }
    }
}

/// Create a task store based on type and configuration.
pub async fn create_task_store(
    store_type: StoreType,
    db_path: PathBuf,
) -> Result<SharedTaskStore, StoreError> {
    match store_type {
        StoreType::Memory => Ok(Arc::new(InMemoryTaskStore::new())),
        StoreType::Sqlite => {
            let store = SqliteTaskStore::new(db_path).await?;
            Ok(Arc::new(store))
        }
    }
}
