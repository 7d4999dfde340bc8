//! In-memory task store (non-persistent).

use super::{StoreError, TaskStore};
use crate::task::{priority, status, NewTask, Task, TaskId, TaskOrder, TaskPatch, TaskStatus};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    tasks: BTreeMap<TaskId, Task>,
    /// Last id handed out; ids are never reused
    last_id: i64,
}

impl Inner {
    fn snapshot(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }

    fn replace(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks.into_iter().map(|t| (t.id, t)).collect();
    }
}

#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    fn is_persistent(&self) -> bool {
        false
    }

    async fn refresh_statuses(&self, today: NaiveDate) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().await;
        let mut tasks = inner.snapshot();
        let changed = status::refresh(&mut tasks, today);
        if !changed.is_empty() {
            inner.replace(tasks);
        }
        Ok(changed.len())
    }

    async fn list_tasks(&self, order: TaskOrder) -> Result<Vec<Task>, StoreError> {
        let mut tasks = self.inner.read().await.snapshot();
        order.sort(&mut tasks);
        Ok(tasks)
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        Ok(self.inner.read().await.tasks.get(&id).cloned())
    }

    async fn create_task(&self, task: NewTask, today: NaiveDate) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        let mut tasks = inner.snapshot();
        priority::shift_for_insert(&mut tasks, task.priority());

        inner.last_id += 1;
        let created = task.into_task(TaskId::new(inner.last_id), today);
        tasks.push(created.clone());
        inner.replace(tasks);
        Ok(created)
    }

    async fn update_task(
        &self,
        id: TaskId,
        patch: TaskPatch,
        today: NaiveDate,
    ) -> Result<Option<Task>, StoreError> {
        patch.validate()?;
        let mut inner = self.inner.write().await;
        let mut tasks = inner.snapshot();
        let Some(pos) = tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };

        if let Some(requested) = patch.priority {
            priority::shift_for_move(&mut tasks, id, requested);
        }
        patch.apply_fields(&mut tasks[pos], today);
        let updated = tasks[pos].clone();
        inner.replace(tasks);
        Ok(Some(updated))
    }

    async fn complete_task(&self, id: TaskId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.tasks.get_mut(&id) {
            Some(task) => {
                task.status = TaskStatus::Completed;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_task(&self, id: TaskId) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.tasks.remove(&id).is_some())
    }
}
