use anyhow::Result;
use std::sync::Arc;

use crate::storage::Storage;
use crate::tasks::{Task, ValidTask};

/// Thin business-rule layer over storage. The only rule it owns is
/// id-forcing on update: the caller's path id always wins over any id
/// carried in the payload.
#[derive(Clone)]
pub struct TaskService {
    storage: Arc<Storage>,
}

impl TaskService {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub async fn get_all_tasks(&self) -> Result<Vec<Task>> {
        let rows = self.storage.list_tasks().await?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    pub async fn get_task_by_id(&self, id: i64) -> Result<Option<Task>> {
        Ok(self.storage.get_task(id).await?.map(Task::from))
    }

    /// Insert and return the record carrying its generated id.
    pub async fn create_task(&self, task: ValidTask) -> Result<Task> {
        let row = self
            .storage
            .insert_task(&task.title, task.description.as_deref(), task.completed)
            .await?;
        Ok(Task::from(row))
    }

    /// Overwrite the row at `id` with the given fields.
    /// Returns false when no row matched.
    pub async fn update_task(&self, id: i64, task: ValidTask) -> Result<bool> {
        let affected = self
            .storage
            .update_task(id, &task.title, task.description.as_deref(), task.completed)
            .await?;
        Ok(affected > 0)
    }

    /// Returns false when no row matched.
    pub async fn delete_task(&self, id: i64) -> Result<bool> {
        let affected = self.storage.delete_task(id).await?;
        Ok(affected > 0)
    }
}
