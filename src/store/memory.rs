use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::TaskStore;
use crate::error::AppError;
use crate::models::{SortBy, StatusFilter, Task};

/// In-process `TaskStore` for tests and local runs without Postgres.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list(
        &self,
        owner_id: &str,
        filter: StatusFilter,
        sort: SortBy,
    ) -> Result<Vec<Task>, AppError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|task| task.user_id == owner_id && filter.matches(task))
            .cloned()
            .collect();

        sort.sort(&mut tasks);
        Ok(tasks)
    }

    async fn insert(&self, task: Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(AppError::DatabaseError(format!(
                "duplicate task id {}",
                task.id
            )));
        }
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn update(&self, task: &Task) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.get_mut(&task.id).map(|stored| {
            stored.title = task.title.clone();
            stored.description = task.description.clone();
            stored.completed = task.completed;
            stored.updated_at = task.updated_at;
            stored.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tasks.write().await.remove(&id).is_some())
    }
}
