use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::TaskStore;
use crate::error::AppError;
use crate::models::{SortBy, StatusFilter, Task};

const TASK_COLUMNS: &str = "id, title, description, completed, user_id, created_at, updated_at";

/// `TaskStore` over the `tasks` table (see `schema.sql`).
#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn list(
        &self,
        owner_id: &str,
        filter: StatusFilter,
        sort: SortBy,
    ) -> Result<Vec<Task>, AppError> {
        // Both fragments are static strings chosen by enum, never user input.
        let sql = format!(
            "SELECT {} FROM tasks WHERE user_id = $1{} ORDER BY {}",
            TASK_COLUMNS,
            filter.sql_condition(),
            sort.sql_order()
        );

        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    async fn insert(&self, task: Task) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (id, title, description, completed, user_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            TASK_COLUMNS
        );

        let created = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(task.title)
            .bind(task.description)
            .bind(task.completed)
            .bind(task.user_id)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);

        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    async fn update(&self, task: &Task) -> Result<Option<Task>, AppError> {
        // user_id and created_at are never written after insert.
        let sql = format!(
            "UPDATE tasks
             SET title = $1, description = $2, completed = $3, updated_at = $4
             WHERE id = $5
             RETURNING {}",
            TASK_COLUMNS
        );

        let updated = sqlx::query_as::<_, Task>(&sql)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.completed)
            .bind(task.updated_at)
            .bind(task.id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
