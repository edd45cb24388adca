//! Task persistence behind a trait, so the service gets its store handle
//! injected at construction instead of reaching for a global.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{SortBy, StatusFilter, Task};

pub use memory::MemoryTaskStore;
pub use postgres::PgTaskStore;

/// Create/read/update/delete over task records.
///
/// Implementations do no ownership checks; that is the service's job.
/// `update` writes the whole row, so concurrent writers resolve last-write-wins.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks owned by `owner_id`, filtered and ordered.
    async fn list(
        &self,
        owner_id: &str,
        filter: StatusFilter,
        sort: SortBy,
    ) -> Result<Vec<Task>, AppError>;

    async fn insert(&self, task: Task) -> Result<Task, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    /// Persists the mutable fields of `task`. `None` if the row no longer exists.
    async fn update(&self, task: &Task) -> Result<Option<Task>, AppError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
