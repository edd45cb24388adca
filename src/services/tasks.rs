use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{ensure_owner, Subject, TaskAction};
use crate::error::AppError;
use crate::models::{SortBy, StatusFilter, Task, TaskInput, TaskUpdate};
use crate::store::TaskStore;

/// Task operations on behalf of an authenticated subject.
///
/// Every call takes the `Subject` first. Operations on a single task look it
/// up before checking ownership, so a missing id is `NotFound` for everyone
/// and an existing id owned by someone else is `Forbidden`.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn list(
        &self,
        subject: &Subject,
        filter: StatusFilter,
        sort: SortBy,
    ) -> Result<Vec<Task>, AppError> {
        self.store.list(&subject.id, filter, sort).await
    }

    /// The owner is always `subject`, and a new task always starts not completed.
    pub async fn create(&self, subject: &Subject, input: TaskInput) -> Result<Task, AppError> {
        input.validate()?;
        let task = self.store.insert(Task::new(input, &subject.id)).await?;
        log::info!("task {} created by {}", task.id, subject.id);
        Ok(task)
    }

    pub async fn get(&self, subject: &Subject, task_id: Uuid) -> Result<Task, AppError> {
        self.load_owned(subject, task_id, TaskAction::Access).await
    }

    /// Applies only the fields present in `update`; `updated_at` is refreshed
    /// even when nothing changed.
    pub async fn update(
        &self,
        subject: &Subject,
        task_id: Uuid,
        update: TaskUpdate,
    ) -> Result<Task, AppError> {
        update.validate()?;
        let mut task = self.load_owned(subject, task_id, TaskAction::Update).await?;
        task.apply(update);
        self.save(&task).await
    }

    /// Deleting an id twice yields `NotFound` the second time.
    pub async fn delete(&self, subject: &Subject, task_id: Uuid) -> Result<(), AppError> {
        self.load_owned(subject, task_id, TaskAction::Delete).await?;
        if !self.store.delete(task_id).await? {
            return Err(not_found());
        }
        log::info!("task {} deleted by {}", task_id, subject.id);
        Ok(())
    }

    pub async fn toggle_completion(
        &self,
        subject: &Subject,
        task_id: Uuid,
    ) -> Result<Task, AppError> {
        let mut task = self.load_owned(subject, task_id, TaskAction::Update).await?;
        task.toggle_completed();
        self.save(&task).await
    }

    async fn load_owned(
        &self,
        subject: &Subject,
        task_id: Uuid,
        action: TaskAction,
    ) -> Result<Task, AppError> {
        let task = self.store.get(task_id).await?.ok_or_else(not_found)?;
        ensure_owner(subject, &task, action)?;
        Ok(task)
    }

    // The row can disappear between load and write if another request deletes it.
    async fn save(&self, task: &Task) -> Result<Task, AppError> {
        self.store.update(task).await?.ok_or_else(not_found)
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTaskStore;
    use pretty_assertions::assert_eq;

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryTaskStore::new()))
    }

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: None,
        }
    }

    fn alice() -> Subject {
        Subject::new("alice", Some("alice@example.com".into()))
    }

    fn bob() -> Subject {
        Subject::new("bob", None)
    }

    #[actix_rt::test]
    async fn test_create_forces_owner_and_defaults() {
        let service = service();
        let task = service.create(&alice(), input("Buy milk")).await.unwrap();

        assert_eq!(task.user_id, "alice");
        assert!(!task.completed);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[actix_rt::test]
    async fn test_create_rejects_invalid_input() {
        let service = service();
        let result = service.create(&alice(), input("")).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        let tasks = service
            .list(&alice(), StatusFilter::All, SortBy::Created)
            .await
            .unwrap();
        assert!(tasks.is_empty());
    }

    #[actix_rt::test]
    async fn test_missing_task_is_not_found_for_everyone() {
        let service = service();
        let missing = Uuid::new_v4();

        for subject in [alice(), bob()] {
            assert!(matches!(
                service.get(&subject, missing).await,
                Err(AppError::NotFound(_))
            ));
            assert!(matches!(
                service
                    .update(&subject, missing, TaskUpdate::default())
                    .await,
                Err(AppError::NotFound(_))
            ));
            assert!(matches!(
                service.delete(&subject, missing).await,
                Err(AppError::NotFound(_))
            ));
            assert!(matches!(
                service.toggle_completion(&subject, missing).await,
                Err(AppError::NotFound(_))
            ));
        }
    }

    #[actix_rt::test]
    async fn test_foreign_task_is_forbidden() {
        let service = service();
        let task = service.create(&alice(), input("Private")).await.unwrap();

        assert!(matches!(
            service.get(&bob(), task.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service
                .update(
                    &bob(),
                    task.id,
                    TaskUpdate {
                        title: Some("Hijacked".into()),
                        ..Default::default()
                    }
                )
                .await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.toggle_completion(&bob(), task.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete(&bob(), task.id).await,
            Err(AppError::Forbidden(_))
        ));

        let untouched = service.get(&alice(), task.id).await.unwrap();
        assert_eq!(untouched, task);
    }

    #[actix_rt::test]
    async fn test_update_is_a_patch_and_refreshes_timestamp() {
        let service = service();
        let task = service
            .create(
                &alice(),
                TaskInput {
                    title: "Original".into(),
                    description: Some("keep me".into()),
                },
            )
            .await
            .unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));
        let updated = service
            .update(&alice(), task.id, TaskUpdate::default())
            .await
            .unwrap();
        assert_eq!(updated.title, "Original");
        assert_eq!(updated.description.as_deref(), Some("keep me"));
        assert!(updated.updated_at > task.updated_at);

        let updated = service
            .update(
                &alice(),
                task.id,
                TaskUpdate {
                    title: Some("Renamed".into()),
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert!(updated.completed);
        assert_eq!(updated.description.as_deref(), Some("keep me"));
        assert_eq!(updated.user_id, "alice");
    }

    #[actix_rt::test]
    async fn test_update_rejects_invalid_fields() {
        let service = service();
        let task = service.create(&alice(), input("Valid")).await.unwrap();

        let result = service
            .update(
                &alice(),
                task.id,
                TaskUpdate {
                    title: Some("x".repeat(201)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_rt::test]
    async fn test_list_filters_and_sorts() {
        let service = service();
        let first = service.create(&alice(), input("b first")).await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = service.create(&alice(), input("a second")).await.unwrap();
        service.create(&bob(), input("not alice's")).await.unwrap();
        service.toggle_completion(&alice(), first.id).await.unwrap();

        let all = service
            .list(&alice(), StatusFilter::All, SortBy::Created)
            .await
            .unwrap();
        assert_eq!(
            all.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );

        let active = service
            .list(&alice(), StatusFilter::Active, SortBy::Created)
            .await
            .unwrap();
        assert!(active.iter().all(|t| !t.completed));
        assert_eq!(active.len(), 1);

        let completed = service
            .list(&alice(), StatusFilter::Completed, SortBy::Created)
            .await
            .unwrap();
        assert!(completed.iter().all(|t| t.completed));
        assert_eq!(completed.len(), 1);

        let by_update = service
            .list(&alice(), StatusFilter::All, SortBy::Updated)
            .await
            .unwrap();
        assert_eq!(by_update[0].id, first.id);

        let by_title = service
            .list(&alice(), StatusFilter::All, SortBy::Title)
            .await
            .unwrap();
        assert_eq!(by_title[0].title, "a second");
    }

    #[actix_rt::test]
    async fn test_buy_milk_scenario() {
        let service = service();
        let task = service.create(&alice(), input("Buy milk")).await.unwrap();
        assert!(!task.completed);
        assert_eq!(task.user_id, "alice");

        assert!(matches!(
            service.get(&bob(), task.id).await,
            Err(AppError::Forbidden(_))
        ));

        std::thread::sleep(std::time::Duration::from_millis(5));
        let toggled = service.toggle_completion(&alice(), task.id).await.unwrap();
        assert!(toggled.completed);
        assert!(toggled.updated_at > toggled.created_at);

        service.delete(&alice(), task.id).await.unwrap();
        assert!(matches!(
            service.get(&alice(), task.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(&alice(), task.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
