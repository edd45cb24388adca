//! Ownership checks between the authenticated subject and a task.
//!
//! This is the only gate between tenants. Callers must confirm the task exists
//! before asking, so a missing task is always reported as not found.

use crate::auth::Subject;
use crate::error::AppError;
use crate::models::Task;

/// What the subject is trying to do; only changes the forbidden message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Access,
    Update,
    Delete,
}

impl TaskAction {
    fn verb(&self) -> &'static str {
        match self {
            TaskAction::Access => "access",
            TaskAction::Update => "update",
            TaskAction::Delete => "delete",
        }
    }
}

/// Returns true iff `subject_id` and `resource_owner_id` are the same string.
/// No case folding or trimming.
pub fn authorize(subject_id: &str, resource_owner_id: &str) -> bool {
    subject_id == resource_owner_id
}

/// Refuses with `AppError::Forbidden` unless `subject` owns `task`.
pub fn ensure_owner(subject: &Subject, task: &Task, action: TaskAction) -> Result<(), AppError> {
    if authorize(&subject.id, &task.user_id) {
        Ok(())
    } else {
        log::warn!(
            "subject {} denied {} on task {}",
            subject.id,
            action.verb(),
            task.id
        );
        Err(AppError::Forbidden(format!(
            "Not authorized to {} this task",
            action.verb()
        )))
    }
}
