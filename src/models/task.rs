use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Which tasks `list` returns, parsed from the `status_filter` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    /// Only tasks that are not completed.
    Active,
    /// Only completed tasks.
    Completed,
}

impl StatusFilter {
    /// Unrecognised values fall back to `All` instead of failing the request.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("active") => Self::Active,
            Some("completed") => Self::Completed,
            _ => Self::All,
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }

    /// Extra `WHERE` condition, appended after the owner condition.
    pub fn sql_condition(&self) -> &'static str {
        match self {
            Self::All => "",
            Self::Active => " AND completed = FALSE",
            Self::Completed => " AND completed = TRUE",
        }
    }
}

/// Ordering of `list` results, parsed from the `sort_by` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Newest first.
    #[default]
    Created,
    /// Most recently updated first.
    Updated,
    /// Alphabetical by title.
    Title,
}

impl SortBy {
    /// Unrecognised values fall back to `Created` instead of failing the request.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("updated") => Self::Updated,
            Some("title") => Self::Title,
            _ => Self::Created,
        }
    }

    pub fn sort(&self, tasks: &mut [Task]) {
        match self {
            Self::Created => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            Self::Updated => tasks.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
            Self::Title => tasks.sort_by(|a, b| a.title.cmp(&b.title)),
        }
    }

    pub fn sql_order(&self) -> &'static str {
        match self {
            Self::Created => "created_at DESC",
            Self::Updated => "updated_at DESC",
            Self::Title => "title ASC",
        }
    }
}

/// Payload for creating a task.
///
/// Has no owner field. The owner always comes from the authenticated subject
/// and unknown payload fields are ignored.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Partial update payload. Only fields present in the JSON body are applied.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// `None` leaves the description alone, `Some(None)` clears it.
    #[validate(length(max = 1000))]
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

// Maps a present field (even `null`) to `Some`, so an explicit null is distinguishable
// from an absent field once combined with `#[serde(default)]`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query parameters accepted by the task listing endpoint.
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    pub status_filter: Option<String>,
    pub sort_by: Option<String>,
}

/// A task as stored and as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4), assigned by the server.
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    /// Subject id of the owner. Set once at creation.
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful mutation.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new, not yet completed task owned by `owner_id`.
    pub fn new(input: TaskInput, owner_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            completed: false,
            user_id: owner_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the fields present in `update` and stamps `updated_at`,
    /// whether or not any value changed.
    pub fn apply(&mut self, update: TaskUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        self.touch();
    }

    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: Some("Test Description".to_string()),
        }
    }

    #[test]
    fn test_task_creation() {
        let task = Task::new(input("Test Task"), "user-1");
        assert_eq!(task.title, "Test Task");
        assert_eq!(task.user_id, "user-1");
        assert!(!task.completed);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_task_input_validation() {
        assert!(input("Valid Task").validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input(&"a".repeat(200)).validate().is_ok());
        assert!(input(&"a".repeat(201)).validate().is_err());

        let long_description = TaskInput {
            title: "Valid title".to_string(),
            description: Some("b".repeat(1001)),
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_owner_field_in_payload_is_ignored() {
        let payload = serde_json::json!({ "title": "Mine", "user_id": "someone-else" });
        let input: TaskInput = serde_json::from_value(payload).unwrap();
        let task = Task::new(input, "me");
        assert_eq!(task.user_id, "me");
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let absent: TaskUpdate = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        assert_eq!(absent.description, None);
        assert_eq!(absent.completed, Some(true));

        let cleared: TaskUpdate = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: TaskUpdate = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(set.description, Some(Some("x".to_string())));
    }

    #[test]
    fn test_update_validation() {
        let empty_title = TaskUpdate {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(empty_title.validate().is_err());

        let long_description = TaskUpdate {
            description: Some(Some("b".repeat(1001))),
            ..Default::default()
        };
        assert!(long_description.validate().is_err());

        assert!(TaskUpdate::default().validate().is_ok());
    }

    #[test]
    fn test_apply_is_a_patch() {
        let mut task = Task::new(input("Original"), "user-1");
        let before = task.clone();

        task.apply(TaskUpdate {
            completed: Some(true),
            ..Default::default()
        });

        assert_eq!(task.title, before.title);
        assert_eq!(task.description, before.description);
        assert!(task.completed);
        assert!(task.updated_at >= before.updated_at);
        assert_eq!(task.user_id, before.user_id);
        assert_eq!(task.created_at, before.created_at);

        task.apply(TaskUpdate {
            description: Some(None),
            ..Default::default()
        });
        assert_eq!(task.description, None);
    }

    #[test]
    fn test_filter_and_sort_params_fall_back_to_defaults() {
        assert_eq!(StatusFilter::from_param(Some("active")), StatusFilter::Active);
        assert_eq!(StatusFilter::from_param(Some("completed")), StatusFilter::Completed);
        assert_eq!(StatusFilter::from_param(Some("bogus")), StatusFilter::All);
        assert_eq!(StatusFilter::from_param(None), StatusFilter::All);

        assert_eq!(SortBy::from_param(Some("updated")), SortBy::Updated);
        assert_eq!(SortBy::from_param(Some("title")), SortBy::Title);
        assert_eq!(SortBy::from_param(Some("priority")), SortBy::Created);
        assert_eq!(SortBy::from_param(None), SortBy::Created);
    }

    #[test]
    fn test_task_query_from_query_string() {
        let query =
            actix_web::web::Query::<TaskQuery>::from_query("status_filter=active&sort_by=title")
                .unwrap();
        assert_eq!(query.status_filter.as_deref(), Some("active"));
        assert_eq!(query.sort_by.as_deref(), Some("title"));

        let empty = actix_web::web::Query::<TaskQuery>::from_query("").unwrap();
        assert_eq!(empty.status_filter, None);
        assert_eq!(empty.sort_by, None);
    }

    #[test]
    fn test_sort_orders() {
        let mut older = Task::new(input("b"), "u");
        let mut newer = Task::new(input("a"), "u");
        older.created_at = Utc::now() - chrono::Duration::hours(2);
        newer.created_at = Utc::now() - chrono::Duration::hours(1);
        older.updated_at = Utc::now();
        newer.updated_at = newer.created_at;

        let mut tasks = vec![older.clone(), newer.clone()];
        SortBy::Created.sort(&mut tasks);
        assert_eq!(tasks[0].id, newer.id);

        SortBy::Updated.sort(&mut tasks);
        assert_eq!(tasks[0].id, older.id);

        SortBy::Title.sort(&mut tasks);
        assert_eq!(tasks[0].title, "a");
    }
}
