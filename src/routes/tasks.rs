use crate::{
    auth::Subject,
    error::AppError,
    models::{SortBy, StatusFilter, TaskInput, TaskQuery, TaskUpdate},
    services::TaskService,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

/// Lists the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `status_filter` (optional): `all` (default), `active` or `completed`.
/// - `sort_by` (optional): `created` (default, newest first), `updated` (newest first)
///   or `title` (alphabetical).
///
/// Unrecognised values behave like the defaults.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[get("")]
pub async fn get_tasks(
    service: web::Data<TaskService>,
    subject: Subject,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let filter = StatusFilter::from_param(query_params.status_filter.as_deref());
    let sort = SortBy::from_param(query_params.sort_by.as_deref());

    let tasks = service.list(&subject, filter, sort).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: 1 to 200 characters (required).
/// - `description` (optional): up to 1000 characters.
///
/// Any owner field in the body is ignored.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `422 Unprocessable Entity`: field constraints violated.
#[post("")]
pub async fn create_task(
    service: web::Data<TaskService>,
    subject: Subject,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = service.create(&subject, task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a single task.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `403 Forbidden`: the task belongs to another user.
/// - `404 Not Found`: no task with this id.
#[get("/{id}")]
pub async fn get_task(
    service: web::Data<TaskService>,
    subject: Subject,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = service.get(&subject, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates the fields present in the body; absent fields are left unchanged.
///
/// ## Request Body:
/// Any of `title`, `description` (`null` clears it) and `completed`.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `403 Forbidden`, `404 Not Found`, `422 Unprocessable Entity`.
#[put("/{id}")]
pub async fn update_task(
    service: web::Data<TaskService>,
    subject: Subject,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    let task = service
        .update(&subject, task_id.into_inner(), task_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted successfully"}`.
/// - `403 Forbidden`, `404 Not Found` (also when repeating a delete).
#[delete("/{id}")]
pub async fn delete_task(
    service: web::Data<TaskService>,
    subject: Subject,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    service.delete(&subject, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}

/// Flips the task's `completed` flag.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `403 Forbidden`, `404 Not Found`.
#[patch("/{id}/complete")]
pub async fn toggle_task_completion(
    service: web::Data<TaskService>,
    subject: Subject,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = service
        .toggle_completion(&subject, task_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}
