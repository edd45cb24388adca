pub mod health;
pub mod tasks;

use actix_web::web;

use crate::error::AppError;

/// Registers the task routes. Mount inside a scope wrapped by `AuthMiddleware`.
///
/// Request bodies that cannot be decoded into the expected payload are
/// reported as validation errors (422), the same as field constraint failures.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }))
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task)
            .service(tasks::toggle_task_completion),
    );
}
