#![doc = "The `tasklet` library crate."]
#![doc = ""]
#![doc = "A per-user task API. Bearer tokens are verified by `auth::TokenCodec`, resolved into an"]
#![doc = "`auth::Subject` per request, and every task operation in `services::TaskService` checks"]
#![doc = "that the subject owns the task before reading or changing it."]
#![doc = "The binaries (`main.rs`, `bin/mint_token.rs`) build on these modules."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use crate::error::AppError;
pub use crate::models::{Task, TaskInput, TaskQuery, TaskUpdate};
