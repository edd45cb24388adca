//! Bearer-token authentication and per-task ownership checks.
//!
//! - [`token`] issues and verifies signed tokens.
//! - [`extractors`] turns an `Authorization` header into a [`Subject`].
//! - [`middleware`] runs that extraction for a whole route scope.
//! - [`access`] decides whether a subject may act on a task.

pub mod access;
pub mod extractors;
pub mod middleware;
pub mod token;

pub use access::{authorize, ensure_owner, TaskAction};
pub use extractors::{extract_subject, Subject};
pub use middleware::AuthMiddleware;
pub use token::{IssueClaims, TokenClaims, TokenCodec};
