use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;
use std::future::{ready, Ready};

use crate::auth::token::TokenCodec;
use crate::error::AppError;

/// The verified identity behind a request. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub id: String,
    pub email: Option<String>,
}

impl Subject {
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }
}

/// Turns a raw `Authorization` header value into a verified [`Subject`].
///
/// Requires the `Bearer` scheme. Every failure, whether a missing header, another
/// scheme, a token the codec rejects or claims without a subject id, comes back
/// as `AppError::Unauthorized`; the reason is only logged.
pub fn extract_subject(
    authorization: Option<&str>,
    codec: &TokenCodec,
) -> Result<Subject, AppError> {
    let header = authorization.ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;

    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or_else(|| AppError::Unauthorized("Malformed authorization header".into()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthorized(format!(
            "Unsupported authorization scheme: {}",
            scheme
        )));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Unauthorized("Missing token".into()));
    }

    let claims = codec.parse(token).map_err(|err| {
        log::warn!("bearer token rejected: {}", err);
        AppError::Unauthorized("Invalid token".into())
    })?;

    let id = claims
        .subject_id()
        .ok_or_else(|| AppError::Unauthorized("Token carries no subject id".into()))?;

    Ok(Subject::new(id, claims.email.clone()))
}

/// Reads the [`Subject`] that `AuthMiddleware` stored in the request extensions.
///
/// If it is missing (the middleware did not run on this route), the request is
/// refused with `AppError::Unauthorized`.
impl FromRequest for Subject {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Subject>().cloned() {
            Some(subject) => ready(Ok(subject)),
            None => {
                let err = AppError::Unauthorized(
                    "Subject not found in request. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
