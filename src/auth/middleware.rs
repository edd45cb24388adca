use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::extract_subject;
use crate::auth::token::TokenCodec;
use crate::error::AppError;

/// Authenticates every request in the scope it wraps.
///
/// Resolves the `Authorization` header into a `Subject` with the `TokenCodec`
/// registered as app data, and stores it in the request extensions for the
/// `Subject` extractor. Requests that fail are answered with 401 before any
/// handler runs.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let codec = match req.app_data::<web::Data<TokenCodec>>() {
            Some(codec) => codec.clone(),
            None => {
                let app_err =
                    AppError::InternalServerError("TokenCodec is not registered as app data".into());
                return Box::pin(async move { Err(app_err.into()) });
            }
        };

        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match extract_subject(authorization, &codec) {
            Ok(subject) => {
                req.extensions_mut().insert(subject);
                Box::pin(self.service.call(req))
            }
            Err(app_err) => {
                log::debug!("{} {} refused: {}", req.method(), req.path(), app_err);
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}
