use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;

use crate::auth::token::{extract_subject, validate_for_subject};
use crate::auth::AuthenticatedIdentity;
use crate::error::AppError;
use crate::models::User;

/// Bearer-token authentication gate.
///
/// Requests without an `Authorization: Bearer` header pass through
/// unauthenticated; route-level extractors decide whether that is acceptable.
/// Requests with a header are resolved to an `AuthenticatedIdentity` or
/// rejected with a uniform 401 before any handler runs.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    // Rc so the inner service can be moved into the boxed future; identity
    // resolution needs an async database lookup before the call proceeds.
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_owned);

        let token = match token {
            Some(token) => token,
            None => {
                // No credential presented: downstream route protection decides.
                let fut = self.service.call(req);
                return Box::pin(fut);
            }
        };

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let identity = resolve_identity(&req, &token).await.map_err(|err| {
                log::warn!("rejected bearer credential: {}", err);
                // Malformed token, expired token, unknown subject and
                // signature mismatch are indistinguishable to the caller.
                AppError::TokenInvalid("Your token is not valid, regenerate token".into())
            })?;
            req.extensions_mut().insert(identity);
            service.call(req).await
        })
    }
}

/// Subject extraction, user lookup, then full token validation against the
/// looked-up identity.
async fn resolve_identity(
    req: &ServiceRequest,
    token: &str,
) -> Result<AuthenticatedIdentity, AppError> {
    let pool = req
        .app_data::<web::Data<PgPool>>()
        .ok_or_else(|| AppError::InternalServerError("Database pool is not configured".into()))?;

    let email = extract_subject(token)?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, firstname, lastname, email, password_hash, role FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| AppError::TokenInvalid("Unknown token subject".into()))?;

    validate_for_subject(token, &user.email)?;

    Ok(AuthenticatedIdentity {
        user_id: user.id,
        email: user.email,
        role: user.role,
    })
}
