use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::Role;

/// The authenticated caller, derived from the persisted user record by the
/// auth gate and attached to request extensions.
///
/// This is deliberately a separate type from `models::User`: it carries only
/// what downstream authorization needs and is passed explicitly through the
/// call chain (handler -> card service), never read from ambient state.
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedIdentity {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Extracts the authenticated identity from request extensions.
///
/// Intended for routes under the `AuthMiddleware` scope. Requests that
/// carried no bearer credential pass the middleware unauthenticated, so on a
/// private route this extractor is the point that rejects them with 401.
impl FromRequest for AuthenticatedIdentity {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedIdentity>().cloned() {
            Some(identity) => ready(Ok(identity)),
            None => {
                let err = AppError::Unauthorized(
                    "Authentication is required to access this resource".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
