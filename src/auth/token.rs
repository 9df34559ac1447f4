use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const TOKEN_TTL_HOURS: i64 = 24;

/// Claims encoded within an issued JWT.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's email address.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
}

fn secret() -> Result<String, AppError> {
    std::env::var("JWT_SECRET")
        .map_err(|_| AppError::InternalServerError("JWT_SECRET not set".into()))
}

/// Generates a JWT for the given user email, signed with the shared secret
/// and expiring in 24 hours.
pub fn generate_token(email: &str) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expiration = now
        .checked_add_signed(chrono::Duration::hours(TOKEN_TTL_HOURS))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: email.to_owned(),
        exp: expiration,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret()?.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a JWT's signature and expiry and decodes its claims.
///
/// Every token failure collapses into the same `TokenInvalid` rejection so
/// callers cannot tell a malformed token from an expired one.
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret()?.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(AppError::from)
}

/// Verifies the token and additionally checks that its embedded subject
/// matches the identity it is being tested against.
pub fn validate_for_subject(token: &str, email: &str) -> Result<Claims, AppError> {
    let claims = verify_token(token)?;
    if claims.sub != email {
        return Err(AppError::TokenInvalid(
            "Your token is not valid, regenerate token".into(),
        ));
    }
    Ok(claims)
}

/// Parses the subject out of a token without enforcing signature or expiry.
///
/// Used by the auth gate to look up the user record before the full
/// validation runs; never treat the result as an authenticated identity.
pub fn extract_subject(token: &str) -> Result<String, AppError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims.sub)
        .map_err(AppError::from)
}
