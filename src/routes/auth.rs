use crate::{
    auth::{
        generate_token, hash_password, verify_password, AuthResponse, AuthenticateRequest,
        RegisterRequest,
    },
    error::AppError,
    models::User,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Creates a new user account and returns a bearer token whose subject is
/// the registered email. Fails with 409 when the email is already taken.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    log::info!("registration requested for {}", register_data.email);

    let email_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(&register_data.email)
            .fetch_one(&**pool)
            .await?;

    if email_exists {
        return Err(AppError::EmailAlreadyExists("Email already exist".into()));
    }

    let password_hash = hash_password(&register_data.password)?;

    sqlx::query(
        "INSERT INTO users (firstname, lastname, email, password_hash, role) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(&register_data.firstname)
    .bind(&register_data.lastname)
    .bind(&register_data.email)
    .bind(&password_hash)
    .bind(register_data.role)
    .execute(&**pool)
    .await
    .map_err(registration_conflict)?;

    let token = generate_token(&register_data.email)?;

    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}

/// A concurrent registration can pass the exists check and still lose the
/// insert to the unique index on email; that loser gets the same 409 as a
/// sequential duplicate. SQLSTATE 23505 is Postgres' unique violation.
fn registration_conflict(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return AppError::EmailAlreadyExists("Email already exist".into());
        }
    }
    AppError::from(err)
}

/// Authenticate an existing user
///
/// Verifies the credentials and returns a bearer token. An unknown email and
/// a wrong password are both surfaced as the same not-found rejection.
#[post("/authenticate")]
pub async fn authenticate(
    pool: web::Data<PgPool>,
    auth_data: web::Json<AuthenticateRequest>,
) -> Result<impl Responder, AppError> {
    auth_data.validate()?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, firstname, lastname, email, password_hash, role FROM users WHERE email = $1",
    )
    .bind(&auth_data.email)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::CredentialsNotFound("Invalid credentials".into()))?;

    if !verify_password(&auth_data.password, &user.password_hash)? {
        return Err(AppError::CredentialsNotFound("Invalid credentials".into()));
    }

    let token = generate_token(&user.email)?;

    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}
