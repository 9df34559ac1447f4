use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role of a user.
/// Corresponds to the `user_role` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// May access and manage every card in the system.
    Admin,
    /// May only access cards they own.
    User,
}

/// A user record as persisted in the database.
///
/// Never serialized to the API surface; the auth gate derives a separate
/// `AuthenticatedIdentity` value from it for downstream use.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}
