pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Role;

// Re-export necessary items
pub use extractors::AuthenticatedIdentity;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{extract_subject, generate_token, validate_for_subject, verify_token, Claims};

/// Payload for a user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Firstname is required."))]
    pub firstname: String,
    #[validate(length(min = 1, message = "Lastname is required."))]
    pub lastname: String,
    /// Unique, case-sensitive lookup key for the account.
    #[validate(email(message = "The email address is invalid."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long."))]
    pub password: String,
    pub role: Role,
}

/// Payload for an authentication (login) request.
#[derive(Debug, Deserialize, Validate)]
pub struct AuthenticateRequest {
    #[validate(email(message = "The email address is invalid."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long."))]
    pub password: String,
}

/// Response after successful registration or authentication.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The JWT bearer token for subsequent requests.
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "password123".to_string(),
            role: Role::User,
        };
        assert!(valid.validate().is_ok());

        let invalid_email = RegisterRequest {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            email: "ada-example.com".to_string(),
            password: "password123".to_string(),
            role: Role::User,
        };
        assert!(invalid_email.validate().is_err());

        let missing_firstname = RegisterRequest {
            firstname: "".to_string(),
            lastname: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "password123".to_string(),
            role: Role::Admin,
        };
        assert!(missing_firstname.validate().is_err());

        let short_password = RegisterRequest {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "123".to_string(),
            role: Role::User,
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_authenticate_request_validation() {
        let valid = AuthenticateRequest {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid_email = AuthenticateRequest {
            email: "testexample.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(invalid_email.validate().is_err());
    }

    #[test]
    fn test_register_request_role_parsing() {
        let json = r#"{
            "firstname": "Grace",
            "lastname": "Hopper",
            "email": "grace@example.com",
            "password": "password123",
            "role": "ADMIN"
        }"#;
        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.role, Role::Admin);
    }
}
