//! Credential hashing for stored users.

use crate::error::AppError;

/// bcrypt work factor for registration. Raising this only affects newly
/// stored hashes; existing ones carry their own cost.
const BCRYPT_COST: u32 = 12;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(AppError::from)
}

/// Checks a login attempt against the stored hash. `Ok(false)` is a clean
/// mismatch; `Err` means the comparison itself could not run.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    bcrypt::verify(password, password_hash).map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hashed = hash_password("cardstack_pw_1").unwrap();

        assert_ne!(hashed, "cardstack_pw_1");
        assert!(verify_password("cardstack_pw_1", &hashed).unwrap());
        assert!(!verify_password("cardstack_pw_2", &hashed).unwrap());
    }

    #[test]
    fn test_same_password_hashes_differently() {
        // Per-hash salt: equal inputs must not produce equal stored values.
        let first = hash_password("repeat_after_me").unwrap();
        let second = hash_password("repeat_after_me").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_stored_hash() {
        match verify_password("cardstack_pw_1", "not-a-bcrypt-hash") {
            Err(AppError::InternalServerError(_)) => {}
            // bcrypt may also report a malformed hash as a plain mismatch.
            Ok(false) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
