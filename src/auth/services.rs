use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::dto::RegisterRequest;
use crate::error::ApiError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    (3..=30).contains(&username.len()) && username.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Rejects malformed registration input before anything touches storage.
pub fn validate_registration(payload: &RegisterRequest) -> Result<(), ApiError> {
    if !is_valid_email(&payload.email) {
        return Err(ApiError::Validation("invalid email".into()));
    }
    if !is_valid_username(&payload.username) {
        return Err(ApiError::Validation(
            "username must be alphanumeric and between 3 and 30 characters".into(),
        ));
    }
    if payload.password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters long".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn accepts_well_formed_registration() {
        assert!(validate_registration(&request("a@x.com", "alice01", "secret1")).is_ok());
    }

    #[test]
    fn rejects_short_username() {
        let err = validate_registration(&request("a@x.com", "ab", "secret1")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn rejects_non_alphanumeric_username() {
        let err = validate_registration(&request("a@x.com", "ab$%", "secret1")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn rejects_overlong_username() {
        let err =
            validate_registration(&request("a@x.com", &"a".repeat(31), "secret1")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn rejects_short_password() {
        let err = validate_registration(&request("a@x.com", "alice01", "12345")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn rejects_malformed_email() {
        for email in ["not-an-email", "a@b", "a b@x.com", "@x.com"] {
            let err = validate_registration(&request(email, "alice01", "secret1")).unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "{email}");
        }
    }
}
