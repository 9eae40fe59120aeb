//! User profiles and registration input

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{required_text, ValidationError};

const MAX_NICKNAME_LEN: usize = 64;
const MAX_FIO_LEN: usize = 200;
const MAX_EMAIL_LEN: usize = 254;
const MAX_PHONE_LEN: usize = 32;

/// Minimum length for a plaintext password at registration
pub const MIN_PASSWORD_LEN: usize = 8;

/// Loose shape check: one `@`, no whitespace, a dot in the domain
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex"));

/// User profile joined with its capability rating.
///
/// Every user is simultaneously a customer and a seller; both capability
/// rows share the profile id.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub nickname: String,
    pub fio: String,
    pub email: String,
    pub phone_number: String,
    /// Opaque password hash, never serialized
    #[serde(skip_serializing, default)]
    pub password: String,
    pub rating: Option<i32>,
}

/// Raw registration fields as submitted by the user
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub nickname: String,
    pub fio: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

impl RegisterForm {
    /// Validate and normalise the form. Emails are lowercased.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let nickname = required_text("nickname", &self.nickname, MAX_NICKNAME_LEN)?;
        let fio = required_text("fio", &self.fio, MAX_FIO_LEN)?;
        let email = required_text("email", &self.email, MAX_EMAIL_LEN)?.to_lowercase();
        if !EMAIL_RE.is_match(&email) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must look like name@domain.tld",
            });
        }
        let phone_number = required_text("phone number", &self.phone_number, MAX_PHONE_LEN)?;

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::OutOfRange {
                field: "password",
                reason: "must be at least 8 characters",
            });
        }

        Ok(Self {
            nickname,
            fio,
            email,
            phone_number,
            password: self.password,
        })
    }
}

/// Insert payload for a user; `password_hash` is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nickname: String,
    pub fio: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
    pub rating: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegisterForm {
        RegisterForm {
            nickname: "lampseller".into(),
            fio: "Ivan Petrov".into(),
            email: "Ivan@Example.com".into(),
            phone_number: "+7 900 000 00 00".into(),
            password: "correct horse".into(),
        }
    }

    #[test]
    fn valid_form_lowercases_email() {
        let form = form().validate().unwrap();
        assert_eq!(form.email, "ivan@example.com");
    }

    #[test]
    fn rejects_email_without_domain() {
        let mut bad = form();
        bad.email = "ivan@".into();
        let err = bad.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { field: "email", .. }));
    }

    #[test]
    fn rejects_short_password() {
        let mut bad = form();
        bad.password = "short".into();
        let err = bad.validate().unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "password", .. }));
    }

    #[test]
    fn password_is_not_serialized() {
        let user = User {
            id: 1,
            nickname: "n".into(),
            fio: "f".into(),
            email: "e@x.io".into(),
            phone_number: "1".into(),
            password: "$argon2id$secret".into(),
            rating: Some(0),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["fio"], "f");
    }
}
