//! Data models for accounts and login sessions

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LEN: usize = 6;

/// A stored account, including its password hash
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, image: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            image,
            created_at: Utc::now(),
        }
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// The part of a user that is safe to send to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl RegisterRequest {
    /// Check the fields in order; the first failing rule is reported.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.name.is_empty() {
            return Err(AuthError::Validation("Name is required".to_string()));
        }
        if !is_valid_email(&self.email) {
            return Err(AuthError::Validation("Invalid email address".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A bearer token tied to a user until `expires_at`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+'-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            image: None,
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("maria@example.com"));
        assert!(is_valid_email("juan.dela-cruz+ph@mail.example.org"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("maria"));
        assert!(!is_valid_email("maria@"));
        assert!(!is_valid_email("maria@example"));
        assert!(!is_valid_email("ma ria@example.com"));
    }

    #[test]
    fn test_validation_reports_first_failure() {
        let err = request("", "bad", "123").validate().unwrap_err();
        assert_eq!(err.to_string(), "Name is required");

        let err = request("Maria", "bad", "123").validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid email address");

        let err = request("Maria", "maria@example.com", "12345").validate().unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");

        assert!(request("Maria", "maria@example.com", "123456").validate().is_ok());
    }

    #[test]
    fn test_public_user_hides_hash() {
        let user = User::new(
            "Maria".to_string(),
            "maria@example.com".to_string(),
            "$argon2id$...".to_string(),
            String::new(),
        );
        let json = serde_json::to_value(user.to_public()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["email"], "maria@example.com");
    }
}
