//! Authentication-related models

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{check_length, user::UserResponse};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid username pattern"));

fn validate_username_length(username: &str) -> Result<(), ValidationError> {
    check_length(
        username,
        3,
        30,
        "Username must be at least 3 characters",
        "Username must be less than 30 characters",
    )
}

fn validate_password_length(password: &str) -> Result<(), ValidationError> {
    check_length(
        password,
        6,
        100,
        "Password must be at least 6 characters",
        "Password is too long",
    )
}

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(
        custom(function = "validate_username_length"),
        regex(
            path = *USERNAME_RE,
            message = "Username can only contain letters, numbers, underscores, and hyphens"
        )
    )]
    pub username: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(custom(function = "validate_password_length"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Signup / login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// `GET /auth/me` payload
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_signup() {
        assert!(signup("bob", "bob@x.com", "secret1").validate().is_ok());
        assert!(signup("jane_doe-99", "jane@example.com", "abcdef").validate().is_ok());
    }

    #[test]
    fn test_signup_username_rules() {
        assert!(signup("bo", "bob@x.com", "secret1").validate().is_err());
        assert!(signup(&"a".repeat(31), "bob@x.com", "secret1").validate().is_err());
        assert!(signup("bob smith", "bob@x.com", "secret1").validate().is_err());
        assert!(signup("bob!", "bob@x.com", "secret1").validate().is_err());
    }

    #[test]
    fn test_signup_email_and_password_rules() {
        assert!(signup("bob", "not-an-email", "secret1").validate().is_err());
        assert!(signup("bob", "bob@x.com", "12345").validate().is_err());
        assert!(signup("bob", "bob@x.com", &"p".repeat(101)).validate().is_err());
    }

    #[test]
    fn test_login_requires_password() {
        let req = LoginRequest {
            email: "bob@x.com".to_string(),
            password: String::new(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
