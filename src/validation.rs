//! Input checks applied before anything is written.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// Letters, digits, `_`, `.` and `-`, up to 64 characters.
static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]{1,64}$").unwrap());

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub fn validate_username(username: &str) -> Result<()> {
    if !USERNAME_REGEX.is_match(username) {
        return Err(Error::Validation(format!(
            "Invalid username '{}'. Use 1-64 letters, digits, '_', '.' or '-'.",
            username
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    if email.len() > 254 || !EMAIL_REGEX.is_match(email) {
        return Err(Error::Validation(format!(
            "Invalid email address '{}'.",
            email
        )));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(Error::Validation("Password must not be empty.".to_string()));
    }
    Ok(())
}

/// Rejects empty or whitespace-only values for a named field.
pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} must not be empty.", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usernames() {
        assert!(validate_username("bob").is_ok());
        assert!(validate_username("jane.doe-99").is_ok());
        assert!(validate_username("x_y").is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("semi;colon").is_err());
        assert!(validate_username(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_emails() {
        assert!(validate_email("bob@example.com").is_ok());
        assert!(validate_email("a.b+tag@mail.co.uk").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("bob").is_err());
        assert!(validate_email("bob@localhost").is_err());
        assert!(validate_email("bob @example.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }

    #[test]
    fn test_required_text() {
        assert!(require_text("Category", "Engineering").is_ok());
        let err = require_text("Category", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Category must not be empty.");
        assert!(validate_password("").is_err());
        assert!(validate_password("p").is_ok());
    }
}
