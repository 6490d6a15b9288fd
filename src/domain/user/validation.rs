//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username contains a control character")]
    UsernameControlCharacter,

    #[error("Email is required")]
    MissingEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Email address is not valid")]
    InvalidEmail,

    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),

    #[error("Password must contain at least one uppercase letter")]
    PasswordMissingUppercase,

    #[error("Password must contain at least one lowercase letter")]
    PasswordMissingLowercase,

    #[error("Password must contain at least one digit")]
    PasswordMissingDigit,
}

const MAX_EMAIL_LENGTH: usize = 254;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex"));
static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("Invalid regex"));
static LOWERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").expect("Invalid regex"));
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("Invalid regex"));

/// Validate a username: any non-blank text without control characters
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.trim().is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    if username.chars().any(char::is_control) {
        return Err(UserValidationError::UsernameControlCharacter);
    }

    Ok(())
}

/// Validate an email address (shape only, no deliverability check)
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::MissingEmail);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !EMAIL_PATTERN.is_match(email) {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate password complexity
///
/// Rules:
/// - Between 8 and 128 characters
/// - At least one uppercase letter, one lowercase letter, and one digit
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    if !UPPERCASE.is_match(password) {
        return Err(UserValidationError::PasswordMissingUppercase);
    }

    if !LOWERCASE.is_match(password) {
        return Err(UserValidationError::PasswordMissingLowercase);
    }

    if !DIGIT.is_match(password) {
        return Err(UserValidationError::PasswordMissingDigit);
    }

    Ok(())
}
