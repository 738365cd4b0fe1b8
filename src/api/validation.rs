use regex::Regex;
use std::sync::OnceLock;

use super::ApiError;

pub const MAX_EMAIL_LENGTH: usize = 255;
pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_PASSWORD_LENGTH: usize = 128;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Domains need a dot, except the `localhost` allowlist entry
    RE.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@(?:(?i:localhost)|[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+)$",
        )
        .expect("Invalid regex pattern defined in code")
    })
}

/// Checks email syntax and length. Returns the trimmed address.
pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("email: This field is required"));
    }

    if trimmed.chars().count() > MAX_EMAIL_LENGTH {
        return Err(ApiError::validation(format!(
            "email: Ensure this field has no more than {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !email_regex().is_match(trimmed) {
        return Err(ApiError::validation("email: Enter a valid email address"));
    }

    Ok(trimmed)
}

/// Checks password length. Whitespace is significant and never trimmed.
pub fn validate_password(password: &str, min_length: usize) -> Result<&str, ApiError> {
    let length = password.chars().count();

    if length < min_length {
        return Err(ApiError::validation(format!(
            "password: Ensure this field has at least {min_length} characters"
        )));
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(ApiError::validation(format!(
            "password: Ensure this field has no more than {MAX_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(password)
}

pub fn validate_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ApiError::validation(format!(
            "name: Ensure this field has no more than {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed)
}

/// Login fields only need to be present; their correctness is decided by
/// credential verification.
pub fn validate_login_fields<'a>(email: &'a str, password: &'a str) -> Result<(&'a str, &'a str), ApiError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::validation("email: This field may not be blank"));
    }
    if password.is_empty() {
        return Err(ApiError::validation("password: This field may not be blank"));
    }
    Ok((email, password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
        assert_eq!(validate_email("  a@b.io ").unwrap(), "a@b.io");
        assert!(validate_email("").is_err());
        assert!(validate_email("   ").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("user@localhost").is_ok());
        assert!(validate_email("user@LocalHost").is_ok());
        assert!(validate_email("user@intranet").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email(&format!("{}@example.com", "a".repeat(250))).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("pass123", 5).is_ok());
        assert!(validate_password("12345", 5).is_ok());
        assert!(validate_password("pw", 5).is_err());
        assert!(validate_password("", 5).is_err());
        assert!(validate_password(&"x".repeat(129), 5).is_err());
        assert_eq!(validate_password(" spaced ", 5).unwrap(), " spaced ");
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name(" Ameer Hamza ").unwrap(), "Ameer Hamza");
        assert!(validate_name("").is_ok());
        assert!(validate_name(&"n".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_login_fields() {
        assert!(validate_login_fields("test@example.com", "bad-pass").is_ok());
        assert!(validate_login_fields("test@example.com", "").is_err());
        assert!(validate_login_fields("", "secret").is_err());
    }
}
