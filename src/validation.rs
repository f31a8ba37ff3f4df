//! Input validation utilities for the service layer.

use crate::error::{Error, Result};

/// Validates email format using basic structural checks
///
/// # Arguments
/// * `email` - The email address to validate
///
/// # Returns
/// * `Ok(())` if the email is valid
/// * `Err(Error)` with descriptive message if invalid
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(Error::Validation("Email cannot be empty".to_string()));
    }

    if email.len() > 254 {
        return Err(Error::Validation(
            "Email address is too long (max 254 characters)".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(Error::Validation(
            "Invalid email format: must contain exactly one @ symbol with non-empty local and domain parts".to_string(),
        ));
    }

    if !parts[1].contains('.') {
        return Err(Error::Validation(
            "Invalid email format: domain must contain at least one dot".to_string(),
        ));
    }

    if email.contains(' ') {
        return Err(Error::Validation(
            "Invalid email format: cannot contain spaces".to_string(),
        ));
    }

    Ok(())
}

/// Validates an optional full name (letters, spaces, hyphens, apostrophes, periods).
pub fn validate_full_name(full_name: &Option<String>) -> Result<()> {
    if let Some(name) = full_name {
        let name = name.trim();

        if !name.is_empty() {
            if name.len() > 100 {
                return Err(Error::Validation(
                    "Full name must be less than 100 characters".to_string(),
                ));
            }

            if name.chars().any(|c| c.is_control()) {
                return Err(Error::Validation(
                    "Full name cannot contain control characters".to_string(),
                ));
            }
        }
    }

    Ok(())
}

/// Validates that a string is not empty after trimming
///
/// # Arguments
/// * `input` - The input string to validate
/// * `field_name` - Name of the field for error messages
pub fn validate_required_string(input: &str, field_name: &str) -> Result<()> {
    if input.trim().is_empty() {
        return Err(Error::Validation(format!("{} cannot be empty", field_name)));
    }

    Ok(())
}

/// Validates that a string does not exceed a maximum length.
pub fn validate_length(input: &str, field_name: &str, max: usize) -> Result<()> {
    if input.len() > max {
        return Err(Error::Validation(format!(
            "{} must be at most {} characters",
            field_name, max
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("test.email+tag@domain.co.uk").is_ok());
        assert!(validate_email("user_name@sub.domain.com").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("").is_err());
        assert!(validate_email("invalid-email").is_err());
        assert!(validate_email("@domain.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@@domain.com").is_err());
        assert!(validate_email("user@domain").is_err());
        assert!(validate_email("user name@domain.com").is_err());
    }

    #[test]
    fn test_validate_full_name() {
        assert!(validate_full_name(&Some("Jane Doe".to_string())).is_ok());
        assert!(validate_full_name(&None).is_ok());
        assert!(validate_full_name(&Some("".to_string())).is_ok());
        assert!(validate_full_name(&Some("a".repeat(101))).is_err());
        assert!(validate_full_name(&Some("bad\u{0007}name".to_string())).is_err());
    }

    #[test]
    fn test_validate_required_string() {
        assert!(validate_required_string("hello", "field").is_ok());
        assert!(validate_required_string("", "field").is_err());
        assert!(validate_required_string("   ", "field").is_err());
    }

    #[test]
    fn test_validate_length() {
        assert!(validate_length("short", "field", 10).is_ok());
        assert!(validate_length(&"a".repeat(11), "field", 10).is_err());
    }
}
