//! # Validation Utilities
//!
//! Input validation helpers for request payloads.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate email format (basic shape check: `local@domain.tld`).
pub fn validate_email(email: &str) -> Result<(), String> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if valid && !email.chars().any(char::is_whitespace) {
        Ok(())
    } else {
        Err("Invalid email format".to_string())
    }
}

/// Validate minimum length, counted in characters.
pub fn validate_min_length(value: &str, min: usize, field_name: &str) -> Result<(), String> {
    if value.chars().count() < min {
        Err(format!("{} must be at least {} characters", field_name, min))
    } else {
        Ok(())
    }
}

/// Validate a username: it must not be mistaken for an email at login.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.contains('@') || username.chars().any(char::is_whitespace) {
        Err("Username must not contain '@' or whitespace".to_string())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("alice.example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@localhost").is_err());
        assert!(validate_email("alice@@example.com").is_err());
        assert!(validate_email("ali ce@example.com").is_err());
    }

    #[test]
    fn test_validate_min_length() {
        assert!(validate_min_length("abc", 3, "Username").is_ok());
        assert_eq!(
            validate_min_length("ab", 3, "Username"),
            Err("Username must be at least 3 characters".to_string())
        );
        assert!(validate_not_empty("   ", "Username").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("bob").is_ok());
        assert!(validate_username("bob_home.1").is_ok());
        assert!(validate_username("bob@home").is_err());
        assert!(validate_username("bob home").is_err());
        assert!(validate_username("bob\t").is_err());
    }
}
