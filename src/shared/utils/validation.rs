use crate::domain::errors::{DomainError, DomainResult};
use regex::Regex;
use std::sync::OnceLock;

/// Login ids are 3-50 characters of letters, digits, `_`, `.` and `-`.
pub fn validate_login_id(login_id: &str) -> DomainResult<String> {
    static LOGIN_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = LOGIN_ID_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_.\-]{3,50}$").expect("Invalid login id regex"));

    let trimmed = login_id.trim();
    if !re.is_match(trimmed) {
        return Err(DomainError::ValidationError(
            "Login ID must be 3-50 characters of letters, digits, '_', '.' or '-'".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

/// Trims `value` and checks its length in characters.
pub fn validate_text(field: &str, value: &str, min: usize, max: usize) -> DomainResult<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();

    if len < min.max(1) {
        return Err(DomainError::ValidationError(format!("{} is required", field)));
    }
    if len < min || len > max {
        return Err(DomainError::ValidationError(format!(
            "{} must be {}-{} characters",
            field, min, max
        )));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_id_rules() {
        assert_eq!(validate_login_id(" kim.dev_01 ").unwrap(), "kim.dev_01");
        assert!(validate_login_id("ab").is_err());
        assert!(validate_login_id("has space").is_err());
        assert!(validate_login_id("kim@club").is_err());
        assert!(validate_login_id(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_text_length() {
        assert_eq!(validate_text("Name", "  Kim ", 2, 50).unwrap(), "Kim");
        assert!(matches!(
            validate_text("Name", "   ", 2, 50),
            Err(DomainError::ValidationError(msg)) if msg == "Name is required"
        ));
        assert!(validate_text("Name", "K", 2, 50).is_err());
        assert!(validate_text("Title", &"x".repeat(201), 1, 200).is_err());
    }
}
