use std::borrow::Cow;

use validator::{ValidateUrl, ValidationError};

/// Accepts an absolute URL or an empty string (the client clearing the field).
pub fn url_or_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_url() {
        return Ok(());
    }

    Err(ValidationError::new("url").with_message(Cow::Borrowed("URL inválida")))
}

/// Maps `Some("")` to `None` so cleared fields are stored as NULL.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_or_empty() {
        assert!(url_or_empty("").is_ok());
        assert!(url_or_empty("https://youtu.be/dQw4w9WgXcQ").is_ok());
        assert!(url_or_empty("not a url").is_err());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
