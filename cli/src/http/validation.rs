//! 基础请求验证逻辑

use super::models::HttpServerError;

const MAX_TEXT_CHARS: usize = 100_000;
const MAX_ID_CHARS: usize = 100;
const MAX_NAME_CHARS: usize = 255;

/// Request text for interpret/parse: non-empty after trimming, bounded.
pub fn validate_text(text: &str) -> Result<(), HttpServerError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(HttpServerError::InvalidRequest(
            "Text cannot be empty".to_string(),
        ));
    }
    let chars = trimmed.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(HttpServerError::InvalidRequest(format!(
            "Text too long ({} chars, max {})",
            chars, MAX_TEXT_CHARS
        )));
    }
    Ok(())
}

/// Linear identifiers (team/project ids) are opaque, but never blank or
/// whitespace-bearing.
pub fn validate_id(field: &str, value: &str) -> Result<(), HttpServerError> {
    if value.trim().is_empty() {
        return Err(HttpServerError::InvalidRequest(format!(
            "{field} is required"
        )));
    }
    if value.len() > MAX_ID_CHARS {
        return Err(HttpServerError::InvalidRequest(format!(
            "{field} too long ({} chars, max {})",
            value.len(),
            MAX_ID_CHARS
        )));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(HttpServerError::InvalidRequest(format!(
            "{field} cannot contain whitespace"
        )));
    }
    Ok(())
}

pub fn validate_name(field: &str, value: &str) -> Result<(), HttpServerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HttpServerError::InvalidRequest(format!(
            "{field} is required"
        )));
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(HttpServerError::InvalidRequest(format!(
            "{field} too long (max {MAX_NAME_CHARS} chars)"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text() {
        assert!(validate_text("organiza el login").is_ok());
        assert!(validate_text("  \n ").is_err());
        assert!(validate_text(&"a".repeat(MAX_TEXT_CHARS + 1)).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("teamId", "9cfb482a-81e3-4154-b5b9-2c805e70a02d").is_ok());
        assert!(validate_id("teamId", "").is_err());
        assert!(validate_id("teamId", "a b").is_err());
        assert!(validate_id("teamId", &"x".repeat(MAX_ID_CHARS + 1)).is_err());

        match validate_id("teamId", " ") {
            Err(HttpServerError::InvalidRequest(msg)) => assert_eq!(msg, "teamId is required"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("title", "Build login").is_ok());
        assert!(validate_name("title", "   ").is_err());
        assert!(validate_name("name", &"n".repeat(MAX_NAME_CHARS + 1)).is_err());
    }
}
