use thiserror::Error;

pub const MAX_TEXT_LENGTH: usize = 200;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Task text cannot be empty")]
    EmptyText,

    #[error("Task text cannot exceed {MAX_TEXT_LENGTH} characters")]
    TextTooLong,
}

/// Validate and sanitize task text: trim, reject empty/oversized input,
/// strip control characters.
pub fn validate_text(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyText);
    }

    if trimmed.len() > MAX_TEXT_LENGTH {
        return Err(ValidationError::TextTooLong);
    }

    let sanitized = trimmed
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect::<String>();

    Ok(sanitized)
}
