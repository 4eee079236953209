//! Field validation rules applied to form drafts before dispatch.

use crate::error::{DomainError, DomainResult};

/// Reject a value that is empty once surrounding whitespace is removed.
pub fn require_non_empty(value: &str, message: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(message));
    }
    Ok(())
}

/// Reject a value whose trimmed length is below `min` characters.
pub fn require_min_trimmed_len(value: &str, min: usize, message: &str) -> DomainResult<()> {
    if value.trim().chars().count() < min {
        return Err(DomainError::validation(message));
    }
    Ok(())
}

pub fn require_non_negative(value: i64, message: &str) -> DomainResult<()> {
    if value < 0 {
        return Err(DomainError::validation(message));
    }
    Ok(())
}

pub fn require_present<T>(value: Option<T>, message: &str) -> DomainResult<T> {
    value.ok_or_else(|| DomainError::validation(message))
}
