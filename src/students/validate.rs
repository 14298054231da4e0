//! Field-level acceptance rules for student records.

use super::types::StudentInput;
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;
use thiserror::Error;

/// Inclusive age bounds accepted for a student.
pub const AGE_RANGE: RangeInclusive<i64> = 18..=100;

// Dot-separated atoms before `@`; a dotted host whose final label starts and ends with a letter.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[\p{L}\p{N}!#$%&'*+/=?^_`{|}~-]+(?:\.[\p{L}\p{N}!#$%&'*+/=?^_`{|}~-]+)*",
        r"@(?:[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?\.)+",
        r"\p{L}(?:[\p{L}\p{N}-]*\p{L})?$",
    ))
    .expect("email pattern compiles")
});

/// Reasons a candidate record is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `name` was empty.
    #[error("name must not be empty")]
    EmptyName,
    /// `age` fell outside [`AGE_RANGE`].
    #[error("age {0} is outside the accepted range 18-100")]
    AgeOutOfRange(i64),
    /// `email` was empty.
    #[error("email must not be empty")]
    EmptyEmail,
    /// `email` did not look like an email address.
    #[error("email is not a valid address")]
    InvalidEmail,
}

/// Check a candidate record, reporting the first failing field.
pub fn validate(candidate: &StudentInput) -> Result<(), ValidationError> {
    if candidate.name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !AGE_RANGE.contains(&candidate.age) {
        return Err(ValidationError::AgeOutOfRange(candidate.age));
    }
    if candidate.email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if !EMAIL_PATTERN.is_match(&candidate.email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}
