//! Input validation shared by the inventory, preference and recipe types.

use crate::types::{EmailError, QuantityError};

/// Maximum length of an ingredient, utensil or taste name.
pub const NAME_MAX_LEN: usize = 100;

/// A user-correctable problem with submitted data.
///
/// Validation runs before anything reaches storage, so a `ValidationError`
/// never means data was changed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field}: {source}")]
    Quantity {
        field: &'static str,
        #[source]
        source: QuantityError,
    },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    #[error("{field} must contain at least one entry")]
    Empty { field: &'static str },

    #[error("no changes supplied")]
    NoChanges,

    #[error(transparent)]
    Email(#[from] EmailError),
}

impl ValidationError {
    /// The input field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::TooLong { field, .. }
            | Self::Quantity { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::Empty { field } => field,
            Self::NoChanges => "body",
            Self::Email(_) => "email",
        }
    }
}

/// Trim a required name and enforce [`NAME_MAX_LEN`].
///
/// # Errors
///
/// Returns [`ValidationError::Required`] for blank input and
/// [`ValidationError::TooLong`] past the limit.
pub fn required_name(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    required_text(field, raw, NAME_MAX_LEN)
}

/// Trim required free text and enforce a maximum length in characters.
///
/// # Errors
///
/// See [`required_name`].
pub fn required_text(field: &'static str, raw: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Check that an integer setting lies in `min..=max`.
///
/// # Errors
///
/// Returns [`ValidationError::OutOfRange`] otherwise.
pub fn in_range(field: &'static str, value: i32, min: i32, max: i32) -> Result<i32, ValidationError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: i64::from(min),
            max: i64::from(max),
        })
    }
}
