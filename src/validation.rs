//! Form field validation.
//!
//! Browsers submit every field as text. These helpers turn a raw field into
//! a typed value or a [`FieldError`] naming what was wrong, and are shared by
//! the create and update paths.

use thiserror::Error;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum FieldError {
    #[error("field `{0}` is missing")]
    Missing(&'static str),
    #[error("field `{0}` is blank")]
    Blank(&'static str),
    #[error("field `{0}` is not a number")]
    NotANumber(&'static str),
}

/// A text field that must be present and not blank after trimming.
///
/// Returns the value as submitted, untrimmed.
pub fn required_text<'a>(field: &'static str, raw: Option<&'a str>) -> Result<&'a str, FieldError> {
    let value = raw.ok_or(FieldError::Missing(field))?;
    if value.trim().is_empty() {
        return Err(FieldError::Blank(field));
    }
    Ok(value)
}

/// Parses an age. Surrounding whitespace and a leading sign are accepted.
pub fn parse_age(raw: &str) -> Result<i64, FieldError> {
    raw.trim().parse().map_err(|_| FieldError::NotANumber("age"))
}

/// `Some(value)` when the field was submitted with non-blank content.
pub fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.filter(|v| !v.trim().is_empty())
}
