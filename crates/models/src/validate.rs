//! Field validators shared by the user and farm inputs.
//!
//! Length limits mirror the `varchar` widths in the migrations so that a
//! value passing validation always fits its column.

use crate::errors::ModelError;

/// Names, counties and locations.
pub const TEXT_MAX: usize = 128;
/// `farm.name`
pub const FARM_NAME_MAX: usize = 255;
/// `farm.ownership`
pub const OWNERSHIP_MAX: usize = 64;
/// `user.email`
pub const EMAIL_MAX: usize = 255;

/// Anything non-blank up to `max` characters.
pub fn validate_text(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}
