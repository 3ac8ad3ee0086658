//! Maps store-level unique violations onto domain conflicts.

use crate::errors::ServiceError;

/// A field guarded by a unique constraint and the message shown when it clashes.
#[derive(Clone, Copy, Debug)]
pub struct ConflictRule {
    pub field: &'static str,
    pub message: &'static str,
}

/// Translate a `UniqueViolation` whose target names a field in `rules` into
/// `Conflict`. Rules are tried in order. Everything else passes through.
pub fn translate(err: ServiceError, rules: &[ConflictRule]) -> ServiceError {
    match err {
        ServiceError::UniqueViolation { target } => {
            match rules.iter().find(|rule| target.iter().any(|t| t == rule.field)) {
                Some(rule) => ServiceError::Conflict(rule.message.to_string()),
                None => ServiceError::UniqueViolation { target },
            }
        }
        other => other,
    }
}
