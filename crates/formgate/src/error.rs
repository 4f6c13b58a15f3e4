// File: src/error.rs
// Purpose: Error types for rule parsing and failed validation

use crate::messages::MessageBag;
use thiserror::Error;

/// Raised when a rule shorthand such as `"required|max:abc"` cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleParseError {
    #[error("unknown validation rule `{0}`")]
    UnknownRule(String),

    #[error("validation rule `{0}` requires a parameter")]
    MissingParameter(String),

    #[error("validation rule `{rule}` expects a number, got `{value}`")]
    InvalidParameter { rule: String, value: String },
}

/// Validation failed for at least one field
#[derive(Debug, Clone, PartialEq, Error)]
#[error("the given data was invalid ({} field(s) with errors)", .errors.len())]
pub struct ValidationFailure {
    errors: MessageBag,
}

impl ValidationFailure {
    pub fn new(errors: MessageBag) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &MessageBag {
        &self.errors
    }

    pub fn into_errors(self) -> MessageBag {
        self.errors
    }
}
