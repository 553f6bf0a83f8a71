//! Validation error types for client configuration.
//!
//! These errors are raised while constructing a client and are never
//! recovered internally.

use std::fmt;

/// Errors that can occur while validating a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing from the configuration.
    MissingRequiredField {
        /// The name of the missing field (e.g., "key" or "log").
        field: String,
    },

    /// A field that is only required under a condition is missing.
    ConditionalRequirementFailed {
        /// The name of the missing field.
        field: String,
        /// The condition that triggered the requirement (e.g., "production").
        condition: String,
    },
}

impl ValidationError {
    pub(crate) fn missing(field: &str) -> Self {
        ValidationError::MissingRequiredField {
            field: field.to_string(),
        }
    }

    pub(crate) fn required_for(field: &str, condition: &str) -> Self {
        ValidationError::ConditionalRequirementFailed {
            field: field.to_string(),
            condition: condition.to_string(),
        }
    }

    /// The name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingRequiredField { field } => field,
            ValidationError::ConditionalRequirementFailed { field, .. } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingRequiredField { field } => {
                write!(f, "{} is required", field)
            }
            ValidationError::ConditionalRequirementFailed { field, condition } => {
                write!(f, "{} is required for {}", field, condition)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
