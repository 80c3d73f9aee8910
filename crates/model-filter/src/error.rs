//! Error types for the model-filter crate.

use thiserror::Error;

use crate::op::Op;

/// Errors that can occur when configuring an engine or applying its rules.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The engine was used before a filter key was set.
    #[error("filter key not set; call set_key before reading or writing form data")]
    NotConfigured,

    /// A `from`/`to` rule received a value that is not a recognizable date.
    #[error("invalid date for field '{field}': {value}")]
    InvalidDate { field: String, value: String },

    /// The query accumulator cannot express the condition a rule needs.
    #[error(
        "query builder does not support '{op}' conditions (column '{column}'): {method} is not implemented",
        method = .op.method()
    )]
    Unsupported { op: Op, column: String },

    /// The submitted value has a shape the rule cannot use.
    #[error("field '{field}' expects {expected}")]
    InvalidValue {
        field: String,
        expected: &'static str,
    },

    /// The filter state in the store could not be encoded or decoded.
    #[error("invalid filter state for '{key}': {source}")]
    State {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A rule definition in the positional `[kind, target]` format is malformed.
    #[error("invalid rule for field '{field}': {reason}")]
    InvalidRule { field: String, reason: String },
}

impl FilterError {
    /// Create an unsupported-condition error.
    pub fn unsupported(op: Op, column: impl Into<String>) -> Self {
        Self::Unsupported {
            op,
            column: column.into(),
        }
    }

    /// Create an invalid-date error.
    pub fn invalid_date(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidDate {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a filter-state error.
    pub fn state(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::State {
            key: key.into(),
            source,
        }
    }

    /// Create an invalid-rule error.
    pub fn invalid_rule(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;
