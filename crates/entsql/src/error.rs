//! Error types for entsql

use crate::column::OperationType;
use thiserror::Error;

/// Result type alias for compile operations
pub type CompileResult<T> = Result<T, CompileError>;

/// Failures raised while turning entity metadata into SQL.
///
/// A compile either yields a complete statement or one of these; nothing is
/// ever partially emitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Operation value outside Exists/Delete/Insert/Select/Update
    #[error("Invalid operation '{value}' requested for entity type '{source_type}'")]
    InvalidOperation { value: String, source_type: String },

    /// Row-scoped operation resolved to no predicate columns
    #[error("{operation} on '{entity}' has no predicate columns; refusing to emit an unconditional statement")]
    MissingPredicate {
        operation: OperationType,
        entity: String,
    },

    /// Operation resolved to no payload columns
    #[error("{operation} on '{entity}' has no payload columns")]
    MissingPayload {
        operation: OperationType,
        entity: String,
    },

    /// Required input absent or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CompileError {
    /// Create an invalid operation error
    pub fn invalid_operation(value: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self::InvalidOperation {
            value: value.into(),
            source_type: source_type.into(),
        }
    }

    /// Create a missing predicate error
    pub fn missing_predicate(operation: OperationType, entity: impl Into<String>) -> Self {
        Self::MissingPredicate {
            operation,
            entity: entity.into(),
        }
    }

    /// Create a missing payload error
    pub fn missing_payload(operation: OperationType, entity: impl Into<String>) -> Self {
        Self::MissingPayload {
            operation,
            entity: entity.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Check if this is an invalid operation error
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation { .. })
    }

    /// Check if this is a missing predicate error
    pub fn is_missing_predicate(&self) -> bool {
        matches!(self, Self::MissingPredicate { .. })
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
