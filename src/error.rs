//! Error types.

use thiserror::Error;

/// Errors surfaced by construction, conversion and minimization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymError {
    /// Wrong arity or wrong operand sort for a node's declared signature.
    #[error("invalid argument for {kind}: {reason}")]
    InvalidArgument { kind: String, reason: String },

    /// Internal misuse of a builder or node.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Kind missing from the ordering table.
    #[error("kind `{0}` is missing from the ordering table")]
    UnknownKind(String),

    /// A value could not be turned into a canonical node.
    #[error("{value:?} is not a valid expression: {cause}")]
    ConversionFailure { value: String, cause: String },
}

pub type Result<T> = std::result::Result<T, SymError>;

impl SymError {
    pub(crate) fn invalid(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        SymError::InvalidArgument {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn conversion(value: impl Into<String>, cause: impl Into<String>) -> Self {
        SymError::ConversionFailure {
            value: value.into(),
            cause: cause.into(),
        }
    }
}
