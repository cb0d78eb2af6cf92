//! # Domain Errors
//!
//! Every error is terminal for the invocation that raised it. Nothing is
//! written to the ledger when an invocation fails.

use thiserror::Error;

/// Errors raised by the ledger collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A key read by the transaction changed before commit (MVCC read conflict).
    #[error("read conflict on key {key}: version changed before commit")]
    Conflict { key: String },

    /// Storage-level failure.
    #[error("ledger I/O error: {message}")]
    Io { message: String },
}

/// Errors returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Wrong number of positional arguments.
    #[error("Incorrect number of arguments. Expecting {expected}, got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    /// A positional argument could not be accepted. `position` is 1-based.
    #[error("argument {position}: {reason}")]
    InvalidArgument { position: usize, reason: String },

    /// No live record under this key.
    #[error("Land does not exist: {key}")]
    NotFound { key: String },

    /// Stored bytes do not decode as a parcel.
    #[error("Failed to decode record of {key}: {reason}")]
    MalformedRecord { key: String, reason: String },

    /// The key's history contains a deletion.
    #[error("Land {key} has been deleted")]
    RetiredKey { key: String },

    /// Fork child extents exceed the parent's extent.
    #[error("Partitioned extents ({requested}) exceed the original extent ({available})")]
    ExtentExceeded { requested: u128, available: u64 },

    /// A record or response payload could not be serialized.
    #[error("Failed to encode {what}: {reason}")]
    Encoding { what: &'static str, reason: String },

    /// Dispatch miss.
    #[error("Invalid registry function name: {name}")]
    UnknownFunction { name: String },

    /// Propagated verbatim from the ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl RegistryError {
    pub fn invalid_argument(position: usize, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            position,
            reason: reason.into(),
        }
    }

    /// Arity and value errors are both argument errors to callers.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::ArgumentCount { .. } | Self::InvalidArgument { .. }
        )
    }

    pub fn is_retired_key(&self) -> bool {
        matches!(self, Self::RetiredKey { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RegistryError::ArgumentCount {
            expected: 5,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Incorrect number of arguments. Expecting 5, got 2"
        );

        let err = RegistryError::invalid_argument(4, "must be a numeric string");
        assert_eq!(err.to_string(), "argument 4: must be a numeric string");
        assert!(err.is_invalid_argument());

        let err = RegistryError::RetiredKey {
            key: "LAND3".to_string(),
        };
        assert!(err.to_string().contains("LAND3"));
        assert!(err.is_retired_key());

        let err = RegistryError::Encoding {
            what: "response payload",
            reason: "key must be a string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to encode response payload: key must be a string"
        );
    }

    #[test]
    fn test_ledger_error_is_surfaced_verbatim() {
        let ledger = LedgerError::Io {
            message: "disk unavailable".to_string(),
        };
        let err: RegistryError = ledger.clone().into();
        assert_eq!(err.to_string(), ledger.to_string());
    }
}
