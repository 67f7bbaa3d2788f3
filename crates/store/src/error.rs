//! Error types for state store operations.

use crate::types::Bucket;
use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during state store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Key not found in the given bucket.
    ///
    /// During transaction apply/undo this is fatal to the enclosing block:
    /// callers must propagate it, never swallow it.
    #[error("key not found in bucket {bucket}: {key}")]
    NotFound {
        /// Bucket that was queried.
        bucket: Bucket,
        /// Printable form of the missing key.
        key: String,
    },

    /// Atomic rekey referenced an old key that is not present.
    #[error("replace in bucket {bucket} missing old key: {old_key}")]
    ReplaceMissing {
        /// Bucket the rekey targeted.
        bucket: Bucket,
        /// Printable form of the missing old key.
        old_key: String,
    },

    /// Backend-specific failure.
    #[error("storage backend error: {message}")]
    Backend {
        /// Error message from the backend.
        message: String,
    },
}

impl StoreError {
    /// Create a not-found error for the given bucket and key.
    pub fn not_found(bucket: Bucket, key: &[u8]) -> Self {
        Self::NotFound {
            bucket,
            key: printable_key(key),
        }
    }

    /// Create a replace-missing error for the given bucket and old key.
    pub fn replace_missing(bucket: Bucket, old_key: &[u8]) -> Self {
        Self::ReplaceMissing {
            bucket,
            old_key: printable_key(old_key),
        }
    }

    /// Create a backend error.
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Returns true if this error is a missing-key condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Keys are ASCII in every bucket this core uses; fall back to hex if not.
pub(crate) fn printable_key(key: &[u8]) -> String {
    match std::str::from_utf8(key) {
        Ok(s) if s.chars().all(|c| !c.is_control()) => s.to_string(),
        _ => key.iter().map(|b| format!("{b:02x}")).collect(),
    }
}
