//! Error taxonomy and aggregate validation results.
//!
//! Two distinct channels, matching how the block processor consumes them:
//!
//! - Per-transaction validation and state verification come back as
//!   [`ValidationOutcome`] values (boolean plus collected field errors),
//!   reported to the caller for rejection before block inclusion.
//! - Everything that fires during apply/undo is a [`LedgerError`] and is
//!   fatal to the enclosing block; in particular a store `NotFound` must
//!   propagate untouched so the block processor can discard the whole block.

use arbor_store::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors raised by the transaction-effect engine.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A raw wire record could not be normalized into a transaction.
    #[error("construction failed on field {field}: {message}")]
    Construction {
        /// Wire field that failed to parse.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// A transaction reached apply/undo in a shape the effect engine cannot
    /// process (e.g. a transfer with no recipient).
    #[error("invalid transaction {id}: {message}")]
    InvalidTransaction {
        /// Offending transaction id.
        id: String,
        /// What was wrong with it.
        message: String,
    },

    /// Monetary arithmetic left its domain (negative balance, value too
    /// wide for its wire encoding).
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// A vote weight exceeded the fixed-width candidate key encoding.
    #[error("vote weight exceeds {digits}-digit candidate key encoding")]
    WeightOverflow {
        /// Digit capacity of the encoding.
        digits: usize,
    },

    /// Bucket payload (de)serialization failure.
    #[error("codec error: {0}")]
    Codec(String),

    /// Key material that could not be decoded.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// State store failure; `NotFound` during apply/undo aborts the block.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Create a construction error for the given wire field.
    pub fn construction<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Construction {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-transaction error.
    pub fn invalid_transaction<I: Into<String>, M: Into<String>>(id: I, message: M) -> Self {
        Self::InvalidTransaction {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error is a store missing-key condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_not_found())
    }
}

/// A single field-level problem found during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field the problem was found on.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Aggregate validation/verification report.
///
/// All failures are collected and returned, never thrown: this is a value
/// the block processor inspects, not an error that unwinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// True when no errors were collected.
    pub validated: bool,
    /// Every problem found, in check order.
    pub errors: Vec<FieldError>,
}

impl ValidationOutcome {
    /// A passing outcome.
    pub fn ok() -> Self {
        Self {
            validated: true,
            errors: Vec::new(),
        }
    }

    /// Build an outcome from collected errors; passes iff the list is empty.
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            validated: errors.is_empty(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_store::Bucket;

    #[test]
    fn test_store_not_found_is_detected_through_wrapper() {
        let err = LedgerError::from(StoreError::not_found(Bucket::Accounts, b"411"));
        assert!(err.is_not_found());

        let other = LedgerError::Arithmetic("underflow".into());
        assert!(!other.is_not_found());
    }

    #[test]
    fn test_outcome_from_errors() {
        assert!(ValidationOutcome::from_errors(Vec::new()).validated);

        let failed =
            ValidationOutcome::from_errors(vec![FieldError::new("signature", "missing")]);
        assert!(!failed.validated);
        assert_eq!(failed.errors.len(), 1);
        assert_eq!(failed.errors[0].to_string(), "signature: missing");
    }
}
