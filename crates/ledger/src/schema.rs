//! Structural schema validation seam.
//!
//! The ledger consumes schema validation as an opaque pass/fail-plus-errors
//! check. [`WireSchema`] is the shipped structural implementation; embedders
//! with their own wire schema machinery implement [`SchemaValidator`]
//! themselves.

use crate::crypto;
use crate::error::FieldError;
use crate::transaction::{Transaction, TransactionType};
use num_traits::Zero;
use std::collections::HashSet;

/// Structural validator over constructed transactions.
pub trait SchemaValidator: Send + Sync {
    /// Returns every structural problem found; empty means pass.
    fn validate(&self, tx: &Transaction) -> Vec<FieldError>;
}

/// Built-in structural schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireSchema;

impl WireSchema {
    /// Upper bound on directives per vote transaction.
    pub const MAX_VOTES_PER_TRANSACTION: usize = 33;

    /// Byte length of an ed25519 signature.
    pub const SIGNATURE_LENGTH: usize = 64;
}

impl SchemaValidator for WireSchema {
    fn validate(&self, tx: &Transaction) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if tx.sender_id != crypto::derive_address(&tx.sender_public_key) {
            errors.push(FieldError::new(
                "senderId",
                "does not match address derived from senderPublicKey",
            ));
        }

        if let Some(signature) = &tx.signature {
            if signature.len() != Self::SIGNATURE_LENGTH {
                errors.push(FieldError::new(
                    "signature",
                    format!("expected {} bytes, got {}", Self::SIGNATURE_LENGTH, signature.len()),
                ));
            }
        }
        if let Some(signature) = &tx.sign_signature {
            if signature.len() != Self::SIGNATURE_LENGTH {
                errors.push(FieldError::new(
                    "signSignature",
                    format!("expected {} bytes, got {}", Self::SIGNATURE_LENGTH, signature.len()),
                ));
            }
        }

        match tx.kind() {
            Some(TransactionType::Transfer) | Some(TransactionType::OutTransfer) => {
                if tx.recipient_id.is_none() {
                    errors.push(FieldError::new("recipientId", "required for this type"));
                }
            }
            Some(TransactionType::Vote) => {
                if !tx.amount.is_zero() {
                    errors.push(FieldError::new("amount", "must be zero for vote transactions"));
                }
                let directives = tx.vote_directives();
                if directives.is_empty() {
                    errors.push(FieldError::new("asset.votes", "empty directive list"));
                } else if directives.len() > Self::MAX_VOTES_PER_TRANSACTION {
                    errors.push(FieldError::new(
                        "asset.votes",
                        format!(
                            "at most {} directives allowed, got {}",
                            Self::MAX_VOTES_PER_TRANSACTION,
                            directives.len()
                        ),
                    ));
                }
                let mut seen = HashSet::new();
                for directive in directives {
                    if !seen.insert(directive.delegate) {
                        errors.push(FieldError::new(
                            "asset.votes",
                            format!("duplicate directive target {}", directive.delegate),
                        ));
                    }
                }
            }
            _ => {}
        }

        errors
    }
}
