//! Per-transaction state machine: validate, verify against state, apply,
//! undo, and the signable byte layout.
//!
//! Fee bookkeeping against the sender's own balance lives here; the delegate
//! weight side effects live in [`crate::vote_ledger`]. Idempotency is
//! tracked in a [`BlockApplication`] record owned by the block processor,
//! not in a flag on the transaction itself, so one transaction value can be
//! considered for more than one block without state bleeding across.

use crate::account::Account;
use crate::amount;
use crate::crypto;
use crate::error::{FieldError, LedgerError, LedgerResult, ValidationOutcome};
use crate::schema::SchemaValidator;
use crate::transaction::Transaction;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Per-block record of which transaction ids have been applied.
///
/// Owned by the block processor; one record per block (and per undo
/// context). Apply marks ids, undo clears them.
#[derive(Debug, Clone, Default)]
pub struct BlockApplication {
    applied: HashSet<String>,
}

impl BlockApplication {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `id` has been applied in this block.
    pub fn is_applied(&self, id: &str) -> bool {
        self.applied.contains(id)
    }

    /// Marks `id` applied; returns false if it already was.
    pub fn mark(&mut self, id: &str) -> bool {
        self.applied.insert(id.to_string())
    }

    /// Clears `id`; returns false if it was not marked.
    pub fn clear(&mut self, id: &str) -> bool {
        self.applied.remove(id)
    }
}

impl Transaction {
    /// The deterministic byte sequence that is signed and hashed.
    ///
    /// Layout: type(1B) ‖ timestamp(4B LE) ‖ senderPublicKey(32B) ‖
    /// recipientId(8B numeric-LE, zero-filled if absent) ‖ amount(8B LE) ‖
    /// signature(variable, empty if absent) ‖ signSignature(variable, empty
    /// if absent).
    ///
    /// The fee is not part of this sequence. That asymmetry with the amount
    /// is a wire/consensus compatibility contract and must not change.
    pub fn signable_bytes(&self) -> LedgerResult<Vec<u8>> {
        self.bytes_with(true, true)
    }

    /// Signable bytes with signatures selectively excluded: primary
    /// signatures sign the fully unsigned form, second signatures sign the
    /// primary-signed form.
    fn bytes_with(&self, include_signature: bool, include_second: bool) -> LedgerResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(53 + 2 * 64);
        bytes.push(self.tx_type);
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        bytes.extend_from_slice(self.sender_public_key.as_bytes());

        let recipient = match &self.recipient_id {
            Some(address) => crypto::address_to_u64(address)
                .map_err(|e| LedgerError::construction("recipientId", e.to_string()))?,
            None => 0,
        };
        bytes.extend_from_slice(&recipient.to_le_bytes());

        let amount = amount::to_u64_le(&self.amount)
            .map_err(|e| LedgerError::construction("amount", e.to_string()))?;
        bytes.extend_from_slice(&amount);

        if include_signature {
            if let Some(signature) = &self.signature {
                bytes.extend_from_slice(signature);
            }
        }
        if include_second {
            if let Some(signature) = &self.sign_signature {
                bytes.extend_from_slice(signature);
            }
        }
        Ok(bytes)
    }

    /// Validates the transaction in isolation: recognized type, structural
    /// schema, signature presence, and cryptographic primary-signature
    /// verification. All failures are collected into the outcome, never
    /// thrown.
    pub fn validate(&self, schema: &dyn SchemaValidator) -> ValidationOutcome {
        let mut errors = Vec::new();

        if self.kind().is_none() {
            errors.push(FieldError::new(
                "type",
                format!("unrecognized transaction type {}", self.tx_type),
            ));
        }

        errors.extend(schema.validate(self));

        match &self.signature {
            None => errors.push(FieldError::new("signature", "missing primary signature")),
            Some(signature) => match self.bytes_with(false, false) {
                Ok(bytes) => {
                    let digest = crypto::transaction_digest(&bytes);
                    if !crypto::verify_signature(&self.sender_public_key, signature, &digest) {
                        errors.push(FieldError::new(
                            "signature",
                            "primary signature verification failed",
                        ));
                    }
                }
                Err(e) => errors.push(byte_layout_error(e, "signature")),
            },
        }

        if !errors.is_empty() {
            warn!(tx = %self.id, errors = errors.len(), "transaction failed validation");
        }
        ValidationOutcome::from_errors(errors)
    }

    /// Verifies the transaction against the sender's current state: the
    /// balance must cover the fee, and an account with a registered second
    /// public key must carry a valid second signature.
    ///
    /// Amount sufficiency for transfers is deliberately not checked here;
    /// that belongs to the surrounding balance-sufficiency check.
    pub fn verify_against_state(&self, sender: &Account) -> ValidationOutcome {
        let mut errors = Vec::new();

        if sender.balance < self.fee {
            errors.push(FieldError::new(
                "balance",
                format!(
                    "balance {} does not cover fee {}",
                    sender.balance, self.fee
                ),
            ));
        }

        if let Some(second_key) = &sender.second_public_key {
            match &self.sign_signature {
                None => errors.push(FieldError::new(
                    "signSignature",
                    "sender requires a second signature",
                )),
                Some(signature) => match self.bytes_with(true, false) {
                    Ok(bytes) => {
                        let digest = crypto::transaction_digest(&bytes);
                        if !crypto::verify_signature(second_key, signature, &digest) {
                            errors.push(FieldError::new(
                                "signSignature",
                                "second signature verification failed",
                            ));
                        }
                    }
                    Err(e) => errors.push(byte_layout_error(e, "signSignature")),
                },
            }
        }

        ValidationOutcome::from_errors(errors)
    }

    /// Applies the fee burn to the sender, returning an updated copy.
    ///
    /// The first call per block debits the fee and marks the id in the
    /// block record; subsequent calls are no-ops returning the sender
    /// unchanged.
    pub fn apply(&self, sender: &Account, block: &mut BlockApplication) -> LedgerResult<Account> {
        if block.is_applied(&self.id) {
            debug!(tx = %self.id, "apply skipped: already applied in this block");
            return Ok(sender.clone());
        }
        let updated = sender.debited(&self.fee)?;
        block.mark(&self.id);
        debug!(tx = %self.id, fee = %self.fee, sender = %sender.address, "fee applied");
        Ok(updated)
    }

    /// Reverses [`Transaction::apply`], returning an updated copy. A
    /// never-applied transaction is a no-op. Uses the fee recorded on the
    /// transaction, never post-apply state.
    pub fn undo(&self, sender: &Account, block: &mut BlockApplication) -> LedgerResult<Account> {
        if !block.clear(&self.id) {
            debug!(tx = %self.id, "undo skipped: not applied in this block");
            return Ok(sender.clone());
        }
        debug!(tx = %self.id, fee = %self.fee, sender = %sender.address, "fee reversed");
        Ok(sender.credited(&self.fee))
    }
}

/// Reports a signable-bytes failure against the wire field that could not
/// be encoded; `fallback` is the signature field under check when the
/// failure carries no field of its own.
fn byte_layout_error(err: LedgerError, fallback: &str) -> FieldError {
    match err {
        LedgerError::Construction { field, message } => FieldError::new(field, message),
        other => FieldError::new(fallback, other.to_string()),
    }
}
