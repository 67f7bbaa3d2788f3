//! Bucket payload encoding.
//!
//! Accounts and transactions are stored bincode-encoded; candidate values
//! are plain address bytes and never pass through here.

use crate::account::Account;
use crate::error::{LedgerError, LedgerResult};
use crate::transaction::Transaction;
use serde::de::DeserializeOwned;
use serde::Serialize;

fn encode<T: Serialize>(value: &T) -> LedgerResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| LedgerError::Codec(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> LedgerResult<T> {
    bincode::deserialize(bytes).map_err(|e| LedgerError::Codec(e.to_string()))
}

/// Encodes an account for the accounts bucket.
pub fn encode_account(account: &Account) -> LedgerResult<Vec<u8>> {
    encode(account)
}

/// Decodes an account from the accounts bucket.
pub fn decode_account(bytes: &[u8]) -> LedgerResult<Account> {
    decode(bytes)
}

/// Encodes a transaction for the transactions bucket.
pub fn encode_transaction(tx: &Transaction) -> LedgerResult<Vec<u8>> {
    encode(tx)
}

/// Decodes a transaction from the transactions bucket.
pub fn decode_transaction(bytes: &[u8]) -> LedgerResult<Transaction> {
    decode(bytes)
}
