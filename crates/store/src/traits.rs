//! The `StateStore` trait: bucketed key-value access consumed by the ledger
//! core.
//!
//! Durability, write buffering, and block-granularity commit/rollback live in
//! the backend behind this trait. The core only suspends at these I/O
//! boundaries and never holds partial state across them.

use crate::error::{StoreError, StoreResult};
use crate::types::{Bucket, SeekDirection};
use async_trait::async_trait;

/// Transactional bucketed key-value access.
///
/// Implementations must be safe for concurrent use: the ledger core fans out
/// independent per-delegate writes and joins on all of them before an effect
/// is considered applied.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Returns the value for `key`, or `None` if absent.
    async fn try_get(&self, bucket: Bucket, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Returns the value for `key`, failing with [`StoreError::NotFound`]
    /// if absent.
    async fn get(&self, bucket: Bucket, key: &[u8]) -> StoreResult<Vec<u8>> {
        self.try_get(bucket, key)
            .await?
            .ok_or_else(|| StoreError::not_found(bucket, key))
    }

    /// Upserts `value` under `key`.
    async fn set(&self, bucket: Bucket, key: &[u8], value: Vec<u8>) -> StoreResult<()>;

    /// Atomically rekeys an entry within an ordered bucket: removes
    /// `old_key`, inserts `value` under `new_key`. Fails with
    /// [`StoreError::ReplaceMissing`] if `old_key` is absent, leaving the
    /// bucket untouched.
    ///
    /// Used exclusively for the candidate index.
    async fn replace(
        &self,
        bucket: Bucket,
        old_key: &[u8],
        new_key: &[u8],
        value: Vec<u8>,
    ) -> StoreResult<()>;

    /// Removes `key` if present. Removing an absent key is not an error.
    async fn remove(&self, bucket: Bucket, key: &[u8]) -> StoreResult<()>;

    /// Scans up to `limit` entries of `bucket` in the given key order.
    async fn scan(
        &self,
        bucket: Bucket,
        direction: SeekDirection,
        limit: usize,
    ) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>>;
}
