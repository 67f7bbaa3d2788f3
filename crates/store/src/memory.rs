//! In-memory state store backend.
//!
//! Ordered (BTreeMap per bucket) so candidate ranking scans behave the same
//! as against a durable ordered backend. Used by the core's tests and by
//! embedders that have not wired a persistent store.

use crate::error::{printable_key, StoreError, StoreResult};
use crate::traits::StateStore;
use crate::types::{Bucket, SeekDirection};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::trace;

type BucketMap = BTreeMap<Vec<u8>, Vec<u8>>;

/// An ordered in-memory [`StateStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: RwLock<[BucketMap; Bucket::ALL.len()]>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held in `bucket`.
    pub fn len(&self, bucket: Bucket) -> usize {
        self.buckets.read()[bucket.index()].len()
    }

    /// Returns true if `bucket` holds no entries.
    pub fn is_empty(&self, bucket: Bucket) -> bool {
        self.len(bucket) == 0
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn try_get(&self, bucket: Bucket, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.buckets.read()[bucket.index()].get(key).cloned())
    }

    async fn set(&self, bucket: Bucket, key: &[u8], value: Vec<u8>) -> StoreResult<()> {
        trace!(%bucket, key = %printable_key(key), len = value.len(), "set");
        self.buckets.write()[bucket.index()].insert(key.to_vec(), value);
        Ok(())
    }

    async fn replace(
        &self,
        bucket: Bucket,
        old_key: &[u8],
        new_key: &[u8],
        value: Vec<u8>,
    ) -> StoreResult<()> {
        trace!(
            %bucket,
            old_key = %printable_key(old_key),
            new_key = %printable_key(new_key),
            "replace"
        );
        let mut buckets = self.buckets.write();
        let map = &mut buckets[bucket.index()];
        if map.remove(old_key).is_none() {
            return Err(StoreError::replace_missing(bucket, old_key));
        }
        map.insert(new_key.to_vec(), value);
        Ok(())
    }

    async fn remove(&self, bucket: Bucket, key: &[u8]) -> StoreResult<()> {
        trace!(%bucket, key = %printable_key(key), "remove");
        self.buckets.write()[bucket.index()].remove(key);
        Ok(())
    }

    async fn scan(
        &self,
        bucket: Bucket,
        direction: SeekDirection,
        limit: usize,
    ) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let buckets = self.buckets.read();
        let map = &buckets[bucket.index()];
        let entries: Vec<(Vec<u8>, Vec<u8>)> = match direction {
            SeekDirection::Forward => map
                .iter()
                .take(limit)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            SeekDirection::Backward => map
                .iter()
                .rev()
                .take(limit)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        };
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let store = MemoryStore::new();
        store
            .set(Bucket::Accounts, b"411", b"alpha".to_vec())
            .await
            .unwrap();

        assert_eq!(
            store.get(Bucket::Accounts, b"411").await.unwrap(),
            b"alpha".to_vec()
        );
        assert_eq!(store.len(Bucket::Accounts), 1);
    }

    #[tokio::test]
    async fn test_get_missing_key_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get(Bucket::Accounts, b"nope").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            store.try_get(Bucket::Accounts, b"nope").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_buckets_are_isolated() {
        let store = MemoryStore::new();
        store
            .set(Bucket::Accounts, b"k", b"a".to_vec())
            .await
            .unwrap();

        assert_eq!(store.try_get(Bucket::Candidates, b"k").await.unwrap(), None);
        assert_eq!(
            store.try_get(Bucket::Transactions, b"k").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_replace_rekeys_atomically() {
        let store = MemoryStore::new();
        store
            .set(Bucket::Candidates, b"old", b"addr".to_vec())
            .await
            .unwrap();

        store
            .replace(Bucket::Candidates, b"old", b"new", b"addr".to_vec())
            .await
            .unwrap();

        assert_eq!(store.try_get(Bucket::Candidates, b"old").await.unwrap(), None);
        assert_eq!(
            store.get(Bucket::Candidates, b"new").await.unwrap(),
            b"addr".to_vec()
        );
        assert_eq!(store.len(Bucket::Candidates), 1);
    }

    #[tokio::test]
    async fn test_replace_missing_old_key_leaves_bucket_untouched() {
        let store = MemoryStore::new();
        store
            .set(Bucket::Candidates, b"other", b"x".to_vec())
            .await
            .unwrap();

        let err = store
            .replace(Bucket::Candidates, b"gone", b"new", b"x".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ReplaceMissing { .. }));

        assert_eq!(store.try_get(Bucket::Candidates, b"new").await.unwrap(), None);
        assert_eq!(store.len(Bucket::Candidates), 1);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = MemoryStore::new();
        store
            .set(Bucket::Transactions, b"t1", b"raw".to_vec())
            .await
            .unwrap();

        store.remove(Bucket::Transactions, b"t1").await.unwrap();
        store.remove(Bucket::Transactions, b"t1").await.unwrap();
        assert!(store.is_empty(Bucket::Transactions));
    }

    #[tokio::test]
    async fn test_scan_orders_by_key() {
        let store = MemoryStore::new();
        for key in [b"b".to_vec(), b"a".to_vec(), b"c".to_vec()] {
            store
                .set(Bucket::Candidates, &key, key.clone())
                .await
                .unwrap();
        }

        let forward = store
            .scan(Bucket::Candidates, SeekDirection::Forward, 10)
            .await
            .unwrap();
        let keys: Vec<&[u8]> = forward.iter().map(|(k, _)| k.as_slice()).collect();
        assert_eq!(keys, vec![b"a".as_slice(), b"b", b"c"]);

        let backward = store
            .scan(Bucket::Candidates, SeekDirection::Backward, 2)
            .await
            .unwrap();
        let keys: Vec<&[u8]> = backward.iter().map(|(k, _)| k.as_slice()).collect();
        assert_eq!(keys, vec![b"c".as_slice(), b"b"]);
    }
}
