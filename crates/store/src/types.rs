//! Storage types for the Arbor state store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket namespaces exposed by the state store.
///
/// Each bucket is an independent key range. [`Bucket::Candidates`] is the
/// only bucket whose key order is observable (delegate ranking scans); the
/// others are plain lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    /// Address → serialized account state.
    Accounts,
    /// Compound `(weight, delegate public key)` key → delegate address.
    /// Ordered; backs the candidate ranking index.
    Candidates,
    /// Transaction id → serialized transaction (dapp-origin lookups).
    Transactions,
}

impl Bucket {
    /// All buckets, in fixed order. Backends size their keyspaces off this.
    pub const ALL: [Bucket; 3] = [Bucket::Accounts, Bucket::Candidates, Bucket::Transactions];

    /// Stable index of this bucket within [`Bucket::ALL`].
    pub fn index(self) -> usize {
        match self {
            Bucket::Accounts => 0,
            Bucket::Candidates => 1,
            Bucket::Transactions => 2,
        }
    }

    /// Short namespace name, used in error messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            Bucket::Accounts => "accounts",
            Bucket::Candidates => "candidates",
            Bucket::Transactions => "transactions",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction for ordered scans over a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeekDirection {
    /// Ascending key order.
    Forward,
    /// Descending key order.
    Backward,
}

impl Default for SeekDirection {
    fn default() -> Self {
        Self::Forward
    }
}
