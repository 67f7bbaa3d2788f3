//! # Arbor Store
//!
//! Storage contract for the Arbor ledger state-transition core.
//!
//! ## Crate Purpose
//!
//! This crate is the single source of truth for how the ledger core talks to
//! persistent state. It deliberately contains no durability logic: the real
//! backing store (with block-granularity commit/rollback) is an external
//! collaborator, consumed through the [`StateStore`] trait. The crate
//! provides:
//!
//! - **Bucket namespaces**: [`Bucket`] — accounts, candidate index,
//!   transactions.
//! - **Storage trait**: [`StateStore`] — get/set/atomic-rekey over bucketed
//!   key-value state, async at every I/O boundary.
//! - **Error taxonomy**: [`StoreError`], [`StoreResult`].
//! - **In-memory backend**: [`MemoryStore`] — an ordered implementation used
//!   by tests and embedders without a durable backend.
//!
//! ## Example
//!
//! ```rust,ignore
//! use arbor_store::{Bucket, MemoryStore, StateStore};
//!
//! let store = MemoryStore::new();
//! store.set(Bucket::Accounts, b"411".to_vec(), b"...".to_vec()).await?;
//! let value = store.get(Bucket::Accounts, b"411").await?;
//! ```

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

// Re-exports
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use traits::StateStore;
pub use types::{Bucket, SeekDirection};
