//! # Arbor Ledger
//!
//! The transaction-effect engine of an Arbor node: given a signed
//! transaction and current account state, deterministically mutate balances
//! and the delegate-vote-weight index, and exactly reverse the mutation on
//! rollback.
//!
//! ## Core Components
//!
//! - [`Transaction`] + lifecycle: construct from the wire, validate, verify
//!   against state, apply/undo the sender's fee burn, and produce the
//!   signable byte sequence.
//! - [`VoteLedger`]: the three delegate-weight effect families
//!   (transfer-amount, fee, new-vote), applied and undone symmetrically.
//! - [`CandidateIndex`]: the ordered `(weight, delegate) → address` index,
//!   kept consistent with every weight change via atomic rekeys.
//! - [`Account`], [`BlockApplication`], [`ValidationOutcome`]: the state and
//!   bookkeeping values the block processor drives this library with.
//!
//! The library is invoked by an external block processor that owns
//! transaction ordering, block-granularity commit/rollback of the state
//! store, and operator-facing error surfacing. Within a block, transactions
//! are applied strictly sequentially; inside one transaction the per-delegate
//! updates fan out concurrently and are joined before the effect resolves.

pub mod account;
pub mod amount;
pub mod candidate;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod lifecycle;
pub mod schema;
pub mod transaction;
pub mod vote_ledger;

// Re-exports
pub use account::Account;
pub use candidate::{CandidateIndex, CandidateRank, WEIGHT_DIGITS};
pub use crypto::PublicKey;
pub use error::{FieldError, LedgerError, LedgerResult, ValidationOutcome};
pub use lifecycle::BlockApplication;
pub use schema::{SchemaValidator, WireSchema};
pub use transaction::{
    Asset, RawTransaction, Transaction, TransactionType, VoteDirective, VoteSign,
};
pub use vote_ledger::VoteLedger;
