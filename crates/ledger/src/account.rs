//! Account state.

use crate::amount;
use crate::crypto::{self, PublicKey};
use crate::error::{LedgerError, LedgerResult};
use crate::transaction::{VoteDirective, VoteSign};
use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Represents the state of one account.
///
/// Every account carries the delegate-side `votes` weight field; for
/// non-delegate accounts it simply stays zero. The weight is maintained
/// incrementally by the vote ledger and is never recomputed from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable identity, derived from the public key.
    pub address: String,

    /// The account's primary public key.
    pub public_key: PublicKey,

    /// Optional second public key; when present, transactions from this
    /// account must carry a valid second signature.
    pub second_public_key: Option<PublicKey>,

    /// Balance in base units. Never negative.
    #[serde(with = "amount::decimal")]
    pub balance: BigInt,

    /// Delegates this account currently votes for, in vote order, no
    /// duplicates.
    pub voted_delegates: Vec<PublicKey>,

    /// Total stake weight delegated to this account (delegate accounts
    /// only; zero otherwise).
    #[serde(with = "amount::decimal")]
    pub votes: BigInt,
}

impl Account {
    /// Creates an empty account for a public key, deriving its address.
    pub fn new(public_key: PublicKey) -> Self {
        Self {
            address: crypto::derive_address(&public_key),
            public_key,
            second_public_key: None,
            balance: BigInt::zero(),
            voted_delegates: Vec::new(),
            votes: BigInt::zero(),
        }
    }

    /// Creates an account with an initial balance.
    pub fn with_balance(public_key: PublicKey, balance: BigInt) -> Self {
        let mut account = Self::new(public_key);
        account.balance = balance;
        account
    }

    /// Returns a copy with `value` added to the balance. The original is
    /// untouched.
    pub fn credited(&self, value: &BigInt) -> Self {
        let mut account = self.clone();
        account.balance += value;
        account
    }

    /// Returns a copy with `value` subtracted from the balance, failing if
    /// the balance would go negative. The original is untouched.
    pub fn debited(&self, value: &BigInt) -> LedgerResult<Self> {
        let remaining = &self.balance - value;
        if amount::is_negative(&remaining) {
            return Err(LedgerError::Arithmetic(format!(
                "debit of {value} would overdraw account {} (balance {})",
                self.address, self.balance
            )));
        }
        let mut account = self.clone();
        account.balance = remaining;
        Ok(account)
    }

    /// Returns true if this account currently votes for `delegate`.
    pub fn votes_for(&self, delegate: &PublicKey) -> bool {
        self.voted_delegates.contains(delegate)
    }

    /// Adds a delegate to the voted list; a duplicate add is a no-op.
    pub fn add_vote(&mut self, delegate: PublicKey) {
        if !self.votes_for(&delegate) {
            self.voted_delegates.push(delegate);
        }
    }

    /// Removes a delegate from the voted list; removing an absent entry is
    /// a no-op.
    pub fn remove_vote(&mut self, delegate: &PublicKey) {
        self.voted_delegates.retain(|d| d != delegate);
    }

    /// Applies a vote transaction's directives to this account's own voted
    /// list: upvotes are added, downvotes removed.
    pub fn apply_directives(&mut self, directives: &[VoteDirective]) {
        for directive in directives {
            match directive.sign {
                VoteSign::Up => self.add_vote(directive.delegate),
                VoteSign::Down => self.remove_vote(&directive.delegate),
            }
        }
    }

    /// Reverses the membership changes of [`Account::apply_directives`].
    /// Re-added delegates land at the end of the list; only membership, not
    /// position, is significant to the effect engine.
    pub fn revert_directives(&mut self, directives: &[VoteDirective]) {
        for directive in directives {
            match directive.sign {
                VoteSign::Up => self.remove_vote(&directive.delegate),
                VoteSign::Down => self.add_vote(directive.delegate),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(seed: u8) -> PublicKey {
        PublicKey::from_bytes([seed; 32])
    }

    #[test]
    fn test_new_derives_address() {
        let account = Account::new(key(1));
        assert_eq!(account.address, crypto::derive_address(&key(1)));
        assert!(account.balance.is_zero());
        assert!(account.votes.is_zero());
    }

    #[test]
    fn test_credited_and_debited_are_copies() {
        let account = Account::with_balance(key(1), BigInt::from(1000));

        let credited = account.credited(&BigInt::from(500));
        assert_eq!(credited.balance, BigInt::from(1500));
        assert_eq!(account.balance, BigInt::from(1000));

        let debited = account.debited(&BigInt::from(10)).unwrap();
        assert_eq!(debited.balance, BigInt::from(990));
        assert_eq!(account.balance, BigInt::from(1000));
    }

    #[test]
    fn test_debited_rejects_overdraw() {
        let account = Account::with_balance(key(1), BigInt::from(5));
        let err = account.debited(&BigInt::from(6)).unwrap_err();
        assert!(matches!(err, LedgerError::Arithmetic(_)));
    }

    #[test]
    fn test_vote_list_edits() {
        let mut account = Account::new(key(1));
        account.add_vote(key(2));
        account.add_vote(key(2)); // duplicate is a no-op
        account.add_vote(key(3));
        assert_eq!(account.voted_delegates.len(), 2);
        assert!(account.votes_for(&key(2)));

        account.remove_vote(&key(2));
        assert!(!account.votes_for(&key(2)));
        account.remove_vote(&key(2)); // absent is a no-op
        assert_eq!(account.voted_delegates, vec![key(3)]);
    }

    #[test]
    fn test_directives_roundtrip() {
        let mut account = Account::new(key(1));
        account.add_vote(key(4));
        let before = account.clone();

        let directives = vec![
            VoteDirective::new(VoteSign::Up, key(5)),
            VoteDirective::new(VoteSign::Down, key(4)),
        ];
        account.apply_directives(&directives);
        assert!(account.votes_for(&key(5)));
        assert!(!account.votes_for(&key(4)));

        account.revert_directives(&directives);
        assert_eq!(account, before);
    }
}
