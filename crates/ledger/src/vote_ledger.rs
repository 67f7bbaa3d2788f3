//! Delegate-vote-weight side effects of a transaction.
//!
//! Three independent effect families, all evaluated from the same unmodified
//! transaction record and the pre-fee sender snapshot:
//!
//! - **transfer-amount**: credits the resolved recipient's delegates with
//!   the amount (transfer, in-transfer, out-transfer types only);
//! - **fee**: debits the sender's delegates by the fee (every type);
//! - **new-vote**: moves the sender's balance onto upvoted delegates and off
//!   downvoted ones (vote type only).
//!
//! No family depends on another's result. They are driven in a fixed
//! sequence here so that a delegate touched by more than one family never
//! sees two concurrent index rekeys; within one family the targets are
//! distinct delegates, so their updates fan out concurrently and are joined
//! before the family resolves.

use crate::account::Account;
use crate::candidate::CandidateIndex;
use crate::codec;
use crate::crypto::{self, PublicKey};
use crate::error::{LedgerError, LedgerResult};
use crate::transaction::{Asset, Transaction, TransactionType, VoteSign};
use arbor_store::{Bucket, StateStore};
use futures::future::try_join_all;
use num_bigint::BigInt;
use tracing::{debug, trace};

/// Whether the effects are being laid down or rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Apply,
    Undo,
}

impl Direction {
    /// Orients a forward delta: unchanged on apply, negated on undo.
    fn orient(self, delta: BigInt) -> BigInt {
        match self {
            Direction::Apply => delta,
            Direction::Undo => -delta,
        }
    }
}

/// Orchestrates the vote-weight side effects of one transaction.
pub struct VoteLedger;

impl VoteLedger {
    /// Applies all vote-weight effects of `tx`.
    ///
    /// `sender` must be the sender account as it stood before the fee was
    /// deducted; the block processor passes the same snapshot to
    /// [`VoteLedger::undo_vote`] so rollback reverses bit-for-bit.
    /// Transaction types none of the families apply to degenerate to no-ops.
    pub async fn apply_vote(
        store: &dyn StateStore,
        tx: &Transaction,
        sender: &Account,
    ) -> LedgerResult<()> {
        Self::process(store, tx, sender, Direction::Apply).await
    }

    /// Exactly reverses [`VoteLedger::apply_vote`] for the same inputs.
    pub async fn undo_vote(
        store: &dyn StateStore,
        tx: &Transaction,
        sender: &Account,
    ) -> LedgerResult<()> {
        Self::process(store, tx, sender, Direction::Undo).await
    }

    async fn process(
        store: &dyn StateStore,
        tx: &Transaction,
        sender: &Account,
        direction: Direction,
    ) -> LedgerResult<()> {
        debug!(tx = %tx.id, ?direction, "processing vote-weight effects");
        Self::amount_effect(store, tx, direction).await?;
        Self::fee_effect(store, tx, sender, direction).await?;
        Self::vote_effect(store, tx, sender, direction).await?;
        Ok(())
    }

    /// Transfer-amount family: ±`amount` for every delegate the resolved
    /// recipient votes for. For in-transfers the real beneficiary is the
    /// sender of the referenced dapp transaction, not the nominal recipient.
    async fn amount_effect(
        store: &dyn StateStore,
        tx: &Transaction,
        direction: Direction,
    ) -> LedgerResult<()> {
        match tx.kind() {
            Some(kind) if kind.moves_amount() => {}
            _ => return Ok(()),
        }

        let beneficiary = match &tx.asset {
            Asset::InTransfer { dapp_id } => {
                let bytes = store.get(Bucket::Transactions, dapp_id.as_bytes()).await?;
                let origin = codec::decode_transaction(&bytes)?;
                origin.sender_id
            }
            _ => tx.recipient_id.clone().ok_or_else(|| {
                LedgerError::invalid_transaction(&tx.id, "amount-moving transaction without recipient")
            })?,
        };

        let recipient = read_account(store, &beneficiary).await?;
        let shifts: Vec<(PublicKey, BigInt)> = recipient
            .voted_delegates
            .iter()
            .map(|delegate| (*delegate, direction.orient(tx.amount.clone())))
            .collect();
        Self::shift_all(store, shifts).await
    }

    /// Fee family: ∓`fee` for every delegate the sender votes for. A spent
    /// fee is burned chain-wide and stops counting toward the sender's
    /// delegates' influence.
    async fn fee_effect(
        store: &dyn StateStore,
        tx: &Transaction,
        sender: &Account,
        direction: Direction,
    ) -> LedgerResult<()> {
        let shifts: Vec<(PublicKey, BigInt)> = sender
            .voted_delegates
            .iter()
            .map(|delegate| (*delegate, direction.orient(-tx.fee.clone())))
            .collect();
        Self::shift_all(store, shifts).await
    }

    /// New-vote family: upvoted delegates gain the sender's pre-fee
    /// balance; downvoted delegates lose it but get the fee back in the same
    /// step, netting against the fee family which runs unconditionally for
    /// the sender's remaining delegates.
    async fn vote_effect(
        store: &dyn StateStore,
        tx: &Transaction,
        sender: &Account,
        direction: Direction,
    ) -> LedgerResult<()> {
        if tx.kind() != Some(TransactionType::Vote) {
            return Ok(());
        }

        let shifts: Vec<(PublicKey, BigInt)> = tx
            .vote_directives()
            .iter()
            .map(|directive| {
                let forward = match directive.sign {
                    VoteSign::Up => sender.balance.clone(),
                    VoteSign::Down => &tx.fee - &sender.balance,
                };
                (directive.delegate, direction.orient(forward))
            })
            .collect();
        Self::shift_all(store, shifts).await
    }

    /// Bounded fan-out with an aggregated completion barrier: every delegate
    /// update must have settled before the family is considered done,
    /// otherwise a returning effect could race the block commit.
    async fn shift_all(
        store: &dyn StateStore,
        shifts: Vec<(PublicKey, BigInt)>,
    ) -> LedgerResult<()> {
        try_join_all(
            shifts
                .into_iter()
                .map(|(delegate, delta)| Self::shift_weight(store, delegate, delta)),
        )
        .await?;
        Ok(())
    }

    /// Applies one weight delta: read the delegate account, adjust `votes`,
    /// persist it, and rekey its candidate entry. The write and the rekey
    /// are one atomic unit; any failure propagates and aborts the enclosing
    /// block before a partial state can be committed.
    async fn shift_weight(
        store: &dyn StateStore,
        delegate: PublicKey,
        delta: BigInt,
    ) -> LedgerResult<()> {
        let address = crypto::derive_address(&delegate);
        let bytes = store.get(Bucket::Accounts, address.as_bytes()).await?;
        let mut account = codec::decode_account(&bytes)?;

        let old_weight = account.votes.clone();
        account.votes = &old_weight + &delta;
        trace!(
            delegate = %delegate,
            %delta,
            old = %old_weight,
            new = %account.votes,
            "shifting delegate weight"
        );

        store
            .set(
                Bucket::Accounts,
                address.as_bytes(),
                codec::encode_account(&account)?,
            )
            .await?;
        CandidateIndex::rekey(store, &old_weight, &account.votes, &delegate, &address).await
    }
}

/// Reads and decodes an account; a missing account is fatal to the block.
pub(crate) async fn read_account(
    store: &dyn StateStore,
    address: &str,
) -> LedgerResult<Account> {
    let bytes = store.get(Bucket::Accounts, address.as_bytes()).await?;
    codec::decode_account(&bytes)
}
