//! Candidate index: the secondary ordered mapping
//! `(voteWeight, delegatePublicKey) → delegateAddress`.
//!
//! Keys must sort lexicographically in true numeric weight order, so the
//! weight component uses a fixed-width, sign-aware encoding: a sign byte
//! (`0` negative, `1` non-negative) followed by a 39-digit zero-padded
//! magnitude, with negative weights stored as their 10^39 complement. An
//! unpadded decimal prefix would sort `"9"` after `"10"`; that defect is
//! not reproduced here.

use crate::crypto::PublicKey;
use crate::error::{LedgerError, LedgerResult};
use arbor_store::{Bucket, SeekDirection, StateStore};
use num_bigint::BigInt;
use num_traits::Signed;
use std::str::FromStr;

/// Digit capacity of the weight component.
pub const WEIGHT_DIGITS: usize = 39;

fn weight_bound() -> BigInt {
    BigInt::from(10).pow(WEIGHT_DIGITS as u32)
}

/// Encodes a vote weight into its fixed-width, sign-aware key component.
///
/// Fails with [`LedgerError::WeightOverflow`] if the magnitude needs more
/// than [`WEIGHT_DIGITS`] digits; base-unit supplies of real deployments sit
/// far below that bound.
pub fn encode_weight(weight: &BigInt) -> LedgerResult<String> {
    let bound = weight_bound();
    if weight.abs() >= bound {
        return Err(LedgerError::WeightOverflow {
            digits: WEIGHT_DIGITS,
        });
    }
    let (sign, magnitude) = if weight.is_negative() {
        // Complement keeps more-negative weights sorting earlier.
        ('0', &bound + weight)
    } else {
        ('1', weight.clone())
    };
    let digits = magnitude.to_string();
    Ok(format!("{sign}{digits:0>width$}", width = WEIGHT_DIGITS))
}

/// Decodes a weight component produced by [`encode_weight`].
pub fn decode_weight(encoded: &str) -> LedgerResult<BigInt> {
    let malformed = || LedgerError::Codec(format!("malformed weight key component: {encoded:?}"));
    if encoded.len() != WEIGHT_DIGITS + 1 {
        return Err(malformed());
    }
    let magnitude = BigInt::from_str(&encoded[1..]).map_err(|_| malformed())?;
    match encoded.as_bytes()[0] {
        b'1' => Ok(magnitude),
        b'0' => Ok(magnitude - weight_bound()),
        _ => Err(malformed()),
    }
}

/// Builds the full compound key for a delegate at a given weight.
pub fn candidate_key(weight: &BigInt, delegate: &PublicKey) -> LedgerResult<Vec<u8>> {
    let mut key = encode_weight(weight)?;
    key.push_str(&delegate.to_hex());
    Ok(key.into_bytes())
}

/// One decoded entry of a ranking scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRank {
    /// Weight encoded in the entry's key.
    pub weight: BigInt,
    /// Delegate public key encoded in the entry's key.
    pub delegate: PublicKey,
    /// Delegate address stored as the entry's value.
    pub address: String,
}

/// Operations over the candidate bucket. Stateless; every call goes through
/// the store.
pub struct CandidateIndex;

impl CandidateIndex {
    /// Inserts the entry for a delegate at `weight`.
    pub async fn insert(
        store: &dyn StateStore,
        weight: &BigInt,
        delegate: &PublicKey,
        address: &str,
    ) -> LedgerResult<()> {
        let key = candidate_key(weight, delegate)?;
        store
            .set(Bucket::Candidates, &key, address.as_bytes().to_vec())
            .await?;
        Ok(())
    }

    /// Removes the entry for a delegate at `weight`.
    pub async fn remove(
        store: &dyn StateStore,
        weight: &BigInt,
        delegate: &PublicKey,
    ) -> LedgerResult<()> {
        let key = candidate_key(weight, delegate)?;
        store.remove(Bucket::Candidates, &key).await?;
        Ok(())
    }

    /// Atomically moves a delegate's entry from `old_weight` to
    /// `new_weight`. The account write and this rekey form one atomic unit
    /// from the block processor's point of view: any failure aborts the
    /// enclosing block.
    pub async fn rekey(
        store: &dyn StateStore,
        old_weight: &BigInt,
        new_weight: &BigInt,
        delegate: &PublicKey,
        address: &str,
    ) -> LedgerResult<()> {
        let old_key = candidate_key(old_weight, delegate)?;
        let new_key = candidate_key(new_weight, delegate)?;
        store
            .replace(
                Bucket::Candidates,
                &old_key,
                &new_key,
                address.as_bytes().to_vec(),
            )
            .await?;
        Ok(())
    }

    /// Top `limit` delegates by weight, descending.
    pub async fn rank(store: &dyn StateStore, limit: usize) -> LedgerResult<Vec<CandidateRank>> {
        let entries = store
            .scan(Bucket::Candidates, SeekDirection::Backward, limit)
            .await?;
        entries
            .into_iter()
            .map(|(key, value)| decode_entry(&key, &value))
            .collect()
    }
}

fn decode_entry(key: &[u8], value: &[u8]) -> LedgerResult<CandidateRank> {
    let key = std::str::from_utf8(key)
        .map_err(|_| LedgerError::Codec("candidate key is not utf-8".into()))?;
    if key.len() <= WEIGHT_DIGITS + 1 {
        return Err(LedgerError::Codec(format!(
            "candidate key too short: {key:?}"
        )));
    }
    let (weight_part, delegate_part) = key.split_at(WEIGHT_DIGITS + 1);
    let address = String::from_utf8(value.to_vec())
        .map_err(|_| LedgerError::Codec("candidate value is not utf-8".into()))?;
    Ok(CandidateRank {
        weight: decode_weight(weight_part)?,
        delegate: PublicKey::from_hex(delegate_part)?,
        address,
    })
}
