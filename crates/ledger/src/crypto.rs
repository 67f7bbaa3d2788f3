//! Cryptographic seam: key material, address derivation, digests, and
//! signature checks.
//!
//! The primitives themselves (ed25519, sha256) are consumed as opaque,
//! correct functions from library crates; this module only fixes the exact
//! rules the ledger depends on, chiefly how an address numeral is derived
//! from a public key.

use crate::error::{LedgerError, LedgerResult};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Byte length of an ed25519 public key.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// A 32-byte ed25519 public key, carried as hex on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Wraps raw key bytes.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parses a 64-character hex string.
    pub fn from_hex(raw: &str) -> LedgerResult<Self> {
        let bytes = hex::decode(raw)
            .map_err(|e| LedgerError::Crypto(format!("invalid public key hex: {e}")))?;
        let bytes: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|b: Vec<u8>| {
            LedgerError::Crypto(format!(
                "public key must be {PUBLIC_KEY_LENGTH} bytes, got {}",
                b.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for PublicKey {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::from_hex(&raw).map_err(|e| e.to_string())
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.to_hex()
    }
}

/// Derives the stable address numeral for a public key: the first 8 bytes of
/// `sha256(public_key)` read as a little-endian u64, rendered in decimal.
pub fn derive_address(public_key: &PublicKey) -> String {
    let digest = Sha256::digest(public_key.as_bytes());
    let mut word = [0u8; 8];
    word.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(word).to_string()
}

/// Parses an address numeral back into the u64 used by the signable byte
/// layout.
pub fn address_to_u64(address: &str) -> LedgerResult<u64> {
    address
        .parse::<u64>()
        .map_err(|_| LedgerError::Crypto(format!("address is not a u64 numeral: {address:?}")))
}

/// The sha256 digest signed by transaction signatures.
pub fn transaction_digest(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

/// Verifies an ed25519 signature over a transaction digest. Malformed key
/// or signature material verifies as false rather than erroring: a bad
/// signature is a validation outcome, not a fault.
pub fn verify_signature(public_key: &PublicKey, signature: &[u8], digest: &[u8; 32]) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(public_key.as_bytes()) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    key.verify(digest, &signature).is_ok()
}
