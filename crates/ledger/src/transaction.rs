//! Transaction model: type tags, asset payloads, wire form, construction.

use crate::amount;
use crate::crypto::PublicKey;
use crate::error::{LedgerError, LedgerResult};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognized transaction type tags.
///
/// The wire carries a raw byte; tags outside this enum are tolerated at
/// construction and rejected by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransactionType {
    /// Plain balance transfer.
    Transfer = 0,
    /// Registers a second public key on the sender.
    SecondSignature = 1,
    /// Registers the sender as a delegate.
    DelegateRegistration = 2,
    /// Casts signed vote directives.
    Vote = 3,
    /// Moves value into a dapp-controlled balance.
    InTransfer = 6,
    /// Moves value out of a dapp-controlled balance.
    OutTransfer = 7,
}

impl TransactionType {
    /// Decodes a wire tag; `None` for unrecognized values.
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Transfer),
            1 => Some(Self::SecondSignature),
            2 => Some(Self::DelegateRegistration),
            3 => Some(Self::Vote),
            6 => Some(Self::InTransfer),
            7 => Some(Self::OutTransfer),
            _ => None,
        }
    }

    /// Wire tag for this type.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether two transactions of this type from one sender are disallowed
    /// within a single block. Capability table dispatched by tag.
    pub fn contains_unique_data(self) -> bool {
        matches!(
            self,
            Self::SecondSignature | Self::DelegateRegistration | Self::Vote
        )
    }

    /// True for the types the transfer-amount effect applies to.
    pub fn moves_amount(self) -> bool {
        matches!(self, Self::Transfer | Self::InTransfer | Self::OutTransfer)
    }
}

/// Direction of a single vote directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteSign {
    /// `+`: start counting the voter's balance toward the delegate.
    Up,
    /// `-`: stop counting it.
    Down,
}

/// One signed vote directive: a `+`/`-` sign concatenated with the target
/// delegate's public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteDirective {
    /// Upvote or downvote.
    pub sign: VoteSign,
    /// Target delegate.
    pub delegate: PublicKey,
}

impl VoteDirective {
    /// Creates a directive.
    pub fn new(sign: VoteSign, delegate: PublicKey) -> Self {
        Self { sign, delegate }
    }

    /// Parses the wire form `"+<hex pubkey>"` / `"-<hex pubkey>"`.
    pub fn parse(raw: &str) -> LedgerResult<Self> {
        let sign = match raw.chars().next() {
            Some('+') => VoteSign::Up,
            Some('-') => VoteSign::Down,
            _ => {
                return Err(LedgerError::construction(
                    "asset.votes",
                    format!("directive must start with '+' or '-': {raw:?}"),
                ))
            }
        };
        let delegate = PublicKey::from_hex(&raw[1..])
            .map_err(|e| LedgerError::construction("asset.votes", e.to_string()))?;
        Ok(Self { sign, delegate })
    }
}

impl fmt::Display for VoteDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.sign {
            VoteSign::Up => '+',
            VoteSign::Down => '-',
        };
        write!(f, "{sign}{}", self.delegate)
    }
}

/// Type-specific asset payload, dispatched by transaction tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    /// No payload.
    None,
    /// Vote directives carried by a vote transaction.
    Vote {
        /// Parsed directives, wire order preserved.
        directives: Vec<VoteDirective>,
    },
    /// In-transfer payload: references the dapp-registration transaction
    /// whose sender is the true beneficiary.
    InTransfer {
        /// Id of the referenced prior transaction.
        dapp_id: String,
    },
    /// Out-transfer payload.
    OutTransfer {
        /// Id of the dapp-registration transaction.
        dapp_id: String,
        /// Id of the withdrawal inside the dapp.
        transaction_id: String,
    },
}

/// Raw wire representation of a transaction.
///
/// Numeric fields are decimal strings to avoid precision loss; key and
/// signature material is hex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTransaction {
    /// Transaction id.
    pub id: String,
    /// Raw type tag.
    #[serde(rename = "type")]
    pub tx_type: u8,
    /// Transfer amount, decimal string.
    pub amount: String,
    /// Fee, decimal string.
    pub fee: String,
    /// Epoch timestamp.
    pub timestamp: u32,
    /// Sender address numeral.
    pub sender_id: String,
    /// Sender public key, hex.
    pub sender_public_key: String,
    /// Recipient address numeral; absent for vote transactions.
    pub recipient_id: Option<String>,
    /// Recipient public key, hex, when known.
    pub recipient_public_key: Option<String>,
    /// Primary signature, hex.
    pub signature: Option<String>,
    /// Second signature, hex.
    pub sign_signature: Option<String>,
    /// Multisignature set, hex.
    pub signatures: Vec<String>,
    /// Type-specific asset payload.
    pub asset: serde_json::Value,
}

/// A constructed transaction with normalized numerics and a parsed asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction id.
    pub id: String,
    /// Raw wire type tag; decode with [`Transaction::kind`].
    pub tx_type: u8,
    /// Transfer amount in base units.
    #[serde(with = "amount::decimal")]
    pub amount: BigInt,
    /// Fee in base units.
    #[serde(with = "amount::decimal")]
    pub fee: BigInt,
    /// Epoch timestamp.
    pub timestamp: u32,
    /// Sender address numeral.
    pub sender_id: String,
    /// Sender public key.
    pub sender_public_key: PublicKey,
    /// Recipient address numeral, when present.
    pub recipient_id: Option<String>,
    /// Recipient public key, when known.
    pub recipient_public_key: Option<PublicKey>,
    /// Primary signature bytes.
    pub signature: Option<Vec<u8>>,
    /// Second signature bytes.
    pub sign_signature: Option<Vec<u8>>,
    /// Multisignature set.
    pub signatures: Vec<Vec<u8>>,
    /// Parsed asset payload.
    pub asset: Asset,
}

impl Transaction {
    /// Normalizes a raw wire record into a transaction.
    ///
    /// Fails with [`LedgerError::Construction`] on malformed numerics, key
    /// material, or asset payloads. An unrecognized type tag is tolerated
    /// here (with [`Asset::None`]) and reported by validation instead.
    pub fn from_raw(raw: &RawTransaction) -> LedgerResult<Self> {
        if raw.id.is_empty() {
            return Err(LedgerError::construction("id", "missing transaction id"));
        }

        let sender_public_key = PublicKey::from_hex(&raw.sender_public_key)
            .map_err(|e| LedgerError::construction("senderPublicKey", e.to_string()))?;
        let recipient_public_key = raw
            .recipient_public_key
            .as_deref()
            .map(PublicKey::from_hex)
            .transpose()
            .map_err(|e| LedgerError::construction("recipientPublicKey", e.to_string()))?;

        Ok(Self {
            id: raw.id.clone(),
            tx_type: raw.tx_type,
            amount: amount::parse_unsigned("amount", &raw.amount)?,
            fee: amount::parse_unsigned("fee", &raw.fee)?,
            timestamp: raw.timestamp,
            sender_id: raw.sender_id.clone(),
            sender_public_key,
            recipient_id: raw.recipient_id.clone(),
            recipient_public_key,
            signature: decode_signature("signature", raw.signature.as_deref())?,
            sign_signature: decode_signature("signSignature", raw.sign_signature.as_deref())?,
            signatures: raw
                .signatures
                .iter()
                .map(|s| {
                    decode_signature("signatures", Some(s.as_str()))
                        .map(Option::unwrap_or_default)
                })
                .collect::<LedgerResult<_>>()?,
            asset: parse_asset(raw)?,
        })
    }

    /// Decoded type tag; `None` for unrecognized wire values.
    pub fn kind(&self) -> Option<TransactionType> {
        TransactionType::from_u8(self.tx_type)
    }

    /// Per-type uniqueness capability (see
    /// [`TransactionType::contains_unique_data`]). Unrecognized types carry
    /// no unique data.
    pub fn contains_unique_data(&self) -> bool {
        self.kind().map_or(false, TransactionType::contains_unique_data)
    }

    /// The vote directives of a vote transaction; empty for every other
    /// type.
    pub fn vote_directives(&self) -> &[VoteDirective] {
        match &self.asset {
            Asset::Vote { directives } => directives,
            _ => &[],
        }
    }
}

fn decode_signature(field: &str, raw: Option<&str>) -> LedgerResult<Option<Vec<u8>>> {
    raw.map(|s| {
        hex::decode(s).map_err(|e| LedgerError::construction(field, format!("invalid hex: {e}")))
    })
    .transpose()
}

fn parse_asset(raw: &RawTransaction) -> LedgerResult<Asset> {
    match TransactionType::from_u8(raw.tx_type) {
        Some(TransactionType::Vote) => {
            let votes = raw
                .asset
                .get("votes")
                .and_then(|v| v.as_array())
                .ok_or_else(|| {
                    LedgerError::construction("asset.votes", "missing vote directive list")
                })?;
            let directives = votes
                .iter()
                .map(|entry| {
                    entry
                        .as_str()
                        .ok_or_else(|| {
                            LedgerError::construction("asset.votes", "directive must be a string")
                        })
                        .and_then(VoteDirective::parse)
                })
                .collect::<LedgerResult<Vec<_>>>()?;
            Ok(Asset::Vote { directives })
        }
        Some(TransactionType::InTransfer) => Ok(Asset::InTransfer {
            dapp_id: asset_str(raw, "inTransfer", "dappId")?,
        }),
        Some(TransactionType::OutTransfer) => Ok(Asset::OutTransfer {
            dapp_id: asset_str(raw, "outTransfer", "dappId")?,
            transaction_id: asset_str(raw, "outTransfer", "transactionId")?,
        }),
        _ => Ok(Asset::None),
    }
}

fn asset_str(raw: &RawTransaction, section: &str, field: &str) -> LedgerResult<String> {
    raw.asset
        .get(section)
        .and_then(|s| s.get(field))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            LedgerError::construction(format!("asset.{section}.{field}"), "missing field")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pk_hex(seed: u8) -> String {
        PublicKey::from_bytes([seed; 32]).to_hex()
    }

    fn raw_transfer() -> RawTransaction {
        RawTransaction {
            id: "15096340494622587660".into(),
            tx_type: 0,
            amount: "500".into(),
            fee: "10".into(),
            timestamp: 32402500,
            sender_id: "5059876081639179984".into(),
            sender_public_key: pk_hex(1),
            recipient_id: Some("17589414416291980223".into()),
            signature: Some("ab".repeat(64)),
            ..Default::default()
        }
    }

    #[test]
    fn test_type_tags_roundtrip() {
        for tag in [0u8, 1, 2, 3, 6, 7] {
            assert_eq!(TransactionType::from_u8(tag).unwrap().as_u8(), tag);
        }
        assert_eq!(TransactionType::from_u8(4), None);
        assert_eq!(TransactionType::from_u8(42), None);
    }

    #[test]
    fn test_unique_data_capability_table() {
        assert!(TransactionType::Vote.contains_unique_data());
        assert!(TransactionType::SecondSignature.contains_unique_data());
        assert!(TransactionType::DelegateRegistration.contains_unique_data());
        assert!(!TransactionType::Transfer.contains_unique_data());
        assert!(!TransactionType::InTransfer.contains_unique_data());
    }

    #[test]
    fn test_directive_parse() {
        let up = VoteDirective::parse(&format!("+{}", pk_hex(5))).unwrap();
        assert_eq!(up.sign, VoteSign::Up);
        assert_eq!(up.delegate, PublicKey::from_bytes([5; 32]));

        let down = VoteDirective::parse(&format!("-{}", pk_hex(5))).unwrap();
        assert_eq!(down.sign, VoteSign::Down);

        assert!(VoteDirective::parse("~deadbeef").is_err());
        assert!(VoteDirective::parse("+tooshort").is_err());
        assert!(VoteDirective::parse("").is_err());
    }

    #[test]
    fn test_from_raw_transfer() {
        let tx = Transaction::from_raw(&raw_transfer()).unwrap();
        assert_eq!(tx.kind(), Some(TransactionType::Transfer));
        assert_eq!(tx.amount, BigInt::from(500));
        assert_eq!(tx.fee, BigInt::from(10));
        assert_eq!(tx.asset, Asset::None);
        assert_eq!(tx.signature.as_ref().unwrap().len(), 64);
    }

    #[test]
    fn test_from_raw_rejects_malformed_numerics() {
        let mut raw = raw_transfer();
        raw.amount = "12.5".into();
        assert!(matches!(
            Transaction::from_raw(&raw).unwrap_err(),
            LedgerError::Construction { .. }
        ));

        let mut raw = raw_transfer();
        raw.fee = "-1".into();
        assert!(Transaction::from_raw(&raw).is_err());
    }

    #[test]
    fn test_from_raw_vote_asset() {
        let mut raw = raw_transfer();
        raw.tx_type = 3;
        raw.recipient_id = None;
        raw.asset = json!({ "votes": [format!("+{}", pk_hex(7)), format!("-{}", pk_hex(8))] });

        let tx = Transaction::from_raw(&raw).unwrap();
        let directives = tx.vote_directives();
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].sign, VoteSign::Up);
        assert_eq!(directives[1].sign, VoteSign::Down);
        assert!(tx.contains_unique_data());
    }

    #[test]
    fn test_from_raw_vote_without_directives_fails() {
        let mut raw = raw_transfer();
        raw.tx_type = 3;
        raw.asset = json!({});
        assert!(Transaction::from_raw(&raw).is_err());
    }

    #[test]
    fn test_from_raw_in_transfer_asset() {
        let mut raw = raw_transfer();
        raw.tx_type = 6;
        raw.asset = json!({ "inTransfer": { "dappId": "5520406382776994538" } });

        let tx = Transaction::from_raw(&raw).unwrap();
        assert_eq!(
            tx.asset,
            Asset::InTransfer {
                dapp_id: "5520406382776994538".into()
            }
        );
    }

    #[test]
    fn test_from_raw_tolerates_unknown_type() {
        let mut raw = raw_transfer();
        raw.tx_type = 42;
        let tx = Transaction::from_raw(&raw).unwrap();
        assert_eq!(tx.kind(), None);
        assert_eq!(tx.asset, Asset::None);
        assert!(!tx.contains_unique_data());
    }

    #[test]
    fn test_wire_json_field_names() {
        let raw: RawTransaction = serde_json::from_value(json!({
            "id": "1",
            "type": 0,
            "amount": "5",
            "fee": "1",
            "timestamp": 7,
            "senderId": "99",
            "senderPublicKey": pk_hex(1),
            "recipientId": "42",
        }))
        .unwrap();
        assert_eq!(raw.tx_type, 0);
        assert_eq!(raw.sender_id, "99");
        assert_eq!(raw.recipient_id.as_deref(), Some("42"));
    }
}
