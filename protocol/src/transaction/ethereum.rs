//! Foreign-format transactions recognized at the dispatch boundary.
//!
//! These arrive in an RLP-style encoding that is not the canonical
//! envelope. This layer recognizes them structurally, carries the raw
//! bytes opaquely, and derives the identifier the way their home network
//! does (Keccak-256 over the raw bytes). Field decoding, signing, and
//! verification happen in a dedicated layer elsewhere.

use crate::config::Scheme;
use crate::crypto::{keccak256, Digest, PublicKey, SecretKey};
use crate::error::{CryptoError, DecodeError, Error, ValidationError};
use crate::transaction::{Transactional, TransactionType};

/// Leading byte of an RLP list; legacy foreign transactions start here.
const RLP_LIST_FLOOR: u8 = 0xC0;
/// Typed-envelope discriminants used by newer foreign transactions.
const TYPED_ENVELOPE_MAX: u8 = 0x04;

/// Returns `true` when the leading byte marks a foreign-format blob
/// rather than the canonical envelope.
pub fn looks_like_ethereum(data: &[u8]) -> bool {
    match data.first() {
        Some(&b) => b >= RLP_LIST_FLOOR || (1..=TYPED_ENVELOPE_MAX).contains(&b),
        None => false,
    }
}

/// An opaque foreign-format transaction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EthereumTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    /// The raw RLP-style bytes, carried untouched.
    pub raw: Vec<u8>,
}

impl EthereumTransaction {
    pub fn unmarshal_binary(data: &[u8], _scheme: Scheme) -> Result<Self, Error> {
        if data.is_empty() {
            return Err(DecodeError::Underflow {
                needed: 1,
                remaining: 0,
            }
            .into());
        }
        if !looks_like_ethereum(data) {
            return Err(DecodeError::Malformed {
                entity: "ethereum transaction",
                reason: format!("leading byte {:#04x} is not an RLP or typed envelope", data[0]),
            }
            .into());
        }
        Ok(Self {
            id: Some(Digest::new(keccak256(data))),
            raw: data.to_vec(),
        })
    }
}

impl Transactional for EthereumTransaction {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Ethereum
    }

    fn version(&self) -> u8 {
        1
    }

    fn id(&self) -> Option<&Digest> {
        self.id.as_ref()
    }

    fn body_bytes(&self, _scheme: Scheme) -> Result<Vec<u8>, Error> {
        Ok(self.raw.clone())
    }

    fn sign(&mut self, _scheme: Scheme, _secret_key: &SecretKey) -> Result<(), Error> {
        Err(CryptoError::Unsupported("ethereum transaction").into())
    }

    fn verify(&self, _scheme: Scheme, _public_key: &PublicKey) -> Result<bool, Error> {
        Err(CryptoError::Unsupported("ethereum transaction").into())
    }

    fn generate_id(&mut self, _scheme: Scheme) -> Result<(), Error> {
        if self.id.is_none() {
            self.id = Some(Digest::new(keccak256(&self.raw)));
        }
        Ok(())
    }

    fn validate(&self, _scheme: Scheme) -> Result<(), ValidationError> {
        if self.raw.is_empty() {
            return Err(ValidationError::LengthOutOfBounds {
                field: "ethereum transaction",
                len: 0,
                min: 1,
                max: usize::MAX,
            });
        }
        Ok(())
    }

    fn marshal_binary(&self, _scheme: Scheme) -> Result<Vec<u8>, Error> {
        Ok(self.raw.clone())
    }
}
