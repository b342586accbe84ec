//! Account data transactions: typed key-value entries.
//!
//! Delete entries exist only in the canonical (protobuf-boundary)
//! representation; the legacy binary format has no encoding for them, and
//! attempting to marshal one is an error rather than a silent skip.

use std::collections::HashSet;

use crate::codec::{ByteReader, ByteWriter};
use crate::config::{Scheme, MAX_DATA_ENTRIES, MAX_DATA_TX_BYTES};
use crate::crypto::{Digest, PublicKey, SecretKey};
use crate::error::{CryptoError, DecodeContext, DecodeError, Error, ValidationError};
use crate::transaction::fields::{check_long, check_positive_long};
use crate::transaction::proofs::Proofs;
use crate::transaction::{body_digest, expect_marker_type_version, Transactional, TransactionType};

const DATA_VERSION: u8 = 1;

mod base58_bytes {
    pub fn serialize<S: serde::Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&bs58::encode(bytes).into_string())
    }

    pub fn deserialize<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        use serde::Deserialize;
        let s = String::deserialize(d)?;
        bs58::decode(&s).into_vec().map_err(serde::de::Error::custom)
    }
}

/// One typed key-value entry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataEntry {
    Integer {
        key: String,
        value: i64,
    },
    Boolean {
        key: String,
        value: bool,
    },
    Binary {
        key: String,
        #[serde(with = "base58_bytes")]
        value: Vec<u8>,
    },
    String {
        key: String,
        value: String,
    },
    /// Removes the key. Carried only by the canonical representation.
    Delete {
        key: String,
    },
}

const ENTRY_INTEGER: u8 = 0;
const ENTRY_BOOLEAN: u8 = 1;
const ENTRY_BINARY: u8 = 2;
const ENTRY_STRING: u8 = 3;

impl DataEntry {
    pub fn key(&self) -> &str {
        match self {
            DataEntry::Integer { key, .. }
            | DataEntry::Boolean { key, .. }
            | DataEntry::Binary { key, .. }
            | DataEntry::String { key, .. }
            | DataEntry::Delete { key } => key,
        }
    }

    fn write_to(&self, w: &mut ByteWriter) -> Result<(), ValidationError> {
        match self {
            DataEntry::Integer { key, value } => {
                w.write_u16_string(key);
                w.write_u8(ENTRY_INTEGER);
                w.write_u64(*value as u64);
            }
            DataEntry::Boolean { key, value } => {
                w.write_u16_string(key);
                w.write_u8(ENTRY_BOOLEAN);
                w.write_bool(*value);
            }
            DataEntry::Binary { key, value } => {
                w.write_u16_string(key);
                w.write_u8(ENTRY_BINARY);
                w.write_u16_bytes(value);
            }
            DataEntry::String { key, value } => {
                w.write_u16_string(key);
                w.write_u8(ENTRY_STRING);
                w.write_u16_string(value);
            }
            DataEntry::Delete { .. } => return Err(ValidationError::DeleteNotRepresentable),
        }
        Ok(())
    }

    fn read_from(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let key = r.read_u16_string("data entry key")?;
        match r.read_u8()? {
            ENTRY_INTEGER => Ok(DataEntry::Integer {
                key,
                value: r.read_i64()?,
            }),
            ENTRY_BOOLEAN => Ok(DataEntry::Boolean {
                key,
                value: r.read_bool()?,
            }),
            ENTRY_BINARY => Ok(DataEntry::Binary {
                key,
                value: r.read_u16_bytes()?,
            }),
            ENTRY_STRING => Ok(DataEntry::String {
                key,
                value: r.read_u16_string("data entry value")?,
            }),
            got => Err(DecodeError::UnknownDiscriminant {
                entity: "data entry type",
                got,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DataWithProofs {
    pub version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    pub sender_pk: PublicKey,
    pub entries: Vec<DataEntry>,
    pub fee: u64,
    pub timestamp: u64,
}

impl DataWithProofs {
    pub fn new(sender_pk: PublicKey, entries: Vec<DataEntry>, fee: u64, timestamp: u64) -> Self {
        Self {
            version: DATA_VERSION,
            id: None,
            proofs: None,
            sender_pk,
            entries,
            fee,
            timestamp,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        expect_marker_type_version(
            &mut r,
            "data transaction",
            TransactionType::Data,
            DATA_VERSION,
        )?;
        let sender_pk = PublicKey::new(r.read_array()?);
        let count = r.read_u16()? as usize;
        if count > MAX_DATA_ENTRIES {
            return Err(DecodeError::LimitExceeded {
                entity: "data entries",
                limit: MAX_DATA_ENTRIES,
                got: count,
            }
            .into());
        }
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            entries.push(
                DataEntry::read_from(&mut r).ctx("failed to unmarshal data entry from bytes")?,
            );
        }
        let timestamp = r.read_u64()?;
        let fee = r.read_u64()?;
        let proofs =
            Proofs::read_from(&mut r).ctx("failed to unmarshal data transaction from bytes")?;
        r.expect_end()?;

        let mut tx = Self::new(sender_pk, entries, fee, timestamp);
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }

    fn has_delete_entries(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e, DataEntry::Delete { .. }))
    }
}

impl Transactional for DataWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Data
    }

    fn version(&self) -> u8 {
        self.version
    }

    fn id(&self) -> Option<&Digest> {
        self.id.as_ref()
    }

    fn body_bytes(&self, _scheme: Scheme) -> Result<Vec<u8>, Error> {
        let mut w = ByteWriter::new();
        w.write_u8(0);
        w.write_u8(TransactionType::Data.to_byte());
        w.write_u8(self.version);
        w.write_bytes(self.sender_pk.as_bytes());
        w.write_u16(self.entries.len() as u16);
        for entry in &self.entries {
            entry.write_to(&mut w)?;
        }
        w.write_u64(self.timestamp);
        w.write_u64(self.fee);
        Ok(w.into_vec())
    }

    fn sign(&mut self, scheme: Scheme, secret_key: &SecretKey) -> Result<(), Error> {
        let body = self.body_bytes(scheme)?;
        let mut proofs = self.proofs.take().unwrap_or_default();
        proofs.sign(secret_key, &body);
        self.proofs = Some(proofs);
        self.id = Some(body_digest(&body));
        Ok(())
    }

    fn verify(&self, scheme: Scheme, public_key: &PublicKey) -> Result<bool, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("data transaction"))?;
        let body = self.body_bytes(scheme)?;
        Ok(proofs.verify(public_key, &body)?)
    }

    fn generate_id(&mut self, scheme: Scheme) -> Result<(), Error> {
        if self.id.is_none() {
            let body = self.body_bytes(scheme)?;
            self.id = Some(body_digest(&body));
        }
        Ok(())
    }

    fn validate(&self, scheme: Scheme) -> Result<(), ValidationError> {
        if self.entries.len() > MAX_DATA_ENTRIES {
            return Err(ValidationError::TooMany {
                field: "data entries",
                count: self.entries.len(),
                max: MAX_DATA_ENTRIES,
            });
        }
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.key().is_empty() {
                return Err(ValidationError::LengthOutOfBounds {
                    field: "data entry key",
                    len: 0,
                    min: 1,
                    max: u16::MAX as usize,
                });
            }
            if !seen.insert(entry.key()) {
                return Err(ValidationError::DuplicateKey {
                    key: entry.key().to_string(),
                });
            }
        }
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)?;
        // The byte budget binds the legacy binary form; a canonical-only
        // transaction (one with delete entries) has no such form to bound.
        if !self.has_delete_entries() {
            let size = self
                .body_bytes(scheme)
                .map(|b| b.len())
                .unwrap_or(usize::MAX);
            if size > MAX_DATA_TX_BYTES {
                return Err(ValidationError::SizeExceeded {
                    field: "data transaction",
                    size,
                    max: MAX_DATA_TX_BYTES,
                });
            }
        }
        Ok(())
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("data transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        proofs.write_to(&mut w);
        Ok(w.into_vec())
    }
}
