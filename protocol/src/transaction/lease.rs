//! Leasing: delegating generating balance to another account, and taking
//! the delegation back.
//!
//! Envelope irregularities preserved per shape: the modern Lease body has
//! no scheme byte and instead carries a reserved zero byte where an asset
//! flag would sit (leases are native-token only); the modern LeaseCancel
//! body does embed the scheme byte.

use crate::codec::{ByteReader, ByteWriter};
use crate::config::{Scheme, DIGEST_SIZE};
use crate::crypto::{self, Digest, PublicKey, SecretKey, Signature};
use crate::error::{CryptoError, DecodeContext, DecodeError, Error, ValidationError};
use crate::identity::Recipient;
use crate::transaction::fields::{check_long, check_positive_long};
use crate::transaction::proofs::Proofs;
use crate::transaction::{
    body_digest, expect_marker_type_version, expect_scheme, Transactional, TransactionType,
};

// ---------------------------------------------------------------------------
// Lease
// ---------------------------------------------------------------------------

/// Fields common to every lease generation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Lease {
    pub sender_pk: PublicKey,
    pub recipient: Recipient,
    pub amount: u64,
    pub fee: u64,
    pub timestamp: u64,
}

impl Lease {
    fn write_to(&self, w: &mut ByteWriter) {
        w.write_bytes(self.sender_pk.as_bytes());
        self.recipient.write_to(w);
        w.write_u64(self.amount);
        w.write_u64(self.fee);
        w.write_u64(self.timestamp);
    }

    fn read_from(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            sender_pk: PublicKey::new(r.read_array()?),
            recipient: Recipient::read_from(r)?,
            amount: r.read_u64()?,
            fee: r.read_u64()?,
            timestamp: r.read_u64()?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_positive_long("amount", self.amount)?;
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)?;
        self.recipient.valid()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LeaseWithSig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(flatten)]
    pub lease: Lease,
}

impl LeaseWithSig {
    pub fn new(lease: Lease) -> Self {
        Self {
            id: None,
            signature: None,
            lease,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        let type_byte = r.read_u8().ctx("failed to unmarshal lease transaction from bytes")?;
        if type_byte != TransactionType::Lease.to_byte() {
            return Err(DecodeError::Malformed {
                entity: "lease transaction",
                reason: format!("unexpected type byte {type_byte}"),
            }
            .into());
        }
        let lease =
            Lease::read_from(&mut r).ctx("failed to unmarshal lease transaction from bytes")?;
        let signature = Signature::new(r.read_array()?);
        r.expect_end()?;

        let mut tx = Self::new(lease);
        tx.signature = Some(signature);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for LeaseWithSig {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Lease
    }

    fn version(&self) -> u8 {
        1
    }

    fn id(&self) -> Option<&Digest> {
        self.id.as_ref()
    }

    fn body_bytes(&self, _scheme: Scheme) -> Result<Vec<u8>, Error> {
        let mut w = ByteWriter::new();
        w.write_u8(TransactionType::Lease.to_byte());
        self.lease.write_to(&mut w);
        Ok(w.into_vec())
    }

    fn sign(&mut self, scheme: Scheme, secret_key: &SecretKey) -> Result<(), Error> {
        let body = self.body_bytes(scheme)?;
        self.signature = Some(crypto::sign(secret_key, &body));
        self.id = Some(body_digest(&body));
        Ok(())
    }

    fn verify(&self, scheme: Scheme, public_key: &PublicKey) -> Result<bool, Error> {
        let signature = self
            .signature
            .ok_or(CryptoError::MissingSignature("lease transaction"))?;
        let body = self.body_bytes(scheme)?;
        Ok(crypto::verify(public_key, &signature, &body))
    }

    fn generate_id(&mut self, scheme: Scheme) -> Result<(), Error> {
        if self.id.is_none() {
            let body = self.body_bytes(scheme)?;
            self.id = Some(body_digest(&body));
        }
        Ok(())
    }

    fn validate(&self, _scheme: Scheme) -> Result<(), ValidationError> {
        self.lease.validate()
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let signature = self
            .signature
            .ok_or(CryptoError::MissingSignature("lease transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        w.write_bytes(signature.as_bytes());
        Ok(w.into_vec())
    }
}

const LEASE_PROOFS_VERSION: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LeaseWithProofs {
    pub version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    #[serde(flatten)]
    pub lease: Lease,
}

impl LeaseWithProofs {
    pub fn new(lease: Lease) -> Self {
        Self {
            version: LEASE_PROOFS_VERSION,
            id: None,
            proofs: None,
            lease,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        expect_marker_type_version(
            &mut r,
            "lease transaction",
            TransactionType::Lease,
            LEASE_PROOFS_VERSION,
        )?;
        let reserved = r.read_u8()?;
        if reserved != 0 {
            return Err(DecodeError::UnknownDiscriminant {
                entity: "lease reserved byte",
                got: reserved,
            }
            .into());
        }
        let lease =
            Lease::read_from(&mut r).ctx("failed to unmarshal lease transaction from bytes")?;
        let proofs =
            Proofs::read_from(&mut r).ctx("failed to unmarshal lease transaction from bytes")?;
        r.expect_end()?;

        let mut tx = Self::new(lease);
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for LeaseWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Lease
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
        w.write_u8(TransactionType::Lease.to_byte());
        w.write_u8(self.version);
        // Reserved byte: leases carry no asset, the slot stays zero.
        w.write_u8(0);
        self.lease.write_to(&mut w);
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
            .ok_or(CryptoError::MissingProofs("lease transaction"))?;
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

    fn validate(&self, _scheme: Scheme) -> Result<(), ValidationError> {
        self.lease.validate()
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("lease transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        proofs.write_to(&mut w);
        Ok(w.into_vec())
    }
}

// ---------------------------------------------------------------------------
// LeaseCancel
// ---------------------------------------------------------------------------

/// Fields common to every lease-cancel generation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LeaseCancel {
    pub sender_pk: PublicKey,
    pub lease_id: Digest,
    pub fee: u64,
    pub timestamp: u64,
}

impl LeaseCancel {
    fn write_to(&self, w: &mut ByteWriter) {
        w.write_bytes(self.sender_pk.as_bytes());
        w.write_u64(self.fee);
        w.write_u64(self.timestamp);
        w.write_bytes(self.lease_id.as_bytes());
    }

    fn read_from(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let sender_pk = PublicKey::new(r.read_array()?);
        let fee = r.read_u64()?;
        let timestamp = r.read_u64()?;
        let lease_id = Digest::new(r.read_array::<DIGEST_SIZE>()?);
        Ok(Self {
            sender_pk,
            lease_id,
            fee,
            timestamp,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let checked = check_positive_long("fee", self.fee)
            .and_then(|()| check_long("timestamp", self.timestamp));
        if let Err(ref e) = checked {
            // Replay pipelines record lease-cancel failures as advisory
            // context rather than a veto; give them something to record.
            tracing::debug!(error = %e, "lease cancel failed validation");
        }
        checked
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LeaseCancelWithSig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(flatten)]
    pub lease_cancel: LeaseCancel,
}

impl LeaseCancelWithSig {
    pub fn new(lease_cancel: LeaseCancel) -> Self {
        Self {
            id: None,
            signature: None,
            lease_cancel,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        let type_byte = r
            .read_u8()
            .ctx("failed to unmarshal lease cancel transaction from bytes")?;
        if type_byte != TransactionType::LeaseCancel.to_byte() {
            return Err(DecodeError::Malformed {
                entity: "lease cancel transaction",
                reason: format!("unexpected type byte {type_byte}"),
            }
            .into());
        }
        let lease_cancel = LeaseCancel::read_from(&mut r)
            .ctx("failed to unmarshal lease cancel transaction from bytes")?;
        let signature = Signature::new(r.read_array()?);
        r.expect_end()?;

        let mut tx = Self::new(lease_cancel);
        tx.signature = Some(signature);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for LeaseCancelWithSig {
    fn tx_type(&self) -> TransactionType {
        TransactionType::LeaseCancel
    }

    fn version(&self) -> u8 {
        1
    }

    fn id(&self) -> Option<&Digest> {
        self.id.as_ref()
    }

    fn body_bytes(&self, _scheme: Scheme) -> Result<Vec<u8>, Error> {
        let mut w = ByteWriter::new();
        w.write_u8(TransactionType::LeaseCancel.to_byte());
        self.lease_cancel.write_to(&mut w);
        Ok(w.into_vec())
    }

    fn sign(&mut self, scheme: Scheme, secret_key: &SecretKey) -> Result<(), Error> {
        let body = self.body_bytes(scheme)?;
        self.signature = Some(crypto::sign(secret_key, &body));
        self.id = Some(body_digest(&body));
        Ok(())
    }

    fn verify(&self, scheme: Scheme, public_key: &PublicKey) -> Result<bool, Error> {
        let signature = self
            .signature
            .ok_or(CryptoError::MissingSignature("lease cancel transaction"))?;
        let body = self.body_bytes(scheme)?;
        Ok(crypto::verify(public_key, &signature, &body))
    }

    fn generate_id(&mut self, scheme: Scheme) -> Result<(), Error> {
        if self.id.is_none() {
            let body = self.body_bytes(scheme)?;
            self.id = Some(body_digest(&body));
        }
        Ok(())
    }

    fn validate(&self, _scheme: Scheme) -> Result<(), ValidationError> {
        self.lease_cancel.validate()
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let signature = self
            .signature
            .ok_or(CryptoError::MissingSignature("lease cancel transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        w.write_bytes(signature.as_bytes());
        Ok(w.into_vec())
    }
}

const LEASE_CANCEL_PROOFS_VERSION: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LeaseCancelWithProofs {
    pub version: u8,
    pub scheme: Scheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    #[serde(flatten)]
    pub lease_cancel: LeaseCancel,
}

impl LeaseCancelWithProofs {
    pub fn new(scheme: Scheme, lease_cancel: LeaseCancel) -> Self {
        Self {
            version: LEASE_CANCEL_PROOFS_VERSION,
            scheme,
            id: None,
            proofs: None,
            lease_cancel,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        expect_marker_type_version(
            &mut r,
            "lease cancel transaction",
            TransactionType::LeaseCancel,
            LEASE_CANCEL_PROOFS_VERSION,
        )?;
        expect_scheme(&mut r, scheme)?;
        let lease_cancel = LeaseCancel::read_from(&mut r)
            .ctx("failed to unmarshal lease cancel transaction from bytes")?;
        let proofs = Proofs::read_from(&mut r)
            .ctx("failed to unmarshal lease cancel transaction from bytes")?;
        r.expect_end()?;

        let mut tx = Self::new(scheme, lease_cancel);
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for LeaseCancelWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::LeaseCancel
    }

    fn version(&self) -> u8 {
        self.version
    }

    fn id(&self) -> Option<&Digest> {
        self.id.as_ref()
    }

    fn body_bytes(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let mut w = ByteWriter::new();
        w.write_u8(0);
        w.write_u8(TransactionType::LeaseCancel.to_byte());
        w.write_u8(self.version);
        w.write_u8(scheme);
        self.lease_cancel.write_to(&mut w);
        Ok(w.into_vec())
    }

    fn sign(&mut self, scheme: Scheme, secret_key: &SecretKey) -> Result<(), Error> {
        self.scheme = scheme;
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
            .ok_or(CryptoError::MissingProofs("lease cancel transaction"))?;
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
        if self.scheme != scheme {
            return Err(ValidationError::SchemeMismatch {
                entity: "lease cancel transaction",
                expected: scheme,
                got: self.scheme,
            });
        }
        self.lease_cancel.validate()
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("lease cancel transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        proofs.write_to(&mut w);
        Ok(w.into_vec())
    }
}
