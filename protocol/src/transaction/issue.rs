//! Asset issue transactions.
//!
//! The modern generation binds the body to a network by embedding the
//! scheme byte after the version byte, and may attach an asset script.
//! Decoding cross-checks the embedded scheme against the caller's.

use crate::codec::{ByteReader, ByteWriter};
use crate::config::{
    Scheme, MAX_ASSET_NAME_LENGTH, MAX_DECIMALS, MAX_DESCRIPTION_LENGTH, MIN_ASSET_NAME_LENGTH,
};
use crate::crypto::{self, Digest, PublicKey, SecretKey, Signature};
use crate::error::{CryptoError, DecodeContext, DecodeError, Error, ValidationError};
use crate::transaction::fields::{check_long, check_positive_long, read_script, write_script};
use crate::transaction::proofs::Proofs;
use crate::transaction::{
    body_digest, expect_marker_type_version, expect_scheme, Transactional, TransactionType,
};

/// Fields common to every issue generation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Issue {
    pub sender_pk: PublicKey,
    pub name: String,
    pub description: String,
    pub quantity: u64,
    pub decimals: u8,
    pub reissuable: bool,
    pub fee: u64,
    pub timestamp: u64,
}

impl Issue {
    fn write_to(&self, w: &mut ByteWriter) {
        w.write_bytes(self.sender_pk.as_bytes());
        w.write_u16_string(&self.name);
        w.write_u16_string(&self.description);
        w.write_u64(self.quantity);
        w.write_u8(self.decimals);
        w.write_bool(self.reissuable);
        w.write_u64(self.fee);
        w.write_u64(self.timestamp);
    }

    fn read_from(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            sender_pk: PublicKey::new(r.read_array()?),
            name: r.read_u16_string("asset name")?,
            description: r.read_u16_string("asset description")?,
            quantity: r.read_u64()?,
            decimals: r.read_u8()?,
            reissuable: r.read_bool()?,
            fee: r.read_u64()?,
            timestamp: r.read_u64()?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let name_len = self.name.len();
        if !(MIN_ASSET_NAME_LENGTH..=MAX_ASSET_NAME_LENGTH).contains(&name_len) {
            return Err(ValidationError::LengthOutOfBounds {
                field: "asset name",
                len: name_len,
                min: MIN_ASSET_NAME_LENGTH,
                max: MAX_ASSET_NAME_LENGTH,
            });
        }
        if self.description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::LengthOutOfBounds {
                field: "asset description",
                len: self.description.len(),
                min: 0,
                max: MAX_DESCRIPTION_LENGTH,
            });
        }
        if self.decimals > MAX_DECIMALS {
            return Err(ValidationError::TooBig {
                field: "decimals",
                value: self.decimals as u64,
            });
        }
        check_positive_long("quantity", self.quantity)?;
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)
    }
}

// ---------------------------------------------------------------------------
// IssueWithSig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IssueWithSig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(flatten)]
    pub issue: Issue,
}

impl IssueWithSig {
    pub fn new(issue: Issue) -> Self {
        Self {
            id: None,
            signature: None,
            issue,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        let type_byte = r.read_u8().ctx("failed to unmarshal issue transaction from bytes")?;
        if type_byte != TransactionType::Issue.to_byte() {
            return Err(DecodeError::Malformed {
                entity: "issue transaction",
                reason: format!("unexpected type byte {type_byte}"),
            }
            .into());
        }
        let issue =
            Issue::read_from(&mut r).ctx("failed to unmarshal issue transaction from bytes")?;
        let signature = Signature::new(r.read_array()?);
        r.expect_end()?;

        let mut tx = Self::new(issue);
        tx.signature = Some(signature);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for IssueWithSig {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Issue
    }

    fn version(&self) -> u8 {
        1
    }

    fn id(&self) -> Option<&Digest> {
        self.id.as_ref()
    }

    fn body_bytes(&self, _scheme: Scheme) -> Result<Vec<u8>, Error> {
        let mut w = ByteWriter::new();
        w.write_u8(TransactionType::Issue.to_byte());
        self.issue.write_to(&mut w);
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
            .ok_or(CryptoError::MissingSignature("issue transaction"))?;
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
        self.issue.validate()
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let signature = self
            .signature
            .ok_or(CryptoError::MissingSignature("issue transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        w.write_bytes(signature.as_bytes());
        Ok(w.into_vec())
    }
}

// ---------------------------------------------------------------------------
// IssueWithProofs
// ---------------------------------------------------------------------------

const PROOFS_VERSION_BYTE: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IssueWithProofs {
    pub version: u8,
    /// Scheme captured at signing time; the body embeds it.
    pub scheme: Scheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<Vec<u8>>,
    #[serde(flatten)]
    pub issue: Issue,
}

impl IssueWithProofs {
    pub fn new(scheme: Scheme, issue: Issue) -> Self {
        Self {
            version: PROOFS_VERSION_BYTE,
            scheme,
            id: None,
            proofs: None,
            script: None,
            issue,
        }
    }

    pub fn with_script(scheme: Scheme, issue: Issue, script: Vec<u8>) -> Self {
        let mut tx = Self::new(scheme, issue);
        tx.script = Some(script);
        tx
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        expect_marker_type_version(
            &mut r,
            "issue transaction",
            TransactionType::Issue,
            PROOFS_VERSION_BYTE,
        )?;
        expect_scheme(&mut r, scheme)?;
        let issue =
            Issue::read_from(&mut r).ctx("failed to unmarshal issue transaction from bytes")?;
        let script = read_script(&mut r)?;
        let proofs =
            Proofs::read_from(&mut r).ctx("failed to unmarshal issue transaction from bytes")?;
        r.expect_end()?;

        let mut tx = Self::new(scheme, issue);
        tx.script = script;
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for IssueWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Issue
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
        w.write_u8(TransactionType::Issue.to_byte());
        w.write_u8(self.version);
        w.write_u8(scheme);
        self.issue.write_to(&mut w);
        write_script(&mut w, &self.script);
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
            .ok_or(CryptoError::MissingProofs("issue transaction"))?;
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
        if self.version != PROOFS_VERSION_BYTE {
            return Err(ValidationError::WrongVersion {
                entity: "issue transaction",
                expected: PROOFS_VERSION_BYTE,
                got: self.version,
            });
        }
        if self.scheme != scheme {
            return Err(ValidationError::SchemeMismatch {
                entity: "issue transaction",
                expected: scheme,
                got: self.scheme,
            });
        }
        self.issue.validate()
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("issue transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        proofs.write_to(&mut w);
        Ok(w.into_vec())
    }
}
