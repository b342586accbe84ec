//! Script attachment transactions: account scripts and asset scripts.
//!
//! Both shapes embed the scheme byte. A `None` script clears the account
//! script; an asset script can only be replaced, never cleared, which is a
//! ledger rule enforced above this layer - here both directions decode.

use crate::codec::{ByteReader, ByteWriter};
use crate::config::{Scheme, DIGEST_SIZE};
use crate::crypto::{Digest, PublicKey, SecretKey};
use crate::error::{CryptoError, DecodeContext, Error, ValidationError};
use crate::transaction::fields::{
    check_long, check_positive_long, read_script, write_script, AssetId,
};
use crate::transaction::proofs::Proofs;
use crate::transaction::{
    body_digest, expect_marker_type_version, expect_scheme, Transactional, TransactionType,
};

const SET_SCRIPT_VERSION: u8 = 1;

// ---------------------------------------------------------------------------
// SetScript
// ---------------------------------------------------------------------------

/// Attaches, replaces, or clears the sender's account script.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetScriptWithProofs {
    pub version: u8,
    pub scheme: Scheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    pub sender_pk: PublicKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<Vec<u8>>,
    pub fee: u64,
    pub timestamp: u64,
}

impl SetScriptWithProofs {
    pub fn new(
        scheme: Scheme,
        sender_pk: PublicKey,
        script: Option<Vec<u8>>,
        fee: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            version: SET_SCRIPT_VERSION,
            scheme,
            id: None,
            proofs: None,
            sender_pk,
            script,
            fee,
            timestamp,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        expect_marker_type_version(
            &mut r,
            "set script transaction",
            TransactionType::SetScript,
            SET_SCRIPT_VERSION,
        )?;
        expect_scheme(&mut r, scheme)?;
        let sender_pk = PublicKey::new(r.read_array()?);
        let script = read_script(&mut r)?;
        let fee = r.read_u64()?;
        let timestamp = r.read_u64()?;
        let proofs = Proofs::read_from(&mut r)
            .ctx("failed to unmarshal set script transaction from bytes")?;
        r.expect_end()?;

        let mut tx = Self::new(scheme, sender_pk, script, fee, timestamp);
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for SetScriptWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::SetScript
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
        w.write_u8(TransactionType::SetScript.to_byte());
        w.write_u8(self.version);
        w.write_u8(scheme);
        w.write_bytes(self.sender_pk.as_bytes());
        write_script(&mut w, &self.script);
        w.write_u64(self.fee);
        w.write_u64(self.timestamp);
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
            .ok_or(CryptoError::MissingProofs("set script transaction"))?;
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
                entity: "set script transaction",
                expected: scheme,
                got: self.scheme,
            });
        }
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("set script transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        proofs.write_to(&mut w);
        Ok(w.into_vec())
    }
}

// ---------------------------------------------------------------------------
// SetAssetScript
// ---------------------------------------------------------------------------

const SET_ASSET_SCRIPT_VERSION: u8 = 1;

/// Replaces the script guarding an issued asset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetAssetScriptWithProofs {
    pub version: u8,
    pub scheme: Scheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    pub sender_pk: PublicKey,
    pub asset_id: AssetId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<Vec<u8>>,
    pub fee: u64,
    pub timestamp: u64,
}

impl SetAssetScriptWithProofs {
    pub fn new(
        scheme: Scheme,
        sender_pk: PublicKey,
        asset_id: AssetId,
        script: Option<Vec<u8>>,
        fee: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            version: SET_ASSET_SCRIPT_VERSION,
            scheme,
            id: None,
            proofs: None,
            sender_pk,
            asset_id,
            script,
            fee,
            timestamp,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        expect_marker_type_version(
            &mut r,
            "set asset script transaction",
            TransactionType::SetAssetScript,
            SET_ASSET_SCRIPT_VERSION,
        )?;
        expect_scheme(&mut r, scheme)?;
        let sender_pk = PublicKey::new(r.read_array()?);
        let asset_id = Digest::new(r.read_array::<DIGEST_SIZE>()?);
        let fee = r.read_u64()?;
        let timestamp = r.read_u64()?;
        let script = read_script(&mut r)?;
        let proofs = Proofs::read_from(&mut r)
            .ctx("failed to unmarshal set asset script transaction from bytes")?;
        r.expect_end()?;

        let mut tx = Self::new(scheme, sender_pk, asset_id, script, fee, timestamp);
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for SetAssetScriptWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::SetAssetScript
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
        w.write_u8(TransactionType::SetAssetScript.to_byte());
        w.write_u8(self.version);
        w.write_u8(scheme);
        w.write_bytes(self.sender_pk.as_bytes());
        w.write_bytes(self.asset_id.as_bytes());
        w.write_u64(self.fee);
        w.write_u64(self.timestamp);
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
            .ok_or(CryptoError::MissingProofs("set asset script transaction"))?;
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
                entity: "set asset script transaction",
                expected: scheme,
                got: self.scheme,
            });
        }
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("set asset script transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        proofs.write_to(&mut w);
        Ok(w.into_vec())
    }
}
