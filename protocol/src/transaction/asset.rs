//! Asset lifecycle transactions: reissue, burn, sponsorship, info updates.
//!
//! Reissue and Burn exist in both generations; their modern bodies embed
//! the scheme byte. Sponsorship has no legacy generation and, like the
//! other late additions, no scheme byte in its body. UpdateAssetInfo is the
//! newest shape here and does embed the scheme.

use crate::codec::{ByteReader, ByteWriter};
use crate::config::{
    Scheme, DIGEST_SIZE, MAX_ASSET_NAME_LENGTH, MAX_DESCRIPTION_LENGTH, MIN_ASSET_NAME_LENGTH,
};
use crate::crypto::{self, Digest, PublicKey, SecretKey, Signature};
use crate::error::{CryptoError, DecodeContext, DecodeError, Error, ValidationError};
use crate::transaction::fields::{check_long, check_positive_long, AssetId, OptionalAsset};
use crate::transaction::proofs::Proofs;
use crate::transaction::{
    body_digest, expect_marker_type_version, expect_scheme, Transactional, TransactionType,
};

// ---------------------------------------------------------------------------
// Reissue
// ---------------------------------------------------------------------------

/// Mints additional quantity of an existing reissuable asset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Reissue {
    pub sender_pk: PublicKey,
    pub asset_id: AssetId,
    pub quantity: u64,
    pub reissuable: bool,
    pub fee: u64,
    pub timestamp: u64,
}

impl Reissue {
    fn write_to(&self, w: &mut ByteWriter) {
        w.write_bytes(self.sender_pk.as_bytes());
        w.write_bytes(self.asset_id.as_bytes());
        w.write_u64(self.quantity);
        w.write_bool(self.reissuable);
        w.write_u64(self.fee);
        w.write_u64(self.timestamp);
    }

    fn read_from(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            sender_pk: PublicKey::new(r.read_array()?),
            asset_id: Digest::new(r.read_array::<DIGEST_SIZE>()?),
            quantity: r.read_u64()?,
            reissuable: r.read_bool()?,
            fee: r.read_u64()?,
            timestamp: r.read_u64()?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_positive_long("quantity", self.quantity)?;
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReissueWithSig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(flatten)]
    pub reissue: Reissue,
}

impl ReissueWithSig {
    pub fn new(reissue: Reissue) -> Self {
        Self {
            id: None,
            signature: None,
            reissue,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        let type_byte = r.read_u8().ctx("failed to unmarshal reissue transaction from bytes")?;
        if type_byte != TransactionType::Reissue.to_byte() {
            return Err(DecodeError::Malformed {
                entity: "reissue transaction",
                reason: format!("unexpected type byte {type_byte}"),
            }
            .into());
        }
        let reissue =
            Reissue::read_from(&mut r).ctx("failed to unmarshal reissue transaction from bytes")?;
        let signature = Signature::new(r.read_array()?);
        r.expect_end()?;

        let mut tx = Self::new(reissue);
        tx.signature = Some(signature);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for ReissueWithSig {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Reissue
    }

    fn version(&self) -> u8 {
        1
    }

    fn id(&self) -> Option<&Digest> {
        self.id.as_ref()
    }

    fn body_bytes(&self, _scheme: Scheme) -> Result<Vec<u8>, Error> {
        let mut w = ByteWriter::new();
        w.write_u8(TransactionType::Reissue.to_byte());
        self.reissue.write_to(&mut w);
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
            .ok_or(CryptoError::MissingSignature("reissue transaction"))?;
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
        self.reissue.validate()
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let signature = self
            .signature
            .ok_or(CryptoError::MissingSignature("reissue transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        w.write_bytes(signature.as_bytes());
        Ok(w.into_vec())
    }
}

const REISSUE_PROOFS_VERSION: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReissueWithProofs {
    pub version: u8,
    pub scheme: Scheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    #[serde(flatten)]
    pub reissue: Reissue,
}

impl ReissueWithProofs {
    pub fn new(scheme: Scheme, reissue: Reissue) -> Self {
        Self {
            version: REISSUE_PROOFS_VERSION,
            scheme,
            id: None,
            proofs: None,
            reissue,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        expect_marker_type_version(
            &mut r,
            "reissue transaction",
            TransactionType::Reissue,
            REISSUE_PROOFS_VERSION,
        )?;
        expect_scheme(&mut r, scheme)?;
        let reissue =
            Reissue::read_from(&mut r).ctx("failed to unmarshal reissue transaction from bytes")?;
        let proofs =
            Proofs::read_from(&mut r).ctx("failed to unmarshal reissue transaction from bytes")?;
        r.expect_end()?;

        let mut tx = Self::new(scheme, reissue);
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for ReissueWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Reissue
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
        w.write_u8(TransactionType::Reissue.to_byte());
        w.write_u8(self.version);
        w.write_u8(scheme);
        self.reissue.write_to(&mut w);
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
            .ok_or(CryptoError::MissingProofs("reissue transaction"))?;
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
                entity: "reissue transaction",
                expected: scheme,
                got: self.scheme,
            });
        }
        self.reissue.validate()
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("reissue transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        proofs.write_to(&mut w);
        Ok(w.into_vec())
    }
}

// ---------------------------------------------------------------------------
// Burn
// ---------------------------------------------------------------------------

/// Permanently removes quantity of an asset from circulation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Burn {
    pub sender_pk: PublicKey,
    pub asset_id: AssetId,
    pub amount: u64,
    pub fee: u64,
    pub timestamp: u64,
}

impl Burn {
    fn write_to(&self, w: &mut ByteWriter) {
        w.write_bytes(self.sender_pk.as_bytes());
        w.write_bytes(self.asset_id.as_bytes());
        w.write_u64(self.amount);
        w.write_u64(self.fee);
        w.write_u64(self.timestamp);
    }

    fn read_from(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            sender_pk: PublicKey::new(r.read_array()?),
            asset_id: Digest::new(r.read_array::<DIGEST_SIZE>()?),
            amount: r.read_u64()?,
            fee: r.read_u64()?,
            timestamp: r.read_u64()?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_positive_long("amount", self.amount)?;
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BurnWithSig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(flatten)]
    pub burn: Burn,
}

impl BurnWithSig {
    pub fn new(burn: Burn) -> Self {
        Self {
            id: None,
            signature: None,
            burn,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        let type_byte = r.read_u8().ctx("failed to unmarshal burn transaction from bytes")?;
        if type_byte != TransactionType::Burn.to_byte() {
            return Err(DecodeError::Malformed {
                entity: "burn transaction",
                reason: format!("unexpected type byte {type_byte}"),
            }
            .into());
        }
        let burn = Burn::read_from(&mut r).ctx("failed to unmarshal burn transaction from bytes")?;
        let signature = Signature::new(r.read_array()?);
        r.expect_end()?;

        let mut tx = Self::new(burn);
        tx.signature = Some(signature);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for BurnWithSig {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Burn
    }

    fn version(&self) -> u8 {
        1
    }

    fn id(&self) -> Option<&Digest> {
        self.id.as_ref()
    }

    fn body_bytes(&self, _scheme: Scheme) -> Result<Vec<u8>, Error> {
        let mut w = ByteWriter::new();
        w.write_u8(TransactionType::Burn.to_byte());
        self.burn.write_to(&mut w);
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
            .ok_or(CryptoError::MissingSignature("burn transaction"))?;
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
        self.burn.validate()
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let signature = self
            .signature
            .ok_or(CryptoError::MissingSignature("burn transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        w.write_bytes(signature.as_bytes());
        Ok(w.into_vec())
    }
}

const BURN_PROOFS_VERSION: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BurnWithProofs {
    pub version: u8,
    pub scheme: Scheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    #[serde(flatten)]
    pub burn: Burn,
}

impl BurnWithProofs {
    pub fn new(scheme: Scheme, burn: Burn) -> Self {
        Self {
            version: BURN_PROOFS_VERSION,
            scheme,
            id: None,
            proofs: None,
            burn,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        expect_marker_type_version(
            &mut r,
            "burn transaction",
            TransactionType::Burn,
            BURN_PROOFS_VERSION,
        )?;
        expect_scheme(&mut r, scheme)?;
        let burn = Burn::read_from(&mut r).ctx("failed to unmarshal burn transaction from bytes")?;
        let proofs =
            Proofs::read_from(&mut r).ctx("failed to unmarshal burn transaction from bytes")?;
        r.expect_end()?;

        let mut tx = Self::new(scheme, burn);
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for BurnWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Burn
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
        w.write_u8(TransactionType::Burn.to_byte());
        w.write_u8(self.version);
        w.write_u8(scheme);
        self.burn.write_to(&mut w);
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
            .ok_or(CryptoError::MissingProofs("burn transaction"))?;
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
                entity: "burn transaction",
                expected: scheme,
                got: self.scheme,
            });
        }
        self.burn.validate()
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("burn transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        proofs.write_to(&mut w);
        Ok(w.into_vec())
    }
}

// ---------------------------------------------------------------------------
// Sponsorship
// ---------------------------------------------------------------------------

const SPONSORSHIP_VERSION: u8 = 1;

/// Enables (or, with a zero minimum fee, disables) paying transaction fees
/// in a sponsored asset. Modern-envelope only; the body carries no scheme
/// byte.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SponsorshipWithProofs {
    pub version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    pub sender_pk: PublicKey,
    pub asset_id: AssetId,
    /// Minimum sponsored-asset fee per fee unit; zero cancels sponsorship.
    pub min_asset_fee: u64,
    pub fee: u64,
    pub timestamp: u64,
}

impl SponsorshipWithProofs {
    pub fn new(
        sender_pk: PublicKey,
        asset_id: AssetId,
        min_asset_fee: u64,
        fee: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            version: SPONSORSHIP_VERSION,
            id: None,
            proofs: None,
            sender_pk,
            asset_id,
            min_asset_fee,
            fee,
            timestamp,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        expect_marker_type_version(
            &mut r,
            "sponsorship transaction",
            TransactionType::Sponsorship,
            SPONSORSHIP_VERSION,
        )?;
        let sender_pk = PublicKey::new(r.read_array()?);
        let asset_id = Digest::new(r.read_array::<DIGEST_SIZE>()?);
        let min_asset_fee = r.read_u64()?;
        let fee = r.read_u64()?;
        let timestamp = r.read_u64()?;
        let proofs = Proofs::read_from(&mut r)
            .ctx("failed to unmarshal sponsorship transaction from bytes")?;
        r.expect_end()?;

        let mut tx = Self::new(sender_pk, asset_id, min_asset_fee, fee, timestamp);
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for SponsorshipWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Sponsorship
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
        w.write_u8(TransactionType::Sponsorship.to_byte());
        w.write_u8(self.version);
        w.write_bytes(self.sender_pk.as_bytes());
        w.write_bytes(self.asset_id.as_bytes());
        w.write_u64(self.min_asset_fee);
        w.write_u64(self.fee);
        w.write_u64(self.timestamp);
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
            .ok_or(CryptoError::MissingProofs("sponsorship transaction"))?;
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
        check_long("minimum asset fee", self.min_asset_fee)?;
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("sponsorship transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        proofs.write_to(&mut w);
        Ok(w.into_vec())
    }
}

// ---------------------------------------------------------------------------
// UpdateAssetInfo
// ---------------------------------------------------------------------------

const UPDATE_ASSET_INFO_VERSION: u8 = 1;

/// Renames an asset and rewrites its description.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateAssetInfoWithProofs {
    pub version: u8,
    pub scheme: Scheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    pub sender_pk: PublicKey,
    pub asset_id: AssetId,
    pub name: String,
    pub description: String,
    pub fee_asset: OptionalAsset,
    pub fee: u64,
    pub timestamp: u64,
}

impl UpdateAssetInfoWithProofs {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        scheme: Scheme,
        sender_pk: PublicKey,
        asset_id: AssetId,
        name: String,
        description: String,
        fee_asset: OptionalAsset,
        fee: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            version: UPDATE_ASSET_INFO_VERSION,
            scheme,
            id: None,
            proofs: None,
            sender_pk,
            asset_id,
            name,
            description,
            fee_asset,
            fee,
            timestamp,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        expect_marker_type_version(
            &mut r,
            "update asset info transaction",
            TransactionType::UpdateAssetInfo,
            UPDATE_ASSET_INFO_VERSION,
        )?;
        expect_scheme(&mut r, scheme)?;
        let sender_pk = PublicKey::new(r.read_array()?);
        let asset_id = Digest::new(r.read_array::<DIGEST_SIZE>()?);
        let name = r.read_u16_string("asset name")?;
        let description = r.read_u16_string("asset description")?;
        let fee_asset = OptionalAsset::read_from(&mut r)?;
        let fee = r.read_u64()?;
        let timestamp = r.read_u64()?;
        let proofs = Proofs::read_from(&mut r)
            .ctx("failed to unmarshal update asset info transaction from bytes")?;
        r.expect_end()?;

        let mut tx = Self::new(
            scheme, sender_pk, asset_id, name, description, fee_asset, fee, timestamp,
        );
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for UpdateAssetInfoWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::UpdateAssetInfo
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
        w.write_u8(TransactionType::UpdateAssetInfo.to_byte());
        w.write_u8(self.version);
        w.write_u8(scheme);
        w.write_bytes(self.sender_pk.as_bytes());
        w.write_bytes(self.asset_id.as_bytes());
        w.write_u16_string(&self.name);
        w.write_u16_string(&self.description);
        self.fee_asset.write_to(&mut w);
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
            .ok_or(CryptoError::MissingProofs("update asset info transaction"))?;
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
                entity: "update asset info transaction",
                expected: scheme,
                got: self.scheme,
            });
        }
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
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("update asset info transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        proofs.write_to(&mut w);
        Ok(w.into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAINNET_SCHEME, TESTNET_SCHEME};
    use crate::crypto::Keypair;

    fn asset() -> AssetId {
        Digest::new([0x11; 32])
    }

    fn sample_reissue(kp: &Keypair) -> Reissue {
        Reissue {
            sender_pk: kp.public_key(),
            asset_id: asset(),
            quantity: 1_000,
            reissuable: false,
            fee: 100_000,
            timestamp: 1_534_264_221_000,
        }
    }

    fn sample_burn(kp: &Keypair) -> Burn {
        Burn {
            sender_pk: kp.public_key(),
            asset_id: asset(),
            amount: 50,
            fee: 100_000,
            timestamp: 1_534_264_221_000,
        }
    }

    #[test]
    fn reissue_both_generations_roundtrip() {
        let kp = Keypair::generate();

        let mut v1 = ReissueWithSig::new(sample_reissue(&kp));
        v1.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = v1.marshal_binary(TESTNET_SCHEME).unwrap();
        assert_eq!(ReissueWithSig::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap(), v1);

        let mut v2 = ReissueWithProofs::new(TESTNET_SCHEME, sample_reissue(&kp));
        v2.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = v2.marshal_binary(TESTNET_SCHEME).unwrap();
        assert_eq!(
            ReissueWithProofs::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap(),
            v2
        );
        assert!(v2.verify(TESTNET_SCHEME, &kp.public_key()).unwrap());
    }

    #[test]
    fn burn_both_generations_roundtrip() {
        let kp = Keypair::generate();

        let mut v1 = BurnWithSig::new(sample_burn(&kp));
        v1.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = v1.marshal_binary(TESTNET_SCHEME).unwrap();
        assert_eq!(BurnWithSig::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap(), v1);

        let mut v2 = BurnWithProofs::new(TESTNET_SCHEME, sample_burn(&kp));
        v2.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = v2.marshal_binary(TESTNET_SCHEME).unwrap();
        assert_eq!(BurnWithProofs::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap(), v2);
    }

    #[test]
    fn modern_bodies_reject_foreign_scheme() {
        let kp = Keypair::generate();
        let mut tx = BurnWithProofs::new(TESTNET_SCHEME, sample_burn(&kp));
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        assert!(matches!(
            BurnWithProofs::unmarshal_binary(&bytes, MAINNET_SCHEME),
            Err(Error::Decode(DecodeError::SchemeMismatch { .. }))
        ));
    }

    #[test]
    fn sponsorship_roundtrip_and_zero_min_fee() {
        let kp = Keypair::generate();
        let mut tx = SponsorshipWithProofs::new(kp.public_key(), asset(), 0, 100_000, 1_000);
        assert!(tx.validate(TESTNET_SCHEME).is_ok(), "zero min fee cancels sponsorship");
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        assert_eq!(
            SponsorshipWithProofs::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap(),
            tx
        );
    }

    #[test]
    fn sponsorship_body_has_no_scheme_byte() {
        let kp = Keypair::generate();
        let tx = SponsorshipWithProofs::new(kp.public_key(), asset(), 7, 100_000, 1_000);
        let body = tx.body_bytes(TESTNET_SCHEME).unwrap();
        // marker | type | version | sender pk...
        assert_eq!(&body[..3], &[0, TransactionType::Sponsorship.to_byte(), 1]);
        assert_eq!(&body[3..35], tx.sender_pk.as_bytes());
    }

    #[test]
    fn update_asset_info_roundtrip() {
        let kp = Keypair::generate();
        let mut tx = UpdateAssetInfoWithProofs::new(
            TESTNET_SCHEME,
            kp.public_key(),
            asset(),
            "Newname".to_string(),
            "Updated description".to_string(),
            OptionalAsset::native(),
            100_000,
            1_600_000_000_000,
        );
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        let back = UpdateAssetInfoWithProofs::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap();
        assert_eq!(back, tx);
        assert!(back.verify(TESTNET_SCHEME, &kp.public_key()).unwrap());
    }

    #[test]
    fn update_asset_info_name_bounds() {
        let kp = Keypair::generate();
        let tx = UpdateAssetInfoWithProofs::new(
            TESTNET_SCHEME,
            kp.public_key(),
            asset(),
            "abc".to_string(),
            String::new(),
            OptionalAsset::native(),
            100_000,
            1,
        );
        assert!(matches!(
            tx.validate(TESTNET_SCHEME),
            Err(ValidationError::LengthOutOfBounds { field: "asset name", .. })
        ));
    }

    #[test]
    fn reissue_zero_quantity_rejected() {
        let kp = Keypair::generate();
        let mut reissue = sample_reissue(&kp);
        reissue.quantity = 0;
        assert!(matches!(
            ReissueWithSig::new(reissue).validate(TESTNET_SCHEME),
            Err(ValidationError::NonPositive { field: "quantity" })
        ));
    }

    #[test]
    fn burn_truncation_never_panics() {
        let kp = Keypair::generate();
        let mut tx = BurnWithProofs::new(TESTNET_SCHEME, sample_burn(&kp));
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        for cut in 0..bytes.len() {
            assert!(BurnWithProofs::unmarshal_binary(&bytes[..cut], TESTNET_SCHEME).is_err());
        }
    }
}
