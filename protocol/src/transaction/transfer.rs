//! Value transfers of the native token or an issued asset.
//!
//! The `Transfer` payload is shared by both generations. The legacy wrapper
//! authenticates with a single signature; the modern wrapper with a proofs
//! list. Neither generation's body carries a scheme byte: the network
//! binding of a transfer comes from its recipient.

use crate::codec::{ByteReader, ByteWriter};
use crate::config::Scheme;
use crate::crypto::{self, Digest, PublicKey, SecretKey, Signature};
use crate::error::{CryptoError, DecodeContext, DecodeError, Error, ValidationError};
use crate::identity::Recipient;
use crate::transaction::fields::{check_long, check_positive_long, Attachment, OptionalAsset};
use crate::transaction::proofs::Proofs;
use crate::transaction::{body_digest, Transactional, TransactionType};

/// Fields common to every transfer generation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transfer {
    pub sender_pk: PublicKey,
    pub amount_asset: OptionalAsset,
    pub fee_asset: OptionalAsset,
    pub timestamp: u64,
    pub amount: u64,
    pub fee: u64,
    pub recipient: Recipient,
    pub attachment: Attachment,
}

impl Transfer {
    fn write_to(&self, w: &mut ByteWriter) {
        w.write_bytes(self.sender_pk.as_bytes());
        self.amount_asset.write_to(w);
        self.fee_asset.write_to(w);
        w.write_u64(self.timestamp);
        w.write_u64(self.amount);
        w.write_u64(self.fee);
        self.recipient.write_to(w);
        self.attachment.write_to(w);
    }

    fn read_from(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            sender_pk: PublicKey::new(r.read_array()?),
            amount_asset: OptionalAsset::read_from(r)?,
            fee_asset: OptionalAsset::read_from(r)?,
            timestamp: r.read_u64()?,
            amount: r.read_u64()?,
            fee: r.read_u64()?,
            recipient: Recipient::read_from(r)?,
            attachment: Attachment::read_from(r)?,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_positive_long("amount", self.amount)?;
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)?;
        self.attachment.valid()?;
        self.recipient.valid()
    }
}

// ---------------------------------------------------------------------------
// TransferWithSig
// ---------------------------------------------------------------------------

/// Generation-one transfer, authenticated by a single signature.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransferWithSig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(flatten)]
    pub transfer: Transfer,
}

impl TransferWithSig {
    pub fn new(transfer: Transfer) -> Self {
        Self {
            id: None,
            signature: None,
            transfer,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        let type_byte = r.read_u8().ctx("failed to unmarshal transfer transaction from bytes")?;
        if type_byte != TransactionType::Transfer.to_byte() {
            return Err(DecodeError::Malformed {
                entity: "transfer transaction",
                reason: format!("unexpected type byte {type_byte}"),
            }
            .into());
        }
        let transfer =
            Transfer::read_from(&mut r).ctx("failed to unmarshal transfer transaction from bytes")?;
        let signature = Signature::new(r.read_array()?);
        r.expect_end()?;

        let mut tx = Self::new(transfer);
        tx.signature = Some(signature);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for TransferWithSig {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Transfer
    }

    fn version(&self) -> u8 {
        1
    }

    fn id(&self) -> Option<&Digest> {
        self.id.as_ref()
    }

    fn body_bytes(&self, _scheme: Scheme) -> Result<Vec<u8>, Error> {
        let mut w = ByteWriter::new();
        w.write_u8(TransactionType::Transfer.to_byte());
        self.transfer.write_to(&mut w);
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
            .ok_or(CryptoError::MissingSignature("transfer transaction"))?;
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
        self.transfer.validate()
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let signature = self
            .signature
            .ok_or(CryptoError::MissingSignature("transfer transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        w.write_bytes(signature.as_bytes());
        Ok(w.into_vec())
    }
}

// ---------------------------------------------------------------------------
// TransferWithProofs
// ---------------------------------------------------------------------------

/// Lowest and highest transfer versions carried by the modern envelope.
const MIN_VERSION: u8 = 2;
const MAX_VERSION: u8 = 3;

/// Generation-two transfer, authenticated by a proofs list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransferWithProofs {
    pub version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    #[serde(flatten)]
    pub transfer: Transfer,
}

impl TransferWithProofs {
    pub fn new(version: u8, transfer: Transfer) -> Self {
        Self {
            version,
            id: None,
            proofs: None,
            transfer,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        let marker = r.read_u8()?;
        if marker != 0 {
            return Err(DecodeError::UnknownDiscriminant {
                entity: "modern envelope marker",
                got: marker,
            }
            .into());
        }
        let type_byte = r.read_u8()?;
        if type_byte != TransactionType::Transfer.to_byte() {
            return Err(DecodeError::Malformed {
                entity: "transfer transaction",
                reason: format!("unexpected type byte {type_byte}"),
            }
            .into());
        }
        let version = r.read_u8()?;
        if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
            return Err(DecodeError::UnsupportedVersion {
                entity: "transfer transaction",
                got: version,
            }
            .into());
        }
        let transfer =
            Transfer::read_from(&mut r).ctx("failed to unmarshal transfer transaction from bytes")?;
        let proofs = Proofs::read_from(&mut r)
            .ctx("failed to unmarshal transfer transaction from bytes")?;
        r.expect_end()?;

        let mut tx = Self::new(version, transfer);
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for TransferWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Transfer
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
        w.write_u8(TransactionType::Transfer.to_byte());
        w.write_u8(self.version);
        self.transfer.write_to(&mut w);
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
            .ok_or(CryptoError::MissingProofs("transfer transaction"))?;
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
        if !(MIN_VERSION..=MAX_VERSION).contains(&self.version) {
            return Err(ValidationError::WrongVersion {
                entity: "transfer transaction",
                expected: MIN_VERSION,
                got: self.version,
            });
        }
        self.transfer.validate()
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("transfer transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        proofs.write_to(&mut w);
        Ok(w.into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TESTNET_SCHEME;
    use crate::crypto::Keypair;
    use crate::identity::{Address, Alias};

    fn sample_transfer(kp: &Keypair) -> Transfer {
        Transfer {
            sender_pk: kp.public_key(),
            amount_asset: OptionalAsset::native(),
            fee_asset: OptionalAsset::issued(Digest::new([9u8; 32])),
            timestamp: 1_544_715_621_000,
            amount: 1_000_000,
            fee: 100_000,
            recipient: Recipient::from(Address::from_public_key(
                TESTNET_SCHEME,
                &Keypair::from_seed(&[7u8; 32]).public_key(),
            )),
            attachment: Attachment::new(b"order memo".to_vec()),
        }
    }

    #[test]
    fn with_sig_sign_verify_roundtrip() {
        let kp = Keypair::generate();
        let mut tx = TransferWithSig::new(sample_transfer(&kp));
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        assert!(tx.verify(TESTNET_SCHEME, &kp.public_key()).unwrap());
        assert!(!tx.verify(TESTNET_SCHEME, &Keypair::generate().public_key()).unwrap());

        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        let back = TransferWithSig::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn with_proofs_sign_verify_roundtrip() {
        let kp = Keypair::generate();
        let mut tx = TransferWithProofs::new(2, sample_transfer(&kp));
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        assert!(tx.verify(TESTNET_SCHEME, &kp.public_key()).unwrap());

        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        assert_eq!(bytes[0], 0, "modern envelope must lead with the zero marker");
        assert_eq!(bytes[1], TransactionType::Transfer.to_byte());
        assert_eq!(bytes[2], 2);
        let back = TransferWithProofs::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn alias_recipient_roundtrips() {
        let kp = Keypair::generate();
        let mut transfer = sample_transfer(&kp);
        transfer.recipient = Recipient::from(Alias::new(TESTNET_SCHEME, "blah-blah-blah"));
        let mut tx = TransferWithProofs::new(3, transfer);
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        let back = TransferWithProofs::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn ids_differ_between_generations() {
        let kp = Keypair::generate();
        let mut v1 = TransferWithSig::new(sample_transfer(&kp));
        let mut v2 = TransferWithProofs::new(2, sample_transfer(&kp));
        v1.generate_id(TESTNET_SCHEME).unwrap();
        v2.generate_id(TESTNET_SCHEME).unwrap();
        assert_ne!(v1.id, v2.id);
    }

    #[test]
    fn mutating_any_field_changes_the_id() {
        let kp = Keypair::generate();
        let base = sample_transfer(&kp);

        let mut reference = TransferWithProofs::new(2, base.clone());
        reference.generate_id(TESTNET_SCHEME).unwrap();

        let mut mutated = base.clone();
        mutated.amount += 1;
        let mut other = TransferWithProofs::new(2, mutated);
        other.generate_id(TESTNET_SCHEME).unwrap();
        assert_ne!(reference.id, other.id);

        let mut mutated = base;
        mutated.timestamp += 1;
        let mut other = TransferWithProofs::new(2, mutated);
        other.generate_id(TESTNET_SCHEME).unwrap();
        assert_ne!(reference.id, other.id);
    }

    #[test]
    fn identical_fields_produce_identical_ids() {
        let kp = Keypair::from_seed(&[4u8; 32]);
        let mut a = TransferWithProofs::new(2, sample_transfer(&kp));
        let mut b = TransferWithProofs::new(2, sample_transfer(&kp));
        a.generate_id(TESTNET_SCHEME).unwrap();
        b.generate_id(TESTNET_SCHEME).unwrap();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn unsigned_transfer_cannot_marshal() {
        let kp = Keypair::generate();
        let tx = TransferWithProofs::new(2, sample_transfer(&kp));
        assert!(matches!(
            tx.marshal_binary(TESTNET_SCHEME),
            Err(Error::Crypto(CryptoError::MissingProofs(_)))
        ));
    }

    #[test]
    fn truncated_bytes_never_panic() {
        let kp = Keypair::generate();
        let mut tx = TransferWithProofs::new(2, sample_transfer(&kp));
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        for cut in 0..bytes.len() {
            assert!(TransferWithProofs::unmarshal_binary(&bytes[..cut], TESTNET_SCHEME).is_err());
        }
    }

    #[test]
    fn unsupported_version_rejected() {
        let kp = Keypair::generate();
        let mut tx = TransferWithProofs::new(2, sample_transfer(&kp));
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let mut bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        bytes[2] = 9;
        assert!(matches!(
            TransferWithProofs::unmarshal_binary(&bytes, TESTNET_SCHEME),
            Err(Error::Decode(DecodeError::UnsupportedVersion { .. }))
        ));
    }

    #[test]
    fn oversized_attachment_fails_validation_not_decode() {
        let kp = Keypair::generate();
        let mut transfer = sample_transfer(&kp);
        transfer.attachment = Attachment::new(vec![0u8; 141]);
        let mut tx = TransferWithSig::new(transfer);
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();

        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        let back = TransferWithSig::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap();
        assert!(matches!(
            back.validate(TESTNET_SCHEME),
            Err(ValidationError::LengthOutOfBounds { field: "attachment", .. })
        ));
    }

    #[test]
    fn json_shape_uses_base58_leaves() {
        let kp = Keypair::from_seed(&[5u8; 32]);
        let mut tx = TransferWithProofs::new(2, sample_transfer(&kp));
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let json = serde_json::to_value(&tx).unwrap();
        assert!(json["sender_pk"].is_string());
        assert!(json["proofs"].is_array());
        let back: TransferWithProofs = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
    }
}
