//! Alias registration transactions.
//!
//! Two shape-specific exceptions live here and must not be generalized:
//!
//! - The identifier is derived from the type byte and the alias bytes
//!   alone, not from the full body, in both generations.
//! - The network scheme byte is injected into the alias value right before
//!   signing and identifier generation. An alias with the wrong scheme at
//!   that moment would produce an identifier other networks disagree with.
//!
//! Neither generation's body carries a separate scheme byte; the alias
//! itself is the network binding.

use crate::codec::{ByteReader, ByteWriter};
use crate::config::Scheme;
use crate::crypto::{self, fast_hash, Digest, PublicKey, SecretKey, Signature};
use crate::error::{CryptoError, DecodeContext, DecodeError, Error, ValidationError};
use crate::identity::Alias;
use crate::transaction::fields::{check_long, check_positive_long};
use crate::transaction::proofs::Proofs;
use crate::transaction::{expect_marker_type_version, Transactional, TransactionType};

/// Fields common to both alias-registration generations.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateAlias {
    pub sender_pk: PublicKey,
    pub alias: Alias,
    pub fee: u64,
    pub timestamp: u64,
}

impl CreateAlias {
    fn write_to(&self, w: &mut ByteWriter) {
        w.write_bytes(self.sender_pk.as_bytes());
        w.write_u16_bytes(&self.alias.bytes());
        w.write_u64(self.fee);
        w.write_u64(self.timestamp);
    }

    fn read_from(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let sender_pk = PublicKey::new(r.read_array()?);
        let alias_bytes = r.read_u16_bytes()?;
        let alias = Alias::from_bytes(&alias_bytes)?;
        Ok(Self {
            sender_pk,
            alias,
            fee: r.read_u64()?,
            timestamp: r.read_u64()?,
        })
    }

    /// The alias-derived identifier shared by both generations.
    fn alias_id(&self) -> Digest {
        let mut data = Vec::with_capacity(1 + self.alias.len_bytes());
        data.push(TransactionType::CreateAlias.to_byte());
        data.extend_from_slice(&self.alias.bytes());
        Digest::new(fast_hash(&data))
    }

    fn validate(&self, scheme: Scheme) -> Result<(), ValidationError> {
        self.alias.valid()?;
        if self.alias.scheme != scheme {
            return Err(ValidationError::SchemeMismatch {
                entity: "alias",
                expected: scheme,
                got: self.alias.scheme,
            });
        }
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)
    }
}

// ---------------------------------------------------------------------------
// CreateAliasWithSig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateAliasWithSig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(flatten)]
    pub create_alias: CreateAlias,
}

impl CreateAliasWithSig {
    pub fn new(create_alias: CreateAlias) -> Self {
        Self {
            id: None,
            signature: None,
            create_alias,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        let type_byte = r
            .read_u8()
            .ctx("failed to unmarshal create alias transaction from bytes")?;
        if type_byte != TransactionType::CreateAlias.to_byte() {
            return Err(DecodeError::Malformed {
                entity: "create alias transaction",
                reason: format!("unexpected type byte {type_byte}"),
            }
            .into());
        }
        let create_alias = CreateAlias::read_from(&mut r)
            .ctx("failed to unmarshal create alias transaction from bytes")?;
        let signature = Signature::new(r.read_array()?);
        r.expect_end()?;

        let mut tx = Self::new(create_alias);
        tx.signature = Some(signature);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for CreateAliasWithSig {
    fn tx_type(&self) -> TransactionType {
        TransactionType::CreateAlias
    }

    fn version(&self) -> u8 {
        1
    }

    fn id(&self) -> Option<&Digest> {
        self.id.as_ref()
    }

    fn body_bytes(&self, _scheme: Scheme) -> Result<Vec<u8>, Error> {
        let mut w = ByteWriter::new();
        w.write_u8(TransactionType::CreateAlias.to_byte());
        self.create_alias.write_to(&mut w);
        Ok(w.into_vec())
    }

    fn sign(&mut self, scheme: Scheme, secret_key: &SecretKey) -> Result<(), Error> {
        self.create_alias.alias.scheme = scheme;
        let body = self.body_bytes(scheme)?;
        self.signature = Some(crypto::sign(secret_key, &body));
        self.id = Some(self.create_alias.alias_id());
        Ok(())
    }

    fn verify(&self, scheme: Scheme, public_key: &PublicKey) -> Result<bool, Error> {
        let signature = self
            .signature
            .ok_or(CryptoError::MissingSignature("create alias transaction"))?;
        let body = self.body_bytes(scheme)?;
        Ok(crypto::verify(public_key, &signature, &body))
    }

    fn generate_id(&mut self, scheme: Scheme) -> Result<(), Error> {
        if self.id.is_none() {
            self.create_alias.alias.scheme = scheme;
            self.id = Some(self.create_alias.alias_id());
        }
        Ok(())
    }

    fn validate(&self, scheme: Scheme) -> Result<(), ValidationError> {
        self.create_alias.validate(scheme)
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let signature = self
            .signature
            .ok_or(CryptoError::MissingSignature("create alias transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        w.write_bytes(signature.as_bytes());
        Ok(w.into_vec())
    }
}

// ---------------------------------------------------------------------------
// CreateAliasWithProofs
// ---------------------------------------------------------------------------

const CREATE_ALIAS_PROOFS_VERSION: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateAliasWithProofs {
    pub version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    #[serde(flatten)]
    pub create_alias: CreateAlias,
}

impl CreateAliasWithProofs {
    pub fn new(create_alias: CreateAlias) -> Self {
        Self {
            version: CREATE_ALIAS_PROOFS_VERSION,
            id: None,
            proofs: None,
            create_alias,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        expect_marker_type_version(
            &mut r,
            "create alias transaction",
            TransactionType::CreateAlias,
            CREATE_ALIAS_PROOFS_VERSION,
        )?;
        let create_alias = CreateAlias::read_from(&mut r)
            .ctx("failed to unmarshal create alias transaction from bytes")?;
        let proofs = Proofs::read_from(&mut r)
            .ctx("failed to unmarshal create alias transaction from bytes")?;
        r.expect_end()?;

        let mut tx = Self::new(create_alias);
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for CreateAliasWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::CreateAlias
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
        w.write_u8(TransactionType::CreateAlias.to_byte());
        w.write_u8(self.version);
        self.create_alias.write_to(&mut w);
        Ok(w.into_vec())
    }

    fn sign(&mut self, scheme: Scheme, secret_key: &SecretKey) -> Result<(), Error> {
        self.create_alias.alias.scheme = scheme;
        let body = self.body_bytes(scheme)?;
        let mut proofs = self.proofs.take().unwrap_or_default();
        proofs.sign(secret_key, &body);
        self.proofs = Some(proofs);
        self.id = Some(self.create_alias.alias_id());
        Ok(())
    }

    fn verify(&self, scheme: Scheme, public_key: &PublicKey) -> Result<bool, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("create alias transaction"))?;
        let body = self.body_bytes(scheme)?;
        Ok(proofs.verify(public_key, &body)?)
    }

    fn generate_id(&mut self, scheme: Scheme) -> Result<(), Error> {
        if self.id.is_none() {
            self.create_alias.alias.scheme = scheme;
            self.id = Some(self.create_alias.alias_id());
        }
        Ok(())
    }

    fn validate(&self, scheme: Scheme) -> Result<(), ValidationError> {
        self.create_alias.validate(scheme)
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("create alias transaction"))?;
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

    fn sample(kp: &Keypair, name: &str) -> CreateAlias {
        CreateAlias {
            sender_pk: kp.public_key(),
            alias: Alias::new(TESTNET_SCHEME, name),
            fee: 100_000,
            timestamp: 1_534_264_221_000,
        }
    }

    #[test]
    fn both_generations_roundtrip() {
        let kp = Keypair::generate();

        let mut v1 = CreateAliasWithSig::new(sample(&kp, "first-alias"));
        v1.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = v1.marshal_binary(TESTNET_SCHEME).unwrap();
        assert_eq!(
            CreateAliasWithSig::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap(),
            v1
        );

        let mut v2 = CreateAliasWithProofs::new(sample(&kp, "second-alias"));
        v2.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = v2.marshal_binary(TESTNET_SCHEME).unwrap();
        assert_eq!(
            CreateAliasWithProofs::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap(),
            v2
        );
    }

    #[test]
    fn id_depends_only_on_type_and_alias_bytes() {
        let kp = Keypair::generate();
        let mut a = CreateAliasWithProofs::new(sample(&kp, "same-alias"));
        a.generate_id(TESTNET_SCHEME).unwrap();

        // A different fee and timestamp must not change the identifier.
        let mut other = sample(&kp, "same-alias");
        other.fee = 999_999;
        other.timestamp = 7;
        let mut b = CreateAliasWithProofs::new(other);
        b.generate_id(TESTNET_SCHEME).unwrap();
        assert_eq!(a.id, b.id);

        // Both generations derive the same identifier for the same alias.
        let mut v1 = CreateAliasWithSig::new(sample(&kp, "same-alias"));
        v1.generate_id(TESTNET_SCHEME).unwrap();
        assert_eq!(a.id, v1.id);

        let mut c = CreateAliasWithProofs::new(sample(&kp, "other-alias"));
        c.generate_id(TESTNET_SCHEME).unwrap();
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn signing_injects_the_scheme_into_the_alias() {
        let kp = Keypair::generate();
        let mut tx = CreateAliasWithProofs::new(sample(&kp, "roaming-alias"));
        // The alias was built for the test network; signing for main-net
        // must rebind it before the identifier is derived.
        tx.sign(MAINNET_SCHEME, &kp.secret_key()).unwrap();
        assert_eq!(tx.create_alias.alias.scheme, MAINNET_SCHEME);

        let mut reference = CreateAliasWithProofs::new(CreateAlias {
            sender_pk: kp.public_key(),
            alias: Alias::new(MAINNET_SCHEME, "roaming-alias"),
            fee: 100_000,
            timestamp: 1_534_264_221_000,
        });
        reference.generate_id(MAINNET_SCHEME).unwrap();
        assert_eq!(tx.id, reference.id);
    }

    #[test]
    fn invalid_alias_decodes_but_fails_validation() {
        let kp = Keypair::generate();
        let mut tx = CreateAliasWithSig::new(sample(&kp, "xxx"));
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        let back = CreateAliasWithSig::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap();
        assert!(matches!(
            back.validate(TESTNET_SCHEME),
            Err(ValidationError::LengthOutOfBounds { .. })
        ));
    }

    #[test]
    fn alias_scheme_mismatch_fails_validation() {
        let kp = Keypair::generate();
        let tx = CreateAliasWithProofs::new(sample(&kp, "good-alias"));
        assert!(matches!(
            tx.validate(MAINNET_SCHEME),
            Err(ValidationError::SchemeMismatch { entity: "alias", .. })
        ));
    }

    #[test]
    fn truncation_never_panics() {
        let kp = Keypair::generate();
        let mut tx = CreateAliasWithProofs::new(sample(&kp, "sliced-alias"));
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        for cut in 0..bytes.len() {
            assert!(CreateAliasWithProofs::unmarshal_binary(&bytes[..cut], TESTNET_SCHEME).is_err());
        }
    }
}
