//! Genesis and Payment: the two legacy-only transaction shapes.
//!
//! Both shapes prepend three zero bytes to the canonical body before any
//! hashing or signing. Genesis goes further: it is not signed by any key,
//! so its "signature" is the padded-body hash duplicated into both halves
//! of the 64-byte field. These are intentional historical compatibility
//! behaviors; changing them would change every early chain identifier.

use crate::codec::{ByteReader, ByteWriter};
use crate::config::{Scheme, SIGNATURE_SIZE};
use crate::crypto::{self, fast_hash, Digest, PublicKey, SecretKey, Signature};
use crate::error::{CryptoError, DecodeError, Error, ValidationError};
use crate::identity::Address;
use crate::transaction::fields::{check_long, check_positive_long};
use crate::transaction::{Transactional, TransactionType};

/// Number of zero bytes prepended to legacy-only bodies before hashing.
const LEGACY_PAD: usize = 3;

fn pad_body(body: &[u8]) -> Vec<u8> {
    let mut padded = vec![0u8; LEGACY_PAD + body.len()];
    padded[LEGACY_PAD..].copy_from_slice(body);
    padded
}

// ---------------------------------------------------------------------------
// Genesis
// ---------------------------------------------------------------------------

/// Initial token allocation recorded in the first block.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Genesis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    pub timestamp: u64,
    pub recipient: Address,
    pub amount: u64,
}

impl Genesis {
    /// Builds the allocation and immediately derives its pseudo-signature
    /// and identifier; genesis values have no unsigned stage worth keeping.
    pub fn new(timestamp: u64, recipient: Address, amount: u64) -> Self {
        let mut tx = Self {
            id: None,
            signature: None,
            timestamp,
            recipient,
            amount,
        };
        tx.generate_sig_and_id();
        tx
    }

    fn write_body(&self, w: &mut ByteWriter) {
        w.write_u8(TransactionType::Genesis.to_byte());
        w.write_u64(self.timestamp);
        self.recipient.write_to(w);
        w.write_u64(self.amount);
    }

    /// Derives the duplicated-hash pseudo-signature and the identifier from
    /// the zero-padded body.
    pub fn generate_sig_and_id(&mut self) {
        let mut w = ByteWriter::new();
        self.write_body(&mut w);
        let digest = fast_hash(&pad_body(w.as_slice()));
        let mut sig = [0u8; SIGNATURE_SIZE];
        sig[..32].copy_from_slice(&digest);
        sig[32..].copy_from_slice(&digest);
        self.signature = Some(Signature::new(sig));
        self.id = Some(Digest::new(digest));
    }

    pub fn unmarshal_binary(data: &[u8], _scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        let type_byte = r.read_u8()?;
        if type_byte != TransactionType::Genesis.to_byte() {
            return Err(DecodeError::Malformed {
                entity: "genesis transaction",
                reason: format!("unexpected type byte {type_byte}"),
            }
            .into());
        }
        let timestamp = r.read_u64()?;
        let recipient = Address::read_from(&mut r)?;
        let amount = r.read_u64()?;
        r.expect_end()?;
        Ok(Self::new(timestamp, recipient, amount))
    }
}

impl Transactional for Genesis {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Genesis
    }

    fn version(&self) -> u8 {
        1
    }

    fn id(&self) -> Option<&Digest> {
        self.id.as_ref()
    }

    fn body_bytes(&self, _scheme: Scheme) -> Result<Vec<u8>, Error> {
        let mut w = ByteWriter::new();
        self.write_body(&mut w);
        Ok(w.into_vec())
    }

    /// Genesis is keyless: signing regenerates the pseudo-signature and
    /// ignores the secret key.
    fn sign(&mut self, _scheme: Scheme, _secret_key: &SecretKey) -> Result<(), Error> {
        self.generate_sig_and_id();
        Ok(())
    }

    fn verify(&self, scheme: Scheme, _public_key: &PublicKey) -> Result<bool, Error> {
        let stored = self
            .signature
            .ok_or(CryptoError::MissingSignature("genesis transaction"))?;
        let body = self.body_bytes(scheme)?;
        let digest = fast_hash(&pad_body(&body));
        let mut expected = [0u8; SIGNATURE_SIZE];
        expected[..32].copy_from_slice(&digest);
        expected[32..].copy_from_slice(&digest);
        Ok(stored == Signature::new(expected))
    }

    fn generate_id(&mut self, scheme: Scheme) -> Result<(), Error> {
        if self.id.is_none() {
            let body = self.body_bytes(scheme)?;
            self.id = Some(Digest::new(fast_hash(&pad_body(&body))));
        }
        Ok(())
    }

    fn validate(&self, _scheme: Scheme) -> Result<(), ValidationError> {
        check_positive_long("amount", self.amount)?;
        check_long("timestamp", self.timestamp)?;
        if !self.recipient.valid() {
            return Err(ValidationError::InvalidAddress);
        }
        Ok(())
    }

    /// The wire form is the body alone: the pseudo-signature is always
    /// recomputable, so it never travels.
    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        self.body_bytes(scheme)
    }
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

/// The original single-recipient value transfer, predating Transfer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Payment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    pub sender_pk: PublicKey,
    pub recipient: Address,
    pub amount: u64,
    pub fee: u64,
    pub timestamp: u64,
}

impl Payment {
    pub fn new(
        sender_pk: PublicKey,
        recipient: Address,
        amount: u64,
        fee: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            id: None,
            signature: None,
            sender_pk,
            recipient,
            amount,
            fee,
            timestamp,
        }
    }

    fn write_body(&self, w: &mut ByteWriter) {
        w.write_u8(TransactionType::Payment.to_byte());
        w.write_u64(self.timestamp);
        w.write_bytes(self.sender_pk.as_bytes());
        self.recipient.write_to(w);
        w.write_u64(self.amount);
        w.write_u64(self.fee);
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        let type_byte = r.read_u8()?;
        if type_byte != TransactionType::Payment.to_byte() {
            return Err(DecodeError::Malformed {
                entity: "payment transaction",
                reason: format!("unexpected type byte {type_byte}"),
            }
            .into());
        }
        let timestamp = r.read_u64()?;
        let sender_pk = PublicKey::new(r.read_array()?);
        let recipient = Address::read_from(&mut r)?;
        let amount = r.read_u64()?;
        let fee = r.read_u64()?;
        let signature = Signature::new(r.read_array()?);
        r.expect_end()?;

        let mut tx = Self::new(sender_pk, recipient, amount, fee, timestamp);
        tx.signature = Some(signature);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for Payment {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Payment
    }

    fn version(&self) -> u8 {
        1
    }

    fn id(&self) -> Option<&Digest> {
        self.id.as_ref()
    }

    fn body_bytes(&self, _scheme: Scheme) -> Result<Vec<u8>, Error> {
        let mut w = ByteWriter::new();
        self.write_body(&mut w);
        Ok(w.into_vec())
    }

    fn sign(&mut self, scheme: Scheme, secret_key: &SecretKey) -> Result<(), Error> {
        let padded = pad_body(&self.body_bytes(scheme)?);
        self.signature = Some(crypto::sign(secret_key, &padded));
        self.id = Some(Digest::new(fast_hash(&padded)));
        Ok(())
    }

    fn verify(&self, scheme: Scheme, public_key: &PublicKey) -> Result<bool, Error> {
        let signature = self
            .signature
            .ok_or(CryptoError::MissingSignature("payment transaction"))?;
        let padded = pad_body(&self.body_bytes(scheme)?);
        Ok(crypto::verify(public_key, &signature, &padded))
    }

    fn generate_id(&mut self, scheme: Scheme) -> Result<(), Error> {
        if self.id.is_none() {
            let padded = pad_body(&self.body_bytes(scheme)?);
            self.id = Some(Digest::new(fast_hash(&padded)));
        }
        Ok(())
    }

    fn validate(&self, _scheme: Scheme) -> Result<(), ValidationError> {
        check_positive_long("amount", self.amount)?;
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)?;
        if !self.recipient.valid() {
            return Err(ValidationError::InvalidAddress);
        }
        Ok(())
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let signature = self
            .signature
            .ok_or(CryptoError::MissingSignature("payment transaction"))?;
        let mut w = ByteWriter::new();
        self.write_body(&mut w);
        w.write_bytes(signature.as_bytes());
        Ok(w.into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TESTNET_SCHEME;
    use crate::crypto::Keypair;

    fn recipient() -> Address {
        Address::from_public_key(TESTNET_SCHEME, &Keypair::from_seed(&[2u8; 32]).public_key())
    }

    #[test]
    fn genesis_pseudo_signature_is_duplicated_hash() {
        let tx = Genesis::new(1_558_213_875_001, recipient(), 100_000_000);
        let sig = tx.signature.unwrap();
        assert_eq!(sig.as_bytes()[..32], sig.as_bytes()[32..]);
        assert_eq!(tx.id.unwrap().as_bytes(), &sig.as_bytes()[..32]);
    }

    #[test]
    fn genesis_id_uses_zero_padded_body() {
        let tx = Genesis::new(1, recipient(), 10);
        let body = tx.body_bytes(TESTNET_SCHEME).unwrap();
        let unpadded = fast_hash(&body);
        assert_ne!(tx.id.unwrap().as_bytes(), &unpadded, "padding must matter");

        let mut padded = vec![0u8; 3];
        padded.extend_from_slice(&body);
        assert_eq!(tx.id.unwrap().as_bytes(), &fast_hash(&padded));
    }

    #[test]
    fn genesis_roundtrip() {
        let tx = Genesis::new(1_558_213_875_001, recipient(), 9_000_000);
        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        let back = Genesis::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap();
        assert_eq!(back, tx);
        assert!(back.verify(TESTNET_SCHEME, &Keypair::generate().public_key()).unwrap());
    }

    #[test]
    fn genesis_wire_has_no_signature() {
        let tx = Genesis::new(7, recipient(), 10);
        // type(1) + timestamp(8) + recipient(26) + amount(8)
        assert_eq!(tx.marshal_binary(TESTNET_SCHEME).unwrap().len(), 43);
    }

    #[test]
    fn genesis_truncated_input_errors() {
        let tx = Genesis::new(7, recipient(), 10);
        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        for cut in 0..bytes.len() {
            assert!(Genesis::unmarshal_binary(&bytes[..cut], TESTNET_SCHEME).is_err());
        }
    }

    #[test]
    fn payment_sign_verify_roundtrip() {
        let kp = Keypair::generate();
        let mut tx = Payment::new(kp.public_key(), recipient(), 500, 1, 1_558_213_875_001);
        assert!(tx.id.is_none());
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        assert!(tx.id.is_some());
        assert!(tx.verify(TESTNET_SCHEME, &kp.public_key()).unwrap());
        assert!(!tx.verify(TESTNET_SCHEME, &Keypair::generate().public_key()).unwrap());
    }

    #[test]
    fn payment_signature_covers_padded_body() {
        let kp = Keypair::generate();
        let mut tx = Payment::new(kp.public_key(), recipient(), 500, 1, 42);
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();

        let body = tx.body_bytes(TESTNET_SCHEME).unwrap();
        let sig = tx.signature.unwrap();
        assert!(!crypto::verify(&kp.public_key(), &sig, &body));
        let mut padded = vec![0u8; 3];
        padded.extend_from_slice(&body);
        assert!(crypto::verify(&kp.public_key(), &sig, &padded));
    }

    #[test]
    fn payment_binary_roundtrip_recomputes_id() {
        let kp = Keypair::generate();
        let mut tx = Payment::new(kp.public_key(), recipient(), 500, 1, 42);
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        let back = Payment::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap();
        assert_eq!(back, tx);
        assert_eq!(back.id, tx.id);
    }

    #[test]
    fn payment_unsigned_cannot_marshal() {
        let kp = Keypair::generate();
        let tx = Payment::new(kp.public_key(), recipient(), 500, 1, 42);
        assert!(matches!(
            tx.marshal_binary(TESTNET_SCHEME),
            Err(Error::Crypto(CryptoError::MissingSignature(_)))
        ));
    }

    #[test]
    fn payment_validation_rules() {
        let kp = Keypair::generate();
        let ok = Payment::new(kp.public_key(), recipient(), 500, 1, 42);
        assert!(ok.validate(TESTNET_SCHEME).is_ok());

        let zero_amount = Payment::new(kp.public_key(), recipient(), 0, 1, 42);
        assert!(matches!(
            zero_amount.validate(TESTNET_SCHEME),
            Err(ValidationError::NonPositive { field: "amount" })
        ));

        let huge_fee = Payment::new(kp.public_key(), recipient(), 1, u64::MAX, 42);
        assert!(matches!(
            huge_fee.validate(TESTNET_SCHEME),
            Err(ValidationError::TooBig { field: "fee", .. })
        ));
    }

    #[test]
    fn generate_id_is_idempotent() {
        let kp = Keypair::generate();
        let mut tx = Payment::new(kp.public_key(), recipient(), 500, 1, 42);
        tx.generate_id(TESTNET_SCHEME).unwrap();
        let first = tx.id;
        tx.generate_id(TESTNET_SCHEME).unwrap();
        assert_eq!(tx.id, first);
    }
}
