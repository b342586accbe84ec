//! Exchange orders: signed price-limited offers matched by a matcher.
//!
//! Orders are their own authentication envelope nested inside an exchange
//! transaction. Version 1 carries a bare signature and no version byte;
//! versions 2 and 3 lead with a version byte and carry proofs; version 3
//! adds the matcher-fee asset.

use crate::codec::{ByteReader, ByteWriter};
use crate::crypto::{self, Digest, PublicKey, SecretKey, Signature};
use crate::error::{CryptoError, DecodeError, Error, ValidationError};
use crate::transaction::body_digest;
use crate::transaction::fields::{check_long, check_positive_long, OptionalAsset};
use crate::transaction::proofs::Proofs;

// ---------------------------------------------------------------------------
// OrderType
// ---------------------------------------------------------------------------

/// Side of the book an order sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Buy,
    Sell,
}

impl OrderType {
    fn to_byte(self) -> u8 {
        match self {
            OrderType::Buy => 0,
            OrderType::Sell => 1,
        }
    }

    fn from_byte(b: u8) -> Result<Self, DecodeError> {
        match b {
            0 => Ok(OrderType::Buy),
            1 => Ok(OrderType::Sell),
            got => Err(DecodeError::UnknownDiscriminant {
                entity: "order type",
                got,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// AssetPair
// ---------------------------------------------------------------------------

/// The traded pair: amounts are denominated in `amount_asset`, prices in
/// `price_asset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AssetPair {
    pub amount_asset: OptionalAsset,
    pub price_asset: OptionalAsset,
}

impl AssetPair {
    fn write_to(&self, w: &mut ByteWriter) {
        self.amount_asset.write_to(w);
        self.price_asset.write_to(w);
    }

    fn read_from(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            amount_asset: OptionalAsset::read_from(r)?,
            price_asset: OptionalAsset::read_from(r)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// Supported order format versions.
pub const MIN_ORDER_VERSION: u8 = 1;
pub const MAX_ORDER_VERSION: u8 = 3;

/// A price-limited offer signed by its author.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Order {
    pub version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    pub sender_pk: PublicKey,
    pub matcher_pk: PublicKey,
    pub pair: AssetPair,
    pub order_type: OrderType,
    pub price: u64,
    pub amount: u64,
    pub timestamp: u64,
    pub expiration: u64,
    pub matcher_fee: u64,
    /// Asset the matcher fee is paid in; meaningful for version 3 only.
    #[serde(default)]
    pub matcher_fee_asset: OptionalAsset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        version: u8,
        sender_pk: PublicKey,
        matcher_pk: PublicKey,
        pair: AssetPair,
        order_type: OrderType,
        price: u64,
        amount: u64,
        timestamp: u64,
        expiration: u64,
        matcher_fee: u64,
    ) -> Self {
        Self {
            version,
            id: None,
            sender_pk,
            matcher_pk,
            pair,
            order_type,
            price,
            amount,
            timestamp,
            expiration,
            matcher_fee,
            matcher_fee_asset: OptionalAsset::native(),
            signature: None,
            proofs: None,
        }
    }

    /// Canonical order body: the exact input to signing and identifier
    /// derivation. Version 1 has no leading version byte.
    pub fn body_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        if self.version >= 2 {
            w.write_u8(self.version);
        }
        w.write_bytes(self.sender_pk.as_bytes());
        w.write_bytes(self.matcher_pk.as_bytes());
        self.pair.write_to(&mut w);
        w.write_u8(self.order_type.to_byte());
        w.write_u64(self.price);
        w.write_u64(self.amount);
        w.write_u64(self.timestamp);
        w.write_u64(self.expiration);
        w.write_u64(self.matcher_fee);
        if self.version >= 3 {
            self.matcher_fee_asset.write_to(&mut w);
        }
        w.into_vec()
    }

    pub fn sign(&mut self, secret_key: &SecretKey) -> Result<(), Error> {
        let body = self.body_bytes();
        if self.version == 1 {
            self.signature = Some(crypto::sign(secret_key, &body));
        } else {
            let mut proofs = self.proofs.take().unwrap_or_default();
            proofs.sign(secret_key, &body);
            self.proofs = Some(proofs);
        }
        self.id = Some(body_digest(&body));
        Ok(())
    }

    pub fn verify(&self, public_key: &PublicKey) -> Result<bool, Error> {
        let body = self.body_bytes();
        if self.version == 1 {
            let signature = self.signature.ok_or(CryptoError::MissingSignature("order"))?;
            Ok(crypto::verify(public_key, &signature, &body))
        } else {
            let proofs = self.proofs.as_ref().ok_or(CryptoError::MissingProofs("order"))?;
            Ok(proofs.verify(public_key, &body)?)
        }
    }

    pub fn generate_id(&mut self) {
        if self.id.is_none() {
            self.id = Some(body_digest(&self.body_bytes()));
        }
    }

    /// Order wire form: body followed by the authentication material.
    pub fn wire_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes());
        if self.version == 1 {
            let signature = self.signature.ok_or(CryptoError::MissingSignature("order"))?;
            w.write_bytes(signature.as_bytes());
        } else {
            let proofs = self.proofs.as_ref().ok_or(CryptoError::MissingProofs("order"))?;
            proofs.write_to(&mut w);
        }
        Ok(w.into_vec())
    }

    fn read_fields(r: &mut ByteReader<'_>, version: u8) -> Result<Self, DecodeError> {
        let sender_pk = PublicKey::new(r.read_array()?);
        let matcher_pk = PublicKey::new(r.read_array()?);
        let pair = AssetPair::read_from(r)?;
        let order_type = OrderType::from_byte(r.read_u8()?)?;
        let price = r.read_u64()?;
        let amount = r.read_u64()?;
        let timestamp = r.read_u64()?;
        let expiration = r.read_u64()?;
        let matcher_fee = r.read_u64()?;
        let matcher_fee_asset = if version >= 3 {
            OptionalAsset::read_from(r)?
        } else {
            OptionalAsset::native()
        };
        Ok(Self {
            version,
            id: None,
            sender_pk,
            matcher_pk,
            pair,
            order_type,
            price,
            amount,
            timestamp,
            expiration,
            matcher_fee,
            matcher_fee_asset,
            signature: None,
            proofs: None,
        })
    }

    /// Decodes a version-1 order (body without version byte, then a
    /// signature) from the cursor.
    pub fn read_v1(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let mut order = Self::read_fields(r, 1)?;
        order.signature = Some(Signature::new(r.read_array()?));
        order.generate_id();
        Ok(order)
    }

    /// Decodes a versioned order (leading version byte 2 or 3, then
    /// proofs) from the cursor.
    pub fn read_versioned(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let version = r.read_u8()?;
        if !(2..=MAX_ORDER_VERSION).contains(&version) {
            return Err(DecodeError::UnsupportedVersion {
                entity: "order",
                got: version,
            });
        }
        let mut order = Self::read_fields(r, version)?;
        order.proofs = Some(Proofs::read_from(r)?);
        order.generate_id();
        Ok(order)
    }

    pub fn valid(&self) -> Result<(), ValidationError> {
        if !(MIN_ORDER_VERSION..=MAX_ORDER_VERSION).contains(&self.version) {
            return Err(ValidationError::WrongVersion {
                entity: "order",
                expected: MIN_ORDER_VERSION,
                got: self.version,
            });
        }
        check_positive_long("price", self.price)?;
        check_positive_long("amount", self.amount)?;
        check_positive_long("matcher fee", self.matcher_fee)?;
        check_long("timestamp", self.timestamp)?;
        check_long("expiration", self.expiration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;

    fn sample_order(version: u8, kp: &Keypair, matcher: &Keypair) -> Order {
        Order::new(
            version,
            kp.public_key(),
            matcher.public_key(),
            AssetPair {
                amount_asset: OptionalAsset::issued(Digest::new([3u8; 32])),
                price_asset: OptionalAsset::native(),
            },
            OrderType::Buy,
            100_000,
            10_000_000,
            1_534_264_221_000,
            1_534_264_221_000 + 1_000_000,
            300_000,
        )
    }

    #[test]
    fn v1_sign_verify_and_wire_roundtrip() {
        let kp = Keypair::generate();
        let matcher = Keypair::generate();
        let mut order = sample_order(1, &kp, &matcher);
        order.sign(&kp.secret_key()).unwrap();
        assert!(order.verify(&kp.public_key()).unwrap());
        assert!(!order.verify(&matcher.public_key()).unwrap());

        let wire = order.wire_bytes().unwrap();
        let mut r = ByteReader::new(&wire);
        let back = Order::read_v1(&mut r).unwrap();
        assert!(r.is_empty());
        assert_eq!(back, order);
    }

    #[test]
    fn versioned_orders_roundtrip() {
        let kp = Keypair::generate();
        let matcher = Keypair::generate();
        for version in [2u8, 3] {
            let mut order = sample_order(version, &kp, &matcher);
            if version == 3 {
                order.matcher_fee_asset = OptionalAsset::issued(Digest::new([6u8; 32]));
            }
            order.sign(&kp.secret_key()).unwrap();
            let wire = order.wire_bytes().unwrap();
            assert_eq!(wire[0], version, "versioned orders lead with the version byte");
            let mut r = ByteReader::new(&wire);
            let back = Order::read_versioned(&mut r).unwrap();
            assert!(r.is_empty());
            assert_eq!(back, order);
        }
    }

    #[test]
    fn v1_body_has_no_version_byte() {
        let kp = Keypair::generate();
        let matcher = Keypair::generate();
        let v1 = sample_order(1, &kp, &matcher);
        let v2 = sample_order(2, &kp, &matcher);
        assert_eq!(v1.body_bytes().len() + 1, v2.body_bytes().len());
        assert_eq!(&v1.body_bytes()[..32], v1.sender_pk.as_bytes());
    }

    #[test]
    fn id_is_derived_from_body() {
        let kp = Keypair::generate();
        let matcher = Keypair::generate();
        let mut a = sample_order(2, &kp, &matcher);
        let mut b = sample_order(2, &kp, &matcher);
        a.generate_id();
        b.generate_id();
        assert_eq!(a.id, b.id);

        let mut c = sample_order(2, &kp, &matcher);
        c.price += 1;
        c.generate_id();
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn bad_order_type_byte_rejected() {
        let kp = Keypair::generate();
        let matcher = Keypair::generate();
        let mut order = sample_order(1, &kp, &matcher);
        order.sign(&kp.secret_key()).unwrap();
        let mut wire = order.wire_bytes().unwrap();
        // The order-type byte sits after two keys and two native-asset flags.
        let type_offset = 32 + 32 + 1 + 33;
        assert_eq!(wire[type_offset], 0);
        wire[type_offset] = 7;
        let mut r = ByteReader::new(&wire);
        assert!(matches!(
            Order::read_v1(&mut r),
            Err(DecodeError::UnknownDiscriminant { entity: "order type", got: 7 })
        ));
    }

    #[test]
    fn zero_price_fails_validation() {
        let kp = Keypair::generate();
        let matcher = Keypair::generate();
        let mut order = sample_order(2, &kp, &matcher);
        order.price = 0;
        assert!(matches!(
            order.valid(),
            Err(ValidationError::NonPositive { field: "price" })
        ));
    }

    #[test]
    fn unsupported_version_rejected_by_reader() {
        let data = [9u8, 0, 0];
        let mut r = ByteReader::new(&data);
        assert!(matches!(
            Order::read_versioned(&mut r),
            Err(DecodeError::UnsupportedVersion { entity: "order", got: 9 })
        ));
    }
}
