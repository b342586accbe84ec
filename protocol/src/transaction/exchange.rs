//! Exchange transactions: a matcher settling a buy order against a sell
//! order.
//!
//! The matcher is the transaction sender; both embedded orders must name
//! its public key. Orders are length-prefixed blobs. In the modern
//! generation a blob starts with `0x01` for a version-1 order (the marker
//! is stripped before decoding) or with the order's own version byte for
//! versions 2 and 3.

use crate::codec::{ByteReader, ByteWriter};
use crate::config::{Scheme, MAX_ORDER_TTL_MS};
use crate::crypto::{self, Digest, PublicKey, SecretKey, Signature};
use crate::error::{CryptoError, DecodeContext, DecodeError, Error, ValidationError};
use crate::transaction::fields::{check_long, check_positive_long};
use crate::transaction::order::Order;
use crate::transaction::proofs::Proofs;
use crate::transaction::{body_digest, OrderType, Transactional, TransactionType};

/// Fields common to every exchange generation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Exchange {
    /// The matcher's public key; the transaction sender.
    pub sender_pk: PublicKey,
    pub buy_order: Order,
    pub sell_order: Order,
    pub price: u64,
    pub amount: u64,
    pub buy_matcher_fee: u64,
    pub sell_matcher_fee: u64,
    pub fee: u64,
    pub timestamp: u64,
}

impl Exchange {
    fn write_tail(&self, w: &mut ByteWriter) {
        w.write_u64(self.price);
        w.write_u64(self.amount);
        w.write_u64(self.buy_matcher_fee);
        w.write_u64(self.sell_matcher_fee);
        w.write_u64(self.fee);
        w.write_u64(self.timestamp);
    }

    fn read_tail(r: &mut ByteReader<'_>) -> Result<(u64, u64, u64, u64, u64, u64), DecodeError> {
        Ok((
            r.read_u64()?,
            r.read_u64()?,
            r.read_u64()?,
            r.read_u64()?,
            r.read_u64()?,
            r.read_u64()?,
        ))
    }

    /// Rules shared by both generations. `price_banded` additionally
    /// requires the settlement price to lie between the orders' limits,
    /// which applies to the older transaction versions.
    fn validate(&self, price_banded: bool) -> Result<(), ValidationError> {
        check_positive_long("price", self.price)?;
        check_positive_long("amount", self.amount)?;
        check_long("buy matcher fee", self.buy_matcher_fee)?;
        check_long("sell matcher fee", self.sell_matcher_fee)?;
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)?;

        self.buy_order.valid()?;
        self.sell_order.valid()?;

        if self.buy_order.order_type != OrderType::Buy
            || self.sell_order.order_type != OrderType::Sell
        {
            return Err(ValidationError::OrdersNotOpposite);
        }
        if self.buy_order.matcher_pk != self.sender_pk
            || self.sell_order.matcher_pk != self.sender_pk
        {
            return Err(ValidationError::MatcherMismatch);
        }
        if self.buy_order.pair != self.sell_order.pair {
            return Err(ValidationError::AssetPairMismatch);
        }
        for order in [&self.buy_order, &self.sell_order] {
            let expiration = order.expiration;
            if expiration < self.timestamp
                || expiration.saturating_sub(self.timestamp) > MAX_ORDER_TTL_MS
            {
                return Err(ValidationError::ExpirationOutOfBounds {
                    expiration,
                    timestamp: self.timestamp,
                });
            }
        }
        if price_banded && (self.price < self.sell_order.price || self.price > self.buy_order.price)
        {
            return Err(ValidationError::PriceOutOfBounds {
                price: self.price,
                min: self.sell_order.price,
                max: self.buy_order.price,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ExchangeWithSig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExchangeWithSig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(flatten)]
    pub exchange: Exchange,
}

impl ExchangeWithSig {
    pub fn new(exchange: Exchange) -> Self {
        Self {
            id: None,
            signature: None,
            exchange,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        let type_byte = r
            .read_u8()
            .ctx("failed to unmarshal exchange transaction from bytes")?;
        if type_byte != TransactionType::Exchange.to_byte() {
            return Err(DecodeError::Malformed {
                entity: "exchange transaction",
                reason: format!("unexpected type byte {type_byte}"),
            }
            .into());
        }
        let buy_len = r.read_u32()? as usize;
        let sell_len = r.read_u32()? as usize;

        let buy_blob = r.read_bytes(buy_len)?;
        let mut buy_reader = ByteReader::new(buy_blob);
        let buy_order = Order::read_v1(&mut buy_reader)
            .ctx("failed to unmarshal buy order from bytes")?;
        buy_reader.expect_end()?;

        let sell_blob = r.read_bytes(sell_len)?;
        let mut sell_reader = ByteReader::new(sell_blob);
        let sell_order = Order::read_v1(&mut sell_reader)
            .ctx("failed to unmarshal sell order from bytes")?;
        sell_reader.expect_end()?;

        let (price, amount, buy_matcher_fee, sell_matcher_fee, fee, timestamp) =
            Exchange::read_tail(&mut r)?;
        let signature = Signature::new(r.read_array()?);
        r.expect_end()?;

        let sender_pk = buy_order.matcher_pk;
        let mut tx = Self::new(Exchange {
            sender_pk,
            buy_order,
            sell_order,
            price,
            amount,
            buy_matcher_fee,
            sell_matcher_fee,
            fee,
            timestamp,
        });
        tx.signature = Some(signature);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for ExchangeWithSig {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Exchange
    }

    fn version(&self) -> u8 {
        1
    }

    fn id(&self) -> Option<&Digest> {
        self.id.as_ref()
    }

    fn body_bytes(&self, _scheme: Scheme) -> Result<Vec<u8>, Error> {
        let buy = self.exchange.buy_order.wire_bytes()?;
        let sell = self.exchange.sell_order.wire_bytes()?;
        let mut w = ByteWriter::new();
        w.write_u8(TransactionType::Exchange.to_byte());
        w.write_u32(buy.len() as u32);
        w.write_u32(sell.len() as u32);
        w.write_bytes(&buy);
        w.write_bytes(&sell);
        self.exchange.write_tail(&mut w);
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
            .ok_or(CryptoError::MissingSignature("exchange transaction"))?;
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
        if self.exchange.buy_order.version != 1 || self.exchange.sell_order.version != 1 {
            return Err(ValidationError::WrongVersion {
                entity: "order",
                expected: 1,
                got: self.exchange.buy_order.version.max(self.exchange.sell_order.version),
            });
        }
        self.exchange.validate(true)
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let signature = self
            .signature
            .ok_or(CryptoError::MissingSignature("exchange transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        w.write_bytes(signature.as_bytes());
        Ok(w.into_vec())
    }
}

// ---------------------------------------------------------------------------
// ExchangeWithProofs
// ---------------------------------------------------------------------------

const MIN_VERSION: u8 = 2;
const MAX_VERSION: u8 = 3;

/// Marker leading a version-1 order blob inside a modern exchange body.
const ORDER_V1_MARKER: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExchangeWithProofs {
    pub version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    #[serde(flatten)]
    pub exchange: Exchange,
}

impl ExchangeWithProofs {
    pub fn new(version: u8, exchange: Exchange) -> Self {
        Self {
            version,
            id: None,
            proofs: None,
            exchange,
        }
    }

    fn order_blob(order: &Order) -> Result<Vec<u8>, Error> {
        let wire = order.wire_bytes()?;
        if order.version == 1 {
            let mut blob = Vec::with_capacity(1 + wire.len());
            blob.push(ORDER_V1_MARKER);
            blob.extend_from_slice(&wire);
            Ok(blob)
        } else {
            Ok(wire)
        }
    }

    fn read_order_blob(r: &mut ByteReader<'_>) -> Result<Order, DecodeError> {
        let len = r.read_u32()? as usize;
        let blob = r.read_bytes(len)?;
        let mut blob_reader = ByteReader::new(blob);
        let order = match blob_reader.peek_u8()? {
            ORDER_V1_MARKER => {
                blob_reader.read_u8()?;
                Order::read_v1(&mut blob_reader)?
            }
            _ => Order::read_versioned(&mut blob_reader)?,
        };
        blob_reader.expect_end()?;
        Ok(order)
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
        if type_byte != TransactionType::Exchange.to_byte() {
            return Err(DecodeError::Malformed {
                entity: "exchange transaction",
                reason: format!("unexpected type byte {type_byte}"),
            }
            .into());
        }
        let version = r.read_u8()?;
        if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
            return Err(DecodeError::UnsupportedVersion {
                entity: "exchange transaction",
                got: version,
            }
            .into());
        }
        let buy_order = Self::read_order_blob(&mut r)
            .ctx("failed to unmarshal buy order from bytes")?;
        let sell_order = Self::read_order_blob(&mut r)
            .ctx("failed to unmarshal sell order from bytes")?;
        let (price, amount, buy_matcher_fee, sell_matcher_fee, fee, timestamp) =
            Exchange::read_tail(&mut r)?;
        let proofs =
            Proofs::read_from(&mut r).ctx("failed to unmarshal exchange transaction from bytes")?;
        r.expect_end()?;

        let sender_pk = buy_order.matcher_pk;
        let mut tx = Self::new(
            version,
            Exchange {
                sender_pk,
                buy_order,
                sell_order,
                price,
                amount,
                buy_matcher_fee,
                sell_matcher_fee,
                fee,
                timestamp,
            },
        );
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for ExchangeWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::Exchange
    }

    fn version(&self) -> u8 {
        self.version
    }

    fn id(&self) -> Option<&Digest> {
        self.id.as_ref()
    }

    fn body_bytes(&self, _scheme: Scheme) -> Result<Vec<u8>, Error> {
        let buy = Self::order_blob(&self.exchange.buy_order)?;
        let sell = Self::order_blob(&self.exchange.sell_order)?;
        let mut w = ByteWriter::new();
        w.write_u8(0);
        w.write_u8(TransactionType::Exchange.to_byte());
        w.write_u8(self.version);
        w.write_u32_bytes(&buy);
        w.write_u32_bytes(&sell);
        self.exchange.write_tail(&mut w);
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
            .ok_or(CryptoError::MissingProofs("exchange transaction"))?;
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
                entity: "exchange transaction",
                expected: MIN_VERSION,
                got: self.version,
            });
        }
        // The price band against order limits binds transaction versions
        // one and two; version three settles on its own price rules.
        self.exchange.validate(self.version <= 2)
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("exchange transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        proofs.write_to(&mut w);
        Ok(w.into_vec())
    }
}
