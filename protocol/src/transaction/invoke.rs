//! Script invocation transactions.
//!
//! `InvokeScript` calls a named (or default) function on a script-guarded
//! account, optionally attaching payments. `InvokeExpression` submits a
//! self-contained expression for evaluation. Both embed the scheme byte.

use crate::codec::{ByteReader, ByteWriter};
use crate::config::{
    Scheme, MAX_FUNCTION_NAME_BYTES, MAX_INVOKE_ARGUMENTS, MAX_INVOKE_TX_BYTES,
};
use crate::crypto::{Digest, PublicKey, SecretKey};
use crate::error::{CryptoError, DecodeContext, DecodeError, Error, ValidationError};
use crate::identity::Recipient;
use crate::transaction::fields::{check_long, check_positive_long, OptionalAsset};
use crate::transaction::proofs::Proofs;
use crate::transaction::{
    body_digest, expect_marker_type_version, expect_scheme, Transactional, TransactionType,
};

// ---------------------------------------------------------------------------
// Argument
// ---------------------------------------------------------------------------

const ARG_INTEGER: u8 = 0;
const ARG_BINARY: u8 = 1;
const ARG_STRING: u8 = 2;
const ARG_BOOLEAN: u8 = 3;
const ARG_LIST: u8 = 4;

/// A value passed to an invoked function.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Argument {
    Integer(i64),
    Binary(Vec<u8>),
    String(String),
    Boolean(bool),
    List(Vec<Argument>),
}

impl Argument {
    fn write_to(&self, w: &mut ByteWriter) {
        match self {
            Argument::Integer(v) => {
                w.write_u8(ARG_INTEGER);
                w.write_u64(*v as u64);
            }
            Argument::Binary(v) => {
                w.write_u8(ARG_BINARY);
                w.write_u32_bytes(v);
            }
            Argument::String(v) => {
                w.write_u8(ARG_STRING);
                w.write_u32_string(v);
            }
            Argument::Boolean(v) => {
                w.write_u8(ARG_BOOLEAN);
                w.write_bool(*v);
            }
            Argument::List(items) => {
                w.write_u8(ARG_LIST);
                w.write_u32(items.len() as u32);
                for item in items {
                    item.write_to(w);
                }
            }
        }
    }

    fn read_from(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        match r.read_u8()? {
            ARG_INTEGER => Ok(Argument::Integer(r.read_i64()?)),
            ARG_BINARY => Ok(Argument::Binary(r.read_u32_bytes()?)),
            ARG_STRING => Ok(Argument::String(r.read_u32_string("string argument")?)),
            ARG_BOOLEAN => Ok(Argument::Boolean(r.read_bool()?)),
            ARG_LIST => {
                let count = r.read_u32()? as usize;
                if count > MAX_INVOKE_ARGUMENTS {
                    return Err(DecodeError::LimitExceeded {
                        entity: "list argument elements",
                        limit: MAX_INVOKE_ARGUMENTS,
                        got: count,
                    });
                }
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(Argument::read_from(r)?);
                }
                Ok(Argument::List(items))
            }
            got => Err(DecodeError::UnknownDiscriminant {
                entity: "argument type",
                got,
            }),
        }
    }

    fn valid(&self) -> Result<(), ValidationError> {
        if let Argument::List(items) = self {
            for item in items {
                // One level of nesting only: lists hold scalars.
                if matches!(item, Argument::List(_)) {
                    return Err(ValidationError::NestedListArgument);
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FunctionCall
// ---------------------------------------------------------------------------

const CALL_DEFAULT: u8 = 0;
const CALL_NAMED: u8 = 1;

/// What to invoke on the target account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FunctionCall {
    /// The account's default entry point, no arguments.
    Default,
    Named {
        name: String,
        args: Vec<Argument>,
    },
}

impl FunctionCall {
    fn write_to(&self, w: &mut ByteWriter) -> Result<(), ValidationError> {
        match self {
            FunctionCall::Default => w.write_u8(CALL_DEFAULT),
            FunctionCall::Named { name, args } => {
                if name.len() > MAX_FUNCTION_NAME_BYTES {
                    return Err(ValidationError::LengthOutOfBounds {
                        field: "function name",
                        len: name.len(),
                        min: 1,
                        max: MAX_FUNCTION_NAME_BYTES,
                    });
                }
                w.write_u8(CALL_NAMED);
                w.write_u8(name.len() as u8);
                w.write_bytes(name.as_bytes());
                w.write_u32(args.len() as u32);
                for arg in args {
                    arg.write_to(w);
                }
            }
        }
        Ok(())
    }

    fn read_from(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        match r.read_u8()? {
            CALL_DEFAULT => Ok(FunctionCall::Default),
            CALL_NAMED => {
                let name_len = r.read_u8()? as usize;
                let name_bytes = r.read_bytes(name_len)?;
                let name = std::str::from_utf8(name_bytes)
                    .map_err(|_| DecodeError::InvalidUtf8("function name"))?
                    .to_string();
                let count = r.read_u32()? as usize;
                if count > MAX_INVOKE_ARGUMENTS {
                    return Err(DecodeError::LimitExceeded {
                        entity: "function arguments",
                        limit: MAX_INVOKE_ARGUMENTS,
                        got: count,
                    });
                }
                let mut args = Vec::with_capacity(count);
                for _ in 0..count {
                    args.push(Argument::read_from(r)?);
                }
                Ok(FunctionCall::Named { name, args })
            }
            got => Err(DecodeError::UnknownDiscriminant {
                entity: "function call flag",
                got,
            }),
        }
    }

    fn valid(&self) -> Result<(), ValidationError> {
        match self {
            FunctionCall::Default => Ok(()),
            FunctionCall::Named { name, args } => {
                if name.is_empty() || name.len() > MAX_FUNCTION_NAME_BYTES {
                    return Err(ValidationError::LengthOutOfBounds {
                        field: "function name",
                        len: name.len(),
                        min: 1,
                        max: MAX_FUNCTION_NAME_BYTES,
                    });
                }
                if args.len() > MAX_INVOKE_ARGUMENTS {
                    return Err(ValidationError::TooMany {
                        field: "function arguments",
                        count: args.len(),
                        max: MAX_INVOKE_ARGUMENTS,
                    });
                }
                for arg in args {
                    arg.valid()?;
                }
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptPayment
// ---------------------------------------------------------------------------

/// A payment attached to an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScriptPayment {
    pub amount: u64,
    pub asset: OptionalAsset,
}

impl ScriptPayment {
    fn write_to(&self, w: &mut ByteWriter) {
        w.write_u64(self.amount);
        self.asset.write_to(w);
    }

    fn read_from(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            amount: r.read_u64()?,
            asset: OptionalAsset::read_from(r)?,
        })
    }
}

// ---------------------------------------------------------------------------
// InvokeScript
// ---------------------------------------------------------------------------

const INVOKE_SCRIPT_VERSION: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InvokeScriptWithProofs {
    pub version: u8,
    pub scheme: Scheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    pub sender_pk: PublicKey,
    /// The script-guarded account being invoked.
    pub script_recipient: Recipient,
    pub call: FunctionCall,
    pub payments: Vec<ScriptPayment>,
    pub fee_asset: OptionalAsset,
    pub fee: u64,
    pub timestamp: u64,
}

impl InvokeScriptWithProofs {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        scheme: Scheme,
        sender_pk: PublicKey,
        script_recipient: Recipient,
        call: FunctionCall,
        payments: Vec<ScriptPayment>,
        fee_asset: OptionalAsset,
        fee: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            version: INVOKE_SCRIPT_VERSION,
            scheme,
            id: None,
            proofs: None,
            sender_pk,
            script_recipient,
            call,
            payments,
            fee_asset,
            fee,
            timestamp,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        expect_marker_type_version(
            &mut r,
            "invoke script transaction",
            TransactionType::InvokeScript,
            INVOKE_SCRIPT_VERSION,
        )?;
        expect_scheme(&mut r, scheme)?;
        let sender_pk = PublicKey::new(r.read_array()?);
        let script_recipient = Recipient::read_from(&mut r)
            .ctx("failed to unmarshal invoke script transaction from bytes")?;
        let call = FunctionCall::read_from(&mut r)
            .ctx("failed to unmarshal function call from bytes")?;
        let count = r.read_u16()? as usize;
        let mut payments = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            payments.push(ScriptPayment::read_from(&mut r)?);
        }
        let fee = r.read_u64()?;
        let fee_asset = OptionalAsset::read_from(&mut r)?;
        let timestamp = r.read_u64()?;
        let proofs = Proofs::read_from(&mut r)
            .ctx("failed to unmarshal invoke script transaction from bytes")?;
        r.expect_end()?;

        let mut tx = Self::new(
            scheme,
            sender_pk,
            script_recipient,
            call,
            payments,
            fee_asset,
            fee,
            timestamp,
        );
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for InvokeScriptWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::InvokeScript
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
        w.write_u8(TransactionType::InvokeScript.to_byte());
        w.write_u8(self.version);
        w.write_u8(scheme);
        w.write_bytes(self.sender_pk.as_bytes());
        self.script_recipient.write_to(&mut w);
        self.call.write_to(&mut w)?;
        w.write_u16(self.payments.len() as u16);
        for payment in &self.payments {
            payment.write_to(&mut w);
        }
        w.write_u64(self.fee);
        self.fee_asset.write_to(&mut w);
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
            .ok_or(CryptoError::MissingProofs("invoke script transaction"))?;
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
                entity: "invoke script transaction",
                expected: scheme,
                got: self.scheme,
            });
        }
        self.call.valid()?;
        self.script_recipient.valid()?;
        for payment in &self.payments {
            check_positive_long("payment amount", payment.amount)?;
        }
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)?;
        // The cap binds the legacy binary form of the transaction.
        let size = match self.body_bytes(scheme) {
            Ok(body) => body.len(),
            Err(Error::Validation(e)) => return Err(e),
            Err(_) => usize::MAX,
        };
        if size > MAX_INVOKE_TX_BYTES {
            return Err(ValidationError::SizeExceeded {
                field: "invoke script transaction",
                size,
                max: MAX_INVOKE_TX_BYTES,
            });
        }
        Ok(())
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("invoke script transaction"))?;
        let mut w = ByteWriter::new();
        w.write_bytes(&self.body_bytes(scheme)?);
        proofs.write_to(&mut w);
        Ok(w.into_vec())
    }
}

// ---------------------------------------------------------------------------
// InvokeExpression
// ---------------------------------------------------------------------------

const INVOKE_EXPRESSION_VERSION: u8 = 1;

/// Evaluates a self-contained expression against the sender's account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InvokeExpressionWithProofs {
    pub version: u8,
    pub scheme: Scheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofs: Option<Proofs>,
    pub sender_pk: PublicKey,
    pub expression: Vec<u8>,
    pub fee_asset: OptionalAsset,
    pub fee: u64,
    pub timestamp: u64,
}

impl InvokeExpressionWithProofs {
    pub fn new(
        scheme: Scheme,
        sender_pk: PublicKey,
        expression: Vec<u8>,
        fee_asset: OptionalAsset,
        fee: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            version: INVOKE_EXPRESSION_VERSION,
            scheme,
            id: None,
            proofs: None,
            sender_pk,
            expression,
            fee_asset,
            fee,
            timestamp,
        }
    }

    pub fn unmarshal_binary(data: &[u8], scheme: Scheme) -> Result<Self, Error> {
        let mut r = ByteReader::new(data);
        expect_marker_type_version(
            &mut r,
            "invoke expression transaction",
            TransactionType::InvokeExpression,
            INVOKE_EXPRESSION_VERSION,
        )?;
        expect_scheme(&mut r, scheme)?;
        let sender_pk = PublicKey::new(r.read_array()?);
        let expression = r.read_u32_bytes()?;
        let fee_asset = OptionalAsset::read_from(&mut r)?;
        let fee = r.read_u64()?;
        let timestamp = r.read_u64()?;
        let proofs = Proofs::read_from(&mut r)
            .ctx("failed to unmarshal invoke expression transaction from bytes")?;
        r.expect_end()?;

        let mut tx = Self::new(scheme, sender_pk, expression, fee_asset, fee, timestamp);
        tx.proofs = Some(proofs);
        tx.generate_id(scheme)?;
        Ok(tx)
    }
}

impl Transactional for InvokeExpressionWithProofs {
    fn tx_type(&self) -> TransactionType {
        TransactionType::InvokeExpression
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
        w.write_u8(TransactionType::InvokeExpression.to_byte());
        w.write_u8(self.version);
        w.write_u8(scheme);
        w.write_bytes(self.sender_pk.as_bytes());
        w.write_u32_bytes(&self.expression);
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
            .ok_or(CryptoError::MissingProofs("invoke expression transaction"))?;
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
                entity: "invoke expression transaction",
                expected: scheme,
                got: self.scheme,
            });
        }
        if self.expression.is_empty() {
            return Err(ValidationError::LengthOutOfBounds {
                field: "expression",
                len: 0,
                min: 1,
                max: u32::MAX as usize,
            });
        }
        check_positive_long("fee", self.fee)?;
        check_long("timestamp", self.timestamp)
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        let proofs = self
            .proofs
            .as_ref()
            .ok_or(CryptoError::MissingProofs("invoke expression transaction"))?;
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

    fn dapp() -> Recipient {
        Recipient::from(Address::from_public_key(
            TESTNET_SCHEME,
            &Keypair::from_seed(&[31u8; 32]).public_key(),
        ))
    }

    fn named_call() -> FunctionCall {
        FunctionCall::Named {
            name: "deposit".to_string(),
            args: vec![
                Argument::Integer(42),
                Argument::String("hello".to_string()),
                Argument::Boolean(true),
                Argument::Binary(vec![1, 2, 3]),
                Argument::List(vec![Argument::Integer(1), Argument::Integer(2)]),
            ],
        }
    }

    fn sample(kp: &Keypair) -> InvokeScriptWithProofs {
        InvokeScriptWithProofs::new(
            TESTNET_SCHEME,
            kp.public_key(),
            dapp(),
            named_call(),
            vec![ScriptPayment {
                amount: 100,
                asset: OptionalAsset::native(),
            }],
            OptionalAsset::native(),
            500_000,
            1_534_264_221_000,
        )
    }

    #[test]
    fn invoke_script_roundtrip() {
        let kp = Keypair::generate();
        let mut tx = sample(&kp);
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        assert!(tx.verify(TESTNET_SCHEME, &kp.public_key()).unwrap());
        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        let back = InvokeScriptWithProofs::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn default_call_to_alias_roundtrip() {
        let kp = Keypair::generate();
        let mut tx = sample(&kp);
        tx.script_recipient = Recipient::from(Alias::new(TESTNET_SCHEME, "dapp-alias"));
        tx.call = FunctionCall::Default;
        tx.payments.clear();
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        assert_eq!(
            InvokeScriptWithProofs::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap(),
            tx
        );
    }

    #[test]
    fn argument_count_cap() {
        let kp = Keypair::generate();
        let mut tx = sample(&kp);
        tx.call = FunctionCall::Named {
            name: "f".to_string(),
            args: vec![Argument::Integer(0); 23],
        };
        assert!(matches!(
            tx.validate(TESTNET_SCHEME),
            Err(ValidationError::TooMany { field: "function arguments", count: 23, .. })
        ));

        tx.call = FunctionCall::Named {
            name: "f".to_string(),
            args: vec![Argument::Integer(0); 22],
        };
        assert!(tx.validate(TESTNET_SCHEME).is_ok());
    }

    #[test]
    fn function_name_length_cap() {
        let kp = Keypair::generate();
        let mut tx = sample(&kp);
        tx.call = FunctionCall::Named {
            name: "n".repeat(256),
            args: Vec::new(),
        };
        assert!(matches!(
            tx.validate(TESTNET_SCHEME),
            Err(ValidationError::LengthOutOfBounds { field: "function name", len: 256, .. })
        ));
        // Marshalling is equally refused; a u8 prefix cannot carry it.
        assert!(tx.body_bytes(TESTNET_SCHEME).is_err());
    }

    #[test]
    fn zero_payment_rejected() {
        let kp = Keypair::generate();
        let mut tx = sample(&kp);
        tx.payments = vec![ScriptPayment {
            amount: 0,
            asset: OptionalAsset::native(),
        }];
        assert!(matches!(
            tx.validate(TESTNET_SCHEME),
            Err(ValidationError::NonPositive { field: "payment amount" })
        ));
    }

    #[test]
    fn oversized_legacy_binary_rejected() {
        let kp = Keypair::generate();
        let mut tx = sample(&kp);
        tx.call = FunctionCall::Named {
            name: "f".to_string(),
            args: vec![Argument::Binary(vec![0u8; 6 * 1024])],
        };
        assert!(matches!(
            tx.validate(TESTNET_SCHEME),
            Err(ValidationError::SizeExceeded { field: "invoke script transaction", .. })
        ));
    }

    #[test]
    fn nested_lists_rejected() {
        let kp = Keypair::generate();
        let mut tx = sample(&kp);
        tx.call = FunctionCall::Named {
            name: "f".to_string(),
            args: vec![Argument::List(vec![Argument::List(vec![])])],
        };
        assert!(tx.validate(TESTNET_SCHEME).is_err());
    }

    #[test]
    fn invoke_expression_roundtrip() {
        let kp = Keypair::generate();
        let mut tx = InvokeExpressionWithProofs::new(
            TESTNET_SCHEME,
            kp.public_key(),
            vec![0x01, 0x02, 0x03, 0x04],
            OptionalAsset::native(),
            500_000,
            1_600_000_000_000,
        );
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        let back = InvokeExpressionWithProofs::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap();
        assert_eq!(back, tx);
        assert!(back.verify(TESTNET_SCHEME, &kp.public_key()).unwrap());
    }

    #[test]
    fn empty_expression_rejected() {
        let kp = Keypair::generate();
        let tx = InvokeExpressionWithProofs::new(
            TESTNET_SCHEME,
            kp.public_key(),
            Vec::new(),
            OptionalAsset::native(),
            500_000,
            1,
        );
        assert!(matches!(
            tx.validate(TESTNET_SCHEME),
            Err(ValidationError::LengthOutOfBounds { field: "expression", .. })
        ));
    }

    #[test]
    fn truncation_never_panics() {
        let kp = Keypair::generate();
        let mut tx = sample(&kp);
        tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
        let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
        for cut in 0..bytes.len() {
            assert!(InvokeScriptWithProofs::unmarshal_binary(&bytes[..cut], TESTNET_SCHEME).is_err());
        }
    }
}
