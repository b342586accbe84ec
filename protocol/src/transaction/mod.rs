//! # Transaction Module
//!
//! Binary codecs, authentication, and identifier derivation for every
//! transaction shape on the network.
//!
//! ## Architecture
//!
//! ```text
//! fields.rs        - Shared field types (OptionalAsset, Attachment) and numeric checks
//! proofs.rs        - Multi-proof authentication list and its codec
//! genesis.rs       - Genesis and Payment (legacy-only shapes)
//! transfer.rs      - Transfer across both generations
//! issue.rs         - Asset issue across both generations
//! asset.rs         - Reissue, Burn, Sponsorship, UpdateAssetInfo
//! lease.rs         - Lease and LeaseCancel
//! create_alias.rs  - Alias registration
//! order.rs         - Exchange orders (versions 1..3)
//! exchange.rs      - Order settlement transactions
//! mass_transfer.rs - Batched transfers
//! data.rs          - Account data entries
//! script.rs        - SetScript and SetAssetScript
//! invoke.rs        - Script invocation and expression evaluation
//! ethereum.rs      - Foreign-format transactions, recognized but opaque
//! envelope.rs      - Leading-byte dispatch over all of the above
//! canonical.rs     - Neutral structs mirroring the external protobuf schema
//! ```
//!
//! ## Lifecycle
//!
//! A transaction is built unsigned (`id` and authentication both absent),
//! then [`Transactional::sign`] marshals the canonical body, signs it, and
//! caches the identifier. Decoding runs the same steps in reverse and ends
//! by recomputing the identifier; wire formats never carry one.

pub mod asset;
pub mod canonical;
pub mod create_alias;
pub mod data;
pub mod envelope;
pub mod ethereum;
pub mod exchange;
pub mod fields;
pub mod genesis;
pub mod invoke;
pub mod issue;
pub mod lease;
pub mod mass_transfer;
pub mod order;
pub mod proofs;
pub mod script;
pub mod transfer;

use crate::config::Scheme;
use crate::crypto::{Digest, PublicKey, SecretKey};
use crate::error::{DecodeError, Error, ValidationError};

pub use asset::{
    Burn, BurnWithProofs, BurnWithSig, Reissue, ReissueWithProofs, ReissueWithSig,
    SponsorshipWithProofs, UpdateAssetInfoWithProofs,
};
pub use canonical::{CanonicalConvert, CanonicalPayload, CanonicalTransaction};
pub use create_alias::{CreateAlias, CreateAliasWithProofs, CreateAliasWithSig};
pub use data::{DataEntry, DataWithProofs};
pub use envelope::bytes_to_transaction;
pub use ethereum::EthereumTransaction;
pub use exchange::{Exchange, ExchangeWithProofs, ExchangeWithSig};
pub use fields::{is_valid_long, AssetId, Attachment, OptionalAsset};
pub use genesis::{Genesis, Payment};
pub use invoke::{
    Argument, FunctionCall, InvokeExpressionWithProofs, InvokeScriptWithProofs, ScriptPayment,
};
pub use issue::{Issue, IssueWithProofs, IssueWithSig};
pub use lease::{Lease, LeaseCancel, LeaseCancelWithProofs, LeaseCancelWithSig, LeaseWithProofs,
    LeaseWithSig};
pub use mass_transfer::{MassTransferEntry, MassTransferWithProofs};
pub use order::{AssetPair, Order, OrderType};
pub use proofs::Proofs;
pub use script::{SetAssetScriptWithProofs, SetScriptWithProofs};
pub use transfer::{Transfer, TransferWithProofs, TransferWithSig};

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// Discriminant for the operation a transaction represents. The value is
/// the leading type byte of the binary envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum TransactionType {
    Genesis = 1,
    Payment = 2,
    Issue = 3,
    Transfer = 4,
    Reissue = 5,
    Burn = 6,
    Exchange = 7,
    Lease = 8,
    LeaseCancel = 9,
    CreateAlias = 10,
    MassTransfer = 11,
    Data = 12,
    SetScript = 13,
    Sponsorship = 14,
    SetAssetScript = 15,
    InvokeScript = 16,
    UpdateAssetInfo = 17,
    Ethereum = 18,
    InvokeExpression = 19,
}

impl TransactionType {
    pub fn from_byte(b: u8) -> Result<Self, DecodeError> {
        match b {
            1 => Ok(Self::Genesis),
            2 => Ok(Self::Payment),
            3 => Ok(Self::Issue),
            4 => Ok(Self::Transfer),
            5 => Ok(Self::Reissue),
            6 => Ok(Self::Burn),
            7 => Ok(Self::Exchange),
            8 => Ok(Self::Lease),
            9 => Ok(Self::LeaseCancel),
            10 => Ok(Self::CreateAlias),
            11 => Ok(Self::MassTransfer),
            12 => Ok(Self::Data),
            13 => Ok(Self::SetScript),
            14 => Ok(Self::Sponsorship),
            15 => Ok(Self::SetAssetScript),
            16 => Ok(Self::InvokeScript),
            17 => Ok(Self::UpdateAssetInfo),
            18 => Ok(Self::Ethereum),
            19 => Ok(Self::InvokeExpression),
            other => Err(DecodeError::UnknownTransactionType(other)),
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

// ---------------------------------------------------------------------------
// Transactional
// ---------------------------------------------------------------------------

/// Capabilities shared by every transaction variant.
///
/// Shapes are plain data aggregates; this trait is the only cross-cutting
/// surface. `body_bytes` is the exact input to signing, verification, and
/// identifier derivation, so it must be a pure function of the field values
/// and the scheme.
pub trait Transactional {
    fn tx_type(&self) -> TransactionType;

    fn version(&self) -> u8;

    /// The cached identifier, absent until signing, decoding, or
    /// [`Transactional::generate_id`] populates it. Written at most once.
    fn id(&self) -> Option<&Digest>;

    /// Canonical body bytes: everything that is signed, nothing that signs.
    fn body_bytes(&self, scheme: Scheme) -> Result<Vec<u8>, Error>;

    /// Marshals the body, signs it, attaches the authentication material,
    /// and caches the identifier.
    fn sign(&mut self, scheme: Scheme, secret_key: &SecretKey) -> Result<(), Error>;

    /// Recomputes the body and checks the attached authentication against
    /// `public_key`. `Ok(false)` means a well-formed but wrong signature;
    /// errors are reserved for absent or malformed material.
    fn verify(&self, scheme: Scheme, public_key: &PublicKey) -> Result<bool, Error>;

    /// Populates the identifier if absent; a no-op when already set.
    fn generate_id(&mut self, scheme: Scheme) -> Result<(), Error>;

    /// Self-contained field constraints. A transaction can decode cleanly
    /// and still fail here.
    fn validate(&self, scheme: Scheme) -> Result<(), ValidationError>;

    /// The full wire form including authentication material.
    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error>;
}

/// Hashes canonical body bytes into a transaction identifier.
pub(crate) fn body_digest(body: &[u8]) -> Digest {
    Digest::new(crate::crypto::fast_hash(body))
}

/// Consumes and checks the modern-envelope header: zero marker, type byte,
/// exact version.
pub(crate) fn expect_marker_type_version(
    r: &mut crate::codec::ByteReader<'_>,
    entity: &'static str,
    tx_type: TransactionType,
    version: u8,
) -> Result<(), DecodeError> {
    let marker = r.read_u8()?;
    if marker != 0 {
        return Err(DecodeError::UnknownDiscriminant {
            entity: "modern envelope marker",
            got: marker,
        });
    }
    let type_byte = r.read_u8()?;
    if type_byte != tx_type.to_byte() {
        return Err(DecodeError::Malformed {
            entity,
            reason: format!("unexpected type byte {type_byte}"),
        });
    }
    let got = r.read_u8()?;
    if got != version {
        return Err(DecodeError::UnsupportedVersion { entity, got });
    }
    Ok(())
}

/// Consumes the embedded scheme byte and checks it against the caller's.
pub(crate) fn expect_scheme(
    r: &mut crate::codec::ByteReader<'_>,
    scheme: Scheme,
) -> Result<(), DecodeError> {
    let embedded = r.read_u8()?;
    if embedded != scheme {
        return Err(DecodeError::SchemeMismatch {
            expected: scheme,
            got: embedded,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// Any transaction the envelope dispatcher can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Transaction {
    Genesis(Genesis),
    Payment(Payment),
    IssueV1(IssueWithSig),
    IssueV2(IssueWithProofs),
    TransferV1(TransferWithSig),
    TransferV2(TransferWithProofs),
    ReissueV1(ReissueWithSig),
    ReissueV2(ReissueWithProofs),
    BurnV1(BurnWithSig),
    BurnV2(BurnWithProofs),
    ExchangeV1(ExchangeWithSig),
    ExchangeV2(ExchangeWithProofs),
    LeaseV1(LeaseWithSig),
    LeaseV2(LeaseWithProofs),
    LeaseCancelV1(LeaseCancelWithSig),
    LeaseCancelV2(LeaseCancelWithProofs),
    CreateAliasV1(CreateAliasWithSig),
    CreateAliasV2(CreateAliasWithProofs),
    MassTransfer(MassTransferWithProofs),
    Data(DataWithProofs),
    SetScript(SetScriptWithProofs),
    Sponsorship(SponsorshipWithProofs),
    SetAssetScript(SetAssetScriptWithProofs),
    InvokeScript(InvokeScriptWithProofs),
    UpdateAssetInfo(UpdateAssetInfoWithProofs),
    InvokeExpression(InvokeExpressionWithProofs),
    Ethereum(EthereumTransaction),
}

macro_rules! with_inner {
    ($value:expr, $tx:ident => $expr:expr) => {
        match $value {
            Transaction::Genesis($tx) => $expr,
            Transaction::Payment($tx) => $expr,
            Transaction::IssueV1($tx) => $expr,
            Transaction::IssueV2($tx) => $expr,
            Transaction::TransferV1($tx) => $expr,
            Transaction::TransferV2($tx) => $expr,
            Transaction::ReissueV1($tx) => $expr,
            Transaction::ReissueV2($tx) => $expr,
            Transaction::BurnV1($tx) => $expr,
            Transaction::BurnV2($tx) => $expr,
            Transaction::ExchangeV1($tx) => $expr,
            Transaction::ExchangeV2($tx) => $expr,
            Transaction::LeaseV1($tx) => $expr,
            Transaction::LeaseV2($tx) => $expr,
            Transaction::LeaseCancelV1($tx) => $expr,
            Transaction::LeaseCancelV2($tx) => $expr,
            Transaction::CreateAliasV1($tx) => $expr,
            Transaction::CreateAliasV2($tx) => $expr,
            Transaction::MassTransfer($tx) => $expr,
            Transaction::Data($tx) => $expr,
            Transaction::SetScript($tx) => $expr,
            Transaction::Sponsorship($tx) => $expr,
            Transaction::SetAssetScript($tx) => $expr,
            Transaction::InvokeScript($tx) => $expr,
            Transaction::UpdateAssetInfo($tx) => $expr,
            Transaction::InvokeExpression($tx) => $expr,
            Transaction::Ethereum($tx) => $expr,
        }
    };
}

impl Transactional for Transaction {
    fn tx_type(&self) -> TransactionType {
        with_inner!(self, tx => tx.tx_type())
    }

    fn version(&self) -> u8 {
        with_inner!(self, tx => tx.version())
    }

    fn id(&self) -> Option<&Digest> {
        with_inner!(self, tx => tx.id())
    }

    fn body_bytes(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        with_inner!(self, tx => tx.body_bytes(scheme))
    }

    fn sign(&mut self, scheme: Scheme, secret_key: &SecretKey) -> Result<(), Error> {
        with_inner!(self, tx => tx.sign(scheme, secret_key))
    }

    fn verify(&self, scheme: Scheme, public_key: &PublicKey) -> Result<bool, Error> {
        with_inner!(self, tx => tx.verify(scheme, public_key))
    }

    fn generate_id(&mut self, scheme: Scheme) -> Result<(), Error> {
        with_inner!(self, tx => tx.generate_id(scheme))
    }

    fn validate(&self, scheme: Scheme) -> Result<(), ValidationError> {
        with_inner!(self, tx => tx.validate(scheme))
    }

    fn marshal_binary(&self, scheme: Scheme) -> Result<Vec<u8>, Error> {
        with_inner!(self, tx => tx.marshal_binary(scheme))
    }
}
