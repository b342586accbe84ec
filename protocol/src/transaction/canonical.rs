//! Neutral data structs mirroring the external protobuf transaction
//! schema, field for field.
//!
//! The gRPC transport serializes these with its own library; this crate
//! only guarantees the mapping. Round-tripping a transaction through
//! [`Transaction::to_canonical`] and [`Transaction::from_canonical`] and
//! then through the canonical binary codec yields a field-for-field
//! identical transaction, except for quirks the canonical schema does not
//! carry (legacy identifier derivation is recomputed, never transported).
//!
//! The authentication view here is always proofs-shaped: a legacy
//! signature crosses the boundary as a one-element proofs list.

use crate::config::Scheme;
use crate::crypto::{Digest, PublicKey, Signature};
use crate::error::{CryptoError, DecodeError, Error, ValidationError};
use crate::identity::{Address, Alias, Recipient};
use crate::transaction::fields::{AssetId, Attachment, OptionalAsset};
use crate::transaction::order::Order;
use crate::transaction::proofs::Proofs;
use crate::transaction::{
    Burn, BurnWithProofs, BurnWithSig, CreateAlias, CreateAliasWithProofs, CreateAliasWithSig,
    DataEntry, DataWithProofs, Exchange, ExchangeWithProofs, ExchangeWithSig, FunctionCall,
    Genesis, InvokeExpressionWithProofs, InvokeScriptWithProofs, Issue, IssueWithProofs,
    IssueWithSig, Lease, LeaseCancel, LeaseCancelWithProofs, LeaseCancelWithSig, LeaseWithProofs,
    LeaseWithSig, MassTransferEntry, MassTransferWithProofs, Payment, Reissue, ReissueWithProofs,
    ReissueWithSig, ScriptPayment, SetAssetScriptWithProofs, SetScriptWithProofs, Transaction,
    Transactional, TransactionType, Transfer, TransferWithProofs, TransferWithSig,
    UpdateAssetInfoWithProofs,
};

/// The per-shape payload of the canonical schema.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CanonicalPayload {
    Genesis {
        recipient: Address,
        amount: u64,
    },
    Payment {
        recipient: Address,
        amount: u64,
    },
    Issue {
        name: String,
        description: String,
        quantity: u64,
        decimals: u8,
        reissuable: bool,
        script: Option<Vec<u8>>,
    },
    Transfer {
        recipient: Recipient,
        amount_asset: OptionalAsset,
        amount: u64,
        attachment: Attachment,
    },
    Reissue {
        asset_id: AssetId,
        quantity: u64,
        reissuable: bool,
    },
    Burn {
        asset_id: AssetId,
        amount: u64,
    },
    Exchange {
        buy_order: Order,
        sell_order: Order,
        price: u64,
        amount: u64,
        buy_matcher_fee: u64,
        sell_matcher_fee: u64,
    },
    Lease {
        recipient: Recipient,
        amount: u64,
    },
    LeaseCancel {
        lease_id: Digest,
    },
    CreateAlias {
        alias: Alias,
    },
    MassTransfer {
        asset: OptionalAsset,
        transfers: Vec<MassTransferEntry>,
        attachment: Attachment,
    },
    Data {
        entries: Vec<DataEntry>,
    },
    SetScript {
        script: Option<Vec<u8>>,
    },
    Sponsorship {
        asset_id: AssetId,
        min_asset_fee: u64,
    },
    SetAssetScript {
        asset_id: AssetId,
        script: Option<Vec<u8>>,
    },
    InvokeScript {
        dapp: Recipient,
        call: FunctionCall,
        payments: Vec<ScriptPayment>,
    },
    UpdateAssetInfo {
        asset_id: AssetId,
        name: String,
        description: String,
    },
    InvokeExpression {
        expression: Vec<u8>,
    },
}

/// One transaction in the canonical schema's shape.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanonicalTransaction {
    pub scheme: Scheme,
    pub tx_type: TransactionType,
    pub version: u8,
    /// Absent only for genesis allocations, which no key ever signed.
    pub sender_pk: Option<PublicKey>,
    pub fee: u64,
    pub fee_asset: OptionalAsset,
    pub timestamp: u64,
    /// Unified authentication view; legacy signatures appear as a
    /// one-element list.
    pub proofs: Proofs,
    pub payload: CanonicalPayload,
}

/// Conversion between a concrete transaction and the canonical schema.
pub trait CanonicalConvert: Sized {
    fn to_canonical(&self, scheme: Scheme) -> Result<CanonicalTransaction, Error>;
    fn from_canonical(canonical: &CanonicalTransaction) -> Result<Self, Error>;
}

fn signature_as_proofs(signature: Option<Signature>, entity: &'static str) -> Result<Proofs, Error> {
    let signature = signature.ok_or(CryptoError::MissingSignature(entity))?;
    Ok(Proofs::from(signature))
}

fn proofs_as_signature(proofs: &Proofs) -> Result<Signature, Error> {
    let first = proofs.proofs.first().ok_or(CryptoError::EmptyProofs)?;
    Signature::from_slice(first)
        .map_err(|e| CryptoError::MalformedSignature(e.to_string()).into())
}

fn attached_proofs(proofs: &Option<Proofs>, entity: &'static str) -> Result<Proofs, Error> {
    proofs
        .clone()
        .ok_or_else(|| CryptoError::MissingProofs(entity).into())
}

fn payload_mismatch(tx_type: TransactionType) -> Error {
    DecodeError::Malformed {
        entity: "canonical transaction",
        reason: format!("payload does not match type byte {}", tx_type.to_byte()),
    }
    .into()
}

impl CanonicalConvert for Transaction {
    fn to_canonical(&self, scheme: Scheme) -> Result<CanonicalTransaction, Error> {
        let (sender_pk, fee, fee_asset, timestamp, proofs, payload) = match self {
            Transaction::Genesis(tx) => (
                None,
                0,
                OptionalAsset::native(),
                tx.timestamp,
                signature_as_proofs(tx.signature, "genesis transaction")?,
                CanonicalPayload::Genesis {
                    recipient: tx.recipient,
                    amount: tx.amount,
                },
            ),
            Transaction::Payment(tx) => (
                Some(tx.sender_pk),
                tx.fee,
                OptionalAsset::native(),
                tx.timestamp,
                signature_as_proofs(tx.signature, "payment transaction")?,
                CanonicalPayload::Payment {
                    recipient: tx.recipient,
                    amount: tx.amount,
                },
            ),
            Transaction::IssueV1(tx) => (
                Some(tx.issue.sender_pk),
                tx.issue.fee,
                OptionalAsset::native(),
                tx.issue.timestamp,
                signature_as_proofs(tx.signature, "issue transaction")?,
                issue_payload(&tx.issue, None),
            ),
            Transaction::IssueV2(tx) => (
                Some(tx.issue.sender_pk),
                tx.issue.fee,
                OptionalAsset::native(),
                tx.issue.timestamp,
                attached_proofs(&tx.proofs, "issue transaction")?,
                issue_payload(&tx.issue, tx.script.clone()),
            ),
            Transaction::TransferV1(tx) => (
                Some(tx.transfer.sender_pk),
                tx.transfer.fee,
                tx.transfer.fee_asset,
                tx.transfer.timestamp,
                signature_as_proofs(tx.signature, "transfer transaction")?,
                transfer_payload(&tx.transfer),
            ),
            Transaction::TransferV2(tx) => (
                Some(tx.transfer.sender_pk),
                tx.transfer.fee,
                tx.transfer.fee_asset,
                tx.transfer.timestamp,
                attached_proofs(&tx.proofs, "transfer transaction")?,
                transfer_payload(&tx.transfer),
            ),
            Transaction::ReissueV1(tx) => (
                Some(tx.reissue.sender_pk),
                tx.reissue.fee,
                OptionalAsset::native(),
                tx.reissue.timestamp,
                signature_as_proofs(tx.signature, "reissue transaction")?,
                reissue_payload(&tx.reissue),
            ),
            Transaction::ReissueV2(tx) => (
                Some(tx.reissue.sender_pk),
                tx.reissue.fee,
                OptionalAsset::native(),
                tx.reissue.timestamp,
                attached_proofs(&tx.proofs, "reissue transaction")?,
                reissue_payload(&tx.reissue),
            ),
            Transaction::BurnV1(tx) => (
                Some(tx.burn.sender_pk),
                tx.burn.fee,
                OptionalAsset::native(),
                tx.burn.timestamp,
                signature_as_proofs(tx.signature, "burn transaction")?,
                burn_payload(&tx.burn),
            ),
            Transaction::BurnV2(tx) => (
                Some(tx.burn.sender_pk),
                tx.burn.fee,
                OptionalAsset::native(),
                tx.burn.timestamp,
                attached_proofs(&tx.proofs, "burn transaction")?,
                burn_payload(&tx.burn),
            ),
            Transaction::ExchangeV1(tx) => (
                Some(tx.exchange.sender_pk),
                tx.exchange.fee,
                OptionalAsset::native(),
                tx.exchange.timestamp,
                signature_as_proofs(tx.signature, "exchange transaction")?,
                exchange_payload(&tx.exchange),
            ),
            Transaction::ExchangeV2(tx) => (
                Some(tx.exchange.sender_pk),
                tx.exchange.fee,
                OptionalAsset::native(),
                tx.exchange.timestamp,
                attached_proofs(&tx.proofs, "exchange transaction")?,
                exchange_payload(&tx.exchange),
            ),
            Transaction::LeaseV1(tx) => (
                Some(tx.lease.sender_pk),
                tx.lease.fee,
                OptionalAsset::native(),
                tx.lease.timestamp,
                signature_as_proofs(tx.signature, "lease transaction")?,
                lease_payload(&tx.lease),
            ),
            Transaction::LeaseV2(tx) => (
                Some(tx.lease.sender_pk),
                tx.lease.fee,
                OptionalAsset::native(),
                tx.lease.timestamp,
                attached_proofs(&tx.proofs, "lease transaction")?,
                lease_payload(&tx.lease),
            ),
            Transaction::LeaseCancelV1(tx) => (
                Some(tx.lease_cancel.sender_pk),
                tx.lease_cancel.fee,
                OptionalAsset::native(),
                tx.lease_cancel.timestamp,
                signature_as_proofs(tx.signature, "lease cancel transaction")?,
                CanonicalPayload::LeaseCancel {
                    lease_id: tx.lease_cancel.lease_id,
                },
            ),
            Transaction::LeaseCancelV2(tx) => (
                Some(tx.lease_cancel.sender_pk),
                tx.lease_cancel.fee,
                OptionalAsset::native(),
                tx.lease_cancel.timestamp,
                attached_proofs(&tx.proofs, "lease cancel transaction")?,
                CanonicalPayload::LeaseCancel {
                    lease_id: tx.lease_cancel.lease_id,
                },
            ),
            Transaction::CreateAliasV1(tx) => (
                Some(tx.create_alias.sender_pk),
                tx.create_alias.fee,
                OptionalAsset::native(),
                tx.create_alias.timestamp,
                signature_as_proofs(tx.signature, "create alias transaction")?,
                CanonicalPayload::CreateAlias {
                    alias: tx.create_alias.alias.clone(),
                },
            ),
            Transaction::CreateAliasV2(tx) => (
                Some(tx.create_alias.sender_pk),
                tx.create_alias.fee,
                OptionalAsset::native(),
                tx.create_alias.timestamp,
                attached_proofs(&tx.proofs, "create alias transaction")?,
                CanonicalPayload::CreateAlias {
                    alias: tx.create_alias.alias.clone(),
                },
            ),
            Transaction::MassTransfer(tx) => (
                Some(tx.sender_pk),
                tx.fee,
                OptionalAsset::native(),
                tx.timestamp,
                attached_proofs(&tx.proofs, "mass transfer transaction")?,
                CanonicalPayload::MassTransfer {
                    asset: tx.asset,
                    transfers: tx.transfers.clone(),
                    attachment: tx.attachment.clone(),
                },
            ),
            Transaction::Data(tx) => (
                Some(tx.sender_pk),
                tx.fee,
                OptionalAsset::native(),
                tx.timestamp,
                attached_proofs(&tx.proofs, "data transaction")?,
                CanonicalPayload::Data {
                    entries: tx.entries.clone(),
                },
            ),
            Transaction::SetScript(tx) => (
                Some(tx.sender_pk),
                tx.fee,
                OptionalAsset::native(),
                tx.timestamp,
                attached_proofs(&tx.proofs, "set script transaction")?,
                CanonicalPayload::SetScript {
                    script: tx.script.clone(),
                },
            ),
            Transaction::Sponsorship(tx) => (
                Some(tx.sender_pk),
                tx.fee,
                OptionalAsset::native(),
                tx.timestamp,
                attached_proofs(&tx.proofs, "sponsorship transaction")?,
                CanonicalPayload::Sponsorship {
                    asset_id: tx.asset_id,
                    min_asset_fee: tx.min_asset_fee,
                },
            ),
            Transaction::SetAssetScript(tx) => (
                Some(tx.sender_pk),
                tx.fee,
                OptionalAsset::native(),
                tx.timestamp,
                attached_proofs(&tx.proofs, "set asset script transaction")?,
                CanonicalPayload::SetAssetScript {
                    asset_id: tx.asset_id,
                    script: tx.script.clone(),
                },
            ),
            Transaction::InvokeScript(tx) => (
                Some(tx.sender_pk),
                tx.fee,
                tx.fee_asset,
                tx.timestamp,
                attached_proofs(&tx.proofs, "invoke script transaction")?,
                CanonicalPayload::InvokeScript {
                    dapp: tx.script_recipient.clone(),
                    call: tx.call.clone(),
                    payments: tx.payments.clone(),
                },
            ),
            Transaction::UpdateAssetInfo(tx) => (
                Some(tx.sender_pk),
                tx.fee,
                tx.fee_asset,
                tx.timestamp,
                attached_proofs(&tx.proofs, "update asset info transaction")?,
                CanonicalPayload::UpdateAssetInfo {
                    asset_id: tx.asset_id,
                    name: tx.name.clone(),
                    description: tx.description.clone(),
                },
            ),
            Transaction::InvokeExpression(tx) => (
                Some(tx.sender_pk),
                tx.fee,
                tx.fee_asset,
                tx.timestamp,
                attached_proofs(&tx.proofs, "invoke expression transaction")?,
                CanonicalPayload::InvokeExpression {
                    expression: tx.expression.clone(),
                },
            ),
            Transaction::Ethereum(_) => {
                return Err(CryptoError::Unsupported("ethereum transaction").into())
            }
        };
        Ok(CanonicalTransaction {
            scheme,
            tx_type: self.tx_type(),
            version: self.version(),
            sender_pk,
            fee,
            fee_asset,
            timestamp,
            proofs,
            payload,
        })
    }

    fn from_canonical(c: &CanonicalTransaction) -> Result<Self, Error> {
        let scheme = c.scheme;
        let sender = |entity: &'static str| -> Result<PublicKey, Error> {
            c.sender_pk
                .ok_or_else(|| CryptoError::MissingSignature(entity).into())
        };

        let mut tx = match (c.tx_type, &c.payload) {
            (TransactionType::Genesis, CanonicalPayload::Genesis { recipient, amount }) => {
                Transaction::Genesis(Genesis::new(c.timestamp, *recipient, *amount))
            }
            (TransactionType::Payment, CanonicalPayload::Payment { recipient, amount }) => {
                let mut tx = Payment::new(
                    sender("payment transaction")?,
                    *recipient,
                    *amount,
                    c.fee,
                    c.timestamp,
                );
                tx.signature = Some(proofs_as_signature(&c.proofs)?);
                Transaction::Payment(tx)
            }
            (
                TransactionType::Issue,
                CanonicalPayload::Issue {
                    name,
                    description,
                    quantity,
                    decimals,
                    reissuable,
                    script,
                },
            ) => {
                let issue = Issue {
                    sender_pk: sender("issue transaction")?,
                    name: name.clone(),
                    description: description.clone(),
                    quantity: *quantity,
                    decimals: *decimals,
                    reissuable: *reissuable,
                    fee: c.fee,
                    timestamp: c.timestamp,
                };
                if c.version == 1 {
                    let mut tx = IssueWithSig::new(issue);
                    tx.signature = Some(proofs_as_signature(&c.proofs)?);
                    Transaction::IssueV1(tx)
                } else {
                    let mut tx = IssueWithProofs::new(scheme, issue);
                    tx.script = script.clone();
                    tx.proofs = Some(c.proofs.clone());
                    Transaction::IssueV2(tx)
                }
            }
            (
                TransactionType::Transfer,
                CanonicalPayload::Transfer {
                    recipient,
                    amount_asset,
                    amount,
                    attachment,
                },
            ) => {
                let transfer = Transfer {
                    sender_pk: sender("transfer transaction")?,
                    amount_asset: *amount_asset,
                    fee_asset: c.fee_asset,
                    timestamp: c.timestamp,
                    amount: *amount,
                    fee: c.fee,
                    recipient: recipient.clone(),
                    attachment: attachment.clone(),
                };
                if c.version == 1 {
                    let mut tx = TransferWithSig::new(transfer);
                    tx.signature = Some(proofs_as_signature(&c.proofs)?);
                    Transaction::TransferV1(tx)
                } else {
                    let mut tx = TransferWithProofs::new(c.version, transfer);
                    tx.proofs = Some(c.proofs.clone());
                    Transaction::TransferV2(tx)
                }
            }
            (
                TransactionType::Reissue,
                CanonicalPayload::Reissue {
                    asset_id,
                    quantity,
                    reissuable,
                },
            ) => {
                let reissue = Reissue {
                    sender_pk: sender("reissue transaction")?,
                    asset_id: *asset_id,
                    quantity: *quantity,
                    reissuable: *reissuable,
                    fee: c.fee,
                    timestamp: c.timestamp,
                };
                if c.version == 1 {
                    let mut tx = ReissueWithSig::new(reissue);
                    tx.signature = Some(proofs_as_signature(&c.proofs)?);
                    Transaction::ReissueV1(tx)
                } else {
                    let mut tx = ReissueWithProofs::new(scheme, reissue);
                    tx.proofs = Some(c.proofs.clone());
                    Transaction::ReissueV2(tx)
                }
            }
            (TransactionType::Burn, CanonicalPayload::Burn { asset_id, amount }) => {
                let burn = Burn {
                    sender_pk: sender("burn transaction")?,
                    asset_id: *asset_id,
                    amount: *amount,
                    fee: c.fee,
                    timestamp: c.timestamp,
                };
                if c.version == 1 {
                    let mut tx = BurnWithSig::new(burn);
                    tx.signature = Some(proofs_as_signature(&c.proofs)?);
                    Transaction::BurnV1(tx)
                } else {
                    let mut tx = BurnWithProofs::new(scheme, burn);
                    tx.proofs = Some(c.proofs.clone());
                    Transaction::BurnV2(tx)
                }
            }
            (
                TransactionType::Exchange,
                CanonicalPayload::Exchange {
                    buy_order,
                    sell_order,
                    price,
                    amount,
                    buy_matcher_fee,
                    sell_matcher_fee,
                },
            ) => {
                let exchange = Exchange {
                    sender_pk: sender("exchange transaction")?,
                    buy_order: buy_order.clone(),
                    sell_order: sell_order.clone(),
                    price: *price,
                    amount: *amount,
                    buy_matcher_fee: *buy_matcher_fee,
                    sell_matcher_fee: *sell_matcher_fee,
                    fee: c.fee,
                    timestamp: c.timestamp,
                };
                if c.version == 1 {
                    let mut tx = ExchangeWithSig::new(exchange);
                    tx.signature = Some(proofs_as_signature(&c.proofs)?);
                    Transaction::ExchangeV1(tx)
                } else {
                    let mut tx = ExchangeWithProofs::new(c.version, exchange);
                    tx.proofs = Some(c.proofs.clone());
                    Transaction::ExchangeV2(tx)
                }
            }
            (TransactionType::Lease, CanonicalPayload::Lease { recipient, amount }) => {
                let lease = Lease {
                    sender_pk: sender("lease transaction")?,
                    recipient: recipient.clone(),
                    amount: *amount,
                    fee: c.fee,
                    timestamp: c.timestamp,
                };
                if c.version == 1 {
                    let mut tx = LeaseWithSig::new(lease);
                    tx.signature = Some(proofs_as_signature(&c.proofs)?);
                    Transaction::LeaseV1(tx)
                } else {
                    let mut tx = LeaseWithProofs::new(lease);
                    tx.proofs = Some(c.proofs.clone());
                    Transaction::LeaseV2(tx)
                }
            }
            (TransactionType::LeaseCancel, CanonicalPayload::LeaseCancel { lease_id }) => {
                let cancel = LeaseCancel {
                    sender_pk: sender("lease cancel transaction")?,
                    lease_id: *lease_id,
                    fee: c.fee,
                    timestamp: c.timestamp,
                };
                if c.version == 1 {
                    let mut tx = LeaseCancelWithSig::new(cancel);
                    tx.signature = Some(proofs_as_signature(&c.proofs)?);
                    Transaction::LeaseCancelV1(tx)
                } else {
                    let mut tx = LeaseCancelWithProofs::new(scheme, cancel);
                    tx.proofs = Some(c.proofs.clone());
                    Transaction::LeaseCancelV2(tx)
                }
            }
            (TransactionType::CreateAlias, CanonicalPayload::CreateAlias { alias }) => {
                let create_alias = CreateAlias {
                    sender_pk: sender("create alias transaction")?,
                    alias: alias.clone(),
                    fee: c.fee,
                    timestamp: c.timestamp,
                };
                if c.version == 1 {
                    let mut tx = CreateAliasWithSig::new(create_alias);
                    tx.signature = Some(proofs_as_signature(&c.proofs)?);
                    Transaction::CreateAliasV1(tx)
                } else {
                    let mut tx = CreateAliasWithProofs::new(create_alias);
                    tx.proofs = Some(c.proofs.clone());
                    Transaction::CreateAliasV2(tx)
                }
            }
            (
                TransactionType::MassTransfer,
                CanonicalPayload::MassTransfer {
                    asset,
                    transfers,
                    attachment,
                },
            ) => {
                let mut tx = MassTransferWithProofs::new(
                    sender("mass transfer transaction")?,
                    *asset,
                    transfers.clone(),
                    c.timestamp,
                    c.fee,
                    attachment.clone(),
                );
                tx.proofs = Some(c.proofs.clone());
                Transaction::MassTransfer(tx)
            }
            (TransactionType::Data, CanonicalPayload::Data { entries }) => {
                let mut tx = DataWithProofs::new(
                    sender("data transaction")?,
                    entries.clone(),
                    c.fee,
                    c.timestamp,
                );
                tx.proofs = Some(c.proofs.clone());
                Transaction::Data(tx)
            }
            (TransactionType::SetScript, CanonicalPayload::SetScript { script }) => {
                let mut tx = SetScriptWithProofs::new(
                    scheme,
                    sender("set script transaction")?,
                    script.clone(),
                    c.fee,
                    c.timestamp,
                );
                tx.proofs = Some(c.proofs.clone());
                Transaction::SetScript(tx)
            }
            (
                TransactionType::Sponsorship,
                CanonicalPayload::Sponsorship {
                    asset_id,
                    min_asset_fee,
                },
            ) => {
                let mut tx = crate::transaction::SponsorshipWithProofs::new(
                    sender("sponsorship transaction")?,
                    *asset_id,
                    *min_asset_fee,
                    c.fee,
                    c.timestamp,
                );
                tx.proofs = Some(c.proofs.clone());
                Transaction::Sponsorship(tx)
            }
            (
                TransactionType::SetAssetScript,
                CanonicalPayload::SetAssetScript { asset_id, script },
            ) => {
                let mut tx = SetAssetScriptWithProofs::new(
                    scheme,
                    sender("set asset script transaction")?,
                    *asset_id,
                    script.clone(),
                    c.fee,
                    c.timestamp,
                );
                tx.proofs = Some(c.proofs.clone());
                Transaction::SetAssetScript(tx)
            }
            (
                TransactionType::InvokeScript,
                CanonicalPayload::InvokeScript {
                    dapp,
                    call,
                    payments,
                },
            ) => {
                let mut tx = InvokeScriptWithProofs::new(
                    scheme,
                    sender("invoke script transaction")?,
                    dapp.clone(),
                    call.clone(),
                    payments.clone(),
                    c.fee_asset,
                    c.fee,
                    c.timestamp,
                );
                tx.proofs = Some(c.proofs.clone());
                Transaction::InvokeScript(tx)
            }
            (
                TransactionType::UpdateAssetInfo,
                CanonicalPayload::UpdateAssetInfo {
                    asset_id,
                    name,
                    description,
                },
            ) => {
                let mut tx = UpdateAssetInfoWithProofs::new(
                    scheme,
                    sender("update asset info transaction")?,
                    *asset_id,
                    name.clone(),
                    description.clone(),
                    c.fee_asset,
                    c.fee,
                    c.timestamp,
                );
                tx.proofs = Some(c.proofs.clone());
                Transaction::UpdateAssetInfo(tx)
            }
            (
                TransactionType::InvokeExpression,
                CanonicalPayload::InvokeExpression { expression },
            ) => {
                let mut tx = InvokeExpressionWithProofs::new(
                    scheme,
                    sender("invoke expression transaction")?,
                    expression.clone(),
                    c.fee_asset,
                    c.fee,
                    c.timestamp,
                );
                tx.proofs = Some(c.proofs.clone());
                Transaction::InvokeExpression(tx)
            }
            (tx_type, _) => return Err(payload_mismatch(tx_type)),
        };
        // Identifiers never cross the boundary; recompute like any decode.
        match tx.generate_id(scheme) {
            Ok(()) => {}
            // A canonical-only transaction (delete data entries) has no
            // legacy binary to hash; the transport layer that carried it
            // owns its identifier.
            Err(Error::Validation(ValidationError::DeleteNotRepresentable)) => {}
            Err(e) => return Err(e),
        }
        Ok(tx)
    }
}

fn issue_payload(issue: &Issue, script: Option<Vec<u8>>) -> CanonicalPayload {
    CanonicalPayload::Issue {
        name: issue.name.clone(),
        description: issue.description.clone(),
        quantity: issue.quantity,
        decimals: issue.decimals,
        reissuable: issue.reissuable,
        script,
    }
}

fn transfer_payload(transfer: &Transfer) -> CanonicalPayload {
    CanonicalPayload::Transfer {
        recipient: transfer.recipient.clone(),
        amount_asset: transfer.amount_asset,
        amount: transfer.amount,
        attachment: transfer.attachment.clone(),
    }
}

fn reissue_payload(reissue: &Reissue) -> CanonicalPayload {
    CanonicalPayload::Reissue {
        asset_id: reissue.asset_id,
        quantity: reissue.quantity,
        reissuable: reissue.reissuable,
    }
}

fn burn_payload(burn: &Burn) -> CanonicalPayload {
    CanonicalPayload::Burn {
        asset_id: burn.asset_id,
        amount: burn.amount,
    }
}

fn exchange_payload(exchange: &Exchange) -> CanonicalPayload {
    CanonicalPayload::Exchange {
        buy_order: exchange.buy_order.clone(),
        sell_order: exchange.sell_order.clone(),
        price: exchange.price,
        amount: exchange.amount,
        buy_matcher_fee: exchange.buy_matcher_fee,
        sell_matcher_fee: exchange.sell_matcher_fee,
    }
}
