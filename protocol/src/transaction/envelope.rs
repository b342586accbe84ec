//! Top-level envelope dispatch: from untrusted bytes to a typed
//! transaction.
//!
//! Two generations share the entry point. Legacy blobs lead with the
//! transaction type byte (always non-zero); modern blobs lead with a zero
//! marker so the next byte can carry the type. The mapping from
//! `(generation, type byte)` to decoder is a static match resolved at
//! compile time.
//!
//! Foreign-format (RLP-style) transactions are not part of either
//! generation: the canonical envelope is tried first, and recognition
//! falls back to the foreign decoder only when the canonical path cannot
//! claim the bytes.

use tracing::debug;

use crate::config::Scheme;
use crate::error::{DecodeError, Error};
use crate::transaction::ethereum::{looks_like_ethereum, EthereumTransaction};
use crate::transaction::{
    BurnWithProofs, BurnWithSig, CreateAliasWithProofs, CreateAliasWithSig, DataWithProofs,
    ExchangeWithProofs, ExchangeWithSig, Genesis, InvokeExpressionWithProofs,
    InvokeScriptWithProofs, IssueWithProofs, IssueWithSig, LeaseCancelWithProofs,
    LeaseCancelWithSig, LeaseWithProofs, LeaseWithSig, MassTransferWithProofs, Payment,
    ReissueWithProofs, ReissueWithSig, SetAssetScriptWithProofs, SetScriptWithProofs, Transaction,
    TransactionType, TransferWithProofs, TransferWithSig, UpdateAssetInfoWithProofs,
};

/// Decodes any transaction from its wire form.
///
/// Unknown type bytes are a decode error, not a silent no-op. Bytes that
/// the canonical envelope cannot claim fall back to foreign-format
/// recognition when their leading byte allows it.
pub fn bytes_to_transaction(data: &[u8], scheme: Scheme) -> Result<Transaction, Error> {
    if data.is_empty() {
        return Err(DecodeError::Underflow {
            needed: 1,
            remaining: 0,
        }
        .into());
    }
    let result = if data[0] == 0 {
        modern_transaction(data, scheme)
    } else {
        legacy_transaction(data, scheme)
    };
    match result {
        Ok(tx) => Ok(tx),
        Err(canonical_err) if looks_like_ethereum(data) => {
            debug!(
                error = %canonical_err,
                "canonical envelope rejected the bytes, trying foreign-format decode"
            );
            EthereumTransaction::unmarshal_binary(data, scheme).map(Transaction::Ethereum)
        }
        Err(e) => Err(e),
    }
}

fn modern_transaction(data: &[u8], scheme: Scheme) -> Result<Transaction, Error> {
    let type_byte = *data.get(1).ok_or(DecodeError::Underflow {
        needed: 2,
        remaining: data.len(),
    })?;
    match TransactionType::from_byte(type_byte)? {
        TransactionType::Issue => {
            IssueWithProofs::unmarshal_binary(data, scheme).map(Transaction::IssueV2)
        }
        TransactionType::Transfer => {
            TransferWithProofs::unmarshal_binary(data, scheme).map(Transaction::TransferV2)
        }
        TransactionType::Reissue => {
            ReissueWithProofs::unmarshal_binary(data, scheme).map(Transaction::ReissueV2)
        }
        TransactionType::Burn => {
            BurnWithProofs::unmarshal_binary(data, scheme).map(Transaction::BurnV2)
        }
        TransactionType::Exchange => {
            ExchangeWithProofs::unmarshal_binary(data, scheme).map(Transaction::ExchangeV2)
        }
        TransactionType::Lease => {
            LeaseWithProofs::unmarshal_binary(data, scheme).map(Transaction::LeaseV2)
        }
        TransactionType::LeaseCancel => {
            LeaseCancelWithProofs::unmarshal_binary(data, scheme).map(Transaction::LeaseCancelV2)
        }
        TransactionType::CreateAlias => {
            CreateAliasWithProofs::unmarshal_binary(data, scheme).map(Transaction::CreateAliasV2)
        }
        TransactionType::MassTransfer => {
            MassTransferWithProofs::unmarshal_binary(data, scheme).map(Transaction::MassTransfer)
        }
        TransactionType::Data => {
            DataWithProofs::unmarshal_binary(data, scheme).map(Transaction::Data)
        }
        TransactionType::SetScript => {
            SetScriptWithProofs::unmarshal_binary(data, scheme).map(Transaction::SetScript)
        }
        TransactionType::Sponsorship => {
            crate::transaction::SponsorshipWithProofs::unmarshal_binary(data, scheme)
                .map(Transaction::Sponsorship)
        }
        TransactionType::SetAssetScript => {
            SetAssetScriptWithProofs::unmarshal_binary(data, scheme)
                .map(Transaction::SetAssetScript)
        }
        TransactionType::InvokeScript => {
            InvokeScriptWithProofs::unmarshal_binary(data, scheme).map(Transaction::InvokeScript)
        }
        TransactionType::UpdateAssetInfo => {
            UpdateAssetInfoWithProofs::unmarshal_binary(data, scheme)
                .map(Transaction::UpdateAssetInfo)
        }
        TransactionType::InvokeExpression => {
            InvokeExpressionWithProofs::unmarshal_binary(data, scheme)
                .map(Transaction::InvokeExpression)
        }
        TransactionType::Genesis | TransactionType::Payment | TransactionType::Ethereum => {
            Err(DecodeError::Malformed {
                entity: "transaction envelope",
                reason: format!("type {type_byte} has no modern encoding"),
            }
            .into())
        }
    }
}

fn legacy_transaction(data: &[u8], scheme: Scheme) -> Result<Transaction, Error> {
    match TransactionType::from_byte(data[0])? {
        TransactionType::Genesis => {
            Genesis::unmarshal_binary(data, scheme).map(Transaction::Genesis)
        }
        TransactionType::Payment => {
            Payment::unmarshal_binary(data, scheme).map(Transaction::Payment)
        }
        TransactionType::Issue => {
            IssueWithSig::unmarshal_binary(data, scheme).map(Transaction::IssueV1)
        }
        TransactionType::Transfer => {
            TransferWithSig::unmarshal_binary(data, scheme).map(Transaction::TransferV1)
        }
        TransactionType::Reissue => {
            ReissueWithSig::unmarshal_binary(data, scheme).map(Transaction::ReissueV1)
        }
        TransactionType::Burn => {
            BurnWithSig::unmarshal_binary(data, scheme).map(Transaction::BurnV1)
        }
        TransactionType::Exchange => {
            ExchangeWithSig::unmarshal_binary(data, scheme).map(Transaction::ExchangeV1)
        }
        TransactionType::Lease => {
            LeaseWithSig::unmarshal_binary(data, scheme).map(Transaction::LeaseV1)
        }
        TransactionType::LeaseCancel => {
            LeaseCancelWithSig::unmarshal_binary(data, scheme).map(Transaction::LeaseCancelV1)
        }
        TransactionType::CreateAlias => {
            CreateAliasWithSig::unmarshal_binary(data, scheme).map(Transaction::CreateAliasV1)
        }
        other => Err(DecodeError::Malformed {
            entity: "transaction envelope",
            reason: format!("type {} has no legacy encoding", other.to_byte()),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TESTNET_SCHEME;
    use crate::crypto::{Digest, Keypair};
    use crate::identity::{Address, Alias, Recipient};
    use crate::transaction::fields::{Attachment, OptionalAsset};
    use crate::transaction::order::{AssetPair, Order, OrderType};
    use crate::transaction::{
        Burn, CreateAlias, Exchange, Issue, Lease, LeaseCancel, Reissue, Transactional, Transfer,
    };

    fn kp() -> Keypair {
        Keypair::from_seed(&[77u8; 32])
    }

    fn address() -> Address {
        Address::from_public_key(TESTNET_SCHEME, &Keypair::from_seed(&[78u8; 32]).public_key())
    }

    fn signed_order(order_type: OrderType, price: u64, matcher: &Keypair) -> Order {
        let author = Keypair::from_seed(&[79u8; 32]);
        let mut order = Order::new(
            1,
            author.public_key(),
            matcher.public_key(),
            AssetPair {
                amount_asset: OptionalAsset::issued(Digest::new([0x51; 32])),
                price_asset: OptionalAsset::native(),
            },
            order_type,
            price,
            1_000,
            10,
            1_000_000,
            500,
        );
        order.sign(&author.secret_key()).unwrap();
        order
    }

    fn all_wire_forms() -> Vec<(&'static str, Vec<u8>, TransactionType, u8)> {
        let kp = kp();
        let sk = kp.secret_key();
        let s = TESTNET_SCHEME;
        let mut out: Vec<(&'static str, Vec<u8>, TransactionType, u8)> = Vec::new();

        let genesis = Genesis::new(1, address(), 100);
        out.push((
            "genesis",
            genesis.marshal_binary(s).unwrap(),
            TransactionType::Genesis,
            1,
        ));

        let mut payment = Payment::new(kp.public_key(), address(), 10, 1, 2);
        payment.sign(s, &sk).unwrap();
        out.push((
            "payment",
            payment.marshal_binary(s).unwrap(),
            TransactionType::Payment,
            1,
        ));

        let issue = Issue {
            sender_pk: kp.public_key(),
            name: "Token".to_string(),
            description: String::new(),
            quantity: 100,
            decimals: 2,
            reissuable: true,
            fee: 1,
            timestamp: 2,
        };
        let mut v1 = IssueWithSig::new(issue.clone());
        v1.sign(s, &sk).unwrap();
        out.push(("issue v1", v1.marshal_binary(s).unwrap(), TransactionType::Issue, 1));
        let mut v2 = IssueWithProofs::new(s, issue);
        v2.sign(s, &sk).unwrap();
        out.push(("issue v2", v2.marshal_binary(s).unwrap(), TransactionType::Issue, 2));

        let transfer = Transfer {
            sender_pk: kp.public_key(),
            amount_asset: OptionalAsset::native(),
            fee_asset: OptionalAsset::native(),
            timestamp: 2,
            amount: 10,
            fee: 1,
            recipient: Recipient::from(address()),
            attachment: Attachment::empty(),
        };
        let mut v1 = TransferWithSig::new(transfer.clone());
        v1.sign(s, &sk).unwrap();
        out.push((
            "transfer v1",
            v1.marshal_binary(s).unwrap(),
            TransactionType::Transfer,
            1,
        ));
        let mut v2 = TransferWithProofs::new(2, transfer);
        v2.sign(s, &sk).unwrap();
        out.push((
            "transfer v2",
            v2.marshal_binary(s).unwrap(),
            TransactionType::Transfer,
            2,
        ));

        let reissue = Reissue {
            sender_pk: kp.public_key(),
            asset_id: Digest::new([1u8; 32]),
            quantity: 5,
            reissuable: false,
            fee: 1,
            timestamp: 2,
        };
        let mut v1 = ReissueWithSig::new(reissue.clone());
        v1.sign(s, &sk).unwrap();
        out.push((
            "reissue v1",
            v1.marshal_binary(s).unwrap(),
            TransactionType::Reissue,
            1,
        ));
        let mut v2 = ReissueWithProofs::new(s, reissue);
        v2.sign(s, &sk).unwrap();
        out.push((
            "reissue v2",
            v2.marshal_binary(s).unwrap(),
            TransactionType::Reissue,
            2,
        ));

        let burn = Burn {
            sender_pk: kp.public_key(),
            asset_id: Digest::new([1u8; 32]),
            amount: 5,
            fee: 1,
            timestamp: 2,
        };
        let mut v1 = BurnWithSig::new(burn.clone());
        v1.sign(s, &sk).unwrap();
        out.push(("burn v1", v1.marshal_binary(s).unwrap(), TransactionType::Burn, 1));
        let mut v2 = BurnWithProofs::new(s, burn);
        v2.sign(s, &sk).unwrap();
        out.push(("burn v2", v2.marshal_binary(s).unwrap(), TransactionType::Burn, 2));

        let matcher = Keypair::from_seed(&[80u8; 32]);
        let exchange = Exchange {
            sender_pk: matcher.public_key(),
            buy_order: signed_order(OrderType::Buy, 110, &matcher),
            sell_order: signed_order(OrderType::Sell, 90, &matcher),
            price: 100,
            amount: 10,
            buy_matcher_fee: 1,
            sell_matcher_fee: 1,
            fee: 1,
            timestamp: 10,
        };
        let mut v1 = ExchangeWithSig::new(exchange.clone());
        v1.sign(s, &matcher.secret_key()).unwrap();
        out.push((
            "exchange v1",
            v1.marshal_binary(s).unwrap(),
            TransactionType::Exchange,
            1,
        ));
        let mut v2 = ExchangeWithProofs::new(2, exchange);
        v2.sign(s, &matcher.secret_key()).unwrap();
        out.push((
            "exchange v2",
            v2.marshal_binary(s).unwrap(),
            TransactionType::Exchange,
            2,
        ));

        let lease = Lease {
            sender_pk: kp.public_key(),
            recipient: Recipient::from(address()),
            amount: 10,
            fee: 1,
            timestamp: 2,
        };
        let mut v1 = LeaseWithSig::new(lease.clone());
        v1.sign(s, &sk).unwrap();
        out.push(("lease v1", v1.marshal_binary(s).unwrap(), TransactionType::Lease, 1));
        let mut v2 = LeaseWithProofs::new(lease);
        v2.sign(s, &sk).unwrap();
        out.push(("lease v2", v2.marshal_binary(s).unwrap(), TransactionType::Lease, 2));

        let cancel = LeaseCancel {
            sender_pk: kp.public_key(),
            lease_id: Digest::new([2u8; 32]),
            fee: 1,
            timestamp: 2,
        };
        let mut v1 = LeaseCancelWithSig::new(cancel.clone());
        v1.sign(s, &sk).unwrap();
        out.push((
            "lease cancel v1",
            v1.marshal_binary(s).unwrap(),
            TransactionType::LeaseCancel,
            1,
        ));
        let mut v2 = LeaseCancelWithProofs::new(s, cancel);
        v2.sign(s, &sk).unwrap();
        out.push((
            "lease cancel v2",
            v2.marshal_binary(s).unwrap(),
            TransactionType::LeaseCancel,
            2,
        ));

        let create_alias = CreateAlias {
            sender_pk: kp.public_key(),
            alias: Alias::new(s, "dispatch-me"),
            fee: 1,
            timestamp: 2,
        };
        let mut v1 = CreateAliasWithSig::new(create_alias.clone());
        v1.sign(s, &sk).unwrap();
        out.push((
            "create alias v1",
            v1.marshal_binary(s).unwrap(),
            TransactionType::CreateAlias,
            1,
        ));
        let mut v2 = CreateAliasWithProofs::new(create_alias);
        v2.sign(s, &sk).unwrap();
        out.push((
            "create alias v2",
            v2.marshal_binary(s).unwrap(),
            TransactionType::CreateAlias,
            2,
        ));

        let mut mass = MassTransferWithProofs::new(
            kp.public_key(),
            OptionalAsset::native(),
            Vec::new(),
            2,
            1,
            Attachment::empty(),
        );
        mass.sign(s, &sk).unwrap();
        out.push((
            "mass transfer",
            mass.marshal_binary(s).unwrap(),
            TransactionType::MassTransfer,
            1,
        ));

        let mut data_tx = DataWithProofs::new(kp.public_key(), Vec::new(), 1, 2);
        data_tx.sign(s, &sk).unwrap();
        out.push(("data", data_tx.marshal_binary(s).unwrap(), TransactionType::Data, 1));

        let mut set_script = SetScriptWithProofs::new(s, kp.public_key(), None, 1, 2);
        set_script.sign(s, &sk).unwrap();
        out.push((
            "set script",
            set_script.marshal_binary(s).unwrap(),
            TransactionType::SetScript,
            1,
        ));

        let mut sponsorship = crate::transaction::SponsorshipWithProofs::new(
            kp.public_key(),
            Digest::new([3u8; 32]),
            1,
            1,
            2,
        );
        sponsorship.sign(s, &sk).unwrap();
        out.push((
            "sponsorship",
            sponsorship.marshal_binary(s).unwrap(),
            TransactionType::Sponsorship,
            1,
        ));

        let mut sas = SetAssetScriptWithProofs::new(
            s,
            kp.public_key(),
            Digest::new([4u8; 32]),
            Some(vec![1]),
            1,
            2,
        );
        sas.sign(s, &sk).unwrap();
        out.push((
            "set asset script",
            sas.marshal_binary(s).unwrap(),
            TransactionType::SetAssetScript,
            1,
        ));

        let mut invoke = InvokeScriptWithProofs::new(
            s,
            kp.public_key(),
            Recipient::from(address()),
            crate::transaction::FunctionCall::Default,
            Vec::new(),
            OptionalAsset::native(),
            1,
            2,
        );
        invoke.sign(s, &sk).unwrap();
        out.push((
            "invoke script",
            invoke.marshal_binary(s).unwrap(),
            TransactionType::InvokeScript,
            1,
        ));

        let mut uai = UpdateAssetInfoWithProofs::new(
            s,
            kp.public_key(),
            Digest::new([5u8; 32]),
            "Name".to_string(),
            String::new(),
            OptionalAsset::native(),
            1,
            2,
        );
        uai.sign(s, &sk).unwrap();
        out.push((
            "update asset info",
            uai.marshal_binary(s).unwrap(),
            TransactionType::UpdateAssetInfo,
            1,
        ));

        let mut expr = InvokeExpressionWithProofs::new(
            s,
            kp.public_key(),
            vec![1, 2, 3],
            OptionalAsset::native(),
            1,
            2,
        );
        expr.sign(s, &sk).unwrap();
        out.push((
            "invoke expression",
            expr.marshal_binary(s).unwrap(),
            TransactionType::InvokeExpression,
            1,
        ));

        out
    }

    #[test]
    fn every_shape_and_version_dispatches() {
        for (name, bytes, tx_type, version) in all_wire_forms() {
            let tx = bytes_to_transaction(&bytes, TESTNET_SCHEME)
                .unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(tx.tx_type(), tx_type, "{name}");
            assert_eq!(tx.version(), version, "{name}");
            assert!(tx.id().is_some(), "{name} must carry a recomputed id");
            assert_eq!(
                tx.marshal_binary(TESTNET_SCHEME).unwrap(),
                bytes,
                "{name} must re-marshal to identical bytes"
            );
        }
    }

    #[test]
    fn empty_input_rejected() {
        assert!(matches!(
            bytes_to_transaction(&[], TESTNET_SCHEME),
            Err(Error::Decode(DecodeError::Underflow { .. }))
        ));
    }

    #[test]
    fn unknown_legacy_type_rejected() {
        assert!(matches!(
            bytes_to_transaction(&[0x63, 0x00, 0x00], TESTNET_SCHEME),
            Err(Error::Decode(DecodeError::UnknownTransactionType(0x63)))
        ));
    }

    #[test]
    fn unknown_modern_type_rejected() {
        assert!(matches!(
            bytes_to_transaction(&[0x00, 0x63, 0x01], TESTNET_SCHEME),
            Err(Error::Decode(DecodeError::UnknownTransactionType(0x63)))
        ));
    }

    #[test]
    fn rlp_bytes_fall_back_to_foreign_decode() {
        let raw = vec![0xF8, 0x6C, 0x01, 0x02];
        let tx = bytes_to_transaction(&raw, TESTNET_SCHEME).unwrap();
        assert_eq!(tx.tx_type(), TransactionType::Ethereum);
        match tx {
            Transaction::Ethereum(eth) => assert_eq!(eth.raw, raw),
            other => panic!("expected a foreign transaction, got {other:?}"),
        }
    }

    #[test]
    fn truncated_modern_header_rejected() {
        assert!(bytes_to_transaction(&[0x00], TESTNET_SCHEME).is_err());
    }
}
