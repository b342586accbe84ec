//! Conformance tests for the identity and transaction codecs.
//!
//! These tests pin the cross-component behavior a node pairs on with the
//! rest of the network: the literal address and alias vectors, the JSON
//! surface, and the full sign -> marshal -> dispatch -> verify lifecycle
//! across every transaction shape. Each test stands alone; no shared
//! state, no ordering dependencies.

use crest_protocol::config::{MAINNET_SCHEME, TESTNET_SCHEME};
use crest_protocol::crypto::{Digest, Keypair, PublicKey};
use crest_protocol::identity::{Address, Alias, Recipient};
use crest_protocol::transaction::{
    bytes_to_transaction, Attachment, CanonicalConvert, FunctionCall, Issue, IssueWithProofs,
    Lease, LeaseWithProofs, MassTransferEntry, MassTransferWithProofs, OptionalAsset, Transaction,
    Transactional, TransactionType, Transfer, TransferWithProofs, TransferWithSig,
};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn reference_pk() -> PublicKey {
    PublicKey::from_base58("5CnGfSjguYfzWzaRmbxzCbF5qRNGTXEvayytSANkqQ6A").unwrap()
}

fn test_address(seed: u8) -> Address {
    Address::from_public_key(TESTNET_SCHEME, &Keypair::from_seed(&[seed; 32]).public_key())
}

fn signed_transfer(kp: &Keypair, version: u8) -> TransferWithProofs {
    let mut tx = TransferWithProofs::new(
        version,
        Transfer {
            sender_pk: kp.public_key(),
            amount_asset: OptionalAsset::native(),
            fee_asset: OptionalAsset::native(),
            timestamp: 1_600_000_000_000,
            amount: 123_456_789,
            fee: 100_000,
            recipient: Recipient::from(test_address(11)),
            attachment: Attachment::new(b"conformance".to_vec()),
        },
    );
    tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
    tx
}

// ---------------------------------------------------------------------------
// Identity vectors
// ---------------------------------------------------------------------------

#[test]
fn reference_address_vectors() {
    let mainnet = Address::from_public_key(MAINNET_SCHEME, &reference_pk());
    assert_eq!(mainnet.to_base58(), "3PQ8bp1aoqHQo3icNqFv6VM36V1jzPeaG1v");
    assert!(mainnet.valid());

    let testnet = Address::from_public_key(TESTNET_SCHEME, &reference_pk());
    assert_eq!(testnet.to_base58(), "3NC7nrggwhk2AbRC7kzv92yDjbVyALeGzE5");
    assert!(testnet.valid());
}

#[test]
fn reference_alias_vectors() {
    let alias = Alias::new(TESTNET_SCHEME, "blah-blah-blah");
    assert_eq!(alias.to_string(), "alias:T:blah-blah-blah");
    assert_eq!(
        bs58::encode(alias.bytes()).into_string(),
        "6bqk2heWpAcsmshUhfT3QNEB"
    );
    assert_eq!(Alias::from_string(&alias.to_string()).unwrap(), alias);
    assert!(alias.valid().is_ok());
}

#[test]
fn undersized_and_oversized_aliases_decode_but_fail_validation() {
    for name in ["xxx", &"q".repeat(47)] {
        let alias = Alias::new(TESTNET_SCHEME, name);
        let decoded = Alias::from_bytes(&alias.bytes()).unwrap();
        assert_eq!(decoded, alias);
        assert!(decoded.valid().is_err(), "{name:?} must fail validation");
    }
}

#[test]
fn recipient_json_roundtrips_preserve_identity_and_length() {
    let from_address = Recipient::from(test_address(3));
    let json = serde_json::to_string(&from_address).unwrap();
    let back: Recipient = serde_json::from_str(&json).unwrap();
    assert_eq!(back.address(), from_address.address());
    assert_eq!(back.len_bytes(), from_address.len_bytes());

    let from_alias = Recipient::from(Alias::new(TESTNET_SCHEME, "blah-blah-blah"));
    let json = serde_json::to_string(&from_alias).unwrap();
    let back: Recipient = serde_json::from_str(&json).unwrap();
    assert_eq!(back.alias(), from_alias.alias());
    assert_eq!(back.len_bytes(), from_alias.len_bytes());
}

#[test]
fn alias_recipient_fails_address_only_marshalling_context() {
    let recipient = Recipient::from(Alias::new(TESTNET_SCHEME, "blah-blah-blah"));
    assert!(recipient.try_to_address().is_err());
    assert!(Recipient::from(test_address(4)).try_to_address().is_ok());
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn full_lifecycle_build_sign_marshal_dispatch_verify() {
    let kp = Keypair::from_seed(&[90u8; 32]);
    let tx = signed_transfer(&kp, 2);
    let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();

    let dispatched = bytes_to_transaction(&bytes, TESTNET_SCHEME).unwrap();
    assert_eq!(dispatched.tx_type(), TransactionType::Transfer);
    assert_eq!(dispatched.version(), 2);
    assert_eq!(dispatched.id(), tx.id.as_ref());
    assert!(dispatched.verify(TESTNET_SCHEME, &kp.public_key()).unwrap());
    assert!(!dispatched
        .verify(TESTNET_SCHEME, &Keypair::generate().public_key())
        .unwrap());
    assert!(dispatched.validate(TESTNET_SCHEME).is_ok());
}

#[test]
fn signature_stability_and_id_determinism() {
    let kp = Keypair::from_seed(&[91u8; 32]);
    let a = signed_transfer(&kp, 2);
    let b = signed_transfer(&kp, 2);
    assert_eq!(a.proofs, b.proofs, "deterministic scheme, deterministic proofs");
    assert_eq!(a.id, b.id, "identical fields, identical identifiers");

    let mut c = signed_transfer(&kp, 2);
    c.transfer.amount += 1;
    c.id = None;
    c.generate_id(TESTNET_SCHEME).unwrap();
    assert_ne!(a.id, c.id, "any canonical field change must change the id");
}

#[test]
fn scheme_binds_signatures_to_a_network() {
    let kp = Keypair::from_seed(&[92u8; 32]);
    let issue = Issue {
        sender_pk: kp.public_key(),
        name: "Bound".to_string(),
        description: String::new(),
        quantity: 1_000,
        decimals: 0,
        reissuable: false,
        fee: 100_000_000,
        timestamp: 1_600_000_000_000,
    };
    let mut tx = IssueWithProofs::new(TESTNET_SCHEME, issue);
    tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
    assert!(tx.verify(TESTNET_SCHEME, &kp.public_key()).unwrap());
    assert!(!tx.verify(MAINNET_SCHEME, &kp.public_key()).unwrap());
}

#[test]
fn decoded_transactions_never_trust_wire_identifiers() {
    // The wire form carries no identifier at all; whatever the decoder
    // reports must equal a fresh derivation from the body bytes.
    let kp = Keypair::from_seed(&[93u8; 32]);
    let mut v1 = TransferWithSig::new(Transfer {
        sender_pk: kp.public_key(),
        amount_asset: OptionalAsset::native(),
        fee_asset: OptionalAsset::native(),
        timestamp: 7,
        amount: 1,
        fee: 1,
        recipient: Recipient::from(test_address(12)),
        attachment: Attachment::empty(),
    });
    v1.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
    let bytes = v1.marshal_binary(TESTNET_SCHEME).unwrap();
    let decoded = TransferWithSig::unmarshal_binary(&bytes, TESTNET_SCHEME).unwrap();
    assert_eq!(decoded.id, v1.id);
}

#[test]
fn clone_is_a_deep_copy() {
    let kp = Keypair::from_seed(&[94u8; 32]);
    let original = signed_transfer(&kp, 2);
    let mut copy = original.clone();
    copy.transfer.attachment.0.push(0xFF);
    copy.proofs.as_mut().unwrap().proofs[0][0] ^= 0xFF;
    assert_ne!(copy, original, "mutating the copy must not alias the original");
    assert_eq!(
        original.marshal_binary(TESTNET_SCHEME).unwrap(),
        signed_transfer(&kp, 2).marshal_binary(TESTNET_SCHEME).unwrap()
    );
}

#[test]
fn mass_transfer_lifecycle_through_dispatch() {
    let kp = Keypair::from_seed(&[95u8; 32]);
    let mut tx = MassTransferWithProofs::new(
        kp.public_key(),
        OptionalAsset::issued(Digest::new([0x61; 32])),
        vec![
            MassTransferEntry {
                recipient: Recipient::from(test_address(13)),
                amount: 10,
            },
            MassTransferEntry {
                recipient: Recipient::from(Alias::new(TESTNET_SCHEME, "second-target")),
                amount: 20,
            },
        ],
        1_600_000_000_000,
        200_000,
        Attachment::empty(),
    );
    tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
    let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
    match bytes_to_transaction(&bytes, TESTNET_SCHEME).unwrap() {
        Transaction::MassTransfer(back) => assert_eq!(back, tx),
        other => panic!("wrong dispatch: {other:?}"),
    }
}

#[test]
fn canonical_boundary_roundtrips_through_binary() {
    let kp = Keypair::from_seed(&[96u8; 32]);
    let mut lease = LeaseWithProofs::new(Lease {
        sender_pk: kp.public_key(),
        recipient: Recipient::from(test_address(14)),
        amount: 1_000,
        fee: 100_000,
        timestamp: 1_600_000_000_000,
    });
    lease.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
    let tx = Transaction::LeaseV2(lease);

    let canonical = tx.to_canonical(TESTNET_SCHEME).unwrap();
    let rebuilt = Transaction::from_canonical(&canonical).unwrap();
    let bytes = rebuilt.marshal_binary(TESTNET_SCHEME).unwrap();
    let decoded = bytes_to_transaction(&bytes, TESTNET_SCHEME).unwrap();
    assert_eq!(decoded, tx);
}

#[test]
fn invoke_default_call_json_surface() {
    let call = FunctionCall::Default;
    let json = serde_json::to_string(&call).unwrap();
    let back: FunctionCall = serde_json::from_str(&json).unwrap();
    assert_eq!(back, call);
}

#[test]
fn fuzz_like_garbage_never_panics() {
    // Deterministic pseudo-random garbage; the point is absence of
    // panics, not the particular errors. The subscriber makes the
    // dispatcher's fallback decisions visible under RUST_LOG.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    let mut state = 0x1234_5678_u64;
    for len in 0..256usize {
        let mut data = Vec::with_capacity(len);
        for _ in 0..len {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            data.push((state >> 33) as u8);
        }
        let _ = bytes_to_transaction(&data, TESTNET_SCHEME);
    }
}

#[test]
fn truncations_of_every_dispatchable_form_error_cleanly() {
    let kp = Keypair::from_seed(&[97u8; 32]);
    let tx = signed_transfer(&kp, 2);
    let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
    for cut in 0..bytes.len() {
        assert!(bytes_to_transaction(&bytes[..cut], TESTNET_SCHEME).is_err());
    }
}
