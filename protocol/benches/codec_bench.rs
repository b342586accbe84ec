// Codec benchmarks: body marshalling, full decode, signing, and address
// derivation for a representative transfer transaction.

use criterion::{criterion_group, criterion_main, Criterion};

use crest_protocol::config::TESTNET_SCHEME;
use crest_protocol::crypto::Keypair;
use crest_protocol::identity::{Address, Recipient};
use crest_protocol::transaction::{
    bytes_to_transaction, Attachment, OptionalAsset, Transactional, Transfer, TransferWithProofs,
};

fn sample_transfer(kp: &Keypair) -> TransferWithProofs {
    TransferWithProofs::new(
        2,
        Transfer {
            sender_pk: kp.public_key(),
            amount_asset: OptionalAsset::native(),
            fee_asset: OptionalAsset::native(),
            timestamp: 1_700_000_000_000,
            amount: 1_000_000,
            fee: 100_000,
            recipient: Recipient::from(Address::from_public_key(
                TESTNET_SCHEME,
                &Keypair::from_seed(&[1u8; 32]).public_key(),
            )),
            attachment: Attachment::new(b"bench memo".to_vec()),
        },
    )
}

fn bench_body_marshal(c: &mut Criterion) {
    let kp = Keypair::generate();
    let tx = sample_transfer(&kp);
    c.bench_function("codec/transfer_body_marshal", |b| {
        b.iter(|| tx.body_bytes(TESTNET_SCHEME).unwrap());
    });
}

fn bench_sign_transfer(c: &mut Criterion) {
    let kp = Keypair::generate();
    let sk = kp.secret_key();
    c.bench_function("codec/transfer_sign", |b| {
        b.iter(|| {
            let mut tx = sample_transfer(&kp);
            tx.sign(TESTNET_SCHEME, &sk).unwrap();
            tx
        });
    });
}

fn bench_dispatch_decode(c: &mut Criterion) {
    let kp = Keypair::generate();
    let mut tx = sample_transfer(&kp);
    tx.sign(TESTNET_SCHEME, &kp.secret_key()).unwrap();
    let bytes = tx.marshal_binary(TESTNET_SCHEME).unwrap();
    c.bench_function("codec/transfer_dispatch_decode", |b| {
        b.iter(|| bytes_to_transaction(&bytes, TESTNET_SCHEME).unwrap());
    });
}

fn bench_address_derivation(c: &mut Criterion) {
    let pk = Keypair::generate().public_key();
    c.bench_function("codec/address_from_public_key", |b| {
        b.iter(|| Address::from_public_key(TESTNET_SCHEME, &pk));
    });
}

criterion_group!(
    benches,
    bench_body_marshal,
    bench_sign_transfer,
    bench_dispatch_decode,
    bench_address_derivation
);
criterion_main!(benches);
