//! CLI walkthrough of the transaction codec lifecycle.
//!
//! Derives addresses on the test network, builds and signs a transfer,
//! round-trips it through the binary envelope, and registers an alias.
//!
//! Run with:
//!   cargo run --example demo

use crest_protocol::config::TESTNET_SCHEME;
use crest_protocol::crypto::Keypair;
use crest_protocol::identity::{Address, Alias, Recipient};
use crest_protocol::transaction::{
    bytes_to_transaction, Attachment, CreateAlias, CreateAliasWithProofs, OptionalAsset,
    Transactional, Transfer, TransferWithProofs,
};

fn main() {
    let sender = Keypair::generate();
    let receiver = Keypair::generate();

    let sender_address = Address::from_public_key(TESTNET_SCHEME, &sender.public_key());
    let receiver_address = Address::from_public_key(TESTNET_SCHEME, &receiver.public_key());
    println!("sender    {sender_address}");
    println!("receiver  {receiver_address}");

    // Build, sign, and serialize a transfer.
    let mut transfer = TransferWithProofs::new(
        2,
        Transfer {
            sender_pk: sender.public_key(),
            amount_asset: OptionalAsset::native(),
            fee_asset: OptionalAsset::native(),
            timestamp: 1_700_000_000_000,
            amount: 50_000_000,
            fee: 100_000,
            recipient: Recipient::from(receiver_address),
            attachment: Attachment::new(b"demo payment".to_vec()),
        },
    );
    transfer
        .sign(TESTNET_SCHEME, &sender.secret_key())
        .expect("signing a well-formed transfer");
    let bytes = transfer
        .marshal_binary(TESTNET_SCHEME)
        .expect("marshalling a signed transfer");
    println!("transfer  id={} ({} bytes on the wire)", transfer.id.unwrap(), bytes.len());

    // Anyone can decode and check it without extra context.
    let decoded = bytes_to_transaction(&bytes, TESTNET_SCHEME).expect("dispatching the wire form");
    let ok = decoded
        .verify(TESTNET_SCHEME, &sender.public_key())
        .expect("verification runs");
    println!("decoded   type={:?} v{} verified={ok}", decoded.tx_type(), decoded.version());
    decoded.validate(TESTNET_SCHEME).expect("a valid transfer");

    // Register a human-readable alias for the sender.
    let mut register = CreateAliasWithProofs::new(CreateAlias {
        sender_pk: sender.public_key(),
        alias: Alias::new(TESTNET_SCHEME, "demo-sender"),
        fee: 100_000,
        timestamp: 1_700_000_000_100,
    });
    register
        .sign(TESTNET_SCHEME, &sender.secret_key())
        .expect("signing the alias registration");
    println!(
        "alias     {} id={}",
        register.create_alias.alias,
        register.id.unwrap()
    );
}
