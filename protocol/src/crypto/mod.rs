//! Cryptographic adapter: hashing, keys, signatures.
//!
//! The codec layer consumes these as opaque operations. Swapping the
//! underlying primitives would change every address and transaction ID on
//! the network, so the concrete choices live here and nowhere else.

pub mod hash;
pub mod keys;

pub use hash::{fast_hash, keccak256, secure_hash};
pub use keys::{sign, verify, Digest, Keypair, PublicKey, SecretKey, Signature};
