//! Hash functions backing identifiers and addresses.
//!
//! Two operations cover every hashing need of the codec layer:
//!
//! - [`fast_hash`] - BLAKE2b-256. Transaction and order identifiers.
//! - [`secure_hash`] - Keccak-256 over BLAKE2b-256. Address body hashes and
//!   checksums.
//!
//! The nested construction in `secure_hash` is a fixed part of the wire
//! format: addresses derived with any other composition will fail checksum
//! validation network-wide.

use blake2::digest::consts::U32;
use blake2::Blake2b;
use sha3::{Digest as _, Keccak256};

type Blake2b256 = Blake2b<U32>;

/// BLAKE2b-256 digest of `data`.
pub fn fast_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Keccak-256 digest of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Keccak-256 over BLAKE2b-256 of `data`.
pub fn secure_hash(data: &[u8]) -> [u8; 32] {
    keccak256(&fast_hash(data))
}
