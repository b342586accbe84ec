// Copyright (c) 2026 Crest Protocol Developers. MIT License.
// See LICENSE for details.

//! # Crest Protocol - Transaction Encoding and Identity
//!
//! The consensus-critical byte layer of a Crest node: how every
//! transaction is represented as bytes, how that representation is
//! authenticated, and how canonical identifiers are derived. Two
//! independent implementations that disagree on a single byte here will
//! fork from each other, so determinism and exact bounds checking are the
//! governing concerns throughout.
//!
//! ## Architecture
//!
//! - **config** - Network schemes and every consensus constant.
//! - **error** - The decode / validation / crypto error taxonomy.
//! - **codec** - Bounds-checked byte cursor shared by all wire formats.
//! - **crypto** - Hashing and signature adapter; the only place concrete
//!   primitives are named.
//! - **identity** - Address, alias, and recipient encoding.
//! - **transaction** - Body codecs for every shape, the envelope
//!   dispatcher, authentication, and the signing/ID protocol.
//!
//! ## Invariants
//!
//! 1. Marshalling is a pure function of field values: identical fields,
//!    identical bytes.
//! 2. Untrusted input never panics; every slice is preceded by a typed
//!    length check.
//! 3. Wire formats carry no identifiers; decoding recomputes them.
//! 4. Historical quirks (legacy zero padding, the genesis
//!    pseudo-signature, alias-derived identifiers) are preserved exactly;
//!    "fixing" them would orphan the chain.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod transaction;

pub use config::Scheme;
pub use error::{CryptoError, DecodeError, Error, ValidationError};
pub use identity::{Address, Alias, Recipient};
pub use transaction::{bytes_to_transaction, Transaction, Transactional, TransactionType};
