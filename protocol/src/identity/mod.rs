//! Account identity encoding: addresses, aliases, recipients.
//!
//! An [`Address`] is the hash-derived, checksummed form of a public key.
//! An [`Alias`] is a short human-registered name bound to a network. A
//! [`Recipient`] is the sum of the two, discriminated on the wire by the
//! leading version byte rather than an explicit tag.

pub mod address;
pub mod alias;
pub mod recipient;

pub use address::Address;
pub use alias::Alias;
pub use recipient::Recipient;
