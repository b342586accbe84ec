//! Protocol constants and network parameters.
//!
//! Everything here is consensus-critical: a node that disagrees with any of
//! these values will accept or reject transactions differently from the rest
//! of the network. Values are plain constants rather than runtime
//! configuration for that reason.

/// Single byte identifying which network a value is bound to.
///
/// Addresses, aliases, and transaction bodies all mix the scheme into their
/// canonical bytes, so a signature produced for one network never verifies
/// on another.
pub type Scheme = u8;

/// Main network scheme byte.
pub const MAINNET_SCHEME: Scheme = b'W';
/// Test network scheme byte.
pub const TESTNET_SCHEME: Scheme = b'T';
/// Developer network scheme byte.
pub const DEVNET_SCHEME: Scheme = b'D';

/// Version byte leading every address.
pub const ADDRESS_VERSION: u8 = 0x01;
/// Total encoded address size: version(1) | scheme(1) | body hash(20) | checksum(4).
pub const ADDRESS_SIZE: usize = 26;
/// Length of the truncated public-key hash inside an address.
pub const ADDRESS_BODY_SIZE: usize = 20;
/// Length of the truncated checksum trailing an address.
pub const CHECKSUM_SIZE: usize = 4;

/// Version byte leading every alias.
pub const ALIAS_VERSION: u8 = 0x02;
/// Minimum alias name length in bytes.
pub const ALIAS_MIN_LENGTH: usize = 4;
/// Maximum alias name length in bytes.
pub const ALIAS_MAX_LENGTH: usize = 30;
/// Characters permitted in an alias name.
pub const ALIAS_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789_@.-";
/// Fixed overhead of an encoded alias: version(1) | scheme(1) | length(2).
pub const ALIAS_HEADER_SIZE: usize = 4;

/// Format-version byte leading an encoded proofs list.
pub const PROOFS_VERSION: u8 = 0x01;
/// Maximum number of proofs a transaction may carry.
pub const MAX_PROOFS: usize = 8;
/// Maximum size of a single proof in bytes.
pub const MAX_PROOF_SIZE: usize = 64;

/// Size of a secret key in bytes.
pub const SECRET_KEY_SIZE: usize = 32;
/// Size of a public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;
/// Size of a legacy signature in bytes.
pub const SIGNATURE_SIZE: usize = 64;
/// Size of a digest (transaction/asset/lease identifier) in bytes.
pub const DIGEST_SIZE: usize = 32;

/// Largest wire value representable in the signed 64-bit numeric domain.
///
/// Amounts, fees, prices, and timestamps travel as unsigned 64-bit integers
/// but must remain non-negative when reinterpreted as signed, matching the
/// reference numeric domain. Anything above this bound is rejected.
pub const MAX_LONG_VALUE: u64 = i64::MAX as u64;

/// Minimum asset name length in bytes.
pub const MIN_ASSET_NAME_LENGTH: usize = 4;
/// Maximum asset name length in bytes.
pub const MAX_ASSET_NAME_LENGTH: usize = 16;
/// Maximum asset description length in bytes.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;
/// Maximum number of decimal places an asset may declare.
pub const MAX_DECIMALS: u8 = 8;

/// Maximum attachment size in bytes.
pub const MAX_ATTACHMENT_SIZE: usize = 140;

/// Maximum number of entries in a mass-transfer transaction.
pub const MAX_TRANSFERS: usize = 100;

/// Maximum number of entries in a data transaction.
pub const MAX_DATA_ENTRIES: usize = 100;
/// Base byte budget for a data transaction.
pub const DATA_TX_BASE_BYTES: usize = 150 * 1024;
/// Hard byte cap on an encoded data transaction: 1.2 x the base budget.
pub const MAX_DATA_TX_BYTES: usize = DATA_TX_BASE_BYTES / 5 * 6;

/// Maximum lifetime of an exchange order relative to the transaction
/// timestamp, in milliseconds (30 days).
pub const MAX_ORDER_TTL_MS: u64 = 30 * 24 * 60 * 60 * 1000;

/// Maximum number of arguments to an invoked function.
pub const MAX_INVOKE_ARGUMENTS: usize = 22;
/// Maximum length of an invoked function name in bytes.
pub const MAX_FUNCTION_NAME_BYTES: usize = 255;
/// Byte cap on the legacy binary form of an invoke-script transaction.
pub const MAX_INVOKE_TX_BYTES: usize = 5 * 1024;
