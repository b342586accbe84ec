//! Error taxonomy for the codec and signing layers.
//!
//! Three disjoint families, mirroring how callers must react:
//!
//! - [`DecodeError`] - structural failures on untrusted bytes. Always
//!   recoverable (reject the transaction), never a panic.
//! - [`ValidationError`] - the bytes decoded fine but a field violates a
//!   protocol rule. Raised by `validate`, distinct from decode.
//! - [`CryptoError`] - the hash/sign/verify adapter could not run, or
//!   required authentication material is absent or malformed. Fatal for the
//!   operation, no retry.
//!
//! Every codec function returns a `Result`; wrapping preserves the innermost
//! cause plus a readable path for diagnostics.

use thiserror::Error;

/// Structural failure while decoding untrusted bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ended before a read of `needed` bytes could complete.
    #[error("not enough data: need {needed} more bytes, {remaining} remaining")]
    Underflow { needed: usize, remaining: usize },

    /// A version byte did not match the expected constant.
    #[error("invalid {entity} version: expected {expected}, got {got}")]
    InvalidVersion {
        entity: &'static str,
        expected: u8,
        got: u8,
    },

    /// A version byte outside the range this codec understands.
    #[error("unsupported {entity} version {got}")]
    UnsupportedVersion { entity: &'static str, got: u8 },

    /// A discriminant byte matched no known variant.
    #[error("unknown {entity} discriminant {got}")]
    UnknownDiscriminant { entity: &'static str, got: u8 },

    /// The leading transaction type byte matched no registered shape.
    #[error("unknown transaction type {0}")]
    UnknownTransactionType(u8),

    /// A fixed-size field had the wrong length.
    #[error("invalid {entity} length: expected {expected} bytes, got {got}")]
    InvalidLength {
        entity: &'static str,
        expected: usize,
        got: usize,
    },

    /// A count or size prefix exceeded the protocol cap for its field.
    #[error("{entity} limit exceeded: {got} > {limit}")]
    LimitExceeded {
        entity: &'static str,
        limit: usize,
        got: usize,
    },

    /// The recomputed checksum differs from the encoded one.
    #[error("checksum mismatch")]
    ChecksumMismatch,

    /// A scheme byte in the payload is bound to a different network.
    #[error("scheme mismatch: expected {expected}, got {got}")]
    SchemeMismatch { expected: u8, got: u8 },

    /// Bytes remained after a complete decode.
    #[error("{count} trailing bytes after complete decode")]
    TrailingBytes { count: usize },

    /// A base58 string could not be decoded.
    #[error("invalid base58 string: {0}")]
    Base58(String),

    /// A length-prefixed string was not valid UTF-8.
    #[error("invalid utf-8 in {0}")]
    InvalidUtf8(&'static str),

    /// A text form did not match its expected layout.
    #[error("malformed {entity}: {reason}")]
    Malformed {
        entity: &'static str,
        reason: String,
    },

    /// Wraps an inner failure with the decoding path that led to it.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Wraps `self` with a human-readable decoding path.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DecodeError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Extension for attaching a decoding path to a `Result`.
pub trait DecodeContext<T> {
    /// Maps the error side through [`DecodeError::with_context`].
    fn ctx(self, context: &'static str) -> Result<T, DecodeError>;
}

impl<T> DecodeContext<T> for Result<T, DecodeError> {
    fn ctx(self, context: &'static str) -> Result<T, DecodeError> {
        self.map_err(|e| e.with_context(context))
    }
}

/// Semantic failure: the value decoded but violates a protocol rule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A quantity that must be strictly positive was zero.
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },

    /// A quantity fell outside the non-negative signed 64-bit domain.
    #[error("{field} is too big: {value} exceeds the signed 64-bit bound")]
    TooBig { field: &'static str, value: u64 },

    /// A running sum of quantities overflowed the signed 64-bit domain.
    #[error("sum of {field} overflows the signed 64-bit bound")]
    SumOverflow { field: &'static str },

    /// A string or byte field fell outside its permitted length bounds.
    #[error("{field} length {len} is out of bounds [{min}, {max}]")]
    LengthOutOfBounds {
        field: &'static str,
        len: usize,
        min: usize,
        max: usize,
    },

    /// A character outside the permitted alphabet.
    #[error("{field} contains forbidden character {ch:?}")]
    ForbiddenCharacter { field: &'static str, ch: char },

    /// A stored version byte does not match the required constant.
    #[error("{entity} carries version {got}, expected {expected}")]
    WrongVersion {
        entity: &'static str,
        expected: u8,
        got: u8,
    },

    /// A list exceeded its entry-count cap.
    #[error("too many {field}: {count} > {max}")]
    TooMany {
        field: &'static str,
        count: usize,
        max: usize,
    },

    /// An encoded form exceeded its byte budget.
    #[error("{field} occupies {size} bytes, cap is {max}")]
    SizeExceeded {
        field: &'static str,
        size: usize,
        max: usize,
    },

    /// Two entries share a key.
    #[error("duplicate key {key:?}")]
    DuplicateKey { key: String },

    /// A delete entry appeared in a representation that cannot carry it.
    #[error("delete entries are not representable in the legacy binary format")]
    DeleteNotRepresentable,

    /// A list argument contains another list.
    #[error("list arguments cannot contain lists")]
    NestedListArgument,

    /// Buy and sell orders do not have opposite order types.
    #[error("exchange orders must have opposite types")]
    OrdersNotOpposite,

    /// The two orders name different matcher public keys.
    #[error("order matcher public keys do not match")]
    MatcherMismatch,

    /// The two orders trade different asset pairs.
    #[error("order asset pairs do not match")]
    AssetPairMismatch,

    /// An order expiration is out of the window allowed around the
    /// transaction timestamp.
    #[error("order expiration {expiration} is outside the allowed window of timestamp {timestamp}")]
    ExpirationOutOfBounds { expiration: u64, timestamp: u64 },

    /// The settlement price lies outside the orders' limit prices.
    #[error("price {price} is outside the order limits [{min}, {max}]")]
    PriceOutOfBounds { price: u64, min: u64, max: u64 },

    /// A value is bound to a different network than required.
    #[error("{entity} scheme mismatch: expected {expected}, got {got}")]
    SchemeMismatch {
        entity: &'static str,
        expected: u8,
        got: u8,
    },

    /// The address version or checksum failed recomputation.
    #[error("address failed structural validation")]
    InvalidAddress,

    /// A recipient failed validation.
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),
}

/// Failure in the cryptographic adapter or absent authentication material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// The operation requires a signature but none is attached.
    #[error("no signature attached to {0}")]
    MissingSignature(&'static str),

    /// The operation requires proofs but none are attached.
    #[error("no proofs attached to {0}")]
    MissingProofs(&'static str),

    /// A proofs list with zero entries cannot authenticate anything.
    #[error("proofs list is empty")]
    EmptyProofs,

    /// The stored signature or proof has the wrong shape for the scheme.
    #[error("malformed signature material: {0}")]
    MalformedSignature(String),

    /// Key bytes do not form a valid key for the signature scheme.
    #[error("invalid key material")]
    InvalidKey,

    /// The transaction has no identifier yet.
    #[error("transaction id has not been generated")]
    MissingId,

    /// The operation does not exist for this transaction family.
    #[error("operation not supported for {0}")]
    Unsupported(&'static str),
}

/// Top-level error for operations that can fail in more than one family.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
