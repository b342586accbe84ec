//! Keys, signatures, and digests as fixed-size newtypes.
//!
//! Every value here has a base58 text form used across the JSON surface and
//! in diagnostics. Human-readable serializers emit base58 strings; binary
//! serializers emit raw bytes. Secret keys never appear in `Debug` output.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::config::{DIGEST_SIZE, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE, SIGNATURE_SIZE};
use crate::error::DecodeError;

macro_rules! base58_bytes_newtype {
    ($name:ident, $size:expr, $entity:expr) => {
        impl $name {
            /// Wraps raw bytes without further checks.
            pub fn new(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }

            /// Copies from a slice, validating the length.
            pub fn from_slice(slice: &[u8]) -> Result<Self, DecodeError> {
                if slice.len() != $size {
                    return Err(DecodeError::InvalidLength {
                        entity: $entity,
                        expected: $size,
                        got: slice.len(),
                    });
                }
                let mut bytes = [0u8; $size];
                bytes.copy_from_slice(slice);
                Ok(Self(bytes))
            }

            /// Parses the base58 text form.
            pub fn from_base58(s: &str) -> Result<Self, DecodeError> {
                let decoded = bs58::decode(s)
                    .into_vec()
                    .map_err(|e| DecodeError::Base58(e.to_string()))?;
                Self::from_slice(&decoded)
            }

            pub fn as_bytes(&self) -> &[u8; $size] {
                &self.0
            }

            pub fn to_base58(&self) -> String {
                bs58::encode(&self.0).into_string()
            }
        }

        impl From<[u8; $size]> for $name {
            fn from(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_base58())
            }
        }

        impl FromStr for $name {
            type Err = DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_base58(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&self.to_base58())
                } else {
                    serializer.serialize_bytes(&self.0)
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let s = String::deserialize(deserializer)?;
                    Self::from_base58(&s).map_err(serde::de::Error::custom)
                } else {
                    let bytes = <Vec<u8>>::deserialize(deserializer)?;
                    Self::from_slice(&bytes).map_err(serde::de::Error::custom)
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// SecretKey
// ---------------------------------------------------------------------------

/// The private half of an account key. 32 bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SecretKey([u8; SECRET_KEY_SIZE]);

base58_bytes_newtype!(SecretKey, SECRET_KEY_SIZE, "secret key");

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secret material stays out of logs, partial leaks included.
        write!(f, "SecretKey(***)")
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// The public half of an account key. 32 bytes, safe to share.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

base58_bytes_newtype!(PublicKey, PUBLIC_KEY_SIZE, "public key");

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_base58())
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A legacy 64-byte signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_SIZE]);

base58_bytes_newtype!(Signature, SIGNATURE_SIZE, "signature");

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_base58())
    }
}

// ---------------------------------------------------------------------------
// Digest
// ---------------------------------------------------------------------------

/// A 32-byte digest used as a transaction, asset, or lease identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_SIZE]);

base58_bytes_newtype!(Digest, DIGEST_SIZE, "digest");

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_base58())
    }
}

// ---------------------------------------------------------------------------
// Signing adapter
// ---------------------------------------------------------------------------

/// Signs `message` with `secret_key`. Deterministic for a fixed pair.
pub fn sign(secret_key: &SecretKey, message: &[u8]) -> Signature {
    let signing_key = SigningKey::from_bytes(&secret_key.0);
    Signature(signing_key.sign(message).to_bytes())
}

/// Verifies `signature` over `message` against `public_key`.
///
/// Returns `false` both for a wrong signature and for public-key bytes that
/// do not form a valid verification key. Callers that need to distinguish
/// absence or malformation of material do so before reaching this point.
pub fn verify(public_key: &PublicKey, signature: &Signature, message: &[u8]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify(message, &sig).is_ok()
}

// ---------------------------------------------------------------------------
// Keypair
// ---------------------------------------------------------------------------

/// A secret/public key pair.
///
/// Intentionally does not implement `Serialize`; exporting secret material
/// is an explicit act via [`Keypair::secret_key`].
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generates a fresh keypair from the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Derives a keypair deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SECRET_KEY_SIZE]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    pub fn secret_key(&self) -> SecretKey {
        SecretKey(self.signing_key.to_bytes())
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }

    pub fn verify(&self, signature: &Signature, message: &[u8]) -> bool {
        verify(&self.public_key(), signature, message)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair(pub={})", self.public_key().to_base58())
    }
}
