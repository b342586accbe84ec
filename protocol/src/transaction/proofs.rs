//! The multi-proof authentication list attached to modern transactions.
//!
//! Wire form: `version(1) | u16 count | count x (u16 length | bytes)`. At
//! most 8 proofs, each at most 64 bytes. Position 0 is by convention the
//! sender's signature for plain accounts; script-guarded accounts may fill
//! further positions with script-specific material this layer treats as
//! opaque.

use serde::Deserialize;
use std::fmt;

use crate::codec::{ByteReader, ByteWriter};
use crate::config::{MAX_PROOFS, MAX_PROOF_SIZE, PROOFS_VERSION, SIGNATURE_SIZE};
use crate::crypto::{self, PublicKey, SecretKey, Signature};
use crate::error::{CryptoError, DecodeError};

/// Ordered list of opaque authentication byte strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proofs {
    pub version: u8,
    pub proofs: Vec<Vec<u8>>,
}

impl Default for Proofs {
    fn default() -> Self {
        Self::new()
    }
}

impl Proofs {
    /// An empty proofs list at the current format version.
    pub fn new() -> Self {
        Self {
            version: PROOFS_VERSION,
            proofs: Vec::new(),
        }
    }

    pub fn from_list(proofs: Vec<Vec<u8>>) -> Self {
        Self {
            version: PROOFS_VERSION,
            proofs,
        }
    }

    pub fn len(&self) -> usize {
        self.proofs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proofs.is_empty()
    }

    /// Signs `body` and stores the signature as the only proof. Re-signing
    /// resets the list rather than appending: slot 0 is the implicit
    /// signature slot for plain accounts.
    pub fn sign(&mut self, secret_key: &SecretKey, body: &[u8]) {
        let signature = crypto::sign(secret_key, body);
        self.version = PROOFS_VERSION;
        self.proofs = vec![signature.as_bytes().to_vec()];
    }

    /// Verifies the proof at slot 0 as a signature over `body`.
    ///
    /// Returns `Ok(false)` for a well-formed but non-matching signature.
    /// An empty list or a slot-0 proof of the wrong size is an error: the
    /// material is absent or malformed rather than merely wrong.
    pub fn verify(&self, public_key: &PublicKey, body: &[u8]) -> Result<bool, CryptoError> {
        let first = self.proofs.first().ok_or(CryptoError::EmptyProofs)?;
        if first.len() != SIGNATURE_SIZE {
            return Err(CryptoError::MalformedSignature(format!(
                "proof 0 has {} bytes, a signature needs {SIGNATURE_SIZE}",
                first.len()
            )));
        }
        let signature =
            Signature::from_slice(first).map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;
        Ok(crypto::verify(public_key, &signature, body))
    }

    /// Encoded size of the proofs blob.
    pub fn len_bytes(&self) -> usize {
        3 + self.proofs.iter().map(|p| 2 + p.len()).sum::<usize>()
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.version);
        writer.write_u16(self.proofs.len() as u16);
        for proof in &self.proofs {
            writer.write_u16_bytes(proof);
        }
    }

    pub fn marshal_binary(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(self.len_bytes());
        self.write_to(&mut w);
        w.into_vec()
    }

    /// Decodes a proofs blob, enforcing the format version and the count
    /// and per-proof size caps. Truncation at any point is a typed error.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let version = reader.read_u8()?;
        if version != PROOFS_VERSION {
            return Err(DecodeError::InvalidVersion {
                entity: "proofs",
                expected: PROOFS_VERSION,
                got: version,
            });
        }
        let count = reader.read_u16()? as usize;
        if count > MAX_PROOFS {
            return Err(DecodeError::LimitExceeded {
                entity: "proofs",
                limit: MAX_PROOFS,
                got: count,
            });
        }
        let mut proofs = Vec::with_capacity(count);
        for _ in 0..count {
            let proof = reader.read_u16_bytes()?;
            if proof.len() > MAX_PROOF_SIZE {
                return Err(DecodeError::LimitExceeded {
                    entity: "proof",
                    limit: MAX_PROOF_SIZE,
                    got: proof.len(),
                });
            }
            proofs.push(proof);
        }
        Ok(Self { version, proofs })
    }

    pub fn unmarshal_binary(data: &[u8]) -> Result<Self, DecodeError> {
        Self::read_from(&mut ByteReader::new(data))
    }
}

/// Presents a legacy signature as a one-element proofs list, the forward-
/// compatible view used at the canonical boundary.
impl From<Signature> for Proofs {
    fn from(signature: Signature) -> Self {
        Self {
            version: PROOFS_VERSION,
            proofs: vec![signature.as_bytes().to_vec()],
        }
    }
}

impl fmt::Display for Proofs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, proof) in self.proofs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", bs58::encode(proof).into_string())?;
        }
        write!(f, "]")
    }
}

impl serde::Serialize for Proofs {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.proofs.len()))?;
        for proof in &self.proofs {
            seq.serialize_element(&bs58::encode(proof).into_string())?;
        }
        seq.end()
    }
}

impl<'de> serde::Deserialize<'de> for Proofs {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        let mut proofs = Vec::with_capacity(strings.len());
        for s in strings {
            proofs.push(
                bs58::decode(&s)
                    .into_vec()
                    .map_err(serde::de::Error::custom)?,
            );
        }
        Ok(Self::from_list(proofs))
    }
}
