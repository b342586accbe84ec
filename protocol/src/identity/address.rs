//! Fixed 26-byte account addresses.
//!
//! Layout: `version(1) | scheme(1) | body_hash(20) | checksum(4)` where
//! `body_hash` is the first 20 bytes of `secure_hash(public_key)` and the
//! checksum is the first 4 bytes of `secure_hash` over the preceding 22
//! bytes. Addresses are immutable once constructed; every constructor other
//! than [`Address::from_public_key`] validates the version byte and
//! checksum.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::codec::{ByteReader, ByteWriter};
use crate::config::{
    Scheme, ADDRESS_BODY_SIZE, ADDRESS_SIZE, ADDRESS_VERSION, CHECKSUM_SIZE,
};
use crate::crypto::{secure_hash, PublicKey};
use crate::error::DecodeError;

/// A checksummed account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    /// Derives the address of `public_key` on the network identified by
    /// `scheme`. Deterministic and infallible.
    pub fn from_public_key(scheme: Scheme, public_key: &PublicKey) -> Self {
        let body_hash = secure_hash(public_key.as_bytes());
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes[0] = ADDRESS_VERSION;
        bytes[1] = scheme;
        bytes[2..2 + ADDRESS_BODY_SIZE].copy_from_slice(&body_hash[..ADDRESS_BODY_SIZE]);
        let checksum = Self::checksum(&bytes[..ADDRESS_SIZE - CHECKSUM_SIZE]);
        bytes[ADDRESS_SIZE - CHECKSUM_SIZE..].copy_from_slice(&checksum);
        Self(bytes)
    }

    /// Decodes an address from the front of `data`, validating the version
    /// byte and checksum. Trailing bytes beyond the 26 address bytes are
    /// ignored so callers may pass a larger buffer the address prefixes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < ADDRESS_SIZE {
            return Err(DecodeError::Underflow {
                needed: ADDRESS_SIZE,
                remaining: data.len(),
            });
        }
        if data[0] != ADDRESS_VERSION {
            return Err(DecodeError::InvalidVersion {
                entity: "address",
                expected: ADDRESS_VERSION,
                got: data[0],
            });
        }
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes.copy_from_slice(&data[..ADDRESS_SIZE]);
        let expected = Self::checksum(&bytes[..ADDRESS_SIZE - CHECKSUM_SIZE]);
        if bytes[ADDRESS_SIZE - CHECKSUM_SIZE..] != expected {
            return Err(DecodeError::ChecksumMismatch);
        }
        Ok(Self(bytes))
    }

    /// Decodes the base58 text form, then delegates to
    /// [`Address::from_bytes`].
    pub fn from_string(s: &str) -> Result<Self, DecodeError> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|e| DecodeError::Base58(e.to_string()))?;
        Self::from_bytes(&decoded)
    }

    /// Reads exactly 26 address bytes from the cursor.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let bytes = reader.read_array::<ADDRESS_SIZE>()?;
        Self::from_bytes(&bytes)
    }

    /// Appends the 26 address bytes to the writer.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.0);
    }

    /// Recomputes the version and checksum invariants.
    pub fn valid(&self) -> bool {
        self.0[0] == ADDRESS_VERSION
            && self.0[ADDRESS_SIZE - CHECKSUM_SIZE..]
                == Self::checksum(&self.0[..ADDRESS_SIZE - CHECKSUM_SIZE])
    }

    pub fn version(&self) -> u8 {
        self.0[0]
    }

    pub fn scheme(&self) -> Scheme {
        self.0[1]
    }

    /// The truncated public-key hash inside the address.
    pub fn body_hash(&self) -> &[u8] {
        &self.0[2..2 + ADDRESS_BODY_SIZE]
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }

    fn checksum(data: &[u8]) -> [u8; CHECKSUM_SIZE] {
        let digest = secure_hash(data);
        let mut out = [0u8; CHECKSUM_SIZE];
        out.copy_from_slice(&digest[..CHECKSUM_SIZE]);
        out
    }

    #[cfg(test)]
    pub(crate) fn from_raw_unchecked(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl FromStr for Address {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_base58())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            bs58::decode(&s)
                .into_vec()
                .map_err(serde::de::Error::custom)?
        } else {
            <Vec<u8>>::deserialize(deserializer)?
        };
        // The text surface is stricter than the binary path: exactly 26
        // bytes, no trailing tolerance.
        if bytes.len() != ADDRESS_SIZE {
            return Err(serde::de::Error::custom(format!(
                "address payload must be exactly {ADDRESS_SIZE} bytes, got {}",
                bytes.len()
            )));
        }
        Address::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAINNET_SCHEME, TESTNET_SCHEME};

    fn reference_pk() -> PublicKey {
        PublicKey::from_base58("5CnGfSjguYfzWzaRmbxzCbF5qRNGTXEvayytSANkqQ6A").unwrap()
    }

    #[test]
    fn mainnet_address_matches_reference_vector() {
        let addr = Address::from_public_key(MAINNET_SCHEME, &reference_pk());
        assert_eq!(addr.to_base58(), "3PQ8bp1aoqHQo3icNqFv6VM36V1jzPeaG1v");
    }

    #[test]
    fn testnet_address_matches_reference_vector() {
        let addr = Address::from_public_key(TESTNET_SCHEME, &reference_pk());
        assert_eq!(addr.to_base58(), "3NC7nrggwhk2AbRC7kzv92yDjbVyALeGzE5");
    }

    #[test]
    fn derived_addresses_are_valid() {
        let kp = crate::crypto::Keypair::generate();
        for scheme in [MAINNET_SCHEME, TESTNET_SCHEME, b'X', 0x00] {
            let addr = Address::from_public_key(scheme, &kp.public_key());
            assert!(addr.valid());
            assert_eq!(addr.scheme(), scheme);
            assert_eq!(addr.version(), ADDRESS_VERSION);
        }
    }

    #[test]
    fn string_roundtrip() {
        let addr = Address::from_public_key(TESTNET_SCHEME, &reference_pk());
        let recovered = Address::from_string(&addr.to_base58()).unwrap();
        assert_eq!(addr, recovered);
    }

    #[test]
    fn from_bytes_tolerates_trailing_bytes() {
        let addr = Address::from_public_key(TESTNET_SCHEME, &reference_pk());
        let mut buf = addr.as_bytes().to_vec();
        buf.extend_from_slice(b"trailing payload");
        assert_eq!(Address::from_bytes(&buf).unwrap(), addr);
    }

    #[test]
    fn from_bytes_rejects_short_buffer() {
        assert!(matches!(
            Address::from_bytes(&[ADDRESS_VERSION; 10]),
            Err(DecodeError::Underflow { .. })
        ));
    }

    #[test]
    fn from_bytes_rejects_bad_version() {
        let addr = Address::from_public_key(TESTNET_SCHEME, &reference_pk());
        let mut bytes = *addr.as_bytes();
        bytes[0] = 0x03;
        assert!(matches!(
            Address::from_bytes(&bytes),
            Err(DecodeError::InvalidVersion { entity: "address", .. })
        ));
    }

    #[test]
    fn corrupting_checksum_region_invalidates() {
        let addr = Address::from_public_key(MAINNET_SCHEME, &reference_pk());
        for i in ADDRESS_SIZE - CHECKSUM_SIZE..ADDRESS_SIZE {
            let mut bytes = *addr.as_bytes();
            bytes[i] ^= 0xFF;
            let corrupted = Address::from_raw_unchecked(bytes);
            assert!(!corrupted.valid(), "corrupt byte {i} must invalidate");
            assert!(matches!(
                Address::from_bytes(&bytes),
                Err(DecodeError::ChecksumMismatch)
            ));
        }
    }

    #[test]
    fn json_roundtrip_is_strict_about_length() {
        let addr = Address::from_public_key(TESTNET_SCHEME, &reference_pk());
        let json = serde_json::to_string(&addr).unwrap();
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);

        // The binary path accepts trailing bytes; the JSON path must not.
        let mut padded = addr.as_bytes().to_vec();
        padded.push(0x00);
        let padded_json = format!("\"{}\"", bs58::encode(&padded).into_string());
        assert!(serde_json::from_str::<Address>(&padded_json).is_err());
    }

    #[test]
    fn invalid_base58_is_wrapped() {
        assert!(matches!(
            Address::from_string("not base58 0OIl"),
            Err(DecodeError::Base58(_))
        ));
    }

    #[test]
    fn cursor_roundtrip() {
        let addr = Address::from_public_key(TESTNET_SCHEME, &reference_pk());
        let mut w = ByteWriter::new();
        addr.write_to(&mut w);
        let bytes = w.into_vec();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(Address::read_from(&mut r).unwrap(), addr);
        assert!(r.is_empty());
    }
}
