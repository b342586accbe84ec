//! Network-scoped account aliases.
//!
//! Layout: `version(1) | scheme(1) | u16-length-prefixed name`. The name is
//! constrained to 4..=30 bytes over `[a-z0-9_@.-]`, but the constraint is
//! enforced only by [`Alias::valid`]: construction and binary decoding are
//! deliberately permissive so that transactions carrying a malformed alias
//! can round-trip and be rejected at validation time. Callers that skip
//! `valid()` accept malformed aliases.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::codec::{ByteReader, ByteWriter};
use crate::config::{
    Scheme, ALIAS_ALPHABET, ALIAS_HEADER_SIZE, ALIAS_MAX_LENGTH, ALIAS_MIN_LENGTH, ALIAS_VERSION,
};
use crate::error::{DecodeError, ValidationError};

/// Text prefix of the alias string form `alias:<scheme>:<name>`.
const ALIAS_PREFIX: &str = "alias";

/// A human-registered account name bound to a network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias {
    /// Format version byte. [`Alias::new`] sets the current constant;
    /// [`Alias::valid`] rejects anything else.
    pub version: u8,
    /// Network the alias is bound to.
    pub scheme: Scheme,
    /// The registered name, unvalidated until [`Alias::valid`].
    pub name: String,
}

impl Alias {
    /// Constructs an alias without validating the name. Pair with
    /// [`Alias::valid`] before treating it as chain-acceptable.
    pub fn new(scheme: Scheme, name: impl Into<String>) -> Self {
        Self {
            version: ALIAS_VERSION,
            scheme,
            name: name.into(),
        }
    }

    /// Parses the text form `alias:<scheme-char>:<name>`.
    ///
    /// Requires exactly three colon-separated segments, the first literally
    /// `alias` and the second a single ASCII byte. The name segment is not
    /// checked against the alphabet here.
    pub fn from_string(s: &str) -> Result<Self, DecodeError> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(DecodeError::Malformed {
                entity: "alias",
                reason: format!("expected 3 colon-separated segments, got {}", parts.len()),
            });
        }
        if parts[0] != ALIAS_PREFIX {
            return Err(DecodeError::Malformed {
                entity: "alias",
                reason: format!("expected leading {ALIAS_PREFIX:?} segment, got {:?}", parts[0]),
            });
        }
        let scheme_seg = parts[1].as_bytes();
        if scheme_seg.len() != 1 {
            return Err(DecodeError::Malformed {
                entity: "alias",
                reason: format!("scheme segment must be one byte, got {:?}", parts[1]),
            });
        }
        Ok(Self::new(scheme_seg[0], parts[2]))
    }

    /// Checks the chain-acceptability rules: version constant, name length
    /// bounds, and alphabet.
    pub fn valid(&self) -> Result<(), ValidationError> {
        if self.version != ALIAS_VERSION {
            return Err(ValidationError::WrongVersion {
                entity: "alias",
                expected: ALIAS_VERSION,
                got: self.version,
            });
        }
        let len = self.name.len();
        if !(ALIAS_MIN_LENGTH..=ALIAS_MAX_LENGTH).contains(&len) {
            return Err(ValidationError::LengthOutOfBounds {
                field: "alias name",
                len,
                min: ALIAS_MIN_LENGTH,
                max: ALIAS_MAX_LENGTH,
            });
        }
        for ch in self.name.chars() {
            if !ALIAS_ALPHABET.contains(ch) {
                return Err(ValidationError::ForbiddenCharacter {
                    field: "alias name",
                    ch,
                });
            }
        }
        Ok(())
    }

    /// Encoded size: fixed header plus the name bytes.
    pub fn len_bytes(&self) -> usize {
        ALIAS_HEADER_SIZE + self.name.len()
    }

    /// The canonical binary form.
    pub fn bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(self.len_bytes());
        self.write_to(&mut w);
        w.into_vec()
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.version);
        writer.write_u8(self.scheme);
        writer.write_u16_string(&self.name);
    }

    /// Structural decode: version byte, scheme, length-prefixed name. Does
    /// not enforce the alphabet or length bounds.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let version = reader.read_u8()?;
        if version != ALIAS_VERSION {
            return Err(DecodeError::InvalidVersion {
                entity: "alias",
                expected: ALIAS_VERSION,
                got: version,
            });
        }
        let scheme = reader.read_u8()?;
        let name = reader.read_u16_string("alias name")?;
        Ok(Self {
            version,
            scheme,
            name,
        })
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        Self::read_from(&mut ByteReader::new(data))
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ALIAS_PREFIX}:{}:{}", self.scheme as char, self.name)
    }
}

impl FromStr for Alias {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl serde::Serialize for Alias {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.bytes())
        }
    }
}

impl<'de> serde::Deserialize<'de> for Alias {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Alias::from_string(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            Alias::from_bytes(&bytes).map_err(serde::de::Error::custom)
        }
    }
}
