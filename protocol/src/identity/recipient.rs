//! The recipient of a transfer-like operation: an address or an alias.
//!
//! The wire form carries no explicit tag; the leading version byte of the
//! payload discriminates (addresses start with the address version byte,
//! aliases with the alias version byte). The two constants are disjoint, so
//! a decoder peeks one byte and delegates. The variants consume different
//! byte counts (address: fixed 26, alias: 4 + name length), which every
//! embedding codec learns through the shared cursor.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::codec::{ByteReader, ByteWriter};
use crate::config::{ADDRESS_VERSION, ALIAS_VERSION};
use crate::error::{DecodeError, ValidationError};
use crate::identity::{Address, Alias};

/// Either branch, never both, never neither.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Recipient {
    Address(Address),
    Alias(Alias),
}

impl Recipient {
    pub fn is_address(&self) -> bool {
        matches!(self, Recipient::Address(_))
    }

    pub fn address(&self) -> Option<&Address> {
        match self {
            Recipient::Address(a) => Some(a),
            Recipient::Alias(_) => None,
        }
    }

    pub fn alias(&self) -> Option<&Alias> {
        match self {
            Recipient::Address(_) => None,
            Recipient::Alias(a) => Some(a),
        }
    }

    /// Returns the address branch, or an error for encoding contexts that
    /// cannot carry an alias.
    pub fn try_to_address(&self) -> Result<Address, ValidationError> {
        match self {
            Recipient::Address(a) => Ok(*a),
            Recipient::Alias(a) => Err(ValidationError::InvalidRecipient(format!(
                "context requires an address, got alias {a}"
            ))),
        }
    }

    /// Encoded size of whichever branch is populated.
    pub fn len_bytes(&self) -> usize {
        match self {
            Recipient::Address(_) => crate::config::ADDRESS_SIZE,
            Recipient::Alias(a) => a.len_bytes(),
        }
    }

    /// Validates the populated branch: checksum for an address, name rules
    /// for an alias.
    pub fn valid(&self) -> Result<(), ValidationError> {
        match self {
            Recipient::Address(a) => {
                if a.valid() {
                    Ok(())
                } else {
                    Err(ValidationError::InvalidAddress)
                }
            }
            Recipient::Alias(a) => a.valid(),
        }
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        match self {
            Recipient::Address(a) => a.write_to(writer),
            Recipient::Alias(a) => a.write_to(writer),
        }
    }

    /// Dispatches on the peeked version byte and consumes exactly the bytes
    /// of the populated branch.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        match reader.peek_u8()? {
            ADDRESS_VERSION => Ok(Recipient::Address(Address::read_from(reader)?)),
            ALIAS_VERSION => Ok(Recipient::Alias(Alias::read_from(reader)?)),
            got => Err(DecodeError::UnknownDiscriminant {
                entity: "recipient",
                got,
            }),
        }
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        Self::read_from(&mut ByteReader::new(data))
    }
}

impl From<Address> for Recipient {
    fn from(a: Address) -> Self {
        Recipient::Address(a)
    }
}

impl From<Alias> for Recipient {
    fn from(a: Alias) -> Self {
        Recipient::Alias(a)
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::Address(a) => write!(f, "{a}"),
            Recipient::Alias(a) => write!(f, "{a}"),
        }
    }
}

impl FromStr for Recipient {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("alias:") {
            Ok(Recipient::Alias(Alias::from_string(s)?))
        } else {
            Ok(Recipient::Address(Address::from_string(s)?))
        }
    }
}

impl serde::Serialize for Recipient {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Recipient::Address(a) => a.serialize(serializer),
            Recipient::Alias(a) => a.serialize(serializer),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Recipient {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Recipient::from_str(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            Recipient::from_bytes(&bytes).map_err(serde::de::Error::custom)
        }
    }
}
