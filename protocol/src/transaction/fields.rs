//! Field types and numeric checks shared across transaction shapes.

use serde::Deserialize;
use std::fmt;

use crate::codec::{ByteReader, ByteWriter};
use crate::config::{DIGEST_SIZE, MAX_ATTACHMENT_SIZE, MAX_LONG_VALUE};
use crate::crypto::Digest;
use crate::error::{DecodeError, ValidationError};

/// Identifier of an issued asset: the issue transaction's digest.
pub type AssetId = Digest;

// ---------------------------------------------------------------------------
// OptionalAsset
// ---------------------------------------------------------------------------

/// An asset reference where absence means the native token.
///
/// Wire form: one flag byte (`0x00` native, `0x01` issued) followed by the
/// 32-byte asset identifier when issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OptionalAsset(pub Option<AssetId>);

impl OptionalAsset {
    pub fn native() -> Self {
        Self(None)
    }

    pub fn issued(id: AssetId) -> Self {
        Self(Some(id))
    }

    pub fn is_native(&self) -> bool {
        self.0.is_none()
    }

    /// Encoded size: flag byte plus the identifier when present.
    pub fn len_bytes(&self) -> usize {
        match self.0 {
            Some(_) => 1 + DIGEST_SIZE,
            None => 1,
        }
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        match &self.0 {
            Some(id) => {
                writer.write_u8(1);
                writer.write_bytes(id.as_bytes());
            }
            None => writer.write_u8(0),
        }
    }

    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        match reader.read_u8()? {
            0 => Ok(Self(None)),
            1 => Ok(Self(Some(Digest::new(reader.read_array::<DIGEST_SIZE>()?)))),
            got => Err(DecodeError::UnknownDiscriminant {
                entity: "optional asset flag",
                got,
            }),
        }
    }
}

impl From<Option<AssetId>> for OptionalAsset {
    fn from(value: Option<AssetId>) -> Self {
        Self(value)
    }
}

impl fmt::Display for OptionalAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(id) => write!(f, "{id}"),
            None => write!(f, "CREST"),
        }
    }
}

impl serde::Serialize for OptionalAsset {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // The JSON surface uses `null` for the native token.
        self.0.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for OptionalAsset {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(Option::<AssetId>::deserialize(deserializer)?))
    }
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

/// Free-form bytes riding along with a transfer. Capped at 140 bytes by
/// [`Attachment::valid`]; the JSON form is base58.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Attachment(pub Vec<u8>);

impl Attachment {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn valid(&self) -> Result<(), ValidationError> {
        if self.0.len() > MAX_ATTACHMENT_SIZE {
            return Err(ValidationError::LengthOutOfBounds {
                field: "attachment",
                len: self.0.len(),
                min: 0,
                max: MAX_ATTACHMENT_SIZE,
            });
        }
        Ok(())
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u16_bytes(&self.0);
    }

    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self(reader.read_u16_bytes()?))
    }
}

impl serde::Serialize for Attachment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&bs58::encode(&self.0).into_string())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> serde::Deserialize<'de> for Attachment {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            let bytes = bs58::decode(&s)
                .into_vec()
                .map_err(serde::de::Error::custom)?;
            Ok(Self(bytes))
        } else {
            Ok(Self(<Vec<u8>>::deserialize(deserializer)?))
        }
    }
}

// ---------------------------------------------------------------------------
// Optional script
// ---------------------------------------------------------------------------

/// Writes an optional script as flag byte + `u16`-length-prefixed bytes.
pub(crate) fn write_script(writer: &mut ByteWriter, script: &Option<Vec<u8>>) {
    match script {
        Some(bytes) => {
            writer.write_u8(1);
            writer.write_u16_bytes(bytes);
        }
        None => writer.write_u8(0),
    }
}

pub(crate) fn read_script(reader: &mut ByteReader<'_>) -> Result<Option<Vec<u8>>, DecodeError> {
    match reader.read_u8()? {
        0 => Ok(None),
        1 => Ok(Some(reader.read_u16_bytes()?)),
        got => Err(DecodeError::UnknownDiscriminant {
            entity: "script flag",
            got,
        }),
    }
}

// ---------------------------------------------------------------------------
// Signed-64 numeric domain
// ---------------------------------------------------------------------------

/// A wire `u64` is acceptable only if non-negative when reinterpreted as a
/// signed 64-bit integer.
pub fn is_valid_long(value: u64) -> bool {
    value <= MAX_LONG_VALUE
}

/// Requires `value` to be within the signed-64 domain (zero allowed).
pub(crate) fn check_long(field: &'static str, value: u64) -> Result<(), ValidationError> {
    if !is_valid_long(value) {
        return Err(ValidationError::TooBig { field, value });
    }
    Ok(())
}

/// Requires `value` to be strictly positive and within the signed-64 domain.
pub(crate) fn check_positive_long(field: &'static str, value: u64) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::NonPositive { field });
    }
    check_long(field, value)
}

/// Adds `next` to a running sum, rejecting any overflow of the signed-64
/// domain. Used for mass-transfer fee+amount totals.
pub(crate) fn checked_sum(field: &'static str, acc: u64, next: u64) -> Result<u64, ValidationError> {
    match acc.checked_add(next) {
        Some(sum) if is_valid_long(sum) => Ok(sum),
        _ => Err(ValidationError::SumOverflow { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_LONG_VALUE;

    #[test]
    fn optional_asset_roundtrip() {
        for asset in [OptionalAsset::native(), OptionalAsset::issued(Digest::new([5u8; 32]))] {
            let mut w = ByteWriter::new();
            asset.write_to(&mut w);
            let bytes = w.into_vec();
            assert_eq!(bytes.len(), asset.len_bytes());
            let mut r = ByteReader::new(&bytes);
            assert_eq!(OptionalAsset::read_from(&mut r).unwrap(), asset);
        }
    }

    #[test]
    fn optional_asset_bad_flag_rejected() {
        let mut r = ByteReader::new(&[0x02]);
        assert!(matches!(
            OptionalAsset::read_from(&mut r),
            Err(DecodeError::UnknownDiscriminant {
                entity: "optional asset flag",
                got: 2
            })
        ));
    }

    #[test]
    fn optional_asset_json_uses_null_for_native() {
        assert_eq!(serde_json::to_string(&OptionalAsset::native()).unwrap(), "null");
        let issued = OptionalAsset::issued(Digest::new([1u8; 32]));
        let json = serde_json::to_string(&issued).unwrap();
        let back: OptionalAsset = serde_json::from_str(&json).unwrap();
        assert_eq!(issued, back);
    }

    #[test]
    fn attachment_cap_is_140() {
        assert!(Attachment::new(vec![0u8; 140]).valid().is_ok());
        assert!(Attachment::new(vec![0u8; 141]).valid().is_err());
    }

    #[test]
    fn attachment_roundtrip_base58_json() {
        let att = Attachment::new(b"invoice #42".to_vec());
        let json = serde_json::to_string(&att).unwrap();
        let back: Attachment = serde_json::from_str(&json).unwrap();
        assert_eq!(att, back);
    }

    #[test]
    fn script_helpers_roundtrip() {
        for script in [None, Some(vec![0x01, 0x02, 0x03])] {
            let mut w = ByteWriter::new();
            write_script(&mut w, &script);
            let bytes = w.into_vec();
            let mut r = ByteReader::new(&bytes);
            assert_eq!(read_script(&mut r).unwrap(), script);
        }
    }

    #[test]
    fn long_domain_boundaries() {
        assert!(is_valid_long(0));
        assert!(is_valid_long(MAX_LONG_VALUE));
        assert!(!is_valid_long(MAX_LONG_VALUE + 1));
        assert!(!is_valid_long(u64::MAX));
    }

    #[test]
    fn positive_long_rejects_zero_and_overflow() {
        assert!(check_positive_long("fee", 1).is_ok());
        assert!(matches!(
            check_positive_long("fee", 0),
            Err(ValidationError::NonPositive { field: "fee" })
        ));
        assert!(matches!(
            check_positive_long("fee", u64::MAX),
            Err(ValidationError::TooBig { field: "fee", .. })
        ));
    }

    #[test]
    fn checked_sum_rejects_wrap_and_signed_overflow() {
        assert_eq!(checked_sum("total", 2, 3).unwrap(), 5);
        assert!(checked_sum("total", MAX_LONG_VALUE, 1).is_err());
        assert!(checked_sum("total", u64::MAX, 1).is_err());
    }
}
