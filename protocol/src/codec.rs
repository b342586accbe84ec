//! Byte-level reader and writer for the canonical binary formats.
//!
//! Every transaction codec in this crate goes through [`ByteReader`] and
//! [`ByteWriter`]. The reader is a cursor whose every operation returns a
//! `Result` on underflow, so a truncated or malicious buffer surfaces a
//! typed [`DecodeError`] instead of a slice panic. All multi-byte integers
//! are big-endian on the wire.

use crate::error::DecodeError;

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// A bounds-checked cursor over an untrusted byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns `true` when the reader is exhausted.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::Underflow {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Returns the next byte without consuming it.
    pub fn peek_u8(&self) -> Result<u8, DecodeError> {
        if self.remaining() < 1 {
            return Err(DecodeError::Underflow {
                needed: 1,
                remaining: 0,
            });
        }
        Ok(self.data[self.pos])
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        let b = self.take(8)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        Ok(self.read_u64()? as i64)
    }

    /// Reads a boolean encoded as a single `0x00`/`0x01` byte. Any other
    /// value is a decode error, not a truthy byte.
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            got => Err(DecodeError::UnknownDiscriminant {
                entity: "boolean",
                got,
            }),
        }
    }

    /// Reads exactly `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        self.take(n)
    }

    /// Reads a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let slice = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Reads a `u16`-length-prefixed byte string.
    pub fn read_u16_bytes(&mut self) -> Result<Vec<u8>, DecodeError> {
        let len = self.read_u16()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    /// Reads a `u32`-length-prefixed byte string.
    pub fn read_u32_bytes(&mut self) -> Result<Vec<u8>, DecodeError> {
        let len = self.read_u32()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    /// Reads a `u16`-length-prefixed UTF-8 string.
    pub fn read_u16_string(&mut self, entity: &'static str) -> Result<String, DecodeError> {
        let bytes = self.read_u16_bytes()?;
        String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8(entity))
    }

    /// Reads a `u32`-length-prefixed UTF-8 string.
    pub fn read_u32_string(&mut self, entity: &'static str) -> Result<String, DecodeError> {
        let bytes = self.read_u32_bytes()?;
        String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8(entity))
    }

    /// Returns the unread tail without consuming it.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Errors unless the reader consumed the whole buffer.
    pub fn expect_end(&self) -> Result<(), DecodeError> {
        if self.remaining() != 0 {
            return Err(DecodeError::TrailingBytes {
                count: self.remaining(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ByteWriter
// ---------------------------------------------------------------------------

/// Growable buffer with the write-side mirror of [`ByteReader`].
///
/// Writing cannot fail; determinism is the only contract. Identical field
/// values must produce identical bytes, because the output feeds signing
/// and ID derivation.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(u8::from(v));
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a `u16` length prefix followed by the bytes. The caller is
    /// responsible for having validated that `bytes.len()` fits in a `u16`.
    pub fn write_u16_bytes(&mut self, bytes: &[u8]) {
        self.write_u16(bytes.len() as u16);
        self.write_bytes(bytes);
    }

    pub fn write_u32_bytes(&mut self, bytes: &[u8]) {
        self.write_u32(bytes.len() as u32);
        self.write_bytes(bytes);
    }

    pub fn write_u16_string(&mut self, s: &str) {
        self.write_u16_bytes(s.as_bytes());
    }

    pub fn write_u32_string(&mut self, s: &str) {
        self.write_u32_bytes(s.as_bytes());
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}
