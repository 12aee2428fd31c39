//! Deterministic byte encoding for route-processor instructions.
//!
//! `ByteEncoder` appends fixed-width primitives in big-endian (network) order
//! to a growing buffer. It is the single place where route instructions turn
//! into bytes, so every width and range check lives here.
//!
//! # Layout Rules
//!
//! - Unsigned integers are left-padded to exactly `width / 8` bytes
//! - Addresses are exactly 20 bytes, never padded
//! - Booleans are a single `0x01` / `0x00` byte
//! - Raw byte slices are appended verbatim with no length prefix
//!
//! The canonical external form is lowercase hex with a `0x` prefix.

use crate::errors::EncodingError;
use crate::EncodingResult;
use alloy::primitives::Address;
use num_bigint::BigUint;

/// Builder that accumulates big-endian encoded primitives.
///
/// Appends return the encoder itself so calls can be chained with `?`:
///
/// ```
/// use route_calldata_compiler::encoding::ByteEncoder;
///
/// let mut encoder = ByteEncoder::new();
/// encoder.append_uint8(1u8)?.append_bool(true).append_uint16(0x0102u16)?;
/// assert_eq!(encoder.to_hex(), "0x01010102");
/// # Ok::<(), route_calldata_compiler::errors::EncodingError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteEncoder {
    buf: Vec<u8>,
}

impl ByteEncoder {
    /// Create an empty encoder.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Create an empty encoder with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append an unsigned integer of `width` bits, most-significant byte first.
    fn append_uint(&mut self, width: u16, value: BigUint) -> EncodingResult<&mut Self> {
        if value.bits() > u64::from(width) {
            return Err(EncodingError::Range {
                width,
                value: value.to_string(),
            });
        }

        let size = usize::from(width / 8);
        let bytes = value.to_bytes_be();
        self.buf.extend(std::iter::repeat(0u8).take(size - bytes.len()));
        self.buf.extend_from_slice(&bytes);
        Ok(self)
    }

    pub fn append_uint8(&mut self, value: impl Into<BigUint>) -> EncodingResult<&mut Self> {
        self.append_uint(8, value.into())
    }

    pub fn append_uint16(&mut self, value: impl Into<BigUint>) -> EncodingResult<&mut Self> {
        self.append_uint(16, value.into())
    }

    /// Append a 24-bit unsigned integer, the width used for pool fee tiers.
    pub fn append_uint24(&mut self, value: impl Into<BigUint>) -> EncodingResult<&mut Self> {
        self.append_uint(24, value.into())
    }

    pub fn append_uint32(&mut self, value: impl Into<BigUint>) -> EncodingResult<&mut Self> {
        self.append_uint(32, value.into())
    }

    pub fn append_uint64(&mut self, value: impl Into<BigUint>) -> EncodingResult<&mut Self> {
        self.append_uint(64, value.into())
    }

    pub fn append_uint128(&mut self, value: impl Into<BigUint>) -> EncodingResult<&mut Self> {
        self.append_uint(128, value.into())
    }

    pub fn append_uint256(&mut self, value: impl Into<BigUint>) -> EncodingResult<&mut Self> {
        self.append_uint(256, value.into())
    }

    /// Append a 20-byte chain address.
    ///
    /// # Errors
    ///
    /// Returns `EncodingError::InvalidAddress` when `address` is not exactly 20 bytes.
    pub fn append_address(&mut self, address: &[u8]) -> EncodingResult<&mut Self> {
        if address.len() != Address::len_bytes() {
            return Err(EncodingError::InvalidAddress {
                input: format!("0x{}", hex::encode(address)),
            });
        }
        self.buf.extend_from_slice(address);
        Ok(self)
    }

    /// Parse a hex address string (with or without `0x`) and append it.
    ///
    /// # Errors
    ///
    /// Returns `EncodingError::InvalidAddress` for non-hex input or a length
    /// other than 20 bytes.
    pub fn append_address_str(&mut self, address: &str) -> EncodingResult<&mut Self> {
        let trimmed = address.trim();
        let stripped = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        match hex::decode(stripped) {
            Ok(bytes) if bytes.len() == Address::len_bytes() => self.append_address(&bytes),
            _ => Err(EncodingError::InvalidAddress {
                input: address.to_string(),
            }),
        }
    }

    /// Append a single `0x01` / `0x00` byte.
    pub fn append_bool(&mut self, value: bool) -> &mut Self {
        self.buf.push(u8::from(value));
        self
    }

    /// Append raw bytes verbatim. Any length prefix is the caller's concern.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Snapshot of the accumulated bytes. The encoder remains usable.
    pub fn finalize(&self) -> Vec<u8> {
        self.buf.clone()
    }

    /// Consume the encoder and return its buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Canonical representation: lowercase hex, `0x`-prefixed, no separators.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.buf))
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
