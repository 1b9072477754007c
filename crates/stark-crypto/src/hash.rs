//! Message hash normalization.
//!
//! Signing operates on a [`MessageHash`], a field element below `P`. Raw inputs
//! are either validated strictly with [`normalize`] (anything out of range is an
//! error) or, for fixed-width digests such as Keccak-256 output, reduced with
//! [`reduce_digest`], which reports whether the value changed.

use crypto_bigint::{Encoding, U256};

use crate::constants::FIELD_PRIME;
use crate::encoding::{uint_from_be_slice, uint_from_hex};
use crate::error::{CryptoError, Result};
use crate::field::FieldElement;

/// A message hash ready for signing: an integer in `[0, P)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHash(FieldElement);

impl MessageHash {
    /// Validate an integer as a message hash.
    ///
    /// # Errors
    /// Returns `CryptoError::InvalidMessageHash` if `value >= P`.
    pub fn new(value: U256) -> Result<Self> {
        if value >= FIELD_PRIME {
            return Err(CryptoError::InvalidMessageHash(
                "value is not below the field prime".into(),
            ));
        }
        Ok(Self(FieldElement::from_uint_unchecked(&value)))
    }

    pub fn from_field_element(element: FieldElement) -> Self {
        Self(element)
    }

    pub fn from_hex(input: &str) -> Result<Self> {
        normalize(RawMessage::Hex(input))
    }

    pub fn from_be_slice(bytes: &[u8]) -> Result<Self> {
        normalize(RawMessage::Bytes(bytes))
    }

    pub fn as_field_element(&self) -> &FieldElement {
        &self.0
    }

    pub fn to_uint(&self) -> U256 {
        self.0.to_uint()
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0.to_be_bytes()
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

/// An externally supplied message representation.
#[derive(Debug, Clone, Copy)]
pub enum RawMessage<'a> {
    /// A 256-bit integer.
    Integer(U256),
    /// Big-endian bytes, at most 32.
    Bytes(&'a [u8]),
    /// Hex digits with optional `0x` prefix, at most 64.
    Hex(&'a str),
}

impl From<U256> for RawMessage<'_> {
    fn from(value: U256) -> Self {
        RawMessage::Integer(value)
    }
}

impl<'a> From<&'a [u8]> for RawMessage<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        RawMessage::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for RawMessage<'a> {
    fn from(hex: &'a str) -> Self {
        RawMessage::Hex(hex)
    }
}

/// Validate a raw message as a [`MessageHash`].
///
/// In-range values pass through unchanged, including `0` and `P - 1`. Nothing
/// is truncated or reduced: oversized or out-of-range input is an error.
///
/// # Errors
/// Returns `CryptoError::InvalidMessageHash` for unparsable input, more than
/// 256 bits of input, or a value `>= P`.
pub fn normalize(raw: RawMessage<'_>) -> Result<MessageHash> {
    let value = match raw {
        RawMessage::Integer(value) => value,
        RawMessage::Bytes(bytes) => uint_from_be_slice(bytes).ok_or_else(|| {
            CryptoError::InvalidMessageHash(format!(
                "expected at most 32 bytes, got {}",
                bytes.len()
            ))
        })?,
        RawMessage::Hex(hex) => uint_from_hex(hex.trim())
            .ok_or_else(|| CryptoError::InvalidMessageHash("not a valid hex string".into()))?,
    };
    MessageHash::new(value)
}

/// A digest reduced into the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReducedDigest {
    /// The digest modulo `P`.
    pub hash: MessageHash,
    /// True if the digest was `>= P` and had to be reduced.
    pub reduced: bool,
}

/// Reduce a 32-byte big-endian digest modulo `P`.
///
/// Unlike [`normalize`] this accepts every digest; the `reduced` flag tells the
/// caller whether the signed value differs from the digest bits.
pub fn reduce_digest(digest: &[u8; 32]) -> ReducedDigest {
    let value = U256::from_be_bytes(*digest);
    let reduced = value >= FIELD_PRIME;
    ReducedDigest {
        hash: MessageHash(FieldElement::reduce(&value)),
        reduced,
    }
}
