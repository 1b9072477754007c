//! Hex and byte conversions for 256-bit integers.

use crypto_bigint::{Encoding, U256};

/// Parse up to 64 hex digits (optional `0x` prefix) into a big-endian integer.
///
/// Returns `None` for empty input, non-hex characters or more than 64 digits.
pub(crate) fn uint_from_hex(input: &str) -> Option<U256> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    if digits.is_empty() || digits.len() > 64 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let padded = format!("{:0>64}", digits);
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(padded, &mut bytes).ok()?;
    Some(U256::from_be_bytes(bytes))
}

/// Interpret up to 32 big-endian bytes as an integer.
///
/// Returns `None` if more than 32 bytes are supplied.
pub(crate) fn uint_from_be_slice(bytes: &[u8]) -> Option<U256> {
    if bytes.len() > 32 {
        return None;
    }

    let mut padded = [0u8; 32];
    padded[32 - bytes.len()..].copy_from_slice(bytes);
    Some(U256::from_be_bytes(padded))
}

/// Lowercase, zero-padded, 64 character hex rendering.
pub(crate) fn uint_to_hex(value: &U256) -> String {
    hex::encode(value.to_be_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_with_and_without_prefix() {
        assert_eq!(uint_from_hex("0x1f"), Some(U256::from_u64(0x1f)));
        assert_eq!(uint_from_hex("1F"), Some(U256::from_u64(0x1f)));
        assert_eq!(uint_from_hex("0X00ff"), Some(U256::from_u64(0xff)));
    }

    #[test]
    fn test_odd_length_hex() {
        assert_eq!(uint_from_hex("abc"), Some(U256::from_u64(0xabc)));
    }

    #[test]
    fn test_rejects_bad_hex() {
        assert_eq!(uint_from_hex(""), None);
        assert_eq!(uint_from_hex("0x"), None);
        assert_eq!(uint_from_hex("not a hex string"), None);
        assert_eq!(uint_from_hex(&"1".repeat(65)), None);
    }

    #[test]
    fn test_slice_padding() {
        assert_eq!(uint_from_be_slice(&[]), Some(U256::ZERO));
        assert_eq!(uint_from_be_slice(&[1, 0]), Some(U256::from_u64(256)));
        assert_eq!(uint_from_be_slice(&[0u8; 33]), None);
    }

    #[test]
    fn test_to_hex_is_padded() {
        let hex = uint_to_hex(&U256::ONE);
        assert_eq!(hex.len(), 64);
        assert!(hex.ends_with("01"));
        assert!(hex.starts_with("00"));
    }
}
