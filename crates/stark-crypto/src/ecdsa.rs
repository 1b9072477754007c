//! Deterministic ECDSA over the STARK curve.
//!
//! Signatures follow the StarkEx convention: `r` is the x-coordinate of
//! `k * G`, `w = k / (z + r * d) mod N` and `s = w^-1`. Both `r` and `w` must
//! lie in `[1, 2^251)`; any nonce that violates this (or produces a zero
//! component) is discarded and a perturbed nonce is derived instead.

use std::fmt;

use crypto_bigint::U256;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::constants::SIGNATURE_BOUND;
use crate::curve::CurvePoint;
use crate::error::{CryptoError, Result};
use crate::field::FieldElement;
use crate::hash::MessageHash;
use crate::keys::{PrivateKey, PublicKey};
use crate::nonce;
use crate::scalar::Scalar;

/// A signature `(r, s)` with both components in `[1, N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    r: Scalar,
    s: Scalar,
}

impl Signature {
    /// Build a signature from raw components.
    ///
    /// # Errors
    /// Returns `CryptoError::MalformedValue` if either component is zero or `>= N`.
    pub fn new(r: U256, s: U256) -> Result<Self> {
        let r = Scalar::new(r)?;
        let s = Scalar::new(s)?;
        if r.is_zero() || s.is_zero() {
            return Err(CryptoError::MalformedValue(
                "signature components must be non-zero".into(),
            ));
        }
        Ok(Self { r, s })
    }

    /// Parse the 128 hex character `r || s` encoding.
    pub fn from_hex(input: &str) -> Result<Self> {
        let digits = input.strip_prefix("0x").unwrap_or(input);
        if digits.len() != 128 || !digits.is_ascii() {
            return Err(CryptoError::MalformedValue(
                "signature must be 128 hex characters".into(),
            ));
        }
        let (r, s) = digits.split_at(64);
        Self::from_hex_parts(r, s)
    }

    /// Parse `r` and `s` given as separate hex strings.
    pub fn from_hex_parts(r: &str, s: &str) -> Result<Self> {
        let r = FieldElement::from_hex(r)?.to_uint();
        let s = FieldElement::from_hex(s)?.to_uint();
        Self::new(r, s)
    }

    pub fn r(&self) -> U256 {
        self.r.to_uint()
    }

    pub fn s(&self) -> U256 {
        self.s.to_uint()
    }

    /// `r` as 64 lowercase hex characters.
    pub fn r_hex(&self) -> String {
        self.r.to_hex()
    }

    /// `s` as 64 lowercase hex characters.
    pub fn s_hex(&self) -> String {
        self.s.to_hex()
    }

    /// The wire encoding: `r_hex || s_hex`, 128 characters.
    pub fn to_hex(&self) -> String {
        format!("{}{}", self.r_hex(), self.s_hex())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A nonce that produced an unusable signature. Never leaves this module.
#[derive(Debug, Error)]
#[error("degenerate signature component")]
struct DegenerateSignature;

/// Sign a message hash.
///
/// Deterministic: the same key and message always give the same signature.
pub fn sign(private_key: &PrivateKey, message_hash: &MessageHash) -> Signature {
    let z = Scalar::from_field_element(message_hash.as_field_element());
    let mut attempt = 0u32;

    loop {
        let k = Zeroizing::new(nonce::generate_k(private_key, message_hash, attempt));
        match sign_with_nonce(private_key, &z, &k) {
            Ok(signature) => return signature,
            Err(DegenerateSignature) => {
                tracing::trace!(attempt, "Nonce produced a degenerate signature, retrying");
                attempt = attempt.wrapping_add(1);
            }
        }
    }
}

fn sign_with_nonce(
    private_key: &PrivateKey,
    z: &Scalar,
    k: &Scalar,
) -> std::result::Result<Signature, DegenerateSignature> {
    if k.is_zero() {
        return Err(DegenerateSignature);
    }

    let x = (CurvePoint::GENERATOR * k)
        .x()
        .ok_or(DegenerateSignature)?
        .to_uint();
    if x == U256::ZERO || x >= SIGNATURE_BOUND {
        return Err(DegenerateSignature);
    }
    // x < 2^251 < N, so this is exact.
    let r = Scalar::reduce(&x);

    let d = private_key.as_scalar();
    let sum = Zeroizing::new(*z + r * *d);
    let w = *k * sum.invert().map_err(|_| DegenerateSignature)?;
    if w.is_zero() || w.to_uint() >= SIGNATURE_BOUND {
        return Err(DegenerateSignature);
    }
    let s = w.invert().map_err(|_| DegenerateSignature)?;

    Ok(Signature { r, s })
}

/// `w = s^-1` if the signature components are within the accepted ranges.
fn checked_w(signature: &Signature) -> Option<Scalar> {
    if signature.r.is_zero() || signature.s.is_zero() {
        return None;
    }
    if signature.r.to_uint() >= SIGNATURE_BOUND {
        return None;
    }
    let w = signature.s.invert().ok()?;
    if w.to_uint() >= SIGNATURE_BOUND {
        return None;
    }
    Some(w)
}

fn verify_point(public_point: &CurvePoint, message_hash: &MessageHash, signature: &Signature) -> bool {
    let Some(w) = checked_w(signature) else {
        return false;
    };

    let z = Scalar::from_field_element(message_hash.as_field_element());
    let u1 = z * w;
    let u2 = signature.r * w;

    let point = CurvePoint::GENERATOR * &u1 + *public_point * &u2;

    match point.x() {
        Some(x) => Scalar::from_field_element(&x) == signature.r,
        None => false,
    }
}

/// Verify a signature against a public key.
///
/// Returns false for any mismatch or out-of-range component; never errors.
pub fn verify(public_key: &PublicKey, message_hash: &MessageHash, signature: &Signature) -> bool {
    verify_point(&public_key.point(), message_hash, signature)
}

/// Verify against a stark key (public key x-coordinate only).
///
/// The y-coordinate is unknown, so the signature is accepted if it verifies
/// under either point with this x-coordinate.
pub fn verify_stark_key(stark_key: &FieldElement, message_hash: &MessageHash, signature: &Signature) -> bool {
    let Ok(point) = CurvePoint::from_x(*stark_key) else {
        return false;
    };
    verify_point(&point, message_hash, signature) || verify_point(&-point, message_hash, signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FIELD_MAX;
    use crate::keys::KeyPair;

    const KEY_A: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
    const KEY_B: &str = "00edcba9876543210fedcba9876543210fedcba9876543210fedcba987654321";

    fn msg(value: u64) -> MessageHash {
        MessageHash::new(U256::from_u64(value)).unwrap()
    }

    #[test]
    fn test_sign_and_verify() {
        let pair = KeyPair::from_hex(KEY_A).unwrap();
        let m = msg(1);
        let sig = sign(pair.private_key(), &m);

        assert!(verify(pair.public_key(), &m, &sig));
        assert_eq!(sig.r_hex().len(), 64);
        assert_eq!(sig.s_hex().len(), 64);
        assert!(sig.r() < SIGNATURE_BOUND);
    }

    #[test]
    fn test_key_one_message_zero_is_reproducible() {
        let pair = KeyPair::derive(U256::ONE).unwrap();
        let m = msg(0);
        let first = sign(pair.private_key(), &m);
        let second = sign(pair.private_key(), &m);

        assert_eq!(first, second);
        assert!(verify(pair.public_key(), &m, &first));
    }

    #[test]
    fn test_field_max_message() {
        let pair = KeyPair::from_hex(KEY_A).unwrap();
        let m = MessageHash::new(FIELD_MAX).unwrap();
        let sig = sign(pair.private_key(), &m);
        assert!(verify(pair.public_key(), &m, &sig));
    }

    #[test]
    fn test_different_messages_differ() {
        let pair = KeyPair::from_hex(KEY_A).unwrap();
        assert_ne!(sign(pair.private_key(), &msg(1)), sign(pair.private_key(), &msg(2)));
    }

    #[test]
    fn test_different_keys_differ() {
        let a = KeyPair::from_hex(KEY_A).unwrap();
        let b = KeyPair::from_hex(KEY_B).unwrap();
        assert_ne!(sign(a.private_key(), &msg(1)), sign(b.private_key(), &msg(1)));
    }

    #[test]
    fn test_messages_differing_in_low_bit_use_distinct_nonces() {
        let pair = KeyPair::from_hex(KEY_A).unwrap();
        for base in [0x1230u64, 0x1231, 0xabcd_ef00] {
            let a = sign(pair.private_key(), &msg(base));
            let b = sign(pair.private_key(), &msg(base ^ 1));
            assert_ne!(a.r(), b.r());
        }
    }

    #[test]
    fn test_reference_public_key() {
        let pair =
            KeyPair::from_hex("0x03c1e9550e66958296d11b60f8e8e7a7ad990d07fa65d5f7652c4a6c87d4e3cc")
                .unwrap();
        assert_eq!(
            pair.public_key().to_stark_key_hex(),
            "077a3b314db07c45076d11f62b6f9e748a39790441823307743cf00d6597ea43"
        );
    }

    #[test]
    fn test_reference_signature_verifies() {
        let stark_key = PublicKey::generator().x();
        let sig = Signature::from_hex_parts(
            "0411494b501a98abd8262b0da1351e17899a0c4ef23dd2f96fec5ba847310b20",
            "0405c3191ab3883ef2b763af35bc5f5d15b3b4e99461d70e84c654a351a7c81b",
        )
        .unwrap();

        assert!(verify_stark_key(&stark_key, &msg(2), &sig));
        assert!(verify(&PublicKey::generator(), &msg(2), &sig));
        assert!(!verify_stark_key(&stark_key, &msg(3), &sig));
    }

    #[test]
    fn test_wrong_message_rejected() {
        let pair = KeyPair::from_hex(KEY_A).unwrap();
        let sig = sign(pair.private_key(), &msg(1));
        assert!(!verify(pair.public_key(), &msg(2), &sig));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let a = KeyPair::from_hex(KEY_A).unwrap();
        let b = KeyPair::from_hex(KEY_B).unwrap();
        let sig = sign(a.private_key(), &msg(1));
        assert!(!verify(b.public_key(), &msg(1), &sig));
    }

    #[test]
    fn test_tampered_r_rejected() {
        let pair = KeyPair::from_hex(KEY_A).unwrap();
        let m = msg(1);
        let sig = sign(pair.private_key(), &m);
        let tampered = Signature::new(sig.r().wrapping_add(&U256::ONE), sig.s()).unwrap();
        assert!(!verify(pair.public_key(), &m, &tampered));
    }

    #[test]
    fn test_tampered_s_rejected() {
        let pair = KeyPair::from_hex(KEY_A).unwrap();
        let m = msg(1);
        let sig = sign(pair.private_key(), &m);
        let tampered = Signature::new(sig.r(), sig.s().wrapping_add(&U256::ONE)).unwrap();
        assert!(!verify(pair.public_key(), &m, &tampered));
    }

    #[test]
    fn test_zero_components_rejected() {
        assert!(Signature::new(U256::ZERO, U256::ONE).is_err());
        assert!(Signature::new(U256::ONE, U256::ZERO).is_err());
    }

    #[test]
    fn test_out_of_bound_r_fails_verification() {
        let pair = KeyPair::from_hex(KEY_A).unwrap();
        let m = msg(1);
        let sig = sign(pair.private_key(), &m);
        let oversized = Signature::new(SIGNATURE_BOUND, sig.s()).unwrap();
        assert!(!verify(pair.public_key(), &m, &oversized));
    }

    #[test]
    fn test_hex_encoding() {
        let pair = KeyPair::from_hex(KEY_A).unwrap();
        let sig = sign(pair.private_key(), &msg(5));
        let hex = sig.to_hex();

        assert_eq!(hex.len(), 128);
        assert_eq!(hex, format!("{}{}", sig.r_hex(), sig.s_hex()));
        assert_eq!(Signature::from_hex(&hex).unwrap(), sig);
        assert!(Signature::from_hex(&hex[..127]).is_err());
    }

    #[test]
    fn test_verify_stark_key_accepts_either_y() {
        let pair = KeyPair::from_hex(KEY_A).unwrap();
        let m = msg(9);
        let sig = sign(pair.private_key(), &m);

        assert!(verify_stark_key(&pair.public_key().x(), &m, &sig));
        assert!(!verify_stark_key(&pair.public_key().x(), &msg(10), &sig));
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use crate::constants::{EC_ORDER, FIELD_PRIME};
    use crate::keys::KeyPair;
    use crypto_bigint::Encoding;
    use proptest::prelude::*;

    /// Keys below 2^248, with the low bit set so they are never zero.
    fn private_scalar() -> impl Strategy<Value = U256> {
        any::<[u8; 31]>().prop_map(|bytes| {
            let mut padded = [0u8; 32];
            padded[1..].copy_from_slice(&bytes);
            padded[31] |= 1;
            U256::from_be_bytes(padded)
        })
    }

    fn message_hash() -> impl Strategy<Value = MessageHash> {
        any::<[u8; 32]>().prop_map(|bytes| {
            let value = U256::from_be_bytes(bytes);
            MessageHash::new(if value < FIELD_PRIME { value } else { value.shr_vartime(6) }).unwrap()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn test_sign_verify_roundtrip(k in private_scalar(), m in message_hash()) {
            let pair = KeyPair::derive(k).unwrap();
            let sig = sign(pair.private_key(), &m);
            prop_assert!(verify(pair.public_key(), &m, &sig));
        }

        #[test]
        fn test_public_key_deterministic(k in private_scalar()) {
            let a = KeyPair::derive(k).unwrap();
            let b = KeyPair::derive(k).unwrap();
            prop_assert_eq!(a.public_key(), b.public_key());
        }

        #[test]
        fn test_signature_components_in_bounds(k in private_scalar(), m in message_hash()) {
            let pair = KeyPair::derive(k).unwrap();
            let sig = sign(pair.private_key(), &m);
            prop_assert!(sig.r() < SIGNATURE_BOUND);
            prop_assert!(sig.s() < EC_ORDER);
        }
    }
}
