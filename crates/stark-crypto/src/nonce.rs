//! Deterministic nonce generation (RFC 6979, HMAC-SHA256).
//!
//! The nonce is a pure function of the private key, the message hash and a
//! retry counter. Attempt `0` is plain RFC 6979; later attempts feed the
//! counter in as the additional data `k'`, giving an independent nonce for the
//! same key and message.

use crypto_bigint::{Encoding, U256};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::constants::EC_ORDER;
use crate::hash::MessageHash;
use crate::keys::PrivateKey;
use crate::scalar::Scalar;

type HmacSha256 = Hmac<Sha256>;

/// `hlen - qlen`: SHA-256 output is 256 bits, the curve order has 252.
const TRUNCATION_BITS: usize = 4;

fn hmac_sha256(key: &[u8; 32], parts: &[&[u8]]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    for part in parts {
        mac.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// Leftmost `qlen` bits of a 32-byte HMAC output as an integer.
///
/// Only applied to the generator state `V`. The message hash is already a
/// field element and enters the HMAC input whole.
fn bits_to_int(bytes: &[u8; 32]) -> U256 {
    U256::from_be_bytes(*bytes).shr_vartime(TRUNCATION_BITS)
}

/// Derive the nonce for `(private_key, message_hash)` at the given retry attempt.
///
/// The result is always in `[1, N)`.
pub(crate) fn generate_k(private_key: &PrivateKey, message_hash: &MessageHash, attempt: u32) -> Scalar {
    let x = Zeroizing::new(private_key.expose_scalar().to_be_bytes());
    let h1 = Scalar::reduce(&message_hash.to_uint()).to_be_bytes();
    let extra = U256::from_u32(attempt).to_be_bytes();
    let extra: &[u8] = if attempt == 0 { &[] } else { &extra };

    let mut k = Zeroizing::new([0x00u8; 32]);
    let mut v = Zeroizing::new([0x01u8; 32]);

    *k = hmac_sha256(&k, &[&v[..], &[0x00], &x[..], &h1, extra]);
    *v = hmac_sha256(&k, &[&v[..]]);
    *k = hmac_sha256(&k, &[&v[..], &[0x01], &x[..], &h1, extra]);
    *v = hmac_sha256(&k, &[&v[..]]);

    loop {
        *v = hmac_sha256(&k, &[&v[..]]);
        let candidate = Zeroizing::new(bits_to_int(&v));
        if *candidate != U256::ZERO && *candidate < EC_ORDER {
            return Scalar::reduce(&candidate);
        }

        *k = hmac_sha256(&k, &[&v[..], &[0x00]]);
        *v = hmac_sha256(&k, &[&v[..]]);
    }
}
