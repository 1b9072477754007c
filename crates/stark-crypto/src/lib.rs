//! STARK curve cryptography.
//!
//! This crate implements the elliptic curve used by StarkEx-based exchanges:
//! field and scalar arithmetic, point operations, key derivation,
//! deterministic ECDSA signing and verification, and the Pedersen based
//! limit order hash.
//!
//! # Features
//!
//! - **Strict Validation**: Every integer entering the crate is range checked;
//!   nothing is silently truncated or reduced.
//! - **Protected Key Material**: `PrivateKey` is zeroed on drop and never
//!   printed by `Debug` or included in error messages.
//! - **Deterministic Signing**: Nonces follow RFC 6979 with HMAC-SHA256, so a
//!   key and message always produce the same signature.
//!
//! # Example
//!
//! ```rust,ignore
//! use stark_crypto::{derive_key_pair, sign, verify, MessageHash};
//!
//! let pair = derive_key_pair(private_scalar)?;
//! let hash = MessageHash::from_hex("0x1234")?;
//!
//! let signature = sign(pair.private_key(), &hash);
//! assert!(verify(pair.public_key(), &hash, &signature));
//! ```

pub mod constants;
mod curve;
mod ecdsa;
mod encoding;
mod error;
mod field;
mod hash;
mod keys;
mod nonce;
mod order;
mod pedersen;
mod scalar;

pub use crypto_bigint::U256;

pub use curve::{is_on_curve, CurvePoint};
pub use ecdsa::{sign, verify, verify_stark_key, Signature};
pub use error::{CryptoError, Result};
pub use field::FieldElement;
pub use hash::{normalize, reduce_digest, MessageHash, RawMessage, ReducedDigest};
pub use keys::{derive_key_pair, KeyPair, PrivateKey, PublicKey};
pub use order::{expiration_hours, order_nonce, LimitOrder, LIMIT_ORDER_WITH_FEES};
pub use pedersen::pedersen_hash;
pub use scalar::Scalar;
