//! Private and public key material.
//!
//! A [`PrivateKey`] is validated on construction to lie in `[1, N)` and is
//! zeroed when dropped. Its [`PublicKey`] is derived once by [`KeyPair`] and
//! cached for the lifetime of the pair.

use std::fmt;

use crypto_bigint::U256;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::constants::EC_ORDER;
use crate::curve::CurvePoint;
use crate::encoding::{uint_from_be_slice, uint_from_hex};
use crate::error::{CryptoError, Result};
use crate::field::FieldElement;
use crate::scalar::Scalar;

/// A STARK private key: a scalar in `[1, N)`.
///
/// Not `Clone`: the scalar lives in exactly one place and is wiped on drop.
/// `Debug` never prints the value.
pub struct PrivateKey {
    scalar: U256,
}

impl PrivateKey {
    /// Validate a raw scalar as a private key.
    ///
    /// # Errors
    /// Returns `CryptoError::InvalidPrivateKey` if the scalar is zero or `>= N`.
    pub fn new(scalar: U256) -> Result<Self> {
        if scalar == U256::ZERO {
            return Err(CryptoError::InvalidPrivateKey("scalar must not be zero"));
        }
        if scalar >= EC_ORDER {
            return Err(CryptoError::InvalidPrivateKey(
                "scalar must be below the curve order",
            ));
        }
        Ok(Self { scalar })
    }

    /// Parse a hex encoded private key (optional `0x` prefix, at most 64 digits).
    ///
    /// The error never echoes the input.
    pub fn from_hex(input: &str) -> Result<Self> {
        let mut scalar = uint_from_hex(input.trim())
            .ok_or(CryptoError::InvalidPrivateKey("not a valid hex string"))?;
        let key = Self::new(scalar);
        scalar.zeroize();
        key
    }

    /// Parse a big-endian private key of at most 32 bytes.
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self> {
        let scalar = uint_from_be_slice(bytes)
            .ok_or(CryptoError::InvalidPrivateKey("longer than 32 bytes"))?;
        Self::new(scalar)
    }

    /// Derive the matching public key.
    pub fn public_key(&self) -> PublicKey {
        let point = CurvePoint::GENERATOR * &self.scalar;
        match point {
            CurvePoint::Affine { x, y } => PublicKey { x, y },
            // k * G is finite for every k in [1, N) because G has prime order N.
            CurvePoint::Identity => unreachable!("private key scalar is in [1, N)"),
        }
    }

    /// The scalar modulo `N`, wiped when the returned guard drops.
    pub(crate) fn as_scalar(&self) -> Zeroizing<Scalar> {
        Zeroizing::new(Scalar::reduce(&self.scalar))
    }

    /// Raw scalar, for nonce derivation.
    pub(crate) fn expose_scalar(&self) -> &U256 {
        &self.scalar
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.scalar.zeroize();
    }
}

impl ZeroizeOnDrop for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// A STARK public key: a finite curve point `private_key * G`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    x: FieldElement,
    y: FieldElement,
}

impl PublicKey {
    /// Wrap a curve point as a public key.
    ///
    /// # Errors
    /// Returns `CryptoError::MalformedValue` for the point at infinity.
    pub fn from_point(point: CurvePoint) -> Result<Self> {
        match point {
            CurvePoint::Affine { x, y } => Ok(Self { x, y }),
            CurvePoint::Identity => Err(CryptoError::MalformedValue(
                "public key cannot be the point at infinity".into(),
            )),
        }
    }

    /// Build from raw coordinates, validating range and curve membership.
    pub fn from_coordinates(x: U256, y: U256) -> Result<Self> {
        Self::from_point(CurvePoint::from_coordinates(x, y)?)
    }

    /// Rebuild a public key from its stark key (the x-coordinate).
    ///
    /// The y-coordinate is recovered up to sign, so the result may be either
    /// of the two points with this x; see [`crate::verify_stark_key`].
    pub fn from_stark_key(x: FieldElement) -> Result<Self> {
        Self::from_point(CurvePoint::from_x(x)?)
    }

    /// Parse a hex stark key.
    pub fn from_stark_key_hex(input: &str) -> Result<Self> {
        Self::from_stark_key(FieldElement::from_hex(input)?)
    }

    /// The public key of private key `1`, which is the generator itself.
    pub fn generator() -> Self {
        match CurvePoint::GENERATOR {
            CurvePoint::Affine { x, y } => Self { x, y },
            CurvePoint::Identity => unreachable!("generator is finite"),
        }
    }

    pub fn point(&self) -> CurvePoint {
        CurvePoint::Affine {
            x: self.x,
            y: self.y,
        }
    }

    pub fn x(&self) -> FieldElement {
        self.x
    }

    pub fn y(&self) -> FieldElement {
        self.y
    }

    /// The stark key: 64 hex characters of the x-coordinate.
    pub fn to_stark_key_hex(&self) -> String {
        self.x.to_hex()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_stark_key_hex())
    }
}

/// A private key together with its cached public key.
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Validate `private_scalar` and derive its public key.
    ///
    /// # Errors
    /// Returns `CryptoError::InvalidPrivateKey` unless `1 <= private_scalar < N`.
    pub fn derive(private_scalar: U256) -> Result<Self> {
        Ok(Self::from_private_key(PrivateKey::new(private_scalar)?))
    }

    /// Take ownership of an already validated private key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
        }
    }

    /// Parse a hex private key and derive its public key.
    pub fn from_hex(input: &str) -> Result<Self> {
        Ok(Self::from_private_key(PrivateKey::from_hex(input)?))
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"[REDACTED]")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// Validate a private scalar and derive its key pair.
///
/// # Errors
/// Returns `CryptoError::InvalidPrivateKey` unless `1 <= private_scalar < N`.
pub fn derive_key_pair(private_scalar: U256) -> Result<KeyPair> {
    KeyPair::derive(private_scalar)
}
