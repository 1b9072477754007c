//! Arithmetic in the base field `F_P`.
//!
//! Elements are stored in Montgomery form using `crypto-bigint`'s compile-time
//! moduli, so every operation is reduced and runs in constant time.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crypto_bigint::modular::constant_mod::Residue;
use crypto_bigint::{impl_modulus, Encoding, U256};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::constants::{FIELD_PRIME, FIELD_PRIME_HEX};
use crate::encoding::{uint_from_be_slice, uint_from_hex, uint_to_hex};
use crate::error::{CryptoError, Result};

impl_modulus!(FieldModulus, U256, FIELD_PRIME_HEX);

type FieldResidue = Residue<FieldModulus, { U256::LIMBS }>;

/// `P - 2`, the Fermat inversion exponent.
const INVERSION_EXPONENT: U256 =
    U256::from_be_hex("0800000000000010ffffffffffffffffffffffffffffffffffffffffffffffff");

/// `(P - 1) / 2`, the Euler criterion exponent.
const LEGENDRE_EXPONENT: U256 =
    U256::from_be_hex("0400000000000008800000000000000000000000000000000000000000000000");

/// `P - 1 = 2^TWO_ADICITY * TRACE`.
const TWO_ADICITY: u32 = 192;
const TRACE: U256 = U256::from_u64(0x0800_0000_0000_0011);
const TRACE_PLUS_ONE_HALF: U256 = U256::from_u64(0x0400_0000_0000_0009);

/// Smallest quadratic non-residue.
const NON_RESIDUE: FieldElement = FieldElement::from_uint_unchecked(&U256::from_u8(3));

/// An element of the STARK base field, always in `[0, P)`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FieldElement(FieldResidue);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = Self(FieldResidue::ZERO);

    /// The multiplicative identity.
    pub const ONE: Self = Self(FieldResidue::ONE);

    /// Create a field element, rejecting values `>= P`.
    ///
    /// # Errors
    /// Returns `CryptoError::MalformedValue` if `value` is not below the field prime.
    pub fn new(value: U256) -> Result<Self> {
        if value >= FIELD_PRIME {
            return Err(CryptoError::MalformedValue(
                "field element is not below the field prime".into(),
            ));
        }
        Ok(Self::from_uint_unchecked(&value))
    }

    /// Build from an integer known to be below `P`.
    pub(crate) const fn from_uint_unchecked(value: &U256) -> Self {
        Self(FieldResidue::new(value))
    }

    /// Reduce an arbitrary 256-bit integer modulo `P`.
    pub(crate) fn reduce(value: &U256) -> Self {
        Self(FieldResidue::new(value))
    }

    /// Parse a big-endian byte string of at most 32 bytes.
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self> {
        let value = uint_from_be_slice(bytes).ok_or_else(|| {
            CryptoError::MalformedValue(format!("expected at most 32 bytes, got {}", bytes.len()))
        })?;
        Self::new(value)
    }

    /// Parse a hex string (optional `0x` prefix, at most 64 digits).
    pub fn from_hex(input: &str) -> Result<Self> {
        let value = uint_from_hex(input)
            .ok_or_else(|| CryptoError::MalformedValue("invalid hex field element".into()))?;
        Self::new(value)
    }

    /// The canonical integer representative.
    pub fn to_uint(&self) -> U256 {
        self.0.retrieve()
    }

    /// Big-endian encoding of the canonical representative.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.to_uint().to_be_bytes()
    }

    /// 64 character lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        uint_to_hex(&self.to_uint())
    }

    /// Returns true if this is zero.
    pub fn is_zero(&self) -> bool {
        self.0.ct_eq(&FieldResidue::ZERO).into()
    }

    pub fn square(&self) -> Self {
        Self(self.0.square())
    }

    pub fn double(&self) -> Self {
        *self + *self
    }

    /// Raise to an integer power. Runs in time independent of the exponent value.
    pub fn pow(&self, exponent: &U256) -> Self {
        Self(self.0.pow(exponent))
    }

    /// Multiplicative inverse via Fermat's little theorem.
    ///
    /// # Errors
    /// Returns `CryptoError::DivisionByZero` for zero.
    pub fn invert(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(CryptoError::DivisionByZero);
        }
        Ok(self.invert_or_zero())
    }

    /// `a^(P-2)`, which maps zero to zero without branching.
    pub(crate) fn invert_or_zero(&self) -> Self {
        self.pow(&INVERSION_EXPONENT)
    }

    /// Returns true if this element has a square root in the field.
    pub fn is_square(&self) -> bool {
        self.is_zero() || self.pow(&LEGENDRE_EXPONENT) == Self::ONE
    }

    /// Square root by Tonelli-Shanks.
    ///
    /// Variable time; only used on public values (point decompression).
    /// Returns `None` for non-residues. Which of the two roots is returned is
    /// unspecified.
    pub fn sqrt(&self) -> Option<Self> {
        if self.is_zero() {
            return Some(Self::ZERO);
        }
        if !self.is_square() {
            return None;
        }

        let mut m = TWO_ADICITY;
        let mut c = NON_RESIDUE.pow(&TRACE);
        let mut t = self.pow(&TRACE);
        let mut root = self.pow(&TRACE_PLUS_ONE_HALF);

        while t != Self::ONE {
            // Least i with t^(2^i) == 1; i < m because t has order dividing 2^(m-1).
            let mut i = 0;
            let mut power = t;
            while power != Self::ONE {
                power = power.square();
                i += 1;
            }

            let mut b = c;
            for _ in 0..(m - i - 1) {
                b = b.square();
            }

            m = i;
            c = b.square();
            t = t * c;
            root = root * b;
        }

        Some(root)
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_uint_unchecked(&U256::from_u64(value))
    }
}

impl Add for FieldElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for FieldElement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul for FieldElement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Neg for FieldElement {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(FieldResidue::conditional_select(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement(0x{})", self.to_hex())
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}
