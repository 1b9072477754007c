//! Integers modulo the curve order `N`.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crypto_bigint::modular::constant_mod::Residue;
use crypto_bigint::{impl_modulus, Encoding, U256};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::DefaultIsZeroes;

use crate::constants::{EC_ORDER, EC_ORDER_HEX};
use crate::encoding::uint_to_hex;
use crate::error::{CryptoError, Result};
use crate::field::FieldElement;

impl_modulus!(OrderModulus, U256, EC_ORDER_HEX);

type OrderResidue = Residue<OrderModulus, { U256::LIMBS }>;

/// `N - 2`, the Fermat inversion exponent.
const INVERSION_EXPONENT: U256 =
    U256::from_be_hex("0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2d");

/// A scalar in `[0, N)`: private keys, nonces and signature components.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Scalar(OrderResidue);

impl Scalar {
    pub const ZERO: Self = Self(OrderResidue::ZERO);
    pub const ONE: Self = Self(OrderResidue::ONE);

    /// Create a scalar, rejecting values `>= N`.
    ///
    /// # Errors
    /// Returns `CryptoError::MalformedValue` if `value` is not below the curve order.
    pub fn new(value: U256) -> Result<Self> {
        if value >= EC_ORDER {
            return Err(CryptoError::MalformedValue(
                "scalar is not below the curve order".into(),
            ));
        }
        Ok(Self(OrderResidue::new(&value)))
    }

    /// Reduce an arbitrary 256-bit integer modulo `N`.
    pub fn reduce(value: &U256) -> Self {
        Self(OrderResidue::new(value))
    }

    /// Reduce a field element modulo `N`.
    pub fn from_field_element(element: &FieldElement) -> Self {
        Self::reduce(&element.to_uint())
    }

    pub fn to_uint(&self) -> U256 {
        self.0.retrieve()
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.to_uint().to_be_bytes()
    }

    pub fn to_hex(&self) -> String {
        uint_to_hex(&self.to_uint())
    }

    pub fn is_zero(&self) -> bool {
        self.0.ct_eq(&OrderResidue::ZERO).into()
    }

    /// Multiplicative inverse modulo `N`.
    ///
    /// # Errors
    /// Returns `CryptoError::DivisionByZero` for zero.
    pub fn invert(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(CryptoError::DivisionByZero);
        }
        Ok(Self(self.0.pow(&INVERSION_EXPONENT)))
    }
}

impl Add for Scalar {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Scalar {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul for Scalar {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Neg for Scalar {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(OrderResidue::conditional_select(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Lets key-derived scalars live in `zeroize::Zeroizing`.
impl DefaultIsZeroes for Scalar {}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar(0x{})", self.to_hex())
    }
}
