//! Point arithmetic on the STARK curve.
//!
//! Points are exposed in affine form through [`CurvePoint`]. Internally all
//! arithmetic runs on projective coordinates with the complete addition law of
//! Renes, Costello and Batina ("Complete addition formulas for prime order
//! elliptic curves", Algorithm 1). The formulas handle doubling and the
//! identity without special cases, which lets scalar multiplication run as a
//! branch-free Montgomery ladder.

use std::ops::{Add, Mul, Neg};

use crypto_bigint::{Encoding, U256};
use subtle::{Choice, ConditionallySelectable};

use crate::constants::{ALPHA, BETA, GENERATOR_X, GENERATOR_Y};
use crate::error::{CryptoError, Result};
use crate::field::FieldElement;
use crate::scalar::Scalar;

const CURVE_ALPHA: FieldElement = FieldElement::from_uint_unchecked(&ALPHA);
const CURVE_BETA: FieldElement = FieldElement::from_uint_unchecked(&BETA);

/// A point on the STARK curve, or the point at infinity.
///
/// Every `Affine` value is on the curve: the constructors validate, and the
/// arithmetic is closed over the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurvePoint {
    /// The additive identity.
    Identity,
    /// A finite point `(x, y)`.
    Affine { x: FieldElement, y: FieldElement },
}

impl CurvePoint {
    /// The standard generator `G`.
    pub const GENERATOR: Self = Self::Affine {
        x: FieldElement::from_uint_unchecked(&GENERATOR_X),
        y: FieldElement::from_uint_unchecked(&GENERATOR_Y),
    };

    /// Create a finite point from coordinates, checking the curve equation.
    ///
    /// # Errors
    /// Returns `CryptoError::MalformedValue` if `(x, y)` is not on the curve.
    pub fn new(x: FieldElement, y: FieldElement) -> Result<Self> {
        if !is_on_curve(&x, &y) {
            return Err(CryptoError::MalformedValue("point is not on the curve".into()));
        }
        Ok(Self::Affine { x, y })
    }

    /// Create a finite point from raw integer coordinates.
    ///
    /// Coordinates `>= P` and off-curve pairs are rejected before any arithmetic.
    pub fn from_coordinates(x: U256, y: U256) -> Result<Self> {
        Self::new(FieldElement::new(x)?, FieldElement::new(y)?)
    }

    /// Recover a point from its x-coordinate.
    ///
    /// Which of the two candidate y values is chosen is unspecified; callers
    /// that care about the sign must handle both `p` and `-p`.
    pub fn from_x(x: FieldElement) -> Result<Self> {
        let rhs = curve_rhs(&x);
        let y = rhs.sqrt().ok_or_else(|| {
            CryptoError::MalformedValue("no curve point has this x-coordinate".into())
        })?;
        Ok(Self::Affine { x, y })
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    /// The x-coordinate, or `None` for the identity.
    pub fn x(&self) -> Option<FieldElement> {
        match self {
            Self::Identity => None,
            Self::Affine { x, .. } => Some(*x),
        }
    }

    /// The y-coordinate, or `None` for the identity.
    pub fn y(&self) -> Option<FieldElement> {
        match self {
            Self::Identity => None,
            Self::Affine { y, .. } => Some(*y),
        }
    }

    pub fn double(&self) -> Self {
        ProjectivePoint::from(*self).double().to_affine()
    }
}

impl Add for CurvePoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        (ProjectivePoint::from(self) + ProjectivePoint::from(rhs)).to_affine()
    }
}

impl Neg for CurvePoint {
    type Output = Self;

    fn neg(self) -> Self {
        match self {
            Self::Identity => Self::Identity,
            Self::Affine { x, y } => Self::Affine { x, y: -y },
        }
    }
}

/// Multiply by an integer scalar.
///
/// Runs a fixed 256-step ladder whatever the scalar's value, so it is safe to
/// use with private keys and nonces.
impl Mul<&U256> for CurvePoint {
    type Output = Self;

    fn mul(self, scalar: &U256) -> Self {
        ProjectivePoint::from(self)
            .mul_be_bytes(&scalar.to_be_bytes())
            .to_affine()
    }
}

/// Multiply by a scalar modulo `N`.
impl Mul<&Scalar> for CurvePoint {
    type Output = Self;

    fn mul(self, scalar: &Scalar) -> Self {
        ProjectivePoint::from(self)
            .mul_be_bytes(&scalar.to_be_bytes())
            .to_affine()
    }
}

/// `x^3 + alpha * x + beta`.
fn curve_rhs(x: &FieldElement) -> FieldElement {
    x.square() * *x + CURVE_ALPHA * *x + CURVE_BETA
}

/// Check `y^2 == x^3 + alpha * x + beta`.
pub fn is_on_curve(x: &FieldElement, y: &FieldElement) -> bool {
    y.square() == curve_rhs(x)
}

/// A point in projective coordinates `(X : Y : Z)`, affine `(X/Z, Y/Z)`.
///
/// The identity is `(0 : 1 : 0)`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProjectivePoint {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl ProjectivePoint {
    pub(crate) const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    /// Complete addition (RCB16, Algorithm 1, general `a`).
    fn add_complete(&self, other: &Self) -> Self {
        let b3 = CURVE_BETA.double() + CURVE_BETA;
        let a = CURVE_ALPHA;
        let (x1, y1, z1) = (self.x, self.y, self.z);
        let (x2, y2, z2) = (other.x, other.y, other.z);

        let mut t0 = x1 * x2;
        let mut t1 = y1 * y2;
        let mut t2 = z1 * z2;
        let mut t3 = x1 + y1;
        let mut t4 = x2 + y2;
        t3 = t3 * t4;
        t4 = t0 + t1;
        t3 = t3 - t4;
        t4 = x1 + z1;
        let mut t5 = x2 + z2;
        t4 = t4 * t5;
        t5 = t0 + t2;
        t4 = t4 - t5;
        t5 = y1 + z1;
        let mut x3 = y2 + z2;
        t5 = t5 * x3;
        x3 = t1 + t2;
        t5 = t5 - x3;
        let mut z3 = a * t4;
        x3 = b3 * t2;
        z3 = x3 + z3;
        x3 = t1 - z3;
        z3 = t1 + z3;
        let mut y3 = x3 * z3;
        t1 = t0 + t0;
        t1 = t1 + t0;
        t2 = a * t2;
        t4 = b3 * t4;
        t1 = t1 + t2;
        t2 = t0 - t2;
        t2 = a * t2;
        t4 = t4 + t2;
        t0 = t1 * t4;
        y3 = y3 + t0;
        t0 = t5 * t4;
        x3 = t3 * x3;
        x3 = x3 - t0;
        t0 = t3 * t1;
        z3 = t5 * z3;
        z3 = z3 + t0;

        Self { x: x3, y: y3, z: z3 }
    }

    pub(crate) fn double(&self) -> Self {
        self.add_complete(self)
    }

    /// Montgomery ladder over a big-endian scalar, one conditional swap per bit.
    pub(crate) fn mul_be_bytes(&self, scalar: &[u8; 32]) -> Self {
        let mut r0 = Self::IDENTITY;
        let mut r1 = *self;

        for byte in scalar {
            for shift in (0..8).rev() {
                let bit = Choice::from((byte >> shift) & 1);
                Self::conditional_swap(&mut r0, &mut r1, bit);
                r1 = r0 + r1;
                r0 = r0.double();
                Self::conditional_swap(&mut r0, &mut r1, bit);
            }
        }

        r0
    }

    pub(crate) fn to_affine(&self) -> CurvePoint {
        if self.z.is_zero() {
            return CurvePoint::Identity;
        }
        let z_inv = self.z.invert_or_zero();
        CurvePoint::Affine {
            x: self.x * z_inv,
            y: self.y * z_inv,
        }
    }
}

impl Add for ProjectivePoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.add_complete(&rhs)
    }
}

impl From<CurvePoint> for ProjectivePoint {
    fn from(point: CurvePoint) -> Self {
        match point {
            CurvePoint::Identity => Self::IDENTITY,
            CurvePoint::Affine { x, y } => Self {
                x,
                y,
                z: FieldElement::ONE,
            },
        }
    }
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}
