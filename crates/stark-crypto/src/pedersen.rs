//! StarkWare Pedersen hash over the STARK curve.
//!
//! `H(a, b) = [S + a_low * P0 + a_high * P1 + b_low * P2 + b_high * P3].x`,
//! where `x_low` is the low 248 bits of `x` and `x_high` the remaining 4.

use crypto_bigint::U256;

use crate::curve::CurvePoint;
use crate::field::FieldElement;

const fn point(x: &str, y: &str) -> CurvePoint {
    CurvePoint::Affine {
        x: FieldElement::from_uint_unchecked(&U256::from_be_hex(x)),
        y: FieldElement::from_uint_unchecked(&U256::from_be_hex(y)),
    }
}

const SHIFT_POINT: CurvePoint = point(
    "049ee3eba8c1600700ee1b87eb599f16716b0b1022947733551fde4050ca6804",
    "03ca0cfe4b3bc6ddf346d49d06ea0ed34e621062c0e056c1d0405d266e10268a",
);

/// `[P0, P1, P2, P3]`: low and high parts of the first input, then the second.
const CONSTANT_POINTS: [CurvePoint; 4] = [
    point(
        "0234287dcbaffe7f969c748655fca9e58fa8120b6d56eb0c1080d17957ebe47b",
        "03b056f100f96fb21e889527d41f4e39940135dd7a6c94cc6ed0268ee89e5615",
    ),
    point(
        "04fa56f376c83db33f9dab2656558f3399099ec1de5e3018b7a6932dba8aa378",
        "03fa0984c931c9e38113e0c0e47e4401562761f92a7a23b45168f4e80ff5b54d",
    ),
    point(
        "04ba4cc166be8dec764910f75b45f74b40c690c74709e90f3aa372f0bd2d6997",
        "0040301cf5c1751f4b971e46c4ede85fcac5c59a5ce5ae7c48151f27b24b219c",
    ),
    point(
        "054302dcb0e6cc1c6e44cca8f61a63bb2ca65048d53fb325d36ff12c49a58202",
        "01b77b3e37d13504b348046268d8ae25ce98ad783c25561a879dcc77e99c2426",
    ),
];

const LOW_PART_BITS: usize = 248;
const LOW_PART_MASK: U256 =
    U256::from_be_hex("00ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff");

/// Pedersen hash of two field elements.
pub fn pedersen_hash(a: &FieldElement, b: &FieldElement) -> FieldElement {
    let mut acc = SHIFT_POINT;
    for (input, points) in [a, b].into_iter().zip(CONSTANT_POINTS.chunks_exact(2)) {
        let value = input.to_uint();
        let low = value & LOW_PART_MASK;
        let high = value.shr_vartime(LOW_PART_BITS);
        acc = acc + points[0] * &low + points[1] * &high;
    }

    match acc.x() {
        Some(x) => x,
        // Reaching the identity would need a linear relation between the constant points.
        None => unreachable!("Pedersen sum is never the identity"),
    }
}
