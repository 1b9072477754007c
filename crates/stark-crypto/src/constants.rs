//! STARK curve parameters.
//!
//! The curve is `y^2 = x^3 + ALPHA * x + BETA` over the prime field of order
//! `FIELD_PRIME = 2^251 + 17 * 2^192 + 1`, with a generator of prime order
//! `EC_ORDER`.

use crypto_bigint::U256;

pub(crate) const FIELD_PRIME_HEX: &str =
    "0800000000000011000000000000000000000000000000000000000000000001";
pub(crate) const EC_ORDER_HEX: &str =
    "0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f";

/// Order `P` of the base field.
pub const FIELD_PRIME: U256 = U256::from_be_hex(FIELD_PRIME_HEX);

/// Order `N` of the group generated by [`GENERATOR_X`], [`GENERATOR_Y`].
pub const EC_ORDER: U256 = U256::from_be_hex(EC_ORDER_HEX);

/// Curve coefficient `alpha`.
pub const ALPHA: U256 = U256::ONE;

/// Curve coefficient `beta`.
pub const BETA: U256 =
    U256::from_be_hex("06f21413efbe40de150e596d72f7a8c5609ad26c15c915c1f4cdfcb99cee9e89");

/// Affine x-coordinate of the generator.
pub const GENERATOR_X: U256 =
    U256::from_be_hex("01ef15c18599971b7beced415a40f0c7deacfd9b0d1819e03d723d8bc943cfca");

/// Affine y-coordinate of the generator.
pub const GENERATOR_Y: U256 =
    U256::from_be_hex("005668060aa49730b7be4801df46ec62de53ecd11abe43a32873000c36e8dc1f");

/// Exclusive upper bound `2^251` that StarkEx verifiers impose on `r` and `w = s^-1`.
pub const SIGNATURE_BOUND: U256 =
    U256::from_be_hex("0800000000000000000000000000000000000000000000000000000000000000");

/// Largest valid field element, `P - 1`.
pub const FIELD_MAX: U256 =
    U256::from_be_hex("0800000000000011000000000000000000000000000000000000000000000000");
