//! Limit order message hash for StarkEx perpetual orders.
//!
//! The hash chains four Pedersen hashes over the two traded asset ids, the
//! fee asset id and two packed words:
//!
//! ```text
//! word0 = amount_sell << 160 | amount_buy << 96 | max_fee << 32 | nonce
//! word1 = 3 << 241 | position << 177 | position << 113 | position << 49 | expiry << 17
//! ```

use crypto_bigint::U256;
use sha2::{Digest, Sha256};

use crate::error::{CryptoError, Result};
use crate::field::FieldElement;
use crate::hash::MessageHash;
use crate::pedersen::pedersen_hash;

/// Order type tag for limit orders with fees.
pub const LIMIT_ORDER_WITH_FEES: u64 = 3;

const MS_PER_HOUR: i64 = 60 * 60 * 1000;

/// The fields of a limit order that are covered by its signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOrder {
    pub asset_id_synthetic: FieldElement,
    pub asset_id_collateral: FieldElement,
    pub asset_id_fee: FieldElement,
    pub is_buying_synthetic: bool,
    pub amount_synthetic: u64,
    pub amount_collateral: u64,
    pub max_amount_fee: u64,
    pub nonce: u32,
    pub position_id: u64,
    /// Expiration in whole hours since the Unix epoch.
    pub expiration_timestamp: u32,
}

impl LimitOrder {
    /// Message hash to sign for this order.
    pub fn hash(&self) -> MessageHash {
        let (asset_sell, asset_buy, amount_sell, amount_buy) = if self.is_buying_synthetic {
            (
                &self.asset_id_collateral,
                &self.asset_id_synthetic,
                self.amount_collateral,
                self.amount_synthetic,
            )
        } else {
            (
                &self.asset_id_synthetic,
                &self.asset_id_collateral,
                self.amount_synthetic,
                self.amount_collateral,
            )
        };

        let mut msg = pedersen_hash(asset_sell, asset_buy);
        msg = pedersen_hash(&msg, &self.asset_id_fee);
        msg = pedersen_hash(&msg, &self.amounts_word(amount_sell, amount_buy));
        msg = pedersen_hash(&msg, &self.position_word());
        MessageHash::from_field_element(msg)
    }

    fn amounts_word(&self, amount_sell: u64, amount_buy: u64) -> FieldElement {
        let word = U256::from_u64(amount_sell).shl_vartime(160)
            | U256::from_u64(amount_buy).shl_vartime(96)
            | U256::from_u64(self.max_amount_fee).shl_vartime(32)
            | U256::from_u32(self.nonce);
        FieldElement::from_uint_unchecked(&word)
    }

    fn position_word(&self) -> FieldElement {
        let position = U256::from_u64(self.position_id);
        let word = U256::from_u64(LIMIT_ORDER_WITH_FEES).shl_vartime(241)
            | position.shl_vartime(177)
            | position.shl_vartime(113)
            | position.shl_vartime(49)
            | U256::from_u32(self.expiration_timestamp).shl_vartime(17);
        FieldElement::from_uint_unchecked(&word)
    }
}

/// Order nonce derived from a client order id: the first four bytes of its
/// SHA-256 digest, big-endian.
pub fn order_nonce(client_order_id: &str) -> u32 {
    let digest = Sha256::digest(client_order_id.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Convert an expiry in Unix milliseconds to the whole hours a signed order carries.
///
/// # Errors
/// Returns `CryptoError::MalformedValue` for negative times or hours beyond `u32`.
pub fn expiration_hours(expire_time_ms: i64) -> Result<u32> {
    if expire_time_ms < 0 {
        return Err(CryptoError::MalformedValue(
            "expiration time is negative".into(),
        ));
    }
    u32::try_from(expire_time_ms / MS_PER_HOUR)
        .map_err(|_| CryptoError::MalformedValue("expiration time out of range".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYNTHETIC_ID: &str = "4254432d3130000000000000000000";
    const COLLATERAL_ID: &str = "02ce625e94458d39dd0bf3b45a843544dd4a14b8169045a3a3d15aa564b936c5";

    fn order(is_buying_synthetic: bool) -> LimitOrder {
        let collateral = FieldElement::from_hex(COLLATERAL_ID).unwrap();
        LimitOrder {
            asset_id_synthetic: FieldElement::from_hex(SYNTHETIC_ID).unwrap(),
            asset_id_collateral: collateral,
            asset_id_fee: collateral,
            is_buying_synthetic,
            amount_synthetic: 10_000_000_000,
            amount_collateral: 300_000_000_000,
            max_amount_fee: 150_000_000,
            nonce: 0x1a2b_3c4d,
            position_id: 12345,
            expiration_timestamp: 480_000,
        }
    }

    #[test]
    fn test_buy_order_hash() {
        assert_eq!(
            order(true).hash().to_hex(),
            "043dbdd49f948eb82c145527a3dd4cb1bf52022e4a103e13567059245a967906"
        );
    }

    #[test]
    fn test_sell_order_hash() {
        assert_eq!(
            order(false).hash().to_hex(),
            "02857644af783b1a7aea8bab6c4be6116544e724a88b8c09754626212c3877d9"
        );
    }

    #[test]
    fn test_packed_words() {
        let buy = order(true);
        assert_eq!(
            buy.amounts_word(buy.amount_collateral, buy.amount_synthetic).to_uint(),
            U256::from_be_hex("0000000000000045d964b80000000002540be4000000000008f0d1801a2b3c4d")
        );
        assert_eq!(
            buy.position_word().to_uint(),
            U256::from_be_hex("0006000000000000607200000000000060720000000000006072000ea6000000")
        );
    }

    #[test]
    fn test_order_nonce() {
        assert_eq!(order_nonce("client-order-1"), 1_913_983_800);
        assert_eq!(order_nonce(""), 3_820_012_610);
    }

    #[test]
    fn test_expiration_hours() {
        assert_eq!(expiration_hours(480_000 * MS_PER_HOUR + 59_999).unwrap(), 480_000);
        assert_eq!(expiration_hours(0).unwrap(), 0);
        assert!(matches!(
            expiration_hours(-1),
            Err(CryptoError::MalformedValue(_))
        ));
        assert!(expiration_hours(i64::MAX).is_err());
    }
}
