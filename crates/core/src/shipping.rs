//! Shipping fee policy and derived cart totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flat-rate shipping, waived once the subtotal is strictly above a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    /// Subtotals strictly above this amount ship free.
    pub free_above: Decimal,
    /// Fee charged when the subtotal is at or below `free_above`.
    pub flat_fee: Decimal,
}

impl ShippingPolicy {
    /// Create a policy with a custom threshold and fee.
    #[must_use]
    pub const fn new(free_above: Decimal, flat_fee: Decimal) -> Self {
        Self {
            free_above,
            flat_fee,
        }
    }

    /// Shipping charged for a given subtotal.
    #[must_use]
    pub fn fee_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.free_above {
            Decimal::ZERO
        } else {
            self.flat_fee
        }
    }
}

impl Default for ShippingPolicy {
    /// Free shipping above $100, otherwise $10.
    fn default() -> Self {
        Self::new(Decimal::ONE_HUNDRED, Decimal::TEN)
    }
}

/// Totals derived from a cart snapshot. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub item_count: u32,
}

impl Totals {
    /// Combine a subtotal and item count under a shipping policy.
    #[must_use]
    pub fn new(subtotal: Decimal, item_count: u32, policy: &ShippingPolicy) -> Self {
        let shipping = policy.fee_for(subtotal);
        Self {
            subtotal,
            shipping,
            total: subtotal.saturating_add(shipping),
            item_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        let policy = ShippingPolicy::default();
        assert_eq!(policy.fee_for(Decimal::ZERO), Decimal::TEN);
        assert_eq!(policy.fee_for(Decimal::ONE_HUNDRED), Decimal::TEN);
        assert_eq!(policy.fee_for(Decimal::new(10001, 2)), Decimal::ZERO);
    }

    #[test]
    fn test_custom_policy() {
        let policy = ShippingPolicy::new(Decimal::from(50), Decimal::new(499, 2));
        assert_eq!(policy.fee_for(Decimal::from(50)), Decimal::new(499, 2));
        assert_eq!(policy.fee_for(Decimal::from(51)), Decimal::ZERO);
    }

    #[test]
    fn test_totals_adds_shipping() {
        let totals = Totals::new(Decimal::from(20), 1, &ShippingPolicy::default());
        assert_eq!(totals.shipping, Decimal::TEN);
        assert_eq!(totals.total, Decimal::from(30));
        assert_eq!(totals.item_count, 1);
    }

    #[test]
    fn test_totals_at_decimal_max() {
        let policy = ShippingPolicy::new(Decimal::MAX, Decimal::TEN);
        let totals = Totals::new(Decimal::MAX, 0, &policy);
        assert_eq!(totals.shipping, Decimal::TEN);
        assert_eq!(totals.total, Decimal::MAX);
    }
}
