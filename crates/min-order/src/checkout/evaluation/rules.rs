use rust_decimal::Decimal;

use super::super::domain::CartSummary;
use super::super::settings::ThresholdSettings;

/// Amount compared against the threshold, never below zero.
///
/// Negative inputs are clamped to zero before subtracting, so the result stays
/// within `0..=subtotal`.
pub fn compute_effective_subtotal(settings: &ThresholdSettings, cart: &CartSummary) -> Decimal {
    let subtotal = cart.subtotal.max(Decimal::ZERO);
    if !settings.apply_after_coupons {
        return subtotal;
    }

    let discount = cart.discount_total.max(Decimal::ZERO);
    subtotal
        .checked_sub(discount)
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
}

pub(crate) fn remaining(min_amount: Decimal, effective_subtotal: Decimal) -> Decimal {
    min_amount
        .checked_sub(effective_subtotal)
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
}
