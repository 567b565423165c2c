use std::sync::{Arc, Mutex};

use min_order::checkout::{
    evaluate, CartSummary, CheckoutVerdict, MinimumOrderService, NoticeKind, PriceFormat,
    SettingsStore, SettingsStoreError, Shopper, ThresholdSettings,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct FixedStore(Mutex<ThresholdSettings>);

impl SettingsStore for FixedStore {
    fn load(&self) -> Result<ThresholdSettings, SettingsStoreError> {
        Ok(self.0.lock().expect("store mutex poisoned").clone())
    }

    fn save(&self, settings: ThresholdSettings) -> Result<(), SettingsStoreError> {
        *self.0.lock().expect("store mutex poisoned") = settings;
        Ok(())
    }
}

fn service(settings: ThresholdSettings) -> MinimumOrderService<FixedStore> {
    MinimumOrderService::new(
        Arc::new(FixedStore(Mutex::new(settings))),
        Arc::new(PriceFormat::default()),
    )
}

#[test]
fn scenario_short_cart_needs_ten_more() {
    let decision = evaluate(
        &ThresholdSettings::default(),
        &CartSummary::new(dec!(40), Decimal::ZERO),
        false,
    );

    assert!(decision.is_below_threshold);
    assert_eq!(decision.effective_subtotal, dec!(40));
    assert_eq!(decision.remaining, dec!(10));
}

#[test]
fn scenario_cart_over_threshold_passes() {
    let decision = evaluate(
        &ThresholdSettings::default(),
        &CartSummary::new(dec!(60), Decimal::ZERO),
        false,
    );

    assert!(!decision.is_below_threshold);
    assert_eq!(decision.remaining, Decimal::ZERO);
}

#[test]
fn scenario_coupon_drops_cart_below_threshold() {
    let decision = evaluate(
        &ThresholdSettings::default(),
        &CartSummary::new(dec!(60), dec!(20)),
        false,
    );

    assert_eq!(decision.effective_subtotal, dec!(40));
    assert!(decision.is_below_threshold);
    assert_eq!(decision.remaining, dec!(10));
}

#[test]
fn scenario_zero_threshold_disables_blocking() {
    let settings = ThresholdSettings {
        min_amount: Decimal::ZERO,
        ..ThresholdSettings::default()
    };

    for subtotal in [dec!(0), dec!(0.01), dec!(49.99), dec!(1000)] {
        let decision = evaluate(&settings, &CartSummary::new(subtotal, Decimal::ZERO), false);
        assert!(!decision.is_below_threshold);
    }
}

#[test]
fn scenario_cart_notice_renders_dollar_amounts() {
    let settings = ThresholdSettings::default();
    let decision = evaluate(&settings, &CartSummary::new(dec!(40), Decimal::ZERO), false);

    assert_eq!(
        decision
            .message(NoticeKind::Cart, &settings, &PriceFormat::default())
            .as_deref(),
        Some("Minimum order amount is $50.00. Add $10.00 more to proceed.")
    );
}

#[test]
fn cart_view_then_checkout_for_same_shopper() {
    let service = service(ThresholdSettings::default());
    let cart = CartSummary::new(dec!(45), dec!(10));
    let shopper = Shopper::member(["customer"]);

    let view = service.on_cart_view(&cart, &shopper).expect("cart view");
    assert_eq!(
        view.notice.as_deref(),
        Some("Minimum order amount is $50.00. Add $15.00 more to proceed.")
    );

    match service
        .on_checkout_validate(&cart, &shopper)
        .expect("checkout validates")
    {
        CheckoutVerdict::Blocked { message, .. } => assert_eq!(
            message,
            "Minimum order amount is $50.00. Your current subtotal is $35.00."
        ),
        other => panic!("expected blocked checkout, got {other:?}"),
    }

    let topped_up = CartSummary::new(dec!(65), dec!(10));
    let verdict = service
        .on_checkout_validate(&topped_up, &shopper)
        .expect("checkout validates");
    assert!(matches!(verdict, CheckoutVerdict::Allowed { .. }));
}
