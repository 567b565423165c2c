use crate::infra::InMemorySettingsStore;
use clap::Args;
use min_order::checkout::{
    CartSummary, CartView, CheckoutVerdict, CurrencyFormatter, MinimumOrderService, Shopper,
    ThresholdSettings,
};
use min_order::config::AppConfig;
use min_order::error::AppError;
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Cart subtotal excluding tax and shipping
    #[arg(long)]
    pub(crate) subtotal: Decimal,
    /// Coupon discount total excluding tax
    #[arg(long, default_value = "0")]
    pub(crate) discount: Decimal,
    /// Role held by the signed-in shopper (repeatable)
    #[arg(long = "role")]
    pub(crate) roles: Vec<String>,
    /// Evaluate as a guest; roles are ignored
    #[arg(long)]
    pub(crate) guest: bool,
    /// Override the configured minimum order amount
    #[arg(long)]
    pub(crate) min_amount: Option<Decimal>,
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let mut settings = config.storefront.settings.clone();
    if let Some(min_amount) = args.min_amount {
        settings.min_amount = min_amount;
    }

    let store = Arc::new(InMemorySettingsStore::new(settings.clone()));
    let service = MinimumOrderService::new(store, Arc::new(config.storefront.price_format));

    let cart = CartSummary::new(args.subtotal, args.discount);
    let shopper = if args.guest {
        Shopper::guest()
    } else {
        Shopper::member(args.roles)
    };

    let view = service.on_cart_view(&cart, &shopper)?;
    let verdict = service.on_checkout_validate(&cart, &shopper)?;

    for line in render_check(&settings, &cart, &view, &verdict, service.formatter()) {
        println!("{line}");
    }

    Ok(())
}

pub(crate) fn render_check(
    settings: &ThresholdSettings,
    cart: &CartSummary,
    view: &CartView,
    verdict: &CheckoutVerdict,
    formatter: &dyn CurrencyFormatter,
) -> Vec<String> {
    let decision = &view.decision;
    let mut lines = vec![
        "Minimum order check".to_string(),
        format!(
            "Cart: subtotal {} | discounts {} | compared {}",
            formatter.format(cart.subtotal),
            formatter.format(cart.discount_total),
            formatter.format(decision.effective_subtotal)
        ),
        format!(
            "Threshold: {} ({})",
            formatter.format(settings.min_amount),
            if settings.apply_after_coupons {
                "after coupons"
            } else {
                "before coupons"
            }
        ),
    ];

    match decision.bypass {
        Some(bypass) => lines.push(format!("Enforcement: skipped, {}", bypass.summary())),
        None => lines.push(format!(
            "Enforcement: active, {} remaining",
            formatter.format(decision.remaining)
        )),
    }

    match &view.notice {
        Some(notice) => lines.push(format!("Cart notice: {notice}")),
        None => lines.push("Cart notice: none".to_string()),
    }

    match verdict {
        CheckoutVerdict::Allowed { .. } => lines.push("Checkout: allowed".to_string()),
        CheckoutVerdict::Blocked { message, .. } => {
            lines.push(format!("Checkout: blocked ({message})"))
        }
    }

    lines
}
