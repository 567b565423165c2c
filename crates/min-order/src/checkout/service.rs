use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::domain::{CartSummary, InvalidCart, NoticeKind, Shopper};
use super::evaluation::{evaluate, Decision};
use super::notice::{render_message, CurrencyFormatter};
use super::settings::{SettingsInput, ThresholdSettings};
use super::store::{SettingsStore, SettingsStoreError};

/// Entry points the storefront calls while rendering the cart and validating checkout.
pub struct MinimumOrderService<S> {
    store: Arc<S>,
    formatter: Arc<dyn CurrencyFormatter>,
}

/// Cart page result: the decision plus the notice to print, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Checkout validation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutVerdict {
    Allowed { decision: Decision },
    Blocked { decision: Decision, message: String },
}

impl CheckoutVerdict {
    pub fn decision(&self) -> &Decision {
        match self {
            CheckoutVerdict::Allowed { decision } | CheckoutVerdict::Blocked { decision, .. } => {
                decision
            }
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, CheckoutVerdict::Blocked { .. })
    }
}

impl<S> MinimumOrderService<S>
where
    S: SettingsStore + 'static,
{
    pub fn new(store: Arc<S>, formatter: Arc<dyn CurrencyFormatter>) -> Self {
        Self { store, formatter }
    }

    pub fn formatter(&self) -> &dyn CurrencyFormatter {
        self.formatter.as_ref()
    }

    /// Current settings, read fresh from the store.
    pub fn settings(&self) -> Result<ThresholdSettings, MinimumOrderError> {
        Ok(self.store.load()?)
    }

    /// Sanitize an admin submission and persist it.
    pub fn update_settings(
        &self,
        input: SettingsInput,
    ) -> Result<ThresholdSettings, MinimumOrderError> {
        let settings = input.sanitize();
        self.store.save(settings.clone())?;
        info!(
            enabled = settings.enabled,
            min_amount = %settings.min_amount,
            apply_after_coupons = settings.apply_after_coupons,
            excluded_roles = settings.exclude_roles.len(),
            "minimum order settings updated"
        );
        Ok(settings)
    }

    /// Evaluate the cart for the pre-checkout notice.
    pub fn on_cart_view(
        &self,
        cart: &CartSummary,
        shopper: &Shopper,
    ) -> Result<CartView, MinimumOrderError> {
        let (settings, decision) = self.decide(cart, shopper)?;
        let notice = decision.message(NoticeKind::Cart, &settings, self.formatter());
        Ok(CartView { decision, notice })
    }

    /// Evaluate the cart during checkout; a short cart is refused with the blocking message.
    pub fn on_checkout_validate(
        &self,
        cart: &CartSummary,
        shopper: &Shopper,
    ) -> Result<CheckoutVerdict, MinimumOrderError> {
        let (settings, decision) = self.decide(cart, shopper)?;

        match decision.message(NoticeKind::Block, &settings, self.formatter()) {
            Some(message) => {
                info!(
                    effective_subtotal = %decision.effective_subtotal,
                    min_amount = %decision.min_amount,
                    "checkout blocked below minimum order amount"
                );
                Ok(CheckoutVerdict::Blocked { decision, message })
            }
            None => Ok(CheckoutVerdict::Allowed { decision }),
        }
    }

    /// Live banner built from the cart template.
    ///
    /// Hidden whenever enforcement is bypassed; otherwise shown even after the
    /// threshold is met so the shopper sees their progress.
    pub fn banner(
        &self,
        cart: &CartSummary,
        shopper: &Shopper,
    ) -> Result<Option<String>, MinimumOrderError> {
        let (settings, decision) = self.decide(cart, shopper)?;
        if !decision.is_enforced() {
            return Ok(None);
        }

        Ok(Some(render_message(
            &settings.notice_cart,
            &settings,
            decision.effective_subtotal,
            decision.remaining,
            self.formatter(),
        )))
    }

    fn decide(
        &self,
        cart: &CartSummary,
        shopper: &Shopper,
    ) -> Result<(ThresholdSettings, Decision), MinimumOrderError> {
        cart.validate()?;
        let settings = self.store.load()?;
        let exempt = settings.exempts(shopper);
        let decision = evaluate(&settings, cart, exempt);

        debug!(
            subtotal = %cart.subtotal,
            discount_total = %cart.discount_total,
            effective_subtotal = %decision.effective_subtotal,
            remaining = %decision.remaining,
            below_threshold = decision.is_below_threshold,
            bypass = ?decision.bypass,
            "minimum order evaluated"
        );

        Ok((settings, decision))
    }
}

/// Error raised by the minimum order service.
#[derive(Debug, thiserror::Error)]
pub enum MinimumOrderError {
    #[error(transparent)]
    InvalidCart(#[from] InvalidCart),
    #[error(transparent)]
    Store(#[from] SettingsStoreError),
}
