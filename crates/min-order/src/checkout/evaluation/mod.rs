mod policy;
mod rules;

pub use policy::EnforcementBypass;
pub use rules::compute_effective_subtotal;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{CartSummary, NoticeKind};
use super::notice::{render_message, CurrencyFormatter};
use super::settings::ThresholdSettings;
use policy::bypass_for;

/// Outcome of comparing a cart against the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub is_below_threshold: bool,
    pub effective_subtotal: Decimal,
    pub remaining: Decimal,
    pub min_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bypass: Option<EnforcementBypass>,
}

impl Decision {
    /// Rendered notice or blocking error, only when the cart falls short.
    pub fn message(
        &self,
        kind: NoticeKind,
        settings: &ThresholdSettings,
        formatter: &dyn CurrencyFormatter,
    ) -> Option<String> {
        if !self.is_below_threshold {
            return None;
        }

        Some(render_message(
            settings.template(kind),
            settings,
            self.effective_subtotal,
            self.remaining,
            formatter,
        ))
    }

    pub fn is_enforced(&self) -> bool {
        self.bypass.is_none()
    }
}

/// Stateless: every call reads only its arguments.
pub fn evaluate(
    settings: &ThresholdSettings,
    cart: &CartSummary,
    is_exempt_actor: bool,
) -> Decision {
    let effective_subtotal = compute_effective_subtotal(settings, cart);

    if let Some(bypass) = bypass_for(settings, is_exempt_actor) {
        return Decision {
            is_below_threshold: false,
            effective_subtotal,
            remaining: Decimal::ZERO,
            min_amount: settings.min_amount,
            bypass: Some(bypass),
        };
    }

    Decision {
        is_below_threshold: effective_subtotal < settings.min_amount,
        effective_subtotal,
        remaining: rules::remaining(settings.min_amount, effective_subtotal),
        min_amount: settings.min_amount,
        bypass: None,
    }
}
