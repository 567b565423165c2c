use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::super::settings::ThresholdSettings;

/// Reason enforcement was skipped for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementBypass {
    /// The master switch is off.
    Disabled,
    /// The shopper holds an excluded role.
    ExemptActor,
    /// Threshold is zero or negative.
    ThresholdDisabled,
}

impl EnforcementBypass {
    pub fn summary(&self) -> &'static str {
        match self {
            EnforcementBypass::Disabled => "minimum order enforcement disabled",
            EnforcementBypass::ExemptActor => "shopper role exempt from minimum order",
            EnforcementBypass::ThresholdDisabled => "no positive minimum order amount configured",
        }
    }
}

/// Short-circuits are checked in a fixed order: switch, exemption, threshold.
pub(crate) fn bypass_for(
    settings: &ThresholdSettings,
    is_exempt_actor: bool,
) -> Option<EnforcementBypass> {
    if !settings.enabled {
        return Some(EnforcementBypass::Disabled);
    }

    if is_exempt_actor {
        return Some(EnforcementBypass::ExemptActor);
    }

    if settings.min_amount <= Decimal::ZERO {
        return Some(EnforcementBypass::ThresholdDisabled);
    }

    None
}
