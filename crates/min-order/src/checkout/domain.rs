use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monetary snapshot of the cart, excluding tax and shipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartSummary {
    pub subtotal: Decimal,
    #[serde(default)]
    pub discount_total: Decimal,
}

impl CartSummary {
    pub fn new(subtotal: Decimal, discount_total: Decimal) -> Self {
        Self {
            subtotal,
            discount_total,
        }
    }

    /// Rejects negative figures; the evaluator expects non-negative amounts.
    pub fn validate(&self) -> Result<(), InvalidCart> {
        if self.subtotal.is_sign_negative() && !self.subtotal.is_zero() {
            return Err(InvalidCart::NegativeAmount { field: "subtotal" });
        }
        if self.discount_total.is_sign_negative() && !self.discount_total.is_zero() {
            return Err(InvalidCart::NegativeAmount {
                field: "discount_total",
            });
        }
        Ok(())
    }
}

/// Cart figures the storefront reported that cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCart {
    #[error("cart {field} must not be negative")]
    NegativeAmount { field: &'static str },
}

/// Role identifier as stored by the host platform (e.g. `shop_manager`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub String);

impl RoleId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The person viewing the cart or attempting checkout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Shopper {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default)]
    pub roles: BTreeSet<RoleId>,
}

impl Shopper {
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn member<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            logged_in: true,
            roles: roles.into_iter().map(RoleId::new).collect(),
        }
    }

    pub fn has_role(&self, role: &RoleId) -> bool {
        self.roles.contains(role)
    }
}

/// Which template a rendered message is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Informational notice shown before checkout.
    Cart,
    /// Error surfaced when checkout is refused.
    Block,
}
