//! Minimum order enforcement for the cart page and checkout validation.
//!
//! The evaluator itself is a pure function of settings and cart figures; the
//! service layer loads settings per request, resolves role exemptions and turns
//! decisions into notices or blocking errors.

pub mod domain;
mod evaluation;
pub mod notice;
pub mod router;
pub mod service;
pub mod settings;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{CartSummary, InvalidCart, NoticeKind, RoleId, Shopper};
pub use evaluation::{compute_effective_subtotal, evaluate, Decision, EnforcementBypass};
pub use notice::{render_message, CurrencyFormatter, PriceFormat, SymbolPosition};
pub use router::{checkout_router, CheckoutRequest};
pub use service::{CartView, CheckoutVerdict, MinimumOrderError, MinimumOrderService};
pub use settings::{SettingsInput, ThresholdSettings};
pub use store::{SettingsStore, SettingsStoreError};
