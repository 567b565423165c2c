use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{NoticeKind, RoleId, Shopper};

pub const DEFAULT_MIN_AMOUNT: i64 = 50;
pub const DEFAULT_EXCLUDED_ROLES: [&str; 2] = ["administrator", "shop_manager"];
pub const DEFAULT_NOTICE_CART: &str =
    "Minimum order amount is {min}. Add {remaining} more to proceed.";
pub const DEFAULT_NOTICE_BLOCK: &str =
    "Minimum order amount is {min}. Your current subtotal is {subtotal}.";

/// Storefront rule controlling the minimum order subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdSettings {
    pub enabled: bool,
    /// Zero or negative disables blocking.
    pub min_amount: Decimal,
    pub apply_after_coupons: bool,
    pub exclude_roles: BTreeSet<RoleId>,
    pub notice_cart: String,
    pub notice_block: String,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_amount: Decimal::from(DEFAULT_MIN_AMOUNT),
            apply_after_coupons: true,
            exclude_roles: DEFAULT_EXCLUDED_ROLES
                .iter()
                .map(|role| RoleId::new(*role))
                .collect(),
            notice_cart: DEFAULT_NOTICE_CART.to_string(),
            notice_block: DEFAULT_NOTICE_BLOCK.to_string(),
        }
    }
}

impl ThresholdSettings {
    /// Template used for the given notice kind.
    pub fn template(&self, kind: NoticeKind) -> &str {
        match kind {
            NoticeKind::Cart => &self.notice_cart,
            NoticeKind::Block => &self.notice_block,
        }
    }

    /// Signed-in shoppers holding any excluded role skip enforcement. Guests never do.
    pub fn exempts(&self, shopper: &Shopper) -> bool {
        if self.exclude_roles.is_empty() || !shopper.logged_in {
            return false;
        }
        self.exclude_roles.iter().any(|role| shopper.has_role(role))
    }
}

/// Raw admin form submission. Checkboxes that are absent count as unchecked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsInput {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub min_amount: Option<Decimal>,
    #[serde(default)]
    pub apply_after_coupons: Option<bool>,
    /// Comma-separated role keys, e.g. `administrator, shop_manager`.
    #[serde(default)]
    pub exclude_roles: Option<String>,
    #[serde(default)]
    pub notice_cart: Option<String>,
    #[serde(default)]
    pub notice_block: Option<String>,
}

impl SettingsInput {
    pub fn sanitize(self) -> ThresholdSettings {
        let defaults = ThresholdSettings::default();

        let exclude_roles = self
            .exclude_roles
            .as_deref()
            .map(parse_role_list)
            .unwrap_or_default();

        ThresholdSettings {
            enabled: self.enabled.unwrap_or(false),
            min_amount: self.min_amount.unwrap_or(defaults.min_amount),
            apply_after_coupons: self.apply_after_coupons.unwrap_or(false),
            exclude_roles,
            notice_cart: self
                .notice_cart
                .map(|value| sanitize_text(&value))
                .unwrap_or(defaults.notice_cart),
            notice_block: self
                .notice_block
                .map(|value| sanitize_text(&value))
                .unwrap_or(defaults.notice_block),
        }
    }
}

/// Splits a comma-separated role list into normalized keys, dropping blanks.
pub fn parse_role_list(raw: &str) -> BTreeSet<RoleId> {
    raw.split(',')
        .map(sanitize_key)
        .filter(|key| !key.is_empty())
        .map(RoleId)
        .collect()
}

/// Lowercases and keeps only `[a-z0-9_-]`.
pub fn sanitize_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '_' || *ch == '-')
        .collect()
}

/// Strips markup tags and percent-encoded octets, collapses whitespace runs
/// (including newlines) and trims.
pub fn sanitize_text(raw: &str) -> String {
    let mut stripped = strip_tags(raw);
    loop {
        let next = strip_percent_octets(&stripped);
        if next == stripped {
            break;
        }
        stripped = next;
    }
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One pass removing `%XX` hex escapes; removal can expose a new one, so callers repeat.
fn strip_percent_octets(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch == '%' {
            let mut lookahead = chars.clone();
            let high = lookahead.next();
            let low = lookahead.next();
            if let (Some(high), Some(low)) = (high, low) {
                if high.is_ascii_hexdigit() && low.is_ascii_hexdigit() {
                    chars = lookahead;
                    continue;
                }
            }
        }
        out.push(ch);
    }
    out
}

fn strip_tags(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(open) = rest.find('<') {
        let (before, tail) = rest.split_at(open);
        out.push_str(before);
        match tail.find('>') {
            Some(close) => rest = &tail[close + 1..],
            None => {
                // unterminated tag, keep literally
                out.push_str(tail);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
