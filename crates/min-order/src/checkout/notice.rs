use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::settings::ThresholdSettings;

pub const MIN_TOKEN: &str = "{min}";
pub const REMAINING_TOKEN: &str = "{remaining}";
pub const SUBTOTAL_TOKEN: &str = "{subtotal}";

/// Turns an amount into the storefront's human-readable price.
pub trait CurrencyFormatter: Send + Sync {
    fn format(&self, amount: Decimal) -> String;
}

impl<F> CurrencyFormatter for F
where
    F: Fn(Decimal) -> String + Send + Sync,
{
    fn format(&self, amount: Decimal) -> String {
        self(amount)
    }
}

/// Substitutes `{min}`, `{remaining}` and `{subtotal}` in one pass.
///
/// Replacement text is never rescanned, and unknown `{...}` tokens are copied
/// through untouched.
pub fn render_message(
    template: &str,
    settings: &ThresholdSettings,
    effective_subtotal: Decimal,
    remaining: Decimal,
    formatter: &dyn CurrencyFormatter,
) -> String {
    let replacements = [
        (MIN_TOKEN, settings.min_amount),
        (REMAINING_TOKEN, remaining),
        (SUBTOTAL_TOKEN, effective_subtotal),
    ];

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let (before, tail) = rest.split_at(open);
        out.push_str(before);

        match replacements
            .iter()
            .find(|(token, _)| tail.starts_with(token))
        {
            Some((token, amount)) => {
                out.push_str(&formatter.format(*amount));
                rest = &tail[token.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Where the currency symbol sits relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPosition {
    #[default]
    Left,
    Right,
    LeftSpace,
    RightSpace,
}

impl SymbolPosition {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "left_space" => Some(Self::LeftSpace),
            "right_space" => Some(Self::RightSpace),
            _ => None,
        }
    }
}

/// Storefront price display conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFormat {
    pub symbol: String,
    pub position: SymbolPosition,
    pub decimal_separator: String,
    pub thousand_separator: String,
    pub decimals: u32,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            position: SymbolPosition::Left,
            decimal_separator: ".".to_string(),
            thousand_separator: ",".to_string(),
            decimals: 2,
        }
    }
}

impl PriceFormat {
    fn is_negative(&self, amount: Decimal) -> bool {
        let rounded =
            amount.round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero);
        rounded.is_sign_negative() && !rounded.is_zero()
    }

    fn number(&self, amount: Decimal) -> String {
        let mut rounded =
            amount.round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(self.decimals);

        let text = rounded.abs().to_string();
        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (text.as_str(), None),
        };

        let mut out = group_thousands(whole, &self.thousand_separator);
        if let Some(fraction) = fraction {
            out.push_str(&self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }
}

impl CurrencyFormatter for PriceFormat {
    fn format(&self, amount: Decimal) -> String {
        let number = self.number(amount);
        let price = match self.position {
            SymbolPosition::Left => format!("{}{}", self.symbol, number),
            SymbolPosition::Right => format!("{}{}", number, self.symbol),
            SymbolPosition::LeftSpace => format!("{} {}", self.symbol, number),
            SymbolPosition::RightSpace => format!("{} {}", number, self.symbol),
        };

        if self.is_negative(amount) {
            format!("-{price}")
        } else {
            price
        }
    }
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
