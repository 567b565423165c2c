use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use rust_decimal::Decimal;

use crate::checkout::settings::{parse_role_list, sanitize_text};
use crate::checkout::{PriceFormat, SymbolPosition, ThresholdSettings};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storefront: StorefrontConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storefront: StorefrontConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Minimum order rule and price display seeded at startup.
#[derive(Debug, Clone, Default)]
pub struct StorefrontConfig {
    pub settings: ThresholdSettings,
    pub price_format: PriceFormat,
}

impl StorefrontConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut settings = ThresholdSettings::default();

        if let Some(raw) = optional_var("MIN_ORDER_ENABLED") {
            settings.enabled = parse_flag("MIN_ORDER_ENABLED", &raw)?;
        }
        if let Some(raw) = optional_var("MIN_ORDER_AMOUNT") {
            settings.min_amount = parse_amount("MIN_ORDER_AMOUNT", &raw)?;
        }
        if let Some(raw) = optional_var("MIN_ORDER_APPLY_AFTER_COUPONS") {
            settings.apply_after_coupons = parse_flag("MIN_ORDER_APPLY_AFTER_COUPONS", &raw)?;
        }
        if let Some(raw) = optional_var("MIN_ORDER_EXCLUDE_ROLES") {
            settings.exclude_roles = parse_role_list(&raw);
        }
        if let Some(raw) = optional_var("MIN_ORDER_NOTICE_CART") {
            settings.notice_cart = sanitize_text(&raw);
        }
        if let Some(raw) = optional_var("MIN_ORDER_NOTICE_BLOCK") {
            settings.notice_block = sanitize_text(&raw);
        }

        let mut price_format = PriceFormat::default();

        if let Some(raw) = optional_var("CURRENCY_SYMBOL") {
            price_format.symbol = raw;
        }
        if let Some(raw) = optional_var("CURRENCY_POSITION") {
            price_format.position = SymbolPosition::parse(&raw)
                .ok_or(ConfigError::InvalidSymbolPosition { value: raw })?;
        }
        if let Some(raw) = optional_var("CURRENCY_DECIMALS") {
            price_format.decimals = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|places| *places <= MAX_PRICE_DECIMALS)
                .ok_or(ConfigError::InvalidDecimals)?;
        }
        if let Some(raw) = optional_var("CURRENCY_DECIMAL_SEPARATOR") {
            price_format.decimal_separator = raw;
        }
        if let Some(raw) = optional_var("CURRENCY_THOUSAND_SEPARATOR") {
            price_format.thousand_separator = raw;
        }

        Ok(Self {
            settings,
            price_format,
        })
    }
}

const MAX_PRICE_DECIMALS: u32 = 8;

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name }),
    }
}

fn parse_amount(name: &'static str, raw: &str) -> Result<Decimal, ConfigError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|source| ConfigError::InvalidAmount { name, source })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidFlag {
        name: &'static str,
    },
    InvalidAmount {
        name: &'static str,
        source: rust_decimal::Error,
    },
    InvalidSymbolPosition {
        value: String,
    },
    InvalidDecimals,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlag { name } => {
                write!(f, "{name} must be one of true/false, yes/no, on/off, 1/0")
            }
            ConfigError::InvalidAmount { name, .. } => {
                write!(f, "{name} must be a decimal amount")
            }
            ConfigError::InvalidSymbolPosition { value } => write!(
                f,
                "CURRENCY_POSITION '{value}' must be left, right, left_space or right_space"
            ),
            ConfigError::InvalidDecimals => write!(
                f,
                "CURRENCY_DECIMALS must be an integer between 0 and {MAX_PRICE_DECIMALS}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidAmount { source, .. } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidFlag { .. }
            | ConfigError::InvalidSymbolPosition { .. }
            | ConfigError::InvalidDecimals => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{CurrencyFormatter, RoleId};
    use rust_decimal_macros::dec;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    const STOREFRONT_VARS: [&str; 11] = [
        "MIN_ORDER_ENABLED",
        "MIN_ORDER_AMOUNT",
        "MIN_ORDER_APPLY_AFTER_COUPONS",
        "MIN_ORDER_EXCLUDE_ROLES",
        "MIN_ORDER_NOTICE_CART",
        "MIN_ORDER_NOTICE_BLOCK",
        "CURRENCY_SYMBOL",
        "CURRENCY_POSITION",
        "CURRENCY_DECIMALS",
        "CURRENCY_DECIMAL_SEPARATOR",
        "CURRENCY_THOUSAND_SEPARATOR",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        for name in STOREFRONT_VARS {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.storefront.settings, ThresholdSettings::default());
        assert_eq!(config.storefront.price_format, PriceFormat::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn storefront_overrides_are_applied() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MIN_ORDER_ENABLED", "off");
        env::set_var("MIN_ORDER_AMOUNT", "75.50");
        env::set_var("MIN_ORDER_APPLY_AFTER_COUPONS", "0");
        env::set_var("MIN_ORDER_EXCLUDE_ROLES", " Wholesale , ,staff ");
        env::set_var("CURRENCY_SYMBOL", "€");
        env::set_var("CURRENCY_POSITION", "right_space");

        let config = AppConfig::load().expect("config loads");
        reset_env();

        let settings = &config.storefront.settings;
        assert!(!settings.enabled);
        assert_eq!(settings.min_amount, dec!(75.50));
        assert!(!settings.apply_after_coupons);
        assert_eq!(
            settings.exclude_roles.iter().collect::<Vec<_>>(),
            vec![&RoleId::new("staff"), &RoleId::new("wholesale")]
        );
        assert_eq!(config.storefront.price_format.format(dec!(5)), "5.00 €");
    }

    #[test]
    fn rejects_malformed_amount() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MIN_ORDER_AMOUNT", "fifty");
        let err = AppConfig::load().expect_err("amount must parse");
        reset_env();
        assert!(matches!(
            err,
            ConfigError::InvalidAmount {
                name: "MIN_ORDER_AMOUNT",
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_flag_value() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MIN_ORDER_ENABLED", "maybe");
        let err = AppConfig::load().expect_err("flag must parse");
        reset_env();
        assert_eq!(
            err.to_string(),
            "MIN_ORDER_ENABLED must be one of true/false, yes/no, on/off, 1/0"
        );
    }
}
