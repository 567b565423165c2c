use std::sync::{Arc, Mutex};

use axum::response::Response;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::checkout::store::{SettingsStore, SettingsStoreError};
use crate::checkout::{
    checkout_router, CartSummary, CurrencyFormatter, MinimumOrderService, PriceFormat,
    ThresholdSettings,
};

pub(super) fn settings() -> ThresholdSettings {
    ThresholdSettings::default()
}

pub(super) fn cart(subtotal: Decimal, discount_total: Decimal) -> CartSummary {
    CartSummary::new(subtotal, discount_total)
}

pub(super) fn short_cart() -> CartSummary {
    cart(dec!(40), dec!(0))
}

pub(super) fn dollars() -> PriceFormat {
    PriceFormat::default()
}

pub(super) fn formatter() -> Arc<dyn CurrencyFormatter> {
    Arc::new(dollars())
}

pub(super) fn build_service(
    settings: ThresholdSettings,
) -> (MinimumOrderService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_settings(settings));
    let service = MinimumOrderService::new(store.clone(), formatter());
    (service, store)
}

#[derive(Default)]
pub(super) struct MemoryStore {
    settings: Mutex<ThresholdSettings>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub(super) fn with_settings(settings: ThresholdSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
            saves: Mutex::new(0),
        }
    }

    pub(super) fn saves(&self) -> usize {
        *self.saves.lock().expect("store mutex poisoned")
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<ThresholdSettings, SettingsStoreError> {
        Ok(self.settings.lock().expect("store mutex poisoned").clone())
    }

    fn save(&self, settings: ThresholdSettings) -> Result<(), SettingsStoreError> {
        *self.settings.lock().expect("store mutex poisoned") = settings;
        *self.saves.lock().expect("store mutex poisoned") += 1;
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl SettingsStore for UnavailableStore {
    fn load(&self) -> Result<ThresholdSettings, SettingsStoreError> {
        Err(SettingsStoreError::Unavailable("options table offline".to_string()))
    }

    fn save(&self, _settings: ThresholdSettings) -> Result<(), SettingsStoreError> {
        Err(SettingsStoreError::Unavailable("options table offline".to_string()))
    }
}

pub(super) fn router_with_settings(settings: ThresholdSettings) -> axum::Router {
    let (service, _) = build_service(settings);
    checkout_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
