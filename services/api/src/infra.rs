use metrics_exporter_prometheus::PrometheusHandle;
use min_order::checkout::{SettingsStore, SettingsStoreError, ThresholdSettings};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local settings store seeded from the startup configuration.
#[derive(Clone)]
pub(crate) struct InMemorySettingsStore {
    settings: Arc<RwLock<ThresholdSettings>>,
}

impl InMemorySettingsStore {
    pub(crate) fn new(settings: ThresholdSettings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
        }
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load(&self) -> Result<ThresholdSettings, SettingsStoreError> {
        let guard = self
            .settings
            .read()
            .map_err(|_| SettingsStoreError::Unavailable("settings lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, settings: ThresholdSettings) -> Result<(), SettingsStoreError> {
        let mut guard = self
            .settings
            .write()
            .map_err(|_| SettingsStoreError::Unavailable("settings lock poisoned".to_string()))?;
        *guard = settings;
        Ok(())
    }
}
