use super::settings::ThresholdSettings;

/// Storage abstraction for the storefront's minimum order settings.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<ThresholdSettings, SettingsStoreError>;
    fn save(&self, settings: ThresholdSettings) -> Result<(), SettingsStoreError>;
}

/// Error enumeration for settings storage failures.
#[derive(Debug, thiserror::Error)]
pub enum SettingsStoreError {
    #[error("settings store unavailable: {0}")]
    Unavailable(String),
}
