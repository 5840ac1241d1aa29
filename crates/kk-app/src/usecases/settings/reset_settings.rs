use anyhow::Result;
use tracing::{info, info_span, Instrument};

use kk_core::Settings;

use super::store::SettingsStore;

/// Restores every preference to its default and persists the result.
pub struct ResetSettings {
    store: SettingsStore,
}

impl ResetSettings {
    pub fn new(store: SettingsStore) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> Result<Settings> {
        let span = info_span!("usecase.reset_settings.execute");
        async {
            let defaults = self.store.reset().await?;
            info!("Settings reset to defaults");
            Ok(defaults)
        }
        .instrument(span)
        .await
    }
}
