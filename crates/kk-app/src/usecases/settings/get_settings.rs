//! Use case for reading application settings
//! 获取应用设置的用例

use anyhow::Result;
use tracing::{info_span, Instrument};

use kk_core::Settings;

use super::store::SettingsStore;

pub struct GetSettings {
    store: SettingsStore,
}

impl GetSettings {
    pub fn new(store: SettingsStore) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> Result<Settings> {
        let span = info_span!("usecase.get_settings.execute");
        async { Ok(self.store.current()) }.instrument(span).await
    }
}
