use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tracing::debug;

use kk_core::ports::SettingsPort;
use kk_core::Settings;

/// In-process settings cache over the settings port.
///
/// Readers get the latest saved value synchronously; subscribers are notified after
/// every successful save.
#[derive(Clone)]
pub struct SettingsStore {
    port: Arc<dyn SettingsPort>,
    tx: Arc<watch::Sender<Settings>>,
}

impl SettingsStore {
    pub async fn load(port: Arc<dyn SettingsPort>) -> Result<Self> {
        let initial = port.load().await?;
        let (tx, _) = watch::channel(initial);
        Ok(Self {
            port,
            tx: Arc::new(tx),
        })
    }

    pub fn current(&self) -> Settings {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    /// Persists first; the cached value only changes once the write succeeded.
    pub async fn save(&self, settings: Settings) -> Result<()> {
        self.port.save(&settings).await?;
        self.tx.send_replace(settings);
        debug!("settings published");
        Ok(())
    }

    pub async fn reset(&self) -> Result<Settings> {
        let defaults = Settings::default();
        self.save(defaults.clone()).await?;
        Ok(defaults)
    }
}
