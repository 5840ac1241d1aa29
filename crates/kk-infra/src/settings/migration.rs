use anyhow::{anyhow, Result};
use kk_core::ports::SettingsMigrationPort;
use kk_core::settings::model::{Settings, CURRENT_SCHEMA_VERSION};
use tracing::info;

pub struct SettingsMigrator {
    migrations: Vec<Box<dyn SettingsMigrationPort>>,
}

impl SettingsMigrator {
    pub fn new() -> Self {
        Self::with_migrations(Vec::new())
    }

    pub fn with_migrations(migrations: Vec<Box<dyn SettingsMigrationPort>>) -> Self {
        Self { migrations }
    }

    /// Applies migrations one version at a time until the current schema is reached.
    /// Files written by a newer build are returned untouched.
    pub fn migrate_to_latest(&self, mut settings: Settings) -> Result<Settings> {
        while settings.schema_version < CURRENT_SCHEMA_VERSION {
            let current = settings.schema_version;
            let migration = self
                .migrations
                .iter()
                .find(|m| m.from_version() == current)
                .ok_or_else(|| anyhow!("no settings migration found from version {current}"))?;

            settings = migration.migrate(settings);
            settings.schema_version = migration.to_version();
            info!(from = current, to = settings.schema_version, "settings migrated");
        }

        Ok(settings)
    }
}

impl Default for SettingsMigrator {
    fn default() -> Self {
        Self::new()
    }
}
