//! Use case for updating application settings
//! 更新应用设置的用例

use tracing::{info, info_span, Instrument};

use kk_core::settings::model::CURRENT_SCHEMA_VERSION;
use kk_core::Settings;

use super::error::SettingsError;
use super::store::SettingsStore;

/// Validates, logs a field diff, persists and publishes new settings.
pub struct UpdateSettings {
    store: SettingsStore,
}

impl UpdateSettings {
    pub fn new(store: SettingsStore) -> Self {
        Self { store }
    }

    pub async fn execute(&self, settings: Settings) -> Result<(), SettingsError> {
        let span = info_span!("usecase.update_settings.execute");

        async {
            if settings.schema_version != CURRENT_SCHEMA_VERSION {
                return Err(SettingsError::InvalidSchemaVersion {
                    expected: CURRENT_SCHEMA_VERSION,
                    actual: settings.schema_version,
                });
            }
            if !Settings::is_supported_language(&settings.language) {
                return Err(SettingsError::UnsupportedLanguage(settings.language));
            }

            let old_settings = self.store.current();
            let changes = SettingsDiff::diff(&old_settings, &settings);
            if changes.is_empty() {
                info!("Updating application settings (no changes detected)");
            } else {
                info!(
                    changed_fields = %changes.to_log_string(),
                    "Updating application settings"
                );
            }

            self.store.save(settings).await?;

            info!(
                changed_fields = %changes.to_log_string(),
                "Settings updated successfully"
            );
            Ok(())
        }
        .instrument(span)
        .await
    }
}

/// Old/new pairs for every field that changed.
struct SettingsDiff {
    precision_enabled: Option<(bool, bool)>,
    rounding_mode: Option<(String, String)>,
    auto_delete_days: Option<(i32, i32)>,
    language: Option<(String, String)>,
    cm_to_kol_default: Option<(bool, bool)>,
}

impl SettingsDiff {
    fn diff(old: &Settings, new: &Settings) -> Self {
        Self {
            precision_enabled: (old.precision_enabled != new.precision_enabled)
                .then_some((old.precision_enabled, new.precision_enabled)),
            rounding_mode: (old.rounding_mode != new.rounding_mode).then(|| {
                (
                    old.rounding_mode.to_string(),
                    new.rounding_mode.to_string(),
                )
            }),
            auto_delete_days: (old.auto_delete_days != new.auto_delete_days)
                .then_some((old.auto_delete_days, new.auto_delete_days)),
            language: (old.language != new.language)
                .then(|| (old.language.clone(), new.language.clone())),
            cm_to_kol_default: (old.cm_to_kol_default != new.cm_to_kol_default)
                .then_some((old.cm_to_kol_default, new.cm_to_kol_default)),
        }
    }

    fn is_empty(&self) -> bool {
        self.precision_enabled.is_none()
            && self.rounding_mode.is_none()
            && self.auto_delete_days.is_none()
            && self.language.is_none()
            && self.cm_to_kol_default.is_none()
    }

    fn to_log_string(&self) -> String {
        let mut parts = Vec::new();

        if let Some((old, new)) = &self.precision_enabled {
            parts.push(format!("precision_enabled: {} → {}", old, new));
        }
        if let Some((old, new)) = &self.rounding_mode {
            parts.push(format!("rounding_mode: {} → {}", old, new));
        }
        if let Some((old, new)) = &self.auto_delete_days {
            parts.push(format!("auto_delete_days: {} → {}", old, new));
        }
        if let Some((old, new)) = &self.language {
            parts.push(format!("language: {:?} → {:?}", old, new));
        }
        if let Some((old, new)) = &self.cm_to_kol_default {
            parts.push(format!("cm_to_kol_default: {} → {}", old, new));
        }

        if parts.is_empty() {
            "(no changes)".to_string()
        } else {
            parts.join(", ")
        }
    }
}
