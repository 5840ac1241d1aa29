use super::model::*;
use crate::measure::RoundingMode;

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            precision_enabled: false,
            rounding_mode: RoundingMode::Round,
            auto_delete_days: 0,
            language: "en".to_string(),
            cm_to_kol_default: true,
        }
    }
}
