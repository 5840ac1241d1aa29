use std::sync::Arc;

use tracing::{debug, info_span};

use kk_core::measure::{cm_to_kol_formatted, parse_cm_field};
use kk_core::ports::ClockPort;
use kk_core::{InputError, InputField};

use super::{ConversionError, ConversionOutcome};
use crate::usecases::history::HistoryWriter;
use crate::usecases::settings::SettingsStore;

/// Converts a centimeter length to `"<k> kol <v> viral <c> cm"` using the current
/// precision and rounding settings.
pub struct ConvertCmToKol {
    writer: HistoryWriter,
    settings: SettingsStore,
    clock: Arc<dyn ClockPort>,
}

impl ConvertCmToKol {
    pub fn new(writer: HistoryWriter, settings: SettingsStore, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            writer,
            settings,
            clock,
        }
    }

    pub fn execute_raw(&self, cm: &str) -> Result<ConversionOutcome, ConversionError> {
        let cm = parse_cm_field(cm)?;
        self.execute(cm)
    }

    pub fn execute(&self, cm: f64) -> Result<ConversionOutcome, ConversionError> {
        let _span = info_span!("usecase.convert_cm_to_kol.execute").entered();

        if !cm.is_finite() {
            return Err(InputError::InvalidNumberFormat {
                field: InputField::Cm,
                value: cm.to_string(),
            }
            .into());
        }
        if cm < 0.0 {
            return Err(InputError::NegativeInput {
                field: Some(InputField::Cm),
            }
            .into());
        }

        let policy = self.settings.current().display_policy();
        let outcome = ConversionOutcome {
            input_text: format!("{cm:.2} cm"),
            output_text: cm_to_kol_formatted(cm, policy),
            total_cm: cm,
        };
        debug!(
            input = %outcome.input_text,
            output = %outcome.output_text,
            precision = policy.precision,
            rounding = %policy.rounding,
            "converted cm to kol"
        );

        self.writer.insert(outcome.to_history(self.clock.now_ms()));
        Ok(outcome)
    }
}
