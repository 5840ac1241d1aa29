use std::sync::Arc;

use tracing::{debug, info_span};

use kk_core::ports::ClockPort;
use kk_core::Measurement;

use super::{ConversionError, ConversionOutcome};
use crate::usecases::history::HistoryWriter;

/// Converts a (kol, viral, cm) measurement to a centimeter total.
pub struct ConvertKolToCm {
    writer: HistoryWriter,
    clock: Arc<dyn ClockPort>,
}

impl ConvertKolToCm {
    pub fn new(writer: HistoryWriter, clock: Arc<dyn ClockPort>) -> Self {
        Self { writer, clock }
    }

    /// Parses the three raw text fields (empty means zero) and converts.
    pub fn execute_raw(
        &self,
        kol: &str,
        viral: &str,
        cm: &str,
    ) -> Result<ConversionOutcome, ConversionError> {
        let measurement = Measurement::parse(kol, viral, cm)?;
        self.execute(measurement)
    }

    /// Output is `"<total> cm"` with two decimals. Raw viral above 23 or cm of 3 or
    /// more is rejected even though the engine could normalize it.
    pub fn execute(&self, measurement: Measurement) -> Result<ConversionOutcome, ConversionError> {
        let _span = info_span!("usecase.convert_kol_to_cm.execute").entered();

        let measurement =
            Measurement::validated(measurement.kol, measurement.viral, measurement.cm)?;
        let total_cm = measurement.total_cm();
        let outcome = ConversionOutcome {
            input_text: measurement.echo(),
            output_text: format!("{total_cm:.2} cm"),
            total_cm,
        };
        debug!(input = %outcome.input_text, output = %outcome.output_text, "converted kol to cm");

        self.writer.insert(outcome.to_history(self.clock.now_ms()));
        Ok(outcome)
    }
}
