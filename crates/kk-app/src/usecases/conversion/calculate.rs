use std::sync::Arc;

use tracing::{debug, info_span};

use kk_core::measure::units::{CM_PER_KOL, CM_PER_VIRAL};
use kk_core::measure::{
    arithmetic, cm_to_kol_formatted, format_kol_viral_cm_input, multiply_kol,
    multiply_kol_parts, parse_multiplier_field,
};
use kk_core::ports::ClockPort;
use kk_core::{DisplayPolicy, InputError, InputField, Measurement};

use super::{ConversionError, ConversionOutcome};
use crate::usecases::history::HistoryWriter;

/// Adds, subtracts and scales measurements.
///
/// Results are always rendered with fractional centimeters kept and are always
/// submitted to history.
pub struct Calculate {
    writer: HistoryWriter,
    clock: Arc<dyn ClockPort>,
}

impl Calculate {
    pub fn new(writer: HistoryWriter, clock: Arc<dyn ClockPort>) -> Self {
        Self { writer, clock }
    }

    pub fn add(&self, a: Measurement, b: Measurement) -> Result<ConversionOutcome, ConversionError> {
        let _span = info_span!("usecase.calculate.add").entered();
        let (a, b) = (validate(a)?, validate(b)?);

        let total_cm = arithmetic::add(a.total_cm(), b.total_cm());
        self.finish(format!("{} + {}", a.echo(), b.echo()), total_cm)
    }

    /// Rejects `a - b` when `b` is the longer length; nothing is recorded then.
    pub fn subtract(
        &self,
        a: Measurement,
        b: Measurement,
    ) -> Result<ConversionOutcome, ConversionError> {
        let _span = info_span!("usecase.calculate.subtract").entered();
        let (a, b) = (validate(a)?, validate(b)?);

        let (cm_a, cm_b) = (a.total_cm(), b.total_cm());
        if cm_b > cm_a {
            return Err(InputError::SubtractionOrder.into());
        }

        let total_cm = arithmetic::subtract(cm_a, cm_b);
        self.finish(format!("{} − {}", a.echo(), b.echo()), total_cm)
    }

    /// Scales a (kol, viral) pair. The product is rounded to a whole number of virals
    /// and rendered as `"<k> kol <v> viral"` with both parts always present.
    pub fn multiply(
        &self,
        kol: u32,
        viral: u32,
        multiplier: f64,
    ) -> Result<ConversionOutcome, ConversionError> {
        let _span = info_span!("usecase.calculate.multiply").entered();
        Measurement::validated(kol, viral, 0.0)?;
        if !multiplier.is_finite() {
            return Err(InputError::InvalidNumberFormat {
                field: InputField::Multiplier,
                value: multiplier.to_string(),
            }
            .into());
        }
        if multiplier < 0.0 {
            return Err(InputError::NegativeInput {
                field: Some(InputField::Multiplier),
            }
            .into());
        }

        let (kol_out, viral_out) = multiply_kol_parts(kol, viral, multiplier);
        let outcome = ConversionOutcome {
            input_text: format!(
                "{} × {}",
                format_kol_viral_cm_input(kol, viral, 0.0),
                multiplier
            ),
            output_text: multiply_kol(kol, viral, multiplier),
            total_cm: kol_out as f64 * CM_PER_KOL + viral_out as f64 * CM_PER_VIRAL,
        };
        self.record(outcome)
    }

    /// Parses a raw multiplier field before scaling.
    pub fn multiply_raw(
        &self,
        kol: u32,
        viral: u32,
        multiplier: &str,
    ) -> Result<ConversionOutcome, ConversionError> {
        let multiplier = parse_multiplier_field(multiplier)?;
        self.multiply(kol, viral, multiplier)
    }

    fn finish(&self, input_text: String, total_cm: f64) -> Result<ConversionOutcome, ConversionError> {
        if total_cm < 0.0 {
            return Err(InputError::NegativeInput { field: None }.into());
        }
        self.record(ConversionOutcome {
            input_text,
            output_text: cm_to_kol_formatted(total_cm, DisplayPolicy::precise()),
            total_cm,
        })
    }

    fn record(&self, outcome: ConversionOutcome) -> Result<ConversionOutcome, ConversionError> {
        debug!(input = %outcome.input_text, output = %outcome.output_text, "calculated");
        self.writer.insert(outcome.to_history(self.clock.now_ms()));
        Ok(outcome)
    }
}

fn validate(m: Measurement) -> Result<Measurement, InputError> {
    Measurement::validated(m.kol, m.viral, m.cm)
}
