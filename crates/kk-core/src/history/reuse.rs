use serde::Serialize;
use tracing::debug;

use super::record::HistoryRecord;
use crate::measure::units::CM_PER_VIRAL;
use crate::measure::{parse_measurement_text, Measurement};

/// Largest one-decimal cm value the input echo can show for a valid entry.
const MAX_ECHOED_CM: f64 = 2.9;

/// Where a history record is sent back to when the user reuses it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "direction", rename_all = "snake_case")]
pub enum ReuseTarget {
    /// Prefill the cm → kol converter with the record's scalar length.
    CmToKol { total_cm: f64 },
    /// Prefill the kol → cm converter with the components parsed from the input text.
    KolToCm(Measurement),
}

impl HistoryRecord {
    pub fn reuse(&self) -> ReuseTarget {
        let input = &self.input_text;
        if input.contains("cm") && !input.contains("kol") {
            return ReuseTarget::CmToKol {
                total_cm: self.total_cm,
            };
        }

        let mut measurement = parse_measurement_text(input).unwrap_or_else(|| {
            debug!(id = %self.id, input = %input, "no unit tokens in history input, reusing zeros");
            Measurement::default()
        });
        // The echo rounds cm to one decimal, so 2.96 is stored as "3.0 cm".
        if measurement.cm >= CM_PER_VIRAL {
            debug!(id = %self.id, cm = measurement.cm, "echoed cm rounded up to a full viral, clamping");
            measurement.cm = MAX_ECHOED_CM;
        }
        ReuseTarget::KolToCm(measurement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::NewHistoryRecord;
    use crate::ids::HistoryId;

    fn record(input: &str, total_cm: f64) -> HistoryRecord {
        NewHistoryRecord::new(input, "out", total_cm, 0).into_record(HistoryId::new())
    }

    #[test]
    fn cm_only_input_goes_to_cm_converter() {
        assert_eq!(
            record("150.00 cm", 150.0).reuse(),
            ReuseTarget::CmToKol { total_cm: 150.0 }
        );
    }

    #[test]
    fn kol_input_is_parsed_back_into_components() {
        assert_eq!(
            record("2 kol 1 viral 1.5 cm", 148.5).reuse(),
            ReuseTarget::KolToCm(Measurement::new(2, 1, 1.5))
        );
    }

    #[test]
    fn cm_rounded_up_in_echo_is_clamped_below_a_viral() {
        assert_eq!(
            record("1 kol 3.0 cm", 74.96).reuse(),
            ReuseTarget::KolToCm(Measurement::new(1, 0, 2.9))
        );
    }

    #[test]
    fn unparsable_input_reuses_zeros() {
        assert_eq!(
            record("nothing here", 0.0).reuse(),
            ReuseTarget::KolToCm(Measurement::default())
        );
    }
}
