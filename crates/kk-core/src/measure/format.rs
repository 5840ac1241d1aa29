use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::units::{CM_DISPLAY_EPSILON, CM_PER_KOL, CM_PER_VIRAL, VIRAL_PER_KOL};

/// How a fractional centimeter remainder is reduced when precision mode is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingMode {
    /// Round half up (2.5 cm -> 3 cm).
    #[default]
    Round,
    /// Drop the fraction (2.9 cm -> 2 cm).
    Truncate,
}

impl RoundingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundingMode::Round => "ROUND",
            RoundingMode::Truncate => "TRUNCATE",
        }
    }

    fn apply(self, cm: f64) -> f64 {
        match self {
            RoundingMode::Round => cm.round(),
            RoundingMode::Truncate => cm.trunc(),
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ROUND" => Ok(RoundingMode::Round),
            "TRUNCATE" => Ok(RoundingMode::Truncate),
            other => Err(format!("unknown rounding mode: {other}")),
        }
    }
}

/// Display policy applied when rendering a scalar length in Kol units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayPolicy {
    /// Keep fractional centimeters (one decimal) instead of forcing a whole number.
    pub precision: bool,
    /// Only consulted when `precision` is off.
    pub rounding: RoundingMode,
}

impl DisplayPolicy {
    pub fn new(precision: bool, rounding: RoundingMode) -> Self {
        Self {
            precision,
            rounding,
        }
    }

    /// Policy used for calculator results: fractional centimeters are kept.
    pub fn precise() -> Self {
        Self::new(true, RoundingMode::Truncate)
    }
}

/// Formats a scalar centimeter value as `"<k> kol <v> viral <c> cm"`.
///
/// Zero components are omitted, but the result is never empty: a pure remainder
/// renders as `"0 cm"` or `"1.5 cm"`. When precision is off the remainder is reduced
/// to a whole number, which may carry into viral and then into kol.
pub fn cm_to_kol_formatted(total_cm: f64, policy: DisplayPolicy) -> String {
    if !total_cm.is_finite() || total_cm < 0.0 {
        return "0 cm".to_string();
    }

    let mut kols = (total_cm / CM_PER_KOL).floor() as u64;
    let remainder = total_cm % CM_PER_KOL;
    let mut virals = (remainder / CM_PER_VIRAL).floor() as u64;
    let mut cm = remainder % CM_PER_VIRAL;

    if !policy.precision {
        cm = policy.rounding.apply(cm);
        if cm >= CM_PER_VIRAL {
            virals += 1;
            cm = 0.0;
        }
        if virals >= VIRAL_PER_KOL {
            kols += 1;
            virals = 0;
        }
    }

    join_components(kols, virals, cm, policy.precision)
}

/// Echoes a raw (possibly denormalized) input triple, e.g. `"1 kol 10 viral 2.5 cm"`.
pub fn format_kol_viral_cm_input(kol: u32, viral: u32, cm: f64) -> String {
    join_components(kol as u64, viral as u64, cm, true)
}

fn join_components(kols: u64, virals: u64, cm: f64, precision: bool) -> String {
    let mut parts = Vec::with_capacity(3);
    if kols > 0 {
        parts.push(format!("{kols} kol"));
    }
    if virals > 0 {
        parts.push(format!("{virals} viral"));
    }
    if cm > CM_DISPLAY_EPSILON || parts.is_empty() {
        parts.push(format_cm(cm, precision));
    }
    parts.join(" ")
}

fn format_cm(cm: f64, precision: bool) -> String {
    if precision && cm.fract() != 0.0 {
        format!("{cm:.1} cm")
    } else {
        format!("{cm:.0} cm")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whole(rounding: RoundingMode) -> DisplayPolicy {
        DisplayPolicy::new(false, rounding)
    }

    #[test]
    fn zero_renders_as_zero_cm() {
        assert_eq!(cm_to_kol_formatted(0.0, whole(RoundingMode::Round)), "0 cm");
        assert_eq!(cm_to_kol_formatted(0.0, DisplayPolicy::precise()), "0 cm");
    }

    #[test]
    fn zero_components_are_omitted() {
        assert_eq!(cm_to_kol_formatted(72.0, whole(RoundingMode::Round)), "1 kol");
        assert_eq!(cm_to_kol_formatted(150.0, DisplayPolicy::precise()), "2 kol 2 viral");
        assert_eq!(cm_to_kol_formatted(1.5, DisplayPolicy::precise()), "1.5 cm");
    }

    #[test]
    fn rounding_carries_into_viral() {
        assert_eq!(cm_to_kol_formatted(2.96, whole(RoundingMode::Round)), "1 viral");
        assert_eq!(cm_to_kol_formatted(2.96, whole(RoundingMode::Truncate)), "2 cm");
    }

    #[test]
    fn rounding_cascades_into_kol() {
        // 23 viral 2.9 cm -> 24 viral -> 1 kol
        assert_eq!(cm_to_kol_formatted(71.9, whole(RoundingMode::Round)), "1 kol");
        assert_eq!(
            cm_to_kol_formatted(71.9, whole(RoundingMode::Truncate)),
            "23 viral 2 cm"
        );
    }

    #[test]
    fn precision_mode_keeps_one_decimal() {
        assert_eq!(
            cm_to_kol_formatted(151.5, DisplayPolicy::precise()),
            "2 kol 2 viral 1.5 cm"
        );
        assert_eq!(cm_to_kol_formatted(10.4, whole(RoundingMode::Round)), "3 viral 1 cm");
    }

    #[test]
    fn negative_input_is_clamped_for_display() {
        assert_eq!(cm_to_kol_formatted(-4.0, DisplayPolicy::precise()), "0 cm");
    }

    #[test]
    fn input_echo_is_not_normalized() {
        assert_eq!(format_kol_viral_cm_input(1, 10, 2.5), "1 kol 10 viral 2.5 cm");
        assert_eq!(format_kol_viral_cm_input(0, 30, 0.0), "30 viral");
        assert_eq!(format_kol_viral_cm_input(0, 0, 0.0), "0 cm");
        assert_eq!(format_kol_viral_cm_input(2, 0, 2.0), "2 kol 2 cm");
    }

    #[test]
    fn rounding_mode_parses_case_insensitively() {
        assert_eq!("round".parse::<RoundingMode>(), Ok(RoundingMode::Round));
        assert_eq!("TRUNCATE".parse::<RoundingMode>(), Ok(RoundingMode::Truncate));
        assert!("ceil".parse::<RoundingMode>().is_err());
    }
}
