use std::sync::OnceLock;

use regex::Regex;

use super::input::Measurement;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+)\s*kol|(\d+)\s*viral|(\d*\.?\d+)\s*cm").expect("static regex is valid")
    })
}

/// Reads `"<n> kol"`, `"<n> viral"` and `"<x> cm"` tokens back out of a rendered string.
///
/// The last occurrence of each unit wins and missing units are zero. Returns `None`
/// when the text contains no unit token at all.
pub fn parse_measurement_text(text: &str) -> Option<Measurement> {
    let mut measurement = Measurement::default();
    let mut matched = false;

    for caps in token_pattern().captures_iter(text) {
        if let Some(kol) = caps.get(1).and_then(|m| m.as_str().parse().ok()) {
            measurement.kol = kol;
            matched = true;
        } else if let Some(viral) = caps.get(2).and_then(|m| m.as_str().parse().ok()) {
            measurement.viral = viral;
            matched = true;
        } else if let Some(cm) = caps.get(3).and_then(|m| m.as_str().parse().ok()) {
            measurement.cm = cm;
            matched = true;
        }
    }

    matched.then_some(measurement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_triple() {
        assert_eq!(
            parse_measurement_text("6 kol 22 viral 2.5 cm"),
            Some(Measurement::new(6, 22, 2.5))
        );
    }

    #[test]
    fn missing_units_default_to_zero() {
        assert_eq!(parse_measurement_text("1 kol"), Some(Measurement::new(1, 0, 0.0)));
        assert_eq!(parse_measurement_text(".5 cm"), Some(Measurement::new(0, 0, 0.5)));
    }

    #[test]
    fn last_occurrence_wins() {
        assert_eq!(
            parse_measurement_text("1 kol + 2 kol 3 viral"),
            Some(Measurement::new(2, 3, 0.0))
        );
    }

    #[test]
    fn text_without_units_is_rejected() {
        assert_eq!(parse_measurement_text("hello"), None);
        assert_eq!(parse_measurement_text(""), None);
    }
}
