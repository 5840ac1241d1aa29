use kk_core::measure::{
    cm_to_kol_formatted, kol_to_cm, multiply_kol_parts, parse_measurement_text, DisplayPolicy,
    RoundingMode,
};
use proptest::prelude::*;

fn close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

proptest! {
    #[test]
    fn viral_overflow_is_carry_invariant(kol in 0u32..10_000, viral in 0u32..24, cm in 0.0f64..3.0, n in 0u32..50) {
        prop_assert_eq!(
            kol_to_cm(kol, viral + 24 * n, cm),
            kol_to_cm(kol + n, viral, cm)
        );
    }

    #[test]
    fn cm_overflow_is_carry_invariant(kol in 0u32..10_000, viral in 0u32..24, cm in 0.0f64..3.0, m in 0u32..50) {
        let denormalized = kol_to_cm(kol, viral, cm + 3.0 * m as f64);
        let normalized = kol_to_cm(kol, viral + m, cm);
        prop_assert!(close(denormalized, normalized, 1e-6), "{} vs {}", denormalized, normalized);
    }

    #[test]
    fn precise_format_round_trips_within_display_resolution(kol in 0u32..5_000, viral in 0u32..24, cm in 0.0f64..3.0) {
        let total = kol_to_cm(kol, viral, cm);
        let rendered = cm_to_kol_formatted(total, DisplayPolicy::precise());
        let parsed = parse_measurement_text(&rendered).expect("formatted output always has a unit");
        prop_assert!(
            close(parsed.total_cm(), total, 0.05 + 1e-9),
            "{} rendered as {:?} parsed back to {}", total, rendered, parsed.total_cm()
        );
    }

    #[test]
    fn whole_cm_display_never_shows_a_full_viral(total in 0.0f64..100_000.0, truncate in any::<bool>()) {
        let rounding = if truncate { RoundingMode::Truncate } else { RoundingMode::Round };
        let rendered = cm_to_kol_formatted(total, DisplayPolicy::new(false, rounding));
        let parsed = parse_measurement_text(&rendered).expect("formatted output always has a unit");
        prop_assert!(parsed.viral < 24, "{:?}", rendered);
        prop_assert!(parsed.cm < 3.0, "{:?}", rendered);
        prop_assert_eq!(parsed.cm.fract(), 0.0);
    }

    #[test]
    fn multiply_by_one_is_identity(kol in 0u32..10_000, viral in 0u32..24) {
        prop_assert_eq!(multiply_kol_parts(kol, viral, 1.0), (kol as u64, viral));
    }
}
