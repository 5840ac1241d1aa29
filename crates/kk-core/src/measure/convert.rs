use super::units::{CM_PER_KOL, CM_PER_VIRAL, VIRAL_PER_KOL};

/// Converts a (kol, viral, cm) triple into a scalar centimeter value.
///
/// The triple may be denormalized (`cm >= 3` or `viral >= 24`); overflow is carried
/// upward before the total is computed. The cm → viral carry runs first because a
/// cm overflow can itself push viral past 24.
///
/// Carries are counted in `f64` so an arbitrarily large `cm` cannot overflow the
/// integer components.
pub fn kol_to_cm(kol: u32, viral: u32, cm: f64) -> f64 {
    let viral_per_kol = VIRAL_PER_KOL as f64;

    let viral_from_cm = (cm / CM_PER_VIRAL).floor();
    let remaining_cm = cm % CM_PER_VIRAL;
    let viral = f64::from(viral) + viral_from_cm;

    let kol_from_viral = (viral / viral_per_kol).floor();
    let remaining_viral = viral % viral_per_kol;
    let kol = f64::from(kol) + kol_from_viral;

    kol * CM_PER_KOL + remaining_viral * CM_PER_VIRAL + remaining_cm
}

/// Scales a (kol, viral) measurement and returns the normalized `(kol, viral)` pair.
///
/// The product is taken on the total viral count and rounded half away from zero.
pub fn multiply_kol_parts(kol: u32, viral: u32, multiplier: f64) -> (u64, u32) {
    let total_viral = kol as u64 * VIRAL_PER_KOL + viral as u64;
    let scaled = (total_viral as f64 * multiplier).round();
    if !scaled.is_finite() || scaled <= 0.0 {
        return (0, 0);
    }

    let scaled = scaled as u64;
    (scaled / VIRAL_PER_KOL, (scaled % VIRAL_PER_KOL) as u32)
}

/// Renders `multiply_kol_parts` as `"<kol> kol <viral> viral"`.
///
/// Unlike [`cm_to_kol_formatted`](super::cm_to_kol_formatted) both components are always
/// present, even when zero.
pub fn multiply_kol(kol: u32, viral: u32, multiplier: f64) -> String {
    let (kol, viral) = multiply_kol_parts(kol, viral, multiplier);
    format!("{kol} kol {viral} viral")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_triple_sums_components() {
        assert_eq!(kol_to_cm(1, 2, 1.5), 72.0 + 6.0 + 1.5);
        assert_eq!(kol_to_cm(0, 0, 0.0), 0.0);
    }

    #[test]
    fn viral_overflow_carries_into_kol() {
        assert_eq!(kol_to_cm(0, 25, 0.0), kol_to_cm(1, 1, 0.0));
        assert_eq!(kol_to_cm(0, 25, 0.0), 75.0);
    }

    #[test]
    fn cm_overflow_carries_through_viral_into_kol() {
        // 23 viral + 3 cm -> 24 viral -> 1 kol
        assert_eq!(kol_to_cm(0, 23, 3.0), 72.0);
        assert_eq!(kol_to_cm(2, 0, 7.5), kol_to_cm(2, 2, 1.5));
    }

    #[test]
    fn huge_cm_is_carried_without_overflow() {
        let total = kol_to_cm(0, 1, 1e20);
        assert!(total.is_finite());
        assert!(((total - 1e20) / 1e20).abs() < 1e-12);

        let max = f64::from(u32::MAX);
        assert_eq!(
            kol_to_cm(u32::MAX, u32::MAX, 2.0),
            max * CM_PER_KOL + max * CM_PER_VIRAL + 2.0
        );
    }

    #[test]
    fn multiply_rounds_on_viral_count() {
        assert_eq!(multiply_kol(1, 12, 2.0), "3 kol 0 viral");
        assert_eq!(multiply_kol(0, 5, 0.5), "0 kol 3 viral");
        assert_eq!(multiply_kol_parts(2, 0, 1.5), (3, 0));
    }

    #[test]
    fn multiply_by_zero_keeps_both_components() {
        assert_eq!(multiply_kol(4, 7, 0.0), "0 kol 0 viral");
    }
}
