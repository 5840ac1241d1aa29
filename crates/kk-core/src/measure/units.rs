//! Fixed radix relationship between the traditional units.

/// Centimeters in one Viral.
pub const CM_PER_VIRAL: f64 = 3.0;

/// Virals in one Kol.
pub const VIRAL_PER_KOL: u64 = 24;

/// Centimeters in one Kol (24 × 3).
pub const CM_PER_KOL: f64 = CM_PER_VIRAL * VIRAL_PER_KOL as f64;

/// Largest viral value accepted in a raw input field.
pub const MAX_RAW_VIRAL: u32 = VIRAL_PER_KOL as u32 - 1;

/// Tolerance under which a centimeter remainder is treated as zero for display.
pub const CM_DISPLAY_EPSILON: f64 = 0.001;
