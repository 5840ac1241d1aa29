//! Kol / Viral / cm measurement engine.
//! Kol / Viral / 厘米 度量引擎。
//!
//! Every length is reduced to a scalar centimeter value before any arithmetic
//! happens; the mixed-radix representation only exists at the edges (user input
//! and display strings).

pub mod arithmetic;
mod convert;
mod format;
mod input;
mod parse;
pub mod units;

pub use convert::{kol_to_cm, multiply_kol, multiply_kol_parts};
pub use format::{cm_to_kol_formatted, format_kol_viral_cm_input, DisplayPolicy, RoundingMode};
pub use input::{parse_cm_field, parse_multiplier_field, InputError, InputField, Measurement};
pub use parse::parse_measurement_text;
