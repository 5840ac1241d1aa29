//! Converter and calculator use cases.
//!
//! Each use case validates raw input, runs the pure engine, returns the display
//! strings and submits the result to history without waiting for the write.

mod calculate;
mod convert_cm_to_kol;
mod convert_kol_to_cm;
mod error;
mod outcome;

pub use calculate::Calculate;
pub use convert_cm_to_kol::ConvertCmToKol;
pub use convert_kol_to_cm::ConvertKolToCm;
pub use error::ConversionError;
pub use outcome::ConversionOutcome;
