use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::convert::kol_to_cm;
use super::format::format_kol_viral_cm_input;
use super::units::{CM_PER_VIRAL, MAX_RAW_VIRAL};

/// Raw input field a validation error points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    Kol,
    Viral,
    Cm,
    Multiplier,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputField::Kol => "kol",
            InputField::Viral => "viral",
            InputField::Cm => "cm",
            InputField::Multiplier => "multiplier",
        };
        f.write_str(name)
    }
}

/// User-recoverable input errors. The engine is never invoked when one is raised.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("viral must be between 0 and 23, got {value}")]
    InvalidViral { value: u32 },

    #[error("cm must be less than 3, got {value}")]
    InvalidCm { value: f64 },

    #[error("invalid number in {field} field: {value:?}")]
    InvalidNumberFormat { field: InputField, value: String },

    #[error("length must not be negative")]
    NegativeInput { field: Option<InputField> },

    #[error("cannot subtract a larger measurement from a smaller one")]
    SubtractionOrder,
}

impl InputError {
    /// The field to return focus to, when it can be identified.
    pub fn field(&self) -> Option<InputField> {
        match self {
            InputError::InvalidViral { .. } => Some(InputField::Viral),
            InputError::InvalidCm { .. } => Some(InputField::Cm),
            InputError::InvalidNumberFormat { field, .. } => Some(*field),
            InputError::NegativeInput { field } => *field,
            InputError::SubtractionOrder => None,
        }
    }
}

/// Raw (kol, viral, cm) components as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurement {
    pub kol: u32,
    pub viral: u32,
    pub cm: f64,
}

impl Measurement {
    /// Builds a measurement without any checks. Engine functions tolerate
    /// denormalized components, raw-input validation does not.
    pub fn new(kol: u32, viral: u32, cm: f64) -> Self {
        Self { kol, viral, cm }
    }

    /// Builds a measurement, rejecting components a user may not enter directly.
    pub fn validated(kol: u32, viral: u32, cm: f64) -> Result<Self, InputError> {
        if !cm.is_finite() {
            return Err(InputError::InvalidNumberFormat {
                field: InputField::Cm,
                value: cm.to_string(),
            });
        }
        if cm < 0.0 {
            return Err(InputError::NegativeInput {
                field: Some(InputField::Cm),
            });
        }
        if viral > MAX_RAW_VIRAL {
            return Err(InputError::InvalidViral { value: viral });
        }
        if cm >= CM_PER_VIRAL {
            return Err(InputError::InvalidCm { value: cm });
        }
        Ok(Self { kol, viral, cm })
    }

    /// Parses three text fields. Empty fields count as zero.
    pub fn parse(kol: &str, viral: &str, cm: &str) -> Result<Self, InputError> {
        let kol = parse_count(kol, InputField::Kol)?;
        let viral = parse_count(viral, InputField::Viral)?;
        let cm = parse_cm_field(cm)?;
        Self::validated(kol, viral, cm)
    }

    /// Scalar length in centimeters after carry normalization.
    pub fn total_cm(&self) -> f64 {
        kol_to_cm(self.kol, self.viral, self.cm)
    }

    /// Human-readable echo of the raw components.
    pub fn echo(&self) -> String {
        format_kol_viral_cm_input(self.kol, self.viral, self.cm)
    }
}

/// Parses a centimeter field. Empty input counts as zero.
pub fn parse_cm_field(text: &str) -> Result<f64, InputError> {
    parse_non_negative_real(text, InputField::Cm)
}

/// Parses a multiplier field. Empty input counts as zero.
pub fn parse_multiplier_field(text: &str) -> Result<f64, InputError> {
    parse_non_negative_real(text, InputField::Multiplier)
}

fn parse_count(text: &str, field: InputField) -> Result<u32, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| InputError::InvalidNumberFormat {
            field,
            value: trimmed.to_string(),
        })?;
    if value < 0 {
        return Err(InputError::NegativeInput { field: Some(field) });
    }
    u32::try_from(value).map_err(|_| InputError::InvalidNumberFormat {
        field,
        value: trimmed.to_string(),
    })
}

fn parse_non_negative_real(text: &str, field: InputField) -> Result<f64, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = trimmed
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| InputError::InvalidNumberFormat {
            field,
            value: trimmed.to_string(),
        })?;
    if value < 0.0 {
        return Err(InputError::NegativeInput { field: Some(field) });
    }
    Ok(value)
}
