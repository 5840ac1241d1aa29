use kk_core::{InputError, InputField};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error(transparent)]
    Input(#[from] InputError),
}

impl ConversionError {
    /// The input field the user should correct, if known.
    pub fn field(&self) -> Option<InputField> {
        match self {
            ConversionError::Input(e) => e.field(),
        }
    }
}
