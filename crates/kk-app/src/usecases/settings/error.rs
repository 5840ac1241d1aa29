use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid schema version: expected {expected}, got {actual}")]
    InvalidSchemaVersion { expected: u32, actual: u32 },

    #[error("unsupported language: {0:?}")]
    UnsupportedLanguage(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
