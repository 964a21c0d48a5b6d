use std::path::PathBuf;
use thiserror::Error;

pub type HydroResult<T> = Result<T, HydroError>;

/// Errors raised while constructing hydrodynamic loads.
///
/// Out-of-range lookups during a step are not errors; they are logged and
/// evaluate to zero.
#[derive(Error, Debug)]
pub enum HydroError {
    /// Coefficient or configuration file could not be opened, read or parsed
    #[error("unable to read {path}: {message}")]
    File { path: PathBuf, message: String },

    /// Dataset missing or inconsistent with the expected shape
    #[error("invalid coefficient data: {0}")]
    Format(String),

    /// Load configuration is invalid
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HydroError {
    pub fn file(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        HydroError::File {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        HydroError::Format(message.into())
    }
}
