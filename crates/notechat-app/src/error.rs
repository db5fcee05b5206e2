//! Application layer errors.

use thiserror::Error;

/// Errors raised while loading or saving the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the file failed.
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid settings record.
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No settings location could be determined.
    #[error("could not determine a configuration directory")]
    NoConfigDir,
}
