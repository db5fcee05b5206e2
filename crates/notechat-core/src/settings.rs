//! Persisted settings record.

use serde::{Deserialize, Serialize};

/// Default model used for new installs.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Top-left corner of the floating panel, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatingPosition {
    pub x: u16,
    pub y: u16,
}

impl Default for FloatingPosition {
    fn default() -> Self {
        Self { x: 20, y: 20 }
    }
}

/// Settings persisted between runs.
///
/// Missing fields take their defaults, so the defaults are merged over
/// whatever a stored file provides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// API key in obfuscated form (see [`crate::credential`]).
    pub api_key: String,
    /// Where the floating panel is drawn.
    pub floating_position: FloatingPosition,
    /// Whether the panel is docked to the side instead of floating.
    pub is_docked: bool,
    /// Remote model name.
    pub model: String,
    /// Transport timeout for a single remote call.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            floating_position: FloatingPosition::default(),
            is_docked: false,
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Returns true if an API key has been stored.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
