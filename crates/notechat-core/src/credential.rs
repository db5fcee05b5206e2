//! Reversible transform for storing the API key.
//!
//! The key is stored reversed and base64 encoded so the settings file does
//! not hold it as plain text. This provides no confidentiality: anyone who
//! can read the settings file can recover the key with [`reveal`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

/// Errors returned when a stored key cannot be decoded.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Stored value is not valid base64.
    #[error("stored key is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// Decoded bytes are not valid UTF-8.
    #[error("stored key is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Turn a plain key into its stored form.
pub fn obfuscate(plain: &str) -> String {
    let reversed: String = plain.chars().rev().collect();
    STANDARD.encode(reversed.as_bytes())
}

/// Recover the plain key from its stored form.
pub fn reveal(stored: &str) -> Result<String, CredentialError> {
    let bytes = STANDARD.decode(stored.trim())?;
    let reversed = String::from_utf8(bytes)?;
    Ok(reversed.chars().rev().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_scenario_key() {
        let stored = obfuscate("abc123");
        assert_ne!(stored, "abc123");
        assert_eq!(reveal(&stored).unwrap(), "abc123");
    }

    #[test]
    fn test_stored_form_round_trips() {
        let stored = obfuscate("AIzaSy-example_key");
        assert_eq!(obfuscate(&reveal(&stored).unwrap()), stored);
    }

    #[test]
    fn test_printable_ascii_round_trips() {
        let printable: String = (0x20u8..0x7f).map(char::from).collect();
        for len in 0..printable.len() {
            let s = &printable[..len];
            assert_eq!(reveal(&obfuscate(s)).unwrap(), s);
        }
    }

    #[test]
    fn test_non_ascii_round_trips() {
        let s = "clé-日本語-🔑";
        assert_eq!(reveal(&obfuscate(s)).unwrap(), s);
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(obfuscate(""), "");
        assert_eq!(reveal("").unwrap(), "");
    }

    #[test]
    fn test_reveal_rejects_garbage() {
        assert!(matches!(reveal("not base64!"), Err(CredentialError::Encoding(_))));
    }
}
