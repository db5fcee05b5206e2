//! notechat Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Filesystem
//! - Runtime specifics
//!
//! All types here describe the chat panel's conversation, its suggested
//! actions, the persisted settings record and the API key transform.

pub mod action;
pub mod chat;
pub mod credential;
pub mod error;
pub mod prompt;
pub mod settings;

// Re-export commonly used types
pub use action::SuggestedAction;
pub use chat::{ChatRole, Message};
pub use credential::{obfuscate, reveal, CredentialError};
pub use error::ChatError;
pub use settings::{FloatingPosition, Settings};
