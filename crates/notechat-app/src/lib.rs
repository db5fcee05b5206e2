//! notechat application layer.
//!
//! Owns the conversation lifecycle and everything the panel needs at
//! runtime:
//! - `controller` - the conversation controller (submit, suggested actions, sessions)
//! - `ports` - what the controller needs from the panel, the document host and the language picker
//! - `credentials` - the configured API key and the model client built from it
//! - `settings_store` - the persisted settings file
//! - `document` - file-backed active document
//! - `context` - the application context wiring it all together

pub mod context;
pub mod controller;
pub mod credentials;
pub mod document;
pub mod error;
pub mod ports;
pub mod settings_store;

pub use context::AppContext;
pub use controller::ConversationController;
pub use credentials::{ClientFactory, ClientProvider, CredentialStore, GeminiFactory};
pub use document::FileDocumentSource;
pub use error::SettingsError;
pub use ports::{DocumentSource, LanguagePicker, PanelSink, SuggestionsView};
pub use settings_store::SettingsStore;
