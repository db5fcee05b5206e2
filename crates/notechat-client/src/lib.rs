//! Model client for notechat.
//!
//! This crate hides the remote provider's request/response schema behind
//! the [`ModelClient`] trait. Every call is a single request with a single
//! response: no streaming, no retries.
//!
//! # Example
//!
//! ```rust,no_run
//! use notechat_client::{GeminiClient, ModelClient};
//!
//! async fn ask() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::new("my-key", "gemini-1.5-flash", None)?;
//!     let answer = client.converse("What is 2 + 2?").await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod gemini;

pub use client::ModelClient;
pub use error::ClientError;
pub use gemini::{GeminiClient, DEFAULT_BASE_URL};
