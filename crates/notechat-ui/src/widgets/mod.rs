//! Panel widgets.

pub mod chat;
pub mod dialogs;
pub mod footer;
pub mod input;
pub mod suggestions;
