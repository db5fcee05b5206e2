//! Terminal widgets for the notechat panel.
//!
//! The crate is organized into:
//! - `widgets` - ratatui widgets (transcript, suggestions, input, dialogs, footer)
//! - `theme` - Colors and styles
//! - `utils` - Text wrapping and truncation

pub mod theme;
pub mod utils;
pub mod widgets;

pub use theme::Theme;
pub use utils::{truncate, wrap_text_indented};
pub use widgets::chat::ChatWidget;
pub use widgets::dialogs::{centered_rect, InputDialog};
pub use widgets::footer::Footer;
pub use widgets::input::InputBox;
pub use widgets::suggestions::SuggestionsWidget;
