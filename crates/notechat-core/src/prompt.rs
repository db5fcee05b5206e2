//! Prompt templates and fixed transcript strings.

/// Shown when any chat round trip fails.
pub const CHAT_FAILURE: &str = "Sorry, I encountered an error. Please try again.";

/// Shown when a suggested action needs a document and none is open.
pub const NO_ACTIVE_FILE: &str = "No active file selected";

/// Shown when a translation round trip fails.
pub const TRANSLATION_FAILURE: &str = "Translation failed";

/// Shown when a submission arrives while another one is pending.
pub const REQUEST_IN_FLIGHT: &str = "Please wait for the current response to finish";

/// Shown when no API key has been configured.
pub const NO_API_KEY: &str = "No API key configured. Add one in settings.";

/// Shown when a context action is used before the document has been read.
pub const CONTEXT_LOADING: &str = "Page context is still loading";

/// Input placeholder while asking about the active page.
pub const ASK_ABOUT_PAGE_PLACEHOLDER: &str = "Ask a question about this page...";

/// Default input placeholder.
pub const DEFAULT_PLACEHOLDER: &str = "Ask me anything...";

/// Build the prompt sent to the model for a user question.
///
/// Without document context the question is sent as-is.
pub fn compose(context: Option<&str>, question: &str) -> String {
    match context {
        Some(document) => {
            format!("Context from current document:\n{document}\n\nUser question: {question}")
        }
        None => question.to_string(),
    }
}

/// Instruction asking for a summary of `document`.
pub fn summarize(document: &str) -> String {
    format!("Please summarize the following text:\n\n{document}")
}

/// Instruction asking for the action items in `document`.
pub fn action_items(document: &str) -> String {
    format!("Please identify and list all action items from the following text:\n\n{document}")
}

/// Instruction asking for a translation of `content` into `target_language`.
pub fn translate(content: &str, target_language: &str) -> String {
    format!("Translate the following text to {target_language}:\n\n{content}")
}
