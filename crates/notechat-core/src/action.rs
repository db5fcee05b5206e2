//! Suggested-action shortcuts shown above the input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// A predefined shortcut that prefills or triggers a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestedAction {
    /// Summarize the active document.
    Summarize,
    /// Focus the input to ask about the active document.
    AskAboutPage,
    /// List the action items found in the active document.
    FindActionItems,
    /// Translate the active document into a language picked by the user.
    Translate,
}

impl SuggestedAction {
    /// All actions, in display order.
    pub fn all() -> &'static [SuggestedAction] {
        &[
            SuggestedAction::Summarize,
            SuggestedAction::AskAboutPage,
            SuggestedAction::FindActionItems,
            SuggestedAction::Translate,
        ]
    }

    /// Label shown in the suggestions list.
    pub fn label(&self) -> &'static str {
        match self {
            SuggestedAction::Summarize => "Summarize this page",
            SuggestedAction::AskAboutPage => "Ask about this page",
            SuggestedAction::FindActionItems => "Find action items",
            SuggestedAction::Translate => "Translate",
        }
    }

    /// Stable identifier used on the command line and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestedAction::Summarize => "summarize",
            SuggestedAction::AskAboutPage => "ask-about-page",
            SuggestedAction::FindActionItems => "find-action-items",
            SuggestedAction::Translate => "translate",
        }
    }
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuggestedAction {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SuggestedAction::all()
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ChatError::Precondition(format!("Unknown suggested action: {s}")))
    }
}
