//! Conversation controller.
//!
//! Turns user intents from the panel into at most one outstanding round
//! trip to the model and renders the result back into the transcript.
//! Every failure ends up as an inline `error` message; nothing is returned
//! to the caller.
//!
//! Each open session has an epoch. A round trip remembers the epoch it
//! started in and its result is dropped if the panel was reopened in the
//! meantime, so an old answer never lands in a fresh conversation.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use notechat_client::ModelClient;
use notechat_core::{prompt, ChatError, Message, SuggestedAction};

use crate::credentials::ClientProvider;
use crate::ports::{DocumentSource, LanguagePicker, PanelSink, SuggestionsView};

/// Page context captured when the session opened.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ActiveContext {
    /// The document read has not resolved yet.
    Loading,
    /// Read finished; `None` when no document was open.
    Ready(Option<String>),
}

#[derive(Debug)]
struct Session {
    epoch: u64,
    visible: bool,
    conversation: Vec<Message>,
    context: ActiveContext,
    suggestions: bool,
    pending: bool,
}

/// A claimed pending slot.
struct Ticket {
    epoch: u64,
    client: Arc<dyn ModelClient>,
    context: Option<String>,
}

/// Owns the transcript, the page context and the in-flight request.
pub struct ConversationController {
    session: Mutex<Session>,
    clients: Arc<dyn ClientProvider>,
    sink: Arc<dyn PanelSink>,
    documents: Arc<dyn DocumentSource>,
    picker: Arc<dyn LanguagePicker>,
}

impl ConversationController {
    /// Create a controller with a hidden panel and an empty conversation.
    pub fn new(
        clients: Arc<dyn ClientProvider>,
        sink: Arc<dyn PanelSink>,
        documents: Arc<dyn DocumentSource>,
        picker: Arc<dyn LanguagePicker>,
    ) -> Self {
        Self {
            session: Mutex::new(Session {
                epoch: 0,
                visible: false,
                conversation: Vec::new(),
                context: ActiveContext::Ready(None),
                suggestions: false,
                pending: false,
            }),
            clients,
            sink,
            documents,
            picker,
        }
    }

    /// Show the panel with an empty conversation and capture the page context.
    ///
    /// The panel is visible (and the conversation empty) before the
    /// document read starts. Suggested actions stay in the loading state
    /// until the read resolves.
    pub async fn open_session(&self) {
        let epoch = {
            let mut session = self.session.lock().await;
            session.epoch += 1;
            session.visible = true;
            session.conversation.clear();
            session.context = ActiveContext::Loading;
            session.suggestions = true;
            session.pending = false;
            session.epoch
        };
        info!(epoch, "Session opened");

        self.sink.clear_transcript().await;
        self.sink.set_pending(false).await;
        self.sink.set_suggestions(SuggestionsView::Loading).await;
        self.sink.focus_input(prompt::DEFAULT_PLACEHOLDER).await;
        self.sink.set_panel_visible(true).await;

        let text = self.documents.active_document_text().await;
        let has_document = text.is_some();

        let show_ready = {
            let mut session = self.session.lock().await;
            if session.epoch != epoch {
                debug!(epoch, "Session superseded before page context resolved");
                return;
            }
            session.context = ActiveContext::Ready(text);
            session.visible && session.suggestions
        };
        debug!(epoch, has_document, "Page context captured");

        if show_ready {
            self.sink.set_suggestions(SuggestionsView::Ready).await;
        }
    }

    /// Hide the panel.
    ///
    /// The conversation and page context stay in memory until the next
    /// [`open_session`](Self::open_session). An outstanding request is not
    /// cancelled.
    pub async fn close_session(&self) {
        {
            let mut session = self.session.lock().await;
            if !session.visible {
                return;
            }
            session.visible = false;
        }
        info!("Session closed");
        self.sink.set_panel_visible(false).await;
    }

    /// Open the panel if hidden, close it otherwise.
    pub async fn toggle_session(&self) {
        if self.is_visible().await {
            self.close_session().await;
        } else {
            self.open_session().await;
        }
    }

    /// Send `raw_text` to the model, with the page context if one was captured.
    ///
    /// Empty or whitespace-only input is ignored.
    pub async fn submit(&self, raw_text: &str) {
        if raw_text.trim().is_empty() {
            debug!("Ignoring empty submission");
            return;
        }

        let ticket = match self.claim().await {
            Ok(ticket) => ticket,
            Err(e) => {
                self.report(e).await;
                return;
            }
        };

        let composed = prompt::compose(ticket.context.as_deref(), raw_text);
        self.push(ticket.epoch, Message::user(raw_text)).await;
        self.hide_suggestions(ticket.epoch).await;
        self.show_pending(ticket.epoch).await;

        debug!(
            epoch = ticket.epoch,
            prompt_chars = composed.chars().count(),
            with_context = ticket.context.is_some(),
            "Sending chat request"
        );
        let reply = match ticket.client.converse(&composed).await {
            Ok(text) => Message::bot(text),
            Err(e) => {
                error!(error = %e, "Chat request failed");
                Message::error(prompt::CHAT_FAILURE)
            }
        };

        self.complete(ticket.epoch, reply).await;
    }

    /// Run a suggested-action shortcut against the captured page context.
    pub async fn run_suggested_action(&self, action: SuggestedAction) {
        info!(action = %action, "Running suggested action");

        let document = match self.document_for_action().await {
            Ok(document) => document,
            Err(e) => {
                self.report(e).await;
                return;
            }
        };

        match action {
            SuggestedAction::Summarize => self.submit(&prompt::summarize(&document)).await,
            SuggestedAction::FindActionItems => {
                self.submit(&prompt::action_items(&document)).await
            }
            SuggestedAction::AskAboutPage => {
                self.sink
                    .focus_input(prompt::ASK_ABOUT_PAGE_PLACEHOLDER)
                    .await
            }
            SuggestedAction::Translate => self.translate_document(document).await,
        }
    }

    /// Snapshot of the conversation.
    pub async fn conversation(&self) -> Vec<Message> {
        self.session.lock().await.conversation.clone()
    }

    /// Page context, once captured.
    pub async fn active_context(&self) -> Option<String> {
        match &self.session.lock().await.context {
            ActiveContext::Ready(text) => text.clone(),
            ActiveContext::Loading => None,
        }
    }

    /// Returns true once the page context read has resolved.
    pub async fn context_loaded(&self) -> bool {
        matches!(self.session.lock().await.context, ActiveContext::Ready(_))
    }

    /// Returns true while a round trip is outstanding.
    pub async fn is_pending(&self) -> bool {
        self.session.lock().await.pending
    }

    /// Returns true while the panel is shown.
    pub async fn is_visible(&self) -> bool {
        self.session.lock().await.visible
    }

    /// Translation bypasses `submit`: no user message is recorded.
    async fn translate_document(&self, document: String) {
        if self.clients.client().await.is_none() {
            self.report(ChatError::Configuration(prompt::NO_API_KEY.into()))
                .await;
            return;
        }

        let (epoch, pending) = {
            let session = self.session.lock().await;
            (session.epoch, session.pending)
        };
        if pending {
            self.report(ChatError::Precondition(prompt::REQUEST_IN_FLIGHT.into()))
                .await;
            return;
        }

        let language = self
            .picker
            .pick_language()
            .await
            .map(|language| language.trim().to_string())
            .filter(|language| !language.is_empty());
        let Some(language) = language else {
            debug!("Language picker dismissed");
            return;
        };

        if self.session.lock().await.epoch != epoch {
            debug!(epoch, "Session changed while picking a language");
            return;
        }

        let ticket = match self.claim().await {
            Ok(ticket) => ticket,
            Err(e) => {
                self.report(e).await;
                return;
            }
        };
        self.show_pending(ticket.epoch).await;

        debug!(epoch = ticket.epoch, language = %language, "Sending translation request");
        let reply = match ticket.client.translate(&document, &language).await {
            Ok(text) => Message::bot(text),
            Err(e) => {
                error!(error = %e, language = %language, "Translation request failed");
                Message::error(prompt::TRANSLATION_FAILURE)
            }
        };

        self.complete(ticket.epoch, reply).await;
    }

    /// Take the single pending slot for the current session.
    async fn claim(&self) -> Result<Ticket, ChatError> {
        let client = self
            .clients
            .client()
            .await
            .ok_or_else(|| ChatError::Configuration(prompt::NO_API_KEY.into()))?;

        let mut session = self.session.lock().await;
        if session.pending {
            return Err(ChatError::Precondition(prompt::REQUEST_IN_FLIGHT.into()));
        }
        session.pending = true;

        let context = match &session.context {
            ActiveContext::Ready(text) => text.clone(),
            ActiveContext::Loading => None,
        };

        Ok(Ticket {
            epoch: session.epoch,
            client,
            context,
        })
    }

    async fn document_for_action(&self) -> Result<String, ChatError> {
        match &self.session.lock().await.context {
            ActiveContext::Loading => Err(ChatError::Precondition(prompt::CONTEXT_LOADING.into())),
            ActiveContext::Ready(None) => {
                Err(ChatError::Precondition(prompt::NO_ACTIVE_FILE.into()))
            }
            ActiveContext::Ready(Some(text)) => Ok(text.clone()),
        }
    }

    /// Surface a failure as an inline error message.
    async fn report(&self, err: ChatError) {
        debug!(error = %err, "Reporting inline error");
        let epoch = self.session.lock().await.epoch;
        self.push(epoch, Message::error(err.to_string())).await;
    }

    /// Append to the conversation of `epoch` and render it if shown.
    async fn push(&self, epoch: u64, message: Message) {
        let visible = {
            let mut session = self.session.lock().await;
            if session.epoch != epoch {
                return;
            }
            session.conversation.push(message.clone());
            session.visible
        };

        if visible {
            self.sink.render_message(&message).await;
            self.sink.scroll_to_latest().await;
        }
    }

    /// Finish the round trip of `epoch`, dropping it if the session moved on.
    async fn complete(&self, epoch: u64, message: Message) {
        let visible = {
            let mut session = self.session.lock().await;
            if session.epoch != epoch {
                debug!(
                    epoch,
                    current = session.epoch,
                    "Discarding response for a previous session"
                );
                return;
            }
            session.pending = false;
            session.conversation.push(message.clone());
            session.visible
        };

        if visible {
            self.sink.set_pending(false).await;
            self.sink.render_message(&message).await;
            self.sink.scroll_to_latest().await;
        }
    }

    async fn hide_suggestions(&self, epoch: u64) {
        let visible = {
            let mut session = self.session.lock().await;
            if session.epoch != epoch || !session.suggestions {
                return;
            }
            session.suggestions = false;
            session.visible
        };

        if visible {
            self.sink.set_suggestions(SuggestionsView::Hidden).await;
        }
    }

    async fn show_pending(&self, epoch: u64) {
        let visible = {
            let session = self.session.lock().await;
            session.epoch == epoch && session.visible
        };

        if visible {
            self.sink.set_pending(true).await;
        }
    }
}
