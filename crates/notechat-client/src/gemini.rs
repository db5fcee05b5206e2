//! HTTP client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::ModelClient;
use crate::error::ClientError;

/// Production endpoint prefix; the model name and action are appended.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Header carrying the key; kept out of the URL so it never shows up in error text.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Model client backed by the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `api_key` - Plain API key
    /// * `model` - Model name (e.g., "gemini-1.5-flash")
    /// * `timeout` - Optional per-request timeout; the transport default applies otherwise
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: builder.build()?,
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint prefix.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn send_request(&self, body: &GenerateContentRequest<'_>) -> Result<String, ClientError> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        debug!(url = %url, "POST request");

        let response = self
            .inner
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let message = provider_message(&body_text);
            warn!(status = status.as_u16(), message = %message, "Model API returned an error");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

        extract_text(parsed)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn converse(&self, prompt: &str) -> Result<String, ClientError> {
        if prompt.trim().is_empty() {
            return Err(ClientError::EmptyPrompt);
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let text = self.send_request(&request).await?;
        debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            reply_chars = text.chars().count(),
            "Model call completed"
        );
        Ok(text)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text(response: GenerateContentResponse) -> Result<String, ClientError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| ClientError::MalformedResponse("no text in response candidates".into()))
}

/// Pull `status: message` out of the provider's error body, falling back to the raw body.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            match wrapper.error.status {
                Some(status) if !status.is_empty() => format!("{status}: {msg}"),
                _ => msg,
            }
        })
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;

    #[derive(Clone)]
    struct Stub {
        status: StatusCode,
        reply: Value,
        seen: Arc<Mutex<Vec<Seen>>>,
    }

    struct Seen {
        call: String,
        key: Option<String>,
        query: HashMap<String, String>,
        body: Value,
    }

    async fn generate(
        State(stub): State<Stub>,
        Path(call): Path<String>,
        Query(query): Query<HashMap<String, String>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let key = headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        stub.seen.lock().unwrap().push(Seen {
            call,
            key,
            query,
            body,
        });
        (stub.status, Json(stub.reply.clone()))
    }

    async fn spawn_stub(status: StatusCode, reply: Value) -> (String, Stub) {
        let stub = Stub {
            status,
            reply,
            seen: Arc::new(Mutex::new(Vec::new())),
        };
        let app = Router::new()
            .route("/:call", post(generate))
            .with_state(stub.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), stub)
    }

    fn text_reply(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }] })
    }

    fn client(base_url: &str) -> GeminiClient {
        GeminiClient::new("test-key", "gemini-test", Some(Duration::from_secs(5)))
            .unwrap()
            .with_base_url(base_url)
    }

    #[tokio::test]
    async fn test_converse_returns_first_text_part() {
        let (url, stub) = spawn_stub(StatusCode::OK, text_reply("**Hi** there")).await;

        let reply = client(&url).converse("Hello").await.unwrap();
        assert_eq!(reply, "**Hi** there");

        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert_eq!(request.call, "gemini-test:generateContent");
        assert_eq!(request.key.as_deref(), Some("test-key"));
        assert!(request.query.is_empty());
        assert_eq!(request.body["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(request.body["contents"][0]["role"], "user");
    }

    #[tokio::test]
    async fn test_translate_embeds_content_and_language() {
        let (url, stub) = spawn_stub(StatusCode::OK, text_reply("Hallo")).await;

        let reply = client(&url).translate("Hello", "German").await.unwrap();
        assert_eq!(reply, "Hallo");

        let seen = stub.seen.lock().unwrap();
        let sent = seen[0].body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(sent.contains("Hello"));
        assert!(sent.contains("German"));
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected_locally() {
        let (url, stub) = spawn_stub(StatusCode::OK, text_reply("unused")).await;

        let err = client(&url).converse("   ").await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyPrompt));
        assert!(stub.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_status_carries_provider_message() {
        let body = json!({ "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" } });
        let (url, _stub) = spawn_stub(StatusCode::BAD_REQUEST, body).await;

        match client(&url).converse("Hello").await.unwrap_err() {
            ClientError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "INVALID_ARGUMENT: API key not valid");
            }
            other => panic!("Expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_candidates_is_malformed() {
        let (url, _stub) = spawn_stub(StatusCode::OK, json!({ "candidates": [] })).await;

        let err = client(&url).converse("Hello").await.unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_connection_failure_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}"))
            .converse("Hello")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }

    #[tokio::test]
    async fn test_transport_error_text_omits_key() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = GeminiClient::new("SUPER-SECRET-KEY", "m", None)
            .unwrap()
            .with_base_url(&format!("http://{addr}"))
            .converse("Hello")
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("SUPER-SECRET-KEY"));
        assert!(!format!("{err:?}").contains("SUPER-SECRET-KEY"));
    }

    #[test]
    fn test_provider_message_falls_back_to_body() {
        assert_eq!(provider_message("upstream down"), "upstream down");
    }
}
