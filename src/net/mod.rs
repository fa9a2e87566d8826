// Chat transport
// HTTP client for the chat endpoint. Session continuity rides on a
// cookie managed entirely by reqwest's cookie store; the widget never
// reads or writes the session cookie itself.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::SendOutcome;

/// Errors surfaced by the chat transport
///
/// `Http` is a handled condition (the widget renders the status line
/// and raw body), while `Transport` covers request-level failures such
/// as a refused connection.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server URL could not be parsed at construction time
    #[error("invalid server URL: {0}")]
    InvalidBaseUrl(String),

    /// The endpoint answered with a non-success status
    #[error("HTTP {status} {status_text}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Canonical status text (may be empty)
        status_text: String,
        /// Raw response body, preserved for diagnostics
        body: String,
    },

    /// The request never produced a response
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Map the error onto the view model's send outcome
    pub fn into_outcome(self) -> SendOutcome {
        match self {
            ClientError::Http {
                status,
                status_text,
                body,
            } => SendOutcome::HttpError {
                status,
                status_text,
                body,
            },
            other => SendOutcome::Failed {
                message: other.to_string(),
            },
        }
    }
}

/// Request body for the chat endpoint
///
/// Only the message text is sent; the session identifier travels in a
/// cookie outside this component's concern.
#[derive(Serialize)]
struct ChatRequest {
    message: String,
}

/// Wire format of a successful chat response; both fields are optional
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    reply: Option<String>,
    #[serde(rename = "sessionId", default)]
    session_id: Option<String>,
}

/// Parsed contents of a 2xx response
#[derive(Debug, Clone, Default)]
pub struct ChatReply {
    /// Reply text, if present
    pub reply: Option<String>,
    /// Session identifier, if present
    pub session_id: Option<String>,
}

/// HTTP client bound to one chat server
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    /// Create a client for the given server base URL
    ///
    /// The URL is validated here so later requests can assume it is
    /// well formed. The underlying client keeps a cookie store so the
    /// backend's session cookie is echoed back on every send.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { http, base_url })
    }

    /// Send one chat message; a single attempt, no retry and no timeout
    ///
    /// The response body is read as text before any JSON parsing so
    /// diagnostic payloads survive a parse failure. A 2xx body that is
    /// not valid JSON is tolerated and treated as carrying no
    /// structured data.
    pub async fn send_message(&self, text: &str) -> Result<ChatReply, ClientError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            message: text.to_string(),
        };

        tracing::debug!(url = %url, message_len = text.len(), "Sending chat message");

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or("").to_string();
            tracing::error!(
                status = status.as_u16(),
                status_text = %status_text,
                body = %body,
                "Chat endpoint returned error status"
            );
            return Err(ClientError::Http {
                status: status.as_u16(),
                status_text,
                body,
            });
        }

        let reply = match serde_json::from_str::<ChatResponse>(&body) {
            Ok(parsed) => ChatReply {
                reply: parsed.reply,
                session_id: parsed.session_id,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Response body is not valid JSON, ignoring");
                ChatReply::default()
            }
        };

        tracing::debug!(
            has_reply = reply.reply.is_some(),
            has_session_id = reply.session_id.is_some(),
            "Chat response received"
        );

        Ok(reply)
    }

    /// Send one chat message and fold every outcome (reply, HTTP error,
    /// transport failure) into the view model's `SendOutcome`
    pub async fn send_message_outcome(&self, text: &str) -> SendOutcome {
        match self.send_message(text).await {
            Ok(reply) => SendOutcome::Reply {
                reply: reply.reply,
                session_id: reply.session_id,
            },
            Err(err) => err.into_outcome(),
        }
    }

    /// URL of the diagnostic history view for a session, with the
    /// identifier carried as a URL-encoded query parameter
    pub fn history_url(&self, session_id: &str) -> String {
        match reqwest::Url::parse(&format!("{}/api/debug/history", self.base_url)) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair("sessionId", session_id);
                url.to_string()
            }
            // The base URL was validated at construction; this arm only
            // exists to keep the accessor infallible.
            Err(_) => format!("{}/api/debug/history", self.base_url),
        }
    }
}
