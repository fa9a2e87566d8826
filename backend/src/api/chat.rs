//! Chat API
//!
//! The chat endpoint the widget talks to. Session continuity is
//! carried by the `sid` cookie: the handler reads it when present,
//! issues a fresh UUID when absent, and always sets it back on the
//! response. The client never sends a session identifier in the body.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::SharedStore;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "sid";

/// Maximum accepted message length in characters
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// How long the session cookie stays valid
const SESSION_COOKIE_MAX_AGE: time::Duration = time::Duration::days(7);

/// Request body for the chat endpoint
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's message text
    pub message: String,
}

/// Response body for the chat endpoint
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Reply text
    pub reply: String,
    /// The session id actually used (same value as the cookie)
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Request body for the reset endpoint
#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    /// Session to drop
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Response body for the reset endpoint
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    /// Always true; resetting an unknown session is not an error
    pub ok: bool,
}

/// Handle one chat exchange
///
/// Validates the message, records the exchange in the session's
/// history, and returns the reply together with the session id. The
/// response refreshes the `sid` cookie on every exchange.
pub async fn chat(
    State(store): State<SharedStore>,
    jar: CookieJar,
    Json(request): Json<ChatRequest>,
) -> Result<(CookieJar, Json<ChatResponse>), AppError> {
    let session_id = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::EmptyMessage);
    }
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(AppError::MessageTooLong(MAX_MESSAGE_LENGTH));
    }

    let reply = compose_reply(message);

    {
        let mut store = store.write().await;
        store.record_exchange(&session_id, message, &reply);
        info!(
            session_id = %session_id,
            history_len = store.len(&session_id),
            "Chat exchange recorded"
        );
    }

    let cookie = Cookie::build((SESSION_COOKIE, session_id.clone()))
        .path("/")
        .max_age(SESSION_COOKIE_MAX_AGE)
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Json(ChatResponse {
            reply,
            session_id,
        }),
    ))
}

/// Drop a session's history so the next exchange starts fresh
pub async fn reset(
    State(store): State<SharedStore>,
    Json(request): Json<ResetRequest>,
) -> Json<ResetResponse> {
    let removed = store.write().await.remove(&request.session_id);
    info!(session_id = %request.session_id, removed, "Session reset");
    Json(ResetResponse { ok: true })
}

/// Produce the canned reply for a message
///
/// This is a dev server: it echoes instead of calling a model, so the
/// widget can be exercised end-to-end without any credentials.
fn compose_reply(message: &str) -> String {
    format!("You said: \"{}\"", message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_reply_echoes_message() {
        assert_eq!(compose_reply("hello"), "You said: \"hello\"");
    }
}
