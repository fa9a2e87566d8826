//! Integration tests for the chat API
//!
//! These tests exercise the handlers end-to-end against a shared
//! session store: cookie issuance and reuse, validation errors,
//! history trimming, and the debug endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chatbox_backend::api::chat::{chat, reset, ChatRequest, ResetRequest, SESSION_COOKIE};
use chatbox_backend::api::debug::{history, sessions, HistoryQuery, HISTORY_TAIL_LEN};
use chatbox_backend::state::{HistoryRole, SessionStore, SharedStore};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Helper to create a test store with the default history limit
fn create_test_store() -> SharedStore {
    Arc::new(RwLock::new(SessionStore::new(20)))
}

/// Helper to build a cookie jar carrying an existing session id
fn jar_with_session(session_id: &str) -> CookieJar {
    CookieJar::new().add(Cookie::new(SESSION_COOKIE, session_id.to_string()))
}

#[tokio::test]
async fn test_first_chat_issues_session_and_cookie() {
    let store = create_test_store();

    let (jar, Json(response)) = chat(
        State(store.clone()),
        CookieJar::new(),
        Json(ChatRequest {
            message: "hello".to_string(),
        }),
    )
    .await
    .expect("chat should succeed");

    assert_eq!(response.reply, "You said: \"hello\"");
    assert!(!response.session_id.is_empty());

    // The response sets the cookie to the same id it returned.
    let cookie = jar.get(SESSION_COOKIE).expect("sid cookie should be set");
    assert_eq!(cookie.value(), response.session_id);
}

#[tokio::test]
async fn test_chat_reuses_session_from_cookie() {
    let store = create_test_store();

    let (_, Json(first)) = chat(
        State(store.clone()),
        jar_with_session("fixed-sid"),
        Json(ChatRequest {
            message: "one".to_string(),
        }),
    )
    .await
    .expect("chat should succeed");
    let (_, Json(second)) = chat(
        State(store.clone()),
        jar_with_session("fixed-sid"),
        Json(ChatRequest {
            message: "two".to_string(),
        }),
    )
    .await
    .expect("chat should succeed");

    assert_eq!(first.session_id, "fixed-sid");
    assert_eq!(second.session_id, "fixed-sid");

    // System prompt plus two exchanges.
    assert_eq!(store.read().await.len("fixed-sid"), 5);
}

#[tokio::test]
async fn test_message_is_trimmed_before_validation() {
    let store = create_test_store();

    let (_, Json(response)) = chat(
        State(store.clone()),
        CookieJar::new(),
        Json(ChatRequest {
            message: "  hello  ".to_string(),
        }),
    )
    .await
    .expect("chat should succeed");

    assert_eq!(response.reply, "You said: \"hello\"");
}

#[tokio::test]
async fn test_empty_message_is_bad_request() {
    let store = create_test_store();

    let result = chat(
        State(store.clone()),
        CookieJar::new(),
        Json(ChatRequest {
            message: "   ".to_string(),
        }),
    )
    .await;

    let error = result.err().expect("empty message should be rejected");
    assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    assert!(store.read().await.is_empty());
}

#[tokio::test]
async fn test_oversized_message_is_bad_request() {
    let store = create_test_store();

    let result = chat(
        State(store.clone()),
        CookieJar::new(),
        Json(ChatRequest {
            message: "a".repeat(4001),
        }),
    )
    .await;

    let error = result.err().expect("oversized message should be rejected");
    assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_returns_trimmed_tail() {
    let store = create_test_store();

    for i in 0..15 {
        chat(
            State(store.clone()),
            jar_with_session("sid-1"),
            Json(ChatRequest {
                message: format!("q{}", i),
            }),
        )
        .await
        .expect("chat should succeed");
    }

    let Json(response) = history(
        State(store.clone()),
        Query(HistoryQuery {
            session_id: "sid-1".to_string(),
        }),
    )
    .await;

    // 15 exchanges produce 30 messages, trimmed to the system prompt
    // plus the 20 most recent.
    assert_eq!(response.len, 21);
    assert_eq!(response.last_messages.len(), HISTORY_TAIL_LEN);

    let last = response.last_messages.last().unwrap();
    assert_eq!(last.role, HistoryRole::Assistant);
    assert_eq!(last.content, "You said: \"q14\"");
}

#[tokio::test]
async fn test_history_of_unknown_session_is_empty() {
    let store = create_test_store();

    let Json(response) = history(
        State(store),
        Query(HistoryQuery {
            session_id: "missing".to_string(),
        }),
    )
    .await;

    assert_eq!(response.len, 0);
    assert!(response.last_messages.is_empty());
}

#[tokio::test]
async fn test_reset_drops_session() {
    let store = create_test_store();

    chat(
        State(store.clone()),
        jar_with_session("sid-1"),
        Json(ChatRequest {
            message: "hello".to_string(),
        }),
    )
    .await
    .expect("chat should succeed");

    let Json(response) = reset(
        State(store.clone()),
        Json(ResetRequest {
            session_id: "sid-1".to_string(),
        }),
    )
    .await;
    assert!(response.ok);
    assert_eq!(store.read().await.len("sid-1"), 0);

    // Resetting an unknown session is still ok.
    let Json(response) = reset(
        State(store),
        Json(ResetRequest {
            session_id: "sid-1".to_string(),
        }),
    )
    .await;
    assert!(response.ok);
}

#[tokio::test]
async fn test_sessions_lists_live_sessions() {
    let store = create_test_store();

    for sid in ["sid-1", "sid-2"] {
        chat(
            State(store.clone()),
            jar_with_session(sid),
            Json(ChatRequest {
                message: "hello".to_string(),
            }),
        )
        .await
        .expect("chat should succeed");
    }

    let Json(mut summaries) = sessions(State(store)).await;
    summaries.sort_by(|a, b| a.session_id.cmp(&b.session_id));

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].session_id, "sid-1");
    assert_eq!(summaries[0].len, 3);
    assert_eq!(summaries[1].session_id, "sid-2");
}
