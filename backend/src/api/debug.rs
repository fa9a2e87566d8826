//! Debug API
//!
//! Read-only diagnostic endpoints. The widget's session badge links to
//! the history endpoint; the sessions endpoint lists everything the
//! store currently holds.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::state::{HistoryMessage, SessionSummary, SharedStore};

/// How many trailing history entries the history endpoint returns
pub const HISTORY_TAIL_LEN: usize = 8;

/// Query parameters for the history endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Session to inspect
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Response body for the history endpoint
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Total number of history entries for the session
    pub len: usize,
    /// The most recent entries, oldest first
    pub last_messages: Vec<HistoryMessage>,
}

/// List all live sessions with their history lengths
pub async fn sessions(State(store): State<SharedStore>) -> Json<Vec<SessionSummary>> {
    Json(store.read().await.summaries())
}

/// Show the tail of one session's history
///
/// An unknown session yields an empty history rather than an error.
pub async fn history(
    State(store): State<SharedStore>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let store = store.read().await;
    Json(HistoryResponse {
        len: store.len(&query.session_id),
        last_messages: store.last_messages(&query.session_id, HISTORY_TAIL_LEN),
    })
}
