//! In-memory session store
//!
//! Conversation history keyed by session id. Nothing is persisted:
//! restarting the server drops every session, matching the dev-server
//! role of this backend.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// System prompt seeded as the first entry of every new session
pub const SYSTEM_PROMPT: &str = "You are a polite and helpful assistant.";

/// Session store shared across request handlers
pub type SharedStore = Arc<RwLock<SessionStore>>;

/// Role of a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    /// Fixed system prompt
    System,
    /// Message sent by the user
    User,
    /// Reply produced by the server
    Assistant,
}

/// One entry of a session's conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryMessage {
    /// Who authored the entry
    pub role: HistoryRole,
    /// Entry text
    pub content: String,
}

impl HistoryMessage {
    /// Create a new history entry
    pub fn new(role: HistoryRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Summary of one live session, as reported by the debug endpoints
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Session identifier
    #[serde(rename = "sessionId")]
    pub session_id: String,
    /// Number of history entries, system prompt included
    pub len: usize,
}

/// In-memory conversation history keyed by session id
#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<String, Vec<HistoryMessage>>,
    max_turns: usize,
}

impl SessionStore {
    /// Create an empty store keeping at most `max_turns` recent
    /// non-system messages per session
    pub fn new(max_turns: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            max_turns,
        }
    }

    /// Record one user/assistant exchange for a session
    ///
    /// A new session is seeded with the system prompt first. After the
    /// exchange is appended the history is trimmed to the system prompt
    /// plus the most recent `max_turns` messages.
    pub fn record_exchange(&mut self, session_id: &str, user_message: &str, reply: &str) {
        let history = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| vec![HistoryMessage::new(HistoryRole::System, SYSTEM_PROMPT)]);

        history.push(HistoryMessage::new(HistoryRole::User, user_message));
        history.push(HistoryMessage::new(HistoryRole::Assistant, reply));

        *history = Self::trim_history(history, self.max_turns);
    }

    /// Keep the first system entry plus the most recent `max_turns`
    /// non-system messages
    fn trim_history(history: &[HistoryMessage], max_turns: usize) -> Vec<HistoryMessage> {
        let system = history
            .iter()
            .filter(|m| m.role == HistoryRole::System)
            .take(1)
            .cloned();

        let rest: Vec<HistoryMessage> = history
            .iter()
            .filter(|m| m.role != HistoryRole::System)
            .cloned()
            .collect();
        let skip = rest.len().saturating_sub(max_turns);

        system.chain(rest.into_iter().skip(skip)).collect()
    }

    /// Number of history entries for a session (0 if unknown)
    pub fn len(&self, session_id: &str) -> usize {
        self.sessions.get(session_id).map_or(0, Vec::len)
    }

    /// Whether the store has no sessions at all
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// The most recent `count` history entries for a session
    pub fn last_messages(&self, session_id: &str, count: usize) -> Vec<HistoryMessage> {
        self.sessions.get(session_id).map_or_else(Vec::new, |h| {
            let skip = h.len().saturating_sub(count);
            h[skip..].to_vec()
        })
    }

    /// Drop a session's history; returns whether it existed
    pub fn remove(&mut self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Summaries of all live sessions
    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.sessions
            .iter()
            .map(|(id, history)| SessionSummary {
                session_id: id.clone(),
                len: history.len(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_seeded_with_system_prompt() {
        let mut store = SessionStore::new(20);
        store.record_exchange("s1", "hello", "hi");

        let history = store.last_messages("s1", 10);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].role, HistoryRole::System);
        assert_eq!(history[0].content, SYSTEM_PROMPT);
        assert_eq!(history[1].role, HistoryRole::User);
        assert_eq!(history[2].role, HistoryRole::Assistant);
    }

    #[test]
    fn test_history_is_trimmed_to_recent_messages() {
        let mut store = SessionStore::new(4);
        for i in 0..10 {
            store.record_exchange("s1", &format!("q{}", i), &format!("a{}", i));
        }

        // System prompt plus the four most recent messages.
        assert_eq!(store.len("s1"), 5);
        let history = store.last_messages("s1", 5);
        assert_eq!(history[0].role, HistoryRole::System);
        assert_eq!(history[1].content, "q8");
        assert_eq!(history[2].content, "a8");
        assert_eq!(history[3].content, "q9");
        assert_eq!(history[4].content, "a9");
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut store = SessionStore::new(20);
        store.record_exchange("s1", "one", "r1");
        store.record_exchange("s2", "two", "r2");

        assert_eq!(store.len("s1"), 3);
        assert_eq!(store.len("s2"), 3);
        assert_eq!(store.last_messages("s1", 1)[0].content, "r1");
    }

    #[test]
    fn test_unknown_session_is_empty() {
        let store = SessionStore::new(20);
        assert_eq!(store.len("missing"), 0);
        assert!(store.last_messages("missing", 8).is_empty());
    }

    #[test]
    fn test_remove_drops_session() {
        let mut store = SessionStore::new(20);
        store.record_exchange("s1", "hello", "hi");

        assert!(store.remove("s1"));
        assert!(!store.remove("s1"));
        assert_eq!(store.len("s1"), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_summaries_report_all_sessions() {
        let mut store = SessionStore::new(20);
        store.record_exchange("s1", "one", "r1");
        store.record_exchange("s1", "two", "r2");
        store.record_exchange("s2", "three", "r3");

        let mut summaries = store.summaries();
        summaries.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].session_id, "s1");
        assert_eq!(summaries[0].len, 5);
        assert_eq!(summaries[1].len, 3);
    }
}
