//! State management module
//!
//! Holds the in-memory session store shared by all request handlers.

pub mod sessions;

pub use sessions::{HistoryMessage, HistoryRole, SessionStore, SessionSummary, SharedStore};
