//! API module
//!
//! Contains HTTP request handlers for the chat and debug endpoints

pub mod chat;
pub mod debug;
