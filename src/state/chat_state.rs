// Chat view model
// Pure state transitions for the chat widget, kept separate from the
// egui shell so the send flow can be unit tested without a UI

/// Greeting shown as the first bot message
pub const GREETING: &str = "Hello! Type a message below and press send.";

/// Fallback text rendered when a successful response carries no reply
/// text (the field is absent or empty)
pub const NO_REPLY_FALLBACK: &str = "(no reply)";

/// Prefix for bot messages that report a transport-level failure
pub const ERROR_PREFIX: &str = "Error: ";

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Message typed by the user
    User,
    /// Message from the bot (replies, errors, the greeting)
    Bot,
}

/// A single rendered chat message
///
/// Messages are appended in display order and never mutated or removed.
#[derive(Debug, Clone)]
pub struct Message {
    /// Who authored the message
    pub role: Role,
    /// Message text
    pub content: String,
}

/// Result of one completed send, as seen by the view model
#[derive(Debug, Clone)]
pub enum SendOutcome {
    /// Any 2xx response; both fields are optional in the wire format
    Reply {
        /// Reply text, if the response carried one
        reply: Option<String>,
        /// Session identifier, if the response carried one
        session_id: Option<String>,
    },
    /// Non-2xx response, recovered locally and rendered verbatim
    HttpError {
        /// HTTP status code
        status: u16,
        /// Canonical status text (may be empty)
        status_text: String,
        /// Raw response body
        body: String,
    },
    /// The request itself failed (connection refused, DNS, etc.)
    Failed {
        /// Human-readable failure text
        message: String,
    },
}

/// Chat widget state
///
/// The in-flight flag is the sole guard against overlapping sends:
/// `begin_send` refuses to start a second send while one is
/// outstanding, and every outcome funnels through `finish_send`, which
/// clears the flag again.
#[derive(Debug, Clone)]
pub struct ChatState {
    /// Messages in display order
    pub messages: Vec<Message>,
    /// Whether the transient "thinking" placeholder is shown
    pub thinking: bool,
    /// Whether a send is currently outstanding
    pub in_flight: bool,
    /// Last session identifier reported by the backend, shown in the badge
    pub session_id: Option<String>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    /// Create the initial state with the bot greeting
    pub fn new() -> Self {
        Self {
            messages: vec![Message {
                role: Role::Bot,
                content: GREETING.to_string(),
            }],
            thinking: false,
            in_flight: false,
            session_id: None,
        }
    }

    /// Append a message to the display list
    pub fn push_message(&mut self, role: Role, content: String) {
        self.messages.push(Message { role, content });
    }

    /// Start a send if one is allowed
    ///
    /// Returns the trimmed text to transmit, or `None` (a complete
    /// no-op) when a send is already in flight or the trimmed input is
    /// empty. On success the user message is appended optimistically
    /// and the thinking placeholder is raised before any network
    /// activity happens.
    pub fn begin_send(&mut self, raw_input: &str) -> Option<String> {
        if self.in_flight {
            return None;
        }
        let text = raw_input.trim();
        if text.is_empty() {
            return None;
        }

        let text = text.to_string();
        self.push_message(Role::User, text.clone());
        self.thinking = true;
        self.in_flight = true;
        Some(text)
    }

    /// Apply the outcome of a send
    ///
    /// This is the single exit point for success, HTTP errors and
    /// transport failures alike: the placeholder is removed and the
    /// in-flight flag cleared on every path before the bot message is
    /// appended.
    pub fn finish_send(&mut self, outcome: SendOutcome) {
        self.thinking = false;
        self.in_flight = false;

        match outcome {
            SendOutcome::Reply { reply, session_id } => {
                if let Some(id) = session_id {
                    self.session_id = Some(id);
                }
                let content = reply
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| NO_REPLY_FALLBACK.to_string());
                self.push_message(Role::Bot, content);
            }
            SendOutcome::HttpError {
                status,
                status_text,
                body,
            } => {
                self.push_message(Role::Bot, format!("HTTP {} {}\n{}", status, status_text, body));
            }
            SendOutcome::Failed { message } => {
                self.push_message(Role::Bot, format!("{}{}", ERROR_PREFIX, message));
            }
        }
    }

}
