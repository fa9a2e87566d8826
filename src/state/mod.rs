// State management module
// Holds the chat view model and the persisted theme preference

pub mod chat_state;
pub mod theme;

pub use chat_state::{ChatState, Message, Role, SendOutcome};
pub use theme::ThemePreference;
