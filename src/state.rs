use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::broker::Broker;
use crate::message::ChatMessage;

/// Text buffers a [`TextInput`](crate::widgets::TextInput) can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Login,
    Password,
    CurrentMessage,
    SearchInput,
}

/// Everything the UI and the sync loops share.
#[derive(Default)]
pub struct ChatState {
    pub login: String,
    pub password: String,
    pub token: Option<String>,
    pub is_authorized: bool,

    pub current_message: String,
    pub search_input: String,

    /// Chat history, newest last.
    pub messages: Vec<ChatMessage>,
    /// Encoded messages waiting for the sender loop, oldest first.
    pub queue: VecDeque<Vec<u8>>,

    pub contacts: Vec<String>,
    pub contact_hints: Vec<String>,

    pub broker: Option<Arc<dyn Broker>>,
    pub broadcast_channel: Option<String>,
}

impl ChatState {
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Login => &self.login,
            Field::Password => &self.password,
            Field::CurrentMessage => &self.current_message,
            Field::SearchInput => &self.search_input,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Login => &mut self.login,
            Field::Password => &mut self.password,
            Field::CurrentMessage => &mut self.current_message,
            Field::SearchInput => &mut self.search_input,
        }
    }
}

impl fmt::Debug for ChatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatState")
            .field("login", &self.login)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("is_authorized", &self.is_authorized)
            .field("messages", &self.messages.len())
            .field("queue", &self.queue.len())
            .field("contacts", &self.contacts)
            .field("connected", &self.broker.is_some())
            .field("broadcast_channel", &self.broadcast_channel)
            .finish_non_exhaustive()
    }
}
