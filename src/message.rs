//! Chat message triple and its wire encoding.
//!
//! On the broker a message travels as a JSON array
//! `[author, text, timestamp]`.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Timestamp layout shown next to every message.
pub const TIMESTAMP_FORMAT: &str = "%H:%M %m-%d-%Y";

/// A single chat line: who wrote it, what they wrote, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author: String,
    pub text: String,
    pub timestamp: String,
}

impl ChatMessage {
    pub fn new(author: impl Into<String>, text: impl Into<String>, at: DateTime<Local>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            timestamp: format_timestamp(at),
        }
    }

    /// Serialize for publishing.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let triple = (&self.author, &self.text, &self.timestamp);
        serde_json::to_vec(&triple).context("Failed to encode chat message")
    }

    /// Parse a payload received from the broker.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let (author, text, timestamp): (String, String, String) =
            serde_json::from_slice(payload).context("Malformed chat message payload")?;
        Ok(Self { author, text, timestamp })
    }
}

pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
