// Conversation history for multi-turn chats

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::providers::{ChatMessage, ROLE_ASSISTANT};

const DEFAULT_MAX_MESSAGES: usize = 20;

/// Ordered user/assistant messages with a bounded length
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    #[serde(skip, default = "default_max_messages")]
    max_messages: usize,
}

fn default_max_messages() -> usize {
    DEFAULT_MAX_MESSAGES
}

impl Conversation {
    /// Create a new conversation with the default limit
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_MESSAGES)
    }

    /// Create a conversation keeping at most `max_messages` messages
    pub fn with_limit(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages,
        }
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.add_message(ChatMessage::user(content));
    }

    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.add_message(ChatMessage::assistant(content));
    }

    pub fn add_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.trim_if_needed();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Clear conversation history (start fresh)
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of assistant replies so far
    pub fn turn_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == ROLE_ASSISTANT)
            .count()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Drop the oldest messages beyond the limit
    fn trim_if_needed(&mut self) {
        if self.messages.len() > self.max_messages {
            let remove_count = self.messages.len() - self.max_messages;
            self.messages.drain(0..remove_count);
        }
    }

    /// Save conversation to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize conversation")?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .context("Failed to create directory for conversation state")?;
        }

        fs::write(path.as_ref(), json).with_context(|| {
            format!(
                "Failed to write conversation to {}",
                path.as_ref().display()
            )
        })?;

        Ok(())
    }

    /// Load conversation from a JSON file, applying `max_messages`
    pub fn load<P: AsRef<Path>>(path: P, max_messages: usize) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read conversation from {}",
                path.as_ref().display()
            )
        })?;

        let mut conversation: Conversation =
            serde_json::from_str(&json).context("Failed to parse conversation JSON")?;
        conversation.max_messages = max_messages;
        conversation.trim_if_needed();

        Ok(conversation)
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
