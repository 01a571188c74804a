//! Message parser - Parses raw text into structured messages

use crate::domain::entities::{Content, IncomingMessage, Sender};

/// Parses incoming text into IncomingMessage objects
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parse a text message
    pub fn parse(
        &self,
        chat_id: impl Into<String>,
        text: impl Into<String>,
        sender: Option<Sender>,
    ) -> IncomingMessage {
        let text = text.into();
        let chat_id = chat_id.into();

        if text.starts_with('/') || text.starts_with(&self.command_prefix) {
            return self.parse_command(chat_id, text, sender);
        }

        IncomingMessage::new(chat_id, Content::Text(text)).with_sender_opt(sender)
    }

    fn parse_command(&self, chat_id: String, text: String, sender: Option<Sender>) -> IncomingMessage {
        let cmd_text = if let Some(stripped) = text.strip_prefix('/') {
            stripped
        } else {
            text.trim_start_matches(&self.command_prefix)
        };

        let mut parts = cmd_text.split_whitespace();
        let raw_token = parts.next().unwrap_or("");
        // Group chats address commands as /start@BotName
        let token = raw_token.split('@').next().unwrap_or(raw_token).to_string();
        let args: Vec<String> = parts.map(|s| s.to_string()).collect();

        IncomingMessage::new(chat_id, Content::Command { token, args }).with_sender_opt(sender)
    }
}
