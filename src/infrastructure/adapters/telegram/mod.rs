//! Telegram adapter
//!
//! Bot API over HTTPS with long polling. Wire types live here and are
//! converted to domain messages before anything else sees them.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::errors::TransportError;
use crate::domain::entities::{Button, ButtonAction, Sender};
use crate::domain::traits::{Transport, TransportInfo};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Serialize)]
struct WebAppInfo {
    url: String,
}

#[derive(Serialize)]
struct InlineKeyboardButton {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_app: Option<WebAppInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_data: Option<String>,
}

impl From<&Button> for InlineKeyboardButton {
    fn from(btn: &Button) -> Self {
        let mut out = Self {
            text: btn.label.clone(),
            url: None,
            web_app: None,
            callback_data: None,
        };
        match &btn.action {
            ButtonAction::Url(url) => out.url = Some(url.clone()),
            ButtonAction::LaunchApp(url) => out.web_app = Some(WebAppInfo { url: url.clone() }),
            ButtonAction::Callback(data) => out.callback_data = Some(data.clone()),
        }
        out
    }
}

#[derive(Serialize)]
struct ReplyMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// Telegram transport over the Bot API
pub struct TelegramTransport {
    token: String,
    client: Client,
    info: TransportInfo,
}

impl TelegramTransport {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: TransportInfo {
                id: "unknown".to_string(),
                name: "launchpad-bot".to_string(),
                username: "launchpad_bot".to_string(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// Fetch bot identity from the API
    pub async fn fetch_info(&mut self) -> Result<(), TransportError> {
        #[derive(Deserialize)]
        struct Response {
            result: BotUser,
        }

        #[derive(Deserialize)]
        struct BotUser {
            id: i64,
            first_name: String,
            username: String,
        }

        let url = self.api_url("getMe");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let data: Response = response
            .json()
            .await
            .map_err(|e| TransportError::Parse(e.to_string()))?;

        self.info = TransportInfo {
            id: data.result.id.to_string(),
            name: data.result.first_name,
            username: data.result.username,
        };

        Ok(())
    }

    /// Long-poll for updates
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, TransportError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        #[derive(Deserialize)]
        struct Response {
            result: Vec<Update>,
        }

        let url = self.api_url("getUpdates");
        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string(), "callback_query".to_string()],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Api(format!(
                "Telegram API error: {}",
                response.status()
            )));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| TransportError::Parse(e.to_string()))?;

        Ok(data.result)
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update]) -> i64 {
        updates.iter().map(|u| u.update_id + 1).max().unwrap_or(0)
    }

    /// Convert a wire user into the domain sender type
    pub fn sender_from(user: &User) -> Sender {
        let mut sender = Sender::new(user.id.to_string());
        if let Some(ref username) = user.username {
            sender = sender.with_username(username.clone());
        }
        if let Some(ref first) = user.first_name {
            sender = sender.with_name(first.clone(), user.last_name.clone());
        }
        sender
    }

    /// Register command tokens with Telegram so clients show the menu
    pub async fn register_commands(
        &self,
        commands: &[(String, String)],
    ) -> Result<(), TransportError> {
        #[derive(Serialize)]
        struct BotCommand {
            command: String,
            description: String,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest {
            commands: Vec<BotCommand>,
        }

        let commands = commands
            .iter()
            .map(|(token, description)| BotCommand {
                command: token.clone(),
                description: description.clone(),
            })
            .collect();

        let url = self.api_url("setMyCommands");
        let request = SetMyCommandsRequest { commands };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(TransportError::Api(format!(
                "Failed to register commands: {}",
                error
            )));
        }

        tracing::info!("Registered bot commands with Telegram");
        Ok(())
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: &[Vec<Button>],
        formatted: bool,
    ) -> Result<String, TransportError> {
        let preview: String = text.chars().take(80).collect();
        tracing::debug!("Sending to {}: {}", chat_id, preview);

        #[derive(Serialize)]
        struct SendMessageRequest {
            chat_id: String,
            text: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            parse_mode: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<ReplyMarkup>,
        }

        #[derive(Deserialize)]
        struct Response {
            result: MessageResult,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let reply_markup = if keyboard.is_empty() {
            None
        } else {
            Some(ReplyMarkup {
                inline_keyboard: keyboard
                    .iter()
                    .map(|row| row.iter().map(InlineKeyboardButton::from).collect())
                    .collect(),
            })
        };

        let url = self.api_url("sendMessage");
        let request = SendMessageRequest {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            parse_mode: formatted.then(|| "MarkdownV2".to_string()),
            reply_markup,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Api(format!(
                "Telegram API error: {}",
                response.status()
            )));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| TransportError::Parse(e.to_string()))?;

        Ok(data.result.message_id.to_string())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), TransportError> {
        #[derive(Serialize)]
        struct AnswerRequest {
            callback_query_id: String,
            text: Option<String>,
        }

        let url = self.api_url("answerCallbackQuery");
        let request = AnswerRequest {
            callback_query_id: callback_id.to_string(),
            text: text.map(|s| s.to_string()),
        };

        let _response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(())
    }

    fn info(&self) -> TransportInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_actions_map_to_wire_fields() {
        let url_btn = InlineKeyboardButton::from(&Button::url("Go", "https://example.com"));
        assert_eq!(url_btn.url.as_deref(), Some("https://example.com"));
        assert!(url_btn.web_app.is_none());

        let app_btn = InlineKeyboardButton::from(&Button::launch("Open", "https://app.example.com"));
        assert!(app_btn.url.is_none());
        assert_eq!(
            app_btn.web_app.as_ref().map(|w| w.url.as_str()),
            Some("https://app.example.com")
        );

        let cb_btn = InlineKeyboardButton::from(&Button::callback("Pick", "lang_ru"));
        assert_eq!(cb_btn.callback_data.as_deref(), Some("lang_ru"));
    }

    #[test]
    fn wire_user_converts_to_sender() {
        let user = User {
            id: 7,
            username: Some("ana_dev".to_string()),
            first_name: Some("Ana".to_string()),
            last_name: None,
        };
        let sender = TelegramTransport::sender_from(&user);
        assert_eq!(sender.id, "7");
        assert_eq!(sender.display_name(), "Ana");
    }

    #[test]
    fn next_offset_is_one_past_newest() {
        let updates = vec![
            Update {
                update_id: 10,
                message: None,
                callback_query: None,
            },
            Update {
                update_id: 12,
                message: None,
                callback_query: None,
            },
        ];
        assert_eq!(TelegramTransport::get_next_offset(&updates), 13);
        assert_eq!(TelegramTransport::get_next_offset(&[]), 0);
    }
}
