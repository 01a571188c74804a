use async_trait::async_trait;

use crate::application::errors::TransportError;
use crate::domain::entities::Button;

/// Transport trait - the abstract send boundary to the messaging platform.
///
/// The router never talks to a platform library directly; it hands rendered
/// text and keyboard rows to an implementation of this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a message to a chat. `keyboard` may be empty. When `formatted`
    /// is true the implementation may request platform rich formatting;
    /// when false it must send plain text. Returns the platform message id.
    async fn send(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: &[Vec<Button>],
        formatted: bool,
    ) -> Result<String, TransportError>;

    /// Acknowledge a callback query so the client stops its spinner
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), TransportError>;

    /// Get transport info
    fn info(&self) -> TransportInfo;
}

/// Identity of the connected bot account
#[derive(Debug, Clone)]
pub struct TransportInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
