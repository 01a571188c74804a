//! Console adapter for development/testing

use async_trait::async_trait;

use crate::application::errors::TransportError;
use crate::domain::entities::Button;
use crate::domain::traits::{Transport, TransportInfo};

/// Console transport for local development
pub struct ConsoleTransport {
    info: TransportInfo,
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self {
            info: TransportInfo {
                id: "console".to_string(),
                name: "launchpad-bot".to_string(),
                username: "console".to_string(),
            },
        }
    }

    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        use std::io::Write;
        print!("{}", prompt);
        std::io::stdout().flush().ok()?;
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).ok()?;
        Some(input.trim().to_string())
    }
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn send(
        &self,
        _chat_id: &str,
        text: &str,
        keyboard: &[Vec<Button>],
        _formatted: bool,
    ) -> Result<String, TransportError> {
        println!("[BOT] {}", text);
        for row in keyboard {
            let row_text: Vec<String> = row.iter().map(|b| b.label.clone()).collect();
            println!("  [Buttons] {}", row_text.join(" | "));
        }
        Ok("console_msg".to_string())
    }

    async fn answer_callback(
        &self,
        _callback_id: &str,
        _text: Option<&str>,
    ) -> Result<(), TransportError> {
        Ok(())
    }

    fn info(&self) -> TransportInfo {
        self.info.clone()
    }
}
