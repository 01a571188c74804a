//! Command router - maps incoming command tokens to canned replies and
//! dispatches them through the transport boundary.

use std::sync::{Arc, Mutex};

use crate::application::errors::RouterError;
use crate::application::services::stats::SessionStats;
use crate::domain::entities::{Command, CommandRegistry, Content, IncomingMessage};
use crate::domain::traits::Transport;

/// What happened to one inbound update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not a registered command; zero transport calls
    Ignored,
    /// Reply delivered on the first attempt
    Replied,
    /// First send failed; the plain-text fallback was delivered
    RepliedPlain,
    /// Both attempts failed; logged and dropped
    Dropped,
}

/// Routes command tokens to registered replies. Commands are registered
/// once at startup; dispatch has no side effects outside the transport.
pub struct CommandRouter {
    registry: CommandRegistry,
    stats: Arc<Mutex<SessionStats>>,
}

impl CommandRouter {
    pub fn new(stats: Arc<Mutex<SessionStats>>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            stats,
        }
    }

    /// Register a command. Fails if the token is already taken.
    pub fn register(&mut self, command: Command) -> Result<(), RouterError> {
        tracing::debug!("Registering command /{}", command.token);
        self.registry.register(command)
    }

    /// Tokens and descriptions of every registered command, for
    /// `setMyCommands`-style platform registration.
    pub fn command_list(&self) -> Vec<(String, String)> {
        self.registry
            .all()
            .map(|c| {
                (
                    c.token.clone(),
                    c.description.clone().unwrap_or_default(),
                )
            })
            .collect()
    }

    /// Dispatch one incoming message.
    ///
    /// Non-command content and unrecognized tokens are ignored silently.
    /// On a match the template is rendered and sent; a failed send gets
    /// exactly one plain-text fallback attempt before the update is
    /// dropped. Transport failures never reach chat users.
    pub async fn dispatch(
        &self,
        message: &IncomingMessage,
        transport: &dyn Transport,
    ) -> DispatchOutcome {
        let Content::Command { token, args: _ } = &message.content else {
            return DispatchOutcome::Ignored;
        };

        let Some(command) = self.registry.find(token) else {
            tracing::debug!("[{}] Unrecognized token /{}, ignoring", message.chat_id, token);
            return DispatchOutcome::Ignored;
        };

        if let Ok(mut stats) = self.stats.lock() {
            stats.record(message.sender.as_ref().map(|s| s.id.as_str()), &command.token);
        }

        let text = command.template.render(message.sender.as_ref());
        let keyboard = command.template.keyboard();

        match transport.send(&message.chat_id, &text, keyboard, true).await {
            Ok(_) => DispatchOutcome::Replied,
            Err(first) => {
                tracing::warn!(
                    "[{}] Send failed for /{}: {}, retrying without formatting",
                    message.chat_id,
                    command.token,
                    first
                );
                match transport.send(&message.chat_id, &text, keyboard, false).await {
                    Ok(_) => DispatchOutcome::RepliedPlain,
                    Err(second) => {
                        tracing::error!(
                            "[{}] Fallback send failed for /{}: {}, dropping update",
                            message.chat_id,
                            command.token,
                            second
                        );
                        DispatchOutcome::Dropped
                    }
                }
            }
        }
    }

    pub fn stats(&self) -> Arc<Mutex<SessionStats>> {
        Arc::clone(&self.stats)
    }
}
