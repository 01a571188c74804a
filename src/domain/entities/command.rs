use std::collections::HashMap;

use super::ReplyTemplate;
use crate::application::errors::RouterError;

/// A bot command: token plus the canned reply it produces.
/// The token is stored without the leading slash.
pub struct Command {
    pub token: String,
    pub description: Option<String>,
    pub template: ReplyTemplate,
}

impl Command {
    pub fn new(token: impl Into<String>, template: ReplyTemplate) -> Self {
        Self {
            token: token.into(),
            description: None,
            template,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn matches(&self, input: &str) -> bool {
        self.token.eq_ignore_ascii_case(input)
    }
}

/// Command registry. Tokens are unique; registering a duplicate is a
/// startup bug, not a runtime condition.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) -> Result<(), RouterError> {
        let key = command.token.to_ascii_lowercase();
        if self.commands.contains_key(&key) {
            return Err(RouterError::DuplicateCommand(command.token));
        }
        self.commands.insert(key, command);
        Ok(())
    }

    pub fn get(&self, token: &str) -> Option<&Command> {
        self.commands.get(&token.to_ascii_lowercase())
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.values().find(|c| c.matches(input))
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_duplicate_token() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::new("start", ReplyTemplate::new("hi")))
            .unwrap();

        let err = registry
            .register(Command::new("start", ReplyTemplate::new("hi again")))
            .unwrap_err();
        assert!(matches!(err, RouterError::DuplicateCommand(t) if t == "start"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_check_is_case_insensitive() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::new("start", ReplyTemplate::new("hi")))
            .unwrap();
        assert!(registry
            .register(Command::new("Start", ReplyTemplate::new("hi")))
            .is_err());
    }

    #[test]
    fn lookup_ignores_case() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::new("help", ReplyTemplate::new("help text")))
            .unwrap();
        assert!(registry.get("HELP").is_some());
        assert!(registry.find("Help").is_some());
        assert!(registry.get("about").is_none());
    }
}
