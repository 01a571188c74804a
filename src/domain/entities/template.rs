use super::Sender;

/// What tapping a keyboard button does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Open an external link
    Url(String),
    /// Open a Telegram mini-app
    LaunchApp(String),
    /// Send callback data back to the bot
    Callback(String),
}

/// A single inline keyboard button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

impl Button {
    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Url(url.into()),
        }
    }

    pub fn launch(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::LaunchApp(target.into()),
        }
    }

    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }
}

/// Placeholder in template text replaced with the sender's display name.
const NAME_PLACEHOLDER: &str = "{name}";

/// What the sender is called when a template uses `{name}` but the
/// platform gave us no sender.
const ANONYMOUS_NAME: &str = "there";

/// A canned reply: text body plus zero-or-more keyboard rows.
/// Defined once at startup, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTemplate {
    text: String,
    keyboard: Vec<Vec<Button>>,
}

impl ReplyTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: Vec<Button>) -> Self {
        self.keyboard.push(row);
        self
    }

    /// Render the text body, substituting the sender's display name.
    pub fn render(&self, sender: Option<&Sender>) -> String {
        if !self.text.contains(NAME_PLACEHOLDER) {
            return self.text.clone();
        }
        let name = sender
            .map(Sender::display_name)
            .unwrap_or_else(|| ANONYMOUS_NAME.to_string());
        self.text.replace(NAME_PLACEHOLDER, &name)
    }

    pub fn keyboard(&self) -> &[Vec<Button>] {
        &self.keyboard
    }

    pub fn has_keyboard(&self) -> bool {
        !self.keyboard.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_sender_name() {
        let template = ReplyTemplate::new("Welcome, {name}!");
        let sender = Sender::new("1").with_name("Ana", None::<String>);
        assert_eq!(template.render(Some(&sender)), "Welcome, Ana!");
    }

    #[test]
    fn render_without_sender_uses_fallback() {
        let template = ReplyTemplate::new("Welcome, {name}!");
        assert_eq!(template.render(None), "Welcome, there!");
    }

    #[test]
    fn render_without_placeholder_is_verbatim() {
        let template = ReplyTemplate::new("Canned help text");
        let sender = Sender::new("1").with_name("Ana", None::<String>);
        assert_eq!(template.render(Some(&sender)), "Canned help text");
    }

    #[test]
    fn keyboard_rows_keep_configured_order() {
        let template = ReplyTemplate::new("Pick one:")
            .with_row(vec![
                Button::url("Russian", "https://t.me/group_ru"),
                Button::url("English", "https://t.me/group_en"),
            ])
            .with_row(vec![Button::launch("Open app", "https://app.example.com")]);

        assert!(template.has_keyboard());
        assert_eq!(template.keyboard().len(), 2);
        assert_eq!(template.keyboard()[0][0].label, "Russian");
        assert_eq!(template.keyboard()[0][1].label, "English");
        assert_eq!(
            template.keyboard()[1][0].action,
            ButtonAction::LaunchApp("https://app.example.com".to_string())
        );
    }
}
