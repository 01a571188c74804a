//! Configuration management
//!
//! Read once at startup from a YAML file and/or environment variables.
//! Never hot-reloaded.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub launcher: LauncherConfig,
    pub adapters: AdaptersConfig,
    pub health: HealthConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

/// The launcher surface: greeting keyboard plus optional canned commands.
/// The three historical launcher variants differ only in these values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LauncherConfig {
    /// `/start` reply text; `{name}` is replaced with the sender's name
    pub greeting: String,
    /// One row of language-selection link buttons (may be empty)
    pub language_buttons: Vec<LinkButtonConfig>,
    /// Optional mini-app launch button, rendered as its own row
    pub launch_button: Option<LinkButtonConfig>,
    /// Canned `/help` text; the command is registered only when present
    pub help_text: Option<String>,
    /// Canned `/about` text; the command is registered only when present
    pub about_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinkButtonConfig {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub telegram: Option<TelegramConfig>,
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TelegramConfig {
    pub enabled: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct HealthConfig {
    pub enabled: bool,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "launchpad-bot".to_string(),
                prefix: "/".to_string(),
            },
            launcher: LauncherConfig {
                greeting: "\u{1F30D} Hi {name}! Choose your language:".to_string(),
                language_buttons: vec![
                    LinkButtonConfig {
                        label: "\u{1F1F7}\u{1F1FA} \u{0420}\u{0443}\u{0441}\u{0441}\u{043A}\u{0438}\u{0439}".to_string(),
                        url: "https://t.me/your_group_ru".to_string(),
                    },
                    LinkButtonConfig {
                        label: "\u{1F1EC}\u{1F1E7} English".to_string(),
                        url: "https://t.me/your_group_en".to_string(),
                    },
                ],
                launch_button: None,
                help_text: Some(
                    "Send /start to get the launcher keyboard.\n/about - what this bot is"
                        .to_string(),
                ),
                about_text: Some(
                    "A small launcher bot: it hands out links and opens the mini-app."
                        .to_string(),
                ),
            },
            adapters: AdaptersConfig {
                telegram: Some(TelegramConfig {
                    enabled: false,
                    token: None,
                }),
                console: Some(ConsoleConfig { enabled: true }),
            },
            health: HealthConfig {
                enabled: true,
                port: 10000,
            },
            rate_limit: RateLimitConfig {
                max_requests: 10,
                window_seconds: 60,
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();

        if let Ok(token) = std::env::var("BOT_TOKEN") {
            if let Some(ref mut tg) = config.adapters.telegram {
                tg.token = Some(token);
                tg.enabled = true;
            }
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            config.bot.prefix = prefix;
        }

        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                config.health.port = port;
            }
        }

        if let Ok(url) = std::env::var("LAUNCH_URL") {
            config.launcher.launch_button = Some(LinkButtonConfig {
                label: "\u{1F680} Open mini-app".to_string(),
                url,
            });
        }

        config
    }

    /// The bot credential, if configured. The Telegram adapter refuses to
    /// start without one; see `validate_for_telegram`.
    pub fn telegram_token(&self) -> Option<String> {
        self.adapters
            .telegram
            .as_ref()
            .filter(|t| t.enabled)
            .and_then(|t| t.token.clone())
    }

    /// Fatal startup check: a Telegram run needs a credential.
    pub fn validate_for_telegram(&self) -> Result<(), ConfigError> {
        match self.adapters.telegram {
            Some(ref tg) if tg.enabled && tg.token.is_none() => Err(ConfigError::MissingField(
                "adapters.telegram.token".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
