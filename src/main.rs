use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::{Parser, Subcommand};

use launchpad_bot::application::errors::RouterError;
use launchpad_bot::application::messaging::{MessageParser, RateLimiter};
use launchpad_bot::application::services::{CommandRouter, SessionStats};
use launchpad_bot::application::AppContext;
use launchpad_bot::domain::entities::{Button, Command, IncomingMessage, ReplyTemplate};
use launchpad_bot::domain::traits::Transport;
use launchpad_bot::infrastructure::adapters::console::ConsoleTransport;
use launchpad_bot::infrastructure::adapters::telegram::TelegramTransport;
use launchpad_bot::infrastructure::config::Config;
use launchpad_bot::infrastructure::health;

/// Seconds Telegram holds a getUpdates long poll open
const POLL_TIMEOUT_SECONDS: i64 = 30;

/// Backoff after a failed poll
const POLL_RETRY: Duration = Duration::from_secs(5);

/// Fixed interval for clearing the daily-active user set
const DAILY_RESET: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Parser)]
#[command(name = "launchpad-bot")]
#[command(about = "A minimal Telegram launcher bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_bot(cli.config, cli.token);
        }
        Commands::Version => {
            println!("launchpad-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn run_bot(config_path: String, token_override: Option<String>) {
    let mut config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };

    if let Some(token) = token_override {
        if let Some(ref mut tg) = config.adapters.telegram {
            tg.token = Some(token);
            tg.enabled = true;
        }
    }

    tracing::info!("Starting launchpad-bot: {}", config.bot.name);

    // Missing credential with the Telegram adapter enabled is fatal
    if let Err(e) = config.validate_for_telegram() {
        tracing::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let stats = Arc::new(Mutex::new(SessionStats::new()));
    let router = match build_router(&config, Arc::clone(&stats)) {
        Ok(router) => router,
        Err(e) => {
            tracing::error!("Command registration failed: {}", e);
            std::process::exit(1);
        }
    };

    let token = config.telegram_token();
    let ctx = Arc::new(AppContext::new(
        &config.bot.name,
        token.is_some(),
        config.launcher.launch_button.is_some(),
        stats,
    ));

    let rt = tokio::runtime::Runtime::new().expect("Failed to build tokio runtime");

    rt.block_on(async {
        let health_task = if config.health.enabled {
            let ctx = Arc::clone(&ctx);
            let port = config.health.port;
            Some(tokio::spawn(async move {
                if let Err(e) = health::serve(ctx, port).await {
                    tracing::error!("Status endpoint failed: {}", e);
                }
            }))
        } else {
            None
        };

        let reset_task = {
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(DAILY_RESET);
                interval.tick().await; // first tick fires immediately
                loop {
                    interval.tick().await;
                    if let Ok(mut stats) = ctx.stats.lock() {
                        stats.reset_daily();
                    }
                    tracing::info!("Daily active-user window reset");
                }
            })
        };

        if let Some(token) = token {
            let mut transport = TelegramTransport::new(token);
            run_telegram_bot(&mut transport, &router, &config).await;
        } else {
            tracing::info!("No bot token configured, running console adapter (dev mode)");
            let transport = ConsoleTransport::new();
            run_console_bot(&transport, &router, &config).await;
        }

        reset_task.abort();
        if let Some(task) = health_task {
            task.abort();
        }
    });
}

/// Build the command set from the launcher config. The three historical
/// launcher variants collapse into this one table.
fn build_router(config: &Config, stats: Arc<Mutex<SessionStats>>) -> Result<CommandRouter, RouterError> {
    let launcher = &config.launcher;

    let mut start = ReplyTemplate::new(&launcher.greeting);
    let language_row: Vec<Button> = launcher
        .language_buttons
        .iter()
        .map(|b| Button::url(&b.label, &b.url))
        .collect();
    if !language_row.is_empty() {
        start = start.with_row(language_row);
    }
    if let Some(ref launch) = launcher.launch_button {
        start = start.with_row(vec![Button::launch(&launch.label, &launch.url)]);
    }

    let mut router = CommandRouter::new(stats);
    router.register(Command::new("start", start).with_description("Open the launcher"))?;

    if let Some(ref text) = launcher.help_text {
        router.register(
            Command::new("help", ReplyTemplate::new(text)).with_description("Show help"),
        )?;
    }
    if let Some(ref text) = launcher.about_text {
        router.register(
            Command::new("about", ReplyTemplate::new(text)).with_description("About this bot"),
        )?;
    }

    Ok(router)
}

async fn run_telegram_bot(transport: &mut TelegramTransport, router: &CommandRouter, config: &Config) {
    if let Err(e) = transport.fetch_info().await {
        tracing::error!("Failed to fetch bot info: {}", e);
        return;
    }

    let transport = &*transport;
    let info = transport.info();
    tracing::info!("Bot started: @{}", info.username);

    if let Err(e) = transport.register_commands(&router.command_list()).await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    let parser = MessageParser::new(&config.bot.prefix);
    let limiter = RateLimiter::new(
        config.rate_limit.max_requests,
        Duration::from_secs(config.rate_limit.window_seconds),
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut offset: i64 = 0;

    tracing::info!("Starting update loop...");

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping update loop");
                break;
            }
            polled = transport.get_updates(offset, POLL_TIMEOUT_SECONDS) => match polled {
                Ok(updates) => {
                    for update in &updates {
                        if let Some(msg) = &update.message {
                            let Some(text) = &msg.text else { continue };
                            let sender = msg.from.as_ref().map(TelegramTransport::sender_from);
                            let incoming = parser
                                .parse(msg.chat.id.to_string(), text.as_str(), sender)
                                .with_platform("telegram");
                            handle_update(&incoming, router, &limiter, transport).await;
                        }

                        // Ack callback presses so clients stop their spinner
                        if let Some(cb) = &update.callback_query {
                            if let Err(e) = transport.answer_callback(&cb.id, None).await {
                                tracing::warn!("Failed to answer callback: {}", e);
                            }
                        }
                    }
                    offset = TelegramTransport::get_next_offset(&updates).max(offset);
                }
                Err(e) => {
                    tracing::error!("Failed to get updates: {}", e);
                    tokio::time::sleep(POLL_RETRY).await;
                }
            }
        }
    }
}

async fn handle_update(
    incoming: &IncomingMessage,
    router: &CommandRouter,
    limiter: &RateLimiter,
    transport: &dyn Transport,
) {
    if !incoming.content.is_command() {
        return;
    }

    let key = incoming
        .sender
        .as_ref()
        .map(|s| s.id.clone())
        .unwrap_or_else(|| incoming.chat_id.clone());
    if !limiter.check(&key) {
        tracing::warn!("[{}] Rate limited, dropping update", key);
        return;
    }

    let outcome = router.dispatch(incoming, transport).await;
    tracing::debug!("[{}] Dispatch outcome: {:?}", incoming.chat_id, outcome);
}

async fn run_console_bot(transport: &ConsoleTransport, router: &CommandRouter, config: &Config) {
    let info = transport.info();
    tracing::info!("Bot started: @{}", info.username);

    let parser = MessageParser::new(&config.bot.prefix);

    loop {
        let Some(input) = transport.read_line("> ").await else {
            break;
        };
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        let incoming = parser.parse("console", input, None).with_platform("console");
        router.dispatch(&incoming, transport).await;
    }
}

fn init_config() {
    let config = Config::default();
    match serde_yaml::to_string(&config) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => {
            tracing::error!("Failed to serialize default config: {}", e);
        }
    }
}
