//! Dispatch integration tests
//! Run with: cargo test --test dispatch_test

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;

use launchpad_bot::application::errors::TransportError;
use launchpad_bot::application::messaging::MessageParser;
use launchpad_bot::application::services::{CommandRouter, DispatchOutcome, SessionStats};
use launchpad_bot::domain::entities::{Button, Command, ReplyTemplate, Sender};
use launchpad_bot::domain::traits::{Transport, TransportInfo};

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

/// One captured send call
#[derive(Debug, Clone)]
struct SentMessage {
    chat_id: String,
    text: String,
    button_labels: Vec<Vec<String>>,
    formatted: bool,
}

/// Transport double that records every send and can be told to fail
/// the first N attempts.
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<SentMessage>>,
    fail_next: AtomicU32,
}

impl RecordingTransport {
    fn new() -> Self {
        Self::default()
    }

    fn failing(times: u32) -> Self {
        let transport = Self::default();
        transport.fail_next.store(times, Ordering::SeqCst);
        transport
    }

    fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: &[Vec<Button>],
        formatted: bool,
    ) -> Result<String, TransportError> {
        self.sent.lock().unwrap().push(SentMessage {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            button_labels: keyboard
                .iter()
                .map(|row| row.iter().map(|b| b.label.clone()).collect())
                .collect(),
            formatted,
        });

        let remaining = self.fail_next.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_next.store(remaining - 1, Ordering::SeqCst);
            return Err(TransportError::Api("simulated send failure".to_string()));
        }
        Ok("msg_1".to_string())
    }

    async fn answer_callback(
        &self,
        _callback_id: &str,
        _text: Option<&str>,
    ) -> Result<(), TransportError> {
        Ok(())
    }

    fn info(&self) -> TransportInfo {
        TransportInfo {
            id: "test".to_string(),
            name: "test-bot".to_string(),
            username: "test_bot".to_string(),
        }
    }
}

fn launcher_router() -> CommandRouter {
    let stats = Arc::new(Mutex::new(SessionStats::new()));
    let mut router = CommandRouter::new(stats);

    let start = ReplyTemplate::new("Hi {name}! Choose:")
        .with_row(vec![
            Button::url("Russian", "https://t.me/group_ru"),
            Button::url("English", "https://t.me/group_en"),
        ]);
    router
        .register(Command::new("start", start).with_description("Open the launcher"))
        .unwrap();
    router
        .register(Command::new("help", ReplyTemplate::new("Canned help")))
        .unwrap();
    router
}

fn ana_message(text: &str) -> launchpad_bot::domain::entities::IncomingMessage {
    let parser = MessageParser::new("/");
    let sender = Sender::new("7").with_name("Ana", None::<String>);
    parser.parse("100", text, Some(sender))
}

#[tokio::test]
async fn start_sends_exactly_one_message_with_configured_keyboard() {
    ensure_init();
    let router = launcher_router();
    let transport = RecordingTransport::new();

    let outcome = router.dispatch(&ana_message("/start"), &transport).await;

    assert_eq!(outcome, DispatchOutcome::Replied);
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id, "100");
    assert!(sent[0].text.contains("Ana"));
    assert_eq!(
        sent[0].button_labels,
        vec![vec!["Russian".to_string(), "English".to_string()]]
    );
    assert!(sent[0].formatted);
}

#[tokio::test]
async fn unregistered_token_produces_zero_transport_calls() {
    let router = launcher_router();
    let transport = RecordingTransport::new();

    let outcome = router.dispatch(&ana_message("/unknown"), &transport).await;

    assert_eq!(outcome, DispatchOutcome::Ignored);
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn plain_text_produces_zero_transport_calls() {
    let router = launcher_router();
    let transport = RecordingTransport::new();

    let outcome = router.dispatch(&ana_message("hello"), &transport).await;

    assert_eq!(outcome, DispatchOutcome::Ignored);
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn failed_send_gets_exactly_one_plain_fallback() {
    ensure_init();
    let router = launcher_router();
    let transport = RecordingTransport::failing(1);

    let outcome = router.dispatch(&ana_message("/start"), &transport).await;

    assert_eq!(outcome, DispatchOutcome::RepliedPlain);
    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].formatted);
    assert!(!sent[1].formatted);
    // Keyboard survives the fallback; only formatting is stripped
    assert_eq!(sent[0].button_labels, sent[1].button_labels);
}

#[tokio::test]
async fn persistent_failure_drops_after_fallback() {
    let router = launcher_router();
    let transport = RecordingTransport::failing(2);

    let outcome = router.dispatch(&ana_message("/start"), &transport).await;

    assert_eq!(outcome, DispatchOutcome::Dropped);
    assert_eq!(transport.sent().len(), 2);
}

#[tokio::test]
async fn bot_suffixed_command_still_dispatches() {
    let router = launcher_router();
    let transport = RecordingTransport::new();

    let outcome = router
        .dispatch(&ana_message("/start@LaunchpadBot"), &transport)
        .await;

    assert_eq!(outcome, DispatchOutcome::Replied);
    assert_eq!(transport.sent().len(), 1);
}

#[tokio::test]
async fn dispatch_tracks_distinct_users_and_daily_reset() {
    let router = launcher_router();
    let transport = RecordingTransport::new();
    let parser = MessageParser::new("/");

    for id in ["1", "2", "3", "2"] {
        let sender = Sender::new(id).with_name("User", None::<String>);
        let msg = parser.parse("chat", "/start", Some(sender));
        router.dispatch(&msg, &transport).await;
    }

    let stats = router.stats();
    {
        let guard = stats.lock().unwrap();
        assert_eq!(guard.total_users(), 3);
        assert_eq!(guard.daily_active_users(), 3);
        assert_eq!(guard.command_count("start"), 4);
    }

    stats.lock().unwrap().reset_daily();

    let guard = stats.lock().unwrap();
    assert_eq!(guard.daily_active_users(), 0);
    assert_eq!(guard.total_users(), 3);
}

#[tokio::test]
async fn canned_help_has_no_keyboard() {
    let router = launcher_router();
    let transport = RecordingTransport::new();

    router.dispatch(&ana_message("/help"), &transport).await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "Canned help");
    assert!(sent[0].button_labels.is_empty());
}
