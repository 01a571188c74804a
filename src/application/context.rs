//! Application context - explicit process-wide state
//!
//! Constructed once at startup and passed to the router loop and the
//! health endpoint; there are no module-level singletons.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::application::services::SessionStats;

pub struct AppContext {
    pub bot_name: String,
    pub token_configured: bool,
    pub launch_url_configured: bool,
    pub started_at: Instant,
    pub stats: Arc<Mutex<SessionStats>>,
}

impl AppContext {
    pub fn new(
        bot_name: impl Into<String>,
        token_configured: bool,
        launch_url_configured: bool,
        stats: Arc<Mutex<SessionStats>>,
    ) -> Self {
        Self {
            bot_name: bot_name.into(),
            token_configured,
            launch_url_configured,
            started_at: Instant::now(),
            stats,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
