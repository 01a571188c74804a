//! In-memory session statistics
//!
//! Created at process start, daily set cleared on a fixed timer, discarded
//! at process exit. No persistence.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

/// Users seen and commands served since startup, plus the set of users
/// active in the current 24-hour window.
#[derive(Debug, Default)]
pub struct SessionStats {
    total_users: HashSet<String>,
    daily_active: HashSet<String>,
    command_counts: HashMap<String, u64>,
}

/// Point-in-time copy of the counters, shaped for the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub total_users: usize,
    pub daily_active_users: usize,
    pub commands_served: HashMap<String, u64>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one dispatched command invocation.
    pub fn record(&mut self, user_id: Option<&str>, token: &str) {
        if let Some(id) = user_id {
            self.total_users.insert(id.to_string());
            self.daily_active.insert(id.to_string());
        }
        *self.command_counts.entry(token.to_string()).or_insert(0) += 1;
    }

    pub fn total_users(&self) -> usize {
        self.total_users.len()
    }

    pub fn daily_active_users(&self) -> usize {
        self.daily_active.len()
    }

    pub fn command_count(&self, token: &str) -> u64 {
        self.command_counts.get(token).copied().unwrap_or(0)
    }

    /// Clear the 24-hour window. Totals are untouched.
    pub fn reset_daily(&mut self) {
        self.daily_active.clear();
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_users: self.total_users.len(),
            daily_active_users: self.daily_active.len(),
            commands_served: self.command_counts.clone(),
        }
    }
}
