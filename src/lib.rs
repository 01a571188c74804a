//! launchpad-bot - a minimal Telegram launcher bot
//!
//! One configurable launcher replaces a family of near-duplicate bots:
//! `/start` answers with an inline keyboard of static link buttons,
//! optional `/help` and `/about` answer with canned text, and a small
//! HTTP endpoint reports process status.

pub mod application;
pub mod domain;
pub mod infrastructure;
