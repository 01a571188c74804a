//! Application services - Business logic orchestration

pub mod router;
pub mod stats;

pub use router::{CommandRouter, DispatchOutcome};
pub use stats::SessionStats;
