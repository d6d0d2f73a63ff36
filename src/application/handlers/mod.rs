//! Application handlers.
//!
//! One command or query handler per operation, grouped by workflow. Handlers
//! hold `Arc<dyn Port>` and take the current time explicitly.

pub mod chores;
pub mod hearts;
pub mod houses;
pub mod polls;
pub mod proposals;
mod sweep;

pub use sweep::{RunGovernanceSweepCommand, RunGovernanceSweepHandler, SweepSummary};
