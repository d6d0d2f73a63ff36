//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands change state, queries read it; both go through the handlers.

pub mod handlers;
mod state;

pub use state::GovernanceState;
