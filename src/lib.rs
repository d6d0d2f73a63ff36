//! Chore Wheel - household governance engine.
//!
//! Residents vote in time-boxed polls, keep each other honest with hearts
//! and challenges, and share chores through a monthly point budget split by
//! their pairwise preferences. Claims, proposals, and penalties are ratified
//! through polls and settled by a periodic sweep with an explicit `now`.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
