//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - Mutex-backed adapters for tests and local runs
//! - `postgres` - PostgreSQL persistence via sqlx

pub mod memory;
pub mod postgres;
