//! Domain layer - household governance types and pure rules.
//!
//! No I/O happens here. Time is always passed in.

pub mod chores;
pub mod foundation;
pub mod hearts;
pub mod houses;
pub mod polls;
