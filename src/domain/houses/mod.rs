//! Houses and their residents.
//!
//! A house is the tenant scope of every governance record. Residents carry
//! the activation and exemption timestamps that decide who counts as a
//! working resident and who may take part in challenges.

mod house;
mod resident;

pub use house::House;
pub use resident::Resident;
