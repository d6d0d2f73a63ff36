//! Hearts handlers.
//!
//! ## Commands
//! - Generate hearts, grant a new resident's baseline
//! - Initiate a challenge, resolve one or all closed challenges
//!
//! ## Queries
//! - A resident's hearts, the house board, a challenge

mod generate_hearts;
mod get_hearts;
mod initiate_challenge;
mod resolve_challenge;

pub use generate_hearts::{
    GenerateHeartsCommand, GenerateHeartsHandler, InitialiseResidentCommand,
    InitialiseResidentHandler,
};
pub use get_hearts::{
    GetChallengeHandler, GetChallengeQuery, GetHouseHeartsHandler, GetHouseHeartsQuery,
    GetResidentHeartsHandler, GetResidentHeartsQuery,
};
pub use initiate_challenge::{InitiateChallengeCommand, InitiateChallengeHandler};
pub use resolve_challenge::{
    ResolveChallengeCommand, ResolveChallengeHandler, ResolveChallengesCommand,
    ResolveChallengesHandler,
};
