//! Chores - ranking, valuation, claims, breaks, penalties, and proposals.
//!
//! Everything here is pure: the application layer loads records through the
//! ports, passes an explicit `now`, and persists what these types produce.

mod breaks;
mod chore;
mod claim;
mod errors;
mod gift;
mod penalty;
mod preference;
mod proposal;
mod ranking;
mod valuation;

pub use breaks::{covered_duration, merge_intervals, working_percentage, ChoreBreak, Interval};
pub use chore::Chore;
pub use claim::{ChoreClaim, ClaimStatus};
pub use errors::ChoreError;
pub use gift::ChoreGift;
pub use penalty::PenaltyPolicy;
pub use preference::ChorePreference;
pub use proposal::{proposal_quorum, ChoreProposal, ProposalChange};
pub use ranking::{ChoreRanker, ChoreRanking, PairwiseMatrix};
pub use valuation::{interval_scalar, ChoreValue, ValuationParams, ValuationSnapshot};
