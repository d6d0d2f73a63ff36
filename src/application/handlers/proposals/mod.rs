//! Chore proposal handlers.
//!
//! ## Commands
//! - Propose creating, editing, or removing a chore
//! - Resolve one or all closed proposals
//!
//! ## Queries
//! - A proposal by id

mod create_proposal;
mod resolve_proposal;

pub use create_proposal::{CreateChoreProposalCommand, CreateChoreProposalHandler};
pub use resolve_proposal::{
    GetChoreProposalHandler, GetChoreProposalQuery, ProposalOutcome, ResolveChoreProposalCommand,
    ResolveChoreProposalHandler, ResolveChoreProposalsCommand, ResolveChoreProposalsHandler,
};
