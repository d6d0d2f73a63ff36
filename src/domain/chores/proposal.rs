use serde::{Deserialize, Serialize};

use super::ChoreError;
use crate::domain::foundation::{
    ChoreId, ChoreProposalId, HouseId, Metadata, PollId, ResidentId, Timestamp,
};

/// A proposed addition, edit, or removal of a chore, ratified by poll.
///
/// `chore_id` targets an existing chore; without it the proposal matches
/// (or creates) a chore by `name`. `resolved_at` is the resolution marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreProposal {
    pub id: ChoreProposalId,
    pub house_id: HouseId,
    pub proposed_by: ResidentId,
    pub chore_id: Option<ChoreId>,
    pub name: Option<String>,
    pub metadata: Metadata,
    pub active: bool,
    pub poll_id: PollId,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

/// What a proposal asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalChange {
    pub chore_id: Option<ChoreId>,
    pub name: Option<String>,
    pub metadata: Metadata,
    pub active: bool,
}

impl ProposalChange {
    /// # Errors
    ///
    /// Returns `InvalidProposal` if neither a chore nor a name is given.
    pub fn validate(self) -> Result<Self, ChoreError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if self.chore_id.is_none() && name.is_none() {
            return Err(ChoreError::InvalidProposal(
                "a proposal needs a chore or a name".to_string(),
            ));
        }
        Ok(Self { name, ..self })
    }
}

impl ChoreProposal {
    pub fn new(
        house_id: HouseId,
        proposed_by: ResidentId,
        change: ProposalChange,
        poll_id: PollId,
        created_at: Timestamp,
    ) -> Result<Self, ChoreError> {
        let change = change.validate()?;
        Ok(Self {
            id: ChoreProposalId::new(),
            house_id,
            proposed_by,
            chore_id: change.chore_id,
            name: change.name,
            metadata: change.metadata,
            active: change.active,
            poll_id,
            created_at,
            resolved_at: None,
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}

/// Affirmative votes a proposal needs: `min_pct` of active residents, rounded up.
pub fn proposal_quorum(active_residents: usize, min_pct: f64) -> u32 {
    let raw = active_residents as f64 * min_pct;
    (raw - 1e-9).ceil().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(chore_id: Option<ChoreId>, name: Option<&str>) -> ProposalChange {
        ProposalChange {
            chore_id,
            name: name.map(String::from),
            metadata: Metadata::new(),
            active: true,
        }
    }

    fn propose(change: ProposalChange) -> Result<ChoreProposal, ChoreError> {
        ChoreProposal::new(
            HouseId::new("T1").unwrap(),
            ResidentId::new("U1").unwrap(),
            change,
            PollId::new(),
            Timestamp::now(),
        )
    }

    #[test]
    fn proposal_needs_chore_or_name() {
        assert!(matches!(propose(change(None, None)), Err(ChoreError::InvalidProposal(_))));
        assert!(matches!(propose(change(None, Some("  "))), Err(ChoreError::InvalidProposal(_))));
    }

    #[test]
    fn proposal_by_name_is_trimmed() {
        let p = propose(change(None, Some(" sweeping "))).unwrap();
        assert_eq!(p.name.as_deref(), Some("sweeping"));
        assert!(!p.is_resolved());
    }

    #[test]
    fn proposal_by_id_needs_no_name() {
        let id = ChoreId::new();
        let p = propose(change(Some(id), None)).unwrap();
        assert_eq!(p.chore_id, Some(id));
        assert!(p.name.is_none());
    }

    #[test]
    fn quorum_rounds_up() {
        assert_eq!(proposal_quorum(5, 0.4), 2);
        assert_eq!(proposal_quorum(4, 0.4), 2);
        assert_eq!(proposal_quorum(10, 0.4), 4);
        assert_eq!(proposal_quorum(1, 0.4), 1);
        assert_eq!(proposal_quorum(0, 0.4), 0);
    }
}
