use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ChallengeId, HeartId, HouseId, ResidentId, Timestamp, ValidationError};

/// Why a hearts entry was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeartKind {
    /// Baseline granted when a resident joins.
    Initial,
    /// Debit applied to the loser of a challenge.
    Challenge,
    /// Monthly chore penalty.
    Penalty,
    /// Any other adjustment.
    Manual,
}

impl HeartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeartKind::Initial => "initial",
            HeartKind::Challenge => "challenge",
            HeartKind::Penalty => "penalty",
            HeartKind::Manual => "manual",
        }
    }
}

impl fmt::Display for HeartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeartKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(HeartKind::Initial),
            "challenge" => Ok(HeartKind::Challenge),
            "penalty" => Ok(HeartKind::Penalty),
            "manual" => Ok(HeartKind::Manual),
            other => Err(ValidationError::invalid_format(
                "heart_kind",
                format!("unknown kind '{}'", other),
            )),
        }
    }
}

/// One signed entry in the hearts ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heart {
    pub id: HeartId,
    pub house_id: HouseId,
    pub resident_id: ResidentId,
    pub value: f64,
    pub kind: HeartKind,
    pub challenge_id: Option<ChallengeId>,
    pub generated_at: Timestamp,
}

impl Heart {
    pub fn new(
        house_id: HouseId,
        resident_id: ResidentId,
        value: f64,
        kind: HeartKind,
        generated_at: Timestamp,
    ) -> Self {
        Self {
            id: HeartId::new(),
            house_id,
            resident_id,
            value,
            kind,
            challenge_id: None,
            generated_at,
        }
    }

    pub fn for_challenge(mut self, challenge_id: ChallengeId) -> Self {
        self.challenge_id = Some(challenge_id);
        self
    }
}

/// A resident's running hearts total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartsBoardEntry {
    pub resident_id: ResidentId,
    pub hearts: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [
            HeartKind::Initial,
            HeartKind::Challenge,
            HeartKind::Penalty,
            HeartKind::Manual,
        ] {
            assert_eq!(kind.as_str().parse::<HeartKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!("bonus".parse::<HeartKind>().is_err());
    }

    #[test]
    fn for_challenge_links_entry() {
        let challenge_id = ChallengeId::new();
        let heart = Heart::new(
            HouseId::new("T1").unwrap(),
            ResidentId::new("U1").unwrap(),
            -1.0,
            HeartKind::Challenge,
            Timestamp::now(),
        )
        .for_challenge(challenge_id);
        assert_eq!(heart.challenge_id, Some(challenge_id));
    }
}
