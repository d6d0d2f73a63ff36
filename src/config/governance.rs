//! Governance configuration - the house rules the engine runs on.
//!
//! Every constant the poll, hearts, and chore engines consume lives here and
//! is handed to handlers explicitly; nothing below the config layer carries
//! its own defaults.

use chrono::Duration;
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::chores::{ChoreRanker, PenaltyPolicy};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GovernanceConfig {
    /// Points each working resident owes per month
    #[serde(default = "default_points_per_resident")]
    pub points_per_resident: f64,

    /// Multiplier on the monthly budget
    #[serde(default = "default_inflation_factor")]
    pub inflation_factor: f64,

    /// Hours after the start of a month before penalties are applied
    #[serde(default = "default_penalty_delay_hours")]
    pub penalty_delay_hours: i64,

    /// Claim poll length in hours
    #[serde(default = "default_chore_poll_hours")]
    pub chore_poll_hours: i64,

    /// Chore proposal poll length in hours
    #[serde(default = "default_proposal_poll_hours")]
    pub proposal_poll_hours: i64,

    /// Hearts challenge poll length in hours
    #[serde(default = "default_challenge_poll_hours")]
    pub challenge_poll_hours: i64,

    /// Affirmative votes needed to approve a claim
    #[serde(default = "default_claim_min_votes")]
    pub claim_min_votes: u32,

    /// Share of active residents that must approve a proposal
    #[serde(default = "default_proposal_min_pct")]
    pub proposal_min_pct: f64,

    /// Affirmative votes needed to uphold a challenge
    #[serde(default = "default_challenge_min_votes")]
    pub challenge_min_votes: u32,

    /// Points of shortfall per penalty step
    #[serde(default = "default_penalty_increment")]
    pub penalty_increment: f64,

    /// Hearts deducted per penalty step
    #[serde(default = "default_penalty_hearts_per_increment")]
    pub penalty_hearts_per_increment: f64,

    /// Hearts granted to a new resident
    #[serde(default = "default_hearts_baseline")]
    pub hearts_baseline: f64,

    /// Share of each ranking step that follows preferences
    #[serde(default = "default_ranking_damping")]
    pub ranking_damping: f64,
}

impl GovernanceConfig {
    pub fn chore_poll_duration(&self) -> Duration {
        Duration::hours(self.chore_poll_hours)
    }

    pub fn proposal_poll_duration(&self) -> Duration {
        Duration::hours(self.proposal_poll_hours)
    }

    pub fn challenge_poll_duration(&self) -> Duration {
        Duration::hours(self.challenge_poll_hours)
    }

    pub fn penalty_delay(&self) -> Duration {
        Duration::hours(self.penalty_delay_hours)
    }

    pub fn penalty_policy(&self) -> PenaltyPolicy {
        PenaltyPolicy {
            points_per_resident: self.points_per_resident,
            penalty_increment: self.penalty_increment,
            hearts_per_increment: self.penalty_hearts_per_increment,
            penalty_delay: self.penalty_delay(),
        }
    }

    pub fn ranker(&self) -> ChoreRanker {
        ChoreRanker::new(self.ranking_damping)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let positive = [
            ("points_per_resident", self.points_per_resident),
            ("inflation_factor", self.inflation_factor),
            ("penalty_increment", self.penalty_increment),
            ("chore_poll_hours", self.chore_poll_hours as f64),
            ("proposal_poll_hours", self.proposal_poll_hours as f64),
            ("challenge_poll_hours", self.challenge_poll_hours as f64),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(ValidationError::NotPositive(name));
        }
        if self.penalty_delay_hours < 0 {
            return Err(ValidationError::NotPositive("penalty_delay_hours"));
        }
        for (name, value) in [
            ("proposal_min_pct", self.proposal_min_pct),
            ("ranking_damping", self.ranking_damping),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ValidationError::NotAFraction(name));
            }
        }
        Ok(())
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            points_per_resident: default_points_per_resident(),
            inflation_factor: default_inflation_factor(),
            penalty_delay_hours: default_penalty_delay_hours(),
            chore_poll_hours: default_chore_poll_hours(),
            proposal_poll_hours: default_proposal_poll_hours(),
            challenge_poll_hours: default_challenge_poll_hours(),
            claim_min_votes: default_claim_min_votes(),
            proposal_min_pct: default_proposal_min_pct(),
            challenge_min_votes: default_challenge_min_votes(),
            penalty_increment: default_penalty_increment(),
            penalty_hearts_per_increment: default_penalty_hearts_per_increment(),
            hearts_baseline: default_hearts_baseline(),
            ranking_damping: default_ranking_damping(),
        }
    }
}

fn default_points_per_resident() -> f64 {
    100.0
}

fn default_inflation_factor() -> f64 {
    1.0
}

fn default_penalty_delay_hours() -> i64 {
    72
}

fn default_chore_poll_hours() -> i64 {
    24
}

fn default_proposal_poll_hours() -> i64 {
    48
}

fn default_challenge_poll_hours() -> i64 {
    72
}

fn default_claim_min_votes() -> u32 {
    2
}

fn default_proposal_min_pct() -> f64 {
    0.4
}

fn default_challenge_min_votes() -> u32 {
    4
}

fn default_penalty_increment() -> f64 {
    10.0
}

fn default_penalty_hearts_per_increment() -> f64 {
    0.5
}

fn default_hearts_baseline() -> f64 {
    5.0
}

fn default_ranking_damping() -> f64 {
    0.99
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_governance_defaults_are_valid() {
        let config = GovernanceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.claim_min_votes, 2);
        assert_eq!(config.challenge_min_votes, 4);
        assert_eq!(config.chore_poll_duration(), Duration::hours(24));
    }

    #[test]
    fn test_penalty_policy_carries_settings() {
        let policy = GovernanceConfig::default().penalty_policy();
        assert_eq!(policy.points_per_resident, 100.0);
        assert_eq!(policy.penalty_delay, Duration::hours(72));
    }

    #[test]
    fn test_rejects_zero_points() {
        let config = GovernanceConfig {
            points_per_resident: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::NotPositive("points_per_resident"))
        );
    }

    #[test]
    fn test_rejects_zero_poll_length() {
        let config = GovernanceConfig {
            proposal_poll_hours: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::NotPositive("proposal_poll_hours"))
        );
    }

    #[test]
    fn test_rejects_fraction_out_of_range() {
        let config = GovernanceConfig {
            proposal_min_pct: 1.5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::NotAFraction("proposal_min_pct")));

        let config = GovernanceConfig {
            ranking_damping: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::NotAFraction("ranking_damping")));
    }
}
