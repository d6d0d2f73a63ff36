//! InitiateChallengeHandler - asks the house to take hearts from a resident.

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use crate::domain::foundation::{HouseId, ResidentId, Timestamp};
use crate::domain::hearts::{HeartChallenge, HeartError};
use crate::domain::polls::Poll;
use crate::ports::{HeartRepository, PollRepository, ResidentRepository};

#[derive(Debug, Clone)]
pub struct InitiateChallengeCommand {
    pub house_id: HouseId,
    pub challenger: ResidentId,
    pub challengee: ResidentId,
    pub value: f64,
    pub duration: Duration,
    pub circumstance: Option<String>,
    pub now: Timestamp,
}

pub struct InitiateChallengeHandler {
    hearts: Arc<dyn HeartRepository>,
    polls: Arc<dyn PollRepository>,
    residents: Arc<dyn ResidentRepository>,
    min_votes: u32,
}

impl InitiateChallengeHandler {
    pub fn new(
        hearts: Arc<dyn HeartRepository>,
        polls: Arc<dyn PollRepository>,
        residents: Arc<dyn ResidentRepository>,
        min_votes: u32,
    ) -> Self {
        Self {
            hearts,
            polls,
            residents,
            min_votes,
        }
    }

    /// Opens the challenge poll. No hearts move until resolution.
    ///
    /// # Errors
    ///
    /// - `InvalidChallenge` for a self-challenge or a non-positive value
    /// - `IneligibleResident` unless both parties are active and not exempt
    pub async fn handle(&self, cmd: InitiateChallengeCommand) -> Result<HeartChallenge, HeartError> {
        if cmd.challenger == cmd.challengee {
            return Err(HeartError::InvalidChallenge(
                "residents cannot challenge themselves".to_string(),
            ));
        }
        if cmd.value.is_nan() || cmd.value <= 0.0 {
            return Err(HeartError::InvalidChallenge(
                "challenge value must be positive".to_string(),
            ));
        }
        for resident_id in [&cmd.challenger, &cmd.challengee] {
            let eligible = self
                .residents
                .find(&cmd.house_id, resident_id)
                .await?
                .map_or(false, |r| r.is_eligible_at(cmd.now));
            if !eligible {
                return Err(HeartError::IneligibleResident(resident_id.clone()));
            }
        }

        let poll = Poll::new(cmd.now, cmd.duration, self.min_votes)?;
        self.polls.save(&poll).await?;

        let mut challenge = HeartChallenge::new(
            cmd.house_id,
            cmd.challenger,
            cmd.challengee,
            cmd.value,
            poll.id,
            cmd.now,
        );
        if let Some(circumstance) = cmd.circumstance {
            challenge = challenge.with_circumstance(circumstance);
        }
        self.hearts.save_challenge(&challenge).await?;

        info!(
            challenge_id = %challenge.id,
            challenger = %challenge.challenger,
            challengee = %challenge.challengee,
            value = challenge.value,
            "Hearts challenge opened"
        );
        Ok(challenge)
    }
}
