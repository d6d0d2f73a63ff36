//! ResolveChallengeHandler and the bulk ResolveChallengesHandler.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::foundation::{ChallengeId, HouseId, Timestamp};
use crate::domain::hearts::{Heart, HeartError, HeartKind};
use crate::domain::polls::PollError;
use crate::ports::{HeartRepository, PollRepository};

#[derive(Debug, Clone)]
pub struct ResolveChallengeCommand {
    pub challenge_id: ChallengeId,
    pub now: Timestamp,
}

pub struct ResolveChallengeHandler {
    hearts: Arc<dyn HeartRepository>,
    polls: Arc<dyn PollRepository>,
    min_votes: u32,
}

impl ResolveChallengeHandler {
    pub fn new(
        hearts: Arc<dyn HeartRepository>,
        polls: Arc<dyn PollRepository>,
        min_votes: u32,
    ) -> Self {
        Self {
            hearts,
            polls,
            min_votes,
        }
    }

    /// Takes the challenge value from the loser and links the entry to the
    /// challenge.
    ///
    /// # Errors
    ///
    /// - `ChallengeNotFound` if the challenge does not exist
    /// - `AlreadyResolved` if it already carries a heart
    /// - `Poll(NotClosed)` while its poll is open
    pub async fn handle(&self, cmd: ResolveChallengeCommand) -> Result<Heart, HeartError> {
        let challenge = self
            .hearts
            .find_challenge(&cmd.challenge_id)
            .await?
            .ok_or(HeartError::ChallengeNotFound(cmd.challenge_id))?;
        if challenge.is_resolved() {
            return Err(HeartError::AlreadyResolved(challenge.id));
        }

        let poll = self
            .polls
            .find_by_id(&challenge.poll_id)
            .await?
            .ok_or(PollError::NotFound(challenge.poll_id))?;
        if !poll.is_closed_at(cmd.now) {
            return Err(PollError::NotClosed {
                poll_id: poll.id,
                closes_at: poll.closes_at,
            }
            .into());
        }

        let results = self.polls.count_votes(&poll.id).await?;
        let outcome = challenge.decide(results, self.min_votes);

        let heart = Heart::new(
            challenge.house_id.clone(),
            outcome.loser.clone(),
            -challenge.value,
            HeartKind::Challenge,
            cmd.now,
        )
        .for_challenge(challenge.id);

        if !self.hearts.resolve_challenge(&challenge.id, &heart).await? {
            return Err(HeartError::AlreadyResolved(challenge.id));
        }

        info!(
            challenge_id = %challenge.id,
            loser = %outcome.loser,
            upheld = outcome.upheld,
            yays = outcome.results.yays,
            nays = outcome.results.nays,
            "Hearts challenge resolved"
        );
        Ok(heart)
    }
}

#[derive(Debug, Clone)]
pub struct ResolveChallengesCommand {
    pub house_id: HouseId,
    pub now: Timestamp,
}

pub struct ResolveChallengesHandler {
    hearts: Arc<dyn HeartRepository>,
    resolver: ResolveChallengeHandler,
}

impl ResolveChallengesHandler {
    pub fn new(hearts: Arc<dyn HeartRepository>, resolver: ResolveChallengeHandler) -> Self {
        Self { hearts, resolver }
    }

    /// Resolves every closed challenge in the house, skipping open polls and
    /// challenges another sweep resolved first.
    pub async fn handle(&self, cmd: ResolveChallengesCommand) -> Result<Vec<Heart>, HeartError> {
        let mut resolved = Vec::new();
        for challenge in self.hearts.list_unresolved_challenges(&cmd.house_id).await? {
            let result = self
                .resolver
                .handle(ResolveChallengeCommand {
                    challenge_id: challenge.id,
                    now: cmd.now,
                })
                .await;
            match result {
                Ok(heart) => resolved.push(heart),
                Err(HeartError::Poll(PollError::NotClosed { .. })) => {
                    debug!(challenge_id = %challenge.id, "Challenge poll still open");
                }
                Err(err) if err.is_already_resolved() => {
                    debug!(challenge_id = %challenge.id, "Challenge already resolved");
                }
                Err(err) => {
                    warn!(challenge_id = %challenge.id, error = %err, "Challenge resolution failed");
                }
            }
        }
        Ok(resolved)
    }
}
