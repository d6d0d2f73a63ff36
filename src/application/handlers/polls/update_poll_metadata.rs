//! UpdatePollMetadataHandler - shallow metadata merge.

use std::sync::Arc;

use crate::domain::foundation::{Metadata, PollId};
use crate::domain::polls::{Poll, PollError};
use crate::ports::PollRepository;

#[derive(Debug, Clone)]
pub struct UpdatePollMetadataCommand {
    pub poll_id: PollId,
    pub patch: Metadata,
}

pub struct UpdatePollMetadataHandler {
    polls: Arc<dyn PollRepository>,
}

impl UpdatePollMetadataHandler {
    pub fn new(polls: Arc<dyn PollRepository>) -> Self {
        Self { polls }
    }

    /// Keys in the patch overwrite existing keys; other keys are kept.
    pub async fn handle(&self, cmd: UpdatePollMetadataCommand) -> Result<Poll, PollError> {
        self.polls
            .merge_metadata(&cmd.poll_id, &cmd.patch)
            .await?
            .ok_or(PollError::NotFound(cmd.poll_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPollRepository;
    use crate::domain::foundation::Timestamp;
    use chrono::Duration;
    use serde_json::{json, Value};

    fn object(value: Value) -> Metadata {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn merge_is_last_write_wins_per_key() {
        let polls = Arc::new(InMemoryPollRepository::new());
        let poll = Poll::new(Timestamp::now(), Duration::hours(1), 1)
            .unwrap()
            .with_metadata(object(json!({"channel": "C1", "ts": "1"})));
        polls.save(&poll).await.unwrap();

        let updated = UpdatePollMetadataHandler::new(polls)
            .handle(UpdatePollMetadataCommand {
                poll_id: poll.id,
                patch: object(json!({"ts": "2", "thread": "T"})),
            })
            .await
            .unwrap();

        assert_eq!(
            Value::Object(updated.metadata),
            json!({"channel": "C1", "ts": "2", "thread": "T"})
        );
    }

    #[tokio::test]
    async fn unknown_poll_is_not_found() {
        let missing = PollId::new();
        let err = UpdatePollMetadataHandler::new(Arc::new(InMemoryPollRepository::new()))
            .handle(UpdatePollMetadataCommand {
                poll_id: missing,
                patch: Metadata::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, PollError::NotFound(missing));
    }
}
