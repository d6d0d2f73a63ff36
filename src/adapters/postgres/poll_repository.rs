//! PostgreSQL implementation of PollRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::{count_from_i32, count_to_i32, metadata, metadata_value, resident_id, timestamp};
use crate::domain::foundation::{DomainError, Metadata, PollId};
use crate::domain::polls::{Poll, PollResults, PollVote};
use crate::ports::PollRepository;

#[derive(Clone)]
pub struct PostgresPollRepository {
    pool: PgPool,
}

impl PostgresPollRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PollRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    closes_at: DateTime<Utc>,
    min_votes: i32,
    metadata: Value,
}

impl TryFrom<PollRow> for Poll {
    type Error = DomainError;

    fn try_from(row: PollRow) -> Result<Self, Self::Error> {
        Ok(Poll {
            id: PollId::from_uuid(row.id),
            created_at: timestamp(row.created_at),
            closes_at: timestamp(row.closes_at),
            min_votes: count_from_i32(row.min_votes, "min_votes")?,
            metadata: metadata(row.metadata),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VoteRow {
    poll_id: Uuid,
    resident_id: String,
    vote: Option<bool>,
    submitted_at: DateTime<Utc>,
}

impl TryFrom<VoteRow> for PollVote {
    type Error = DomainError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        Ok(PollVote {
            poll_id: PollId::from_uuid(row.poll_id),
            resident_id: resident_id(row.resident_id)?,
            vote: row.vote,
            submitted_at: timestamp(row.submitted_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CountRow {
    yays: i64,
    nays: i64,
}

#[async_trait]
impl PollRepository for PostgresPollRepository {
    async fn save(&self, poll: &Poll) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO polls (id, created_at, closes_at, min_votes, metadata)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(poll.id.as_uuid())
        .bind(poll.created_at.as_datetime())
        .bind(poll.closes_at.as_datetime())
        .bind(count_to_i32(poll.min_votes, "min_votes")?)
        .bind(metadata_value(&poll.metadata))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("save poll", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &PollId) -> Result<Option<Poll>, DomainError> {
        let row: Option<PollRow> = sqlx::query_as(
            r#"
            SELECT id, created_at, closes_at, min_votes, metadata
            FROM polls
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("find poll", e))?;

        row.map(Poll::try_from).transpose()
    }

    async fn upsert_vote(&self, vote: &PollVote) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO poll_votes (poll_id, resident_id, vote, submitted_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (poll_id, resident_id) DO UPDATE SET
                vote = EXCLUDED.vote,
                submitted_at = EXCLUDED.submitted_at
            "#,
        )
        .bind(vote.poll_id.as_uuid())
        .bind(vote.resident_id.as_str())
        .bind(vote.vote)
        .bind(vote.submitted_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("upsert vote", e))?;

        Ok(())
    }

    async fn list_votes(&self, poll_id: &PollId) -> Result<Vec<PollVote>, DomainError> {
        let rows: Vec<VoteRow> = sqlx::query_as(
            r#"
            SELECT poll_id, resident_id, vote, submitted_at
            FROM poll_votes
            WHERE poll_id = $1
            ORDER BY submitted_at
            "#,
        )
        .bind(poll_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("list votes", e))?;

        rows.into_iter().map(PollVote::try_from).collect()
    }

    async fn count_votes(&self, poll_id: &PollId) -> Result<PollResults, DomainError> {
        let row: CountRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE vote IS TRUE) AS yays,
                COUNT(*) FILTER (WHERE vote IS FALSE) AS nays
            FROM poll_votes
            WHERE poll_id = $1
            "#,
        )
        .bind(poll_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("count votes", e))?;

        Ok(PollResults {
            yays: u32::try_from(row.yays).unwrap_or(u32::MAX),
            nays: u32::try_from(row.nays).unwrap_or(u32::MAX),
        })
    }

    async fn merge_metadata(
        &self,
        poll_id: &PollId,
        patch: &Metadata,
    ) -> Result<Option<Poll>, DomainError> {
        // `||` on JSONB objects is a shallow merge with the right side winning.
        let row: Option<PollRow> = sqlx::query_as(
            r#"
            UPDATE polls SET metadata = metadata || $2
            WHERE id = $1
            RETURNING id, created_at, closes_at, min_votes, metadata
            "#,
        )
        .bind(poll_id.as_uuid())
        .bind(metadata_value(patch))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("merge poll metadata", e))?;

        row.map(Poll::try_from).transpose()
    }
}
