//! PostgreSQL implementation of ChoreProposalRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::{house_id, metadata, metadata_value, resident_id, timestamp};
use crate::domain::chores::ChoreProposal;
use crate::domain::foundation::{ChoreId, ChoreProposalId, DomainError, HouseId, PollId, Timestamp};
use crate::ports::ChoreProposalRepository;

#[derive(Clone)]
pub struct PostgresChoreProposalRepository {
    pool: PgPool,
}

impl PostgresChoreProposalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProposalRow {
    id: Uuid,
    house_id: String,
    proposed_by: String,
    chore_id: Option<Uuid>,
    name: Option<String>,
    metadata: Value,
    active: bool,
    poll_id: Uuid,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProposalRow> for ChoreProposal {
    type Error = DomainError;

    fn try_from(row: ProposalRow) -> Result<Self, Self::Error> {
        Ok(ChoreProposal {
            id: ChoreProposalId::from_uuid(row.id),
            house_id: house_id(row.house_id)?,
            proposed_by: resident_id(row.proposed_by)?,
            chore_id: row.chore_id.map(ChoreId::from_uuid),
            name: row.name,
            metadata: metadata(row.metadata),
            active: row.active,
            poll_id: PollId::from_uuid(row.poll_id),
            created_at: timestamp(row.created_at),
            resolved_at: row.resolved_at.map(timestamp),
        })
    }
}

#[async_trait]
impl ChoreProposalRepository for PostgresChoreProposalRepository {
    async fn save(&self, proposal: &ChoreProposal) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO chore_proposals (
                id, house_id, proposed_by, chore_id, name, metadata,
                active, poll_id, created_at, resolved_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(proposal.id.as_uuid())
        .bind(proposal.house_id.as_str())
        .bind(proposal.proposed_by.as_str())
        .bind(proposal.chore_id.map(|id| *id.as_uuid()))
        .bind(&proposal.name)
        .bind(metadata_value(&proposal.metadata))
        .bind(proposal.active)
        .bind(proposal.poll_id.as_uuid())
        .bind(proposal.created_at.as_datetime())
        .bind(proposal.resolved_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("save proposal", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ChoreProposalId) -> Result<Option<ChoreProposal>, DomainError> {
        let row: Option<ProposalRow> = sqlx::query_as(
            r#"
            SELECT id, house_id, proposed_by, chore_id, name, metadata,
                   active, poll_id, created_at, resolved_at
            FROM chore_proposals
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("find proposal", e))?;

        row.map(ChoreProposal::try_from).transpose()
    }

    async fn list_unresolved(&self, house_id: &HouseId) -> Result<Vec<ChoreProposal>, DomainError> {
        let rows: Vec<ProposalRow> = sqlx::query_as(
            r#"
            SELECT id, house_id, proposed_by, chore_id, name, metadata,
                   active, poll_id, created_at, resolved_at
            FROM chore_proposals
            WHERE house_id = $1 AND resolved_at IS NULL
            ORDER BY created_at
            "#,
        )
        .bind(house_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("list unresolved proposals", e))?;

        rows.into_iter().map(ChoreProposal::try_from).collect()
    }

    async fn mark_resolved(&self, id: &ChoreProposalId, at: Timestamp) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE chore_proposals SET resolved_at = $2 WHERE id = $1 AND resolved_at IS NULL",
        )
        .bind(id.as_uuid())
        .bind(at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("resolve proposal", e))?;

        Ok(result.rows_affected() > 0)
    }
}
