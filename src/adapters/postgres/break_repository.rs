//! PostgreSQL implementation of ChoreBreakRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::{house_id, metadata, metadata_value, resident_id, timestamp};
use crate::domain::chores::ChoreBreak;
use crate::domain::foundation::{ChoreBreakId, DomainError, HouseId, ResidentId, Timestamp};
use crate::ports::ChoreBreakRepository;

#[derive(Clone)]
pub struct PostgresChoreBreakRepository {
    pool: PgPool,
}

impl PostgresChoreBreakRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BreakRow {
    id: Uuid,
    house_id: String,
    resident_id: String,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    metadata: Value,
}

impl TryFrom<BreakRow> for ChoreBreak {
    type Error = DomainError;

    fn try_from(row: BreakRow) -> Result<Self, Self::Error> {
        Ok(ChoreBreak {
            id: ChoreBreakId::from_uuid(row.id),
            house_id: house_id(row.house_id)?,
            resident_id: resident_id(row.resident_id)?,
            start: timestamp(row.start_at),
            end: timestamp(row.end_at),
            metadata: metadata(row.metadata),
        })
    }
}

#[async_trait]
impl ChoreBreakRepository for PostgresChoreBreakRepository {
    async fn save(&self, chore_break: &ChoreBreak) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO chore_breaks (id, house_id, resident_id, start_at, end_at, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(chore_break.id.as_uuid())
        .bind(chore_break.house_id.as_str())
        .bind(chore_break.resident_id.as_str())
        .bind(chore_break.start.as_datetime())
        .bind(chore_break.end.as_datetime())
        .bind(metadata_value(&chore_break.metadata))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("save break", e))?;

        Ok(())
    }

    async fn delete(&self, id: &ChoreBreakId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM chore_breaks WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("delete break", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_resident(
        &self,
        house_id: &HouseId,
        resident_id: &ResidentId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<ChoreBreak>, DomainError> {
        let rows: Vec<BreakRow> = sqlx::query_as(
            r#"
            SELECT id, house_id, resident_id, start_at, end_at, metadata
            FROM chore_breaks
            WHERE house_id = $1 AND resident_id = $2
              AND start_at < $4 AND end_at > $3
            ORDER BY start_at
            "#,
        )
        .bind(house_id.as_str())
        .bind(resident_id.as_str())
        .bind(start.as_datetime())
        .bind(end.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("list breaks", e))?;

        rows.into_iter().map(ChoreBreak::try_from).collect()
    }

    async fn list_covering(&self, house_id: &HouseId, at: Timestamp) -> Result<Vec<ChoreBreak>, DomainError> {
        let rows: Vec<BreakRow> = sqlx::query_as(
            r#"
            SELECT id, house_id, resident_id, start_at, end_at, metadata
            FROM chore_breaks
            WHERE house_id = $1 AND start_at <= $2 AND end_at > $2
            ORDER BY start_at
            "#,
        )
        .bind(house_id.as_str())
        .bind(at.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("list covering breaks", e))?;

        rows.into_iter().map(ChoreBreak::try_from).collect()
    }
}
