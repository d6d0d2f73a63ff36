//! PostgreSQL implementation of ChoreLedger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{house_id, resident_id, timestamp};
use crate::domain::chores::{ChoreClaim, ChoreGift, ChoreValue};
use crate::domain::foundation::{
    ChoreClaimId, ChoreId, DomainError, ErrorCode, HouseId, PollId, ResidentId, Timestamp,
};
use crate::ports::ChoreLedger;

#[derive(Clone)]
pub struct PostgresChoreLedger {
    pool: PgPool,
}

impl PostgresChoreLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ClaimRow {
    id: Uuid,
    house_id: String,
    chore_id: Uuid,
    claimed_by: String,
    claimed_at: DateTime<Utc>,
    value: f64,
    poll_id: Uuid,
    valid: bool,
    resolved_at: Option<DateTime<Utc>>,
}

impl TryFrom<ClaimRow> for ChoreClaim {
    type Error = DomainError;

    fn try_from(row: ClaimRow) -> Result<Self, Self::Error> {
        Ok(ChoreClaim {
            id: ChoreClaimId::from_uuid(row.id),
            house_id: house_id(row.house_id)?,
            chore_id: ChoreId::from_uuid(row.chore_id),
            claimed_by: resident_id(row.claimed_by)?,
            claimed_at: timestamp(row.claimed_at),
            value: row.value,
            poll_id: PollId::from_uuid(row.poll_id),
            valid: row.valid,
            resolved_at: row.resolved_at.map(timestamp),
        })
    }
}

const CLAIM_COLUMNS: &str =
    "id, house_id, chore_id, claimed_by, claimed_at, value, poll_id, valid, resolved_at";

#[async_trait]
impl ChoreLedger for PostgresChoreLedger {
    async fn insert_values(&self, values: &[ChoreValue]) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("begin transaction", e))?;

        for value in values {
            let residents = i32::try_from(value.snapshot.residents).map_err(|_| {
                DomainError::new(ErrorCode::OutOfRange, "Resident count too large")
            })?;

            sqlx::query(
                r#"
                INSERT INTO chore_values (
                    id, house_id, chore_id, valued_at, value, ranking, residents, scalar
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(value.id.as_uuid())
            .bind(value.house_id.as_str())
            .bind(value.chore_id.as_uuid())
            .bind(value.valued_at.as_datetime())
            .bind(value.value)
            .bind(value.snapshot.ranking)
            .bind(residents)
            .bind(value.snapshot.scalar)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("insert chore value", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::database("commit chore values", e))
    }

    async fn last_valued_at(&self, house_id: &HouseId) -> Result<Option<Timestamp>, DomainError> {
        let latest: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT MAX(valued_at) FROM chore_values WHERE house_id = $1")
                .bind(house_id.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| DomainError::database("find last valuation", e))?;

        Ok(latest.map(timestamp))
    }

    async fn sum_values(
        &self,
        chore_id: &ChoreId,
        after: Option<Timestamp>,
        until: Timestamp,
    ) -> Result<f64, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(value), 0)
            FROM chore_values
            WHERE chore_id = $1
              AND ($2::timestamptz IS NULL OR valued_at > $2)
              AND valued_at <= $3
            "#,
        )
        .bind(chore_id.as_uuid())
        .bind(after.map(|t| *t.as_datetime()))
        .bind(until.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("sum chore values", e))
    }

    async fn sum_house_values(
        &self,
        house_id: &HouseId,
        after: Timestamp,
        until: Timestamp,
    ) -> Result<f64, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(value), 0)
            FROM chore_values
            WHERE house_id = $1 AND valued_at > $2 AND valued_at <= $3
            "#,
        )
        .bind(house_id.as_str())
        .bind(after.as_datetime())
        .bind(until.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("sum house values", e))
    }

    async fn save_claim(&self, claim: &ChoreClaim) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO chore_claims (
                id, house_id, chore_id, claimed_by, claimed_at, value, poll_id, valid, resolved_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(claim.id.as_uuid())
        .bind(claim.house_id.as_str())
        .bind(claim.chore_id.as_uuid())
        .bind(claim.claimed_by.as_str())
        .bind(claim.claimed_at.as_datetime())
        .bind(claim.value)
        .bind(claim.poll_id.as_uuid())
        .bind(claim.valid)
        .bind(claim.resolved_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("save claim", e))?;

        Ok(())
    }

    async fn find_claim(&self, id: &ChoreClaimId) -> Result<Option<ChoreClaim>, DomainError> {
        let query = format!("SELECT {} FROM chore_claims WHERE id = $1", CLAIM_COLUMNS);
        let row: Option<ClaimRow> = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("find claim", e))?;

        row.map(ChoreClaim::try_from).transpose()
    }

    async fn latest_standing_claim(
        &self,
        chore_id: &ChoreId,
        until: Timestamp,
        excluding: Option<&ChoreClaimId>,
    ) -> Result<Option<ChoreClaim>, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM chore_claims
            WHERE chore_id = $1 AND valid = TRUE AND claimed_at <= $2
              AND ($3::uuid IS NULL OR id <> $3)
            ORDER BY claimed_at DESC
            LIMIT 1
            "#,
            CLAIM_COLUMNS
        );
        let row: Option<ClaimRow> = sqlx::query_as(&query)
            .bind(chore_id.as_uuid())
            .bind(until.as_datetime())
            .bind(excluding.map(|id| *id.as_uuid()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("find latest claim", e))?;

        row.map(ChoreClaim::try_from).transpose()
    }

    async fn latest_claim(&self, chore_id: &ChoreId) -> Result<Option<ChoreClaim>, DomainError> {
        let query = format!(
            "SELECT {} FROM chore_claims WHERE chore_id = $1 ORDER BY claimed_at DESC LIMIT 1",
            CLAIM_COLUMNS
        );
        let row: Option<ClaimRow> = sqlx::query_as(&query)
            .bind(chore_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("find latest claim", e))?;

        row.map(ChoreClaim::try_from).transpose()
    }

    async fn list_unresolved_claims(&self, house_id: &HouseId) -> Result<Vec<ChoreClaim>, DomainError> {
        let query = format!(
            "SELECT {} FROM chore_claims WHERE house_id = $1 AND resolved_at IS NULL ORDER BY claimed_at",
            CLAIM_COLUMNS
        );
        let rows: Vec<ClaimRow> = sqlx::query_as(&query)
            .bind(house_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("list unresolved claims", e))?;

        rows.into_iter().map(ChoreClaim::try_from).collect()
    }

    async fn resolve_claim(&self, claim: &ChoreClaim) -> Result<bool, DomainError> {
        let resolved_at = claim.resolved_at.ok_or_else(|| {
            DomainError::new(ErrorCode::InternalError, "Claim resolution requires resolved_at")
        })?;

        let result = sqlx::query(
            r#"
            UPDATE chore_claims
            SET valid = $2, value = $3, resolved_at = $4
            WHERE id = $1 AND resolved_at IS NULL
            "#,
        )
        .bind(claim.id.as_uuid())
        .bind(claim.valid)
        .bind(claim.value)
        .bind(resolved_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("resolve claim", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn sum_claimed_points(
        &self,
        house_id: &HouseId,
        resident_id: &ResidentId,
        chore_id: Option<&ChoreId>,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Option<f64>, DomainError> {
        sqlx::query_scalar::<_, Option<f64>>(
            r#"
            SELECT SUM(value)
            FROM chore_claims
            WHERE house_id = $1 AND claimed_by = $2 AND valid = TRUE
              AND ($3::uuid IS NULL OR chore_id = $3)
              AND claimed_at BETWEEN $4 AND $5
            "#,
        )
        .bind(house_id.as_str())
        .bind(resident_id.as_str())
        .bind(chore_id.map(|id| *id.as_uuid()))
        .bind(start.as_datetime())
        .bind(end.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("sum claimed points", e))
    }

    async fn largest_claim(
        &self,
        house_id: &HouseId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Option<ChoreClaim>, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM chore_claims
            WHERE house_id = $1 AND valid = TRUE AND claimed_at BETWEEN $2 AND $3
            ORDER BY value DESC
            LIMIT 1
            "#,
            CLAIM_COLUMNS
        );
        let row: Option<ClaimRow> = sqlx::query_as(&query)
            .bind(house_id.as_str())
            .bind(start.as_datetime())
            .bind(end.as_datetime())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("find largest claim", e))?;

        row.map(ChoreClaim::try_from).transpose()
    }

    async fn save_gift(&self, gift: &ChoreGift) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO chore_gifts (id, house_id, giver, recipient, value, gifted_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(gift.id.as_uuid())
        .bind(gift.house_id.as_str())
        .bind(gift.giver.as_str())
        .bind(gift.recipient.as_str())
        .bind(gift.value)
        .bind(gift.gifted_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("save gift", e))?;

        Ok(())
    }

    async fn sum_gifted_points(
        &self,
        house_id: &HouseId,
        resident_id: &ResidentId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Option<f64>, DomainError> {
        sqlx::query_scalar::<_, Option<f64>>(
            r#"
            SELECT SUM(CASE WHEN recipient = $2 THEN value ELSE -value END)
            FROM chore_gifts
            WHERE house_id = $1
              AND (recipient = $2 OR giver = $2)
              AND gifted_at BETWEEN $3 AND $4
            "#,
        )
        .bind(house_id.as_str())
        .bind(resident_id.as_str())
        .bind(start.as_datetime())
        .bind(end.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("sum gifted points", e))
    }
}
