//! PostgreSQL implementation of HeartRepository.
//!
//! Conditional inserts take a transaction-scoped advisory lock on the
//! resident so concurrent sweeps cannot both pass the existence check.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{house_id, resident_id, timestamp};
use crate::domain::foundation::{
    ChallengeId, DomainError, ErrorCode, HeartId, HouseId, PollId, ResidentId, Timestamp,
};
use crate::domain::hearts::{Heart, HeartChallenge, HeartKind, HeartsBoardEntry};
use crate::ports::HeartRepository;

#[derive(Clone)]
pub struct PostgresHeartRepository {
    pool: PgPool,
}

impl PostgresHeartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HeartRow {
    id: Uuid,
    house_id: String,
    resident_id: String,
    value: f64,
    kind: String,
    challenge_id: Option<Uuid>,
    generated_at: DateTime<Utc>,
}

impl TryFrom<HeartRow> for Heart {
    type Error = DomainError;

    fn try_from(row: HeartRow) -> Result<Self, Self::Error> {
        let kind: HeartKind = row.kind.parse().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid heart kind: {}", e))
        })?;

        Ok(Heart {
            id: HeartId::from_uuid(row.id),
            house_id: house_id(row.house_id)?,
            resident_id: resident_id(row.resident_id)?,
            value: row.value,
            kind,
            challenge_id: row.challenge_id.map(ChallengeId::from_uuid),
            generated_at: timestamp(row.generated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ChallengeRow {
    id: Uuid,
    house_id: String,
    challenger: String,
    challengee: String,
    value: f64,
    poll_id: Uuid,
    circumstance: Option<String>,
    created_at: DateTime<Utc>,
    heart_id: Option<Uuid>,
    resolved_at: Option<DateTime<Utc>>,
}

impl TryFrom<ChallengeRow> for HeartChallenge {
    type Error = DomainError;

    fn try_from(row: ChallengeRow) -> Result<Self, Self::Error> {
        Ok(HeartChallenge {
            id: ChallengeId::from_uuid(row.id),
            house_id: house_id(row.house_id)?,
            challenger: resident_id(row.challenger)?,
            challengee: resident_id(row.challengee)?,
            value: row.value,
            poll_id: PollId::from_uuid(row.poll_id),
            circumstance: row.circumstance,
            created_at: timestamp(row.created_at),
            heart_id: row.heart_id.map(HeartId::from_uuid),
            resolved_at: row.resolved_at.map(timestamp),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TotalRow {
    resident_id: String,
    hearts: f64,
}

async fn insert_heart(tx: &mut Transaction<'_, Postgres>, heart: &Heart) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO hearts (id, house_id, resident_id, value, kind, challenge_id, generated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(heart.id.as_uuid())
    .bind(heart.house_id.as_str())
    .bind(heart.resident_id.as_str())
    .bind(heart.value)
    .bind(heart.kind.as_str())
    .bind(heart.challenge_id.map(|id| *id.as_uuid()))
    .bind(heart.generated_at.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| DomainError::database("insert heart", e))?;

    Ok(())
}

const CHALLENGE_COLUMNS: &str = "id, house_id, challenger, challengee, value, poll_id, \
     circumstance, created_at, heart_id, resolved_at";

#[async_trait]
impl HeartRepository for PostgresHeartRepository {
    async fn insert(&self, heart: &Heart) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("begin transaction", e))?;
        insert_heart(&mut tx, heart).await?;
        tx.commit()
            .await
            .map_err(|e| DomainError::database("commit heart", e))
    }

    async fn insert_unless_exists(
        &self,
        heart: &Heart,
        since: Option<Timestamp>,
    ) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("begin transaction", e))?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1 || ':' || $2))")
            .bind(heart.house_id.as_str())
            .bind(heart.resident_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("lock resident hearts", e))?;

        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM hearts
                WHERE house_id = $1 AND resident_id = $2 AND kind = $3
                  AND ($4::timestamptz IS NULL OR generated_at BETWEEN $4 AND $5)
            )
            "#,
        )
        .bind(heart.house_id.as_str())
        .bind(heart.resident_id.as_str())
        .bind(heart.kind.as_str())
        .bind(since.map(|t| *t.as_datetime()))
        .bind(heart.generated_at.as_datetime())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DomainError::database("check existing hearts", e))?;

        if exists {
            tx.rollback()
                .await
                .map_err(|e| DomainError::database("rollback heart", e))?;
            return Ok(false);
        }

        insert_heart(&mut tx, heart).await?;
        tx.commit()
            .await
            .map_err(|e| DomainError::database("commit heart", e))?;
        Ok(true)
    }

    async fn sum_for_resident(
        &self,
        house_id: &HouseId,
        resident_id: &ResidentId,
    ) -> Result<Option<f64>, DomainError> {
        sqlx::query_scalar::<_, Option<f64>>(
            "SELECT SUM(value) FROM hearts WHERE house_id = $1 AND resident_id = $2",
        )
        .bind(house_id.as_str())
        .bind(resident_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("sum hearts", e))
    }

    async fn list_for_resident(
        &self,
        house_id: &HouseId,
        resident_id: &ResidentId,
    ) -> Result<Vec<Heart>, DomainError> {
        let rows: Vec<HeartRow> = sqlx::query_as(
            r#"
            SELECT id, house_id, resident_id, value, kind, challenge_id, generated_at
            FROM hearts
            WHERE house_id = $1 AND resident_id = $2
            ORDER BY generated_at
            "#,
        )
        .bind(house_id.as_str())
        .bind(resident_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("list hearts", e))?;

        rows.into_iter().map(Heart::try_from).collect()
    }

    async fn totals_by_house(&self, house_id: &HouseId) -> Result<Vec<HeartsBoardEntry>, DomainError> {
        let rows: Vec<TotalRow> = sqlx::query_as(
            r#"
            SELECT resident_id, SUM(value) AS hearts
            FROM hearts
            WHERE house_id = $1
            GROUP BY resident_id
            ORDER BY hearts DESC, resident_id
            "#,
        )
        .bind(house_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("total hearts", e))?;

        rows.into_iter()
            .map(|row| {
                Ok(HeartsBoardEntry {
                    resident_id: resident_id(row.resident_id)?,
                    hearts: row.hearts,
                })
            })
            .collect()
    }

    async fn save_challenge(&self, challenge: &HeartChallenge) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO heart_challenges (
                id, house_id, challenger, challengee, value, poll_id,
                circumstance, created_at, heart_id, resolved_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(challenge.id.as_uuid())
        .bind(challenge.house_id.as_str())
        .bind(challenge.challenger.as_str())
        .bind(challenge.challengee.as_str())
        .bind(challenge.value)
        .bind(challenge.poll_id.as_uuid())
        .bind(&challenge.circumstance)
        .bind(challenge.created_at.as_datetime())
        .bind(challenge.heart_id.map(|id| *id.as_uuid()))
        .bind(challenge.resolved_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("save challenge", e))?;

        Ok(())
    }

    async fn find_challenge(&self, id: &ChallengeId) -> Result<Option<HeartChallenge>, DomainError> {
        let query = format!("SELECT {} FROM heart_challenges WHERE id = $1", CHALLENGE_COLUMNS);
        let row: Option<ChallengeRow> = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("find challenge", e))?;

        row.map(HeartChallenge::try_from).transpose()
    }

    async fn list_unresolved_challenges(
        &self,
        house_id: &HouseId,
    ) -> Result<Vec<HeartChallenge>, DomainError> {
        let query = format!(
            "SELECT {} FROM heart_challenges WHERE house_id = $1 AND heart_id IS NULL ORDER BY created_at",
            CHALLENGE_COLUMNS
        );
        let rows: Vec<ChallengeRow> = sqlx::query_as(&query)
            .bind(house_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("list unresolved challenges", e))?;

        rows.into_iter().map(HeartChallenge::try_from).collect()
    }

    async fn resolve_challenge(
        &self,
        challenge_id: &ChallengeId,
        heart: &Heart,
    ) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("begin transaction", e))?;

        let result = sqlx::query(
            r#"
            UPDATE heart_challenges
            SET heart_id = $2, resolved_at = $3
            WHERE id = $1 AND heart_id IS NULL
            "#,
        )
        .bind(challenge_id.as_uuid())
        .bind(heart.id.as_uuid())
        .bind(heart.generated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database("resolve challenge", e))?;

        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| DomainError::database("rollback challenge", e))?;
            return Ok(false);
        }

        insert_heart(&mut tx, heart).await?;
        tx.commit()
            .await
            .map_err(|e| DomainError::database("commit challenge", e))?;
        Ok(true)
    }
}
