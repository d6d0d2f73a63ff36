//! PostgreSQL implementations of HouseRepository and ResidentRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use super::{house_id, metadata, metadata_value, resident_id, timestamp};
use crate::domain::foundation::{DomainError, HouseId, ResidentId};
use crate::domain::houses::{House, Resident};
use crate::ports::{HouseRepository, ResidentRepository};

#[derive(Clone)]
pub struct PostgresHouseRepository {
    pool: PgPool,
}

impl PostgresHouseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HouseRow {
    id: String,
    name: Option<String>,
    chores_channel: Option<String>,
    metadata: Value,
    created_at: DateTime<Utc>,
}

impl TryFrom<HouseRow> for House {
    type Error = DomainError;

    fn try_from(row: HouseRow) -> Result<Self, Self::Error> {
        Ok(House {
            id: house_id(row.id)?,
            name: row.name,
            chores_channel: row.chores_channel,
            metadata: metadata(row.metadata),
            created_at: timestamp(row.created_at),
        })
    }
}

#[async_trait]
impl HouseRepository for PostgresHouseRepository {
    async fn upsert(&self, house: &House) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO houses (id, name, chores_channel, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                chores_channel = COALESCE(EXCLUDED.chores_channel, houses.chores_channel),
                metadata = EXCLUDED.metadata
            "#,
        )
        .bind(house.id.as_str())
        .bind(&house.name)
        .bind(&house.chores_channel)
        .bind(metadata_value(&house.metadata))
        .bind(house.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("upsert house", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &HouseId) -> Result<Option<House>, DomainError> {
        let row: Option<HouseRow> = sqlx::query_as(
            r#"
            SELECT id, name, chores_channel, metadata, created_at
            FROM houses
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("find house", e))?;

        row.map(House::try_from).transpose()
    }

    async fn set_chores_channel(&self, id: &HouseId, channel: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE houses SET chores_channel = $2 WHERE id = $1")
            .bind(id.as_str())
            .bind(channel)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("set chores channel", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<House>, DomainError> {
        let rows: Vec<HouseRow> = sqlx::query_as(
            r#"
            SELECT id, name, chores_channel, metadata, created_at
            FROM houses
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("list houses", e))?;

        rows.into_iter().map(House::try_from).collect()
    }
}

#[derive(Clone)]
pub struct PostgresResidentRepository {
    pool: PgPool,
}

impl PostgresResidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ResidentRow {
    house_id: String,
    id: String,
    active_at: Option<DateTime<Utc>>,
    exempt_at: Option<DateTime<Utc>>,
}

impl TryFrom<ResidentRow> for Resident {
    type Error = DomainError;

    fn try_from(row: ResidentRow) -> Result<Self, Self::Error> {
        Ok(Resident {
            house_id: house_id(row.house_id)?,
            id: resident_id(row.id)?,
            active_at: row.active_at.map(timestamp),
            exempt_at: row.exempt_at.map(timestamp),
        })
    }
}

#[async_trait]
impl ResidentRepository for PostgresResidentRepository {
    async fn upsert(&self, resident: &Resident) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO residents (house_id, id, active_at, exempt_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (house_id, id) DO UPDATE SET
                active_at = EXCLUDED.active_at,
                exempt_at = EXCLUDED.exempt_at
            "#,
        )
        .bind(resident.house_id.as_str())
        .bind(resident.id.as_str())
        .bind(resident.active_at.map(|t| *t.as_datetime()))
        .bind(resident.exempt_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("upsert resident", e))?;

        Ok(())
    }

    async fn find(&self, house_id: &HouseId, id: &ResidentId) -> Result<Option<Resident>, DomainError> {
        let row: Option<ResidentRow> = sqlx::query_as(
            r#"
            SELECT house_id, id, active_at, exempt_at
            FROM residents
            WHERE house_id = $1 AND id = $2
            "#,
        )
        .bind(house_id.as_str())
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("find resident", e))?;

        row.map(Resident::try_from).transpose()
    }

    async fn list_by_house(&self, house_id: &HouseId) -> Result<Vec<Resident>, DomainError> {
        let rows: Vec<ResidentRow> = sqlx::query_as(
            r#"
            SELECT house_id, id, active_at, exempt_at
            FROM residents
            WHERE house_id = $1
            ORDER BY id
            "#,
        )
        .bind(house_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("list residents", e))?;

        rows.into_iter().map(Resident::try_from).collect()
    }
}
