//! PostgreSQL implementation of ChoreRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::{house_id, metadata, metadata_value, resident_id, timestamp};
use crate::domain::chores::{Chore, ChorePreference};
use crate::domain::foundation::{ChoreId, DomainError, ErrorCode, HouseId};
use crate::ports::ChoreRepository;

#[derive(Clone)]
pub struct PostgresChoreRepository {
    pool: PgPool,
}

impl PostgresChoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ChoreRow {
    id: Uuid,
    house_id: String,
    name: String,
    active: bool,
    metadata: Value,
    created_at: DateTime<Utc>,
}

impl TryFrom<ChoreRow> for Chore {
    type Error = DomainError;

    fn try_from(row: ChoreRow) -> Result<Self, Self::Error> {
        Ok(Chore {
            id: ChoreId::from_uuid(row.id),
            house_id: house_id(row.house_id)?,
            name: row.name,
            active: row.active,
            metadata: metadata(row.metadata),
            created_at: timestamp(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PreferenceRow {
    house_id: String,
    resident_id: String,
    alpha_chore_id: Uuid,
    beta_chore_id: Uuid,
    preference: f64,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PreferenceRow> for ChorePreference {
    type Error = DomainError;

    fn try_from(row: PreferenceRow) -> Result<Self, Self::Error> {
        Ok(ChorePreference {
            house_id: house_id(row.house_id)?,
            resident_id: resident_id(row.resident_id)?,
            alpha_chore_id: ChoreId::from_uuid(row.alpha_chore_id),
            beta_chore_id: ChoreId::from_uuid(row.beta_chore_id),
            preference: row.preference,
            updated_at: timestamp(row.updated_at),
        })
    }
}

#[async_trait]
impl ChoreRepository for PostgresChoreRepository {
    async fn save(&self, chore: &Chore) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO chores (id, house_id, name, active, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                active = EXCLUDED.active,
                metadata = EXCLUDED.metadata
            "#,
        )
        .bind(chore.id.as_uuid())
        .bind(chore.house_id.as_str())
        .bind(&chore.name)
        .bind(chore.active)
        .bind(metadata_value(&chore.metadata))
        .bind(chore.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let unique = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if unique {
                DomainError::new(
                    ErrorCode::DuplicateName,
                    format!("Chore name already in use: {}", chore.name),
                )
                .with_detail("name", chore.name.clone())
            } else {
                DomainError::database("save chore", e)
            }
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ChoreId) -> Result<Option<Chore>, DomainError> {
        let row: Option<ChoreRow> = sqlx::query_as(
            r#"
            SELECT id, house_id, name, active, metadata, created_at
            FROM chores
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("find chore", e))?;

        row.map(Chore::try_from).transpose()
    }

    async fn find_by_name(&self, house_id: &HouseId, name: &str) -> Result<Option<Chore>, DomainError> {
        let row: Option<ChoreRow> = sqlx::query_as(
            r#"
            SELECT id, house_id, name, active, metadata, created_at
            FROM chores
            WHERE house_id = $1 AND name = $2
            "#,
        )
        .bind(house_id.as_str())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("find chore by name", e))?;

        row.map(Chore::try_from).transpose()
    }

    async fn list_active(&self, house_id: &HouseId) -> Result<Vec<Chore>, DomainError> {
        let rows: Vec<ChoreRow> = sqlx::query_as(
            r#"
            SELECT id, house_id, name, active, metadata, created_at
            FROM chores
            WHERE house_id = $1 AND active = TRUE
            ORDER BY name, id
            "#,
        )
        .bind(house_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("list chores", e))?;

        rows.into_iter().map(Chore::try_from).collect()
    }

    async fn upsert_preference(&self, preference: &ChorePreference) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO chore_prefs (
                house_id, resident_id, alpha_chore_id, beta_chore_id, preference, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (house_id, resident_id, alpha_chore_id, beta_chore_id) DO UPDATE SET
                preference = EXCLUDED.preference,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(preference.house_id.as_str())
        .bind(preference.resident_id.as_str())
        .bind(preference.alpha_chore_id.as_uuid())
        .bind(preference.beta_chore_id.as_uuid())
        .bind(preference.preference)
        .bind(preference.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("upsert preference", e))?;

        Ok(())
    }

    async fn list_preferences(&self, house_id: &HouseId) -> Result<Vec<ChorePreference>, DomainError> {
        let rows: Vec<PreferenceRow> = sqlx::query_as(
            r#"
            SELECT house_id, resident_id, alpha_chore_id, beta_chore_id, preference, updated_at
            FROM chore_prefs
            WHERE house_id = $1
            "#,
        )
        .bind(house_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("list preferences", e))?;

        rows.into_iter().map(ChorePreference::try_from).collect()
    }
}
