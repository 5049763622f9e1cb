//! Postgres document store.
//!
//! Operates on the `kyc_records` table created by the embedded migrations.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kyc_core::{Fingerprint, KycRecord, RecordParts};
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use super::{DocumentStore, StoreError};

/// `seq` is a `BIGSERIAL`, so rows come back in insertion order even when
/// `created_at` ties.
const LIST_SQL: &str = "SELECT id, address, name, id_type, id_number, day_of_birth, \
     month_of_birth, year_of_birth, is_verified, fingerprint, created_at \
     FROM kyc_records ORDER BY seq";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and run embedded migrations.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await?;
        tracing::info!("Connected to PostgreSQL");

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn create(&self, record: KycRecord) -> Result<KycRecord, StoreError> {
        sqlx::query(
            "INSERT INTO kyc_records (id, address, name, id_type, id_number,
             day_of_birth, month_of_birth, year_of_birth, is_verified, fingerprint, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(record.id())
        .bind(record.address())
        .bind(record.name())
        .bind(record.id_type())
        .bind(record.id_number())
        .bind(int_column(&record, "day_of_birth", record.day_of_birth())?)
        .bind(int_column(&record, "month_of_birth", record.month_of_birth())?)
        .bind(int_column(&record, "year_of_birth", record.year_of_birth())?)
        .bind(record.is_verified())
        .bind(record.fingerprint().map(Fingerprint::to_hex))
        .bind(record.created_at())
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(&self) -> Result<Vec<KycRecord>, StoreError> {
        let rows = sqlx::query_as::<_, KycRecordRow>(LIST_SQL)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(KycRecordRow::into_record).collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn int_column(record: &KycRecord, field: &str, value: u32) -> Result<i32, StoreError> {
    i32::try_from(value).map_err(|_| StoreError::Corrupt {
        id: record.id().to_string(),
        reason: format!("{field} out of INTEGER range: {value}"),
    })
}

#[derive(sqlx::FromRow)]
struct KycRecordRow {
    id: Uuid,
    address: String,
    name: String,
    id_type: String,
    id_number: String,
    day_of_birth: i32,
    month_of_birth: i32,
    year_of_birth: i32,
    is_verified: bool,
    fingerprint: Option<String>,
    created_at: DateTime<Utc>,
}

impl KycRecordRow {
    fn into_record(self) -> Result<KycRecord, StoreError> {
        let corrupt = |reason: String| StoreError::Corrupt {
            id: self.id.to_string(),
            reason,
        };
        let unsigned = |field: &str, value: i32| {
            u32::try_from(value).map_err(|_| corrupt(format!("negative {field}: {value}")))
        };

        let day_of_birth = unsigned("day_of_birth", self.day_of_birth)?;
        let month_of_birth = unsigned("month_of_birth", self.month_of_birth)?;
        let year_of_birth = unsigned("year_of_birth", self.year_of_birth)?;
        let fingerprint = self
            .fingerprint
            .as_deref()
            .map(str::parse::<Fingerprint>)
            .transpose()
            .map_err(|e| corrupt(e.to_string()))?;

        Ok(KycRecord::from_parts(RecordParts {
            id: self.id,
            address: self.address,
            name: self.name,
            id_type: self.id_type,
            id_number: self.id_number,
            day_of_birth,
            month_of_birth,
            year_of_birth,
            is_verified: self.is_verified,
            fingerprint,
            created_at: self.created_at,
        }))
    }
}
