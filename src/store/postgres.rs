//! PostgreSQL-backed contact store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::contact::{ContactSubmission, StoredContact};
use crate::store::{ContactStore, StoreError};

// Unquoted identifiers fold to lowercase, so this is the same table an
// existing deployment already has (`fullname`, `createdat`, ...).
const CREATE_CONTACTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS contacts (
        id SERIAL PRIMARY KEY,
        fullName TEXT NOT NULL,
        companyName TEXT,
        jobTitle TEXT,
        workEmail TEXT NOT NULL,
        createdAt TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

// `createdAt` is a zoneless TIMESTAMP filled from the session clock; the cast
// reads it back in the same session zone.
const INSERT_CONTACT: &str = r#"
    INSERT INTO contacts (fullName, companyName, jobTitle, workEmail)
    VALUES ($1, $2, $3, $4)
    RETURNING id::int8, createdAt::timestamptz
"#;

/// Contact store over a shared connection pool.
#[derive(Clone)]
pub struct PgContactStore {
    pool: PgPool,
}

impl PgContactStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool and verify it with a round trip.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(600))
            .connect(&config.url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;

        tracing::info!(
            database_url = %config.url_masked(),
            max_connections = config.max_connections,
            "Database connection pool established"
        );

        Ok(Self::new(pool))
    }

    /// Create the `contacts` table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_CONTACTS_TABLE).execute(&self.pool).await?;
        tracing::info!("Contacts table is ready");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn insert_contact(&self, submission: &ContactSubmission) -> Result<StoredContact, StoreError> {
        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(INSERT_CONTACT)
            .bind(&submission.full_name)
            .bind(submission.company_name.as_deref())
            .bind(submission.job_title.as_deref())
            .bind(&submission.work_email)
            .fetch_one(&self.pool)
            .await?;

        Ok(StoredContact { id, created_at })
    }
}
