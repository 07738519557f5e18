//! PostgreSQL-backed purchase store.
//!
//! One row per identity in `users_tb`; the purchased-items set is a
//! `TEXT[]` column. A row is created by the first grant for an identity.

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use super::error::StoreError;
use super::store::PurchaseStore;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users_tb (
    user_id         TEXT PRIMARY KEY,
    purchased_items TEXT[] NOT NULL DEFAULT '{}',
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Purchase store over a Postgres connection pool
#[derive(Debug, Clone)]
pub struct PgPurchaseStore {
    pool: PgPool,
}

impl PgPurchaseStore {
    /// Create a new connection pool
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    /// Create `users_tb` if it does not exist
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_USERS_TABLE).execute(&self.pool).await?;
        tracing::info!("users_tb schema ready");
        Ok(())
    }
}

#[async_trait]
impl PurchaseStore for PgPurchaseStore {
    async fn grant(&self, user_id: &str, item_id: &str) -> Result<(), StoreError> {
        // Single-statement upsert: the conflicting row is locked, so concurrent
        // grants serialize and the CASE sees the latest row version.
        sqlx::query(
            r#"
            INSERT INTO users_tb (user_id, purchased_items)
            VALUES ($1, ARRAY[$2])
            ON CONFLICT (user_id) DO UPDATE
            SET purchased_items = CASE
                    WHEN $2 = ANY(users_tb.purchased_items) THEN users_tb.purchased_items
                    ELSE array_append(users_tb.purchased_items, $2)
                END,
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn purchased_items(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let row = sqlx::query("SELECT purchased_items FROM users_tb WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let mut items: Vec<String> = match row {
            Some(r) => r.try_get("purchased_items")?,
            None => Vec::new(),
        };
        items.sort();
        Ok(items)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
