//! Persistence layer over PostgreSQL.
//!
//! Two tables, `users` and `profiles`. The profile's nested collections
//! (skills, social links, experience, education) live in JSONB columns and
//! are read and written as whole sub-documents. A cloneable [`Store`] handle
//! wraps the pool and is injected into handlers via `axum::Extension`.

pub mod models;
mod profiles;
mod users;

use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Connect to the database and apply the schema.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be created or the schema fails to apply.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        // Statements are IF NOT EXISTS, safe to run on every start
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&pool)
            .await
            .context("Failed to apply database schema")?;

        Ok(Self { pool })
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}
