//! SQLite persistence and cache layer for the drug safety service.
//!
//! This crate provides async database operations for drug records, their
//! time-boxed safety assessments, a generic expiring cache of raw external
//! API payloads, an append-only search log, and the background enrichment
//! queue, using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use safety_store::{drug, safety_data, Database, NewSafetyData};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:safety.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Register a drug and record an assessment for it
//!     let drug = drug::upsert_drug(db.pool(), "Atorvastatin", Some("atorvastatin")).await?;
//!     let assessment = NewSafetyData {
//!         pregnancy_category: Some("X".to_string()),
//!         pregnancy_text: None,
//!         breastfeeding_text: None,
//!         pregnancy_safety: "avoid".to_string(),
//!         breastfeeding_safety: "avoid".to_string(),
//!         ai_summary: Some("Should not be taken during pregnancy.".to_string()),
//!         key_warnings: vec!["Discontinue when pregnancy is recognized".to_string()],
//!         data_source: "fda_ai".to_string(),
//!         confidence_score: 0.9,
//!         study_count: 120,
//!     };
//!     safety_data::record_safety_data(db.pool(), drug.id, &assessment, None).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api_cache;
pub mod drug;
pub mod error;
pub mod models;
pub mod queue;
pub mod safety_data;
pub mod search_log;
pub mod validation;

pub use error::{Result, StoreError};
pub use models::{
    ApiCacheEntry, Drug, NewSafetyData, QueueItem, QueueStatus, SafetyData, SearchLog,
};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> safety_store::Result<()> {
    /// // File database
    /// let db = safety_store::Database::connect("sqlite:data/safety.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = safety_store::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    /// Default pool size for database connections.
    /// Sized for concurrent request handlers plus the enrichment worker.
    const DEFAULT_POOL_SIZE: u32 = 20;

    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
