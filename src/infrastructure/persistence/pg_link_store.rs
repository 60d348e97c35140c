//! PostgreSQL implementation of the link store.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::time::timeout;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkStore;
use crate::error::StoreError;

/// Per-query deadline. An elapsed timeout surfaces as
/// [`StoreError::TransientIo`], never as a process-fatal condition.
const QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Deadline for startup migrations, which may create the table.
const SCHEMA_TIMEOUT: Duration = Duration::from_secs(15);

/// Pool-backed store, the only backend offering URL-level deduplication.
///
/// The schema is ensured at connect time through embedded sqlx migrations,
/// which are idempotent under concurrent first-time startup of multiple
/// instances. Uses prepared statements for every query.
pub struct PgLinkStore {
    pool: PgPool,
}

impl PgLinkStore {
    /// Connects with default pool sizing (10 connections, 30 s acquire).
    pub async fn connect(dsn: &str) -> Result<Self, StoreError> {
        Self::connect_with(dsn, 10, Duration::from_secs(30)).await
    }

    /// Connects, sizes the pool, and runs migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TransientIo`] when the pool cannot be
    /// established and [`StoreError::SchemaInit`] when migrations fail or
    /// exceed their deadline - both fatal to backend open.
    pub async fn connect_with(
        dsn: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(dsn)
            .await?;
        tracing::info!("connected to database");

        match timeout(SCHEMA_TIMEOUT, sqlx::migrate!("./migrations").run(&pool)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(StoreError::schema_init(e.to_string())),
            Err(_) => return Err(StoreError::schema_init("migration timed out")),
        }

        Ok(Self { pool })
    }

    /// Wraps an existing pool. Assumes migrations have already run.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches the code already assigned to `original_url` after a unique
    /// violation reported the URL as taken.
    async fn short_link_for(&self, original_url: &str) -> Result<String, StoreError> {
        let existing = timeout(
            QUERY_TIMEOUT,
            sqlx::query_scalar::<_, String>(
                "SELECT short_link FROM links WHERE original_link = $1",
            )
            .bind(original_url)
            .fetch_optional(&self.pool),
        )
        .await??;

        // The row must exist: links are never deleted and the violation just
        // told us the URL is present.
        existing.ok_or(StoreError::NotFound)
    }
}

fn is_unique_violation_on_url(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some("links_original_link_key"))
}

#[async_trait]
impl LinkStore for PgLinkStore {
    /// Inserts the link; a unique violation on the original URL is
    /// intercepted and reported as [`StoreError::Duplicate`] carrying the
    /// pre-existing short code.
    async fn save_link(&self, link: &Link) -> Result<(), StoreError> {
        let insert = sqlx::query(
            "INSERT INTO links (short_link, original_link, owner_id) VALUES ($1, $2, $3)",
        )
        .bind(&link.code)
        .bind(&link.original_url)
        .bind(&link.owner_id)
        .execute(&self.pool);

        match timeout(QUERY_TIMEOUT, insert).await? {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation_on_url(&e) => {
                let existing_code = self.short_link_for(&link.original_url).await?;
                tracing::debug!(
                    url = %link.original_url,
                    existing_code,
                    "duplicate original url"
                );
                Err(StoreError::Duplicate { existing_code })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All inserts run in one transaction; any failure rolls back the whole
    /// batch, so no partial batch is ever visible to subsequent reads.
    async fn save_links_batch(&self, links: &[Link]) -> Result<(), StoreError> {
        let mut tx = timeout(QUERY_TIMEOUT, self.pool.begin()).await??;

        for link in links {
            let insert = sqlx::query(
                "INSERT INTO links (short_link, original_link, owner_id) VALUES ($1, $2, $3)",
            )
            .bind(&link.code)
            .bind(&link.original_url)
            .bind(&link.owner_id)
            .execute(&mut *tx);

            if let Err(e) = timeout(QUERY_TIMEOUT, insert).await? {
                let _ = timeout(QUERY_TIMEOUT, tx.rollback()).await;
                return Err(e.into());
            }
        }

        timeout(QUERY_TIMEOUT, tx.commit()).await??;
        Ok(())
    }

    /// Point lookup; "no matching row" is `Ok(None)`, never conflated with a
    /// query-execution error.
    async fn get_link(&self, code: &str) -> Result<Option<String>, StoreError> {
        let original = timeout(
            QUERY_TIMEOUT,
            sqlx::query_scalar::<_, String>(
                "SELECT original_link FROM links WHERE short_link = $1",
            )
            .bind(code)
            .fetch_optional(&self.pool),
        )
        .await??;

        Ok(original)
    }

    async fn links_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<HashMap<String, String>, StoreError> {
        let rows = timeout(
            QUERY_TIMEOUT,
            sqlx::query_as::<_, (String, String)>(
                "SELECT short_link, original_link FROM links WHERE owner_id = $1",
            )
            .bind(owner_id)
            .fetch_all(&self.pool),
        )
        .await??;

        Ok(rows.into_iter().collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        timeout(QUERY_TIMEOUT, sqlx::query("SELECT 1").execute(&self.pool)).await??;
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.pool.close().await;
        Ok(())
    }
}
