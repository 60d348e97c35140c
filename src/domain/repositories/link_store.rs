//! Storage contract implemented by every backend.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::entities::Link;
use crate::error::StoreError;

/// Persistence contract for short links.
///
/// Implemented by three interchangeable backends:
///
/// - [`crate::infrastructure::persistence::MemoryStore`] - lock-guarded map
/// - [`crate::infrastructure::persistence::FileStore`] - append-only JSON log
/// - [`crate::infrastructure::persistence::PgLinkStore`] - PostgreSQL
///
/// Exactly one backend is bound at startup by
/// [`crate::application::services::Storage::create`] and kept for the process
/// lifetime. All operations must tolerate concurrent invocation.
///
/// Lookup misses are reported as `Ok(None)` at this layer; the facade converts
/// them into an explicit [`StoreError::NotFound`] so callers handle one shape.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Persists a single link.
    ///
    /// The in-memory and file backends never reject a save; the PostgreSQL
    /// backend reports [`StoreError::Duplicate`] carrying the pre-existing
    /// code when the original URL is already mapped.
    async fn save_link(&self, link: &Link) -> Result<(), StoreError>;

    /// Persists a batch of links.
    ///
    /// PostgreSQL wraps the batch in one transaction: any failing insert rolls
    /// back the whole batch. The other backends apply saves per pair with no
    /// cross-pair atomicity.
    async fn save_links_batch(&self, links: &[Link]) -> Result<(), StoreError>;

    /// Resolves a short code to its original URL, or `Ok(None)` on a miss.
    async fn get_link(&self, code: &str) -> Result<Option<String>, StoreError>;

    /// Returns every `code -> original_url` mapping owned by `owner_id`.
    async fn links_by_owner(&self, owner_id: &str)
    -> Result<HashMap<String, String>, StoreError>;

    /// Verifies the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Releases backend resources. The store must not be used afterwards.
    async fn close(&self) -> Result<(), StoreError>;
}
