//! In-memory implementation of the link store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkStore;
use crate::error::StoreError;

/// Volatile map-backed store, the default backend when neither a database DSN
/// nor a file path is configured.
///
/// The map is owned by the store and guarded by an `RwLock`; it is never
/// handed out by reference. Saves insert or overwrite unconditionally and
/// always succeed - distinct codes for the same original URL are all kept, so
/// this backend performs no URL-level deduplication.
pub struct MemoryStore {
    links: RwLock<HashMap<String, Link>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            links: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn save_link(&self, link: &Link) -> Result<(), StoreError> {
        self.links
            .write()
            .await
            .insert(link.code.clone(), link.clone());
        Ok(())
    }

    /// Applies `save_link` once per pair. No cross-pair atomicity: a mid-batch
    /// failure would leave prior pairs saved.
    async fn save_links_batch(&self, links: &[Link]) -> Result<(), StoreError> {
        for link in links {
            self.save_link(link).await?;
        }
        Ok(())
    }

    async fn get_link(&self, code: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .links
            .read()
            .await
            .get(code)
            .map(|link| link.original_url.clone()))
    }

    async fn links_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<HashMap<String, String>, StoreError> {
        Ok(self
            .links
            .read()
            .await
            .values()
            .filter(|link| link.owner_id.as_deref() == Some(owner_id))
            .map(|link| (link.code.clone(), link.original_url.clone()))
            .collect())
    }

    // The map exists as soon as the store is constructed, so there is no
    // uninitialized state to report.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
