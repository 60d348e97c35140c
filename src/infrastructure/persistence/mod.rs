//! Concrete [`crate::domain::repositories::LinkStore`] backends.

mod file_store;
mod memory_store;
mod pg_link_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use pg_link_store::PgLinkStore;
