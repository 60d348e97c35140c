//! # linkstore
//!
//! Pluggable storage engine for a URL shortener service.
//!
//! Maps long URLs to fixed-length random short codes and resolves them on
//! lookup. Three interchangeable backends implement one persistence contract:
//!
//! - **Memory** - lock-guarded in-process map, the default
//! - **File** - append-only JSON log with startup replay and sequence-counter
//!   recovery
//! - **PostgreSQL** - transactional batches and unique-constraint-driven
//!   duplicate detection
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - the [`domain::entities::Link`] entity and
//!   the [`domain::repositories::LinkStore`] contract
//! - **Application Layer** ([`application`]) - the
//!   [`application::services::Storage`] facade binding one backend at startup
//! - **Infrastructure Layer** ([`infrastructure`]) - the three backend
//!   implementations
//!
//! HTTP routing, request encoding, compression, and identity propagation are
//! external collaborators; this crate is the storage subsystem they call into.
//!
//! ## Quick Start
//!
//! ```no_run
//! use linkstore::prelude::*;
//!
//! # async fn run() -> Result<(), StoreError> {
//! // Precedence: DATABASE_DSN, then FILE_STORAGE_PATH, else in-memory.
//! let config = linkstore::config::load_from_env().expect("invalid configuration");
//! let storage = Storage::create(&config).await?;
//!
//! let code = storage.save_link(None, "https://example.com").await?;
//! let url = storage.get_link(&code).await?;
//! assert_eq!(url, "https://example.com");
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

pub use config::Config;
pub use error::StoreError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{BackendKind, Storage};
    pub use crate::config::Config;
    pub use crate::domain::entities::Link;
    pub use crate::domain::repositories::LinkStore;
    pub use crate::error::StoreError;
}
