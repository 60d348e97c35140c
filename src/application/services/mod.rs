//! Application services.

mod storage_service;

pub use storage_service::{BackendKind, Storage};
