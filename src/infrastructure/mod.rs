//! Infrastructure layer: storage backend implementations.

pub mod persistence;
