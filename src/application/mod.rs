//! Application layer: the storage facade.

pub mod services;
