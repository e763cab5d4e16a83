// src/utils/mod.rs
pub mod error;
pub mod logging;

pub use error::{AppError, ExtractError, FileError, LoadError, StorageError}; // Re-export error types for convenience
