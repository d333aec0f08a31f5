//! Persisted database types
//!
//! Each record kind is stored as one JSON document holding every record
//! of that kind, plus enough metadata to refuse files written by a newer
//! version or for a different kind.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use thiserror::Error;
use crate::item::ItemKind;

/// The root database file structure
#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseFile<R> {
    pub version: u32,
    pub timestamp: SystemTime,
    pub kind: ItemKind,
    pub records: Vec<R>,
}

/// Error types for save/load operations
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid database version: {0}")]
    InvalidVersion(u32),

    #[error("Database file holds {found} records, expected {expected}")]
    KindMismatch { expected: ItemKind, found: ItemKind },

    #[error("Database file reloaded with {found} records, {expected} were saved")]
    StaleFile { expected: usize, found: usize },
}

/// Current database file version
pub const CURRENT_DATABASE_VERSION: u32 = 1;
