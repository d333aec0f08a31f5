//! Save/Load system for item databases
//!
//! This module provides:
//! - JSON database files, one per record kind (human-readable, diffable)
//! - Timestamped backups of the previous file on every save
//! - The `Persistence` trait the database controller saves through
//!
//! # Architecture
//!
//! - `types`: Database file structure and error types
//! - `manager`: SaveManager for file operations
//! - `provider`: Persistence trait plus in-memory and JSON providers
//!
//! # Example Usage
//!
//! ```ignore
//! let (store, repo) = JsonPersistence::<WeaponRecord>::open("~/.local/share/itemdb", 5)?;
//! let mut db = ItemDatabaseController::new(repo, store);
//! db.create(WeaponRecord::named("Axe"))?;  // written to weapons.json
//! ```

pub mod manager;
pub mod provider;
pub mod types;

// Re-export commonly used types
pub use manager::SaveManager;
pub use provider::{JsonPersistence, MemoryPersistence, Persistence};
pub use types::*;
