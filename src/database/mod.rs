// Item database module
//
// This module provides the list/detail editing workflow, including:
// - Ordered repositories of records of one kind
// - Name validation (character whitelist and duplicate check)
// - The controller a UI drives: selection, search, edits, CSV import/export

pub mod controller;
pub mod error;
pub mod repository;
pub mod validator;

// Re-export main types
pub use controller::{ImportReport, ItemDatabaseController};
pub use error::{DatabaseError, RepositoryError, ValidationError};
pub use repository::{ItemRepository, RecordId};
pub use validator::{check_name, is_duplicate, is_valid_name, name_errors};
