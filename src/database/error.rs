use thiserror::Error;
use super::controller::ImportReport;
use super::repository::RecordId;
use crate::save::SaveError;

/// Reasons a name or field value is refused
///
/// None of these mutate anything; they are shown to the user, who fixes
/// the input and tries again.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Item name '{0}' contains invalid characters (use letters, digits, spaces, dashes and single quotes)")]
    InvalidCharacter(String),

    #[error("Item name '{0}' is a duplicate")]
    DuplicateName(String),

    #[error("Item name cannot be empty")]
    EmptyName,

    #[error("{field} must be a non-negative number, got {value}")]
    NegativeValue { field: &'static str, value: f32 },
}

/// Errors from repository operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("No record with id {0}")]
    RecordNotFound(RecordId),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors reported by the database controller
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("No record is selected")]
    NoSelection,

    #[error("No record with id {0}")]
    RecordNotFound(RecordId),

    #[error("No record named '{0}'")]
    NameNotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to save database: {0}")]
    Persistence(#[from] SaveError),

    /// The imported rows are in memory but not on disk
    #[error("Imported {} record(s) but failed to save them: {source}", .report.imported.len())]
    ImportNotSaved {
        report: Box<ImportReport>,
        source: SaveError,
    },
}

impl From<RepositoryError> for DatabaseError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RecordNotFound(id) => DatabaseError::RecordNotFound(id),
            RepositoryError::Validation(e) => DatabaseError::Validation(e),
        }
    }
}
