use thiserror::Error;

/// Why a single CSV field could not be written onto a record
///
/// During decode any of these drops the whole row; the rest of the
/// file keeps decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Could not parse {field} from '{raw_value}'")]
    Parse { field: String, raw_value: String },

    #[error("'{raw_value}' is not a known {field}")]
    UnknownEnumValue { field: String, raw_value: String },

    #[error("No column named '{0}'")]
    UnknownColumn(String),
}

/// A data row that was dropped during decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line number in the input (the header is line 1)
    pub line: usize,
    pub error: CodecError,
}
