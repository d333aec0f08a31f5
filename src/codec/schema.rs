use crate::item::IconHandle;
use super::error::CodecError;
use super::resolver::ResourceResolver;

/// Declared type of a column, decides how raw text is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Int,
    Float,
    /// Enum or flag set matched by member name
    Choice,
    Icon,
}

/// Typed getter/setter pair for one record field
pub enum Accessor<R> {
    Text {
        get: fn(&R) -> String,
        set: fn(&mut R, String),
    },
    Int {
        get: fn(&R) -> u32,
        set: fn(&mut R, u32),
    },
    Float {
        get: fn(&R) -> f32,
        set: fn(&mut R, f32),
    },
    /// `set` returns false when the text names no declared member
    Choice {
        get: fn(&R) -> String,
        set: fn(&mut R, &str) -> bool,
    },
    Icon {
        get: fn(&R) -> Option<String>,
        set: fn(&mut R, Option<IconHandle>),
    },
}

/// One CSV column: its header label and the field behind it
pub struct Column<R> {
    pub header: &'static str,
    pub accessor: Accessor<R>,
}

impl<R> Column<R> {
    pub fn text(header: &'static str, get: fn(&R) -> String, set: fn(&mut R, String)) -> Self {
        Column { header, accessor: Accessor::Text { get, set } }
    }

    pub fn int(header: &'static str, get: fn(&R) -> u32, set: fn(&mut R, u32)) -> Self {
        Column { header, accessor: Accessor::Int { get, set } }
    }

    pub fn float(header: &'static str, get: fn(&R) -> f32, set: fn(&mut R, f32)) -> Self {
        Column { header, accessor: Accessor::Float { get, set } }
    }

    pub fn choice(
        header: &'static str,
        get: fn(&R) -> String,
        set: fn(&mut R, &str) -> bool,
    ) -> Self {
        Column { header, accessor: Accessor::Choice { get, set } }
    }

    pub fn icon(
        header: &'static str,
        get: fn(&R) -> Option<String>,
        set: fn(&mut R, Option<IconHandle>),
    ) -> Self {
        Column { header, accessor: Accessor::Icon { get, set } }
    }

    pub fn field_type(&self) -> FieldType {
        match self.accessor {
            Accessor::Text { .. } => FieldType::Text,
            Accessor::Int { .. } => FieldType::Int,
            Accessor::Float { .. } => FieldType::Float,
            Accessor::Choice { .. } => FieldType::Choice,
            Accessor::Icon { .. } => FieldType::Icon,
        }
    }

    /// Field value as it appears in CSV
    ///
    /// Floats use the shortest text that parses back to the same value,
    /// so `10.0` is written as `10`. A missing icon is an empty field.
    pub fn read(&self, record: &R) -> String {
        match &self.accessor {
            Accessor::Text { get, .. } => get(record),
            Accessor::Int { get, .. } => get(record).to_string(),
            Accessor::Float { get, .. } => get(record).to_string(),
            Accessor::Choice { get, .. } => get(record),
            Accessor::Icon { get, .. } => get(record).unwrap_or_default(),
        }
    }

    /// Parses `raw` per the column type and stores it on `record`
    ///
    /// On error the record is left as it was for this field.
    pub fn write(
        &self,
        record: &mut R,
        raw: &str,
        resolver: &dyn ResourceResolver,
    ) -> Result<(), CodecError> {
        match &self.accessor {
            Accessor::Text { set, .. } => set(record, raw.to_string()),
            Accessor::Int { set, .. } => {
                let value = raw.parse::<u32>().map_err(|_| self.parse_error(raw))?;
                set(record, value);
            }
            Accessor::Float { set, .. } => {
                let value = raw
                    .parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .ok_or_else(|| self.parse_error(raw))?;
                set(record, value);
            }
            Accessor::Choice { set, .. } => {
                if !set(record, raw) {
                    return Err(CodecError::UnknownEnumValue {
                        field: self.header.to_string(),
                        raw_value: raw.to_string(),
                    });
                }
            }
            Accessor::Icon { set, .. } => {
                let handle = if raw.is_empty() { None } else { resolver.resolve(raw) };
                set(record, handle);
            }
        }
        Ok(())
    }

    fn parse_error(&self, raw: &str) -> CodecError {
        CodecError::Parse {
            field: self.header.to_string(),
            raw_value: raw.to_string(),
        }
    }
}

/// Ordered column layout for one record kind
pub struct Schema<R> {
    pub columns: Vec<Column<R>>,

    /// Rows with fewer columns than this are skipped on decode
    pub min_columns: usize,
}

impl<R> Schema<R> {
    /// Creates a schema that requires every column to be present
    pub fn new(columns: Vec<Column<R>>) -> Self {
        let min_columns = columns.len();
        Schema { columns, min_columns }
    }

    /// Header labels joined by commas (no trailing newline)
    pub fn header_line(&self) -> String {
        self.columns
            .iter()
            .map(|column| column.header)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Finds a column by its exact header label
    pub fn column(&self, header: &str) -> Result<&Column<R>, CodecError> {
        self.columns
            .iter()
            .find(|column| column.header == header)
            .ok_or_else(|| CodecError::UnknownColumn(header.to_string()))
    }
}
