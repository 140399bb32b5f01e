use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use sha2::{Digest, Sha256};

/// One value of a database result row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl Cell {
    /// Converts the cell into its document form. Timestamps become ISO-8601
    /// strings; every other variant keeps its JSON type and value.
    pub fn into_json(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Integer(value) => Value::from(value),
            Self::Unsigned(value) => Value::from(value),
            Self::Float(value) => Number::from_f64(value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Text(value) => Value::String(value),
            Self::Date(value) => Value::String(value.format("%Y-%m-%d").to_string()),
            Self::Timestamp(value) => Value::String(iso8601(&value)),
        }
    }
}

/// Renders a naive timestamp as `YYYY-MM-DDTHH:MM:SS`, adding `.ffffff`
/// only when the microsecond component is non-zero.
pub fn iso8601(timestamp: &NaiveDateTime) -> String {
    if timestamp.nanosecond() / 1_000 == 0 {
        timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// The uploaded JSON document: `{"rows": [[...], ...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExportDocument {
    pub rows: Vec<Vec<Value>>,
}

impl ExportDocument {
    /// Builds the document from a result set, keeping row and column order.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Cell::into_json).collect())
                .collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

pub fn content_fingerprint(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    format!("{:x}", hasher.finalize())
}
