//! Plain record values read from and written to the record tables.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use rusqlite::types::Type;
use serde::Serialize;
use uuid::Uuid;

/// Columns every record table starts with, in table order.
pub(crate) const BASE_SELECT: &str =
    "id, handle, name, displayName, description, timestampCreate, timestampLast, uuidLast";

/// Columns shared by every record.
///
/// `handle` never changes; `uuid_last` and `timestamp_last` change on every
/// write so that readers can tell a record moved on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordBase {
    pub id: i64,
    pub handle: Uuid,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub timestamp_create: DateTime<Utc>,
    pub timestamp_last: DateTime<Utc>,
    pub uuid_last: Uuid,
}

impl RecordBase {
    /// Reads the base columns from the first eight positions of `row`.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            handle: uuid_at(row, 1)?,
            name: row.get(2)?,
            display_name: row.get(3)?,
            description: row.get(4)?,
            timestamp_create: time_at(row, 5)?,
            timestamp_last: time_at(row, 6)?,
            uuid_last: uuid_at(row, 7)?,
        })
    }
}

pub(crate) fn uuid_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn time_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    pub base: RecordBase,
    /// Software version that last opened the database.
    pub version: String,
    pub root_directory: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReferenceRecord {
    pub base: RecordBase,
    pub path: String,
    pub file_type: String,
    /// SHA-256 of the file when it was referenced, lowercase hex.
    pub checksum_create: String,
    /// SHA-256 at the last refresh.
    pub checksum_last: String,
}

impl FileReferenceRecord {
    pub fn changed_since_create(&self) -> bool {
        self.checksum_create != self.checksum_last
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRecord {
    pub base: RecordBase,
    pub seed_file_reference: Option<i64>,
    pub results_are_invalid: bool,
    pub data_points_are_invalid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataPointStatus {
    Pending,
    Complete,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPointRecord {
    pub base: RecordBase,
    pub analysis_id: i64,
    pub status: DataPointStatus,
    pub selected: bool,
    pub run_type: String,
    pub directory: String,
}

impl DataPointRecord {
    pub(crate) fn status_of(complete: bool, failed: bool) -> DataPointStatus {
        match (complete, failed) {
            (_, true) => DataPointStatus::Failed,
            (true, false) => DataPointStatus::Complete,
            (false, false) => DataPointStatus::Pending,
        }
    }
}
