use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, ToSql, Transaction, params};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use crate::attribute::{Attribute, AttributeValue};
use crate::error::{ProjectError, ProjectResult};
use crate::migrate::{migrate_to_latest, schema_version};
use crate::records::{
    AnalysisRecord, BASE_SELECT, DataPointRecord, DataPointStatus, FileReferenceRecord,
    ProjectRecord, RecordBase,
};

/// Record an attribute tree hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOwner {
    Analysis(i64),
    DataPoint(i64),
}

/// SQLite file (`.osp`) holding analyses, their data points and results.
pub struct ProjectDatabase {
    conn: Connection,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for ProjectDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectDatabase").field("path", &self.path).finish()
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

/// SHA-256 of a file's bytes, lowercase hex.
pub fn checksum(path: &Path) -> ProjectResult<String> {
    let bytes = std::fs::read(path)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// Inserts a record with fresh base columns plus `columns`; returns its row id.
fn insert_record(
    tx: &Transaction<'_>,
    table: &str,
    name: &str,
    columns: &[&str],
    values: &[&dyn ToSql],
) -> ProjectResult<i64> {
    let stamp = now();
    let handle = Uuid::new_v4().to_string();
    let uuid_last = Uuid::new_v4().to_string();
    let mut names =
        String::from("handle, name, displayName, description, timestampCreate, timestampLast, uuidLast");
    let mut placeholders = String::from("?1, ?2, ?2, '', ?3, ?3, ?4");
    for (i, column) in columns.iter().enumerate() {
        names.push_str(", ");
        names.push_str(column);
        placeholders.push_str(&format!(", ?{}", i + 5));
    }
    let mut args: Vec<&dyn ToSql> = vec![&handle, &name, &stamp, &uuid_last];
    args.extend_from_slice(values);
    tx.execute(
        &format!("INSERT INTO {table} ({names}) VALUES ({placeholders})"),
        args.as_slice(),
    )?;
    Ok(tx.last_insert_rowid())
}

/// Marks a record as changed.
fn touch(conn: &Connection, table: &'static str, id: i64) -> ProjectResult<()> {
    let changed = conn.execute(
        &format!("UPDATE {table} SET timestampLast = ?1, uuidLast = ?2 WHERE id = ?3"),
        params![now(), Uuid::new_v4().to_string(), id],
    )?;
    if changed == 0 {
        return Err(ProjectError::NotFound { table, id });
    }
    Ok(())
}

impl ProjectDatabase {
    /// Opens or creates the database at `path`, bringing its schema up to date.
    pub fn open(path: &Path) -> ProjectResult<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn, Some(path.to_path_buf()))
    }

    pub fn open_in_memory() -> ProjectResult<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(mut conn: Connection, path: Option<PathBuf>) -> ProjectResult<Self> {
        let before = schema_version(&conn)?;
        let after = migrate_to_latest(&mut conn)?;
        if before != after {
            info!(from = before, to = after, "upgraded project database schema");
        }

        let name = path
            .as_deref()
            .and_then(Path::file_stem)
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Project".to_string());
        let root = path
            .as_deref()
            .and_then(Path::parent)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        let version = env!("CARGO_PKG_VERSION");

        let tx = conn.transaction()?;
        let existing: Option<i64> = tx
            .query_row("SELECT id FROM ProjectDatabaseRecords LIMIT 1", [], |r| r.get(0))
            .optional()?;
        match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE ProjectDatabaseRecords SET version = ?1 WHERE id = ?2",
                    params![version, id],
                )?;
            }
            None => {
                insert_record(
                    &tx,
                    "ProjectDatabaseRecords",
                    &name,
                    &["version", "rootDirectory"],
                    &[&version, &root],
                )?;
            }
        }
        tx.commit()?;
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn schema_version(&self) -> ProjectResult<u32> {
        schema_version(&self.conn)
    }

    pub fn project_record(&self) -> ProjectResult<ProjectRecord> {
        let sql = format!("SELECT {BASE_SELECT}, version, rootDirectory FROM ProjectDatabaseRecords LIMIT 1");
        Ok(self.conn.query_row(&sql, [], |row| {
            Ok(ProjectRecord {
                base: RecordBase::from_row(row)?,
                version: row.get(8)?,
                root_directory: row.get(9)?,
            })
        })?)
    }

    // ------------------------------------------------------------------
    // File references
    // ------------------------------------------------------------------

    /// References a file on disk; both checksums start as its current digest.
    pub fn add_file_reference(&mut self, path: &Path, file_type: &str) -> ProjectResult<FileReferenceRecord> {
        let digest = checksum(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tx = self.conn.transaction()?;
        let path_text = path.to_string_lossy().into_owned();
        let id = insert_record(
            &tx,
            "FileReferenceRecords",
            &name,
            &["path", "fileType", "checksumCreate", "checksumLast"],
            &[&path_text, &file_type, &digest, &digest],
        )?;
        tx.commit()?;
        self.file_reference(id)
    }

    /// Recomputes the last checksum from the file on disk.
    pub fn refresh_checksum(&mut self, id: i64) -> ProjectResult<FileReferenceRecord> {
        let record = self.file_reference(id)?;
        let digest = checksum(Path::new(&record.path))?;
        if digest != record.checksum_last {
            let tx = self.conn.transaction()?;
            tx.execute(
                "UPDATE FileReferenceRecords SET checksumLast = ?1 WHERE id = ?2",
                params![digest, id],
            )?;
            touch(&tx, "FileReferenceRecords", id)?;
            tx.commit()?;
        }
        self.file_reference(id)
    }

    pub fn file_reference(&self, id: i64) -> ProjectResult<FileReferenceRecord> {
        self.file_references_where("WHERE id = ?1", params![id])?
            .pop()
            .ok_or(ProjectError::NotFound {
                table: "FileReferenceRecords",
                id,
            })
    }

    pub fn file_references(&self) -> ProjectResult<Vec<FileReferenceRecord>> {
        self.file_references_where("", [])
    }

    fn file_references_where(
        &self,
        filter: &str,
        args: impl rusqlite::Params,
    ) -> ProjectResult<Vec<FileReferenceRecord>> {
        let sql = format!(
            "SELECT {BASE_SELECT}, path, fileType, checksumCreate, checksumLast \
             FROM FileReferenceRecords {filter} ORDER BY id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(args, |row| {
            Ok(FileReferenceRecord {
                base: RecordBase::from_row(row)?,
                path: row.get(8)?,
                file_type: row.get(9)?,
                checksum_create: row.get(10)?,
                checksum_last: row.get(11)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    // ------------------------------------------------------------------
    // Analyses
    // ------------------------------------------------------------------

    pub fn create_analysis(&mut self, name: &str, seed: Option<i64>) -> ProjectResult<AnalysisRecord> {
        if let Some(seed) = seed {
            self.file_reference(seed)?;
        }
        let tx = self.conn.transaction()?;
        let id = insert_record(
            &tx,
            "AnalysisRecords",
            name,
            &["seedFileReferenceRecordId"],
            &[&seed],
        )?;
        tx.commit()?;
        debug!(id, name, "created analysis");
        self.analysis(id)
    }

    pub fn analysis(&self, id: i64) -> ProjectResult<AnalysisRecord> {
        self.analyses_where("WHERE id = ?1", params![id])?
            .pop()
            .ok_or(ProjectError::NotFound {
                table: "AnalysisRecords",
                id,
            })
    }

    pub fn analyses(&self) -> ProjectResult<Vec<AnalysisRecord>> {
        self.analyses_where("", [])
    }

    fn analyses_where(&self, filter: &str, args: impl rusqlite::Params) -> ProjectResult<Vec<AnalysisRecord>> {
        let sql = format!(
            "SELECT {BASE_SELECT}, seedFileReferenceRecordId, resultsAreInvalid, \
             dataPointsAreInvalid FROM AnalysisRecords {filter} ORDER BY id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(args, |row| {
            Ok(AnalysisRecord {
                base: RecordBase::from_row(row)?,
                seed_file_reference: row.get(8)?,
                results_are_invalid: row.get(9)?,
                data_points_are_invalid: row.get(10)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn rename_analysis(&mut self, id: i64, name: &str) -> ProjectResult<AnalysisRecord> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE AnalysisRecords SET name = ?1, displayName = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        touch(&tx, "AnalysisRecords", id)?;
        tx.commit()?;
        self.analysis(id)
    }

    /// Removes the analysis with its data points and every attribute below them.
    pub fn remove_analysis(&mut self, id: i64) -> ProjectResult<()> {
        self.analysis(id)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM AttributeRecords WHERE dataPointRecordId IN \
             (SELECT id FROM DataPointRecords WHERE analysisRecordId = ?1)",
            params![id],
        )?;
        tx.execute("DELETE FROM AttributeRecords WHERE analysisRecordId = ?1", params![id])?;
        tx.execute("DELETE FROM DataPointRecords WHERE analysisRecordId = ?1", params![id])?;
        tx.execute("DELETE FROM AnalysisRecords WHERE id = ?1", params![id])?;
        tx.commit()?;
        info!(id, "removed analysis");
        Ok(())
    }

    /// Drops every data point result and marks the analysis results invalid.
    pub fn invalidate_results(&mut self, id: i64) -> ProjectResult<()> {
        self.analysis(id)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM AttributeRecords WHERE dataPointRecordId IN \
             (SELECT id FROM DataPointRecords WHERE analysisRecordId = ?1)",
            params![id],
        )?;
        tx.execute(
            "UPDATE DataPointRecords SET complete = 0, failed = 0 WHERE analysisRecordId = ?1",
            params![id],
        )?;
        tx.execute(
            "UPDATE AnalysisRecords SET resultsAreInvalid = 1 WHERE id = ?1",
            params![id],
        )?;
        touch(&tx, "AnalysisRecords", id)?;
        tx.commit()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Data points
    // ------------------------------------------------------------------

    pub fn add_data_point(&mut self, analysis_id: i64, name: &str) -> ProjectResult<DataPointRecord> {
        self.analysis(analysis_id)?;
        let tx = self.conn.transaction()?;
        let id = insert_record(
            &tx,
            "DataPointRecords",
            name,
            &["analysisRecordId"],
            &[&analysis_id],
        )?;
        tx.commit()?;
        self.data_point(id)
    }

    pub fn data_point(&self, id: i64) -> ProjectResult<DataPointRecord> {
        self.data_points_where("WHERE id = ?1", params![id])?
            .pop()
            .ok_or(ProjectError::NotFound {
                table: "DataPointRecords",
                id,
            })
    }

    pub fn data_points(&self, analysis_id: i64) -> ProjectResult<Vec<DataPointRecord>> {
        self.data_points_where("WHERE analysisRecordId = ?1", params![analysis_id])
    }

    fn data_points_where(&self, filter: &str, args: impl rusqlite::Params) -> ProjectResult<Vec<DataPointRecord>> {
        let sql = format!(
            "SELECT {BASE_SELECT}, analysisRecordId, complete, failed, selected, runType, \
             directory FROM DataPointRecords {filter} ORDER BY id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(args, |row| {
            Ok(DataPointRecord {
                base: RecordBase::from_row(row)?,
                analysis_id: row.get(8)?,
                status: DataPointRecord::status_of(row.get(9)?, row.get(10)?),
                selected: row.get(11)?,
                run_type: row.get(12)?,
                directory: row.get(13)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn set_data_point_status(&mut self, id: i64, status: DataPointStatus) -> ProjectResult<()> {
        let (complete, failed) = match status {
            DataPointStatus::Pending => (false, false),
            DataPointStatus::Complete => (true, false),
            DataPointStatus::Failed => (true, true),
        };
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE DataPointRecords SET complete = ?1, failed = ?2 WHERE id = ?3",
            params![complete, failed, id],
        )?;
        touch(&tx, "DataPointRecords", id)?;
        // Results are valid again once every point of the analysis has run.
        tx.execute(
            "UPDATE AnalysisRecords SET resultsAreInvalid = 0 \
             WHERE id = (SELECT analysisRecordId FROM DataPointRecords WHERE id = ?1) \
             AND NOT EXISTS (SELECT 1 FROM DataPointRecords WHERE complete = 0 AND \
             analysisRecordId = (SELECT analysisRecordId FROM DataPointRecords WHERE id = ?1))",
            params![id],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn mark_data_point_complete(&mut self, id: i64) -> ProjectResult<()> {
        self.set_data_point_status(id, DataPointStatus::Complete)
    }

    pub fn mark_data_point_failed(&mut self, id: i64) -> ProjectResult<()> {
        self.set_data_point_status(id, DataPointStatus::Failed)
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Stores `attribute` and its children under `owner`; returns the root row id.
    pub fn save_attribute(&mut self, owner: AttributeOwner, attribute: &Attribute) -> ProjectResult<i64> {
        match owner {
            AttributeOwner::Analysis(id) => self.analysis(id).map(|_| ())?,
            AttributeOwner::DataPoint(id) => self.data_point(id).map(|_| ())?,
        }
        let tx = self.conn.transaction()?;
        let id = insert_attribute(&tx, owner, None, None, attribute)?;
        tx.commit()?;
        Ok(id)
    }

    /// Top-level attributes of `owner`, each with its children restored.
    pub fn attributes(&self, owner: AttributeOwner) -> ProjectResult<Vec<Attribute>> {
        let (column, owner_id) = owner_column(owner);
        let sql = format!(
            "SELECT id, parentAttributeRecordId, attributeVectorIndex, name, displayName, \
             attributeValueType, attributeValue, attributeUnits FROM AttributeRecords \
             WHERE {column} = ?1 ORDER BY id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![owner_id], |row| {
                Ok(StoredAttribute {
                    id: row.get(0)?,
                    parent: row.get(1)?,
                    index: row.get(2)?,
                    name: row.get(3)?,
                    display_name: row.get(4)?,
                    value_type: row.get(5)?,
                    value: row.get(6)?,
                    units: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.iter()
            .filter(|r| r.parent.is_none())
            .map(|r| build_attribute(r, &rows))
            .collect()
    }
}

struct StoredAttribute {
    id: i64,
    parent: Option<i64>,
    index: Option<i64>,
    name: String,
    display_name: String,
    value_type: i64,
    value: Option<String>,
    units: Option<String>,
}

fn owner_column(owner: AttributeOwner) -> (&'static str, i64) {
    match owner {
        AttributeOwner::Analysis(id) => ("analysisRecordId", id),
        AttributeOwner::DataPoint(id) => ("dataPointRecordId", id),
    }
}

fn insert_attribute(
    tx: &Transaction<'_>,
    owner: AttributeOwner,
    parent: Option<i64>,
    index: Option<i64>,
    attribute: &Attribute,
) -> ProjectResult<i64> {
    let (column, owner_id) = owner_column(owner);
    let (value_type, value) = attribute.value.encode();
    let id = insert_record(
        tx,
        "AttributeRecords",
        &attribute.name,
        &[
            column,
            "parentAttributeRecordId",
            "attributeVectorIndex",
            "attributeValueType",
            "attributeValue",
            "attributeUnits",
        ],
        &[&owner_id, &parent, &index, &value_type, &value, &attribute.units],
    )?;
    if let Some(display_name) = &attribute.display_name {
        tx.execute(
            "UPDATE AttributeRecords SET displayName = ?1 WHERE id = ?2",
            params![display_name, id],
        )?;
    }
    if let AttributeValue::Vector(children) = &attribute.value {
        for (i, child) in children.iter().enumerate() {
            insert_attribute(tx, owner, Some(id), Some(i as i64), child)?;
        }
    }
    Ok(id)
}

fn build_attribute(row: &StoredAttribute, all: &[StoredAttribute]) -> ProjectResult<Attribute> {
    let mut value = AttributeValue::decode(row.value_type, row.value.as_deref())?;
    if let AttributeValue::Vector(children) = &mut value {
        let mut rows: Vec<&StoredAttribute> = all.iter().filter(|r| r.parent == Some(row.id)).collect();
        rows.sort_by_key(|r| r.index);
        for child in rows {
            children.push(build_attribute(child, all)?);
        }
    }
    Ok(Attribute {
        display_name: (row.display_name != row.name).then(|| row.display_name.clone()),
        name: row.name.clone(),
        value,
        units: row.units.clone(),
    })
}
