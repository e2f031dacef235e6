//! Schema migrations.
//!
//! Each [`Migration`] runs in its own transaction and records itself in
//! `SchemaVersion`. A database is at the highest version recorded there.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

use crate::error::{ProjectError, ProjectResult};

#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub statements: &'static [&'static str],
}

/// Columns every record table starts with.
macro_rules! base_columns {
    () => {
        "id INTEGER PRIMARY KEY AUTOINCREMENT, \
         handle TEXT NOT NULL UNIQUE, \
         name TEXT NOT NULL, \
         displayName TEXT NOT NULL, \
         description TEXT NOT NULL DEFAULT '', \
         timestampCreate TEXT NOT NULL, \
         timestampLast TEXT NOT NULL, \
         uuidLast TEXT NOT NULL"
    };
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Create record tables",
        statements: &[
            concat!(
                "CREATE TABLE ProjectDatabaseRecords (",
                base_columns!(),
                ", version TEXT NOT NULL, rootDirectory TEXT NOT NULL DEFAULT '')"
            ),
            concat!(
                "CREATE TABLE FileReferenceRecords (",
                base_columns!(),
                ", path TEXT NOT NULL, fileType TEXT NOT NULL, \
                 checksumCreate TEXT NOT NULL, checksumLast TEXT NOT NULL)"
            ),
            concat!(
                "CREATE TABLE AnalysisRecords (",
                base_columns!(),
                ", seedFileReferenceRecordId INTEGER, \
                 resultsAreInvalid BOOLEAN NOT NULL DEFAULT 0, \
                 dataPointsAreInvalid BOOLEAN NOT NULL DEFAULT 0)"
            ),
            concat!(
                "CREATE TABLE DataPointRecords (",
                base_columns!(),
                ", analysisRecordId INTEGER NOT NULL, \
                 complete BOOLEAN NOT NULL DEFAULT 0, \
                 failed BOOLEAN NOT NULL DEFAULT 0, \
                 directory TEXT NOT NULL DEFAULT '')"
            ),
            concat!(
                "CREATE TABLE AttributeRecords (",
                base_columns!(),
                ", analysisRecordId INTEGER, dataPointRecordId INTEGER, \
                 parentAttributeRecordId INTEGER, attributeVectorIndex INTEGER, \
                 attributeValueType INTEGER NOT NULL, attributeValue TEXT, \
                 attributeUnits TEXT)"
            ),
            "CREATE INDEX DataPointRecordsByAnalysis ON DataPointRecords (analysisRecordId)",
            "CREATE INDEX AttributeRecordsByParent ON AttributeRecords (parentAttributeRecordId)",
        ],
    },
    Migration {
        version: 2,
        description: "Track data point selection and run type",
        statements: &[
            "ALTER TABLE DataPointRecords ADD COLUMN selected BOOLEAN NOT NULL DEFAULT 1",
            "ALTER TABLE DataPointRecords ADD COLUMN runType TEXT NOT NULL DEFAULT 'Local'",
        ],
    },
];

pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Highest version recorded; 0 for a new file.
pub fn schema_version(conn: &Connection) -> ProjectResult<u32> {
    ensure_version_table(conn)?;
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM SchemaVersion", [], |row| row.get(0))
        .optional()?
        .flatten();
    Ok(version.unwrap_or(0))
}

pub fn migrate_to_latest(conn: &mut Connection) -> ProjectResult<u32> {
    migrate(conn, MIGRATIONS)
}

/// Applies the migrations above the current version, in order.
///
/// Refuses databases written by a newer schema than `migrations` reaches.
pub fn migrate(conn: &mut Connection, migrations: &[Migration]) -> ProjectResult<u32> {
    let supported = migrations.last().map_or(0, |m| m.version);
    let start = schema_version(conn)?;
    if start > supported {
        return Err(ProjectError::NewerSchema {
            found: start,
            supported,
        });
    }
    let mut current = start;
    for migration in migrations.iter().filter(|m| m.version > start) {
        if migration.version != current + 1 {
            return Err(ProjectError::Migration {
                what: format!("No migration path from version {current}"),
            });
        }
        let tx = conn.transaction()?;
        for statement in migration.statements {
            tx.execute_batch(statement)?;
        }
        tx.execute(
            "INSERT INTO SchemaVersion (version, description, appliedAt) VALUES (?1, ?2, ?3)",
            params![migration.version, migration.description, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
        info!(version = migration.version, description = migration.description, "migrated project database");
        current = migration.version;
    }
    Ok(current)
}

fn ensure_version_table(conn: &Connection) -> ProjectResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS SchemaVersion (\
         version INTEGER PRIMARY KEY, description TEXT NOT NULL, appliedAt TEXT NOT NULL)",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_are_consecutive() {
        for (i, m) in MIGRATIONS.iter().enumerate() {
            assert_eq!(m.version as usize, i + 1);
        }
    }

    #[test]
    fn migrating_twice_is_a_no_op() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(migrate_to_latest(&mut conn).unwrap(), latest_version());
        assert_eq!(migrate_to_latest(&mut conn).unwrap(), latest_version());
        let rows: u32 = conn
            .query_row("SELECT COUNT(*) FROM SchemaVersion", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows as usize, MIGRATIONS.len());
    }

    #[test]
    fn newer_schema_is_refused() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate_to_latest(&mut conn).unwrap();
        let err = migrate(&mut conn, &MIGRATIONS[..1]).unwrap_err();
        assert!(matches!(err, ProjectError::NewerSchema { found: 2, supported: 1 }));
    }

    #[test]
    fn failed_migration_leaves_version_unchanged() {
        const BROKEN: &[Migration] = &[Migration {
            version: 1,
            description: "broken",
            statements: &["CREATE TABLE T (x INTEGER)", "NOT SQL"],
        }];
        let mut conn = Connection::open_in_memory().unwrap();
        assert!(migrate(&mut conn, BROKEN).is_err());
        assert_eq!(schema_version(&conn).unwrap(), 0);
        let tables: u32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'T'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(tables, 0);
    }
}
