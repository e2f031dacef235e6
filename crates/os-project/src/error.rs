pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Database error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database schema version {found} is newer than the supported version {supported}")]
    NewerSchema { found: u32, supported: u32 },

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("No {table} record with id {id}")]
    NotFound { table: &'static str, id: i64 },

    #[error("Invalid value: {what}")]
    InvalidValue { what: String },
}
