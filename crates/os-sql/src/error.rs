use std::path::PathBuf;

pub type SqlResult<T> = Result<T, SqlError>;

#[derive(thiserror::Error, Debug)]
pub enum SqlError {
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not an EnergyPlus SQL output file: {path}")]
    NotEnergyPlusOutput { path: PathBuf },

    #[error("Unreadable EnergyPlus version: {text:?}")]
    InvalidVersion { text: String },

    #[error("Unknown environment period: {name}")]
    UnknownEnvironment { name: String },
}
