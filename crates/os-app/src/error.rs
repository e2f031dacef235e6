//! Error types for the os-app service layer.

use std::path::PathBuf;

/// Wraps the backend crates' errors so front ends deal with a single type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Model error: {0}")]
    Model(String),

    #[error("IDF error: {0}")]
    Idf(String),

    #[error("gbXML error: {0}")]
    GbXml(String),

    #[error("SDD error: {0}")]
    Sdd(String),

    #[error("Version update failed: {0}")]
    Version(String),

    #[error("Project database error: {0}")]
    Project(String),

    #[error("SQL output error: {0}")]
    Sql(String),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Unknown file format: {path}")]
    UnknownFormat { path: PathBuf },

    #[error("Unsupported: {message}")]
    Unsupported { message: String },

    #[error("Model is not valid at {level} strictness ({count} error(s))")]
    Invalid { level: &'static str, count: usize },

    #[error("Failed to serialize output: {0}")]
    Serialize(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<os_model::ModelError> for AppError {
    fn from(err: os_model::ModelError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<os_idf::IdfError> for AppError {
    fn from(err: os_idf::IdfError) -> Self {
        AppError::Idf(err.to_string())
    }
}

impl From<os_gbxml::GbXmlError> for AppError {
    fn from(err: os_gbxml::GbXmlError) -> Self {
        AppError::GbXml(err.to_string())
    }
}

impl From<os_sdd::SddError> for AppError {
    fn from(err: os_sdd::SddError) -> Self {
        AppError::Sdd(err.to_string())
    }
}

impl From<os_osversion::VersionError> for AppError {
    fn from(err: os_osversion::VersionError) -> Self {
        AppError::Version(err.to_string())
    }
}

impl From<os_project::ProjectError> for AppError {
    fn from(err: os_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<os_sql::SqlError> for AppError {
    fn from(err: os_sql::SqlError) -> Self {
        AppError::Sql(err.to_string())
    }
}
