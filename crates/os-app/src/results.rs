//! EnergyPlus SQL output queries.

use std::path::Path;

use os_sql::{SqlFile, SqlSummary};
use serde::Serialize;

use crate::error::{AppError, AppResult};

pub fn sql_summary(path: &Path) -> AppResult<SqlSummary> {
    let sql = SqlFile::open(path)?;
    Ok(sql.summary()?)
}

/// YAML text of a report, for printing.
pub fn to_yaml<T: Serialize>(value: &T) -> AppResult<String> {
    serde_yaml::to_string(value).map_err(|e| AppError::Serialize(e.to_string()))
}
