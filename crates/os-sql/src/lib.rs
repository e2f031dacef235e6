//! os-sql: read-only access to the EnergyPlus SQL output (`eplusout.sql`).
//!
//! Covers:
//! - the EnergyPlus version that wrote the file
//! - environment periods and the variables reported in each
//! - time series joined from `ReportData`, `Time` and `ReportDataDictionary`
//! - tabular report values and the site/source energy totals built on them

pub mod error;
pub mod file;
pub mod series;

pub use error::{SqlError, SqlResult};
pub use file::{EnvironmentPeriod, SqlFile, SqlSummary, TabularQuery, VariableInfo};
pub use series::{ReportingFrequency, TimePoint, TimeSeries};
