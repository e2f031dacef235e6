use std::path::{Path, PathBuf};

use os_core::VersionString;
use os_idd::IddFileType;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{SqlError, SqlResult};
use crate::series::{ReportingFrequency, TimePoint, TimeSeries};

/// Oldest EnergyPlus release whose SQL layout is understood.
const OLDEST_SUPPORTED: (u32, u32) = (7, 0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentPeriod {
    pub index: i64,
    pub name: String,
    pub environment_type: Option<i64>,
}

/// A `ReportDataDictionary` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableInfo {
    pub index: i64,
    pub name: String,
    pub key_value: String,
    pub frequency: ReportingFrequency,
    pub units: String,
    pub is_meter: bool,
}

/// Coordinates of one cell in `TabularDataWithStrings`.
#[derive(Debug, Clone, Copy)]
pub struct TabularQuery<'a> {
    pub report: &'a str,
    pub report_for: &'a str,
    pub table: &'a str,
    pub row: &'a str,
    pub column: &'a str,
    pub units: Option<&'a str>,
}

impl<'a> TabularQuery<'a> {
    /// A row of the `Site and Source Energy` table in the annual summary.
    fn site_and_source(row: &'a str) -> Self {
        Self {
            report: "AnnualBuildingUtilityPerformanceSummary",
            report_for: "Entire Facility",
            table: "Site and Source Energy",
            row,
            column: "Total Energy",
            units: Some("GJ"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlSummary {
    pub energyplus_version: String,
    pub supported_version: bool,
    pub environment_periods: Vec<String>,
    pub variable_count: usize,
    pub hours_simulated: Option<f64>,
    pub net_site_energy_gj: Option<f64>,
    pub total_site_energy_gj: Option<f64>,
    pub net_source_energy_gj: Option<f64>,
    pub total_source_energy_gj: Option<f64>,
}

/// An open EnergyPlus SQL output file.
///
/// Environment names, variable names and key values match case-insensitively,
/// as EnergyPlus upper-cases some of them on output.
pub struct SqlFile {
    conn: Connection,
    path: PathBuf,
    energyplus_version: VersionString,
    supported_version: bool,
}

impl std::fmt::Debug for SqlFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlFile")
            .field("path", &self.path)
            .field("energyplus_version", &self.energyplus_version)
            .finish()
    }
}

/// Pulls `9.4.0-998c4b761e` out of `EnergyPlus, Version 9.4.0-998c4b761e, YMD=...`.
pub(crate) fn parse_energyplus_version(text: &str) -> SqlResult<VersionString> {
    let invalid = || SqlError::InvalidVersion {
        text: text.to_string(),
    };
    let candidate = match text.find("Version") {
        Some(at) => text[at + "Version".len()..]
            .split(',')
            .next()
            .unwrap_or_default(),
        None => text,
    };
    candidate.trim().parse().map_err(|_| invalid())
}

impl SqlFile {
    pub fn open(path: &Path) -> SqlResult<Self> {
        if !path.is_file() {
            return Err(SqlError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

        let has_simulations: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'Simulations'",
            [],
            |row| row.get(0),
        )?;
        if !has_simulations {
            return Err(SqlError::NotEnergyPlusOutput {
                path: path.to_path_buf(),
            });
        }
        let version_text: Option<String> = conn
            .query_row(
                "SELECT EnergyPlusVersion FROM Simulations ORDER BY SimulationIndex LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?
            .flatten();
        let version_text = version_text.ok_or_else(|| SqlError::NotEnergyPlusOutput {
            path: path.to_path_buf(),
        })?;
        let energyplus_version = parse_energyplus_version(&version_text)?;

        let supported_version = is_supported(&energyplus_version);
        if !supported_version {
            warn!(version = %energyplus_version, "using unsupported EnergyPlus version");
        }
        info!(path = %path.display(), version = %energyplus_version, "opened EnergyPlus SQL output");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
            energyplus_version,
            supported_version,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn energyplus_version(&self) -> &VersionString {
        &self.energyplus_version
    }

    /// Whether the writing release lies between 7.0 and the EnergyPlus IDD this
    /// toolkit targets.
    pub fn supported_version(&self) -> bool {
        self.supported_version
    }

    // ------------------------------------------------------------------
    // Environments and variables
    // ------------------------------------------------------------------

    pub fn environment_periods(&self) -> SqlResult<Vec<EnvironmentPeriod>> {
        let mut stmt = self.conn.prepare(
            "SELECT EnvironmentPeriodIndex, EnvironmentName, EnvironmentType \
             FROM EnvironmentPeriods ORDER BY EnvironmentPeriodIndex",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(EnvironmentPeriod {
                index: row.get(0)?,
                name: row.get(1)?,
                environment_type: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn environment_period(&self, name: &str) -> SqlResult<EnvironmentPeriod> {
        self.environment_periods()?
            .into_iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| SqlError::UnknownEnvironment {
                name: name.to_string(),
            })
    }

    /// Dictionary entries with at least one value in `environment`.
    pub fn variables(&self, environment: &str) -> SqlResult<Vec<VariableInfo>> {
        let env = self.environment_period(environment)?;
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT rdd.ReportDataDictionaryIndex, rdd.Name, rdd.KeyValue, \
             rdd.ReportingFrequency, rdd.Units, rdd.IsMeter \
             FROM ReportDataDictionary AS rdd \
             JOIN ReportData AS rd ON rd.ReportDataDictionaryIndex = rdd.ReportDataDictionaryIndex \
             JOIN Time AS t ON t.TimeIndex = rd.TimeIndex \
             WHERE t.EnvironmentPeriodIndex = ?1 \
             ORDER BY rdd.ReportDataDictionaryIndex",
        )?;
        let rows = stmt.query_map(params![env.index], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<bool>>(5)?,
            ))
        })?;

        let mut variables = Vec::new();
        for row in rows {
            let (index, name, key_value, frequency, units, is_meter) = row?;
            match frequency.parse::<ReportingFrequency>() {
                Ok(frequency) => variables.push(VariableInfo {
                    index,
                    name,
                    key_value: key_value.unwrap_or_default(),
                    frequency,
                    units: units.unwrap_or_default(),
                    is_meter: is_meter.unwrap_or(false),
                }),
                Err(e) => debug!(index, "skipping dictionary entry: {e}"),
            }
        }
        Ok(variables)
    }

    pub fn available_reporting_frequencies(&self, environment: &str) -> SqlResult<Vec<ReportingFrequency>> {
        let mut frequencies: Vec<ReportingFrequency> =
            self.variables(environment)?.into_iter().map(|v| v.frequency).collect();
        frequencies.sort();
        frequencies.dedup();
        Ok(frequencies)
    }

    pub fn available_variable_names(
        &self,
        environment: &str,
        frequency: ReportingFrequency,
    ) -> SqlResult<Vec<String>> {
        let mut names: Vec<String> = self
            .variables(environment)?
            .into_iter()
            .filter(|v| v.frequency == frequency)
            .map(|v| v.name)
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    pub fn available_key_values(
        &self,
        environment: &str,
        frequency: ReportingFrequency,
        variable: &str,
    ) -> SqlResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .variables(environment)?
            .into_iter()
            .filter(|v| v.frequency == frequency && v.name.eq_ignore_ascii_case(variable))
            .map(|v| v.key_value)
            .collect();
        keys.sort();
        keys.dedup();
        Ok(keys)
    }

    /// Values of one variable outside warmup days; `None` when nothing matches.
    pub fn time_series(
        &self,
        environment: &str,
        frequency: ReportingFrequency,
        variable: &str,
        key_value: &str,
    ) -> SqlResult<Option<TimeSeries>> {
        let env = self.environment_period(environment)?;
        let Some(info) = self.variables(environment)?.into_iter().find(|v| {
            v.frequency == frequency
                && v.name.eq_ignore_ascii_case(variable)
                && v.key_value.eq_ignore_ascii_case(key_value)
        }) else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT t.Month, t.Day, t.Hour, t.Minute, rd.Value \
             FROM ReportData AS rd JOIN Time AS t ON t.TimeIndex = rd.TimeIndex \
             WHERE rd.ReportDataDictionaryIndex = ?1 AND t.EnvironmentPeriodIndex = ?2 \
             AND (t.WarmupFlag IS NULL OR t.WarmupFlag = 0) \
             ORDER BY t.TimeIndex",
        )?;
        let points = stmt
            .query_map(params![info.index, env.index], |row| {
                Ok(TimePoint {
                    month: row.get::<_, Option<u32>>(0)?.unwrap_or(0),
                    day: row.get::<_, Option<u32>>(1)?.unwrap_or(0),
                    hour: row.get::<_, Option<u32>>(2)?.unwrap_or(0),
                    minute: row.get::<_, Option<u32>>(3)?.unwrap_or(0),
                    value: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(TimeSeries {
            variable: info.name,
            key_value: info.key_value,
            units: info.units,
            frequency: info.frequency,
            points,
        }))
    }

    // ------------------------------------------------------------------
    // Tabular reports
    // ------------------------------------------------------------------

    pub fn tabular_string(&self, query: &TabularQuery<'_>) -> SqlResult<Option<String>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT Value FROM TabularDataWithStrings \
                 WHERE ReportName = ?1 AND ReportForString = ?2 AND TableName = ?3 \
                 AND RowName = ?4 AND ColumnName = ?5 AND (?6 IS NULL OR Units = ?6) \
                 LIMIT 1",
                params![
                    query.report,
                    query.report_for,
                    query.table,
                    query.row,
                    query.column,
                    query.units
                ],
                |row| row.get(0),
            )
            .optional()?
            .flatten();
        Ok(value.map(|v| v.trim().to_string()))
    }

    /// Numeric cell; `None` when the cell is missing or not a number.
    pub fn tabular_value(&self, query: &TabularQuery<'_>) -> SqlResult<Option<f64>> {
        Ok(self
            .tabular_string(query)?
            .and_then(|text| text.parse::<f64>().ok()))
    }

    /// Length of the run period, from the summary report or else from the span of
    /// meter time stamps.
    pub fn hours_simulated(&self) -> SqlResult<Option<f64>> {
        let reported = self.tabular_value(&TabularQuery {
            report: "InputVerificationandResultsSummary",
            report_for: "Entire Facility",
            table: "General",
            row: "Hours Simulated",
            column: "Value",
            units: Some("hrs"),
        })?;
        if reported.is_some() {
            return Ok(reported);
        }
        let computed: Option<f64> = self.conn.query_row(
            "SELECT MAX(t.Hour + (t.SimulationDays - 1) * 24) \
                  - MIN(t.Hour + (t.SimulationDays - 1) * 24) + 1 \
             FROM Time AS t \
             JOIN ReportData AS rd ON rd.TimeIndex = t.TimeIndex \
             JOIN ReportDataDictionary AS rdd \
               ON rdd.ReportDataDictionaryIndex = rd.ReportDataDictionaryIndex \
             WHERE rdd.IsMeter = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(computed)
    }

    /// Net site energy in GJ. Falls back to summing meter data when the tabular
    /// report is missing.
    pub fn net_site_energy(&self) -> SqlResult<Option<f64>> {
        self.warn_partial_year("Net Site Energy")?;
        let tabular = self.tabular_value(&TabularQuery::site_and_source("Net Site Energy"))?;
        if tabular.is_some() {
            return Ok(tabular);
        }
        warn!("tabular results were not found, summing meter data");
        let summed: Option<f64> = self
            .conn
            .query_row(
                "SELECT SUM(rd.Value) / 1000000000.0 \
                 FROM ReportData AS rd \
                 JOIN ReportDataDictionary AS rdd \
                   ON rdd.ReportDataDictionaryIndex = rd.ReportDataDictionaryIndex \
                 WHERE rdd.IsMeter = 1 AND rdd.Name NOT LIKE '%EnergyTransfer%' \
                 GROUP BY rdd.ReportingFrequency LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?
            .flatten();
        Ok(summed)
    }

    pub fn total_site_energy(&self) -> SqlResult<Option<f64>> {
        self.warn_partial_year("Total Site Energy")?;
        self.tabular_value(&TabularQuery::site_and_source("Total Site Energy"))
    }

    pub fn net_source_energy(&self) -> SqlResult<Option<f64>> {
        self.warn_partial_year("Net Source Energy")?;
        self.tabular_value(&TabularQuery::site_and_source("Net Source Energy"))
    }

    pub fn total_source_energy(&self) -> SqlResult<Option<f64>> {
        self.warn_partial_year("Total Source Energy")?;
        self.tabular_value(&TabularQuery::site_and_source("Total Source Energy"))
    }

    fn warn_partial_year(&self, what: &str) -> SqlResult<()> {
        match self.hours_simulated()? {
            None => warn!("reporting {what} with unknown number of simulation hours"),
            Some(hours) if hours != 8760.0 => warn!("reporting {what} with {hours} hrs"),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn summary(&self) -> SqlResult<SqlSummary> {
        let environments = self.environment_periods()?;
        let mut variable_count = 0;
        for env in &environments {
            variable_count += self.variables(&env.name)?.len();
        }
        Ok(SqlSummary {
            energyplus_version: self.energyplus_version.to_string(),
            supported_version: self.supported_version,
            environment_periods: environments.into_iter().map(|e| e.name).collect(),
            variable_count,
            hours_simulated: self.hours_simulated()?,
            net_site_energy_gj: self.net_site_energy()?,
            total_site_energy_gj: self.total_site_energy()?,
            net_source_energy_gj: self.net_source_energy()?,
            total_source_energy_gj: self.total_source_energy()?,
        })
    }
}

fn is_supported(version: &VersionString) -> bool {
    let newest = IddFileType::EnergyPlus.idd().version().parse::<VersionString>().ok();
    let this = (version.major(), version.minor());
    this >= OLDEST_SUPPORTED
        && newest.is_none_or(|newest| this <= (newest.major(), newest.minor()))
}
