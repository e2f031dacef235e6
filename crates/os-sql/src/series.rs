//! Reporting frequencies and time series values.

use core::fmt;
use core::str::FromStr;

use serde::Serialize;

/// How often a variable was written, finest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ReportingFrequency {
    Detailed,
    Timestep,
    Hourly,
    Daily,
    Monthly,
    RunPeriod,
    Annual,
}

impl ReportingFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportingFrequency::Detailed => "Detailed",
            ReportingFrequency::Timestep => "Timestep",
            ReportingFrequency::Hourly => "Hourly",
            ReportingFrequency::Daily => "Daily",
            ReportingFrequency::Monthly => "Monthly",
            ReportingFrequency::RunPeriod => "RunPeriod",
            ReportingFrequency::Annual => "Annual",
        }
    }
}

impl fmt::Display for ReportingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportingFrequency {
    type Err = String;

    /// Accepts both the names above and the labels EnergyPlus writes
    /// (`HVAC System Timestep`, `Zone Timestep`, `Run Period`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        Ok(match key.as_str() {
            "detailed" | "hvacsystemtimestep" | "eachcall" => ReportingFrequency::Detailed,
            "timestep" | "zonetimestep" => ReportingFrequency::Timestep,
            "hourly" => ReportingFrequency::Hourly,
            "daily" => ReportingFrequency::Daily,
            "monthly" => ReportingFrequency::Monthly,
            "runperiod" | "environment" => ReportingFrequency::RunPeriod,
            "annual" => ReportingFrequency::Annual,
            _ => return Err(format!("unknown reporting frequency '{s}'")),
        })
    }
}

/// One reported value; the time stamp is the end of its interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimePoint {
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub variable: String,
    pub key_value: String,
    pub units: String,
    pub frequency: ReportingFrequency,
    pub points: Vec<TimePoint>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    pub fn max(&self) -> Option<f64> {
        self.points.iter().map(|p| p.value).reduce(f64::max)
    }

    pub fn min(&self) -> Option<f64> {
        self.points.iter().map(|p| p.value).reduce(f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energyplus_labels_parse() {
        assert_eq!(
            "HVAC System Timestep".parse::<ReportingFrequency>().unwrap(),
            ReportingFrequency::Detailed
        );
        assert_eq!(
            "Zone Timestep".parse::<ReportingFrequency>().unwrap(),
            ReportingFrequency::Timestep
        );
        assert_eq!(
            "Run Period".parse::<ReportingFrequency>().unwrap(),
            ReportingFrequency::RunPeriod
        );
        assert!("Fortnightly".parse::<ReportingFrequency>().is_err());
    }

    #[test]
    fn frequencies_order_finest_first() {
        assert!(ReportingFrequency::Detailed < ReportingFrequency::Hourly);
        assert!(ReportingFrequency::Monthly < ReportingFrequency::Annual);
    }

    #[test]
    fn empty_series_has_no_extremes() {
        let series = TimeSeries {
            variable: "Site Outdoor Air Drybulb Temperature".into(),
            key_value: "Environment".into(),
            units: "C".into(),
            frequency: ReportingFrequency::Hourly,
            points: Vec::new(),
        };
        assert!(series.is_empty());
        assert_eq!(series.max(), None);
        assert_eq!(series.total(), 0.0);
    }
}
