//! Schedules: type limits, constant, day, week and year schedules.
//!
//! - [`ScheduleDay`]: (until time, value) pairs, last time always 24:00
//! - [`ScheduleWeek`]: one day schedule per day type
//! - [`ScheduleYear`]: (end date, week) pairs sorted by date
//! - [`Schedule`]: the schedules loads may point at

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use os_core::{ObjectId, format_real};

use crate::error::{ModelError, ModelResult};
use crate::fields::{schedule_constant, schedule_day, schedule_type_limits, schedule_week, schedule_year};
use crate::model::Model;
use crate::object::{ModelObject, model_object};
use crate::site::{BASE_YEAR, check_month_day};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Shared by every schedule type that carries limits.
const LIMITS_FIELD: usize = 2;
const _: () = assert!(
    schedule_constant::SCHEDULE_TYPE_LIMITS_NAME == LIMITS_FIELD
        && schedule_day::SCHEDULE_TYPE_LIMITS_NAME == LIMITS_FIELD
        && schedule_year::SCHEDULE_TYPE_LIMITS_NAME == LIMITS_FIELD
);

fn limits_of(model: &Model, id: ObjectId) -> Option<ScheduleTypeLimits> {
    model
        .workspace()
        .get_target(id, LIMITS_FIELD)
        .map(ScheduleTypeLimits::from_id_unchecked)
}

fn set_limits(model: &mut Model, id: ObjectId, limits: ScheduleTypeLimits) -> ModelResult<()> {
    Ok(model
        .workspace_mut()
        .set_pointer(id, LIMITS_FIELD, limits.id())?)
}

fn reset_limits(model: &mut Model, id: ObjectId) -> ModelResult<()> {
    Ok(model.workspace_mut().set_empty(id, LIMITS_FIELD)?)
}

fn schedule_error(model: &Model, id: ObjectId, message: impl Into<String>) -> ModelError {
    let name = model.workspace().name(id).unwrap_or_default();
    ModelError::Schedule(format!("{name}: {}", message.into()))
}

// ----------------------------------------------------------------------
// Type limits
// ----------------------------------------------------------------------

model_object!(
    /// Bounds, numeric type and unit type shared by schedules.
    ScheduleTypeLimits => "OS:ScheduleTypeLimits"
);

impl ScheduleTypeLimits {
    pub fn new(model: &mut Model, name: &str) -> ModelResult<Self> {
        model.create(Some(name))
    }

    pub fn lower_limit_value(self, model: &Model) -> Option<f64> {
        model
            .workspace()
            .get_double(self.id(), schedule_type_limits::LOWER_LIMIT_VALUE)
    }

    pub fn set_lower_limit_value(self, model: &mut Model, value: Option<f64>) -> ModelResult<()> {
        self.set_optional(model, schedule_type_limits::LOWER_LIMIT_VALUE, value)
    }

    pub fn upper_limit_value(self, model: &Model) -> Option<f64> {
        model
            .workspace()
            .get_double(self.id(), schedule_type_limits::UPPER_LIMIT_VALUE)
    }

    pub fn set_upper_limit_value(self, model: &mut Model, value: Option<f64>) -> ModelResult<()> {
        self.set_optional(model, schedule_type_limits::UPPER_LIMIT_VALUE, value)
    }

    fn set_optional(self, model: &mut Model, index: usize, value: Option<f64>) -> ModelResult<()> {
        let ws = model.workspace_mut();
        match value {
            Some(v) => ws.set_double(self.id(), index, v)?,
            None => ws.set_empty(self.id(), index)?,
        }
        Ok(())
    }

    /// `Continuous`, `Discrete`, or `None` when unspecified.
    pub fn numeric_type(self, model: &Model) -> Option<String> {
        model
            .workspace()
            .get_string(self.id(), schedule_type_limits::NUMERIC_TYPE)
    }

    pub fn set_numeric_type(self, model: &mut Model, value: &str) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_string(self.id(), schedule_type_limits::NUMERIC_TYPE, value)?)
    }

    pub fn is_discrete(self, model: &Model) -> bool {
        self.numeric_type(model)
            .is_some_and(|t| t.eq_ignore_ascii_case("Discrete"))
    }

    pub fn unit_type(self, model: &Model) -> String {
        model
            .workspace()
            .get_string_or_default(self.id(), schedule_type_limits::UNIT_TYPE)
            .unwrap_or_else(|| "Dimensionless".into())
    }

    pub fn set_unit_type(self, model: &mut Model, value: &str) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_string(self.id(), schedule_type_limits::UNIT_TYPE, value)?)
    }

    /// Within the bounds, and integral when discrete.
    pub fn allows(self, model: &Model, value: f64) -> bool {
        let above = self.lower_limit_value(model).is_none_or(|l| value >= l);
        let below = self.upper_limit_value(model).is_none_or(|u| value <= u);
        let integral = !self.is_discrete(model) || value.fract() == 0.0;
        above && below && integral
    }
}

// ----------------------------------------------------------------------
// Constant
// ----------------------------------------------------------------------

model_object!(ScheduleConstant => "OS:Schedule:Constant");

impl ScheduleConstant {
    pub fn new(model: &mut Model, value: f64) -> ModelResult<Self> {
        let s: ScheduleConstant = model.create(None)?;
        if let Err(e) = s.set_value(model, value) {
            model.workspace_mut().remove_object(s.id())?;
            return Err(e);
        }
        Ok(s)
    }

    pub fn value(self, model: &Model) -> f64 {
        model
            .workspace()
            .get_double(self.id(), schedule_constant::VALUE)
            .unwrap_or(0.0)
    }

    pub fn set_value(self, model: &mut Model, value: f64) -> ModelResult<()> {
        if let Some(limits) = self.schedule_type_limits(model)
            && !limits.allows(model, value)
        {
            return Err(schedule_error(model, self.id(), format!("{value} is outside its type limits")));
        }
        Ok(model
            .workspace_mut()
            .set_double(self.id(), schedule_constant::VALUE, value)?)
    }

    pub fn schedule_type_limits(self, model: &Model) -> Option<ScheduleTypeLimits> {
        limits_of(model, self.id())
    }
}

// ----------------------------------------------------------------------
// Day
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    #[default]
    No,
    Average,
    Linear,
}

impl Interpolation {
    pub fn as_str(self) -> &'static str {
        match self {
            Interpolation::No => "No",
            Interpolation::Average => "Average",
            Interpolation::Linear => "Linear",
        }
    }

    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "average" => Interpolation::Average,
            "linear" => Interpolation::Linear,
            _ => Interpolation::No,
        }
    }
}

fn to_minutes(time: TimeDelta) -> i64 {
    (time.num_seconds() as f64 / 60.0).round() as i64
}

model_object!(
    /// One day of values. Each value holds until its time; the last time is 24:00.
    ScheduleDay => "OS:Schedule:Day"
);

impl ScheduleDay {
    /// New day schedule holding `value` all day.
    pub fn new(model: &mut Model, value: f64) -> ModelResult<Self> {
        let d: ScheduleDay = model.create(None)?;
        if let Err(e) = d.write(model, &[(MINUTES_PER_DAY, value)]) {
            model.workspace_mut().remove_object(d.id())?;
            return Err(e);
        }
        Ok(d)
    }

    fn entries(self, model: &Model) -> Vec<(i64, f64)> {
        let ws = model.workspace();
        let mut out: Vec<(i64, f64)> = (0..ws.num_extensible_groups(self.id()))
            .filter_map(|g| {
                let group = ws.extensible_group(self.id(), g)?;
                let num = |i: usize| -> Option<f64> { group.get(i)?.as_deref()?.trim().parse().ok() };
                let minutes = (num(0)? * 60.0 + num(1)?).round() as i64;
                Some((minutes, num(2)?))
            })
            .collect();
        out.sort_by_key(|&(m, _)| m);
        out
    }

    fn write(self, model: &mut Model, entries: &[(i64, f64)]) -> ModelResult<()> {
        let ws = model.workspace_mut();
        ws.clear_extensible_groups(self.id())?;
        for &(minutes, value) in entries {
            let (h, m) = (minutes / 60, minutes % 60);
            let (h, m, v) = (h.to_string(), m.to_string(), format_real(value));
            ws.push_extensible_group(self.id(), &[&h, &m, &v])?;
        }
        Ok(())
    }

    /// (until time, value) pairs in time order.
    pub fn values(self, model: &Model) -> Vec<(TimeDelta, f64)> {
        self.entries(model)
            .into_iter()
            .map(|(m, v)| (TimeDelta::minutes(m), v))
            .collect()
    }

    /// Set the value that holds until `until`; an existing time is replaced.
    /// Times are rounded to the minute and must lie in (0, 24h].
    pub fn add_value(self, model: &mut Model, until: TimeDelta, value: f64) -> ModelResult<()> {
        let minutes = to_minutes(until);
        if minutes <= 0 || minutes > MINUTES_PER_DAY {
            return Err(schedule_error(
                model,
                self.id(),
                format!("time {minutes} min is outside (0, 24:00]"),
            ));
        }
        if !value.is_finite() {
            return Err(schedule_error(model, self.id(), "values must be finite"));
        }
        if let Some(limits) = self.schedule_type_limits(model)
            && !limits.allows(model, value)
        {
            return Err(schedule_error(model, self.id(), format!("{value} is outside its type limits")));
        }

        let mut entries = self.entries(model);
        match entries.binary_search_by_key(&minutes, |&(m, _)| m) {
            Ok(i) => entries[i].1 = value,
            Err(i) => entries.insert(i, (minutes, value)),
        }
        if entries.last().is_none_or(|&(m, _)| m != MINUTES_PER_DAY) {
            entries.push((MINUTES_PER_DAY, value));
        }
        self.write(model, &entries)
    }

    /// Remove the value at `until`. The 24:00 value stays.
    pub fn remove_value(self, model: &mut Model, until: TimeDelta) -> ModelResult<Option<f64>> {
        let minutes = to_minutes(until);
        if minutes == MINUTES_PER_DAY {
            return Ok(None);
        }
        let mut entries = self.entries(model);
        let Ok(i) = entries.binary_search_by_key(&minutes, |&(m, _)| m) else {
            return Ok(None);
        };
        let (_, removed) = entries.remove(i);
        self.write(model, &entries)?;
        Ok(Some(removed))
    }

    /// Keep only the 24:00 value, set to 0.
    pub fn clear_values(self, model: &mut Model) -> ModelResult<()> {
        self.write(model, &[(MINUTES_PER_DAY, 0.0)])
    }

    pub fn interpolation(self, model: &Model) -> Interpolation {
        model
            .workspace()
            .get_string_or_default(self.id(), schedule_day::INTERPOLATE_TO_TIMESTEP)
            .map_or(Interpolation::No, |t| Interpolation::parse(&t))
    }

    pub fn set_interpolation(self, model: &mut Model, value: Interpolation) -> ModelResult<()> {
        Ok(model.workspace_mut().set_string(
            self.id(),
            schedule_day::INTERPOLATE_TO_TIMESTEP,
            value.as_str(),
        )?)
    }

    /// Value at `time` after midnight; linear interpolation when set to `Linear`.
    pub fn value_at(self, model: &Model, time: TimeDelta) -> Option<f64> {
        let entries = self.entries(model);
        let t = time.num_seconds() as f64 / 60.0;
        let i = entries
            .iter()
            .position(|&(m, _)| m as f64 >= t)
            .unwrap_or(entries.len().checked_sub(1)?);
        let (until, value) = entries[i];
        if self.interpolation(model) != Interpolation::Linear || i == 0 {
            return Some(value);
        }
        let (from, previous) = entries[i - 1];
        let span = (until - from) as f64;
        let frac = ((t - from as f64) / span).clamp(0.0, 1.0);
        Some(previous + (value - previous) * frac)
    }

    pub fn schedule_type_limits(self, model: &Model) -> Option<ScheduleTypeLimits> {
        limits_of(model, self.id())
    }

    pub fn set_schedule_type_limits(self, model: &mut Model, limits: ScheduleTypeLimits) -> ModelResult<()> {
        if let Some((_, v)) = self.entries(model).into_iter().find(|&(_, v)| !limits.allows(model, v)) {
            return Err(schedule_error(model, self.id(), format!("{v} is outside the new type limits")));
        }
        set_limits(model, self.id(), limits)
    }

    pub fn reset_schedule_type_limits(self, model: &mut Model) -> ModelResult<()> {
        reset_limits(model, self.id())
    }
}

// ----------------------------------------------------------------------
// Week
// ----------------------------------------------------------------------

/// Day types of a week schedule, in field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayType {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Holiday,
    SummerDesignDay,
    WinterDesignDay,
    CustomDay1,
    CustomDay2,
}

impl DayType {
    pub const ALL: [DayType; 12] = [
        DayType::Sunday,
        DayType::Monday,
        DayType::Tuesday,
        DayType::Wednesday,
        DayType::Thursday,
        DayType::Friday,
        DayType::Saturday,
        DayType::Holiday,
        DayType::SummerDesignDay,
        DayType::WinterDesignDay,
        DayType::CustomDay1,
        DayType::CustomDay2,
    ];

    pub const WEEKDAYS: [DayType; 5] = [
        DayType::Monday,
        DayType::Tuesday,
        DayType::Wednesday,
        DayType::Thursday,
        DayType::Friday,
    ];

    pub const WEEKENDS: [DayType; 2] = [DayType::Saturday, DayType::Sunday];

    pub fn field_index(self) -> usize {
        schedule_week::SUNDAY + self as usize
    }

    pub fn from_weekday(day: Weekday) -> Self {
        match day {
            Weekday::Sun => DayType::Sunday,
            Weekday::Mon => DayType::Monday,
            Weekday::Tue => DayType::Tuesday,
            Weekday::Wed => DayType::Wednesday,
            Weekday::Thu => DayType::Thursday,
            Weekday::Fri => DayType::Friday,
            Weekday::Sat => DayType::Saturday,
        }
    }
}

model_object!(ScheduleWeek => "OS:Schedule:Week");

impl ScheduleWeek {
    pub fn new(model: &mut Model) -> ModelResult<Self> {
        model.create(None)
    }

    pub fn day_schedule(self, model: &Model, day: DayType) -> Option<ScheduleDay> {
        model
            .workspace()
            .get_target(self.id(), day.field_index())
            .map(ScheduleDay::from_id_unchecked)
    }

    pub fn set_day_schedule(self, model: &mut Model, day: DayType, schedule: ScheduleDay) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_pointer(self.id(), day.field_index(), schedule.id())?)
    }

    fn set_many(self, model: &mut Model, days: &[DayType], schedule: ScheduleDay) -> ModelResult<()> {
        for &day in days {
            self.set_day_schedule(model, day, schedule)?;
        }
        Ok(())
    }

    /// Every day type, holidays and design days included.
    pub fn set_all(self, model: &mut Model, schedule: ScheduleDay) -> ModelResult<()> {
        self.set_many(model, &DayType::ALL, schedule)
    }

    pub fn set_weekdays(self, model: &mut Model, schedule: ScheduleDay) -> ModelResult<()> {
        self.set_many(model, &DayType::WEEKDAYS, schedule)
    }

    pub fn set_weekends(self, model: &mut Model, schedule: ScheduleDay) -> ModelResult<()> {
        self.set_many(model, &DayType::WEEKENDS, schedule)
    }

    /// Distinct day schedules, in day-type order.
    pub fn day_schedules(self, model: &Model) -> Vec<ScheduleDay> {
        let mut out = Vec::new();
        for day in DayType::ALL {
            if let Some(d) = self.day_schedule(model, day)
                && !out.contains(&d)
            {
                out.push(d);
            }
        }
        out
    }
}

// ----------------------------------------------------------------------
// Year
// ----------------------------------------------------------------------

model_object!(
    /// Week schedules by end date. Dates use [`BASE_YEAR`].
    ScheduleYear => "OS:Schedule:Year"
);

impl ScheduleYear {
    pub fn new(model: &mut Model) -> ModelResult<Self> {
        model.create(None)
    }

    /// (end date, week) pairs in stored order.
    pub fn weeks(self, model: &Model) -> Vec<(NaiveDate, ScheduleWeek)> {
        let ws = model.workspace();
        let first = schedule_year::FIRST_MONTH;
        (0..ws.num_extensible_groups(self.id()))
            .filter_map(|g| {
                let start = first + 3 * g;
                let month = u32::try_from(ws.get_int(self.id(), start)?).ok()?;
                let day = u32::try_from(ws.get_int(self.id(), start + 1)?).ok()?;
                let week = ws.get_target(self.id(), start + 2)?;
                let date = NaiveDate::from_ymd_opt(BASE_YEAR, month, day)?;
                Some((date, ScheduleWeek::from_id_unchecked(week)))
            })
            .collect()
    }

    fn write(self, model: &mut Model, weeks: &[(NaiveDate, ScheduleWeek)]) -> ModelResult<()> {
        let mut groups = Vec::with_capacity(weeks.len());
        for &(date, week) in weeks {
            let handle = week
                .handle(model)
                .ok_or(ModelError::NotInModel(week.id()))?
                .to_string();
            groups.push((date.month().to_string(), date.day().to_string(), handle));
        }
        let ws = model.workspace_mut();
        ws.clear_extensible_groups(self.id())?;
        for (m, d, h) in &groups {
            ws.push_extensible_group(self.id(), &[m, d, h])?;
        }
        Ok(())
    }

    /// Use `week` through `until` (inclusive); an existing end date is replaced.
    pub fn add_week(self, model: &mut Model, until: NaiveDate, week: ScheduleWeek) -> ModelResult<()> {
        let until = check_month_day(until.month(), until.day())?;
        let mut weeks = self.weeks(model);
        weeks.sort_by_key(|&(d, _)| d);
        match weeks.binary_search_by_key(&until, |&(d, _)| d) {
            Ok(i) => weeks[i].1 = week,
            Err(i) => weeks.insert(i, (until, week)),
        }
        self.write(model, &weeks)
    }

    pub fn clear_weeks(self, model: &mut Model) -> ModelResult<()> {
        Ok(model.workspace_mut().clear_extensible_groups(self.id())?)
    }

    /// End dates strictly increasing, the last one Dec 31.
    pub fn check_coverage(self, model: &Model) -> ModelResult<()> {
        let weeks = self.weeks(model);
        if weeks.len() != model.workspace().num_extensible_groups(self.id()) {
            return Err(schedule_error(model, self.id(), "has an incomplete week entry"));
        }
        let Some(&(last, _)) = weeks.last() else {
            return Err(schedule_error(model, self.id(), "has no weeks"));
        };
        if let Some(pair) = weeks.windows(2).find(|w| w[0].0 >= w[1].0) {
            return Err(schedule_error(
                model,
                self.id(),
                format!("end dates out of order at {}", pair[1].0.format("%m/%d")),
            ));
        }
        if (last.month(), last.day()) != (12, 31) {
            return Err(schedule_error(
                model,
                self.id(),
                format!("last end date is {}, not 12/31", last.format("%m/%d")),
            ));
        }
        Ok(())
    }

    pub fn week_at(self, model: &Model, date: NaiveDate) -> Option<ScheduleWeek> {
        let date = NaiveDate::from_ymd_opt(BASE_YEAR, date.month(), date.day())?;
        self.weeks(model)
            .into_iter()
            .find(|&(end, _)| end >= date)
            .map(|(_, w)| w)
    }

    /// Value on `date` at `time` after midnight, using the weekday of `date`.
    pub fn value_at(self, model: &Model, date: NaiveDate, time: TimeDelta) -> Option<f64> {
        let week = self.week_at(model, date)?;
        week.day_schedule(model, DayType::from_weekday(date.weekday()))?
            .value_at(model, time)
    }

    pub fn schedule_type_limits(self, model: &Model) -> Option<ScheduleTypeLimits> {
        limits_of(model, self.id())
    }

    fn day_schedules(self, model: &Model) -> Vec<ScheduleDay> {
        let mut out = Vec::new();
        for (_, week) in self.weeks(model) {
            for d in week.day_schedules(model) {
                if !out.contains(&d) {
                    out.push(d);
                }
            }
        }
        out
    }
}

// ----------------------------------------------------------------------
// Schedules loads point at
// ----------------------------------------------------------------------

/// A schedule usable by loads (the `ScheduleNames` reference list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schedule {
    Constant(ScheduleConstant),
    Year(ScheduleYear),
}

impl Schedule {
    pub fn from_id(model: &Model, id: ObjectId) -> Option<Self> {
        ScheduleConstant::from_id(model, id)
            .map(Schedule::Constant)
            .or_else(|| ScheduleYear::from_id(model, id).map(Schedule::Year))
    }

    pub fn id(self) -> ObjectId {
        match self {
            Schedule::Constant(s) => s.id(),
            Schedule::Year(s) => s.id(),
        }
    }

    pub fn name(self, model: &Model) -> Option<String> {
        model.workspace().name(self.id()).map(str::to_string)
    }

    pub fn schedule_type_limits(self, model: &Model) -> Option<ScheduleTypeLimits> {
        limits_of(model, self.id())
    }

    /// Assign limits every value of the schedule satisfies.
    pub fn set_schedule_type_limits(self, model: &mut Model, limits: ScheduleTypeLimits) -> ModelResult<()> {
        if let Some(v) = self.values(model).into_iter().find(|&v| !limits.allows(model, v)) {
            return Err(schedule_error(model, self.id(), format!("{v} is outside the new type limits")));
        }
        set_limits(model, self.id(), limits)
    }

    pub fn reset_schedule_type_limits(self, model: &mut Model) -> ModelResult<()> {
        reset_limits(model, self.id())
    }

    /// Every value the schedule can take.
    pub fn values(self, model: &Model) -> Vec<f64> {
        match self {
            Schedule::Constant(s) => vec![s.value(model)],
            Schedule::Year(s) => s
                .day_schedules(model)
                .into_iter()
                .flat_map(|d| d.values(model).into_iter().map(|(_, v)| v))
                .collect(),
        }
    }
}

impl From<ScheduleConstant> for Schedule {
    fn from(s: ScheduleConstant) -> Self {
        Schedule::Constant(s)
    }
}

impl From<ScheduleYear> for Schedule {
    fn from(s: ScheduleYear) -> Self {
        Schedule::Year(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: i64, m: i64) -> TimeDelta {
        TimeDelta::hours(h) + TimeDelta::minutes(m)
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(BASE_YEAR, m, d).unwrap()
    }

    #[test]
    fn day_values_stay_sorted_and_end_at_midnight() {
        let mut model = Model::new();
        let day = ScheduleDay::new(&mut model, 0.0).unwrap();
        day.add_value(&mut model, hm(18, 0), 1.0).unwrap();
        day.add_value(&mut model, hm(8, 0), 0.2).unwrap();
        day.add_value(&mut model, hm(18, 0), 0.9).unwrap();

        let values = day.values(&model);
        assert_eq!(
            values,
            vec![(hm(8, 0), 0.2), (hm(18, 0), 0.9), (hm(24, 0), 0.0)]
        );
        assert_eq!(day.value_at(&model, hm(7, 59)), Some(0.2));
        assert_eq!(day.value_at(&model, hm(12, 0)), Some(0.9));
        assert_eq!(day.value_at(&model, hm(23, 0)), Some(0.0));
    }

    #[test]
    fn day_rejects_times_outside_the_day() {
        let mut model = Model::new();
        let day = ScheduleDay::new(&mut model, 1.0).unwrap();
        assert!(day.add_value(&mut model, hm(0, 0), 1.0).is_err());
        assert!(day.add_value(&mut model, hm(24, 1), 1.0).is_err());
        assert!(day.add_value(&mut model, hm(3, 0), f64::NAN).is_err());
        assert_eq!(day.remove_value(&mut model, hm(24, 0)).unwrap(), None);
        assert_eq!(day.values(&model).len(), 1);
    }

    #[test]
    fn linear_interpolation() {
        let mut model = Model::new();
        let day = ScheduleDay::new(&mut model, 10.0).unwrap();
        day.add_value(&mut model, hm(12, 0), 0.0).unwrap();
        day.set_interpolation(&mut model, Interpolation::Linear).unwrap();
        assert_eq!(day.value_at(&model, hm(6, 0)), Some(0.0));
        let v = day.value_at(&model, hm(18, 0)).unwrap();
        assert!((v - 5.0).abs() < 1e-12);
    }

    #[test]
    fn week_helpers_fill_day_types() {
        let mut model = Model::new();
        let work = ScheduleDay::new(&mut model, 1.0).unwrap();
        let off = ScheduleDay::new(&mut model, 0.0).unwrap();
        let week = ScheduleWeek::new(&mut model).unwrap();
        week.set_all(&mut model, off).unwrap();
        week.set_weekdays(&mut model, work).unwrap();

        assert_eq!(week.day_schedule(&model, DayType::Monday), Some(work));
        assert_eq!(week.day_schedule(&model, DayType::Sunday), Some(off));
        assert_eq!(week.day_schedule(&model, DayType::Holiday), Some(off));
        assert_eq!(week.day_schedules(&model), vec![off, work]);
    }

    #[test]
    fn year_keeps_weeks_sorted_and_checks_coverage() {
        let mut model = Model::new();
        let day = ScheduleDay::new(&mut model, 1.0).unwrap();
        let summer = ScheduleWeek::new(&mut model).unwrap();
        let winter = ScheduleWeek::new(&mut model).unwrap();
        summer.set_all(&mut model, day).unwrap();
        winter.set_all(&mut model, day).unwrap();

        let year = ScheduleYear::new(&mut model).unwrap();
        assert!(year.check_coverage(&model).is_err());
        year.add_week(&mut model, date(12, 31), winter).unwrap();
        year.add_week(&mut model, date(3, 31), winter).unwrap();
        year.add_week(&mut model, date(9, 30), summer).unwrap();
        year.check_coverage(&model).unwrap();

        let dates: Vec<NaiveDate> = year.weeks(&model).into_iter().map(|(d, _)| d).collect();
        assert_eq!(dates, vec![date(3, 31), date(9, 30), date(12, 31)]);
        assert_eq!(year.week_at(&model, date(6, 1)), Some(summer));

        year.add_week(&mut model, date(9, 30), winter).unwrap();
        assert_eq!(year.weeks(&model).len(), 3);
        assert_eq!(year.week_at(&model, date(6, 1)), Some(winter));
    }

    #[test]
    fn coverage_requires_december_31() {
        let mut model = Model::new();
        let week = ScheduleWeek::new(&mut model).unwrap();
        let year = ScheduleYear::new(&mut model).unwrap();
        year.add_week(&mut model, date(6, 30), week).unwrap();
        assert!(matches!(year.check_coverage(&model), Err(ModelError::Schedule(_))));
    }

    #[test]
    fn limits_bound_constant_values() {
        let mut model = Model::new();
        let limits = ScheduleTypeLimits::new(&mut model, "Fractional").unwrap();
        limits.set_lower_limit_value(&mut model, Some(0.0)).unwrap();
        limits.set_upper_limit_value(&mut model, Some(1.0)).unwrap();
        let sched = ScheduleConstant::new(&mut model, 2.0).unwrap();
        assert!(Schedule::from(sched).set_schedule_type_limits(&mut model, limits).is_err());
        sched.set_value(&mut model, 0.5).unwrap();
        Schedule::from(sched).set_schedule_type_limits(&mut model, limits).unwrap();
        assert!(sched.set_value(&mut model, 1.5).is_err());
        assert_eq!(sched.value(&model), 0.5);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn day_values_sorted_for_any_insertion_order(minutes in prop::collection::vec(1_i64..=1440, 0..12)) {
            let mut model = Model::new();
            let day = ScheduleDay::new(&mut model, 0.0).unwrap();
            for (i, &m) in minutes.iter().enumerate() {
                day.add_value(&mut model, TimeDelta::minutes(m), i as f64).unwrap();
            }

            let times: Vec<TimeDelta> = day.values(&model).into_iter().map(|(t, _)| t).collect();
            prop_assert!(times.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(times.last().copied(), Some(TimeDelta::hours(24)));

            let mut distinct = minutes.clone();
            distinct.push(1440);
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(times.len(), distinct.len());
        }
    }
}
