//! Site, building and simulation-control objects.

use chrono::NaiveDate;

use crate::error::{ModelError, ModelResult};
use crate::fields::{building, building_story, run_period, site, timestep};
use crate::model::Model;
use crate::object::{ModelObject, model_object};
use crate::zone::Space;

/// Year used to check month/day pairs; not a leap year.
pub const BASE_YEAR: i32 = 2009;

pub(crate) fn check_month_day(month: u32, day: u32) -> ModelResult<NaiveDate> {
    NaiveDate::from_ymd_opt(BASE_YEAR, month, day).ok_or_else(|| ModelError::InvalidValue {
        field: "month/day",
        value: format!("{month}/{day}"),
        reason: "not a calendar date".into(),
    })
}

model_object!(
    /// The building, unique in a model.
    Building => "OS:Building"
);

impl Building {
    pub fn north_axis(self, model: &Model) -> f64 {
        model
            .workspace()
            .get_double_or_default(self.id(), building::NORTH_AXIS)
            .unwrap_or(0.0)
    }

    pub fn set_north_axis(self, model: &mut Model, degrees: f64) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_double(self.id(), building::NORTH_AXIS, degrees)?)
    }

    pub fn standards_building_type(self, model: &Model) -> Option<String> {
        model
            .workspace()
            .get_string(self.id(), building::STANDARDS_BUILDING_TYPE)
    }

    pub fn set_standards_building_type(self, model: &mut Model, value: &str) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_string(self.id(), building::STANDARDS_BUILDING_TYPE, value)?)
    }

    pub fn spaces(self, model: &Model) -> Vec<Space> {
        model.objects()
    }

    /// Floor area of the spaces counted in the total, zone multipliers applied.
    pub fn floor_area(self, model: &Model) -> f64 {
        self.spaces(model)
            .into_iter()
            .filter(|s| s.part_of_total_floor_area(model))
            .map(|s| s.floor_area(model) * f64::from(s.multiplier(model)))
            .sum()
    }
}

model_object!(
    /// Location of the building, unique in a model.
    Site => "OS:Site"
);

impl Site {
    fn double(self, model: &Model, index: usize) -> f64 {
        model
            .workspace()
            .get_double_or_default(self.id(), index)
            .unwrap_or(0.0)
    }

    fn set(self, model: &mut Model, index: usize, value: f64) -> ModelResult<()> {
        Ok(model.workspace_mut().set_double(self.id(), index, value)?)
    }

    pub fn latitude(self, model: &Model) -> f64 {
        self.double(model, site::LATITUDE)
    }

    pub fn set_latitude(self, model: &mut Model, degrees: f64) -> ModelResult<()> {
        self.set(model, site::LATITUDE, degrees)
    }

    pub fn longitude(self, model: &Model) -> f64 {
        self.double(model, site::LONGITUDE)
    }

    pub fn set_longitude(self, model: &mut Model, degrees: f64) -> ModelResult<()> {
        self.set(model, site::LONGITUDE, degrees)
    }

    pub fn time_zone(self, model: &Model) -> f64 {
        self.double(model, site::TIME_ZONE)
    }

    pub fn set_time_zone(self, model: &mut Model, hours: f64) -> ModelResult<()> {
        self.set(model, site::TIME_ZONE, hours)
    }

    pub fn elevation(self, model: &Model) -> f64 {
        self.double(model, site::ELEVATION)
    }

    pub fn set_elevation(self, model: &mut Model, meters: f64) -> ModelResult<()> {
        self.set(model, site::ELEVATION, meters)
    }

    pub fn terrain(self, model: &Model) -> String {
        model
            .workspace()
            .get_string_or_default(self.id(), site::TERRAIN)
            .unwrap_or_else(|| "Suburbs".into())
    }

    pub fn set_terrain(self, model: &mut Model, terrain: &str) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_string(self.id(), site::TERRAIN, terrain)?)
    }
}

model_object!(Timestep => "OS:Timestep");

impl Timestep {
    pub fn number_of_timesteps_per_hour(self, model: &Model) -> u32 {
        model
            .workspace()
            .get_int_or_default(self.id(), timestep::NUMBER_OF_TIMESTEPS_PER_HOUR)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(6)
    }

    pub fn set_number_of_timesteps_per_hour(self, model: &mut Model, n: u32) -> ModelResult<()> {
        Ok(model.workspace_mut().set_int(
            self.id(),
            timestep::NUMBER_OF_TIMESTEPS_PER_HOUR,
            i64::from(n),
        )?)
    }
}

model_object!(
    /// Simulated date range within [`BASE_YEAR`].
    RunPeriod => "OS:RunPeriod"
);

impl RunPeriod {
    fn month_day(self, model: &Model, month: usize, day: usize) -> Option<(u32, u32)> {
        let ws = model.workspace();
        let m = u32::try_from(ws.get_int(self.id(), month)?).ok()?;
        let d = u32::try_from(ws.get_int(self.id(), day)?).ok()?;
        Some((m, d))
    }

    fn set_month_day(
        self,
        model: &mut Model,
        (month_index, day_index): (usize, usize),
        month: u32,
        day: u32,
    ) -> ModelResult<()> {
        check_month_day(month, day)?;
        let ws = model.workspace_mut();
        ws.set_int(self.id(), month_index, i64::from(month))?;
        ws.set_int(self.id(), day_index, i64::from(day))?;
        Ok(())
    }

    pub fn begin(self, model: &Model) -> Option<(u32, u32)> {
        self.month_day(model, run_period::BEGIN_MONTH, run_period::BEGIN_DAY_OF_MONTH)
    }

    pub fn end(self, model: &Model) -> Option<(u32, u32)> {
        self.month_day(model, run_period::END_MONTH, run_period::END_DAY_OF_MONTH)
    }

    pub fn set_begin(self, model: &mut Model, month: u32, day: u32) -> ModelResult<()> {
        self.set_month_day(
            model,
            (run_period::BEGIN_MONTH, run_period::BEGIN_DAY_OF_MONTH),
            month,
            day,
        )
    }

    pub fn set_end(self, model: &mut Model, month: u32, day: u32) -> ModelResult<()> {
        self.set_month_day(
            model,
            (run_period::END_MONTH, run_period::END_DAY_OF_MONTH),
            month,
            day,
        )
    }
}

model_object!(BuildingStory => "OS:BuildingStory");

impl BuildingStory {
    pub fn new(model: &mut Model) -> ModelResult<Self> {
        model.create(None)
    }

    pub fn nominal_z_coordinate(self, model: &Model) -> Option<f64> {
        model
            .workspace()
            .get_double(self.id(), building_story::NOMINAL_Z_COORDINATE)
    }

    pub fn set_nominal_z_coordinate(self, model: &mut Model, z: f64) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_double(self.id(), building_story::NOMINAL_Z_COORDINATE, z)?)
    }

    pub fn nominal_floor_to_floor_height(self, model: &Model) -> Option<f64> {
        model
            .workspace()
            .get_double(self.id(), building_story::NOMINAL_FLOOR_TO_FLOOR_HEIGHT)
    }

    pub fn set_nominal_floor_to_floor_height(self, model: &mut Model, h: f64) -> ModelResult<()> {
        Ok(model.workspace_mut().set_double(
            self.id(),
            building_story::NOMINAL_FLOOR_TO_FLOOR_HEIGHT,
            h,
        )?)
    }

    pub fn spaces(self, model: &Model) -> Vec<Space> {
        model
            .workspace()
            .sources_via_field(self.id(), Space::IDD_TYPE, crate::fields::space::BUILDING_STORY_NAME)
            .into_iter()
            .map(Space::from_id_unchecked)
            .collect()
    }
}
