//! EnergyPlus input to model translation.
//!
//! Types are read in dependency order regardless of their order in the file.
//! Each `Zone` becomes a thermal zone holding one space. Surfaces with a
//! `Surface` boundary condition are linked once every surface exists. Site
//! and building shading each land in one shading group of that type.

use std::collections::HashMap;

use chrono::{NaiveDate, TimeDelta};
use os_core::ObjectId;
use os_idd::IddFileType;
use os_idf::{IdfFile, StrictnessLevel, Workspace};
use os_model::{
    BASE_YEAR, BoundaryCondition, Construction, DayType, Interpolation, Lights, LogMessage,
    Material, Model, ModelError, ModelObject, ModelResult, People, Point3d, Schedule,
    ScheduleConstant, ScheduleDay, ScheduleTypeLimits, ScheduleWeek, ScheduleYear,
    ShadingSurface, ShadingSurfaceGroup, ShadingSurfaceType, SimpleGlazing, Space,
    StandardOpaqueMaterial, SubSurface, SubSurfaceType, Surface, SurfaceType, ThermalZone,
    TranslationLog, Vector3d,
};
use tracing::info;

use crate::fields::{
    building, building_surface, construction, fenestration_surface, global_geometry_rules,
    lights, material, people, run_period, schedule_constant, schedule_day_interval,
    schedule_type_limits, schedule_week_daily, schedule_year, shading_detailed, simple_glazing,
    site_location, timestep, version, zone,
};

const CHANNEL: &str = "os_energyplus::reverse";

/// Types read into the model.
const TRANSLATED_TYPES: &[&str] = &[
    "Version",
    "Timestep",
    "Building",
    "GlobalGeometryRules",
    "Site:Location",
    "RunPeriod",
    "ScheduleTypeLimits",
    "Schedule:Day:Interval",
    "Schedule:Week:Daily",
    "Schedule:Year",
    "Schedule:Constant",
    "Material",
    "WindowMaterial:SimpleGlazingSystem",
    "Construction",
    "Zone",
    "BuildingSurface:Detailed",
    "FenestrationSurface:Detailed",
    "Shading:Site:Detailed",
    "Shading:Building:Detailed",
    "People",
    "Lights",
];

#[derive(Debug, Default)]
pub struct ReverseTranslator {
    log: TranslationLog,
}

impl ReverseTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> &TranslationLog {
        &self.log
    }

    pub fn warnings(&self) -> Vec<LogMessage> {
        self.log.warnings()
    }

    pub fn errors(&self) -> Vec<LogMessage> {
        self.log.errors()
    }

    /// Translate parsed IDF text. Objects of types outside the schema are
    /// reported and skipped.
    pub fn translate_idf_file(&mut self, file: &IdfFile) -> ModelResult<Model> {
        check_idd_type(file.idd_type())?;
        self.log.clear();
        for object in file.objects() {
            if file.idd().get_object(object.type_name()).is_none() {
                self.log.warn(
                    CHANNEL,
                    format!("{} is not supported; skipped", object.type_name()),
                );
            }
        }
        let ws = Workspace::from_idf_file(file, StrictnessLevel::None)?;
        self.run(&ws)
    }

    pub fn translate_workspace(&mut self, ws: &Workspace) -> ModelResult<Model> {
        check_idd_type(ws.idd_type())?;
        self.log.clear();
        self.run(ws)
    }

    fn run(&mut self, ws: &Workspace) -> ModelResult<Model> {
        let mut pass = Pass::new(ws, &mut self.log);
        pass.translate_all()?;
        let model = pass.model;
        info!(
            objects = model.workspace().num_objects(),
            warnings = self.log.warnings().len(),
            errors = self.log.errors().len(),
            "translated EnergyPlus input to model"
        );
        Ok(model)
    }
}

fn check_idd_type(idd_type: IddFileType) -> ModelResult<()> {
    if idd_type == IddFileType::EnergyPlus {
        Ok(())
    } else {
        Err(ModelError::InvalidValue {
            field: "workspace",
            value: idd_type.as_str().to_string(),
            reason: "expected EnergyPlus input".into(),
        })
    }
}

/// How vertices are given, from `GlobalGeometryRules`.
#[derive(Debug, Clone, Copy)]
struct GeometryRules {
    clockwise: bool,
    relative: bool,
}

/// State of one translation.
struct Pass<'a> {
    ws: &'a Workspace,
    log: &'a mut TranslationLog,
    model: Model,
    rules: GeometryRules,
    limits: HashMap<ObjectId, ScheduleTypeLimits>,
    days: HashMap<ObjectId, ScheduleDay>,
    weeks: HashMap<ObjectId, ScheduleWeek>,
    schedules: HashMap<ObjectId, Schedule>,
    materials: HashMap<ObjectId, Material>,
    constructions: HashMap<ObjectId, Construction>,
    spaces: HashMap<ObjectId, Space>,
    surfaces: HashMap<ObjectId, Surface>,
    sub_surfaces: HashMap<ObjectId, SubSurface>,
    shading_groups: HashMap<ShadingSurfaceType, ShadingSurfaceGroup>,
}

impl<'a> Pass<'a> {
    fn new(ws: &'a Workspace, log: &'a mut TranslationLog) -> Self {
        Self {
            ws,
            log,
            model: Model::new(),
            rules: GeometryRules {
                clockwise: false,
                relative: true,
            },
            limits: HashMap::new(),
            days: HashMap::new(),
            weeks: HashMap::new(),
            schedules: HashMap::new(),
            materials: HashMap::new(),
            constructions: HashMap::new(),
            spaces: HashMap::new(),
            surfaces: HashMap::new(),
            sub_surfaces: HashMap::new(),
            shading_groups: HashMap::new(),
        }
    }

    fn translate_all(&mut self) -> ModelResult<()> {
        self.check_version();
        self.read_geometry_rules();
        self.each("Timestep", Self::timestep);
        self.each("Building", Self::building);
        self.each("Site:Location", Self::site_location);
        self.each("RunPeriod", Self::run_period);
        self.each("ScheduleTypeLimits", Self::schedule_type_limits);
        self.each("Schedule:Constant", Self::schedule_constant);
        self.each("Schedule:Day:Interval", Self::schedule_day);
        self.each("Schedule:Week:Daily", Self::schedule_week);
        self.each("Schedule:Year", Self::schedule_year);
        self.each("Material", Self::material);
        self.each("WindowMaterial:SimpleGlazingSystem", Self::simple_glazing);
        self.each("Construction", Self::construction);
        self.each("Zone", Self::zone);
        self.each("BuildingSurface:Detailed", Self::surface);
        self.each("FenestrationSurface:Detailed", Self::sub_surface);
        self.link_surfaces()?;
        self.link_sub_surfaces()?;
        self.each("Shading:Site:Detailed", Self::site_shading);
        self.each("Shading:Building:Detailed", Self::building_shading);
        self.each("People", Self::people);
        self.each("Lights", Self::lights);

        let ws = self.ws;
        let mut skipped: Vec<&str> = Vec::new();
        for id in ws.object_ids() {
            if let Some(type_name) = ws.type_name(id)
                && !TRANSLATED_TYPES.contains(&type_name)
                && !skipped.contains(&type_name)
            {
                skipped.push(type_name);
            }
        }
        for type_name in skipped {
            if type_name.starts_with("Output") {
                self.log.info(
                    CHANNEL,
                    format!("{type_name} is an output request, not part of the model"),
                );
            } else {
                self.log
                    .warn(CHANNEL, format!("{type_name} is not supported; skipped"));
            }
        }
        Ok(())
    }

    /// Run `f` on every object of `type_name`; failures are logged and the object skipped.
    fn each(&mut self, type_name: &str, f: fn(&mut Self, ObjectId) -> ModelResult<()>) {
        for id in self.ws.objects_by_type(type_name) {
            if let Err(e) = f(self, id) {
                let name = self.ws.name(id).unwrap_or_default().to_string();
                self.log.error(
                    CHANNEL,
                    format!("{type_name} '{name}' not translated: {e}"),
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Field access
    // ------------------------------------------------------------------

    fn name(&self, id: ObjectId) -> String {
        self.ws.name(id).unwrap_or_default().to_string()
    }

    fn text(&self, id: ObjectId, index: usize) -> Option<String> {
        self.ws.get_string(id, index)
    }

    fn real(&self, id: ObjectId, index: usize) -> Option<f64> {
        self.ws.get_double(id, index)
    }

    fn real_or_default(&self, id: ObjectId, index: usize, default: f64) -> f64 {
        self.ws.get_double_or_default(id, index).unwrap_or(default)
    }

    fn required_real(&self, id: ObjectId, index: usize, field: &'static str) -> ModelResult<f64> {
        self.real(id, index).ok_or_else(|| ModelError::InvalidValue {
            field,
            value: self.text(id, index).unwrap_or_default(),
            reason: "a number is required".into(),
        })
    }

    fn month_day(&self, id: ObjectId, month: usize, day: usize) -> Option<(u32, u32)> {
        let m = u32::try_from(self.ws.get_int(id, month)?).ok()?;
        let d = u32::try_from(self.ws.get_int(id, day)?).ok()?;
        Some((m, d))
    }

    fn vertices(&self, id: ObjectId) -> Vec<Point3d> {
        let mut out: Vec<Point3d> = (0..self.ws.num_extensible_groups(id))
            .filter_map(|g| {
                let group = self.ws.extensible_group(id, g)?;
                let coord = |i: usize| -> Option<f64> { group.get(i)?.as_deref()?.trim().parse().ok() };
                Some(Point3d::new(coord(0)?, coord(1)?, coord(2)?))
            })
            .collect();
        if self.rules.clockwise {
            out.reverse();
        }
        out
    }

    fn schedule_at(&self, id: ObjectId, index: usize) -> Option<Schedule> {
        self.ws
            .get_target(id, index)
            .and_then(|t| self.schedules.get(&t).copied())
    }

    // ------------------------------------------------------------------
    // Simulation control
    // ------------------------------------------------------------------

    fn check_version(&mut self) {
        let Some(&id) = self.ws.objects_by_type("Version").first() else {
            self.log
                .warn(CHANNEL, "input has no Version object; assuming the schema version");
            return;
        };
        let expected = IddFileType::EnergyPlus.idd().version().to_string();
        let found = self
            .ws
            .get_string_or_default(id, version::VERSION_IDENTIFIER)
            .unwrap_or_default();
        let same = match (
            found.parse::<os_core::VersionString>(),
            expected.parse::<os_core::VersionString>(),
        ) {
            (Ok(a), Ok(b)) => a.major() == b.major() && a.minor() == b.minor(),
            _ => false,
        };
        if !same {
            self.log.warn(
                CHANNEL,
                format!("input is EnergyPlus {found}; the schema is {expected}"),
            );
        }
    }

    fn read_geometry_rules(&mut self) {
        let Some(&id) = self.ws.objects_by_type("GlobalGeometryRules").first() else {
            return;
        };
        let entry = self
            .text(id, global_geometry_rules::VERTEX_ENTRY_DIRECTION)
            .unwrap_or_default();
        let system = self
            .ws
            .get_string_or_default(id, global_geometry_rules::COORDINATE_SYSTEM)
            .unwrap_or_else(|| "Relative".into());
        self.rules = GeometryRules {
            clockwise: entry.eq_ignore_ascii_case("Clockwise"),
            relative: system.eq_ignore_ascii_case("Relative"),
        };
        if let Some(start) = self.text(id, global_geometry_rules::STARTING_VERTEX_POSITION)
            && !start.eq_ignore_ascii_case("UpperLeftCorner")
        {
            self.log.info(
                CHANNEL,
                format!("starting vertex position {start} does not change the outlines read"),
            );
        }
    }

    fn timestep(&mut self, id: ObjectId) -> ModelResult<()> {
        let n = self
            .ws
            .get_int_or_default(id, timestep::NUMBER_OF_TIMESTEPS_PER_HOUR)
            .unwrap_or(6);
        let n = u32::try_from(n).map_err(|_| ModelError::InvalidValue {
            field: "number of timesteps per hour",
            value: n.to_string(),
            reason: "must be positive".into(),
        })?;
        let t = self.model.timestep()?;
        t.set_number_of_timesteps_per_hour(&mut self.model, n)
    }

    fn building(&mut self, id: ObjectId) -> ModelResult<()> {
        let b = self.model.building()?;
        if let Some(name) = self.text(id, building::NAME) {
            b.set_name(&mut self.model, &name)?;
        }
        let north = self.real_or_default(id, building::NORTH_AXIS, 0.0);
        b.set_north_axis(&mut self.model, north)?;
        if let Some(terrain) = self.text(id, building::TERRAIN) {
            let site = self.model.site()?;
            site.set_terrain(&mut self.model, &terrain)?;
        }
        Ok(())
    }

    fn site_location(&mut self, id: ObjectId) -> ModelResult<()> {
        let site = self.model.site()?;
        let m = &mut self.model;
        if let Some(name) = self.ws.get_string(id, site_location::NAME) {
            site.set_name(m, &name)?;
        }
        let ws = self.ws;
        let value = |index| ws.get_double_or_default(id, index).unwrap_or(0.0);
        site.set_latitude(m, value(site_location::LATITUDE))?;
        site.set_longitude(m, value(site_location::LONGITUDE))?;
        site.set_time_zone(m, value(site_location::TIME_ZONE))?;
        site.set_elevation(m, value(site_location::ELEVATION))?;
        Ok(())
    }

    fn run_period(&mut self, id: ObjectId) -> ModelResult<()> {
        let begin = self
            .month_day(id, run_period::BEGIN_MONTH, run_period::BEGIN_DAY_OF_MONTH)
            .unwrap_or((1, 1));
        let end = self
            .month_day(id, run_period::END_MONTH, run_period::END_DAY_OF_MONTH)
            .unwrap_or((12, 31));
        let rp = self.model.run_period()?;
        if let Some(name) = self.text(id, run_period::NAME) {
            rp.set_name(&mut self.model, &name)?;
        }
        rp.set_begin(&mut self.model, begin.0, begin.1)?;
        rp.set_end(&mut self.model, end.0, end.1)
    }

    // ------------------------------------------------------------------
    // Schedules
    // ------------------------------------------------------------------

    fn schedule_type_limits(&mut self, id: ObjectId) -> ModelResult<()> {
        let name = self.name(id);
        let lower = self.real(id, schedule_type_limits::LOWER_LIMIT_VALUE);
        let upper = self.real(id, schedule_type_limits::UPPER_LIMIT_VALUE);
        let numeric = self.text(id, schedule_type_limits::NUMERIC_TYPE);
        let unit = self.text(id, schedule_type_limits::UNIT_TYPE);

        let limits = ScheduleTypeLimits::new(&mut self.model, &name)?;
        let m = &mut self.model;
        limits.set_lower_limit_value(m, lower)?;
        limits.set_upper_limit_value(m, upper)?;
        if let Some(numeric) = numeric {
            limits.set_numeric_type(m, &numeric)?;
        }
        if let Some(unit) = unit {
            limits.set_unit_type(m, &unit)?;
        }
        self.limits.insert(id, limits);
        Ok(())
    }

    fn limits_at(&self, id: ObjectId, index: usize) -> Option<ScheduleTypeLimits> {
        self.ws
            .get_target(id, index)
            .and_then(|t| self.limits.get(&t).copied())
    }

    /// Limits that do not fit the values are dropped with a warning.
    fn assign_limits(&mut self, id: ObjectId, index: usize, schedule: Schedule) {
        let Some(limits) = self.limits_at(id, index) else {
            return;
        };
        if let Err(e) = schedule.set_schedule_type_limits(&mut self.model, limits) {
            self.log.warn(CHANNEL, format!("{e}; limits not assigned"));
        }
    }

    fn schedule_constant(&mut self, id: ObjectId) -> ModelResult<()> {
        let value = self.real_or_default(id, schedule_constant::HOURLY_VALUE, 0.0);
        let c = ScheduleConstant::new(&mut self.model, value)?;
        let name = self.name(id);
        c.set_name(&mut self.model, &name)?;
        self.assign_limits(id, schedule_constant::SCHEDULE_TYPE_LIMITS_NAME, c.into());
        self.schedules.insert(id, c.into());
        Ok(())
    }

    fn schedule_day(&mut self, id: ObjectId) -> ModelResult<()> {
        let first = schedule_day_interval::INTERPOLATE_TO_TIMESTEP + 1;
        let mut entries = Vec::new();
        for g in 0..self.ws.num_extensible_groups(id) {
            let start = first + 2 * g;
            let time = self.text(id, start).unwrap_or_default();
            let until = parse_until(&time).ok_or_else(|| ModelError::InvalidValue {
                field: "time",
                value: time.clone(),
                reason: "expected 'Until: HH:MM'".into(),
            })?;
            let value = self.required_real(id, start + 1, "value until time")?;
            entries.push((until, value));
        }
        let last = entries.last().map_or(0.0, |&(_, v)| v);

        let day = ScheduleDay::new(&mut self.model, last)?;
        let filled = self.fill_day(id, day, &entries);
        if let Err(e) = filled {
            day.remove(&mut self.model)?;
            return Err(e);
        }
        self.days.insert(id, day);
        Ok(())
    }

    fn fill_day(&mut self, id: ObjectId, day: ScheduleDay, entries: &[(TimeDelta, f64)]) -> ModelResult<()> {
        let name = self.name(id);
        let interpolation = self
            .text(id, schedule_day_interval::INTERPOLATE_TO_TIMESTEP)
            .map(|t| Interpolation::parse(&t))
            .unwrap_or_default();
        let m = &mut self.model;
        day.set_name(m, &name)?;
        day.set_interpolation(m, interpolation)?;
        for &(until, value) in entries {
            day.add_value(m, until, value)?;
        }
        if let Some(limits) = self.limits_at(id, schedule_day_interval::SCHEDULE_TYPE_LIMITS_NAME)
            && let Err(e) = day.set_schedule_type_limits(&mut self.model, limits)
        {
            self.log.warn(CHANNEL, format!("{e}; limits not assigned"));
        }
        Ok(())
    }

    fn schedule_week(&mut self, id: ObjectId) -> ModelResult<()> {
        let name = self.name(id);
        let week = ScheduleWeek::new(&mut self.model)?;
        week.set_name(&mut self.model, &name)?;
        for d in DayType::ALL {
            let index = schedule_week_daily::SUNDAY + d as usize;
            let day = self
                .ws
                .get_target(id, index)
                .and_then(|t| self.days.get(&t).copied());
            match day {
                Some(day) => week.set_day_schedule(&mut self.model, d, day)?,
                None => self.log.warn(
                    CHANNEL,
                    format!("Schedule:Week:Daily '{name}' has no day schedule for {d:?}"),
                ),
            }
        }
        self.weeks.insert(id, week);
        Ok(())
    }

    fn schedule_year(&mut self, id: ObjectId) -> ModelResult<()> {
        let mut groups = Vec::new();
        for g in 0..self.ws.num_extensible_groups(id) {
            let start = schedule_year::FIRST_WEEK + 5 * g;
            let week = self
                .ws
                .get_target(id, start)
                .and_then(|t| self.weeks.get(&t).copied())
                .ok_or_else(|| ModelError::Schedule(format!("week {} is not translated", g + 1)))?;
            let (month, day) = self
                .month_day(id, start + 3, start + 4)
                .ok_or_else(|| ModelError::Schedule(format!("week {} has no end date", g + 1)))?;
            let end = NaiveDate::from_ymd_opt(BASE_YEAR, month, day)
                .ok_or_else(|| ModelError::Schedule(format!("{month}/{day} is not a date")))?;
            groups.push((end, week));
        }

        let year = ScheduleYear::new(&mut self.model)?;
        let name = self.name(id);
        year.set_name(&mut self.model, &name)?;
        for (end, week) in groups {
            year.add_week(&mut self.model, end, week)?;
        }
        if let Err(e) = year.check_coverage(&self.model) {
            self.log.warn(CHANNEL, e.to_string());
        }
        self.assign_limits(id, schedule_year::SCHEDULE_TYPE_LIMITS_NAME, year.into());
        self.schedules.insert(id, year.into());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Envelope
    // ------------------------------------------------------------------

    fn material(&mut self, id: ObjectId) -> ModelResult<()> {
        let roughness = self
            .text(id, material::ROUGHNESS)
            .unwrap_or_else(|| "MediumRough".into());
        let thickness = self.required_real(id, material::THICKNESS, "thickness")?;
        let conductivity = self.required_real(id, material::CONDUCTIVITY, "conductivity")?;
        let density = self.required_real(id, material::DENSITY, "density")?;
        let specific_heat = self.required_real(id, material::SPECIFIC_HEAT, "specific heat")?;
        let solar = self.real(id, material::SOLAR_ABSORPTANCE);

        let m = StandardOpaqueMaterial::new(
            &mut self.model,
            &roughness,
            thickness,
            conductivity,
            density,
            specific_heat,
        )?;
        let name = self.name(id);
        m.set_name(&mut self.model, &name)?;
        if let Some(solar) = solar {
            m.set_solar_absorptance(&mut self.model, solar)?;
        }
        self.materials.insert(id, m.into());
        Ok(())
    }

    fn simple_glazing(&mut self, id: ObjectId) -> ModelResult<()> {
        let u = self.required_real(id, simple_glazing::U_FACTOR, "U-factor")?;
        let shgc = self.required_real(
            id,
            simple_glazing::SOLAR_HEAT_GAIN_COEFFICIENT,
            "solar heat gain coefficient",
        )?;
        let vt = self.real(id, simple_glazing::VISIBLE_TRANSMITTANCE);

        let g = SimpleGlazing::new(&mut self.model, u, shgc)?;
        let name = self.name(id);
        g.set_name(&mut self.model, &name)?;
        if let Some(vt) = vt {
            g.set_visible_transmittance(&mut self.model, vt)?;
        }
        self.materials.insert(id, g.into());
        Ok(())
    }

    fn construction(&mut self, id: ObjectId) -> ModelResult<()> {
        let count = self.ws.get(id).map_or(0, |o| o.num_fields());
        let mut layers = Vec::new();
        for index in construction::OUTSIDE_LAYER..count {
            let Some(target) = self.ws.get_target(id, index) else {
                continue;
            };
            match self.materials.get(&target) {
                Some(&layer) => layers.push(layer),
                None => {
                    return Err(ModelError::InvalidValue {
                        field: "layer",
                        value: self.text(id, index).unwrap_or_default(),
                        reason: "material not translated".into(),
                    });
                }
            }
        }
        let c = Construction::with_layers(&mut self.model, &layers)?;
        let name = self.name(id);
        c.set_name(&mut self.model, &name)?;
        self.constructions.insert(id, c);
        Ok(())
    }

    fn construction_at(&self, id: ObjectId, index: usize) -> Option<Construction> {
        self.ws
            .get_target(id, index)
            .and_then(|t| self.constructions.get(&t).copied())
    }

    // ------------------------------------------------------------------
    // Zones and geometry
    // ------------------------------------------------------------------

    fn zone(&mut self, id: ObjectId) -> ModelResult<()> {
        let name = self.name(id);
        let multiplier = self.ws.get_int_or_default(id, zone::MULTIPLIER).unwrap_or(1);
        let ceiling = self.real(id, zone::CEILING_HEIGHT);
        let volume = self.real(id, zone::VOLUME);
        let counted = self
            .ws
            .get_string_or_default(id, zone::PART_OF_TOTAL_FLOOR_AREA)
            .is_none_or(|v| !v.eq_ignore_ascii_case("No"));
        let origin = Vector3d::new(
            self.real_or_default(id, zone::X_ORIGIN, 0.0),
            self.real_or_default(id, zone::Y_ORIGIN, 0.0),
            self.real_or_default(id, zone::Z_ORIGIN, 0.0),
        );
        let north = self.real_or_default(id, zone::DIRECTION_OF_RELATIVE_NORTH, 0.0);

        let m = &mut self.model;
        let tz = ThermalZone::new(m)?;
        tz.set_name(m, &name)?;
        tz.set_multiplier(m, u32::try_from(multiplier.max(1)).unwrap_or(1))?;
        if let Some(h) = ceiling {
            tz.set_ceiling_height(m, h)?;
        }
        if let Some(v) = volume {
            tz.set_volume(m, v)?;
        }

        let space = Space::new(m)?;
        space.set_name(m, &format!("{name} Space"))?;
        space.set_thermal_zone(m, tz)?;
        space.set_part_of_total_floor_area(m, counted)?;
        if self.rules.relative {
            space.set_origin(m, origin)?;
            space.set_direction_of_relative_north(m, north)?;
        }
        self.spaces.insert(id, space);
        Ok(())
    }

    fn surface(&mut self, id: ObjectId) -> ModelResult<()> {
        let space = self
            .ws
            .get_target(id, building_surface::ZONE_NAME)
            .and_then(|z| self.spaces.get(&z).copied())
            .ok_or_else(|| ModelError::InvalidValue {
                field: "zone name",
                value: self.text(id, building_surface::ZONE_NAME).unwrap_or_default(),
                reason: "zone not translated".into(),
            })?;
        let surface_type = match self
            .text(id, building_surface::SURFACE_TYPE)
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str()
        {
            "floor" => SurfaceType::Floor,
            "wall" => SurfaceType::Wall,
            "roof" | "ceiling" => SurfaceType::RoofCeiling,
            other => {
                return Err(ModelError::InvalidValue {
                    field: "surface type",
                    value: other.to_string(),
                    reason: "expected Floor, Wall, Ceiling or Roof".into(),
                });
            }
        };
        let vertices = self.vertices(id);
        let surface = Surface::new(&mut self.model, &vertices)?;
        if let Err(e) = self.fill_surface(id, surface, space, surface_type) {
            surface.remove(&mut self.model)?;
            return Err(e);
        }
        self.surfaces.insert(id, surface);
        Ok(())
    }

    fn fill_surface(
        &mut self,
        id: ObjectId,
        surface: Surface,
        space: Space,
        surface_type: SurfaceType,
    ) -> ModelResult<()> {
        let name = self.name(id);
        let construction = self.construction_at(id, building_surface::CONSTRUCTION_NAME);
        let bc_text = self
            .text(id, building_surface::OUTSIDE_BOUNDARY_CONDITION)
            .unwrap_or_default();

        let m = &mut self.model;
        surface.set_name(m, &name)?;
        surface.set_space(m, space)?;
        surface.set_surface_type(m, surface_type)?;
        if let Some(c) = construction {
            surface.set_construction(m, c)?;
        }

        let bc = match bc_text.to_ascii_lowercase().as_str() {
            "outdoors" => BoundaryCondition::Outdoors,
            "ground" | "foundation" | "groundfcfactormethod" => BoundaryCondition::Ground,
            "adiabatic" => BoundaryCondition::Adiabatic,
            // Linked after every surface exists.
            "surface" => return Ok(()),
            _ => {
                self.log.warn(
                    CHANNEL,
                    format!("Surface '{name}' boundary condition '{bc_text}' is not supported; using Adiabatic"),
                );
                BoundaryCondition::Adiabatic
            }
        };
        surface.set_outside_boundary_condition(&mut self.model, bc)
    }

    fn link_surfaces(&mut self) -> ModelResult<()> {
        let ws = self.ws;
        for id in ws.objects_by_type("BuildingSurface:Detailed") {
            let Some(&surface) = self.surfaces.get(&id) else {
                continue;
            };
            let is_surface_bc = ws
                .get_string(id, building_surface::OUTSIDE_BOUNDARY_CONDITION)
                .is_some_and(|bc| bc.eq_ignore_ascii_case("Surface"));
            if !is_surface_bc || surface.adjacent_surface(&self.model).is_some() {
                continue;
            }
            let partner = ws
                .get_target(id, building_surface::OUTSIDE_BOUNDARY_CONDITION_OBJECT)
                .and_then(|t| self.surfaces.get(&t).copied())
                .filter(|&p| p != surface);
            match partner {
                Some(partner) => surface.set_adjacent_surface(&mut self.model, partner)?,
                None => {
                    let name = self.name(id);
                    self.log.warn(
                        CHANNEL,
                        format!(
                            "Surface '{name}' has no adjacent surface to link; using its default boundary condition"
                        ),
                    );
                    surface.assign_default_boundary_condition(&mut self.model)?;
                }
            }
        }
        Ok(())
    }

    fn site_shading(&mut self, id: ObjectId) -> ModelResult<()> {
        self.shading(id, ShadingSurfaceType::Site)
    }

    fn building_shading(&mut self, id: ObjectId) -> ModelResult<()> {
        self.shading(id, ShadingSurfaceType::Building)
    }

    /// Every shade of one type goes into a single group of that type.
    fn shading(&mut self, id: ObjectId, t: ShadingSurfaceType) -> ModelResult<()> {
        let name = self.name(id);
        if self
            .text(id, shading_detailed::TRANSMITTANCE_SCHEDULE_NAME)
            .is_some_and(|s| !s.is_empty())
        {
            self.log.warn(
                CHANNEL,
                format!("Shading surface '{name}' transmittance schedule is not supported; treated as opaque"),
            );
        }
        let vertices = self.vertices(id);
        let shade = ShadingSurface::new(&mut self.model, &vertices)?;
        let group = match self.shading_groups.get(&t) {
            Some(&g) => g,
            None => {
                let g = ShadingSurfaceGroup::new(&mut self.model, t)?;
                self.shading_groups.insert(t, g);
                g
            }
        };
        let m = &mut self.model;
        shade.set_name(m, &name)?;
        shade.set_shading_surface_group(m, group)
    }

    fn sub_surface(&mut self, id: ObjectId) -> ModelResult<()> {
        let parent = self
            .ws
            .get_target(id, fenestration_surface::BUILDING_SURFACE_NAME)
            .and_then(|s| self.surfaces.get(&s).copied())
            .ok_or_else(|| ModelError::InvalidValue {
                field: "building surface name",
                value: self
                    .text(id, fenestration_surface::BUILDING_SURFACE_NAME)
                    .unwrap_or_default(),
                reason: "surface not translated".into(),
            })?;
        let sub_type = match self
            .text(id, fenestration_surface::SURFACE_TYPE)
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str()
        {
            "window" => SubSurfaceType::FixedWindow,
            "door" => SubSurfaceType::Door,
            "glassdoor" => SubSurfaceType::GlassDoor,
            other => {
                return Err(ModelError::InvalidValue {
                    field: "sub surface type",
                    value: other.to_string(),
                    reason: "not supported".into(),
                });
            }
        };
        let vertices = self.vertices(id);
        let sub = SubSurface::new(&mut self.model, &vertices)?;
        if let Err(e) = self.fill_sub_surface(id, sub, parent, sub_type) {
            sub.remove(&mut self.model)?;
            return Err(e);
        }
        self.sub_surfaces.insert(id, sub);
        Ok(())
    }

    fn fill_sub_surface(
        &mut self,
        id: ObjectId,
        sub: SubSurface,
        parent: Surface,
        sub_type: SubSurfaceType,
    ) -> ModelResult<()> {
        let name = self.name(id);
        let construction = self.construction_at(id, fenestration_surface::CONSTRUCTION_NAME);
        let multiplier = self.real_or_default(id, fenestration_surface::MULTIPLIER, 1.0);
        let m = &mut self.model;
        sub.set_name(m, &name)?;
        sub.set_sub_surface_type(m, sub_type)?;
        sub.set_surface(m, parent)?;
        if let Some(c) = construction {
            sub.set_construction(m, c)?;
        }
        sub.set_multiplier(m, multiplier)
    }

    fn link_sub_surfaces(&mut self) -> ModelResult<()> {
        let ws = self.ws;
        for id in ws.objects_by_type("FenestrationSurface:Detailed") {
            let Some(&sub) = self.sub_surfaces.get(&id) else {
                continue;
            };
            if sub.adjacent_sub_surface(&self.model).is_some() {
                continue;
            }
            let partner = ws
                .get_target(id, fenestration_surface::OUTSIDE_BOUNDARY_CONDITION_OBJECT)
                .and_then(|t| self.sub_surfaces.get(&t).copied())
                .filter(|&p| p != sub);
            if let Some(partner) = partner {
                sub.set_adjacent_sub_surface(&mut self.model, partner)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internal gains
    // ------------------------------------------------------------------

    fn space_of_load(&self, id: ObjectId, index: usize) -> ModelResult<Space> {
        self.ws
            .get_target(id, index)
            .and_then(|z| self.spaces.get(&z).copied())
            .ok_or_else(|| ModelError::InvalidValue {
                field: "zone name",
                value: self.text(id, index).unwrap_or_default(),
                reason: "zone not translated".into(),
            })
    }

    fn people(&mut self, id: ObjectId) -> ModelResult<()> {
        let space = self.space_of_load(id, people::ZONE_NAME)?;
        let method = self
            .ws
            .get_string_or_default(id, people::CALCULATION_METHOD)
            .unwrap_or_else(|| "People".into());
        let area = space.floor_area(&self.model);
        let number = match method.to_ascii_lowercase().as_str() {
            "people/area" => self.required_real(id, people::PEOPLE_PER_FLOOR_AREA, "people per floor area")? * area,
            "area/person" => {
                let per = self.required_real(id, people::FLOOR_AREA_PER_PERSON, "floor area per person")?;
                if per > 0.0 { area / per } else { 0.0 }
            }
            _ => self.required_real(id, people::NUMBER_OF_PEOPLE, "number of people")?,
        };
        let fraction_radiant = self.real(id, people::FRACTION_RADIANT);
        let number_schedule = self.schedule_at(id, people::NUMBER_OF_PEOPLE_SCHEDULE_NAME);
        let activity_schedule = self.schedule_at(id, people::ACTIVITY_LEVEL_SCHEDULE_NAME);

        let p = People::new(&mut self.model, space, number)?;
        let name = self.name(id);
        p.set_name(&mut self.model, &name)?;
        if let Some(f) = fraction_radiant {
            p.set_fraction_radiant(&mut self.model, f)?;
        }
        if let Some(s) = number_schedule
            && let Err(e) = p.set_number_of_people_schedule(&mut self.model, s)
        {
            self.log.warn(CHANNEL, e.to_string());
        }
        if let Some(s) = activity_schedule
            && let Err(e) = p.set_activity_level_schedule(&mut self.model, s)
        {
            self.log.warn(CHANNEL, e.to_string());
        }
        Ok(())
    }

    fn lights(&mut self, id: ObjectId) -> ModelResult<()> {
        let space = self.space_of_load(id, lights::ZONE_NAME)?;
        let method = self
            .ws
            .get_string_or_default(id, lights::CALCULATION_METHOD)
            .unwrap_or_else(|| "LightingLevel".into());
        let level = match method.to_ascii_lowercase().as_str() {
            "watts/area" => {
                self.required_real(id, lights::WATTS_PER_FLOOR_AREA, "watts per floor area")?
                    * space.floor_area(&self.model)
            }
            "watts/person" => {
                self.required_real(id, lights::WATTS_PER_PERSON, "watts per person")?
                    * space.number_of_people(&self.model)
            }
            _ => self.required_real(id, lights::LIGHTING_LEVEL, "lighting level")?,
        };
        let radiant = self.real(id, lights::FRACTION_RADIANT);
        let visible = self.real(id, lights::FRACTION_VISIBLE);
        let schedule = self.schedule_at(id, lights::SCHEDULE_NAME);

        let l = Lights::new(&mut self.model, space, level)?;
        let name = self.name(id);
        l.set_name(&mut self.model, &name)?;
        if radiant.is_some() || visible.is_some() {
            let radiant = radiant.unwrap_or(0.0);
            let visible = visible.unwrap_or(0.0);
            if let Err(e) = l.set_fractions(&mut self.model, radiant, visible) {
                self.log.warn(CHANNEL, e.to_string());
            }
        }
        if let Some(s) = schedule
            && let Err(e) = l.set_schedule(&mut self.model, s)
        {
            self.log.warn(CHANNEL, e.to_string());
        }
        Ok(())
    }
}

/// `Until: HH:MM` or a bare `HH:MM`.
fn parse_until(text: &str) -> Option<TimeDelta> {
    let text = text.trim();
    let clock = match text.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("until:") => text[6..].trim(),
        _ => text,
    };
    let (h, m) = clock.split_once(':')?;
    let h: i64 = h.trim().parse().ok()?;
    let m: i64 = m.trim().parse().ok()?;
    if !(0..=24).contains(&h) || !(0..60).contains(&m) {
        return None;
    }
    Some(TimeDelta::hours(h) + TimeDelta::minutes(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn until_times() {
        assert_eq!(parse_until("Until: 08:30"), Some(TimeDelta::minutes(8 * 60 + 30)));
        assert_eq!(parse_until("until:24:00"), Some(TimeDelta::hours(24)));
        assert_eq!(parse_until("7:00"), Some(TimeDelta::hours(7)));
        assert_eq!(parse_until("Until: 25:00"), None);
        assert_eq!(parse_until("noon"), None);
    }

    #[test]
    fn rejects_openstudio_workspace() {
        let model = Model::new();
        let mut rt = ReverseTranslator::new();
        assert!(rt.translate_workspace(model.workspace()).is_err());
    }
}
