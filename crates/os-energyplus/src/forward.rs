//! Model to EnergyPlus translation.
//!
//! Each model object maps to at most one EnergyPlus object. Results are
//! memoized by handle, so an object reached twice (a schedule shared by two
//! loads, say) is emitted once. Objects are emitted in dependency order:
//!
//! 1. simulation control: Version, Timestep, Building, Site:Location,
//!    RunPeriod, GlobalGeometryRules
//! 2. schedules, materials, constructions
//! 3. zones, surfaces, sub-surfaces, shading surfaces, internal gains
//! 4. output requests
//!
//! Surfaces are written in building coordinates against their space's zone;
//! spaces without a zone are skipped.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, TimeDelta};
use os_core::{Handle, ObjectId, format_real};
use os_idd::IddFileType;
use os_idf::{IdfObject, StrictnessLevel, Workspace};
use os_model::{
    BASE_YEAR, BoundaryCondition, Building, Construction, DayType, LogMessage, Material,
    Model, ModelObject, ModelResult, Point3d, RunPeriod, Schedule, ScheduleConstant,
    ScheduleDay, ScheduleTypeLimits, ScheduleWeek, ScheduleYear, ShadingSurface,
    ShadingSurfaceGroup, ShadingSurfaceType, Site, Space, SubSurface, SubSurfaceType, Surface,
    SurfaceType, ThermalZone, Timestep, TranslationLog,
};
use os_model::{Lights, People, SimpleGlazing, StandardOpaqueMaterial};
use serde::{Deserialize, Serialize};
use tracing::info;

const CHANNEL: &str = "os_energyplus::forward";

/// Name of the constant schedule used where a required schedule is missing.
pub const ALWAYS_ON_SCHEDULE: &str = "Always On";

/// Output requests added after the model objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardTranslatorOptions {
    pub exclude_sqlite_output_report: bool,
    pub exclude_html_output_report: bool,
    /// Tabular reports in inch-pound units.
    pub ip_tabular_output: bool,
    pub exclude_variable_dictionary: bool,
}

#[derive(Debug, Default)]
pub struct ForwardTranslator {
    options: ForwardTranslatorOptions,
    log: TranslationLog,
    objects: Vec<IdfObject>,
    /// EnergyPlus name per translated handle; `None` once an object failed.
    translated: HashMap<Handle, Option<String>>,
    always_on: bool,
}

impl ForwardTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ForwardTranslatorOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &ForwardTranslatorOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ForwardTranslatorOptions) {
        self.options = options;
    }

    /// Messages of the last translation.
    pub fn log(&self) -> &TranslationLog {
        &self.log
    }

    pub fn warnings(&self) -> Vec<LogMessage> {
        self.log.warnings()
    }

    pub fn errors(&self) -> Vec<LogMessage> {
        self.log.errors()
    }

    pub fn translate_model(&mut self, model: &Model) -> ModelResult<Workspace> {
        self.log.clear();
        self.objects.clear();
        self.translated.clear();
        self.always_on = false;

        self.objects.push(version_object());
        if let Some(timestep) = model.get_timestep() {
            self.translate(model, timestep.id(), |_, m| Some(map_timestep(m, timestep)));
        }
        match model.get_building() {
            Some(building) => {
                self.translate(model, building.id(), |_, m| Some(map_building(m, building)));
            }
            None => self.objects.push(building_object("Building".into(), 0.0, "Suburbs".into())),
        }
        if let Some(site) = model.get_site() {
            self.translate(model, site.id(), |_, m| Some(map_site(m, site)));
        }
        match model.get_run_period() {
            Some(rp) => {
                self.translate(model, rp.id(), |_, m| Some(map_run_period(m, rp)));
            }
            None => self
                .objects
                .push(run_period_object("Run Period 1".into(), (1, 1), (12, 31))),
        }
        self.objects.push(IdfObject::with_fields(
            "GlobalGeometryRules",
            ["UpperLeftCorner", "Counterclockwise", "Relative"],
        ));

        for limits in model.objects::<ScheduleTypeLimits>() {
            self.translate_limits(model, limits);
        }
        for schedule in model.objects::<ScheduleConstant>() {
            self.translate_schedule(model, schedule.into());
        }
        for day in model.objects::<ScheduleDay>() {
            self.translate_day(model, day);
        }
        for week in model.objects::<ScheduleWeek>() {
            self.translate_week(model, week);
        }
        for year in model.objects::<ScheduleYear>() {
            self.translate_schedule(model, year.into());
        }
        for material in model.objects::<StandardOpaqueMaterial>() {
            self.translate_material(model, material.into());
        }
        for glazing in model.objects::<SimpleGlazing>() {
            self.translate_material(model, glazing.into());
        }
        for construction in model.objects::<Construction>() {
            self.translate_construction(model, construction);
        }

        for space in model.objects::<Space>() {
            if space.thermal_zone(model).is_none() {
                self.log.warn(
                    CHANNEL,
                    format!(
                        "Space '{}' has no thermal zone; it and its surfaces and loads are not translated",
                        space.name(model).unwrap_or_default()
                    ),
                );
            }
        }
        let mut zones = Vec::new();
        for zone in model.objects::<ThermalZone>() {
            if let Some(name) = self.translate(model, zone.id(), |_, m| Some(map_zone(m, zone))) {
                zones.push((zone, name));
            }
        }
        for (zone, zone_name) in &zones {
            for surface in zone.spaces(model).into_iter().flat_map(|s| s.surfaces(model)) {
                self.translate(model, surface.id(), |t, m| t.map_surface(m, surface, zone_name));
            }
        }
        for (zone, _) in &zones {
            for surface in zone.spaces(model).into_iter().flat_map(|s| s.surfaces(model)) {
                let Some(base_name) = self.translated_name(model, surface.id()) else {
                    continue;
                };
                for sub in surface.sub_surfaces(model) {
                    self.translate(model, sub.id(), |t, m| t.map_sub_surface(m, sub, &base_name));
                }
            }
        }
        for group in model.objects::<ShadingSurfaceGroup>() {
            let zoned = group.space(model).is_none_or(|s| s.thermal_zone(model).is_some());
            if !zoned {
                continue;
            }
            for shade in group.shading_surfaces(model) {
                self.translate(model, shade.id(), |t, m| t.map_shading_surface(m, shade, group));
            }
        }
        for (zone, zone_name) in &zones {
            for space in zone.spaces(model) {
                for people in space.people(model) {
                    self.translate(model, people.id(), |t, m| t.map_people(m, people, zone_name));
                }
                for lights in space.lights(model) {
                    self.translate(model, lights.id(), |t, m| t.map_lights(m, lights, zone_name));
                }
            }
        }

        self.push_output_requests();

        let objects = std::mem::take(&mut self.objects);
        let count = objects.len();
        let mut ws = Workspace::with_strictness(IddFileType::EnergyPlus, StrictnessLevel::None);
        ws.add_objects(objects)?;
        info!(
            objects = count,
            warnings = self.log.warnings().len(),
            errors = self.log.errors().len(),
            "translated model to EnergyPlus"
        );
        Ok(ws)
    }

    /// Translate `id` once. The mapped object's first field is its EnergyPlus name.
    fn translate<F>(&mut self, model: &Model, id: ObjectId, map: F) -> Option<String>
    where
        F: FnOnce(&mut Self, &Model) -> Option<IdfObject>,
    {
        let handle = model.workspace().handle(id)?;
        if let Some(done) = self.translated.get(&handle) {
            return done.clone();
        }
        self.translated.insert(handle, None);
        let object = map(self, model)?;
        let name = object.get(0).map(str::to_string);
        self.objects.push(object);
        self.translated.insert(handle, name.clone());
        name
    }

    fn translated_name(&self, model: &Model, id: ObjectId) -> Option<String> {
        let handle = model.workspace().handle(id)?;
        self.translated.get(&handle).cloned().flatten()
    }

    fn always_on(&mut self) -> String {
        if !self.always_on {
            self.always_on = true;
            self.objects.push(IdfObject::with_fields(
                "Schedule:Constant",
                [ALWAYS_ON_SCHEDULE, "", "1"],
            ));
        }
        ALWAYS_ON_SCHEDULE.to_string()
    }

    // ------------------------------------------------------------------
    // Schedules
    // ------------------------------------------------------------------

    fn translate_limits(&mut self, model: &Model, limits: ScheduleTypeLimits) -> Option<String> {
        self.translate(model, limits.id(), |_, m| {
            Some(IdfObject::with_fields(
                "ScheduleTypeLimits",
                [
                    limits.name(m).unwrap_or_default(),
                    optional_real(limits.lower_limit_value(m)),
                    optional_real(limits.upper_limit_value(m)),
                    limits.numeric_type(m).unwrap_or_default(),
                    limits.unit_type(m),
                ],
            ))
        })
    }

    fn limits_name(&mut self, model: &Model, limits: Option<ScheduleTypeLimits>) -> String {
        limits
            .and_then(|l| self.translate_limits(model, l))
            .unwrap_or_default()
    }

    fn translate_schedule(&mut self, model: &Model, schedule: Schedule) -> Option<String> {
        match schedule {
            Schedule::Constant(c) => self.translate(model, c.id(), |t, m| {
                let limits = t.limits_name(m, c.schedule_type_limits(m));
                Some(IdfObject::with_fields(
                    "Schedule:Constant",
                    [c.name(m).unwrap_or_default(), limits, format_real(c.value(m))],
                ))
            }),
            Schedule::Year(y) => self.translate(model, y.id(), |t, m| t.map_year(m, y)),
        }
    }

    fn translate_day(&mut self, model: &Model, day: ScheduleDay) -> Option<String> {
        self.translate(model, day.id(), |t, m| {
            let limits = t.limits_name(m, day.schedule_type_limits(m));
            let mut o = IdfObject::with_fields(
                "Schedule:Day:Interval",
                [
                    day.name(m).unwrap_or_default(),
                    limits,
                    day.interpolation(m).as_str().to_string(),
                ],
            );
            for (until, value) in day.values(m) {
                o.push(until_text(until));
                o.push(format_real(value));
            }
            Some(o)
        })
    }

    fn translate_week(&mut self, model: &Model, week: ScheduleWeek) -> Option<String> {
        self.translate(model, week.id(), |t, m| t.map_week(m, week))
    }

    /// Unset day types take the first assigned day schedule.
    fn map_week(&mut self, model: &Model, week: ScheduleWeek) -> Option<IdfObject> {
        let name = week.name(model).unwrap_or_default();
        let Some(fallback) = DayType::ALL
            .into_iter()
            .find_map(|d| week.day_schedule(model, d))
        else {
            self.log.error(
                CHANNEL,
                format!("Week schedule '{name}' has no day schedules; not translated"),
            );
            return None;
        };

        let mut o = IdfObject::with_fields("Schedule:Week:Daily", [name.clone()]);
        let mut missing = 0;
        for d in DayType::ALL {
            let day = week.day_schedule(model, d).unwrap_or_else(|| {
                missing += 1;
                fallback
            });
            o.push(self.translate_day(model, day)?);
        }
        if missing > 0 {
            self.log.warn(
                CHANNEL,
                format!(
                    "Week schedule '{name}' leaves {missing} day types unset; using '{}'",
                    fallback.name(model).unwrap_or_default()
                ),
            );
        }
        Some(o)
    }

    fn map_year(&mut self, model: &Model, year: ScheduleYear) -> Option<IdfObject> {
        let name = year.name(model).unwrap_or_default();
        if let Err(e) = year.check_coverage(model) {
            self.log.error(CHANNEL, format!("{e}; '{name}' not translated"));
            return None;
        }
        let limits = self.limits_name(model, year.schedule_type_limits(model));
        let mut o = IdfObject::with_fields("Schedule:Year", [name.clone(), limits]);
        let mut start = NaiveDate::from_ymd_opt(BASE_YEAR, 1, 1)?;
        for (end, week) in year.weeks(model) {
            let Some(week_name) = self.translate_week(model, week) else {
                self.log.error(
                    CHANNEL,
                    format!("Year schedule '{name}' uses a week that was not translated"),
                );
                return None;
            };
            o.push(week_name);
            o.push(start.month().to_string());
            o.push(start.day().to_string());
            o.push(end.month().to_string());
            o.push(end.day().to_string());
            start = end.succ_opt().unwrap_or(end);
        }
        Some(o)
    }

    // ------------------------------------------------------------------
    // Envelope
    // ------------------------------------------------------------------

    fn translate_material(&mut self, model: &Model, material: Material) -> Option<String> {
        self.translate(model, material.id(), |_, m| {
            Some(match material {
                Material::Opaque(o) => IdfObject::with_fields(
                    "Material",
                    [
                        o.name(m).unwrap_or_default(),
                        o.roughness(m).unwrap_or_else(|| "MediumRough".into()),
                        format_real(o.thickness(m)),
                        format_real(o.conductivity(m)),
                        format_real(o.density(m)),
                        format_real(o.specific_heat(m)),
                        format_real(o.thermal_absorptance(m)),
                        format_real(o.solar_absorptance(m)),
                        format_real(o.visible_absorptance(m)),
                    ],
                ),
                Material::Glazing(g) => IdfObject::with_fields(
                    "WindowMaterial:SimpleGlazingSystem",
                    [
                        g.name(m).unwrap_or_default(),
                        format_real(g.u_factor(m)),
                        format_real(g.solar_heat_gain_coefficient(m)),
                        optional_real(g.visible_transmittance(m)),
                    ],
                ),
            })
        })
    }

    fn translate_construction(&mut self, model: &Model, construction: Construction) -> Option<String> {
        self.translate(model, construction.id(), |t, m| {
            let name = construction.name(m).unwrap_or_default();
            let layers = construction.layers(m);
            if layers.is_empty() {
                t.log.warn(
                    CHANNEL,
                    format!("Construction '{name}' has no layers; not translated"),
                );
                return None;
            }
            let mut o = IdfObject::with_fields("Construction", [name]);
            for layer in layers {
                o.push(t.translate_material(m, layer)?);
            }
            Some(o)
        })
    }

    fn construction_name(&mut self, model: &Model, construction: Option<Construction>, owner: &str) -> String {
        match construction {
            Some(c) => self.translate_construction(model, c).unwrap_or_default(),
            None => {
                self.log
                    .warn(CHANNEL, format!("'{owner}' has no construction"));
                String::new()
            }
        }
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    fn map_surface(&mut self, model: &Model, surface: Surface, zone_name: &str) -> Option<IdfObject> {
        let name = surface.name(model).unwrap_or_default();
        let bc = surface
            .outside_boundary_condition(model)
            .unwrap_or(BoundaryCondition::Outdoors);
        let surface_type = match surface.surface_type(model) {
            Some(SurfaceType::Floor) => "Floor",
            Some(SurfaceType::Wall) => "Wall",
            Some(SurfaceType::RoofCeiling) if bc == BoundaryCondition::Outdoors => "Roof",
            Some(SurfaceType::RoofCeiling) => "Ceiling",
            None => {
                self.log.error(
                    CHANNEL,
                    format!("Surface '{name}' has no surface type; not translated"),
                );
                return None;
            }
        };
        let vertices = surface.absolute_vertices(model);
        if vertices.len() < 3 {
            self.log.error(
                CHANNEL,
                format!("Surface '{name}' has fewer than 3 vertices; not translated"),
            );
            return None;
        }
        let construction = self.construction_name(model, surface.construction(model), &name);

        let mut bc_object = String::new();
        if bc == BoundaryCondition::Surface
            && let Some(adjacent) = surface.adjacent_surface(model)
        {
            let zoned = adjacent
                .space(model)
                .and_then(|s| s.thermal_zone(model))
                .is_some();
            if !zoned {
                self.log.warn(
                    CHANNEL,
                    format!("Surface '{name}' is adjacent to a surface that is not translated"),
                );
            }
            bc_object = adjacent.name(model).unwrap_or_default();
        }

        let mut o = IdfObject::with_fields(
            "BuildingSurface:Detailed",
            [
                name,
                surface_type.to_string(),
                construction,
                zone_name.to_string(),
                bc.as_str().to_string(),
                bc_object,
                exposure(surface.sun_exposed(model), "SunExposed", "NoSun"),
                exposure(surface.wind_exposed(model), "WindExposed", "NoWind"),
                optional_or_autocalculate(surface.view_factor_to_ground(model)),
                vertices.len().to_string(),
            ],
        );
        push_vertices(&mut o, &vertices);
        Some(o)
    }

    /// Site shading stays in site coordinates; building and space shading are
    /// both written as building shading in building coordinates.
    fn map_shading_surface(
        &mut self,
        model: &Model,
        shade: ShadingSurface,
        group: ShadingSurfaceGroup,
    ) -> Option<IdfObject> {
        let name = shade.name(model).unwrap_or_default();
        let vertices = shade.absolute_vertices(model);
        if vertices.len() < 3 {
            self.log.error(
                CHANNEL,
                format!("Shading surface '{name}' has fewer than 3 vertices; not translated"),
            );
            return None;
        }
        let idd_type = match group.shading_surface_type(model) {
            Some(ShadingSurfaceType::Site) => "Shading:Site:Detailed",
            _ => "Shading:Building:Detailed",
        };
        let mut o = IdfObject::with_fields(
            idd_type,
            [name, String::new(), vertices.len().to_string()],
        );
        push_vertices(&mut o, &vertices);
        Some(o)
    }

    fn map_sub_surface(&mut self, model: &Model, sub: SubSurface, base_name: &str) -> Option<IdfObject> {
        let name = sub.name(model).unwrap_or_default();
        let sub_type = match sub.sub_surface_type(model) {
            Some(SubSurfaceType::FixedWindow | SubSurfaceType::OperableWindow | SubSurfaceType::Skylight) => {
                "Window"
            }
            Some(SubSurfaceType::Door | SubSurfaceType::OverheadDoor) => "Door",
            Some(SubSurfaceType::GlassDoor) => "GlassDoor",
            None => {
                self.log.error(
                    CHANNEL,
                    format!("Sub surface '{name}' has no type; not translated"),
                );
                return None;
            }
        };
        let vertices = sub.absolute_vertices(model);
        if vertices.len() < 3 {
            self.log.error(
                CHANNEL,
                format!("Sub surface '{name}' has fewer than 3 vertices; not translated"),
            );
            return None;
        }
        let construction = self.construction_name(model, sub.construction(model), &name);
        let adjacent = sub
            .adjacent_sub_surface(model)
            .and_then(|s| s.name(model))
            .unwrap_or_default();

        let mut o = IdfObject::with_fields(
            "FenestrationSurface:Detailed",
            [
                name,
                sub_type.to_string(),
                construction,
                base_name.to_string(),
                adjacent,
                "autocalculate".to_string(),
                String::new(),
                format_real(sub.multiplier(model)),
                vertices.len().to_string(),
            ],
        );
        push_vertices(&mut o, &vertices);
        Some(o)
    }

    // ------------------------------------------------------------------
    // Internal gains
    // ------------------------------------------------------------------

    fn map_people(&mut self, model: &Model, people: People, zone_name: &str) -> Option<IdfObject> {
        let name = people.name(model).unwrap_or_default();
        let Some(activity) = people.activity_level_schedule(model) else {
            self.log.warn(
                CHANNEL,
                format!("People '{name}' has no activity level schedule; not translated"),
            );
            return None;
        };
        let activity = self.translate_schedule(model, activity)?;
        let number = match people.number_of_people_schedule(model) {
            Some(s) => self.translate_schedule(model, s)?,
            None => self.always_on(),
        };
        Some(IdfObject::with_fields(
            "People",
            [
                name,
                zone_name.to_string(),
                number,
                "People".to_string(),
                format_real(people.number_of_people(model)),
                String::new(),
                String::new(),
                format_real(people.fraction_radiant(model)),
                "autocalculate".to_string(),
                activity,
            ],
        ))
    }

    fn map_lights(&mut self, model: &Model, lights: Lights, zone_name: &str) -> Option<IdfObject> {
        let schedule = match lights.schedule(model) {
            Some(s) => self.translate_schedule(model, s)?,
            None => self.always_on(),
        };
        Some(IdfObject::with_fields(
            "Lights",
            [
                lights.name(model).unwrap_or_default(),
                zone_name.to_string(),
                schedule,
                "LightingLevel".to_string(),
                format_real(lights.lighting_level(model)),
                String::new(),
                String::new(),
                "0".to_string(),
                format_real(lights.fraction_radiant(model)),
                format_real(lights.fraction_visible(model)),
            ],
        ))
    }

    fn push_output_requests(&mut self) {
        let opts = self.options.clone();
        if !opts.exclude_sqlite_output_report {
            self.objects
                .push(IdfObject::with_fields("Output:SQLite", ["SimpleAndTabular"]));
        }
        let units = if opts.ip_tabular_output { "InchPound" } else { "None" };
        if !opts.exclude_html_output_report {
            self.objects.push(IdfObject::with_fields(
                "Output:Table:SummaryReports",
                ["AllSummary"],
            ));
            self.objects.push(IdfObject::with_fields(
                "OutputControl:Table:Style",
                ["HTML", units],
            ));
        } else if opts.ip_tabular_output {
            self.objects.push(IdfObject::with_fields(
                "OutputControl:Table:Style",
                ["Comma", units],
            ));
        }
        if !opts.exclude_variable_dictionary {
            self.objects.push(IdfObject::with_fields(
                "Output:VariableDictionary",
                ["IDF", "Unsorted"],
            ));
        }
    }
}

// ----------------------------------------------------------------------
// Simulation control
// ----------------------------------------------------------------------

fn version_object() -> IdfObject {
    let idd = IddFileType::EnergyPlus.idd();
    let version = idd
        .version()
        .parse::<os_core::VersionString>()
        .map(|v| format!("{}.{}", v.major(), v.minor()))
        .unwrap_or_else(|_| idd.version().to_string());
    IdfObject::with_fields("Version", [version])
}

fn map_timestep(model: &Model, timestep: Timestep) -> IdfObject {
    IdfObject::with_fields(
        "Timestep",
        [timestep.number_of_timesteps_per_hour(model).to_string()],
    )
}

fn map_building(model: &Model, building: Building) -> IdfObject {
    let terrain = model
        .get_site()
        .map(|s| s.terrain(model))
        .unwrap_or_else(|| "Suburbs".into());
    building_object(
        building.name(model).unwrap_or_else(|| "Building".into()),
        building.north_axis(model),
        terrain,
    )
}

fn building_object(name: String, north_axis: f64, terrain: String) -> IdfObject {
    IdfObject::with_fields(
        "Building",
        [
            name,
            format_real(north_axis),
            terrain,
            "0.04".into(),
            "0.4".into(),
            "FullExterior".into(),
            "25".into(),
            "6".into(),
        ],
    )
}

fn map_site(model: &Model, site: Site) -> IdfObject {
    IdfObject::with_fields(
        "Site:Location",
        [
            site.name(model).unwrap_or_else(|| "Site".into()),
            format_real(site.latitude(model)),
            format_real(site.longitude(model)),
            format_real(site.time_zone(model)),
            format_real(site.elevation(model)),
        ],
    )
}

fn map_run_period(model: &Model, rp: RunPeriod) -> IdfObject {
    run_period_object(
        rp.name(model).unwrap_or_else(|| "Run Period 1".into()),
        rp.begin(model).unwrap_or((1, 1)),
        rp.end(model).unwrap_or((12, 31)),
    )
}

fn run_period_object(name: String, begin: (u32, u32), end: (u32, u32)) -> IdfObject {
    IdfObject::with_fields(
        "RunPeriod",
        [
            name,
            begin.0.to_string(),
            begin.1.to_string(),
            String::new(),
            end.0.to_string(),
            end.1.to_string(),
            String::new(),
            String::new(),
            "Yes".into(),
            "Yes".into(),
        ],
    )
}

/// Zones are placed at the building origin; surfaces carry building coordinates.
fn map_zone(model: &Model, zone: ThermalZone) -> IdfObject {
    let spaces = zone.spaces(model);
    let counted = spaces.is_empty() || spaces.iter().any(|s| s.part_of_total_floor_area(model));
    IdfObject::with_fields(
        "Zone",
        [
            zone.name(model).unwrap_or_default(),
            "0".into(),
            "0".into(),
            "0".into(),
            "0".into(),
            "1".into(),
            zone.multiplier(model).to_string(),
            optional_or_autocalculate(zone.ceiling_height(model)),
            optional_or_autocalculate(zone.volume(model)),
            "autocalculate".into(),
            String::new(),
            String::new(),
            if counted { "Yes" } else { "No" }.into(),
        ],
    )
}

// ----------------------------------------------------------------------
// Field text
// ----------------------------------------------------------------------

fn until_text(until: TimeDelta) -> String {
    let minutes = until.num_minutes();
    format!("Until: {:02}:{:02}", minutes / 60, minutes % 60)
}

fn optional_real(value: Option<f64>) -> String {
    value.map(format_real).unwrap_or_default()
}

fn optional_or_autocalculate(value: Option<f64>) -> String {
    value
        .map(format_real)
        .unwrap_or_else(|| "autocalculate".into())
}

fn exposure(exposed: bool, yes: &str, no: &str) -> String {
    let text = if exposed { yes } else { no };
    text.to_string()
}

fn push_vertices(object: &mut IdfObject, vertices: &[Point3d]) {
    for p in vertices {
        object.push(format_real(p.x));
        object.push(format_real(p.y));
        object.push(format_real(p.z));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn until_text_pads_hours_and_minutes() {
        assert_eq!(until_text(TimeDelta::hours(8)), "Until: 08:00");
        assert_eq!(until_text(TimeDelta::minutes(24 * 60)), "Until: 24:00");
        assert_eq!(until_text(TimeDelta::minutes(90)), "Until: 01:30");
    }

    #[test]
    fn version_uses_major_minor() {
        assert_eq!(version_object().get(0), Some("9.4"));
    }

    #[test]
    fn options_default_to_all_reports() {
        let opts: ForwardTranslatorOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, ForwardTranslatorOptions::default());
        let opts: ForwardTranslatorOptions =
            serde_json::from_str(r#"{"ip_tabular_output": true}"#).unwrap();
        assert!(opts.ip_tabular_output);
        assert!(!opts.exclude_sqlite_output_report);
    }

    #[test]
    fn empty_model_gets_required_objects() {
        let model = Model::new();
        let mut ft = ForwardTranslator::new();
        let ws = ft.translate_model(&model).unwrap();
        for t in ["Version", "Building", "RunPeriod", "GlobalGeometryRules", "Output:SQLite"] {
            assert_eq!(ws.objects_by_type(t).len(), 1, "{t}");
        }
        assert!(ft.errors().is_empty());
    }

    #[test]
    fn memoization_emits_shared_schedule_once() {
        let model = os_model::example_model().unwrap();
        let mut ft = ForwardTranslator::new();
        let ws = ft.translate_model(&model).unwrap();
        // People and Lights share the occupancy schedule.
        assert_eq!(ws.objects_by_type("Schedule:Year").len(), 1);
        assert_eq!(ws.objects_by_type("Schedule:Week:Daily").len(), 1);
        assert_eq!(ws.objects_by_type("Schedule:Day:Interval").len(), 2);
    }
}
