//! Field indices of the bound OpenStudio object types.
//!
//! One module per type, constants in schema order.

pub mod version {
    pub const HANDLE: usize = 0;
    pub const VERSION_IDENTIFIER: usize = 1;
}

pub mod timestep {
    pub const NUMBER_OF_TIMESTEPS_PER_HOUR: usize = 1;
}

pub mod run_period {
    pub const NAME: usize = 1;
    pub const BEGIN_MONTH: usize = 2;
    pub const BEGIN_DAY_OF_MONTH: usize = 3;
    pub const END_MONTH: usize = 4;
    pub const END_DAY_OF_MONTH: usize = 5;
}

pub mod site {
    pub const NAME: usize = 1;
    pub const LATITUDE: usize = 2;
    pub const LONGITUDE: usize = 3;
    pub const TIME_ZONE: usize = 4;
    pub const ELEVATION: usize = 5;
    pub const TERRAIN: usize = 6;
}

pub mod building {
    pub const NAME: usize = 1;
    pub const NORTH_AXIS: usize = 2;
    pub const STANDARDS_BUILDING_TYPE: usize = 3;
}

pub mod building_story {
    pub const NAME: usize = 1;
    pub const NOMINAL_Z_COORDINATE: usize = 2;
    pub const NOMINAL_FLOOR_TO_FLOOR_HEIGHT: usize = 3;
}

pub mod thermal_zone {
    pub const NAME: usize = 1;
    pub const MULTIPLIER: usize = 2;
    pub const CEILING_HEIGHT: usize = 3;
    pub const VOLUME: usize = 4;
}

pub mod space {
    pub const NAME: usize = 1;
    pub const BUILDING_STORY_NAME: usize = 2;
    pub const THERMAL_ZONE_NAME: usize = 3;
    pub const X_ORIGIN: usize = 4;
    pub const Y_ORIGIN: usize = 5;
    pub const Z_ORIGIN: usize = 6;
    pub const DIRECTION_OF_RELATIVE_NORTH: usize = 7;
    pub const PART_OF_TOTAL_FLOOR_AREA: usize = 8;
}

pub mod surface {
    pub const NAME: usize = 1;
    pub const SURFACE_TYPE: usize = 2;
    pub const CONSTRUCTION_NAME: usize = 3;
    pub const SPACE_NAME: usize = 4;
    pub const OUTSIDE_BOUNDARY_CONDITION: usize = 5;
    pub const OUTSIDE_BOUNDARY_CONDITION_OBJECT: usize = 6;
    pub const SUN_EXPOSURE: usize = 7;
    pub const WIND_EXPOSURE: usize = 8;
    pub const VIEW_FACTOR_TO_GROUND: usize = 9;
    pub const FIRST_VERTEX: usize = 10;
}

pub mod sub_surface {
    pub const NAME: usize = 1;
    pub const SUB_SURFACE_TYPE: usize = 2;
    pub const CONSTRUCTION_NAME: usize = 3;
    pub const SURFACE_NAME: usize = 4;
    pub const OUTSIDE_BOUNDARY_CONDITION_OBJECT: usize = 5;
    pub const MULTIPLIER: usize = 6;
    pub const FIRST_VERTEX: usize = 7;
}

pub mod shading_surface_group {
    pub const NAME: usize = 1;
    pub const SHADING_SURFACE_TYPE: usize = 2;
    pub const SPACE_NAME: usize = 3;
    pub const DIRECTION_OF_RELATIVE_NORTH: usize = 4;
    pub const X_ORIGIN: usize = 5;
    pub const Y_ORIGIN: usize = 6;
    pub const Z_ORIGIN: usize = 7;
}

pub mod shading_surface {
    pub const NAME: usize = 1;
    pub const CONSTRUCTION_NAME: usize = 2;
    pub const SHADING_SURFACE_GROUP_NAME: usize = 3;
    pub const FIRST_VERTEX: usize = 4;
}

pub mod material {
    pub const NAME: usize = 1;
    pub const ROUGHNESS: usize = 2;
    pub const THICKNESS: usize = 3;
    pub const CONDUCTIVITY: usize = 4;
    pub const DENSITY: usize = 5;
    pub const SPECIFIC_HEAT: usize = 6;
    pub const THERMAL_ABSORPTANCE: usize = 7;
    pub const SOLAR_ABSORPTANCE: usize = 8;
    pub const VISIBLE_ABSORPTANCE: usize = 9;
}

pub mod simple_glazing {
    pub const NAME: usize = 1;
    pub const U_FACTOR: usize = 2;
    pub const SOLAR_HEAT_GAIN_COEFFICIENT: usize = 3;
    pub const VISIBLE_TRANSMITTANCE: usize = 4;
}

pub mod construction {
    pub const NAME: usize = 1;
    pub const SURFACE_RENDERING_NAME: usize = 2;
    pub const FIRST_LAYER: usize = 3;
}

pub mod schedule_type_limits {
    pub const NAME: usize = 1;
    pub const LOWER_LIMIT_VALUE: usize = 2;
    pub const UPPER_LIMIT_VALUE: usize = 3;
    pub const NUMERIC_TYPE: usize = 4;
    pub const UNIT_TYPE: usize = 5;
}

pub mod schedule_constant {
    pub const NAME: usize = 1;
    pub const SCHEDULE_TYPE_LIMITS_NAME: usize = 2;
    pub const VALUE: usize = 3;
}

pub mod schedule_day {
    pub const NAME: usize = 1;
    pub const SCHEDULE_TYPE_LIMITS_NAME: usize = 2;
    pub const INTERPOLATE_TO_TIMESTEP: usize = 3;
    pub const FIRST_HOUR: usize = 4;
}

pub mod schedule_week {
    pub const NAME: usize = 1;
    pub const SUNDAY: usize = 2;
    pub const MONDAY: usize = 3;
    pub const TUESDAY: usize = 4;
    pub const WEDNESDAY: usize = 5;
    pub const THURSDAY: usize = 6;
    pub const FRIDAY: usize = 7;
    pub const SATURDAY: usize = 8;
    pub const HOLIDAY: usize = 9;
    pub const SUMMER_DESIGN_DAY: usize = 10;
    pub const WINTER_DESIGN_DAY: usize = 11;
    pub const CUSTOM_DAY_1: usize = 12;
    pub const CUSTOM_DAY_2: usize = 13;
}

pub mod schedule_year {
    pub const NAME: usize = 1;
    pub const SCHEDULE_TYPE_LIMITS_NAME: usize = 2;
    pub const FIRST_MONTH: usize = 3;
}

pub mod people {
    pub const NAME: usize = 1;
    pub const SPACE_NAME: usize = 2;
    pub const NUMBER_OF_PEOPLE: usize = 3;
    pub const NUMBER_OF_PEOPLE_SCHEDULE_NAME: usize = 4;
    pub const ACTIVITY_LEVEL_SCHEDULE_NAME: usize = 5;
    pub const FRACTION_RADIANT: usize = 6;
}

pub mod lights {
    pub const NAME: usize = 1;
    pub const SPACE_NAME: usize = 2;
    pub const LIGHTING_LEVEL: usize = 3;
    pub const SCHEDULE_NAME: usize = 4;
    pub const FRACTION_RADIANT: usize = 5;
    pub const FRACTION_VISIBLE: usize = 6;
}
