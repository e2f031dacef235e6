//! Field indices of the EnergyPlus object types read by the reverse translator.

pub mod version {
    pub const VERSION_IDENTIFIER: usize = 0;
}

pub mod timestep {
    pub const NUMBER_OF_TIMESTEPS_PER_HOUR: usize = 0;
}

pub mod building {
    pub const NAME: usize = 0;
    pub const NORTH_AXIS: usize = 1;
    pub const TERRAIN: usize = 2;
}

pub mod global_geometry_rules {
    pub const STARTING_VERTEX_POSITION: usize = 0;
    pub const VERTEX_ENTRY_DIRECTION: usize = 1;
    pub const COORDINATE_SYSTEM: usize = 2;
}

pub mod site_location {
    pub const NAME: usize = 0;
    pub const LATITUDE: usize = 1;
    pub const LONGITUDE: usize = 2;
    pub const TIME_ZONE: usize = 3;
    pub const ELEVATION: usize = 4;
}

pub mod run_period {
    pub const NAME: usize = 0;
    pub const BEGIN_MONTH: usize = 1;
    pub const BEGIN_DAY_OF_MONTH: usize = 2;
    pub const END_MONTH: usize = 4;
    pub const END_DAY_OF_MONTH: usize = 5;
}

pub mod schedule_type_limits {
    pub const NAME: usize = 0;
    pub const LOWER_LIMIT_VALUE: usize = 1;
    pub const UPPER_LIMIT_VALUE: usize = 2;
    pub const NUMERIC_TYPE: usize = 3;
    pub const UNIT_TYPE: usize = 4;
}

pub mod schedule_day_interval {
    pub const NAME: usize = 0;
    pub const SCHEDULE_TYPE_LIMITS_NAME: usize = 1;
    pub const INTERPOLATE_TO_TIMESTEP: usize = 2;
}

pub mod schedule_week_daily {
    pub const NAME: usize = 0;
    pub const SUNDAY: usize = 1;
}

pub mod schedule_year {
    pub const NAME: usize = 0;
    pub const SCHEDULE_TYPE_LIMITS_NAME: usize = 1;
    pub const FIRST_WEEK: usize = 2;
}

pub mod schedule_constant {
    pub const NAME: usize = 0;
    pub const SCHEDULE_TYPE_LIMITS_NAME: usize = 1;
    pub const HOURLY_VALUE: usize = 2;
}

pub mod material {
    pub const NAME: usize = 0;
    pub const ROUGHNESS: usize = 1;
    pub const THICKNESS: usize = 2;
    pub const CONDUCTIVITY: usize = 3;
    pub const DENSITY: usize = 4;
    pub const SPECIFIC_HEAT: usize = 5;
    pub const SOLAR_ABSORPTANCE: usize = 7;
}

pub mod simple_glazing {
    pub const NAME: usize = 0;
    pub const U_FACTOR: usize = 1;
    pub const SOLAR_HEAT_GAIN_COEFFICIENT: usize = 2;
    pub const VISIBLE_TRANSMITTANCE: usize = 3;
}

pub mod construction {
    pub const NAME: usize = 0;
    pub const OUTSIDE_LAYER: usize = 1;
}

pub mod zone {
    pub const NAME: usize = 0;
    pub const DIRECTION_OF_RELATIVE_NORTH: usize = 1;
    pub const X_ORIGIN: usize = 2;
    pub const Y_ORIGIN: usize = 3;
    pub const Z_ORIGIN: usize = 4;
    pub const MULTIPLIER: usize = 6;
    pub const CEILING_HEIGHT: usize = 7;
    pub const VOLUME: usize = 8;
    pub const PART_OF_TOTAL_FLOOR_AREA: usize = 12;
}

pub mod building_surface {
    pub const NAME: usize = 0;
    pub const SURFACE_TYPE: usize = 1;
    pub const CONSTRUCTION_NAME: usize = 2;
    pub const ZONE_NAME: usize = 3;
    pub const OUTSIDE_BOUNDARY_CONDITION: usize = 4;
    pub const OUTSIDE_BOUNDARY_CONDITION_OBJECT: usize = 5;
    pub const FIRST_VERTEX: usize = 10;
}

pub mod fenestration_surface {
    pub const NAME: usize = 0;
    pub const SURFACE_TYPE: usize = 1;
    pub const CONSTRUCTION_NAME: usize = 2;
    pub const BUILDING_SURFACE_NAME: usize = 3;
    pub const OUTSIDE_BOUNDARY_CONDITION_OBJECT: usize = 4;
    pub const MULTIPLIER: usize = 7;
    pub const FIRST_VERTEX: usize = 9;
}

/// Shared by `Shading:Site:Detailed` and `Shading:Building:Detailed`.
pub mod shading_detailed {
    pub const NAME: usize = 0;
    pub const TRANSMITTANCE_SCHEDULE_NAME: usize = 1;
    pub const FIRST_VERTEX: usize = 3;
}

pub mod people {
    pub const NAME: usize = 0;
    pub const ZONE_NAME: usize = 1;
    pub const NUMBER_OF_PEOPLE_SCHEDULE_NAME: usize = 2;
    pub const CALCULATION_METHOD: usize = 3;
    pub const NUMBER_OF_PEOPLE: usize = 4;
    pub const PEOPLE_PER_FLOOR_AREA: usize = 5;
    pub const FLOOR_AREA_PER_PERSON: usize = 6;
    pub const FRACTION_RADIANT: usize = 7;
    pub const ACTIVITY_LEVEL_SCHEDULE_NAME: usize = 9;
}

pub mod lights {
    pub const NAME: usize = 0;
    pub const ZONE_NAME: usize = 1;
    pub const SCHEDULE_NAME: usize = 2;
    pub const CALCULATION_METHOD: usize = 3;
    pub const LIGHTING_LEVEL: usize = 4;
    pub const WATTS_PER_FLOOR_AREA: usize = 5;
    pub const WATTS_PER_PERSON: usize = 6;
    pub const FRACTION_RADIANT: usize = 8;
    pub const FRACTION_VISIBLE: usize = 9;
}

#[cfg(test)]
mod tests {
    use os_idd::IddFileType;

    fn assert_field(type_name: &str, index: usize, name: &str) {
        let idd = IddFileType::EnergyPlus.idd();
        let obj = idd.get_object(type_name).unwrap();
        assert_eq!(obj.field(index).unwrap().name, name, "{type_name}[{index}]");
    }

    #[test]
    fn indices_match_schema() {
        assert_field("Building", super::building::TERRAIN, "Terrain");
        assert_field("RunPeriod", super::run_period::END_DAY_OF_MONTH, "End Day of Month");
        assert_field("Schedule:Day:Interval", super::schedule_day_interval::INTERPOLATE_TO_TIMESTEP, "Interpolate to Timestep");
        assert_field("Schedule:Week:Daily", super::schedule_week_daily::SUNDAY, "Sunday Schedule:Day Name");
        assert_field("Schedule:Year", super::schedule_year::FIRST_WEEK, "Schedule:Week Name");
        assert_field("Material", super::material::SOLAR_ABSORPTANCE, "Solar Absorptance");
        assert_field("Zone", super::zone::MULTIPLIER, "Multiplier");
        assert_field("Zone", super::zone::PART_OF_TOTAL_FLOOR_AREA, "Part of Total Floor Area");
        assert_field("BuildingSurface:Detailed", super::building_surface::OUTSIDE_BOUNDARY_CONDITION_OBJECT, "Outside Boundary Condition Object");
        assert_field("BuildingSurface:Detailed", super::building_surface::FIRST_VERTEX, "Vertex X-coordinate");
        assert_field("FenestrationSurface:Detailed", super::fenestration_surface::MULTIPLIER, "Multiplier");
        assert_field("FenestrationSurface:Detailed", super::fenestration_surface::FIRST_VERTEX, "Vertex X-coordinate");
        assert_field("Shading:Site:Detailed", super::shading_detailed::FIRST_VERTEX, "Vertex X-coordinate");
        assert_field("Shading:Building:Detailed", super::shading_detailed::TRANSMITTANCE_SCHEDULE_NAME, "Transmittance Schedule Name");
        assert_field("People", super::people::ACTIVITY_LEVEL_SCHEDULE_NAME, "Activity Level Schedule Name");
        assert_field("Lights", super::lights::FRACTION_VISIBLE, "Fraction Visible");
    }
}
