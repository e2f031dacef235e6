//! A small complete model: one 10 m x 10 m x 3 m zone with a south window.

use chrono::{NaiveDate, TimeDelta};

use crate::construction::{Construction, SimpleGlazing, StandardOpaqueMaterial};
use crate::error::ModelResult;
use crate::geometry::Point3d;
use crate::loads::{Lights, People};
use crate::model::Model;
use crate::object::ModelObject;
use crate::schedule::{ScheduleConstant, ScheduleDay, ScheduleWeek, ScheduleYear};
use crate::site::{BASE_YEAR, BuildingStory};
use crate::surface::{SubSurface, Surface};
use crate::zone::{Space, ThermalZone};

fn p(x: f64, y: f64, z: f64) -> Point3d {
    Point3d::new(x, y, z)
}

/// Outlines of the box faces, wound counterclockwise from outside.
pub fn box_faces(w: f64, d: f64, h: f64) -> Vec<(&'static str, Vec<Point3d>)> {
    vec![
        ("Floor", vec![p(0.0, 0.0, 0.0), p(0.0, d, 0.0), p(w, d, 0.0), p(w, 0.0, 0.0)]),
        ("Roof", vec![p(0.0, 0.0, h), p(w, 0.0, h), p(w, d, h), p(0.0, d, h)]),
        ("South Wall", vec![p(0.0, 0.0, h), p(0.0, 0.0, 0.0), p(w, 0.0, 0.0), p(w, 0.0, h)]),
        ("East Wall", vec![p(w, 0.0, h), p(w, 0.0, 0.0), p(w, d, 0.0), p(w, d, h)]),
        ("North Wall", vec![p(w, d, h), p(w, d, 0.0), p(0.0, d, 0.0), p(0.0, d, h)]),
        ("West Wall", vec![p(0.0, d, h), p(0.0, d, 0.0), p(0.0, 0.0, 0.0), p(0.0, 0.0, h)]),
    ]
}

/// Site, run period, one story, zone and space with envelope, a south
/// window, occupancy and lighting on weekday/weekend schedules.
pub fn example_model() -> ModelResult<Model> {
    let mut model = Model::new();
    let m = &mut model;

    m.building()?.set_name(m, "Example Building")?;
    let site = m.site()?;
    site.set_latitude(m, 39.74)?;
    site.set_longitude(m, -105.18)?;
    site.set_time_zone(m, -7.0)?;
    site.set_elevation(m, 1829.0)?;
    m.timestep()?.set_number_of_timesteps_per_hour(m, 4)?;
    m.run_period()?;

    let brick = StandardOpaqueMaterial::new(m, "MediumRough", 0.1016, 0.89, 1920.0, 790.0)?;
    brick.set_name(m, "Brick")?;
    let insulation = StandardOpaqueMaterial::new(m, "MediumSmooth", 0.0508, 0.03, 43.0, 1210.0)?;
    insulation.set_name(m, "Insulation")?;
    let glazing = SimpleGlazing::new(m, 2.0, 0.4)?;
    glazing.set_name(m, "Double Glazing")?;

    let exterior = Construction::with_layers(m, &[brick.into(), insulation.into()])?;
    exterior.set_name(m, "Exterior Wall")?;
    let window_construction = Construction::with_layers(m, &[glazing.into()])?;
    window_construction.set_name(m, "Exterior Window")?;

    let story = BuildingStory::new(m)?;
    story.set_nominal_z_coordinate(m, 0.0)?;
    story.set_nominal_floor_to_floor_height(m, 3.0)?;
    let zone = ThermalZone::new(m)?;
    let space = Space::new(m)?;
    space.set_building_story(m, story)?;
    space.set_thermal_zone(m, zone)?;

    let mut south = None;
    for (name, outline) in box_faces(10.0, 10.0, 3.0) {
        let surface = Surface::new(m, &outline)?;
        surface.set_name(m, name)?;
        surface.set_space(m, space)?;
        surface.set_construction(m, exterior)?;
        if name == "South Wall" {
            south = Some(surface);
        }
    }
    if let Some(south) = south {
        let window = SubSurface::new(
            m,
            &[p(2.0, 0.0, 2.0), p(2.0, 0.0, 1.0), p(8.0, 0.0, 1.0), p(8.0, 0.0, 2.0)],
        )?;
        window.set_name(m, "South Window")?;
        window.set_surface(m, south)?;
        window.set_construction(m, window_construction)?;
    }

    let office = ScheduleDay::new(m, 0.0)?;
    office.set_name(m, "Office Weekday")?;
    office.add_value(m, TimeDelta::hours(8), 0.05)?;
    office.add_value(m, TimeDelta::hours(18), 0.9)?;
    let closed = ScheduleDay::new(m, 0.05)?;
    closed.set_name(m, "Office Weekend")?;
    let week = ScheduleWeek::new(m)?;
    week.set_name(m, "Office Week")?;
    week.set_all(m, closed)?;
    week.set_weekdays(m, office)?;
    let occupancy = ScheduleYear::new(m)?;
    occupancy.set_name(m, "Office Occupancy")?;
    if let Some(end) = NaiveDate::from_ymd_opt(BASE_YEAR, 12, 31) {
        occupancy.add_week(m, end, week)?;
    }
    let activity = ScheduleConstant::new(m, 120.0)?;
    activity.set_name(m, "Office Activity")?;

    let people = People::new(m, space, 8.0)?;
    people.set_number_of_people_schedule(m, occupancy.into())?;
    people.set_activity_level_schedule(m, activity.into())?;
    let lights = Lights::new(m, space, 900.0)?;
    lights.set_schedule(m, occupancy.into())?;

    Ok(model)
}
