//! Thermal zones and the spaces grouped into them.

use crate::error::{ModelError, ModelResult};
use crate::fields::{space, thermal_zone};
use crate::geometry::{Transformation, Vector3d, space_transformation};
use crate::loads::{Lights, People};
use crate::model::Model;
use crate::object::{ModelObject, model_object};
use crate::site::BuildingStory;
use crate::surface::{Surface, SurfaceType};

model_object!(
    /// Air volume with one thermostat; the unit EnergyPlus simulates.
    ThermalZone => "OS:ThermalZone"
);

impl ThermalZone {
    pub fn new(model: &mut Model) -> ModelResult<Self> {
        model.create(None)
    }

    pub fn multiplier(self, model: &Model) -> u32 {
        model
            .workspace()
            .get_int_or_default(self.id(), thermal_zone::MULTIPLIER)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(1)
    }

    pub fn set_multiplier(self, model: &mut Model, multiplier: u32) -> ModelResult<()> {
        Ok(model.workspace_mut().set_int(
            self.id(),
            thermal_zone::MULTIPLIER,
            i64::from(multiplier),
        )?)
    }

    /// `None` while autocalculated.
    pub fn ceiling_height(self, model: &Model) -> Option<f64> {
        model
            .workspace()
            .get_double(self.id(), thermal_zone::CEILING_HEIGHT)
    }

    pub fn set_ceiling_height(self, model: &mut Model, height: f64) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_double(self.id(), thermal_zone::CEILING_HEIGHT, height)?)
    }

    /// `None` while autocalculated.
    pub fn volume(self, model: &Model) -> Option<f64> {
        model.workspace().get_double(self.id(), thermal_zone::VOLUME)
    }

    pub fn set_volume(self, model: &mut Model, volume: f64) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_double(self.id(), thermal_zone::VOLUME, volume)?)
    }

    pub fn spaces(self, model: &Model) -> Vec<Space> {
        model
            .workspace()
            .sources_via_field(self.id(), Space::IDD_TYPE, space::THERMAL_ZONE_NAME)
            .into_iter()
            .map(Space::from_id_unchecked)
            .collect()
    }

    /// Floor area of the zone's spaces, without the multiplier.
    pub fn floor_area(self, model: &Model) -> f64 {
        self.spaces(model).iter().map(|s| s.floor_area(model)).sum()
    }
}

model_object!(
    /// Geometric room holding surfaces and internal loads.
    Space => "OS:Space"
);

impl Space {
    pub fn new(model: &mut Model) -> ModelResult<Self> {
        model.create(None)
    }

    pub fn building_story(self, model: &Model) -> Option<BuildingStory> {
        model
            .workspace()
            .get_target(self.id(), space::BUILDING_STORY_NAME)
            .map(BuildingStory::from_id_unchecked)
    }

    pub fn set_building_story(self, model: &mut Model, story: BuildingStory) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_pointer(self.id(), space::BUILDING_STORY_NAME, story.id())?)
    }

    pub fn thermal_zone(self, model: &Model) -> Option<ThermalZone> {
        model
            .workspace()
            .get_target(self.id(), space::THERMAL_ZONE_NAME)
            .map(ThermalZone::from_id_unchecked)
    }

    pub fn set_thermal_zone(self, model: &mut Model, zone: ThermalZone) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_pointer(self.id(), space::THERMAL_ZONE_NAME, zone.id())?)
    }

    pub fn reset_thermal_zone(self, model: &mut Model) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_empty(self.id(), space::THERMAL_ZONE_NAME)?)
    }

    /// Multiplier of the space's zone, 1 without a zone.
    pub fn multiplier(self, model: &Model) -> u32 {
        self.thermal_zone(model).map_or(1, |z| z.multiplier(model))
    }

    pub fn origin(self, model: &Model) -> Vector3d {
        let ws = model.workspace();
        let get = |i| ws.get_double_or_default(self.id(), i).unwrap_or(0.0);
        Vector3d::new(get(space::X_ORIGIN), get(space::Y_ORIGIN), get(space::Z_ORIGIN))
    }

    pub fn set_origin(self, model: &mut Model, origin: Vector3d) -> ModelResult<()> {
        let ws = model.workspace_mut();
        ws.set_double(self.id(), space::X_ORIGIN, origin.x)?;
        ws.set_double(self.id(), space::Y_ORIGIN, origin.y)?;
        ws.set_double(self.id(), space::Z_ORIGIN, origin.z)?;
        Ok(())
    }

    pub fn direction_of_relative_north(self, model: &Model) -> f64 {
        model
            .workspace()
            .get_double_or_default(self.id(), space::DIRECTION_OF_RELATIVE_NORTH)
            .unwrap_or(0.0)
    }

    pub fn set_direction_of_relative_north(self, model: &mut Model, degrees: f64) -> ModelResult<()> {
        Ok(model.workspace_mut().set_double(
            self.id(),
            space::DIRECTION_OF_RELATIVE_NORTH,
            degrees,
        )?)
    }

    pub fn part_of_total_floor_area(self, model: &Model) -> bool {
        model
            .workspace()
            .get_string_or_default(self.id(), space::PART_OF_TOTAL_FLOOR_AREA)
            .is_none_or(|v| !v.eq_ignore_ascii_case("No"))
    }

    pub fn set_part_of_total_floor_area(self, model: &mut Model, value: bool) -> ModelResult<()> {
        Ok(model.workspace_mut().set_string(
            self.id(),
            space::PART_OF_TOTAL_FLOOR_AREA,
            if value { "Yes" } else { "No" },
        )?)
    }

    /// Space coordinates to building coordinates.
    pub fn transformation(self, model: &Model) -> Transformation {
        space_transformation(self.origin(model), self.direction_of_relative_north(model))
    }

    /// Moves the space's origin so that `t` maps space coordinates to building
    /// coordinates. Only rotations about z are representable.
    pub fn set_transformation(self, model: &mut Model, t: &Transformation) -> ModelResult<()> {
        let (axis_z, angle) = t
            .rotation
            .axis_angle()
            .map_or((1.0, 0.0), |(axis, angle)| (axis.z, angle));
        if (axis_z.abs() - 1.0).abs() > 1e-9 {
            return Err(ModelError::Geometry(
                "space transformations may only rotate about the z axis".into(),
            ));
        }
        let north = -(axis_z.signum() * angle).to_degrees();
        self.set_origin(model, t.translation.vector)?;
        self.set_direction_of_relative_north(model, north)
    }

    pub fn surfaces(self, model: &Model) -> Vec<Surface> {
        model
            .workspace()
            .sources_via_field(self.id(), Surface::IDD_TYPE, crate::fields::surface::SPACE_NAME)
            .into_iter()
            .map(Surface::from_id_unchecked)
            .collect()
    }

    pub fn people(self, model: &Model) -> Vec<People> {
        model
            .workspace()
            .sources_via_field(self.id(), People::IDD_TYPE, crate::fields::people::SPACE_NAME)
            .into_iter()
            .map(People::from_id_unchecked)
            .collect()
    }

    pub fn lights(self, model: &Model) -> Vec<Lights> {
        model
            .workspace()
            .sources_via_field(self.id(), Lights::IDD_TYPE, crate::fields::lights::SPACE_NAME)
            .into_iter()
            .map(Lights::from_id_unchecked)
            .collect()
    }

    /// Sum of the gross areas of the space's floors.
    pub fn floor_area(self, model: &Model) -> f64 {
        self.surfaces(model)
            .into_iter()
            .filter(|s| s.surface_type(model) == Some(SurfaceType::Floor))
            .map(|s| s.gross_area(model))
            .sum()
    }

    pub fn number_of_people(self, model: &Model) -> f64 {
        self.people(model)
            .iter()
            .map(|p| p.number_of_people(model))
            .sum()
    }

    pub fn lighting_power(self, model: &Model) -> f64 {
        self.lights(model).iter().map(|l| l.lighting_level(model)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3d;

    fn square_floor() -> Vec<Point3d> {
        vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(0.0, 10.0, 0.0),
            Point3d::new(10.0, 10.0, 0.0),
            Point3d::new(10.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn zone_collects_spaces_and_area() {
        let mut model = Model::new();
        let zone = ThermalZone::new(&mut model).unwrap();
        let space = Space::new(&mut model).unwrap();
        space.set_thermal_zone(&mut model, zone).unwrap();
        let floor = Surface::new(&mut model, &square_floor()).unwrap();
        floor.set_space(&mut model, space).unwrap();

        assert_eq!(zone.spaces(&model), vec![space]);
        assert!((space.floor_area(&model) - 100.0).abs() < 1e-9);

        zone.set_multiplier(&mut model, 3).unwrap();
        let building = model.building().unwrap();
        assert!((building.floor_area(&model) - 300.0).abs() < 1e-9);

        space.set_part_of_total_floor_area(&mut model, false).unwrap();
        assert_eq!(building.floor_area(&model), 0.0);
    }

    #[test]
    fn zone_rename_is_visible_from_space() {
        let mut model = Model::new();
        let zone = ThermalZone::new(&mut model).unwrap();
        let space = Space::new(&mut model).unwrap();
        space.set_thermal_zone(&mut model, zone).unwrap();
        zone.set_name(&mut model, "Core").unwrap();
        let text = model
            .workspace()
            .get_string(space.id(), space::THERMAL_ZONE_NAME);
        assert_eq!(text.as_deref(), Some("Core"));
    }

    #[test]
    fn transformation_round_trips_through_fields() {
        let mut model = Model::new();
        let space = Space::new(&mut model).unwrap();
        let t = space_transformation(Vector3d::new(5.0, -2.0, 3.0), 30.0);
        space.set_transformation(&mut model, &t).unwrap();
        assert!((space.direction_of_relative_north(&model) - 30.0).abs() < 1e-9);
        assert!((space.origin(&model) - Vector3d::new(5.0, -2.0, 3.0)).norm() < 1e-9);
    }

    #[test]
    fn removing_space_removes_its_surfaces() {
        let mut model = Model::new();
        let space = Space::new(&mut model).unwrap();
        let floor = Surface::new(&mut model, &square_floor()).unwrap();
        floor.set_space(&mut model, space).unwrap();
        space.remove(&mut model).unwrap();
        assert!(!floor.exists(&model));
        assert!(model.objects::<Surface>().is_empty());
    }
}
