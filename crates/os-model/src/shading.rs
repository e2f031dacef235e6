//! Shading surfaces and the groups that place them.
//!
//! A group's type says which coordinates its surfaces are in: site groups
//! are fixed to the ground, building groups move with the building, space
//! groups with their space.

use core::fmt;
use core::str::FromStr;

use crate::construction::Construction;
use crate::error::{ModelError, ModelResult};
use crate::fields::{shading_surface, shading_surface_group};
use crate::geometry::{self, Point3d, Transformation, Vector3d, space_transformation};
use crate::model::Model;
use crate::object::{ModelObject, model_object};
use crate::surface::{check_vertices, read_vertices, write_vertices};
use crate::zone::Space;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadingSurfaceType {
    Site,
    Building,
    Space,
}

impl ShadingSurfaceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ShadingSurfaceType::Site => "Site",
            ShadingSurfaceType::Building => "Building",
            ShadingSurfaceType::Space => "Space",
        }
    }
}

impl FromStr for ShadingSurfaceType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "site" => Ok(ShadingSurfaceType::Site),
            "building" => Ok(ShadingSurfaceType::Building),
            "space" => Ok(ShadingSurfaceType::Space),
            _ => Err(ModelError::InvalidValue {
                field: "shading surface type",
                value: s.to_string(),
                reason: "expected Site, Building or Space".into(),
            }),
        }
    }
}

impl fmt::Display for ShadingSurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ----------------------------------------------------------------------
// ShadingSurfaceGroup
// ----------------------------------------------------------------------

model_object!(
    /// Set of shading surfaces sharing one coordinate system.
    ShadingSurfaceGroup => "OS:ShadingSurfaceGroup"
);

impl ShadingSurfaceGroup {
    /// New group of a site or building type; use [`ShadingSurfaceGroup::for_space`]
    /// for space shading.
    pub fn new(model: &mut Model, t: ShadingSurfaceType) -> ModelResult<Self> {
        if t == ShadingSurfaceType::Space {
            return Err(ModelError::InvalidValue {
                field: "shading surface type",
                value: t.as_str().into(),
                reason: "space groups are created with a space".into(),
            });
        }
        let g: ShadingSurfaceGroup = model.create(None)?;
        g.write_type(model, t)?;
        Ok(g)
    }

    pub fn for_space(model: &mut Model, space: Space) -> ModelResult<Self> {
        let g: ShadingSurfaceGroup = model.create(None)?;
        g.set_space(model, space)?;
        Ok(g)
    }

    /// First building group in the model, created when there is none.
    pub fn building_group(model: &mut Model) -> ModelResult<Self> {
        let existing = model
            .objects::<ShadingSurfaceGroup>()
            .into_iter()
            .find(|g| g.shading_surface_type(model) == Some(ShadingSurfaceType::Building));
        match existing {
            Some(g) => Ok(g),
            None => Self::new(model, ShadingSurfaceType::Building),
        }
    }

    pub fn shading_surface_type(self, model: &Model) -> Option<ShadingSurfaceType> {
        model
            .workspace()
            .get_string(self.id(), shading_surface_group::SHADING_SURFACE_TYPE)?
            .parse()
            .ok()
    }

    fn write_type(self, model: &mut Model, t: ShadingSurfaceType) -> ModelResult<()> {
        Ok(model.workspace_mut().set_string(
            self.id(),
            shading_surface_group::SHADING_SURFACE_TYPE,
            t.as_str(),
        )?)
    }

    /// Switch to site or building coordinates, dropping any space.
    pub fn set_shading_surface_type(self, model: &mut Model, t: ShadingSurfaceType) -> ModelResult<()> {
        if t == ShadingSurfaceType::Space {
            return Err(ModelError::InvalidValue {
                field: "shading surface type",
                value: t.as_str().into(),
                reason: "set a space instead".into(),
            });
        }
        model
            .workspace_mut()
            .set_empty(self.id(), shading_surface_group::SPACE_NAME)?;
        self.write_type(model, t)
    }

    pub fn space(self, model: &Model) -> Option<Space> {
        model
            .workspace()
            .get_target(self.id(), shading_surface_group::SPACE_NAME)
            .map(Space::from_id_unchecked)
    }

    pub fn set_space(self, model: &mut Model, space: Space) -> ModelResult<()> {
        model
            .workspace_mut()
            .set_pointer(self.id(), shading_surface_group::SPACE_NAME, space.id())?;
        self.write_type(model, ShadingSurfaceType::Space)
    }

    pub fn origin(self, model: &Model) -> Vector3d {
        let ws = model.workspace();
        let get = |i| ws.get_double_or_default(self.id(), i).unwrap_or(0.0);
        Vector3d::new(
            get(shading_surface_group::X_ORIGIN),
            get(shading_surface_group::Y_ORIGIN),
            get(shading_surface_group::Z_ORIGIN),
        )
    }

    pub fn set_origin(self, model: &mut Model, origin: Vector3d) -> ModelResult<()> {
        let ws = model.workspace_mut();
        ws.set_double(self.id(), shading_surface_group::X_ORIGIN, origin.x)?;
        ws.set_double(self.id(), shading_surface_group::Y_ORIGIN, origin.y)?;
        ws.set_double(self.id(), shading_surface_group::Z_ORIGIN, origin.z)?;
        Ok(())
    }

    pub fn direction_of_relative_north(self, model: &Model) -> f64 {
        model
            .workspace()
            .get_double_or_default(self.id(), shading_surface_group::DIRECTION_OF_RELATIVE_NORTH)
            .unwrap_or(0.0)
    }

    pub fn set_direction_of_relative_north(self, model: &mut Model, degrees: f64) -> ModelResult<()> {
        Ok(model.workspace_mut().set_double(
            self.id(),
            shading_surface_group::DIRECTION_OF_RELATIVE_NORTH,
            degrees,
        )?)
    }

    /// Group coordinates to site coordinates for site groups, to building
    /// coordinates otherwise. Space groups go through their space.
    pub fn transformation(self, model: &Model) -> Transformation {
        let own = space_transformation(self.origin(model), self.direction_of_relative_north(model));
        match self.space(model) {
            Some(space) => space.transformation(model) * own,
            None => own,
        }
    }

    pub fn shading_surfaces(self, model: &Model) -> Vec<ShadingSurface> {
        model
            .workspace()
            .sources_via_field(
                self.id(),
                ShadingSurface::IDD_TYPE,
                shading_surface::SHADING_SURFACE_GROUP_NAME,
            )
            .into_iter()
            .map(ShadingSurface::from_id_unchecked)
            .collect()
    }
}

// ----------------------------------------------------------------------
// ShadingSurface
// ----------------------------------------------------------------------

model_object!(
    /// Opaque polygon that casts shadows but bounds no space.
    ShadingSurface => "OS:ShadingSurface"
);

impl ShadingSurface {
    pub fn new(model: &mut Model, vertices: &[Point3d]) -> ModelResult<Self> {
        check_vertices(vertices)?;
        let s: ShadingSurface = model.create(None)?;
        if let Err(e) = write_vertices(model, s.id(), vertices) {
            model.workspace_mut().remove_object(s.id())?;
            return Err(e);
        }
        Ok(s)
    }

    pub fn vertices(self, model: &Model) -> Vec<Point3d> {
        read_vertices(model, self.id())
    }

    pub fn set_vertices(self, model: &mut Model, vertices: &[Point3d]) -> ModelResult<()> {
        write_vertices(model, self.id(), vertices)
    }

    /// Vertices in the coordinates of the group's type.
    pub fn absolute_vertices(self, model: &Model) -> Vec<Point3d> {
        let vertices = self.vertices(model);
        match self.shading_surface_group(model) {
            Some(group) => geometry::transform_all(&group.transformation(model), &vertices),
            None => vertices,
        }
    }

    pub fn gross_area(self, model: &Model) -> f64 {
        geometry::area(&self.vertices(model))
    }

    pub fn shading_surface_group(self, model: &Model) -> Option<ShadingSurfaceGroup> {
        model
            .workspace()
            .get_target(self.id(), shading_surface::SHADING_SURFACE_GROUP_NAME)
            .map(ShadingSurfaceGroup::from_id_unchecked)
    }

    pub fn set_shading_surface_group(self, model: &mut Model, group: ShadingSurfaceGroup) -> ModelResult<()> {
        Ok(model.workspace_mut().set_pointer(
            self.id(),
            shading_surface::SHADING_SURFACE_GROUP_NAME,
            group.id(),
        )?)
    }

    pub fn construction(self, model: &Model) -> Option<Construction> {
        model
            .workspace()
            .get_target(self.id(), shading_surface::CONSTRUCTION_NAME)
            .map(Construction::from_id_unchecked)
    }

    pub fn set_construction(self, model: &mut Model, c: Construction) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_pointer(self.id(), shading_surface::CONSTRUCTION_NAME, c.id())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(z: f64) -> Vec<Point3d> {
        vec![
            Point3d::new(0.0, 0.0, z),
            Point3d::new(2.0, 0.0, z),
            Point3d::new(2.0, 1.0, z),
            Point3d::new(0.0, 1.0, z),
        ]
    }

    #[test]
    fn building_group_is_shared() {
        let mut model = Model::new();
        let a = ShadingSurfaceGroup::building_group(&mut model).unwrap();
        let b = ShadingSurfaceGroup::building_group(&mut model).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.shading_surface_type(&model), Some(ShadingSurfaceType::Building));
        assert!(ShadingSurfaceGroup::new(&mut model, ShadingSurfaceType::Space).is_err());
    }

    #[test]
    fn space_groups_follow_their_space() {
        let mut model = Model::new();
        let space = Space::new(&mut model).unwrap();
        space.set_origin(&mut model, Vector3d::new(10.0, 0.0, 0.0)).unwrap();
        let group = ShadingSurfaceGroup::for_space(&mut model, space).unwrap();
        group.set_origin(&mut model, Vector3d::new(0.0, 5.0, 0.0)).unwrap();
        let shade = ShadingSurface::new(&mut model, &square(3.0)).unwrap();
        shade.set_shading_surface_group(&mut model, group).unwrap();

        assert_eq!(group.shading_surface_type(&model), Some(ShadingSurfaceType::Space));
        assert_eq!(group.shading_surfaces(&model), vec![shade]);
        let first = shade.absolute_vertices(&model)[0];
        assert!((first - Point3d::new(10.0, 5.0, 3.0)).norm() < 1e-9);
        assert!((shade.gross_area(&model) - 2.0).abs() < 1e-12);

        group
            .set_shading_surface_type(&mut model, ShadingSurfaceType::Site)
            .unwrap();
        assert!(group.space(&model).is_none());
    }

    #[test]
    fn removing_a_group_removes_its_surfaces() {
        let mut model = Model::new();
        let group = ShadingSurfaceGroup::new(&mut model, ShadingSurfaceType::Site).unwrap();
        let shade = ShadingSurface::new(&mut model, &square(0.0)).unwrap();
        shade.set_shading_surface_group(&mut model, group).unwrap();
        group.remove(&mut model).unwrap();
        assert!(!shade.exists(&model));
    }

    #[test]
    fn removing_a_space_removes_its_shading() {
        let mut model = Model::new();
        let space = Space::new(&mut model).unwrap();
        let group = ShadingSurfaceGroup::for_space(&mut model, space).unwrap();
        space.remove(&mut model).unwrap();
        assert!(!group.exists(&model));
    }
}
