//! Heat transfer surfaces and the windows and doors set into them.

use core::fmt;
use core::str::FromStr;

use os_core::{GEOMETRY_TOL, ObjectId, format_real};

use crate::construction::Construction;
use crate::error::{ModelError, ModelResult};
use crate::fields::{sub_surface, surface};
use crate::geometry::{self, Point3d, Vector3d};
use crate::model::Model;
use crate::object::{ModelObject, model_object};
use crate::zone::Space;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceType {
    Floor,
    Wall,
    RoofCeiling,
}

impl SurfaceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SurfaceType::Floor => "Floor",
            SurfaceType::Wall => "Wall",
            SurfaceType::RoofCeiling => "RoofCeiling",
        }
    }

    /// Type implied by the tilt of the outward normal.
    pub fn from_tilt(tilt_rad: f64) -> Self {
        let degrees = tilt_rad.to_degrees();
        if degrees < 60.0 {
            SurfaceType::RoofCeiling
        } else if degrees < 179.0 {
            SurfaceType::Wall
        } else {
            SurfaceType::Floor
        }
    }
}

impl FromStr for SurfaceType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floor" => Ok(SurfaceType::Floor),
            "wall" => Ok(SurfaceType::Wall),
            "roofceiling" => Ok(SurfaceType::RoofCeiling),
            _ => Err(ModelError::InvalidValue {
                field: "surface type",
                value: s.to_string(),
                reason: "expected Floor, Wall or RoofCeiling".into(),
            }),
        }
    }
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryCondition {
    Adiabatic,
    Surface,
    Outdoors,
    Ground,
}

impl BoundaryCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            BoundaryCondition::Adiabatic => "Adiabatic",
            BoundaryCondition::Surface => "Surface",
            BoundaryCondition::Outdoors => "Outdoors",
            BoundaryCondition::Ground => "Ground",
        }
    }
}

impl FromStr for BoundaryCondition {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adiabatic" => Ok(BoundaryCondition::Adiabatic),
            "surface" => Ok(BoundaryCondition::Surface),
            "outdoors" => Ok(BoundaryCondition::Outdoors),
            "ground" => Ok(BoundaryCondition::Ground),
            _ => Err(ModelError::InvalidValue {
                field: "outside boundary condition",
                value: s.to_string(),
                reason: "expected Adiabatic, Surface, Outdoors or Ground".into(),
            }),
        }
    }
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubSurfaceType {
    FixedWindow,
    OperableWindow,
    Door,
    GlassDoor,
    OverheadDoor,
    Skylight,
}

impl SubSurfaceType {
    pub const ALL: [SubSurfaceType; 6] = [
        SubSurfaceType::FixedWindow,
        SubSurfaceType::OperableWindow,
        SubSurfaceType::Door,
        SubSurfaceType::GlassDoor,
        SubSurfaceType::OverheadDoor,
        SubSurfaceType::Skylight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubSurfaceType::FixedWindow => "FixedWindow",
            SubSurfaceType::OperableWindow => "OperableWindow",
            SubSurfaceType::Door => "Door",
            SubSurfaceType::GlassDoor => "GlassDoor",
            SubSurfaceType::OverheadDoor => "OverheadDoor",
            SubSurfaceType::Skylight => "Skylight",
        }
    }

    pub fn is_window(self) -> bool {
        matches!(
            self,
            SubSurfaceType::FixedWindow | SubSurfaceType::OperableWindow | SubSurfaceType::Skylight
        )
    }
}

impl FromStr for SubSurfaceType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::InvalidValue {
                field: "sub surface type",
                value: s.to_string(),
                reason: "unknown sub surface type".into(),
            })
    }
}

impl fmt::Display for SubSurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ----------------------------------------------------------------------
// Shared vertex storage
// ----------------------------------------------------------------------

pub(crate) fn read_vertices(model: &Model, id: ObjectId) -> Vec<Point3d> {
    let ws = model.workspace();
    (0..ws.num_extensible_groups(id))
        .filter_map(|g| {
            let group = ws.extensible_group(id, g)?;
            let coord = |i: usize| -> Option<f64> { group.get(i)?.as_deref()?.trim().parse().ok() };
            Some(Point3d::new(coord(0)?, coord(1)?, coord(2)?))
        })
        .collect()
}

pub(crate) fn check_vertices(vertices: &[Point3d]) -> ModelResult<()> {
    if vertices.len() < 3 {
        return Err(ModelError::Geometry(format!(
            "a surface needs at least 3 vertices, got {}",
            vertices.len()
        )));
    }
    if vertices.iter().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
        return Err(ModelError::Geometry("vertex coordinates must be finite".into()));
    }
    if geometry::outward_normal(vertices).is_none() {
        return Err(ModelError::Geometry("vertices do not span an area".into()));
    }
    Ok(())
}

pub(crate) fn write_vertices(model: &mut Model, id: ObjectId, vertices: &[Point3d]) -> ModelResult<()> {
    check_vertices(vertices)?;
    let ws = model.workspace_mut();
    ws.clear_extensible_groups(id)?;
    for p in vertices {
        let (x, y, z) = (format_real(p.x), format_real(p.y), format_real(p.z));
        ws.push_extensible_group(id, &[&x, &y, &z])?;
    }
    Ok(())
}

fn construction_of(model: &Model, id: ObjectId, index: usize) -> Option<Construction> {
    model
        .workspace()
        .get_target(id, index)
        .map(Construction::from_id_unchecked)
}

// ----------------------------------------------------------------------
// Surface
// ----------------------------------------------------------------------

model_object!(
    /// Planar polygon bounding a space, in the space's coordinates.
    Surface => "OS:Surface"
);

impl Surface {
    /// New surface with its type, boundary condition and exposures
    /// defaulted from the vertices.
    pub fn new(model: &mut Model, vertices: &[Point3d]) -> ModelResult<Self> {
        check_vertices(vertices)?;
        let s: Surface = model.create(None)?;
        if let Err(e) = s.init(model, vertices) {
            model.workspace_mut().remove_object(s.id())?;
            return Err(e);
        }
        Ok(s)
    }

    fn init(self, model: &mut Model, vertices: &[Point3d]) -> ModelResult<()> {
        write_vertices(model, self.id(), vertices)?;
        self.assign_default_surface_type(model)?;
        self.assign_default_boundary_condition(model)
    }

    pub fn vertices(self, model: &Model) -> Vec<Point3d> {
        read_vertices(model, self.id())
    }

    /// Replace the vertices; at least three, spanning a nonzero area.
    pub fn set_vertices(self, model: &mut Model, vertices: &[Point3d]) -> ModelResult<()> {
        write_vertices(model, self.id(), vertices)?;
        if self.surface_type(model).is_none() {
            self.assign_default_surface_type(model)?;
        }
        Ok(())
    }

    /// Vertices in building coordinates.
    pub fn absolute_vertices(self, model: &Model) -> Vec<Point3d> {
        let vertices = self.vertices(model);
        match self.space(model) {
            Some(space) => geometry::transform_all(&space.transformation(model), &vertices),
            None => vertices,
        }
    }

    pub fn outward_normal(self, model: &Model) -> Option<Vector3d> {
        geometry::outward_normal(&self.vertices(model))
    }

    /// Tilt in radians, 0 facing up.
    pub fn tilt(self, model: &Model) -> Option<f64> {
        self.outward_normal(model).map(|n| geometry::tilt(&n))
    }

    /// Azimuth in radians, clockwise from the space's north.
    pub fn azimuth(self, model: &Model) -> Option<f64> {
        self.outward_normal(model).map(|n| geometry::azimuth(&n))
    }

    pub fn gross_area(self, model: &Model) -> f64 {
        geometry::area(&self.vertices(model))
    }

    /// Gross area less the area of the sub-surfaces (multipliers applied).
    pub fn net_area(self, model: &Model) -> f64 {
        let openings: f64 = self
            .sub_surfaces(model)
            .iter()
            .map(|s| s.gross_area(model) * s.multiplier(model))
            .sum();
        self.gross_area(model) - openings
    }

    pub fn surface_type(self, model: &Model) -> Option<SurfaceType> {
        model
            .workspace()
            .get_string(self.id(), surface::SURFACE_TYPE)?
            .parse()
            .ok()
    }

    pub fn set_surface_type(self, model: &mut Model, t: SurfaceType) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_string(self.id(), surface::SURFACE_TYPE, t.as_str())?)
    }

    pub fn assign_default_surface_type(self, model: &mut Model) -> ModelResult<()> {
        let tilt = self
            .tilt(model)
            .ok_or_else(|| ModelError::Geometry("surface has no normal".into()))?;
        self.set_surface_type(model, SurfaceType::from_tilt(tilt))
    }

    pub fn space(self, model: &Model) -> Option<Space> {
        model
            .workspace()
            .get_target(self.id(), surface::SPACE_NAME)
            .map(Space::from_id_unchecked)
    }

    pub fn set_space(self, model: &mut Model, space: Space) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_pointer(self.id(), surface::SPACE_NAME, space.id())?)
    }

    pub fn construction(self, model: &Model) -> Option<Construction> {
        construction_of(model, self.id(), surface::CONSTRUCTION_NAME)
    }

    pub fn set_construction(self, model: &mut Model, c: Construction) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_pointer(self.id(), surface::CONSTRUCTION_NAME, c.id())?)
    }

    pub fn reset_construction(self, model: &mut Model) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_empty(self.id(), surface::CONSTRUCTION_NAME)?)
    }

    pub fn outside_boundary_condition(self, model: &Model) -> Option<BoundaryCondition> {
        model
            .workspace()
            .get_string(self.id(), surface::OUTSIDE_BOUNDARY_CONDITION)?
            .parse()
            .ok()
    }

    /// Sets the condition and the matching sun and wind exposure.
    /// `Surface` is only set through [`Surface::set_adjacent_surface`].
    pub fn set_outside_boundary_condition(
        self,
        model: &mut Model,
        bc: BoundaryCondition,
    ) -> ModelResult<()> {
        if bc == BoundaryCondition::Surface && self.adjacent_surface(model).is_none() {
            return Err(ModelError::InvalidValue {
                field: "outside boundary condition",
                value: bc.as_str().into(),
                reason: "set an adjacent surface instead".into(),
            });
        }
        if bc != BoundaryCondition::Surface && self.adjacent_surface(model).is_some() {
            self.reset_adjacent_surface(model)?;
        }
        self.write_boundary_condition(model, bc)
    }

    fn write_boundary_condition(self, model: &mut Model, bc: BoundaryCondition) -> ModelResult<()> {
        let outdoors = bc == BoundaryCondition::Outdoors;
        let ws = model.workspace_mut();
        ws.set_string(self.id(), surface::OUTSIDE_BOUNDARY_CONDITION, bc.as_str())?;
        ws.set_string(
            self.id(),
            surface::SUN_EXPOSURE,
            if outdoors { "SunExposed" } else { "NoSun" },
        )?;
        ws.set_string(
            self.id(),
            surface::WIND_EXPOSURE,
            if outdoors { "WindExposed" } else { "NoWind" },
        )?;
        Ok(())
    }

    /// `Surface` when matched, `Ground` for floors, `Outdoors` otherwise.
    pub fn assign_default_boundary_condition(self, model: &mut Model) -> ModelResult<()> {
        let bc = if self.adjacent_surface(model).is_some() {
            BoundaryCondition::Surface
        } else if self.surface_type(model) == Some(SurfaceType::Floor) {
            BoundaryCondition::Ground
        } else {
            BoundaryCondition::Outdoors
        };
        self.write_boundary_condition(model, bc)
    }

    pub fn sun_exposed(self, model: &Model) -> bool {
        model
            .workspace()
            .get_string_or_default(self.id(), surface::SUN_EXPOSURE)
            .is_some_and(|v| v.eq_ignore_ascii_case("SunExposed"))
    }

    pub fn wind_exposed(self, model: &Model) -> bool {
        model
            .workspace()
            .get_string_or_default(self.id(), surface::WIND_EXPOSURE)
            .is_some_and(|v| v.eq_ignore_ascii_case("WindExposed"))
    }

    pub fn view_factor_to_ground(self, model: &Model) -> Option<f64> {
        model
            .workspace()
            .get_double(self.id(), surface::VIEW_FACTOR_TO_GROUND)
    }

    pub fn sub_surfaces(self, model: &Model) -> Vec<SubSurface> {
        model
            .workspace()
            .sources_via_field(self.id(), SubSurface::IDD_TYPE, sub_surface::SURFACE_NAME)
            .into_iter()
            .map(SubSurface::from_id_unchecked)
            .collect()
    }

    pub fn adjacent_surface(self, model: &Model) -> Option<Surface> {
        model
            .workspace()
            .get_target(self.id(), surface::OUTSIDE_BOUNDARY_CONDITION_OBJECT)
            .map(Surface::from_id_unchecked)
    }

    /// Link both surfaces to each other with boundary condition `Surface`.
    /// Earlier partners of either side are reset.
    pub fn set_adjacent_surface(self, model: &mut Model, other: Surface) -> ModelResult<()> {
        if other == self {
            return Err(ModelError::Geometry(
                "a surface cannot be adjacent to itself".into(),
            ));
        }
        for s in [self, other] {
            if let Some(previous) = s.adjacent_surface(model)
                && previous != self
                && previous != other
            {
                previous.reset_adjacent_surface(model)?;
            }
        }
        for (a, b) in [(self, other), (other, self)] {
            model.workspace_mut().set_pointer(
                a.id(),
                surface::OUTSIDE_BOUNDARY_CONDITION_OBJECT,
                b.id(),
            )?;
            a.write_boundary_condition(model, BoundaryCondition::Surface)?;
        }
        Ok(())
    }

    /// Unlink from the adjacent surface; both sides get their default condition.
    pub fn reset_adjacent_surface(self, model: &mut Model) -> ModelResult<()> {
        let partner = self.adjacent_surface(model);
        for s in core::iter::once(self).chain(partner) {
            model
                .workspace_mut()
                .set_empty(s.id(), surface::OUTSIDE_BOUNDARY_CONDITION_OBJECT)?;
            s.assign_default_boundary_condition(model)?;
        }
        Ok(())
    }

    /// Copy of this surface placed in `space` with reversed vertices and linked
    /// as its adjacent surface. Sub-surfaces are copied and linked as well.
    pub fn create_adjacent_surface(self, model: &mut Model, space: Space) -> ModelResult<Surface> {
        if self.space(model) == Some(space) {
            return Err(ModelError::Geometry(
                "an adjacent surface must belong to another space".into(),
            ));
        }
        let to_space = space.transformation(model).inverse();
        let local = |points: Vec<Point3d>| {
            geometry::reverse_vertices(&geometry::transform_all(&to_space, &points))
        };

        let other = Surface::new(model, &local(self.absolute_vertices(model)))?;
        if let Some(name) = self.name(model) {
            other.set_name(model, &format!("{name} Reversed"))?;
        }
        other.set_space(model, space)?;
        if let Some(c) = self.construction(model) {
            other.set_construction(model, c)?;
        }
        self.set_adjacent_surface(model, other)?;

        for sub in self.sub_surfaces(model) {
            let copy = SubSurface::new(model, &local(sub.absolute_vertices(model)))?;
            if let Some(name) = sub.name(model) {
                copy.set_name(model, &format!("{name} Reversed"))?;
            }
            copy.set_surface(model, other)?;
            if let Some(t) = sub.sub_surface_type(model) {
                copy.set_sub_surface_type(model, t)?;
            }
            if let Some(c) = sub.construction(model) {
                copy.set_construction(model, c)?;
            }
            copy.set_multiplier(model, sub.multiplier(model))?;
            sub.set_adjacent_sub_surface(model, copy)?;
        }
        Ok(other)
    }

    /// Same outline as `other` with opposite winding, in building coordinates.
    pub fn matches(self, model: &Model, other: Surface) -> bool {
        geometry::circular_equal_reversed(
            &self.absolute_vertices(model),
            &other.absolute_vertices(model),
            GEOMETRY_TOL * 10.0,
        )
    }
}

// ----------------------------------------------------------------------
// SubSurface
// ----------------------------------------------------------------------

model_object!(
    /// Window, door or skylight within a surface.
    SubSurface => "OS:SubSurface"
);

impl SubSurface {
    pub fn new(model: &mut Model, vertices: &[Point3d]) -> ModelResult<Self> {
        check_vertices(vertices)?;
        let s: SubSurface = model.create(None)?;
        let init = write_vertices(model, s.id(), vertices)
            .and_then(|()| s.set_sub_surface_type(model, SubSurfaceType::FixedWindow));
        if let Err(e) = init {
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

    pub fn absolute_vertices(self, model: &Model) -> Vec<Point3d> {
        let vertices = self.vertices(model);
        match self.surface(model).and_then(|s| s.space(model)) {
            Some(space) => geometry::transform_all(&space.transformation(model), &vertices),
            None => vertices,
        }
    }

    pub fn gross_area(self, model: &Model) -> f64 {
        geometry::area(&self.vertices(model))
    }

    pub fn sub_surface_type(self, model: &Model) -> Option<SubSurfaceType> {
        model
            .workspace()
            .get_string(self.id(), sub_surface::SUB_SURFACE_TYPE)?
            .parse()
            .ok()
    }

    pub fn set_sub_surface_type(self, model: &mut Model, t: SubSurfaceType) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_string(self.id(), sub_surface::SUB_SURFACE_TYPE, t.as_str())?)
    }

    /// Skylight in roofs, fixed window elsewhere.
    pub fn assign_default_sub_surface_type(self, model: &mut Model) -> ModelResult<()> {
        let t = match self.surface(model).and_then(|s| s.surface_type(model)) {
            Some(SurfaceType::RoofCeiling) => SubSurfaceType::Skylight,
            _ => SubSurfaceType::FixedWindow,
        };
        self.set_sub_surface_type(model, t)
    }

    pub fn surface(self, model: &Model) -> Option<Surface> {
        model
            .workspace()
            .get_target(self.id(), sub_surface::SURFACE_NAME)
            .map(Surface::from_id_unchecked)
    }

    /// Attach to a parent surface; the sub-surface must lie in its plane.
    pub fn set_surface(self, model: &mut Model, parent: Surface) -> ModelResult<()> {
        let outline = parent.vertices(model);
        if let (Some(normal), Some(origin)) = (geometry::outward_normal(&outline), outline.first()) {
            let off_plane = self
                .vertices(model)
                .iter()
                .any(|p| (p - origin).dot(&normal).abs() > GEOMETRY_TOL * 10.0);
            if off_plane {
                return Err(ModelError::Geometry(
                    "sub surface is not in the plane of its surface".into(),
                ));
            }
        }
        model
            .workspace_mut()
            .set_pointer(self.id(), sub_surface::SURFACE_NAME, parent.id())?;
        if parent.surface_type(model) == Some(SurfaceType::RoofCeiling)
            && self.sub_surface_type(model) == Some(SubSurfaceType::FixedWindow)
        {
            self.set_sub_surface_type(model, SubSurfaceType::Skylight)?;
        }
        Ok(())
    }

    pub fn construction(self, model: &Model) -> Option<Construction> {
        construction_of(model, self.id(), sub_surface::CONSTRUCTION_NAME)
    }

    pub fn set_construction(self, model: &mut Model, c: Construction) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_pointer(self.id(), sub_surface::CONSTRUCTION_NAME, c.id())?)
    }

    pub fn multiplier(self, model: &Model) -> f64 {
        model
            .workspace()
            .get_double_or_default(self.id(), sub_surface::MULTIPLIER)
            .unwrap_or(1.0)
    }

    pub fn set_multiplier(self, model: &mut Model, multiplier: f64) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_double(self.id(), sub_surface::MULTIPLIER, multiplier)?)
    }

    pub fn adjacent_sub_surface(self, model: &Model) -> Option<SubSurface> {
        model
            .workspace()
            .get_target(self.id(), sub_surface::OUTSIDE_BOUNDARY_CONDITION_OBJECT)
            .map(SubSurface::from_id_unchecked)
    }

    pub fn set_adjacent_sub_surface(self, model: &mut Model, other: SubSurface) -> ModelResult<()> {
        if other == self {
            return Err(ModelError::Geometry(
                "a sub surface cannot be adjacent to itself".into(),
            ));
        }
        let ws = model.workspace_mut();
        ws.set_pointer(self.id(), sub_surface::OUTSIDE_BOUNDARY_CONDITION_OBJECT, other.id())?;
        ws.set_pointer(other.id(), sub_surface::OUTSIDE_BOUNDARY_CONDITION_OBJECT, self.id())?;
        Ok(())
    }

    pub fn reset_adjacent_sub_surface(self, model: &mut Model) -> ModelResult<()> {
        if let Some(other) = self.adjacent_sub_surface(model) {
            model
                .workspace_mut()
                .set_empty(other.id(), sub_surface::OUTSIDE_BOUNDARY_CONDITION_OBJECT)?;
        }
        Ok(model
            .workspace_mut()
            .set_empty(self.id(), sub_surface::OUTSIDE_BOUNDARY_CONDITION_OBJECT)?)
    }
}
