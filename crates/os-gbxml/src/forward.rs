//! Model to gbXML translation.
//!
//! Coordinates are written in meters, relative to the building. Each matched
//! surface pair is written once, from the first space visited, with both
//! spaces listed as adjacent. Shading surfaces are written as `Shade`
//! surfaces with no adjacent space.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use hard_xml::XmlWrite;
use os_core::{ObjectId, format_real};
use os_model::geometry::{self, Point3d, Vector3d};
use os_model::{
    BoundaryCondition, BuildingStory, Construction, LogMessage, Material, Model, ModelObject,
    ShadingSurface, Space, StandardOpaqueMaterial, SubSurface, SubSurfaceType, Surface,
    SurfaceType, ThermalZone, TranslationLog,
};
use tracing::info;

use crate::error::GbXmlResult;
use crate::schema::{
    AdjacentSpaceId, BuildingStorey, Campus, CartesianPoint, Conductivity, CreatedBy, Density,
    DocumentHistory, GBXML_NAMESPACE, GBXML_VERSION, GbBuilding, GbConstruction, GbMaterial,
    GbSpace, GbSurface, GbXml, Layer, LayerId, Location, MaterialId, Opening, PlanarGeometry,
    ProgramInfo, RValue, RectangularGeometry, SolarHeatGainCoeff, SpecificHeat, Thickness,
    Transmittance, UValue, WindowType, Zone,
};

const CHANNEL: &str = "os_gbxml::forward";

/// Floors within this distance of z = 0 are slabs on grade.
const GRADE_TOL: f64 = 0.01;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Default)]
pub struct ForwardTranslator {
    log: TranslationLog,
}

impl ForwardTranslator {
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

    pub fn model_to_gbxml(&mut self, model: &Model, path: &Path) -> GbXmlResult<()> {
        let text = self.model_to_gbxml_string(model)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn model_to_gbxml_string(&mut self, model: &Model) -> GbXmlResult<String> {
        let doc = self.translate_model(model);
        let body = doc.to_string()?;
        Ok(format!("{XML_DECLARATION}\n{body}\n"))
    }

    pub fn translate_model(&mut self, model: &Model) -> GbXml {
        self.log.clear();
        let mut pass = Pass {
            model,
            log: &mut self.log,
            ids: Ids::default(),
            layer_ids: HashMap::new(),
            written: HashSet::new(),
        };
        let campus = pass.campus();
        let (constructions, layers, window_types) = pass.constructions();
        let materials = pass.materials();
        let zones = pass.zones();
        let doc = GbXml {
            xmlns: Some(GBXML_NAMESPACE.into()),
            temperature_unit: Some("C".into()),
            length_unit: Some("Meters".into()),
            area_unit: Some("SquareMeters".into()),
            volume_unit: Some("CubicMeters".into()),
            use_si_units_for_results: Some("true".into()),
            version: Some(GBXML_VERSION.into()),
            campus: Some(campus),
            constructions,
            layers,
            materials,
            window_types,
            zones,
            document_history: Some(document_history()),
        };
        info!(
            surfaces = doc.campus.as_ref().map_or(0, |c| c.surfaces.len()),
            warnings = self.log.warnings().len(),
            "translated model to gbXML"
        );
        doc
    }
}

/// gbXML id for a name: unsafe characters become `_`, a leading digit gets
/// an `id_` prefix.
pub fn escape_id(name: &str) -> String {
    let mut id: String = name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '(' | ')' | '[' | ']' | '{' | '}' | '/' | '\\' | ':' | ';' | ',' => '_',
            c => c,
        })
        .collect();
    if id.is_empty() {
        id.push_str("id");
    } else if id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert_str(0, "id_");
    }
    id
}

/// Document-wide unique ids, one per model object.
#[derive(Debug, Default)]
struct Ids {
    by_object: HashMap<ObjectId, String>,
    used: HashSet<String>,
}

impl Ids {
    fn reserve(&mut self, name: &str) -> String {
        let base = escape_id(name);
        let mut id = base.clone();
        let mut n = 1;
        while !self.used.insert(id.clone()) {
            n += 1;
            id = format!("{base}_{n}");
        }
        id
    }

    fn of(&mut self, model: &Model, object: ObjectId) -> String {
        if let Some(id) = self.by_object.get(&object) {
            return id.clone();
        }
        let name = model
            .workspace()
            .name(object)
            .map(str::to_string)
            .unwrap_or_default();
        let id = self.reserve(&name);
        self.by_object.insert(object, id.clone());
        id
    }
}

struct Pass<'a> {
    model: &'a Model,
    log: &'a mut TranslationLog,
    ids: Ids,
    /// Layer id written for each opaque material.
    layer_ids: HashMap<ObjectId, String>,
    /// Surfaces already written as the far side of a matched pair.
    written: HashSet<ObjectId>,
}

fn point(p: &Point3d) -> CartesianPoint {
    CartesianPoint::new(p.x, p.y, p.z)
}

fn angle(radians: f64) -> String {
    format_real((radians.to_degrees() * 1e6).round() / 1e6)
}

/// Bounding rectangle of a planar polygon in its own plane, scaled to the
/// polygon's area, anchored at its lower left corner.
fn rectangular_geometry(vertices: &[Point3d], normal: &Vector3d) -> Option<RectangularGeometry> {
    let origin = *vertices.first()?;
    let x_axis = Vector3d::z()
        .cross(normal)
        .try_normalize(1e-9)
        .unwrap_or_else(Vector3d::x);
    let y_axis = normal.cross(&x_axis);
    let (mut u_min, mut u_max, mut v_min, mut v_max) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for p in vertices {
        let d = p - origin;
        let (u, v) = (d.dot(&x_axis), d.dot(&y_axis));
        u_min = u_min.min(u);
        u_max = u_max.max(u);
        v_min = v_min.min(v);
        v_max = v_max.max(v);
    }
    let (mut width, mut height) = (u_max - u_min, v_max - v_min);
    let area = geometry::area(vertices);
    if width * height > 0.0 && area > 0.0 {
        let k = (area / (width * height)).sqrt();
        width *= k;
        height *= k;
    }
    let corner = origin + x_axis * u_min + y_axis * v_min;
    Some(RectangularGeometry {
        azimuth: Some(angle(geometry::azimuth(normal))),
        origin: Some(point(&corner)),
        tilt: Some(angle(geometry::tilt(normal))),
        width: Some(format_real(width)),
        height: Some(format_real(height)),
    })
}

fn gb_surface_type(t: SurfaceType, bc: Option<BoundaryCondition>, vertices: &[Point3d]) -> &'static str {
    use BoundaryCondition::{Ground, Outdoors};
    match (t, bc) {
        (SurfaceType::Wall, Some(Outdoors)) => "ExteriorWall",
        (SurfaceType::Wall, Some(Ground)) => "UndergroundWall",
        (SurfaceType::Wall, _) => "InteriorWall",
        (SurfaceType::RoofCeiling, Some(Outdoors)) => "Roof",
        (SurfaceType::RoofCeiling, Some(Ground)) => "UndergroundCeiling",
        (SurfaceType::RoofCeiling, _) => "Ceiling",
        (SurfaceType::Floor, Some(Outdoors)) => "RaisedFloor",
        (SurfaceType::Floor, Some(Ground)) => {
            if vertices.iter().all(|p| p.z.abs() <= GRADE_TOL) {
                "SlabOnGrade"
            } else {
                "UndergroundSlab"
            }
        }
        (SurfaceType::Floor, _) => "InteriorFloor",
    }
}

/// How the space on one side of an interior surface sees it.
fn side_type(t: Option<SurfaceType>) -> Option<String> {
    match t? {
        SurfaceType::Floor => Some("InteriorFloor".into()),
        SurfaceType::RoofCeiling => Some("Ceiling".into()),
        SurfaceType::Wall => None,
    }
}

fn opening_type(t: Option<SubSurfaceType>) -> &'static str {
    match t.unwrap_or(SubSurfaceType::FixedWindow) {
        SubSurfaceType::FixedWindow => "FixedWindow",
        SubSurfaceType::OperableWindow => "OperableWindow",
        SubSurfaceType::Skylight => "FixedSkylight",
        SubSurfaceType::Door | SubSurfaceType::OverheadDoor => "NonSlidingDoor",
        SubSurfaceType::GlassDoor => "SlidingDoor",
    }
}

fn document_history() -> DocumentHistory {
    DocumentHistory {
        created_by: Some(CreatedBy {
            program_id: Some("openstudio".into()),
            date: Some(chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()),
        }),
        program_info: vec![ProgramInfo {
            id: Some("openstudio".into()),
            product_name: Some("OpenStudio".into()),
            version: Some(env!("CARGO_PKG_VERSION").into()),
        }],
    }
}

impl Pass<'_> {
    fn name_of(&self, object: ObjectId) -> Option<String> {
        self.model.workspace().name(object).map(str::to_string)
    }

    // ------------------------------------------------------------------
    // Campus
    // ------------------------------------------------------------------

    fn campus(&mut self) -> Campus {
        let model = self.model;
        let location = model.get_site().map(|site| Location {
            name: site.name(model),
            latitude: Some(format_real(site.latitude(model))),
            longitude: Some(format_real(site.longitude(model))),
            elevation: Some(format_real(site.elevation(model))),
        });
        let id = self.ids.reserve("Facility");
        let building = self.building();

        let mut surfaces = Vec::new();
        for space in model.objects::<Space>() {
            for surface in space.surfaces(model) {
                if let Some(s) = self.surface(surface, space) {
                    surfaces.push(s);
                }
            }
        }
        for shade in model.objects::<ShadingSurface>() {
            if let Some(s) = self.shade(shade) {
                surfaces.push(s);
            }
        }
        for surface in model.objects::<Surface>() {
            if surface.space(model).is_none() {
                self.log.warn(
                    CHANNEL,
                    format!(
                        "Surface '{}' has no space; not translated",
                        surface.name(model).unwrap_or_default()
                    ),
                );
            }
        }
        Campus {
            id: Some(id),
            name: Some("Facility".into()),
            location,
            buildings: vec![building],
            surfaces,
        }
    }

    fn building(&mut self) -> GbBuilding {
        let model = self.model;
        let building = model.get_building();
        let name = building
            .and_then(|b| b.name(model))
            .unwrap_or_else(|| "Building".into());
        let id = match building {
            Some(b) => self.ids.of(model, b.id()),
            None => self.ids.reserve(&name),
        };
        let area = building.map_or(0.0, |b| b.floor_area(model));
        let spaces = model
            .objects::<Space>()
            .into_iter()
            .map(|s| self.space(s))
            .collect();
        let storeys = model
            .objects::<BuildingStory>()
            .into_iter()
            .map(|s| self.storey(s))
            .collect();
        GbBuilding {
            id: Some(id),
            building_type: Some(
                building
                    .and_then(|b| b.standards_building_type(model))
                    .unwrap_or_else(|| "Unknown".into()),
            ),
            name: Some(name),
            area: Some(format_real(area)),
            spaces,
            storeys,
        }
    }

    fn storey(&mut self, story: BuildingStory) -> BuildingStorey {
        let model = self.model;
        let level = story.nominal_z_coordinate(model).unwrap_or_else(|| {
            story
                .spaces(model)
                .iter()
                .flat_map(|s| s.surfaces(model))
                .flat_map(|s| s.absolute_vertices(model))
                .map(|p| p.z)
                .reduce(f64::min)
                .unwrap_or(0.0)
        });
        BuildingStorey {
            id: Some(self.ids.of(model, story.id())),
            name: story.name(model),
            level: Some(format_real(level)),
        }
    }

    fn space(&mut self, space: Space) -> GbSpace {
        let model = self.model;
        let zone_id_ref = space.thermal_zone(model).map(|z| self.ids.of(model, z.id()));
        let building_storey_id_ref = space
            .building_story(model)
            .map(|s| self.ids.of(model, s.id()));
        let area = space.floor_area(model);
        let heights = space
            .surfaces(model)
            .iter()
            .flat_map(|s| s.absolute_vertices(model))
            .map(|p| p.z)
            .fold((f64::MAX, f64::MIN), |(lo, hi), z| (lo.min(z), hi.max(z)));
        let height = if heights.1 >= heights.0 { heights.1 - heights.0 } else { 0.0 };
        GbSpace {
            id: Some(self.ids.of(model, space.id())),
            zone_id_ref,
            building_storey_id_ref,
            name: space.name(model),
            area: Some(format_real(area)),
            volume: Some(format_real(area * height)),
        }
    }

    fn surface(&mut self, surface: Surface, space: Space) -> Option<GbSurface> {
        let model = self.model;
        if self.written.contains(&surface.id()) {
            return None;
        }
        let name = surface.name(model).unwrap_or_default();
        let vertices = surface.absolute_vertices(model);
        let Some(normal) = geometry::outward_normal(&vertices) else {
            self.log.warn(
                CHANNEL,
                format!("Surface '{name}' has degenerate geometry; not translated"),
            );
            return None;
        };
        let Some(t) = surface.surface_type(model) else {
            self.log
                .warn(CHANNEL, format!("Surface '{name}' has no type; not translated"));
            return None;
        };
        let bc = surface.outside_boundary_condition(model);

        let mut adjacent_spaces = vec![AdjacentSpaceId {
            space_id_ref: Some(self.ids.of(model, space.id())),
            surface_type: None,
        }];
        if let Some(other) = surface.adjacent_surface(model)
            && let Some(other_space) = other.space(model)
        {
            adjacent_spaces[0].surface_type = side_type(Some(t));
            adjacent_spaces.push(AdjacentSpaceId {
                space_id_ref: Some(self.ids.of(model, other_space.id())),
                surface_type: side_type(other.surface_type(model)),
            });
            self.written.insert(other.id());
        }

        let construction_id_ref = surface
            .construction(model)
            .filter(|c| !c.is_fenestration(model))
            .map(|c| self.ids.of(model, c.id()));
        let openings = surface
            .sub_surfaces(model)
            .into_iter()
            .filter_map(|sub| self.opening(sub))
            .collect();

        Some(GbSurface {
            id: Some(self.ids.of(model, surface.id())),
            surface_type: Some(gb_surface_type(t, bc, &vertices).into()),
            construction_id_ref,
            exposed_to_sun: Some(surface.sun_exposed(model).to_string()),
            name: Some(name),
            adjacent_spaces,
            rectangular_geometry: rectangular_geometry(&vertices, &normal),
            planar_geometry: Some(PlanarGeometry::from_points(vertices.iter().map(point))),
            openings,
        })
    }

    /// Shades have no adjacent space; site shading is written in site coordinates.
    fn shade(&mut self, shade: ShadingSurface) -> Option<GbSurface> {
        let model = self.model;
        let name = shade.name(model).unwrap_or_default();
        let vertices = shade.absolute_vertices(model);
        let Some(normal) = geometry::outward_normal(&vertices) else {
            self.log.warn(
                CHANNEL,
                format!("Shading surface '{name}' has degenerate geometry; not translated"),
            );
            return None;
        };
        let construction_id_ref = shade
            .construction(model)
            .filter(|c| !c.is_fenestration(model))
            .map(|c| self.ids.of(model, c.id()));
        Some(GbSurface {
            id: Some(self.ids.of(model, shade.id())),
            surface_type: Some("Shade".into()),
            construction_id_ref,
            exposed_to_sun: Some("true".into()),
            name: Some(name),
            adjacent_spaces: Vec::new(),
            rectangular_geometry: rectangular_geometry(&vertices, &normal),
            planar_geometry: Some(PlanarGeometry::from_points(vertices.iter().map(point))),
            openings: Vec::new(),
        })
    }

    fn opening(&mut self, sub: SubSurface) -> Option<Opening> {
        let model = self.model;
        let vertices = sub.absolute_vertices(model);
        let normal = geometry::outward_normal(&vertices)?;
        let construction = sub.construction(model);
        let (construction_id_ref, window_type_id_ref) = match construction {
            Some(c) if c.is_fenestration(model) => (None, Some(self.ids.of(model, c.id()))),
            Some(c) => (Some(self.ids.of(model, c.id())), None),
            None => (None, None),
        };
        Some(Opening {
            id: Some(self.ids.of(model, sub.id())),
            opening_type: Some(opening_type(sub.sub_surface_type(model)).into()),
            construction_id_ref,
            window_type_id_ref,
            name: sub.name(model),
            rectangular_geometry: rectangular_geometry(&vertices, &normal),
            planar_geometry: Some(PlanarGeometry::from_points(vertices.iter().map(point))),
        })
    }

    // ------------------------------------------------------------------
    // Definitions
    // ------------------------------------------------------------------

    fn constructions(&mut self) -> (Vec<GbConstruction>, Vec<Layer>, Vec<WindowType>) {
        let model = self.model;
        let (mut constructions, mut layers, mut window_types) = (Vec::new(), Vec::new(), Vec::new());
        for c in model.objects::<Construction>() {
            let name = self.name_of(c.id()).unwrap_or_default();
            let materials = c.layers(model);
            if materials.is_empty() {
                self.log
                    .warn(CHANNEL, format!("Construction '{name}' has no layers; not translated"));
                continue;
            }
            if c.is_fenestration(model) {
                if let Some(w) = self.window_type(c, &materials) {
                    window_types.push(w);
                }
                continue;
            }
            let mut layer_ids = Vec::new();
            for material in materials {
                let Material::Opaque(m) = material else {
                    self.log.warn(
                        CHANNEL,
                        format!("Construction '{name}' mixes glazing into opaque layers; glazing skipped"),
                    );
                    continue;
                };
                let layer_id = match self.layer_ids.get(&m.id()) {
                    Some(id) => id.clone(),
                    None => {
                        let material_id = self.ids.of(model, m.id());
                        let id = self.ids.reserve(&format!("{material_id}_Layer"));
                        self.layer_ids.insert(m.id(), id.clone());
                        layers.push(Layer {
                            id: Some(id.clone()),
                            material_ids: vec![MaterialId {
                                material_id_ref: Some(material_id),
                            }],
                        });
                        id
                    }
                };
                layer_ids.push(LayerId {
                    layer_id_ref: Some(layer_id),
                });
            }
            constructions.push(GbConstruction {
                id: Some(self.ids.of(model, c.id())),
                u_value: c
                    .thermal_conductance(model)
                    .map(|u| UValue::new("WPerSquareMeterK", u)),
                layer_ids,
                name: Some(name),
            });
        }
        (constructions, layers, window_types)
    }

    fn window_type(&mut self, c: Construction, materials: &[Material]) -> Option<WindowType> {
        let model = self.model;
        let glazing = materials.iter().find_map(|m| match m {
            Material::Glazing(g) => Some(*g),
            Material::Opaque(_) => None,
        })?;
        Some(WindowType {
            id: Some(self.ids.of(model, c.id())),
            name: c.name(model),
            u_value: Some(UValue::new("WPerSquareMeterK", glazing.u_factor(model))),
            shgc: Some(SolarHeatGainCoeff::new(
                "Fraction",
                glazing.solar_heat_gain_coefficient(model),
            )),
            transmittances: glazing
                .visible_transmittance(model)
                .map(Transmittance::visible)
                .into_iter()
                .collect(),
        })
    }

    fn materials(&mut self) -> Vec<GbMaterial> {
        let model = self.model;
        model
            .objects::<StandardOpaqueMaterial>()
            .into_iter()
            .map(|m| GbMaterial {
                id: Some(self.ids.of(model, m.id())),
                name: m.name(model),
                r_value: m
                    .thermal_resistance(model)
                    .map(|r| RValue::new("SquareMeterKPerW", r)),
                thickness: Some(Thickness::new("Meters", m.thickness(model))),
                conductivity: Some(Conductivity::new("WPerMeterK", m.conductivity(model))),
                density: Some(Density::new("KgPerCubicM", m.density(model))),
                specific_heat: Some(SpecificHeat::new("JPerKgK", m.specific_heat(model))),
            })
            .collect()
    }

    fn zones(&mut self) -> Vec<Zone> {
        let model = self.model;
        model
            .objects::<ThermalZone>()
            .into_iter()
            .map(|z| Zone {
                id: Some(self.ids.of(model, z.id())),
                name: z.name(model),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_escaped_and_unique() {
        assert_eq!(escape_id("Space 1 (North)"), "Space_1__North_");
        assert_eq!(escape_id("1st Floor"), "id_1st_Floor");
        let mut ids = Ids::default();
        assert_eq!(ids.reserve("Office"), "Office");
        assert_eq!(ids.reserve("Office"), "Office_2");
        assert_eq!(ids.reserve(""), "id");
    }

    #[test]
    fn wall_rectangle_matches_its_outline() {
        let wall = [
            Point3d::new(0.0, 0.0, 3.0),
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(10.0, 0.0, 0.0),
            Point3d::new(10.0, 0.0, 3.0),
        ];
        let normal = geometry::outward_normal(&wall).unwrap();
        let rect = rectangular_geometry(&wall, &normal).unwrap();
        assert!((rect.width().unwrap() - 10.0).abs() < 1e-9);
        assert!((rect.height().unwrap() - 3.0).abs() < 1e-9);
        assert_eq!(rect.tilt.as_deref(), Some("90"));
        assert_eq!(rect.azimuth.as_deref(), Some("180"));
        assert_eq!(rect.origin.unwrap().xyz(), Some([0.0, 0.0, 0.0]));
    }

    #[test]
    fn ground_floors_split_by_depth() {
        let at = |z: f64| vec![Point3d::new(0.0, 0.0, z); 3];
        let ground = Some(BoundaryCondition::Ground);
        assert_eq!(gb_surface_type(SurfaceType::Floor, ground, &at(0.0)), "SlabOnGrade");
        assert_eq!(gb_surface_type(SurfaceType::Floor, ground, &at(-3.0)), "UndergroundSlab");
        assert_eq!(
            gb_surface_type(SurfaceType::RoofCeiling, Some(BoundaryCondition::Surface), &at(3.0)),
            "Ceiling"
        );
    }
}
