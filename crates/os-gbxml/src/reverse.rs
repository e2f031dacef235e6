//! gbXML to model translation.
//!
//! Definitions are read first (materials, constructions, window types,
//! zones), then the campus: building, storeys, spaces and finally surfaces.
//! Coordinates are scaled to meters by the document's length unit. A surface
//! between two spaces becomes a matched pair, one surface in each space.
//! Surfaces with no adjacent space, or with one space on both sides, are
//! skipped. Shades become shading surfaces of the building.

use std::collections::HashMap;
use std::path::Path;

use hard_xml::XmlRead;
use os_core::units::{
    CONDUCTIVITY_IP_TO_SI, DENSITY_IP_TO_SI, LengthUnit, SPECIFIC_HEAT_IP_TO_SI,
    U_FACTOR_IP_TO_SI,
};
use os_model::{
    BoundaryCondition, BuildingStory, Construction, LogMessage, Material, Model, ModelObject,
    Point3d, ShadingSurface, ShadingSurfaceGroup, SimpleGlazing, Space, StandardOpaqueMaterial,
    SubSurface, SubSurfaceType, Surface, SurfaceType, ThermalZone, TranslationLog,
};
use tracing::info;

use crate::error::{GbXmlError, GbXmlResult};
use crate::schema::{
    Campus, GbBuilding, GbConstruction, GbMaterial, GbSpace, GbSurface, GbXml, Opening,
    PlanarGeometry, WindowType, document_body,
};

const CHANNEL: &str = "os_gbxml::reverse";

/// Stand-in layer for materials given only by their R-value.
const MASSLESS_THICKNESS: f64 = 0.0254;
const MASSLESS_DENSITY: f64 = 1.0;
const MASSLESS_SPECIFIC_HEAT: f64 = 100.0;

#[derive(Debug, Default)]
pub struct ReverseTranslator {
    log: TranslationLog,
    length_unit_override: Option<LengthUnit>,
}

impl ReverseTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length unit used instead of the document's `lengthUnit`.
    pub fn set_length_unit_override(&mut self, unit: Option<LengthUnit>) {
        self.length_unit_override = unit;
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

    pub fn load_model(&mut self, path: &Path) -> GbXmlResult<Model> {
        let text = std::fs::read_to_string(path)?;
        self.translate_str(&text)
    }

    pub fn translate_str(&mut self, text: &str) -> GbXmlResult<Model> {
        let doc = GbXml::from_str(document_body(text))?;
        self.translate_document(&doc)
    }

    pub fn translate_document(&mut self, doc: &GbXml) -> GbXmlResult<Model> {
        self.log.clear();
        let scale = self.length_scale(doc);
        check_temperature_unit(doc, &mut self.log);

        let mut pass = Pass {
            log: &mut self.log,
            model: Model::new(),
            scale,
            materials: HashMap::new(),
            layers: HashMap::new(),
            constructions: HashMap::new(),
            window_types: HashMap::new(),
            zones: HashMap::new(),
            storeys: HashMap::new(),
            spaces: HashMap::new(),
        };
        pass.translate_all(doc)?;
        let model = pass.model;
        info!(
            objects = model.workspace().num_objects(),
            warnings = self.log.warnings().len(),
            errors = self.log.errors().len(),
            "translated gbXML to model"
        );
        Ok(model)
    }

    fn length_scale(&mut self, doc: &GbXml) -> f64 {
        if let Some(unit) = self.length_unit_override {
            return unit.meters_per_unit();
        }
        let unit = match doc.length_unit.as_deref() {
            None => {
                self.log
                    .warn(CHANNEL, "No length unit specified, using Meters");
                LengthUnit::Meters
            }
            Some(text) => text.parse::<LengthUnit>().unwrap_or_else(|_| {
                self.log.warn(
                    CHANNEL,
                    format!("Unknown length unit '{text}', using Meters"),
                );
                LengthUnit::Meters
            }),
        };
        unit.meters_per_unit()
    }
}

fn check_temperature_unit(doc: &GbXml, log: &mut TranslationLog) {
    let known = doc
        .temperature_unit
        .as_deref()
        .is_some_and(|u| matches!(u, "F" | "C" | "K" | "R"));
    if !known {
        log.warn(
            CHANNEL,
            format!(
                "Unknown temperature unit '{}', using C",
                doc.temperature_unit.as_deref().unwrap_or_default()
            ),
        );
    }
}

/// Model name for a gbXML element: its `Name`, else its id, with list
/// separators replaced.
pub fn escape_name(id: Option<&str>, name: Option<&str>) -> String {
    let raw = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .or(id)
        .unwrap_or_default();
    raw.replace([',', ';'], "-")
}

fn surface_type_of(gb_type: &str) -> Option<SurfaceType> {
    match gb_type {
        "ExteriorWall" | "InteriorWall" | "UndergroundWall" => Some(SurfaceType::Wall),
        "Roof" | "Ceiling" | "UndergroundCeiling" => Some(SurfaceType::RoofCeiling),
        "UndergroundSlab" | "SlabOnGrade" | "InteriorFloor" | "RaisedFloor" | "ExposedFloor" => {
            Some(SurfaceType::Floor)
        }
        _ => None,
    }
}

fn boundary_condition_of(gb_type: &str, exposed_to_sun: bool) -> Option<BoundaryCondition> {
    if exposed_to_sun {
        return Some(BoundaryCondition::Outdoors);
    }
    match gb_type {
        "InteriorWall" | "InteriorFloor" | "Ceiling" | "Air" => Some(BoundaryCondition::Adiabatic),
        "SlabOnGrade" | "UndergroundSlab" | "UndergroundWall" | "UndergroundCeiling" => {
            Some(BoundaryCondition::Ground)
        }
        "ExteriorWall" | "Roof" | "RaisedFloor" | "ExposedFloor" => {
            Some(BoundaryCondition::Outdoors)
        }
        _ => None,
    }
}

fn sub_surface_type_of(opening_type: &str) -> Option<SubSurfaceType> {
    match opening_type {
        "FixedWindow" => Some(SubSurfaceType::FixedWindow),
        "OperableWindow" => Some(SubSurfaceType::OperableWindow),
        "FixedSkylight" | "OperableSkylight" => Some(SubSurfaceType::Skylight),
        "NonSlidingDoor" => Some(SubSurfaceType::Door),
        "SlidingDoor" => Some(SubSurfaceType::GlassDoor),
        _ => None,
    }
}

/// Factor converting a value in `unit` to SI; `None` for unknown units.
fn property_factor(unit: Option<&str>, si: &str, ip: &str, ip_to_si: f64) -> Option<f64> {
    match unit {
        None => Some(1.0),
        Some(u) if u == si => Some(1.0),
        Some(u) if u == ip => Some(ip_to_si),
        Some(_) => None,
    }
}

struct Pass<'a> {
    log: &'a mut TranslationLog,
    model: Model,
    /// Meters per document length unit.
    scale: f64,
    materials: HashMap<String, Material>,
    layers: HashMap<String, Vec<String>>,
    constructions: HashMap<String, Construction>,
    window_types: HashMap<String, Construction>,
    zones: HashMap<String, ThermalZone>,
    storeys: HashMap<String, BuildingStory>,
    spaces: HashMap<String, Space>,
}

impl Pass<'_> {
    fn translate_all(&mut self, doc: &GbXml) -> GbXmlResult<()> {
        for material in &doc.materials {
            if let Err(e) = self.translate_material(material) {
                self.log.error(CHANNEL, format!("{e}; material not translated"));
            }
        }
        for layer in &doc.layers {
            if let Some(id) = &layer.id {
                let materials = layer
                    .material_ids
                    .iter()
                    .filter_map(|m| m.material_id_ref.clone())
                    .collect();
                self.layers.insert(id.clone(), materials);
            }
        }
        for construction in &doc.constructions {
            self.translate_construction(construction)?;
        }
        for window_type in &doc.window_types {
            if let Err(e) = self.translate_window_type(window_type) {
                self.log.error(CHANNEL, format!("{e}; window type not translated"));
            }
        }
        for zone in &doc.zones {
            let z = ThermalZone::new(&mut self.model)?;
            z.set_name(&mut self.model, &escape_name(zone.id.as_deref(), zone.name.as_deref()))?;
            if let Some(id) = &zone.id {
                self.zones.insert(id.clone(), z);
            }
        }
        match &doc.campus {
            Some(campus) => self.translate_campus(campus),
            None => {
                self.log.error(CHANNEL, "Document has no Campus; no geometry translated");
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------
    // Definitions
    // ------------------------------------------------------------------

    fn translate_material(&mut self, gb: &GbMaterial) -> GbXmlResult<()> {
        let owner = format!("Material '{}'", gb.id.as_deref().unwrap_or_default());
        let invalid = |reason: String| GbXmlError::InvalidValue {
            owner: owner.clone(),
            reason,
        };
        let thickness = match &gb.thickness {
            Some(t) => {
                let unit: LengthUnit = t
                    .unit
                    .as_deref()
                    .unwrap_or("Meters")
                    .parse()
                    .map_err(|e| invalid(format!("{e}")))?;
                t.number().map(|v| v * unit.meters_per_unit())
            }
            None => None,
        };
        let conductivity = gb.conductivity.as_ref().and_then(|c| {
            let f = property_factor(c.unit.as_deref(), "WPerMeterK", "BtuPerHourFtF", CONDUCTIVITY_IP_TO_SI)?;
            Some(c.number()? * f)
        });
        let density = gb.density.as_ref().and_then(|d| {
            let f = property_factor(d.unit.as_deref(), "KgPerCubicM", "LbsPerCubicF", DENSITY_IP_TO_SI)?;
            Some(d.number()? * f)
        });
        let specific_heat = gb.specific_heat.as_ref().and_then(|c| {
            let f = property_factor(c.unit.as_deref(), "JPerKgK", "BtuPerLbF", SPECIFIC_HEAT_IP_TO_SI)?;
            Some(c.number()? * f)
        });
        let r_value = gb.r_value.as_ref().and_then(|r| {
            let f = property_factor(
                r.unit.as_deref(),
                "SquareMeterKPerW",
                "HrSquareFtFPerBTU",
                1.0 / U_FACTOR_IP_TO_SI,
            )?;
            Some(r.number()? * f)
        });

        let m = &mut self.model;
        let material = match (thickness, conductivity, density, specific_heat, r_value) {
            (Some(t), Some(k), Some(rho), Some(cp), _) => {
                StandardOpaqueMaterial::new(m, "MediumRough", t, k, rho, cp)?
            }
            (_, _, _, _, Some(r)) if r > 0.0 => StandardOpaqueMaterial::new(
                m,
                "MediumRough",
                MASSLESS_THICKNESS,
                MASSLESS_THICKNESS / r,
                MASSLESS_DENSITY,
                MASSLESS_SPECIFIC_HEAT,
            )?,
            _ => {
                return Err(invalid(
                    "needs thickness, conductivity, density and specific heat, or an R-value"
                        .into(),
                ));
            }
        };
        material.set_name(m, &escape_name(gb.id.as_deref(), gb.name.as_deref()))?;
        if let Some(id) = &gb.id {
            self.materials.insert(id.clone(), material.into());
        }
        Ok(())
    }

    fn translate_construction(&mut self, gb: &GbConstruction) -> GbXmlResult<()> {
        let name = escape_name(gb.id.as_deref(), gb.name.as_deref());
        let mut layers = Vec::new();
        for layer_ref in gb.layer_ids.iter().filter_map(|l| l.layer_id_ref.as_deref()) {
            let Some(material_ids) = self.layers.get(layer_ref) else {
                self.log.warn(
                    CHANNEL,
                    format!("Construction '{name}' refers to unknown layer '{layer_ref}'"),
                );
                continue;
            };
            for material_id in material_ids {
                match self.materials.get(material_id) {
                    Some(m) => layers.push(*m),
                    None => self.log.warn(
                        CHANNEL,
                        format!("Layer '{layer_ref}' refers to unknown material '{material_id}'"),
                    ),
                }
            }
        }
        if layers.is_empty() {
            self.log
                .warn(CHANNEL, format!("Construction '{name}' has no known layers"));
        }
        let c = Construction::with_layers(&mut self.model, &layers)?;
        c.set_name(&mut self.model, &name)?;
        if let Some(id) = &gb.id {
            self.constructions.insert(id.clone(), c);
        }
        Ok(())
    }

    fn translate_window_type(&mut self, gb: &WindowType) -> GbXmlResult<()> {
        let name = escape_name(gb.id.as_deref(), gb.name.as_deref());
        let owner = format!("Window type '{name}'");
        let u_value = gb
            .u_value
            .as_ref()
            .and_then(|u| {
                let f = property_factor(
                    u.unit.as_deref(),
                    "WPerSquareMeterK",
                    "BtuPerHourSquareFtF",
                    U_FACTOR_IP_TO_SI,
                )?;
                Some(u.number()? * f)
            })
            .ok_or_else(|| GbXmlError::MissingElement {
                owner: owner.clone(),
                element: "U-value",
            })?;
        let shgc = gb
            .shgc
            .as_ref()
            .and_then(|s| s.number())
            .ok_or_else(|| GbXmlError::MissingElement {
                owner,
                element: "SolarHeatGainCoeff",
            })?;
        let glazing = SimpleGlazing::new(&mut self.model, u_value, shgc)?;
        glazing.set_name(&mut self.model, &format!("{name} Material"))?;
        if let Some(vt) = gb
            .transmittances
            .iter()
            .find(|t| t.is_visible())
            .and_then(|t| t.number())
        {
            glazing.set_visible_transmittance(&mut self.model, vt)?;
        }
        let c = Construction::with_layers(&mut self.model, &[glazing.into()])?;
        c.set_name(&mut self.model, &name)?;
        if let Some(id) = &gb.id {
            self.window_types.insert(id.clone(), c);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Campus
    // ------------------------------------------------------------------

    fn translate_campus(&mut self, campus: &Campus) -> GbXmlResult<()> {
        if let Some(location) = &campus.location {
            let site = self.model.site()?;
            if let Some(lat) = location.latitude() {
                site.set_latitude(&mut self.model, lat)?;
            }
            if let Some(lon) = location.longitude() {
                site.set_longitude(&mut self.model, lon)?;
            }
            if let Some(elevation) = location.elevation() {
                site.set_elevation(&mut self.model, elevation * self.scale)?;
            }
        }
        if campus.buildings.len() > 1 {
            self.log.warn(
                CHANNEL,
                format!(
                    "Campus holds {} buildings; their spaces are merged into one building",
                    campus.buildings.len()
                ),
            );
        }
        for building in &campus.buildings {
            self.translate_building(building)?;
        }
        for surface in &campus.surfaces {
            if let Err(e) = self.translate_surface(surface) {
                self.log.error(
                    CHANNEL,
                    format!(
                        "{e}; surface '{}' not translated",
                        escape_name(surface.id.as_deref(), surface.name.as_deref())
                    ),
                );
            }
        }
        Ok(())
    }

    fn translate_building(&mut self, gb: &GbBuilding) -> GbXmlResult<()> {
        let building = self.model.building()?;
        let m = &mut self.model;
        building.set_name(m, &escape_name(gb.id.as_deref(), gb.name.as_deref()))?;
        if let Some(t) = gb.building_type.as_deref().filter(|t| *t != "Unknown") {
            building.set_standards_building_type(m, t)?;
        }
        for storey in &gb.storeys {
            let story = BuildingStory::new(m)?;
            story.set_name(m, &escape_name(storey.id.as_deref(), storey.name.as_deref()))?;
            if let Some(level) = storey.level() {
                story.set_nominal_z_coordinate(m, level * self.scale)?;
            }
            if let Some(id) = &storey.id {
                self.storeys.insert(id.clone(), story);
            }
        }
        for space in &gb.spaces {
            self.translate_space(space)?;
        }
        Ok(())
    }

    fn translate_space(&mut self, gb: &GbSpace) -> GbXmlResult<()> {
        let name = escape_name(gb.id.as_deref(), gb.name.as_deref());
        let space = Space::new(&mut self.model)?;
        space.set_name(&mut self.model, &name)?;

        let zone = match gb.zone_id_ref.as_deref().and_then(|z| self.zones.get(z)) {
            Some(zone) => *zone,
            None => {
                if let Some(zone_ref) = &gb.zone_id_ref {
                    self.log.warn(
                        CHANNEL,
                        format!("Space '{name}' refers to unknown zone '{zone_ref}'"),
                    );
                }
                let zone = ThermalZone::new(&mut self.model)?;
                zone.set_name(&mut self.model, &format!("{name} ThermalZone"))?;
                zone
            }
        };
        space.set_thermal_zone(&mut self.model, zone)?;

        if let Some(storey_ref) = &gb.building_storey_id_ref {
            match self.storeys.get(storey_ref) {
                Some(story) => space.set_building_story(&mut self.model, *story)?,
                None => self.log.warn(
                    CHANNEL,
                    format!("Space '{name}' refers to unknown storey '{storey_ref}'"),
                ),
            }
        }
        if let Some(id) = &gb.id {
            self.spaces.insert(id.clone(), space);
        }
        Ok(())
    }

    fn vertices(&self, owner: &str, geometry: Option<&PlanarGeometry>) -> GbXmlResult<Vec<Point3d>> {
        let geometry = geometry.ok_or_else(|| GbXmlError::MissingElement {
            owner: owner.to_string(),
            element: "PlanarGeometry",
        })?;
        geometry
            .points()
            .iter()
            .map(|p| -> GbXmlResult<Point3d> {
                let [x, y, z] = p.xyz().ok_or_else(|| GbXmlError::InvalidValue {
                    owner: owner.to_string(),
                    reason: "a CartesianPoint needs three numeric coordinates".into(),
                })?;
                Ok(Point3d::new(x * self.scale, y * self.scale, z * self.scale))
            })
            .collect()
    }

    fn translate_surface(&mut self, gb: &GbSurface) -> GbXmlResult<()> {
        let name = escape_name(gb.id.as_deref(), gb.name.as_deref());
        let gb_type = gb.surface_type.as_deref().unwrap_or_default();
        match gb_type {
            "Shade" => return self.translate_shade(gb, &name),
            "FreestandingColumn" | "EmbeddedColumn" => return Ok(()),
            _ => {}
        }

        let space_refs: Vec<&str> = gb
            .adjacent_spaces
            .iter()
            .filter_map(|a| a.space_id_ref.as_deref())
            .collect();
        match space_refs.as_slice() {
            [] => {
                self.log.warn(
                    CHANNEL,
                    format!("Surface '{name}' has no adjacent space and will not be translated"),
                );
                return Ok(());
            }
            [first, second] if first == second => {
                self.log.warn(
                    CHANNEL,
                    format!(
                        "Surface '{name}' lists space '{first}' as both of its sides and will not be translated"
                    ),
                );
                return Ok(());
            }
            [_, _, _, ..] => {
                return Err(GbXmlError::InvalidValue {
                    owner: format!("Surface '{name}'"),
                    reason: "more than two adjacent spaces".into(),
                });
            }
            _ => {}
        }
        let mut spaces = Vec::with_capacity(space_refs.len());
        for space_ref in &space_refs {
            let space = self.spaces.get(*space_ref).copied().ok_or_else(|| {
                GbXmlError::InvalidValue {
                    owner: format!("Surface '{name}'"),
                    reason: format!("unknown space '{space_ref}'"),
                }
            })?;
            spaces.push(space);
        }

        let vertices = self.vertices(&format!("Surface '{name}'"), gb.planar_geometry.as_ref())?;
        let surface = Surface::new(&mut self.model, &vertices)?;
        surface.set_name(&mut self.model, &name)?;
        if let Some(t) = surface_type_of(gb_type) {
            surface.set_surface_type(&mut self.model, t)?;
        }
        if let Some(construction_ref) = &gb.construction_id_ref {
            match self.constructions.get(construction_ref) {
                Some(c) => surface.set_construction(&mut self.model, *c)?,
                None => self.log.warn(
                    CHANNEL,
                    format!("Surface '{name}' refers to unknown construction '{construction_ref}'"),
                ),
            }
        }
        for opening in &gb.openings {
            if let Err(e) = self.translate_opening(opening, surface) {
                self.log.error(
                    CHANNEL,
                    format!(
                        "{e}; opening '{}' not translated",
                        escape_name(opening.id.as_deref(), opening.name.as_deref())
                    ),
                );
            }
        }

        match spaces.as_slice() {
            [space] => {
                surface.set_space(&mut self.model, *space)?;
                let exposed = gb
                    .exposed_to_sun
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case("true"));
                if let Some(bc) = boundary_condition_of(gb_type, exposed) {
                    surface.set_outside_boundary_condition(&mut self.model, bc)?;
                }
            }
            [first, second] => {
                surface.assign_default_surface_type(&mut self.model)?;
                let (owner, other) = if self.faces_second_space(gb, surface) {
                    self.log.info(
                        CHANNEL,
                        format!("Surface '{name}' faces its second space; vertices kept with that space"),
                    );
                    (*second, *first)
                } else {
                    (*first, *second)
                };
                surface.set_space(&mut self.model, owner)?;
                surface.create_adjacent_surface(&mut self.model, other)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Shades join the building's shading group, in building coordinates.
    fn translate_shade(&mut self, gb: &GbSurface, name: &str) -> GbXmlResult<()> {
        let vertices = self.vertices(&format!("Surface '{name}'"), gb.planar_geometry.as_ref())?;
        let shade = ShadingSurface::new(&mut self.model, &vertices)?;
        let group = ShadingSurfaceGroup::building_group(&mut self.model)?;
        shade.set_name(&mut self.model, name)?;
        shade.set_shading_surface_group(&mut self.model, group)?;
        if let Some(construction_ref) = &gb.construction_id_ref {
            match self.constructions.get(construction_ref) {
                Some(c) => shade.set_construction(&mut self.model, *c)?,
                None => self.log.warn(
                    CHANNEL,
                    format!("Surface '{name}' refers to unknown construction '{construction_ref}'"),
                ),
            }
        }
        Ok(())
    }

    /// The first adjacency names the side its space sees. An outline facing
    /// down that the first space calls its ceiling belongs to the space above.
    fn faces_second_space(&self, gb: &GbSurface, surface: Surface) -> bool {
        let first_side = gb
            .adjacent_spaces
            .first()
            .and_then(|a| a.surface_type.as_deref());
        matches!(
            (first_side, surface.surface_type(&self.model)),
            (Some("Ceiling"), Some(SurfaceType::Floor))
                | (
                    Some("InteriorFloor" | "Floor" | "SlabOnGrade" | "RaisedFloor"),
                    Some(SurfaceType::RoofCeiling)
                )
        )
    }

    fn translate_opening(&mut self, gb: &Opening, parent: Surface) -> GbXmlResult<()> {
        let name = escape_name(gb.id.as_deref(), gb.name.as_deref());
        let vertices = self.vertices(&format!("Opening '{name}'"), gb.planar_geometry.as_ref())?;
        let sub = SubSurface::new(&mut self.model, &vertices)?;
        if let Err(e) = sub.set_surface(&mut self.model, parent) {
            sub.remove(&mut self.model)?;
            return Err(e.into());
        }
        sub.set_name(&mut self.model, &name)?;
        match gb.opening_type.as_deref().map(|t| (t, sub_surface_type_of(t))) {
            Some((_, Some(t))) => sub.set_sub_surface_type(&mut self.model, t)?,
            Some((other, None)) => self.log.warn(
                CHANNEL,
                format!("Opening '{name}' has unknown type '{other}'; kept as its default"),
            ),
            None => {}
        }
        let construction = gb
            .construction_id_ref
            .as_deref()
            .and_then(|id| self.constructions.get(id))
            .or_else(|| {
                gb.window_type_id_ref
                    .as_deref()
                    .and_then(|id| self.window_types.get(id))
            })
            .copied();
        if let Some(c) = construction {
            sub.set_construction(&mut self.model, c)?;
        }
        Ok(())
    }
}
