//! SDD to model translation.
//!
//! Envelope definitions are read first, then zones, then the building:
//! stories and spaces are all created before any surface so that
//! `AdjacentSpcRef` can name a space later in the document.
//!
//! Units:
//! - coordinates, story heights: feet
//! - material thickness: inches
//! - conductivity, density, specific heat, R-value and U-factor: IP

use std::collections::HashMap;
use std::path::Path;

use hard_xml::XmlRead;
use os_core::units::{
    CONDUCTIVITY_IP_TO_SI, DENSITY_IP_TO_SI, LengthUnit, SPECIFIC_HEAT_IP_TO_SI,
    U_FACTOR_IP_TO_SI,
};
use os_model::{
    BoundaryCondition, BuildingStory, Construction, LogMessage, Material, Model, ModelObject,
    Point3d, SimpleGlazing, Space, StandardOpaqueMaterial, SubSurface, SubSurfaceType, Surface,
    SurfaceType, ThermalZone, TranslationLog,
};
use tracing::info;

use crate::error::{SddError, SddResult};
use crate::schema::{
    Bldg, ConsAssm, FenCons, Mat, PolyLp, SddXml, Spc, SurfaceKind, SurfaceView, document_body,
    number,
};

const CHANNEL: &str = "os_sdd::reverse";

/// Stand-in layer for materials given only by their R-value.
const MASSLESS_THICKNESS: f64 = 0.0254;
const MASSLESS_DENSITY: f64 = 1.0;
const MASSLESS_SPECIFIC_HEAT: f64 = 100.0;

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

    pub fn load_model(&mut self, path: &Path) -> SddResult<Model> {
        let text = std::fs::read_to_string(path)?;
        self.translate_str(&text)
    }

    /// Fails when the text is not XML or its root is not `SDDXML`.
    pub fn translate_str(&mut self, text: &str) -> SddResult<Model> {
        let doc = SddXml::from_str(document_body(text))?;
        self.translate_document(&doc)
    }

    pub fn translate_document(&mut self, doc: &SddXml) -> SddResult<Model> {
        self.log.clear();
        let project = doc.project.as_ref().ok_or_else(|| SddError::MissingElement {
            owner: "SDDXML".into(),
            element: "Proj",
        })?;
        let building = project
            .building
            .as_ref()
            .ok_or_else(|| SddError::MissingElement {
                owner: "Proj".into(),
                element: "Bldg",
            })?;

        let mut pass = Pass {
            log: &mut self.log,
            model: Model::new(),
            feet: LengthUnit::Feet.meters_per_unit(),
            materials: HashMap::new(),
            constructions: HashMap::new(),
            fenestration: HashMap::new(),
            zones: HashMap::new(),
            spaces: HashMap::new(),
        };
        for mat in &project.materials {
            if let Err(e) = pass.translate_material(mat) {
                pass.log.error(CHANNEL, format!("{e}; material not translated"));
            }
        }
        for cons in &project.constructions {
            if let Err(e) = pass.translate_construction(cons) {
                pass.log.error(CHANNEL, format!("{e}; construction not translated"));
            }
        }
        for fen in &project.fenestration {
            if let Err(e) = pass.translate_fenestration(fen) {
                pass.log
                    .error(CHANNEL, format!("{e}; fenestration construction not translated"));
            }
        }
        pass.translate_building(building)?;

        let model = pass.model;
        info!(
            objects = model.workspace().num_objects(),
            warnings = self.log.warnings().len(),
            errors = self.log.errors().len(),
            "translated SDD to model"
        );
        Ok(model)
    }
}

/// Model name for an SDD element, with list separators replaced.
fn escape_name(name: &str) -> String {
    name.trim().replace([',', ';'], "-")
}

/// Angle in degrees wrapped into `[0, 360)`.
fn fix_angle(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

fn surface_type_of(kind: SurfaceKind) -> (SurfaceType, BoundaryCondition) {
    match kind {
        SurfaceKind::ExtWall => (SurfaceType::Wall, BoundaryCondition::Outdoors),
        SurfaceKind::ExtFlr => (SurfaceType::Floor, BoundaryCondition::Outdoors),
        SurfaceKind::Roof => (SurfaceType::RoofCeiling, BoundaryCondition::Outdoors),
        SurfaceKind::UndgrFlr => (SurfaceType::Floor, BoundaryCondition::Ground),
        SurfaceKind::UndgrWall => (SurfaceType::Wall, BoundaryCondition::Ground),
        SurfaceKind::Ceiling => (SurfaceType::RoofCeiling, BoundaryCondition::Adiabatic),
        SurfaceKind::IntWall => (SurfaceType::Wall, BoundaryCondition::Adiabatic),
        SurfaceKind::IntFlr => (SurfaceType::Floor, BoundaryCondition::Adiabatic),
    }
}

struct Pass<'a> {
    log: &'a mut TranslationLog,
    model: Model,
    /// Meters per foot.
    feet: f64,
    materials: HashMap<String, Material>,
    constructions: HashMap<String, Construction>,
    fenestration: HashMap<String, Construction>,
    zones: HashMap<String, ThermalZone>,
    spaces: HashMap<String, Space>,
}

impl Pass<'_> {
    // ------------------------------------------------------------------
    // Envelope
    // ------------------------------------------------------------------

    fn translate_material(&mut self, mat: &Mat) -> SddResult<()> {
        let name = mat
            .name
            .as_deref()
            .map(escape_name)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| SddError::MissingElement {
                owner: "Mat".into(),
                element: "Name",
            })?;
        let thickness = number(&mat.thickness).map(|inches| inches / 12.0 * self.feet);
        let conductivity = number(&mat.conductivity).map(|k| k * CONDUCTIVITY_IP_TO_SI);
        let density = number(&mat.density).map(|d| d * DENSITY_IP_TO_SI);
        let specific_heat = number(&mat.specific_heat).map(|c| c * SPECIFIC_HEAT_IP_TO_SI);
        let r_value = number(&mat.r_value).map(|r| r / U_FACTOR_IP_TO_SI);

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
                return Err(SddError::InvalidValue {
                    owner: format!("Mat '{name}'"),
                    reason: "needs Thkns, ThrmlCndct, Dens and SpecHt, or RVal".into(),
                });
            }
        };
        material.set_name(m, &name)?;
        self.materials.insert(name, material.into());
        Ok(())
    }

    fn translate_construction(&mut self, cons: &ConsAssm) -> SddResult<()> {
        let name = cons
            .name
            .as_deref()
            .map(escape_name)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| SddError::MissingElement {
                owner: "ConsAssm".into(),
                element: "Name",
            })?;
        let owner = format!("ConsAssm '{name}'");
        match cons.spec_method.as_deref().map(str::trim) {
            Some("Layers") => {}
            Some(other) => {
                return Err(SddError::InvalidValue {
                    owner,
                    reason: format!("construction method '{other}' is not supported"),
                });
            }
            None => {
                return Err(SddError::MissingElement {
                    owner,
                    element: "SpecMthd",
                });
            }
        }
        let mut layers = Vec::with_capacity(cons.material_refs.len());
        for material_ref in &cons.material_refs {
            match self.materials.get(&escape_name(material_ref)) {
                Some(m) => layers.push(*m),
                None => self.log.warn(
                    CHANNEL,
                    format!("{owner} refers to unknown material '{}'", material_ref.trim()),
                ),
            }
        }
        let c = Construction::with_layers(&mut self.model, &layers)?;
        c.set_name(&mut self.model, &name)?;
        self.constructions.insert(name, c);
        Ok(())
    }

    fn translate_fenestration(&mut self, fen: &FenCons) -> SddResult<()> {
        let name = fen
            .name
            .as_deref()
            .map(escape_name)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| SddError::MissingElement {
                owner: "FenCons".into(),
                element: "Name",
            })?;
        let owner = format!("FenCons '{name}'");
        let u_factor = fen.u_factor().ok_or_else(|| SddError::MissingElement {
            owner: owner.clone(),
            element: "UFactor",
        })?;
        let shgc = fen.shgc().ok_or_else(|| SddError::MissingElement {
            owner,
            element: "SHGC",
        })?;
        let glazing = SimpleGlazing::new(&mut self.model, u_factor * U_FACTOR_IP_TO_SI, shgc)?;
        glazing.set_name(&mut self.model, &format!("{name} Material"))?;
        if let Some(vt) = fen.visible_transmittance() {
            glazing.set_visible_transmittance(&mut self.model, vt)?;
        }
        let c = Construction::with_layers(&mut self.model, &[glazing.into()])?;
        c.set_name(&mut self.model, &name)?;
        self.fenestration.insert(name, c);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Building
    // ------------------------------------------------------------------

    fn translate_building(&mut self, bldg: &Bldg) -> SddResult<()> {
        let building = self.model.building()?;
        match bldg.name.as_deref().map(escape_name).filter(|n| !n.is_empty()) {
            Some(name) => {
                building.set_name(&mut self.model, &name)?;
            }
            None => self.log.error(CHANNEL, "Bldg element 'Name' is empty"),
        }
        let north_axis = match (bldg.azimuth(), bldg.north_angle()) {
            (Some(az), _) => Some(fix_angle(az)),
            (None, Some(n)) => Some(fix_angle(360.0 - fix_angle(n))),
            (None, None) => None,
        };
        if let Some(degrees) = north_axis {
            building.set_north_axis(&mut self.model, degrees)?;
        }

        for zn in &bldg.zones {
            let Some(name) = zn.name.as_deref().map(escape_name).filter(|n| !n.is_empty()) else {
                self.log.error(CHANNEL, "ThrmlZn element 'Name' is empty; zone not created");
                continue;
            };
            let zone = ThermalZone::new(&mut self.model)?;
            zone.set_name(&mut self.model, &name)?;
            self.zones.insert(name, zone);
        }

        let mut placed: Vec<(Space, &Spc)> = Vec::new();
        for sdd_story in &bldg.stories {
            let m = &mut self.model;
            let story = BuildingStory::new(m)?;
            if let Some(name) = sdd_story.name.as_deref().map(escape_name).filter(|n| !n.is_empty()) {
                story.set_name(m, &name)?;
            }
            if let Some(z) = sdd_story.z() {
                story.set_nominal_z_coordinate(m, z * self.feet)?;
            }
            if let Some(h) = sdd_story.floor_to_floor_height() {
                story.set_nominal_floor_to_floor_height(m, h * self.feet)?;
            }
            for spc in &sdd_story.spaces {
                let space = self.translate_space(spc, story)?;
                placed.push((space, spc));
            }
        }

        for (space, spc) in placed {
            for view in spc.surfaces() {
                if let Err(e) = self.translate_surface(&view, space) {
                    self.log.error(
                        CHANNEL,
                        format!(
                            "{e}; {} '{}' not translated",
                            view.kind.tag(),
                            view.name.unwrap_or_default()
                        ),
                    );
                }
            }
        }
        Ok(())
    }

    fn translate_space(&mut self, spc: &Spc, story: BuildingStory) -> SddResult<Space> {
        let space = Space::new(&mut self.model)?;
        let name = match spc.name.as_deref().map(escape_name).filter(|n| !n.is_empty()) {
            Some(name) => space.set_name(&mut self.model, &name)?,
            None => {
                self.log.error(CHANNEL, "Spc element 'Name' is empty");
                space.name(&self.model).unwrap_or_default()
            }
        };
        space.set_building_story(&mut self.model, story)?;

        let zone_ref = spc.zone_ref.as_deref().map(escape_name);
        let zone = match zone_ref.as_deref().and_then(|z| self.zones.get(z)) {
            Some(zone) => *zone,
            None => {
                if let Some(zone_ref) = &zone_ref {
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
        self.spaces.insert(name, space);
        Ok(space)
    }

    fn vertices(&self, owner: &str, poly: Option<&PolyLp>) -> SddResult<Vec<Point3d>> {
        let poly = poly.ok_or_else(|| SddError::MissingElement {
            owner: owner.to_string(),
            element: "PolyLp",
        })?;
        poly.points
            .iter()
            .map(|p| -> SddResult<Point3d> {
                let [x, y, z] = p.xyz().ok_or_else(|| SddError::InvalidValue {
                    owner: owner.to_string(),
                    reason: "a CartesianPt needs three numeric Coord elements".into(),
                })?;
                Ok(Point3d::new(x * self.feet, y * self.feet, z * self.feet))
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Surfaces
    // ------------------------------------------------------------------

    fn translate_surface(&mut self, view: &SurfaceView<'_>, space: Space) -> SddResult<()> {
        let name = view.name.map(escape_name).unwrap_or_default();
        let owner = format!("{} '{name}'", view.kind.tag());
        let vertices = self.vertices(&owner, view.poly_loop)?;
        let surface = Surface::new(&mut self.model, &vertices)?;
        if !name.is_empty() {
            surface.set_name(&mut self.model, &name)?;
        }
        surface.set_space(&mut self.model, space)?;

        let (surface_type, mut bc) = surface_type_of(view.kind);
        surface.set_surface_type(&mut self.model, surface_type)?;
        if let Some(text) = view.outside_boundary_condition {
            match text.parse::<BoundaryCondition>() {
                Ok(BoundaryCondition::Surface) | Err(_) => self.log.warn(
                    CHANNEL,
                    format!("{owner} has unsupported OutsdBndryCond '{}'; ignored", text.trim()),
                ),
                Ok(parsed) => bc = parsed,
            }
        }
        surface.set_outside_boundary_condition(&mut self.model, bc)?;

        if let Some(construction_ref) = view.construction_ref.map(escape_name) {
            match self.constructions.get(&construction_ref) {
                Some(c) => surface.set_construction(&mut self.model, *c)?,
                None => self.log.warn(
                    CHANNEL,
                    format!("{owner} refers to unknown construction '{construction_ref}'"),
                ),
            }
        }

        for win in view.windows {
            self.opening(
                surface,
                SubSurfaceType::FixedWindow,
                win.name.as_deref(),
                win.poly_loop.as_ref(),
                win.fenestration_ref.as_deref(),
            );
        }
        for skylight in view.skylights {
            self.opening(
                surface,
                SubSurfaceType::Skylight,
                skylight.name.as_deref(),
                skylight.poly_loop.as_ref(),
                skylight.fenestration_ref.as_deref(),
            );
        }
        for door in view.doors {
            let construction_ref = door.door_ref.as_deref().or(door.fenestration_ref.as_deref());
            self.opening(
                surface,
                SubSurfaceType::Door,
                door.name.as_deref(),
                door.poly_loop.as_ref(),
                construction_ref,
            );
        }

        if let Some(adjacent_ref) = view.adjacent_space_ref.map(escape_name) {
            match self.spaces.get(&adjacent_ref).copied() {
                Some(other) if other != space => {
                    surface.create_adjacent_surface(&mut self.model, other)?;
                }
                Some(_) => {
                    self.log.error(
                        CHANNEL,
                        format!("{owner} names its own space as adjacent; left Adiabatic"),
                    );
                    surface.set_outside_boundary_condition(&mut self.model, BoundaryCondition::Adiabatic)?;
                }
                None => {
                    self.log.error(
                        CHANNEL,
                        format!("{owner} refers to unknown space '{adjacent_ref}'; left Adiabatic"),
                    );
                    surface.set_outside_boundary_condition(&mut self.model, BoundaryCondition::Adiabatic)?;
                }
            }
        }
        Ok(())
    }

    /// Logs rather than fails: one bad opening leaves its surface intact.
    fn opening(
        &mut self,
        parent: Surface,
        kind: SubSurfaceType,
        name: Option<&str>,
        poly: Option<&PolyLp>,
        construction_ref: Option<&str>,
    ) {
        let name = name.map(escape_name).unwrap_or_default();
        if let Err(e) = self.try_opening(parent, kind, &name, poly, construction_ref) {
            self.log
                .error(CHANNEL, format!("{e}; opening '{name}' not translated"));
        }
    }

    fn try_opening(
        &mut self,
        parent: Surface,
        kind: SubSurfaceType,
        name: &str,
        poly: Option<&PolyLp>,
        construction_ref: Option<&str>,
    ) -> SddResult<()> {
        let vertices = self.vertices(&format!("Opening '{name}'"), poly)?;
        let sub = SubSurface::new(&mut self.model, &vertices)?;
        if let Err(e) = sub.set_surface(&mut self.model, parent) {
            sub.remove(&mut self.model)?;
            return Err(e.into());
        }
        if !name.is_empty() {
            sub.set_name(&mut self.model, name)?;
        }
        sub.set_sub_surface_type(&mut self.model, kind)?;
        if let Some(construction_ref) = construction_ref.map(escape_name) {
            let construction = self
                .fenestration
                .get(&construction_ref)
                .or_else(|| self.constructions.get(&construction_ref))
                .copied();
            match construction {
                Some(c) => sub.set_construction(&mut self.model, c)?,
                None => self.log.warn(
                    CHANNEL,
                    format!("Opening '{name}' refers to unknown construction '{construction_ref}'"),
                ),
            }
        }
        Ok(())
    }
}
