//! The model: an OpenStudio workspace with typed access.

use std::path::Path;

use os_core::{Handle, ObjectId, VersionString};
use os_idd::IddFileType;
use os_idf::{IdfFile, StrictnessLevel, Workspace, default_base_name};
use tracing::{debug, warn};

use crate::error::{ModelError, ModelResult};
use crate::fields;
use crate::object::ModelObject;
use crate::site::{Building, RunPeriod, Site, Timestep};
use crate::surface::Surface;

pub const VERSION_TYPE: &str = "OS:Version";

/// Building model backed by an OpenStudio-schema [`Workspace`] at Draft strictness.
///
/// A model always holds exactly one `OS:Version` object.
#[derive(Debug, Clone)]
pub struct Model {
    ws: Workspace,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// # Panics
    ///
    /// Panics if the embedded OpenStudio schema lacks `OS:Version`.
    pub fn new() -> Self {
        let mut ws = Workspace::new(IddFileType::OpenStudio);
        ws.add_new(VERSION_TYPE)
            .and_then(|id| ws.set_string(id, fields::version::VERSION_IDENTIFIER, &current_version()))
            .expect("embedded OpenStudio schema defines OS:Version");
        Self { ws }
    }

    /// Take over a workspace, raising it to Draft strictness.
    pub fn from_workspace(mut ws: Workspace) -> ModelResult<Self> {
        if ws.idd_type() != IddFileType::OpenStudio {
            return Err(ModelError::NotAModel(format!(
                "workspace uses the {} schema",
                ws.idd_type().as_str()
            )));
        }

        let mut versions = ws.objects_by_type(VERSION_TYPE);
        if versions.is_empty() {
            warn!("model has no version object, assuming the current version");
            let id = ws.add_new(VERSION_TYPE)?;
            ws.set_string(id, fields::version::VERSION_IDENTIFIER, &current_version())?;
        } else if versions.len() > 1 {
            warn!(count = versions.len(), "model has several version objects, keeping the first");
            let extra = versions.split_off(1);
            ws.remove_objects(&extra)?;
        }

        ws.set_strictness(StrictnessLevel::Draft)?;
        Ok(Self { ws })
    }

    pub fn parse(text: &str) -> ModelResult<Self> {
        let file = IdfFile::parse(text, IddFileType::OpenStudio)?;
        let ws = Workspace::from_idf_file(&file, StrictnessLevel::None)?;
        Self::from_workspace(ws)
    }

    pub fn load(path: &Path) -> ModelResult<Self> {
        let ws = Workspace::load(path, IddFileType::OpenStudio, StrictnessLevel::None)?;
        debug!(path = %path.display(), objects = ws.num_objects(), "loaded model");
        Self::from_workspace(ws)
    }

    pub fn print(&self) -> String {
        self.ws.print()
    }

    pub fn save(&self, path: &Path) -> ModelResult<()> {
        Ok(self.ws.save(path)?)
    }

    pub fn workspace(&self) -> &Workspace {
        &self.ws
    }

    /// Direct access to the store. Facade invariants are not re-checked.
    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.ws
    }

    pub fn into_workspace(self) -> Workspace {
        self.ws
    }

    pub fn version(&self) -> VersionString {
        self.ws
            .objects_by_type(VERSION_TYPE)
            .first()
            .and_then(|&id| {
                self.ws
                    .get_string_or_default(id, fields::version::VERSION_IDENTIFIER)
            })
            .and_then(|text| text.parse().ok())
            .unwrap_or_else(|| VersionString::new(1, 2, 0))
    }

    // ------------------------------------------------------------------
    // Typed lookup
    // ------------------------------------------------------------------

    pub fn objects<T: ModelObject>(&self) -> Vec<T> {
        self.ws
            .objects_by_type(T::IDD_TYPE)
            .into_iter()
            .map(T::from_id_unchecked)
            .collect()
    }

    pub fn get<T: ModelObject>(&self, handle: Handle) -> Option<T> {
        T::from_id(self, self.ws.id_of(handle)?)
    }

    pub fn get_by_name<T: ModelObject>(&self, name: &str) -> Option<T> {
        self.ws
            .object_by_type_and_name(T::IDD_TYPE, name)
            .map(T::from_id_unchecked)
    }

    /// Create an object of `T`'s type named `name` (or the type's default
    /// base name), made unique.
    pub(crate) fn create<T: ModelObject>(&mut self, name: Option<&str>) -> ModelResult<T> {
        let id = self.ws.add_new(T::IDD_TYPE)?;
        let named = self
            .ws
            .idd_object(id)
            .is_some_and(|o| o.name_field_index().is_some());
        if named {
            let result = match name {
                Some(n) if !n.trim().is_empty() => self.ws.set_unique_name(id, n).map(drop),
                _ => {
                    let base = default_base_name(T::IDD_TYPE);
                    let unique = self.ws.next_name_for(T::IDD_TYPE, &base, false);
                    self.ws.set_name(id, &unique)
                }
            };
            if let Err(e) = result {
                self.ws.remove_object(id)?;
                return Err(e.into());
            }
        }
        Ok(T::from_id_unchecked(id))
    }

    fn unique<T: ModelObject>(&self) -> Option<T> {
        self.ws
            .objects_by_type(T::IDD_TYPE)
            .first()
            .copied()
            .map(T::from_id_unchecked)
    }

    fn unique_or_create<T: ModelObject>(&mut self) -> ModelResult<T> {
        match self.unique::<T>() {
            Some(obj) => Ok(obj),
            None => self.create(None),
        }
    }

    pub fn get_building(&self) -> Option<Building> {
        self.unique()
    }

    pub fn building(&mut self) -> ModelResult<Building> {
        self.unique_or_create()
    }

    pub fn get_site(&self) -> Option<Site> {
        self.unique()
    }

    pub fn site(&mut self) -> ModelResult<Site> {
        self.unique_or_create()
    }

    pub fn get_timestep(&self) -> Option<Timestep> {
        self.unique()
    }

    pub fn timestep(&mut self) -> ModelResult<Timestep> {
        self.unique_or_create()
    }

    pub fn get_run_period(&self) -> Option<RunPeriod> {
        self.unique()
    }

    /// The run period, created as Jan 1 to Dec 31 when missing.
    pub fn run_period(&mut self) -> ModelResult<RunPeriod> {
        if let Some(rp) = self.unique::<RunPeriod>() {
            return Ok(rp);
        }
        let rp: RunPeriod = self.create(Some("Run Period 1"))?;
        rp.set_begin(self, 1, 1)?;
        rp.set_end(self, 12, 31)?;
        Ok(rp)
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    /// Remove an object and everything it owns.
    ///
    /// - Space: its surfaces, people, lights and shading groups
    /// - ShadingSurfaceGroup: its shading surfaces
    /// - Surface: its sub-surfaces; an adjacent surface falls back to its
    ///   default boundary condition
    pub fn remove_object(&mut self, id: ObjectId) -> ModelResult<()> {
        if !self.ws.contains(id) {
            return Err(ModelError::NotInModel(id));
        }
        let type_name = self.ws.type_name(id).unwrap_or_default().to_string();
        let mut children = Vec::new();
        match type_name.as_str() {
            VERSION_TYPE => return Err(ModelError::Protected("The version object")),
            "OS:Space" => {
                children.extend(self.ws.sources_via_field(id, "OS:Surface", fields::surface::SPACE_NAME));
                children.extend(self.ws.sources_via_field(id, "OS:People", fields::people::SPACE_NAME));
                children.extend(self.ws.sources_via_field(id, "OS:Lights", fields::lights::SPACE_NAME));
                children.extend(self.ws.sources_via_field(
                    id,
                    "OS:ShadingSurfaceGroup",
                    fields::shading_surface_group::SPACE_NAME,
                ));
            }
            "OS:ShadingSurfaceGroup" => {
                children.extend(self.ws.sources_via_field(
                    id,
                    "OS:ShadingSurface",
                    fields::shading_surface::SHADING_SURFACE_GROUP_NAME,
                ));
            }
            "OS:Surface" => {
                children.extend(self.ws.sources_via_field(
                    id,
                    "OS:SubSurface",
                    fields::sub_surface::SURFACE_NAME,
                ));
                let adjacent = self.ws.sources_via_field(
                    id,
                    "OS:Surface",
                    fields::surface::OUTSIDE_BOUNDARY_CONDITION_OBJECT,
                );
                for other in adjacent.into_iter().filter(|&o| o != id) {
                    Surface::from_id_unchecked(other).reset_adjacent_surface(self)?;
                }
            }
            _ => {}
        }

        for child in children {
            if self.ws.contains(child) {
                self.remove_object(child)?;
            }
        }
        self.ws.remove_object(id)?;
        Ok(())
    }
}

fn current_version() -> String {
    IddFileType::OpenStudio.idd().version().to_string()
}
