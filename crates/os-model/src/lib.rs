//! os-model: the building model and its typed objects.
//!
//! - [`Model`]: an OpenStudio workspace holding one version object
//! - facades: `Copy` handles such as [`Space`] or [`Surface`], with accessors
//!   taking the model
//! - [`geometry`]: polygon math on nalgebra points
//! - [`ScheduleTypeRegistry`]: which schedule limits each usage accepts
//! - [`TranslationLog`]: messages shared by the format translators

pub mod construction;
pub mod error;
pub mod example;
pub mod fields;
pub mod geometry;
pub mod loads;
pub mod log;
pub mod model;
pub mod object;
pub mod schedule;
pub mod schedule_types;
pub mod shading;
pub mod site;
pub mod surface;
pub mod zone;

pub use construction::{Construction, Material, SimpleGlazing, StandardOpaqueMaterial};
pub use error::{ModelError, ModelResult};
pub use example::example_model;
pub use geometry::{Point3d, Transformation, Vector3d};
pub use loads::{Lights, People};
pub use log::{LogLevel, LogMessage, TranslationLog};
pub use model::Model;
pub use object::ModelObject;
pub use schedule::{
    DayType, Interpolation, Schedule, ScheduleConstant, ScheduleDay, ScheduleTypeLimits,
    ScheduleWeek, ScheduleYear,
};
pub use schedule_types::{ScheduleType, ScheduleTypeRegistry};
pub use shading::{ShadingSurface, ShadingSurfaceGroup, ShadingSurfaceType};
pub use site::{BASE_YEAR, Building, BuildingStory, RunPeriod, Site, Timestep};
pub use surface::{BoundaryCondition, SubSurface, SubSurfaceType, Surface, SurfaceType};
pub use zone::{Space, ThermalZone};
