//! Shared application service layer.
//!
//! Front ends go through this crate rather than the format crates directly:
//! - [`model_service`]: load, save, translate, update and check models
//! - [`project_service`]: project database setup and listings
//! - [`results`]: EnergyPlus SQL output summaries
//! - [`config`]: translator settings from YAML

pub mod config;
pub mod error;
pub mod format;
pub mod model_service;
pub mod project_service;
pub mod results;

pub use config::{TranslatorConfig, load_config, save_config};
pub use error::{AppError, AppResult};
pub use format::FileFormat;
pub use os_model::{LogLevel, LogMessage};
pub use model_service::{
    LoadedModel, ModelSummary, TranslationReport, UpdateReport, load_model, save_model,
    summarize_model, translate, update_model, validate_model,
};
pub use project_service::{AnalysisSummary, ProjectListing, add_analysis, init_project, list_project};
pub use results::{sql_summary, to_yaml};
