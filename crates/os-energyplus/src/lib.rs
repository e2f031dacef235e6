//! os-energyplus: translation between the building model and EnergyPlus input.
//!
//! - [`ForwardTranslator`]: `Model` to an EnergyPlus [`Workspace`](os_idf::Workspace)
//! - [`ReverseTranslator`]: EnergyPlus input back to a `Model`
//!
//! Both keep going past objects they cannot map; the skipped objects are
//! reported through their [`TranslationLog`](os_model::TranslationLog).

pub mod fields;
pub mod forward;
pub mod reverse;

pub use forward::{ForwardTranslator, ForwardTranslatorOptions};
pub use reverse::ReverseTranslator;
