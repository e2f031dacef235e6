//! os-sdd: reads the geometry and envelope of SDD (CBECC) building descriptions.
//!
//! SDD documents carry inch-pound units: coordinates and heights in feet,
//! material thickness in inches. Everything is converted to SI on the way in.

pub mod error;
pub mod reverse;
pub mod schema;

pub use error::{SddError, SddResult};
pub use reverse::ReverseTranslator;
