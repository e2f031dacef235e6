//! os-osversion: upgrades OSM files written by older releases.
//!
//! Works on text-level objects so that files whose types no longer match
//! the current schema can still be read and rewritten.
//!
//! - [`VersionTranslator`]: walks the version ladder and builds the model
//! - [`updates`]: one function per release that changed the schema

pub mod error;
pub mod translator;
pub mod updates;

pub use error::{VersionError, VersionResult};
pub use translator::{VersionTranslator, current_version};
pub use updates::{RefactoredObject, UpdateFn, UpdateRecord};
