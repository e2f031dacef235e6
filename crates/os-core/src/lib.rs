//! os-core: shared foundation for the building model crates.
//!
//! Contains:
//! - ids (compact arena ids + UUID handles)
//! - version (dotted version strings with ordering)
//! - units (uom SI types + length conversions used by the XML importers)
//! - numeric (geometry tolerance + float helpers)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;
pub mod version;

pub use error::{OsError, OsResult};
pub use ids::*;
pub use numeric::*;
pub use version::VersionString;
