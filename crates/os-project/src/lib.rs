//! os-project: the SQLite project database behind parametric analyses.
//!
//! A project file records:
//! - file references (seed models, weather files) with content checksums
//! - analyses and the data points run for them
//! - attribute trees holding data point results
//!
//! The schema is versioned; opening a file written by an older release
//! migrates it in place, one transaction per step.

pub mod attribute;
pub mod database;
pub mod error;
pub mod migrate;
pub mod records;

pub use attribute::{Attribute, AttributeValue};
pub use database::{AttributeOwner, ProjectDatabase, checksum};
pub use error::{ProjectError, ProjectResult};
pub use records::{
    AnalysisRecord, DataPointRecord, DataPointStatus, FileReferenceRecord, ProjectRecord,
    RecordBase,
};
