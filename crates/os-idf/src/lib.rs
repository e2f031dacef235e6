//! os-idf: IDF/OSM text and the workspace object store.
//!
//! - [`IdfObject`] / [`IdfFile`]: plain text-level objects, parse and print
//! - [`Workspace`]: IDD-typed objects addressed by [`ObjectId`] and [`Handle`],
//!   with pointer fields stored as handles
//! - [`ValidityReport`]: schema checks at a [`StrictnessLevel`]

pub mod encoding;
pub mod error;
pub mod file;
pub mod naming;
pub mod object;
pub mod validity;
pub mod workspace;

pub use error::{IdfError, IdfResult};
pub use file::IdfFile;
pub use naming::{default_base_name, next_name};
pub use object::IdfObject;
pub use os_core::{Handle, ObjectId};
pub use os_idd::IddFileType;
pub use validity::{DataError, DataErrorType, StrictnessLevel, ValidityReport};
pub use workspace::{FieldValue, Workspace, WorkspaceObject};
