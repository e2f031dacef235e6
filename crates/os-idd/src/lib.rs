//! os-idd: the IDD schema language.
//!
//! Provides:
//! - a parser for IDD text (`\field`, `\type`, `\extensible:N`, ...)
//! - typed views of objects and fields (`IddObject`, `IddField`)
//! - the embedded OpenStudio and EnergyPlus schema subsets
//!
//! # Example
//!
//! ```
//! use os_idd::IddFileType;
//!
//! let idd = IddFileType::OpenStudio.idd();
//! let space = idd.get_object("os:space").unwrap();
//! assert_eq!(space.name(), "OS:Space");
//! assert_eq!(space.name_field_index(), Some(1));
//! ```

pub mod error;
pub mod field;
pub mod file;
pub mod object;
mod parse;

pub use error::{IddError, IddResult};
pub use field::{FieldKind, FieldType, IddField, NumericBound};
pub use file::{IddFile, IddFileType};
pub use object::{ExtensibleIndex, IddObject};
