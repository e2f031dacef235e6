//! os-gbxml: translation between the building model and gbXML.
//!
//! - [`schema`]: hard-xml bindings for the gbXML elements that are used
//! - [`ReverseTranslator`]: gbXML document to `Model`, scaling lengths to meters
//! - [`ForwardTranslator`]: `Model` to a gbXML 6.01 document in SI units
//!
//! Elements that cannot be mapped are skipped and reported through the
//! translator's [`TranslationLog`](os_model::TranslationLog).

pub mod error;
pub mod forward;
pub mod reverse;
pub mod schema;

pub use error::{GbXmlError, GbXmlResult};
pub use forward::ForwardTranslator;
pub use reverse::ReverseTranslator;
