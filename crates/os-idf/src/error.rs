use os_core::{Handle, ObjectId, OsError};
use os_idd::IddError;

use crate::validity::{DataError, ValidityReport};

pub type IdfResult<T> = Result<T, IdfError>;

#[derive(thiserror::Error, Debug)]
pub enum IdfError {
    #[error(transparent)]
    Core(#[from] OsError),

    #[error("Schema error: {0}")]
    Idd(#[from] IddError),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unknown object type: {0}")]
    UnknownType(String),

    #[error("Object not found: {0:?}")]
    ObjectNotFound(ObjectId),

    #[error("Field {index} does not exist on {object_type}")]
    FieldIndex { object_type: String, index: usize },

    #[error("Field {index} of {object_type} cannot be edited")]
    ReadOnlyField { object_type: String, index: usize },

    #[error("Handle {0} is already in use")]
    DuplicateHandle(Handle),

    #[error("Rejected: {0}")]
    Rejected(DataError),

    #[error("Workspace is not valid:\n{0}")]
    Invalid(ValidityReport),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
