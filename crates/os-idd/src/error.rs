//! IDD parse errors.

use thiserror::Error;

pub type IddResult<T> = Result<T, IddError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IddError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("object '{object}' declares {extensible} extensible fields but has only {fields}")]
    BadExtensible {
        object: String,
        extensible: usize,
        fields: usize,
    },

    #[error("duplicate object definition: {0}")]
    DuplicateObject(String),
}
