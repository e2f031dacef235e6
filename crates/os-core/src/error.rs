use thiserror::Error;

pub type OsResult<T> = Result<T, OsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OsError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Invalid handle: {text}")]
    InvalidHandle { text: String },

    #[error("Invalid version string: {text}")]
    InvalidVersion { text: String },

    #[error("Unknown unit: {unit}")]
    UnknownUnit { unit: String },
}
