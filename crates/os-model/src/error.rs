use os_core::{ObjectId, OsError};
use os_idf::IdfError;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error(transparent)]
    Idf(#[from] IdfError),

    #[error(transparent)]
    Core(#[from] OsError),

    #[error("Object {id:?} is not a {expected}")]
    WrongType { id: ObjectId, expected: &'static str },

    #[error("Object {0:?} is not in the model")]
    NotInModel(ObjectId),

    #[error("Invalid geometry: {0}")]
    Geometry(String),

    #[error("Invalid schedule: {0}")]
    Schedule(String),

    #[error("Schedule '{schedule}' cannot be used as {usage}: {reason}")]
    ScheduleType {
        schedule: String,
        usage: String,
        reason: String,
    },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} cannot be removed from a model")]
    Protected(&'static str),

    #[error("Not an OpenStudio model: {0}")]
    NotAModel(String),
}
