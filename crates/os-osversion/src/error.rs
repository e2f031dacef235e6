use os_core::{OsError, VersionString};
use os_idf::IdfError;
use os_model::ModelError;

pub type VersionResult<T> = Result<T, VersionError>;

#[derive(thiserror::Error, Debug)]
pub enum VersionError {
    #[error(transparent)]
    Idf(#[from] IdfError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Core(#[from] OsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File has no OS:Version object")]
    MissingVersion,

    #[error("Version {found} is newer than the current version {current}")]
    TooNew {
        found: VersionString,
        current: VersionString,
    },

    #[error("Version {found} predates {oldest}, the oldest version that can be updated")]
    TooOld {
        found: VersionString,
        oldest: VersionString,
    },
}
