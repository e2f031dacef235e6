use os_model::ModelError;

pub type SddResult<T> = Result<T, SddError>;

#[derive(thiserror::Error, Debug)]
pub enum SddError {
    #[error("Malformed SDD: {0}")]
    Xml(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{owner} has no {element}")]
    MissingElement { owner: String, element: &'static str },

    #[error("Invalid value in {owner}: {reason}")]
    InvalidValue { owner: String, reason: String },
}

impl From<hard_xml::XmlError> for SddError {
    fn from(e: hard_xml::XmlError) -> Self {
        SddError::Xml(format!("{e:?}"))
    }
}
