use os_model::ModelError;

pub type GbXmlResult<T> = Result<T, GbXmlError>;

#[derive(thiserror::Error, Debug)]
pub enum GbXmlError {
    #[error("Malformed gbXML: {0}")]
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

impl From<hard_xml::XmlError> for GbXmlError {
    fn from(e: hard_xml::XmlError) -> Self {
        GbXmlError::Xml(format!("{e:?}"))
    }
}
