use thiserror::Error;

/// Element content could not be read as its type's payload
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContentError {
    #[error("Invalid {element_type} data: {message}")]
    Malformed {
        element_type: String,
        message: String,
    },

    #[error("Element type {0} does not carry structured content")]
    NotStructured(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid document content: {0}")]
    InvalidDocument(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error(transparent)]
    Content(#[from] ContentError),
}
