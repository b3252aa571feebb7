use crate::model::RecordId;
use crate::validation::FieldErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrmError {
    #[error("Load failed: {0}")]
    LoadFailure(String),

    #[error("Mutation failed: {0}")]
    MutationFailure(String),

    #[error("Record not found: {0}")]
    NotFound(RecordId),

    #[error("Validation failed: {0}")]
    ValidationFailure(FieldErrors),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("No form is open")]
    FormClosed,

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CrmError>;
