use thiserror::Error;
use wirebind_core_types::BindError;

#[derive(Debug, Error)]
pub enum CascadeError {
    #[error("metadata is not a record")]
    NotARecord,
    #[error("invalid value for {key}: {detail}")]
    InvalidValue { key: String, detail: String },
    #[error("unknown method: {0}")]
    UnknownMethod(String),
}

impl From<CascadeError> for BindError {
    fn from(value: CascadeError) -> Self {
        BindError::new(value.to_string())
    }
}
