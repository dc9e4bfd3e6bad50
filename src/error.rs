use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error for float {float_id}: {source}")]
    Validation {
        float_id: String,
        #[source]
        source: validator::ValidationErrors,
    },

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid filter type '{0}' for negation")]
    InvalidFilterType(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Float {float_id} not found")]
    FloatNotFound { float_id: String },

    #[error("Tool call parse error: {0}")]
    ToolCallParse(String),

    #[error("Collaborator failure: {0}")]
    Collaborator(#[from] anyhow::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl From<config::ConfigError> for ProcessingError {
    fn from(err: config::ConfigError) -> Self {
        ProcessingError::Config(err.to_string())
    }
}
