use thiserror::Error;

#[derive(Error, Debug)]
pub enum FertigateError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Calculation service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Stage '{stage_id}' not found in extraction curve '{curve}'")]
    StageNotFound { stage_id: String, curve: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, FertigateError>;
