use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnowOpsError {
    #[error("MARWIS request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid SnowOps configuration: {0}")]
    Config(String),

    #[error("Reading or station file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Runway sensor unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Rejected input: {0}")]
    InvalidData(String),

    #[error("No such file: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, SnowOpsError>;
