use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Invalid bound: min {min} is after max {max}")]
    InvalidBound { min: String, max: String },
    #[error("Invalid time: {0}")]
    InvalidTime(String),
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
    #[error("Operation `{operation}` is not available in {mode} mode")]
    ModeMismatch {
        operation: &'static str,
        mode: &'static str,
    },
    #[error("Not found: {0}")]
    NotFound(String),
}
