use thiserror::Error;

#[derive(Error, Debug)]
pub enum StepStatsError {
    #[error("GitHub API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Missing GitHub token: {0}")]
    MissingToken(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid timestamp '{value}': {source}")]
    TimestampParse {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Step '{step}' has no {field} timestamp")]
    MissingTimestamp { step: String, field: &'static str },

    #[error("Job '{job}' has no step matching {step}")]
    StepNotFound { job: String, step: String },
}

pub type Result<T> = std::result::Result<T, StepStatsError>;
