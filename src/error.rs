use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("API URL not configured")]
    MissingApiUrl,

    #[error("API error {0}")]
    Status(u16),

    #[error("batch returned {got} results for {expected} tickers")]
    BatchMismatch { expected: usize, got: usize },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
