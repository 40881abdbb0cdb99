use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the Leetify API.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Leetify API returned {0}")]
    Status(StatusCode),
}

impl FeedError {
    /// Transport problems and 5xx responses are worth retrying on the next
    /// poll tick; 4xx means the request itself is wrong. The poller treats
    /// both identically (skip and retry next tick), this only drives log
    /// wording.
    pub fn is_retryable(&self) -> bool {
        match self {
            FeedError::Transport(_) => true,
            FeedError::Status(status) => status.is_server_error(),
        }
    }
}

/// Failure reading or writing one of the JSON store documents.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no Steam ID linked for this user")]
    NotRegistered,

    #[error("no recent match data available")]
    NoData,

    #[error("Leetify API error: {0}")]
    Feed(#[from] FeedError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Discord error: {0}")]
    Discord(Box<serenity::Error>),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::Discord(Box::new(err))
    }
}
