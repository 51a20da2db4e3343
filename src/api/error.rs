use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

/// Session-fatal failures; nothing here is retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("environment error: {0}")]
    Environment(String),

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("YouTube API error: {0}")]
    Api(String),

    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("snapshot error: {0}")]
    Render(String),
}
