use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("duplicate submission")]
    Duplicate,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
