use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

#[derive(Debug)]
pub enum HttpError {
    Forbidden,
    BadRequest(String),
    RateLimited,
    Conflict,
    Internal,
}

impl From<backend_application::AppError> for HttpError {
    fn from(value: backend_application::AppError) -> Self {
        match value {
            backend_application::AppError::BadRequest(msg) => HttpError::BadRequest(msg),
            backend_application::AppError::RateLimited => HttpError::RateLimited,
            backend_application::AppError::Duplicate => HttpError::Conflict,
            backend_application::AppError::Internal(err) => {
                // Callers only ever see the generic message.
                error!("internal error: {:#}", err);
                HttpError::Internal
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::Forbidden => (StatusCode::FORBIDDEN, "origin not allowed".to_string()),
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, format!("bad request: {}", msg)),
            HttpError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate limit exceeded".to_string(),
            ),
            HttpError::Conflict => (StatusCode::CONFLICT, "duplicate submission".to_string()),
            HttpError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            ),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
