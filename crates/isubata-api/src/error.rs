use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Failures a handler can surface. Everything except `Internal` and
/// `Render` maps to a client status and is never retried.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request")]
    BadRequest,

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict")]
    Conflict,

    #[error("Not found")]
    NotFound,

    #[error("Template error: {0}")]
    Render(#[from] minijinja::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Render(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        status.into_response()
    }
}
