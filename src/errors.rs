use crate::{
    models::{arbiter::UrlArbiterResponse, content_item::DecodeError},
    services::{content_store::ContentStoreError, url_arbiter::ArbiterError},
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Everything that can end a content request before the store answers.
///
/// Each variant maps to exactly one status code; none are retried.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not read request body: {0}")]
    BodyRead(#[source] axum::Error),

    #[error("malformed JSON in request body: {0}")]
    JsonSyntax(#[source] serde_json::Error),

    #[error("could not decode request body: {0}")]
    JsonDecode(#[source] serde_json::Error),

    #[error("path is already reserved by another publishing app")]
    ArbiterConflict(UrlArbiterResponse),

    #[error("url arbiter rejected the registration")]
    ArbiterInvalid(UrlArbiterResponse),

    #[error(transparent)]
    Arbiter(#[from] ArbiterError),

    #[error(transparent)]
    ContentStore(#[from] ContentStoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::JsonSyntax(_) => StatusCode::BAD_REQUEST,
            AppError::ArbiterConflict(_) => StatusCode::CONFLICT,
            AppError::ArbiterInvalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BodyRead(_)
            | AppError::JsonDecode(_)
            | AppError::Arbiter(_)
            | AppError::ContentStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Syntax(e) => AppError::JsonSyntax(e),
            DecodeError::Other(e) => AppError::JsonDecode(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "content request failed");
        }

        match self {
            // The arbiter's own payload tells the caller who owns the path
            // or which fields were rejected.
            AppError::ArbiterConflict(payload) | AppError::ArbiterInvalid(payload) => {
                (status, Json(payload)).into_response()
            }
            other => {
                let body = Json(json!({
                    "error": other.to_string(),
                    "status": status.as_u16()
                }));
                (status, body).into_response()
            }
        }
    }
}
