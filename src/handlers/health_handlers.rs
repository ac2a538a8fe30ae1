//! Health handler.
//!
//! - GET /healthcheck -> simple liveness ("ok")

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

/// `GET /healthcheck`
///
/// Liveness probe. Never calls the arbiter or the content store.
pub async fn healthcheck() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
        }),
    )
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}
