//! HTTP handlers for content items.
//! The inbound URI path is the base path; it is used both as the arbiter
//! registration key and as the content store path.

use crate::{
    errors::AppError,
    services::{content_store::DownstreamResponse, controller::ContentStoreController},
};
use axum::{
    body::{self, Body},
    extract::State,
    http::{HeaderValue, Uri, header},
    response::Response,
};

/// PUT `/{*base_path}` — claim the path with the arbiter, then store.
pub async fn put_content(
    State(controller): State<ContentStoreController>,
    uri: Uri,
    body: Body,
) -> Result<Response, AppError> {
    let body = body::to_bytes(body, usize::MAX)
        .await
        .map_err(AppError::BodyRead)?;
    let resp = controller.put_content(uri.path(), body).await?;
    Ok(relay(resp))
}

/// GET `/{*base_path}`
pub async fn get_content(
    State(controller): State<ContentStoreController>,
    uri: Uri,
) -> Result<Response, AppError> {
    let resp = controller.get_content(uri.path()).await?;
    Ok(relay(resp))
}

/// DELETE `/{*base_path}`
pub async fn delete_content(
    State(controller): State<ContentStoreController>,
    uri: Uri,
) -> Result<Response, AppError> {
    let resp = controller.delete_content(uri.path()).await?;
    Ok(relay(resp))
}

/// Copy the store's status and body to the caller, always as JSON.
fn relay(downstream: DownstreamResponse) -> Response {
    let mut response = Response::new(downstream.body);
    *response.status_mut() = downstream.status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
