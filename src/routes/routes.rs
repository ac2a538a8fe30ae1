//! Defines routes for content items.
//!
//! ## Structure
//! - `GET    /healthcheck` — liveness
//! - `PUT    /{*base_path}` — register path with the URL arbiter, then store
//! - `GET    /{*base_path}` — fetch from the content store
//! - `DELETE /{*base_path}` — delete from the content store
//!
//! The wildcard allows nested base paths like `/government/vat-rates`.

use crate::{
    handlers::{
        content_handlers::{delete_content, get_content, put_content},
        health_handlers::healthcheck,
    },
    services::controller::ContentStoreController,
};
use axum::{
    Router,
    routing::{get, put},
};

/// Build and return the router for all gateway routes.
///
/// The router carries shared state (`ContentStoreController`) to all handlers.
pub fn routes() -> Router<ContentStoreController> {
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route(
            "/{*base_path}",
            put(put_content).get(get_content).delete(delete_content),
        )
}
