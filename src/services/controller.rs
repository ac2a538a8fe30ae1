//! src/services/controller.rs
//!
//! ContentStoreController — guards writes to the content store behind the
//! URL arbiter. A `PUT` only reaches the store after the arbiter has granted
//! the path to the requesting publishing app in the same request; reads and
//! deletes go straight to the store.
//!
//! Arbitration and storage are separate services with no compensating
//! action: a grant followed by a failed store write leaves the path reserved
//! but unwritten. That window is logged, not repaired.

use crate::{
    errors::AppError,
    models::{arbiter::reserved_by, content_item::ContentStoreRequest},
    services::{
        content_store::{ContentStore, DownstreamResponse},
        url_arbiter::{Registration, UrlArbiter},
    },
};
use bytes::Bytes;
use reqwest::Method;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct ContentStoreController {
    arbiter: Arc<dyn UrlArbiter>,
    content_store: Arc<dyn ContentStore>,
}

impl ContentStoreController {
    pub fn new(arbiter: Arc<dyn UrlArbiter>, content_store: Arc<dyn ContentStore>) -> Self {
        Self {
            arbiter,
            content_store,
        }
    }

    /// Register `base_path` for the body's publishing app, then forward the
    /// untouched body to the store.
    pub async fn put_content(
        &self,
        base_path: &str,
        body: Bytes,
    ) -> Result<DownstreamResponse, AppError> {
        let request = ContentStoreRequest::from_slice(&body)?;
        self.register(base_path, &request.publishing_app).await?;

        self.forward(Method::PUT, base_path, Some(body))
            .await
            .inspect_err(|_| {
                warn!(
                    path = base_path,
                    publishing_app = %request.publishing_app,
                    "path registered with url arbiter but content store write failed"
                )
            })
    }

    pub async fn get_content(&self, base_path: &str) -> Result<DownstreamResponse, AppError> {
        self.forward(Method::GET, base_path, None).await
    }

    pub async fn delete_content(&self, base_path: &str) -> Result<DownstreamResponse, AppError> {
        self.forward(Method::DELETE, base_path, None).await
    }

    async fn register(&self, base_path: &str, publishing_app: &str) -> Result<(), AppError> {
        match self.arbiter.register(base_path, publishing_app).await? {
            Registration::Granted(_) => {
                info!(path = base_path, publishing_app, "path registration granted");
                Ok(())
            }
            Registration::Conflict(payload) => {
                warn!(
                    path = base_path,
                    publishing_app,
                    owner = reserved_by(&payload).as_deref().unwrap_or_default(),
                    "path already reserved"
                );
                Err(AppError::ArbiterConflict(payload))
            }
            Registration::Invalid(payload) => {
                warn!(path = base_path, publishing_app, "path registration rejected");
                Err(AppError::ArbiterInvalid(payload))
            }
        }
    }

    async fn forward(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<DownstreamResponse, AppError> {
        Ok(self.content_store.do_request(method, path, body).await?)
    }
}
