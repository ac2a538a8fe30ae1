//! Client for the URL arbiter, which decides whether a publishing
//! application may claim a base path.

use crate::models::arbiter::{UrlArbiterRequest, UrlArbiterResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Semantic outcome of a registration attempt, with the arbiter's payload.
#[derive(Debug, Clone)]
pub enum Registration {
    /// The application now owns (or already owned) the path.
    Granted(UrlArbiterResponse),
    /// The path is reserved by a different application.
    Conflict(UrlArbiterResponse),
    /// The path or application name was rejected.
    Invalid(UrlArbiterResponse),
}

/// The arbiter could not give a semantic answer.
#[derive(Debug, Error)]
pub enum ArbiterError {
    #[error("url arbiter request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("url arbiter returned unexpected status {0}")]
    UnexpectedStatus(StatusCode),
    #[error("url arbiter returned a malformed response: {0}")]
    MalformedResponse(serde_json::Error),
}

#[async_trait]
pub trait UrlArbiter: Send + Sync {
    async fn register(
        &self,
        path: &str,
        publishing_app: &str,
    ) -> Result<Registration, ArbiterError>;
}

/// `UrlArbiter` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpUrlArbiter {
    base_url: String,
    client: reqwest::Client,
}

impl HttpUrlArbiter {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).with_context(|| format!("invalid url arbiter url `{}`", base_url))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building url arbiter http client")?;
        Ok(Self { base_url, client })
    }

    fn registration_url(&self, path: &str) -> String {
        format!("{}/paths{}", self.base_url, path)
    }
}

#[async_trait]
impl UrlArbiter for HttpUrlArbiter {
    #[instrument(name = "url_arbiter_register", skip(self))]
    async fn register(
        &self,
        path: &str,
        publishing_app: &str,
    ) -> Result<Registration, ArbiterError> {
        let request = UrlArbiterRequest {
            publishing_app: publishing_app.to_string(),
        };
        let resp = self
            .client
            .put(self.registration_url(path))
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        debug!(%status, "url arbiter responded");

        let outcome: fn(UrlArbiterResponse) -> Registration = match status {
            StatusCode::OK | StatusCode::CREATED => Registration::Granted,
            StatusCode::CONFLICT => Registration::Conflict,
            StatusCode::UNPROCESSABLE_ENTITY => Registration::Invalid,
            other => return Err(ArbiterError::UnexpectedStatus(other)),
        };

        let body = resp.bytes().await?;
        let payload: UrlArbiterResponse =
            serde_json::from_slice(&body).map_err(ArbiterError::MalformedResponse)?;
        Ok(outcome(payload))
    }
}
