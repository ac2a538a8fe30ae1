//! Client for the content store. Responses are passed back untouched so the
//! caller can relay them.

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::Body;
use bytes::Bytes;
use reqwest::{Method, StatusCode, Url, header};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Raw response from the content store.
///
/// `body` is a stream still attached to the downstream connection; dropping
/// it releases the connection whether or not it was read to the end.
#[derive(Debug)]
pub struct DownstreamResponse {
    pub status: StatusCode,
    pub body: Body,
}

#[derive(Debug, Error)]
pub enum ContentStoreError {
    #[error("content store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("content store did not respond within {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Issue `method path` against the store. `body` is only set for `PUT`.
    async fn do_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<DownstreamResponse, ContentStoreError>;
}

/// `ContentStore` over HTTP.
///
/// `timeout` bounds connecting and receiving the response head only; the
/// body is relayed for as long as the store keeps streaming it.
#[derive(Debug, Clone)]
pub struct HttpContentStore {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpContentStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .with_context(|| format!("invalid content store url `{}`", base_url))?;
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .context("building content store http client")?;
        Ok(Self {
            base_url,
            timeout,
            client,
        })
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    #[instrument(name = "content_store_request", skip(self, body))]
    async fn do_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<DownstreamResponse, ContentStoreError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let resp = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| ContentStoreError::Timeout(self.timeout))??;
        let status = resp.status();
        debug!(%status, "content store responded");

        Ok(DownstreamResponse {
            status,
            body: Body::from_stream(resp.bytes_stream()),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::{
        Router,
        http::{HeaderMap, Uri},
        routing::get,
    };
    use futures::{StreamExt, stream};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::io;
    use tokio::{net::TcpListener, time::sleep};

    /// Echoes back what it received, answering 404 for `/missing`.
    async fn echo(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> (StatusCode, String) {
        let status = if uri.path() == "/missing" {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::OK
        };
        let echoed = json!({
            "method": method.as_str(),
            "path": uri.path(),
            "content_type": headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            "body": String::from_utf8_lossy(&body),
        });
        (status, echoed.to_string())
    }

    /// Answers only after 500 ms.
    async fn slow_head() -> &'static str {
        sleep(Duration::from_millis(500)).await;
        "{}"
    }

    /// Answers at once but takes 300 ms to finish the body.
    async fn slow_body() -> Body {
        let chunks = stream::iter([(0, r#"{"id":"#), (300, r#""vat-rates"}"#)]).then(
            |(delay_ms, chunk)| async move {
                sleep(Duration::from_millis(delay_ms)).await;
                Ok::<_, io::Error>(Bytes::from_static(chunk.as_bytes()))
            },
        );
        Body::from_stream(chunks)
    }

    /// Echo store on an ephemeral port, plus `/slow-head` and `/slow-body`.
    pub(crate) async fn spawn_store_with_timeout(timeout: Duration) -> HttpContentStore {
        let app = Router::new()
            .route("/slow-head", get(slow_head))
            .route("/slow-body", get(slow_body))
            .fallback(echo);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        HttpContentStore::new(&format!("http://{}", addr), timeout).unwrap()
    }

    async fn spawn_store() -> HttpContentStore {
        spawn_store_with_timeout(Duration::from_secs(5)).await
    }

    async fn read_json(resp: DownstreamResponse) -> Value {
        let bytes = resp.body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn put_sends_raw_body_as_json() {
        let store = spawn_store().await;
        let raw = Bytes::from_static(br#"{"publishing_app":"hmrc"}"#);

        let resp = store
            .do_request(Method::PUT, "/vat-rates", Some(raw))
            .await
            .unwrap();
        assert_eq!(resp.status, StatusCode::OK);

        let echoed = read_json(resp).await;
        assert_eq!(echoed["method"], "PUT");
        assert_eq!(echoed["path"], "/vat-rates");
        assert_eq!(echoed["content_type"], "application/json");
        assert_eq!(echoed["body"], r#"{"publishing_app":"hmrc"}"#);
    }

    #[tokio::test]
    async fn get_and_delete_send_no_body() {
        let store = spawn_store().await;

        for method in [Method::GET, Method::DELETE] {
            let resp = store
                .do_request(method.clone(), "/vat-rates", None)
                .await
                .unwrap();
            let echoed = read_json(resp).await;
            assert_eq!(echoed["method"], method.as_str());
            assert_eq!(echoed["content_type"], Value::Null);
            assert_eq!(echoed["body"], "");
        }
    }

    #[tokio::test]
    async fn error_statuses_are_returned_not_raised() {
        let store = spawn_store().await;
        let resp = store
            .do_request(Method::GET, "/missing", None)
            .await
            .unwrap();
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unreachable_store_is_a_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store =
            HttpContentStore::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();
        assert!(matches!(
            store.do_request(Method::GET, "/vat-rates", None).await,
            Err(ContentStoreError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn slow_response_head_times_out() {
        let store = spawn_store_with_timeout(Duration::from_millis(100)).await;
        assert!(matches!(
            store.do_request(Method::GET, "/slow-head", None).await,
            Err(ContentStoreError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn body_may_outlast_the_timeout() {
        let store = spawn_store_with_timeout(Duration::from_millis(100)).await;
        let resp = store
            .do_request(Method::GET, "/slow-body", None)
            .await
            .unwrap();
        assert_eq!(resp.status, StatusCode::OK);

        let bytes = resp.body.collect().await.unwrap().to_bytes();
        assert_eq!(bytes, r#"{"id":"vat-rates"}"#);
    }
}
