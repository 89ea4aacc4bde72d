//! Outbound hop-to-hop calls.
//!
//! # Responsibilities
//! - POST the trimmed path to the next site
//! - Relay the response body unchanged
//! - Map connection errors and non-2xx answers to `PathError`
//!
//! No retries: a failed forward is terminal for the request.

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use url::Url;

use crate::config::ForwardConfig;
use crate::observability::metrics;
use crate::path::{PathError, PathResult};

/// HTTP client used to relay paths to the next site.
///
/// Plain `http://` only; other schemes are rejected as invalid addresses.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    max_response_bytes: usize,
}

impl Forwarder {
    pub fn new(config: &ForwardConfig) -> Self {
        let mut connector = HttpConnector::new();
        if config.connect_timeout_ms > 0 {
            connector.set_connect_timeout(Some(Duration::from_millis(config.connect_timeout_ms)));
        }
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            max_response_bytes: config.max_response_bytes,
        }
    }

    /// POST `body` to `addr` and return the response body.
    pub async fn post(&self, addr: &str, path_id: &str, body: Vec<u8>) -> PathResult<Bytes> {
        let url = Url::parse(addr).map_err(|e| PathError::InvalidAddress {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;
        if url.scheme() != "http" {
            return Err(PathError::InvalidAddress {
                addr: addr.to_string(),
                reason: format!("unsupported scheme {:?}, only http is supported", url.scheme()),
            });
        }
        if url.host_str().is_none() {
            return Err(PathError::InvalidAddress {
                addr: addr.to_string(),
                reason: "missing host".to_string(),
            });
        }

        let request = Request::builder()
            .method(Method::POST)
            .uri(url.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?;

        tracing::debug!(path_id = %path_id, next = %addr, "Forwarding path");

        let response: hyper::Response<Incoming> =
            self.client.request(request).await.map_err(|source| {
                metrics::record_forward_failure();
                PathError::Transport {
                    addr: addr.to_string(),
                    source,
                }
            })?;

        let status = response.status();
        let bytes = axum::body::to_bytes(Body::new(response.into_body()), self.max_response_bytes)
            .await
            .map_err(|e| PathError::Body {
                addr: addr.to_string(),
                reason: e.to_string(),
            })?;

        if !status.is_success() {
            metrics::record_forward_failure();
            return Err(PathError::UpstreamStatus {
                addr: addr.to_string(),
                status,
                body: String::from_utf8_lossy(&bytes).trim_end().to_string(),
            });
        }

        Ok(bytes)
    }
}
