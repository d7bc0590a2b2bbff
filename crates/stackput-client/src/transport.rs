//! The transport seam between the upload protocol and the wire.
//!
//! The protocol core only needs one operation: send a request, get back the
//! buffered response. Everything below that line, including connection
//! management and any request signing, belongs to the [`Transport`]
//! implementation. [`HttpTransport`] is the default implementation over
//! `reqwest` for endpoints that accept requests as-is; callers with signing
//! requirements implement [`Transport`] over their own signed client.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};

/// One request to the storage backend.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Path plus query string, e.g. `/data.bin?partNumber=2&uploadId=abc`.
    pub path: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body, if any.
    pub body: Option<Bytes>,
    /// Deadline the transport should enforce on the whole exchange.
    pub timeout: Duration,
}

/// A buffered response from the storage backend.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers, including any `ETag`.
    pub headers: HeaderMap,
    /// The full response body.
    pub body: Bytes,
}

/// Failures below the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The transport's own deadline elapsed before the exchange finished.
    #[error("transport-level timeout")]
    Timeout,

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Other(String),
}

/// One HTTP exchange against the storage backend.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and buffer the response.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// Default [`Transport`] over `reqwest`.
///
/// Joins request paths onto a fixed base endpoint (scheme, host, and any
/// path prefix such as a bucket), and enforces the per-request deadline
/// through `reqwest`'s request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Create a transport for `endpoint`, e.g. `http://localhost:4566/my-bucket`.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Other(format!("failed to create HTTP client: {e}")))?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Create a transport reusing an existing `reqwest` client.
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_owned(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = format!("{}{}", self.endpoint, request.path);

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers)
            .timeout(request.timeout);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(TransportError::from)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(TransportError::from)?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}
