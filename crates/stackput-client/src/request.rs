//! Resilient request execution.
//!
//! One logical exchange may take several attempts. Each attempt runs under
//! two timeout guards with a single outcome arm, and every failure kind
//! (transport, timeout, non-200 status, XML parse) funnels into the same
//! retry-or-fail decision, so exactly one decision is made per attempt.

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use stackput_xml::XmlError;

use crate::error::RequestError;
use crate::transport::{Transport, TransportError, TransportRequest};
use crate::upload::Uploader;

/// A completed HTTP exchange against the backend.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Response status (always 200 for a successful exchange).
    pub status: StatusCode,
    /// Response headers, including any `ETag`.
    pub headers: HeaderMap,
    /// The full response body.
    pub body: Bytes,
}

impl<T: Transport> Uploader<T> {
    /// Execute an exchange whose success body is empty or ignored.
    pub(crate) async fn execute(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<Exchange, RequestError> {
        self.execute_with(method, path, headers, body, Ok).await
    }

    /// Execute an exchange and run `parse` over its success body. A body
    /// that fails to parse counts as a failed attempt and is retried like
    /// any other failure.
    pub(crate) async fn execute_xml<D>(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<Bytes>,
        parse: impl Fn(&[u8]) -> Result<D, XmlError>,
    ) -> Result<(Exchange, D), RequestError> {
        self.execute_with(method, path, headers, body, |exchange| {
            let parsed = parse(&exchange.body)?;
            Ok((exchange, parsed))
        })
        .await
    }

    /// Attempt loop shared by both entry points: run one attempt, finish it
    /// (possibly parsing), and make exactly one retry-or-fail decision.
    async fn execute_with<R>(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<Bytes>,
        finish: impl Fn(Exchange) -> Result<R, RequestError>,
    ) -> Result<R, RequestError> {
        let mut backoff = self.config.retry.backoff();

        loop {
            debug!(method = %method, path = %path, "sending request");

            let outcome = self
                .attempt(method.clone(), path, headers.clone(), body.clone())
                .await
                .and_then(&finish);

            match outcome {
                Ok(value) => return Ok(value),
                Err(err) => match backoff.next_delay() {
                    Some(delay) => {
                        warn!(
                            method = %method,
                            path = %path,
                            error = %err,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            "request failed, retrying"
                        );
                        sleep(delay).await;
                    }
                    None => {
                        warn!(
                            method = %method,
                            path = %path,
                            error = %err,
                            "request failed, retries exhausted"
                        );
                        return Err(err);
                    }
                },
            }
        }
    }

    /// One network attempt under the configured deadline.
    async fn attempt(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<Exchange, RequestError> {
        let deadline = self.config.timeout;
        let request = TransportRequest {
            method,
            path: path.to_owned(),
            headers,
            body,
            timeout: deadline,
        };

        // Two timeout guards, one arm: the manual timer here and the
        // transport's own deadline both surface as `Timeout`, and the attempt
        // future settles exactly once whichever fires first. Dropping the
        // timed-out future aborts the in-flight request.
        let response = match timeout(deadline, self.transport.send(request)).await {
            Err(_) => return Err(RequestError::Timeout(deadline)),
            Ok(Err(TransportError::Timeout)) => return Err(RequestError::Timeout(deadline)),
            Ok(Err(err)) => return Err(RequestError::Transport(err)),
            Ok(Ok(response)) => response,
        };

        debug!(status = %response.status, len = response.body.len(), "received response");

        if response.status != StatusCode::OK {
            return Err(RequestError::Status {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        Ok(Exchange {
            status: response.status,
            headers: response.headers,
            body: response.body,
        })
    }
}
