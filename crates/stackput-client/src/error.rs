//! Error types for the upload client.

use std::time::Duration;

use http::StatusCode;

use stackput_xml::XmlError;

use crate::transport::TransportError;

/// Failure of one logical exchange after retries are exhausted.
///
/// All four kinds are treated uniformly by the retry policy; none is
/// special-cased as non-retryable.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The exchange did not complete within the configured deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The transport reported a failure below the HTTP layer.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The backend answered with a status other than 200. The body is kept
    /// verbatim as diagnostic text.
    #[error("backend returned status {status}: {body}")]
    Status {
        /// The non-200 status code.
        status: StatusCode,
        /// The response body, as text.
        body: String,
    },

    /// A success response carried a body that did not parse as the expected
    /// XML shape.
    #[error(transparent)]
    Xml(#[from] XmlError),
}

/// Failure of a whole upload call.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// An exchange failed definitively.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The initiate response parsed but carried no `UploadId`, so no
    /// session exists to drive or clean up.
    #[error("initiate response did not carry an UploadId")]
    MissingUploadId,

    /// A part upload succeeded but the response carried no usable ETag
    /// header, so the upload can never be completed.
    #[error("part {part} response did not carry an ETag header")]
    MissingEtag {
        /// 1-based part number.
        part: usize,
    },
}
