//! Resilient buffer uploads to S3-compatible object storage.
//!
//! This crate uploads an in-memory buffer with a single PUT for small
//! payloads and the S3 multipart protocol for payloads of 5 MiB and above,
//! retrying every exchange with escalating backoff and cleaning up partial
//! multipart state when an upload cannot complete.
//!
//! # Architecture
//!
//! ```text
//! Uploader::upload
//!     |-- payload < 5 MiB --> single PUT
//!     `-- otherwise --------> initiate -> part 1..N -> complete
//!                                  |          any failure
//!                                  `------> abort (best effort)
//! every exchange --> resilient executor (timeout + retry) --> Transport
//! ```
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use bytes::Bytes;
//! use http::HeaderMap;
//! use stackput_client::{HttpTransport, UploadConfig, Uploader};
//!
//! let transport = HttpTransport::new("http://localhost:4566/my-bucket")?;
//! let uploader = Uploader::new(transport, UploadConfig::default());
//!
//! let response = uploader
//!     .upload(Bytes::from_static(b"hello"), "/greeting.txt", HeaderMap::new())
//!     .await?;
//! assert!(response.status.is_success());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod request;
pub mod retry;
pub mod transport;
pub mod upload;

pub use config::UploadConfig;
pub use error::{RequestError, UploadError};
pub use request::Exchange;
pub use retry::{Backoff, RetryPolicy};
pub use transport::{
    HttpTransport, Transport, TransportError, TransportRequest, TransportResponse,
};
pub use upload::{PART_SIZE, Uploader};
