//! XML codec for the stackput upload protocol.
//!
//! The protocol touches XML in exactly three places: the client parses an
//! `InitiateMultipartUploadResult` response body, composes a
//! `CompleteMultipartUpload` request body, and test backends do the same in
//! reverse. This crate provides one concrete function per document rather
//! than a generic serialization layer.
//!
//! # S3 XML conventions
//!
//! - Namespace: `http://s3.amazonaws.com/doc/2006-03-01/`
//! - XML declaration: `<?xml version="1.0" encoding="UTF-8"?>`
//! - ETags appear quoted in element text (`<ETag>"abc123"</ETag>`)

pub mod error;
pub mod read;
pub mod write;

pub use error::XmlError;
pub use read::{parse_completion_document, parse_initiate_result};
pub use write::{S3_NAMESPACE, completion_document, initiate_result_document};
