//! Wire-shape types for the stackput S3 upload protocol.
//!
//! These are the structs exchanged with an S3-compatible backend during an
//! upload: the initiate-multipart response and the completion document. The
//! XML encoding lives in `stackput-xml`; the protocol logic lives in
//! `stackput-client`.

pub mod types;

pub use types::{CompletedMultipartUpload, CompletedPart, InitiateMultipartUploadResult};
