//! S3 multipart upload wire shapes, client-side subset.

/// S3 InitiateMultipartUploadResult.
///
/// Body of a successful `POST {key}?uploads` response. The backend scopes all
/// subsequent part, complete, and abort calls to `upload_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitiateMultipartUploadResult {
    /// Bucket the upload was created in, when the backend reports it.
    pub bucket: Option<String>,
    /// Object key the upload targets, when the backend reports it.
    pub key: Option<String>,
    /// Backend-issued session identifier. A response without one cannot be
    /// acted on.
    pub upload_id: Option<String>,
}

/// S3 CompletedMultipartUpload.
///
/// Request body of `POST {key}?uploadId={id}`. Parts must be listed in
/// ascending part-number order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedMultipartUpload {
    /// The uploaded parts, in ascending part-number order.
    pub parts: Vec<CompletedPart>,
}

/// S3 CompletedPart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPart {
    /// 1-based part number.
    pub part_number: i32,
    /// Backend-issued ETag for the part, stored without surrounding quotes.
    pub e_tag: String,
}
