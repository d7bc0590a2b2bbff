//! Upload orchestration: strategy selection and the multipart state machine.

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, ETAG, EXPECT};
use http::{HeaderMap, HeaderValue, Method};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;

use stackput_model::{CompletedMultipartUpload, CompletedPart};
use stackput_xml::{completion_document, parse_initiate_result};

use crate::config::UploadConfig;
use crate::error::{RequestError, UploadError};
use crate::request::Exchange;
use crate::transport::Transport;

/// Fixed multipart part size (5 MiB). Payloads below this go up as a single
/// PUT; everything else is chunked at this size.
pub const PART_SIZE: usize = 5 * 1024 * 1024;

/// Characters percent-encoded when embedding an upload id in a URL: everything
/// except unreserved characters (A-Z, a-z, 0-9, `-`, `_`, `.`, `~`).
const UPLOAD_ID_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Buffer uploader for S3-compatible object storage.
///
/// One instance can serve many uploads; each call drives its own sequence of
/// exchanges through the shared transport, with no two exchanges of the same
/// call ever in flight concurrently.
#[derive(Debug)]
pub struct Uploader<T> {
    pub(crate) transport: T,
    pub(crate) config: UploadConfig,
}

impl<T: Transport> Uploader<T> {
    /// Create an uploader over `transport`.
    pub fn new(transport: T, config: UploadConfig) -> Self {
        Self { transport, config }
    }

    /// Upload `payload` under `key`.
    ///
    /// `key` is the object path as the transport expects it, e.g.
    /// `/reports/q3.bin`. For a single-request upload the caller's `headers`
    /// are sent with the PUT (with `Expect` and `Content-Length` set by the
    /// protocol); for a multipart upload they are sent with the initiate
    /// request unmodified.
    ///
    /// On success the final backend response is returned: the PUT response
    /// for small payloads, the completion response for multipart. On failure
    /// an initiated multipart session has already been cleaned up
    /// (best-effort) before the error is returned.
    pub async fn upload(
        &self,
        payload: Bytes,
        key: &str,
        headers: HeaderMap,
    ) -> Result<Exchange, UploadError> {
        if payload.len() < PART_SIZE {
            self.single_upload(payload, key, headers).await
        } else {
            self.multipart_upload(payload, key, headers).await
        }
    }

    async fn single_upload(
        &self,
        payload: Bytes,
        key: &str,
        mut headers: HeaderMap,
    ) -> Result<Exchange, UploadError> {
        debug!(key = %key, len = payload.len(), "uploading in a single request");

        headers.insert(EXPECT, HeaderValue::from_static("100-continue"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from(payload.len()));

        Ok(self.execute(Method::PUT, key, headers, Some(payload)).await?)
    }

    async fn multipart_upload(
        &self,
        payload: Bytes,
        key: &str,
        headers: HeaderMap,
    ) -> Result<Exchange, UploadError> {
        debug!(key = %key, len = payload.len(), "uploading in parts");

        // A failed initiate leaves nothing behind, so it surfaces directly.
        let (_, initiated) = self
            .execute_xml(
                Method::POST,
                &format!("{key}?uploads"),
                headers,
                None,
                parse_initiate_result,
            )
            .await?;
        let upload_id = initiated.upload_id.ok_or(UploadError::MissingUploadId)?;

        let mut session = MultipartSession {
            uploader: self,
            key,
            upload_id: utf8_percent_encode(&upload_id, UPLOAD_ID_ENCODE_SET).to_string(),
            chunks: partition(&payload, PART_SIZE),
            etags: Vec::new(),
        };

        match session.run().await {
            Ok(exchange) => Ok(exchange),
            Err(err) => {
                // Best-effort cleanup; the caller sees the error that got us
                // here, whatever happens to the abort itself.
                session.abort().await;
                Err(err)
            }
        }
    }
}

/// One in-flight multipart upload: the backend session id plus the etags
/// accumulated so far, in part order.
struct MultipartSession<'a, T> {
    uploader: &'a Uploader<T>,
    key: &'a str,
    /// Percent-encoded for URL embedding.
    upload_id: String,
    chunks: Vec<Bytes>,
    etags: Vec<String>,
}

impl<T: Transport> MultipartSession<'_, T> {
    async fn run(&mut self) -> Result<Exchange, UploadError> {
        self.upload_parts().await?;
        self.complete().await
    }

    /// Upload every chunk in order, recording each part's ETag before the
    /// next part starts. The first failure ends the sequence.
    async fn upload_parts(&mut self) -> Result<(), UploadError> {
        for index in 0..self.chunks.len() {
            let etag = self.upload_part(index).await?;
            self.etags.push(etag);
        }
        Ok(())
    }

    async fn upload_part(&self, index: usize) -> Result<String, UploadError> {
        let chunk = self.chunks[index].clone();
        let part_number = index + 1;
        debug!(
            key = %self.key,
            part_number,
            len = chunk.len(),
            "uploading part"
        );

        let path = format!(
            "{}?partNumber={}&uploadId={}",
            self.key, part_number, self.upload_id
        );
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from(chunk.len()));

        let exchange = self
            .uploader
            .execute(Method::PUT, &path, headers, Some(chunk))
            .await?;

        exchange
            .headers
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim_matches('"').to_owned())
            .ok_or(UploadError::MissingEtag { part: part_number })
    }

    async fn complete(&self) -> Result<Exchange, UploadError> {
        debug!(key = %self.key, parts = self.etags.len(), "completing upload");

        let document = CompletedMultipartUpload {
            parts: self
                .etags
                .iter()
                .enumerate()
                .map(|(index, e_tag)| CompletedPart {
                    part_number: i32::try_from(index + 1).unwrap_or(i32::MAX),
                    e_tag: e_tag.clone(),
                })
                .collect(),
        };
        let body = completion_document(&document).map_err(RequestError::Xml)?;

        let path = format!("{}?uploadId={}", self.key, self.upload_id);
        Ok(self
            .uploader
            .execute(Method::POST, &path, HeaderMap::new(), Some(Bytes::from(body)))
            .await?)
    }

    /// Best-effort cleanup of an initiated session. Its outcome is logged and
    /// discarded so the error that triggered it stays the one reported.
    async fn abort(&self) {
        debug!(key = %self.key, upload_id = %self.upload_id, "cleaning up multipart session");

        let path = format!("{}?&uploadId={}", self.key, self.upload_id);
        match self
            .uploader
            .execute(Method::DELETE, &path, HeaderMap::new(), None)
            .await
        {
            Ok(_) => debug!(key = %self.key, upload_id = %self.upload_id, "cleanup succeeded"),
            Err(err) => debug!(
                key = %self.key,
                upload_id = %self.upload_id,
                error = %err,
                "cleanup failed"
            ),
        }
    }
}

/// Split `payload` into ordered chunks of `part_size`, the last holding the
/// remainder. Chunks are views sharing the payload's allocation.
fn partition(payload: &Bytes, part_size: usize) -> Vec<Bytes> {
    let mut chunks = Vec::with_capacity(payload.len().div_ceil(part_size));
    let mut offset = 0;
    while offset < payload.len() {
        let end = usize::min(offset + part_size, payload.len());
        chunks.push(payload.slice(offset..end));
        offset = end;
    }
    chunks
}
