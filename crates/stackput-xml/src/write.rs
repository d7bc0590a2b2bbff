//! Composing the XML documents the upload protocol sends.
//!
//! Two documents are ever written: the `CompleteMultipartUpload` request
//! body the client sends, and the `InitiateMultipartUploadResult` response
//! body a test backend answers initiate requests with. Both are small fixed
//! shapes, so each gets its own writer function instead of a generic
//! serialization trait.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use stackput_model::{CompletedMultipartUpload, InitiateMultipartUploadResult};

use crate::error::XmlError;

/// The S3 XML namespace.
pub const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// Compose the `CompleteMultipartUpload` request body: one `<Part>` per
/// uploaded part, in the order given, each carrying its 1-based number and
/// quoted ETag.
///
/// # Errors
///
/// Returns `XmlError` if writing fails.
pub fn completion_document(document: &CompletedMultipartUpload) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(256);
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer
        .create_element("CompleteMultipartUpload")
        .with_attribute(("xmlns", S3_NAMESPACE))
        .write_inner_content(|w| {
            for part in &document.parts {
                w.create_element("Part").write_inner_content(|w| {
                    w.create_element("PartNumber")
                        .write_text_content(BytesText::new(&part.part_number.to_string()))?;

                    // The backend requires the ETag quoted verbatim, so the
                    // quotes must reach the wire unescaped while the etag
                    // itself is still escaped.
                    let escaped = quick_xml::escape::escape(part.e_tag.as_str());
                    w.create_element("ETag")
                        .write_text_content(BytesText::from_escaped(format!("\"{escaped}\"")))?;
                    Ok(())
                })?;
            }
            Ok(())
        })?;

    Ok(buf)
}

/// Compose an `InitiateMultipartUploadResult` body the way an S3-compatible
/// backend would.
///
/// # Errors
///
/// Returns `XmlError` if writing fails.
pub fn initiate_result_document(
    result: &InitiateMultipartUploadResult,
) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(256);
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer
        .create_element("InitiateMultipartUploadResult")
        .with_attribute(("xmlns", S3_NAMESPACE))
        .write_inner_content(|w| {
            let fields = [
                ("Bucket", result.bucket.as_deref()),
                ("Key", result.key.as_deref()),
                ("UploadId", result.upload_id.as_deref()),
            ];
            for (tag, value) in fields {
                if let Some(text) = value {
                    w.create_element(tag)
                        .write_text_content(BytesText::new(text))?;
                }
            }
            Ok(())
        })?;

    Ok(buf)
}
