//! Parsing the XML documents the upload protocol receives.
//!
//! The client reads exactly one response shape, `InitiateMultipartUploadResult`;
//! a test backend additionally parses the `CompleteMultipartUpload` request
//! body the client produces. Both parsers walk the document with a small
//! [`Cursor`] over quick-xml events and skip elements they do not know, so
//! backends remain free to add fields.

use quick_xml::Reader;
use quick_xml::events::Event;

use stackput_model::{CompletedMultipartUpload, CompletedPart, InitiateMultipartUploadResult};

use crate::error::XmlError;

/// Parse an `InitiateMultipartUploadResult` response body.
///
/// A document without an `UploadId` parses successfully with the field left
/// `None`; deciding what that means is the caller's business.
///
/// # Errors
///
/// Returns `XmlError` if the XML is malformed.
pub fn parse_initiate_result(xml: &[u8]) -> Result<InitiateMultipartUploadResult, XmlError> {
    let mut cursor = Cursor::at_root(xml)?;

    let mut result = InitiateMultipartUploadResult::default();
    while let Some(tag) = cursor.child()? {
        match tag.as_str() {
            "Bucket" => result.bucket = Some(cursor.text()?),
            "Key" => result.key = Some(cursor.text()?),
            "UploadId" => result.upload_id = Some(cursor.text()?),
            _ => cursor.skip()?,
        }
    }
    Ok(result)
}

/// Parse a `CompleteMultipartUpload` request body.
///
/// # Errors
///
/// Returns `XmlError` if the XML is malformed or a `<Part>` lacks a number
/// or ETag.
pub fn parse_completion_document(xml: &[u8]) -> Result<CompletedMultipartUpload, XmlError> {
    let mut cursor = Cursor::at_root(xml)?;

    let mut parts = Vec::new();
    while let Some(tag) = cursor.child()? {
        if tag == "Part" {
            parts.push(parse_part(&mut cursor)?);
        } else {
            cursor.skip()?;
        }
    }
    Ok(CompletedMultipartUpload { parts })
}

/// Parse one `<Part>`; the cursor is just inside the element.
fn parse_part(cursor: &mut Cursor<'_>) -> Result<CompletedPart, XmlError> {
    let mut part_number = None;
    let mut e_tag = None;

    while let Some(tag) = cursor.child()? {
        match tag.as_str() {
            "PartNumber" => {
                let text = cursor.text()?;
                part_number = Some(text.parse::<i32>().map_err(|err| {
                    XmlError::ParseError(format!("invalid part number '{text}': {err}"))
                })?);
            }
            // Stored without the quotes the wire form carries.
            "ETag" => e_tag = Some(cursor.text()?.trim_matches('"').to_owned()),
            _ => cursor.skip()?,
        }
    }

    Ok(CompletedPart {
        part_number: part_number
            .ok_or_else(|| XmlError::MissingElement("PartNumber".to_string()))?,
        e_tag: e_tag.ok_or_else(|| XmlError::MissingElement("ETag".to_string()))?,
    })
}

/// Event cursor over one XML document.
///
/// Moves one element at a time: [`child`](Cursor::child) yields the next
/// child's tag name (or `None` at the enclosing end tag), after which the
/// caller consumes the element with [`text`](Cursor::text) or
/// [`skip`](Cursor::skip).
struct Cursor<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> Cursor<'a> {
    /// Skip past the declaration and the root element's opening tag.
    fn at_root(xml: &'a [u8]) -> Result<Self, XmlError> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event()? {
                Event::Start(_) => return Ok(Self { reader }),
                Event::Eof => return Err(XmlError::MissingElement("root element".to_string())),
                // Declaration, comments, processing instructions, whitespace.
                _ => {}
            }
        }
    }

    /// The next child element's tag name, or `None` once the enclosing
    /// element ends.
    fn child(&mut self) -> Result<Option<String>, XmlError> {
        loop {
            match self.reader.read_event()? {
                Event::Start(e) => {
                    let name = std::str::from_utf8(e.name().as_ref())
                        .map_err(|err| XmlError::ParseError(err.to_string()))?
                        .to_owned();
                    return Ok(Some(name));
                }
                Event::End(_) => return Ok(None),
                Event::Eof => return Err(truncated()),
                _ => {}
            }
        }
    }

    /// The unescaped text content of the current element, consuming its end
    /// tag.
    fn text(&mut self) -> Result<String, XmlError> {
        let mut text = String::new();
        loop {
            match self.reader.read_event()? {
                Event::Text(e) => {
                    let decoded = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    let unescaped = quick_xml::escape::unescape(&decoded)
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    text.push_str(&unescaped);
                }
                Event::End(_) => return Ok(text),
                Event::Eof => return Err(truncated()),
                _ => {}
            }
        }
    }

    /// Skip the current element and everything inside it.
    fn skip(&mut self) -> Result<(), XmlError> {
        let mut depth = 1u32;
        while depth > 0 {
            match self.reader.read_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth -= 1,
                Event::Eof => return Err(truncated()),
                _ => {}
            }
        }
        Ok(())
    }
}

fn truncated() -> XmlError {
    XmlError::UnexpectedElement("document ended inside an element".to_string())
}
