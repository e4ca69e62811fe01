//! Content stream access: enumeration, decoding, and rewriting.
//!
//! The analyzer reads streams through [`page_content_bytes`]; the cleaner
//! needs per-stream granularity ([`content_streams`], [`decode_content_stream`],
//! [`replace_content_stream`]) so that each stream can be rewritten — or left
//! byte-identical — independently.

use std::io::Read;

use flate2::read::ZlibDecoder;
use tracing::{debug, warn};

use crate::document::PdfFile;
use crate::error::BackendError;

/// A reference to one content stream of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentStreamRef {
    /// The stream's object id.
    pub object_id: lopdf::ObjectId,
    /// Position within the page's `Contents` entry: 0 for a single stream,
    /// the array index otherwise.
    pub slot: usize,
}

/// A decoded content stream body.
#[derive(Debug, Clone)]
pub struct DecodedStream {
    /// Decoded bytes.
    pub bytes: Vec<u8>,
    /// Whether the bytes differ from the stored stream body (a declared
    /// filter was applied, or a speculative zlib inflation succeeded). A
    /// rewrite must then drop the filter entry.
    pub decompressed: bool,
}

/// Enumerate the content streams of a page in order.
///
/// Handles both the single-reference and the array forms of `Contents`.
/// Array entries that are not references are skipped.
pub fn content_streams(
    doc: &PdfFile,
    page_id: lopdf::ObjectId,
) -> Result<Vec<ContentStreamRef>, BackendError> {
    let page_dict = doc
        .inner()
        .get_object(page_id)
        .and_then(lopdf::Object::as_dict)
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };

    match contents {
        lopdf::Object::Reference(id) => Ok(vec![ContentStreamRef {
            object_id: *id,
            slot: 0,
        }]),
        lopdf::Object::Array(entries) => {
            let mut refs = Vec::with_capacity(entries.len());
            for (slot, entry) in entries.iter().enumerate() {
                match entry.as_reference() {
                    Ok(id) => refs.push(ContentStreamRef {
                        object_id: id,
                        slot,
                    }),
                    Err(_) => {
                        debug!(page = ?page_id, slot, "non-reference Contents entry; skipping")
                    }
                }
            }
            Ok(refs)
        }
        _ => Ok(Vec::new()),
    }
}

/// Decode one content stream body.
///
/// Declared FlateDecode filters are applied; unfiltered bodies that begin
/// with a zlib magic are inflated speculatively. Returns `None` when the
/// stream cannot be decoded (unsupported filter, corrupt deflate data) — the
/// caller must leave such streams untouched.
pub fn decode_content_stream(doc: &PdfFile, object_id: lopdf::ObjectId) -> Option<DecodedStream> {
    let stream = doc
        .inner()
        .get_object(object_id)
        .and_then(lopdf::Object::as_stream)
        .ok()?;

    match stream.dict.get(b"Filter") {
        Ok(filter) => {
            if !is_flate_filter(filter) {
                debug!(object = ?object_id, "unsupported stream filter; leaving untouched");
                return None;
            }
            match stream.decompressed_content() {
                Ok(bytes) => Some(DecodedStream {
                    bytes,
                    decompressed: true,
                }),
                Err(e) => {
                    warn!(object = ?object_id, error = %e, "stream decompression failed; leaving untouched");
                    None
                }
            }
        }
        Err(_) => {
            let raw = &stream.content;
            if has_zlib_magic(raw) {
                match inflate(raw) {
                    Ok(bytes) => Some(DecodedStream {
                        bytes,
                        decompressed: true,
                    }),
                    Err(_) => Some(DecodedStream {
                        bytes: raw.clone(),
                        decompressed: false,
                    }),
                }
            } else {
                Some(DecodedStream {
                    bytes: raw.clone(),
                    decompressed: false,
                })
            }
        }
    }
}

/// Replace one content stream with a new body.
///
/// The original stream dictionary is cloned; when `drop_filter` is set the
/// `Filter`/`DecodeParms` entries are removed (the new body is stored
/// plain). The new stream is registered as a fresh object and the page's
/// `Contents` entry is repointed at it.
pub fn replace_content_stream(
    doc: &mut PdfFile,
    page_id: lopdf::ObjectId,
    stream_ref: ContentStreamRef,
    new_body: Vec<u8>,
    drop_filter: bool,
) -> Result<(), BackendError> {
    let mut dict = doc
        .inner()
        .get_object(stream_ref.object_id)
        .and_then(lopdf::Object::as_stream)
        .map_err(|e| BackendError::Parse(format!("failed to get content stream: {e}")))?
        .dict
        .clone();
    if drop_filter {
        dict.remove(b"Filter");
        dict.remove(b"DecodeParms");
    }
    dict.remove(b"Length");

    let new_id = doc.inner_mut().add_object(lopdf::Stream::new(dict, new_body));

    let page_dict = doc
        .inner_mut()
        .get_object_mut(page_id)
        .and_then(lopdf::Object::as_dict_mut)
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

    let contents = page_dict
        .get(b"Contents")
        .map_err(|e| BackendError::Parse(format!("page has no Contents entry: {e}")))?
        .clone();

    match contents {
        lopdf::Object::Reference(_) if stream_ref.slot == 0 => {
            page_dict.set("Contents", lopdf::Object::Reference(new_id));
            Ok(())
        }
        lopdf::Object::Array(mut entries) if stream_ref.slot < entries.len() => {
            entries[stream_ref.slot] = lopdf::Object::Reference(new_id);
            page_dict.set("Contents", lopdf::Object::Array(entries));
            Ok(())
        }
        _ => Err(BackendError::Parse(format!(
            "Contents slot {} not found for replacement",
            stream_ref.slot
        ))),
    }
}

/// Concatenated decodable content of a page, streams joined by newlines.
///
/// Undecodable streams are skipped; the operator and text walkers then see
/// only what could be read, which degrades to fewer signals, never an error.
pub(crate) fn page_content_bytes(
    doc: &PdfFile,
    page_id: lopdf::ObjectId,
) -> Result<Vec<u8>, BackendError> {
    let mut out = Vec::new();
    for stream_ref in content_streams(doc, page_id)? {
        if let Some(decoded) = decode_content_stream(doc, stream_ref.object_id) {
            if !out.is_empty() {
                out.push(b'\n');
            }
            out.extend_from_slice(&decoded.bytes);
        }
    }
    Ok(out)
}

/// Whether a filter entry declares (exactly) FlateDecode.
fn is_flate_filter(filter: &lopdf::Object) -> bool {
    match filter {
        lopdf::Object::Name(name) => name.as_slice() == b"FlateDecode",
        lopdf::Object::Array(items) => {
            items.len() == 1
                && matches!(&items[0], lopdf::Object::Name(name) if name.as_slice() == b"FlateDecode")
        }
        _ => false,
    }
}

/// zlib stream magic: 0x78 followed by a common flags byte.
fn has_zlib_magic(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x78 && matches!(bytes[1], 0x9C | 0x01 | 0xDA)
}

fn inflate(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
