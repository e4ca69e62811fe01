//! lopdf-based PDF access layer for redactcheck.
//!
//! Supplies the parsed inputs the `redactcheck-core` algorithms consume:
//! draw-operator lists, text items, annotations, and content streams, plus
//! the mutations the cleaner needs (annotation deletion, stream replacement,
//! reserialization).
//!
//! Local failures degrade instead of erroring wherever the contract allows:
//! streams that will not decode are skipped, malformed annotations are
//! ignored, unparseable operator streams yield empty lists. Only structural
//! failures (unparseable document, missing page dictionaries) surface as
//! [`BackendError`].

/// Page annotation access.
pub mod annots;
/// Parsed document wrapper.
pub mod document;
/// Error types for the access layer.
pub mod error;
/// Lowering of content operations into draw-operator shapes.
pub mod ops;
/// Content stream enumeration, decoding, and rewriting.
pub mod streams;
/// Text-item extraction.
pub mod text;

#[cfg(test)]
pub(crate) mod test_support;

pub use annots::{delete_page_annots, page_annotations};
pub use document::PdfFile;
pub use error::BackendError;
pub use ops::page_draw_ops;
pub use streams::{
    ContentStreamRef, DecodedStream, content_streams, decode_content_stream,
    replace_content_stream,
};
pub use text::page_text_items;
