//! Document cleaning: annotation sanitizing and overlay stripping.
//!
//! Cleaning always reparses the original bytes — it never operates on
//! analyzer state. The audit, when supplied, is advisory only: it feeds the
//! `removed_redact_annots_estimate` accounting and changes no behavior.

use serde::{Deserialize, Serialize};
use tracing::debug;

use redactcheck_core::{
    AuditLog, CancelToken, CheckError, is_mostly_ascii, normalize_newlines,
    strip_common_black_rect_fills,
};
use redactcheck_pdf::{
    PdfFile, content_streams, decode_content_stream, delete_page_annots, replace_content_stream,
};

use crate::validate_magic;

/// Fixed caveat attached to every actions summary.
pub const CLEAN_NOTE: &str =
    "Overlay removal is heuristic; verify output pages listed in the audit.";

/// What the cleaner did to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionsSummary {
    /// Redaction annotations removed, as estimated from the advisory audit
    /// (0 when no audit was supplied).
    pub removed_redact_annots_estimate: usize,
    /// Pages whose `Annots` entry was deleted.
    pub removed_annots_pages: usize,
    /// Overlay operator sequences removed across all content streams.
    pub removed_overlay_ops_estimate: usize,
    /// Fixed human-readable caveat ([`CLEAN_NOTE`]).
    pub note: String,
}

/// A cleaned document with its actions summary.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    /// The rewritten document. Always a complete, parseable PDF.
    pub cleaned_bytes: Vec<u8>,
    /// Accounting of what was removed.
    pub actions: ActionsSummary,
}

/// Clean a PDF: strip annotation arrays and black-rectangle overlays.
///
/// The optional `audit` is advisory (see module docs).
pub fn clean(bytes: &[u8], audit: Option<&AuditLog>) -> Result<CleanOutcome, CheckError> {
    clean_with_cancel(bytes, audit, &CancelToken::new())
}

/// [`clean`] with cooperative cancellation, checked between pages.
///
/// Cancellation aborts before serialization: either a complete cleaned
/// document is returned or none.
pub fn clean_with_cancel(
    bytes: &[u8],
    audit: Option<&AuditLog>,
    cancel: &CancelToken,
) -> Result<CleanOutcome, CheckError> {
    validate_magic(bytes)?;
    let mut doc = PdfFile::open(bytes)?;

    let mut removed_annots_pages = 0usize;
    let mut removed_overlay_ops = 0usize;

    for index in 0..doc.page_count() {
        if cancel.is_cancelled() {
            return Err(CheckError::Cancelled);
        }
        let page_id = doc.page_id(index)?;

        if delete_page_annots(&mut doc, page_id)? {
            removed_annots_pages += 1;
        }

        for stream_ref in content_streams(&doc, page_id)? {
            let Some(decoded) = decode_content_stream(&doc, stream_ref.object_id) else {
                continue;
            };
            if !is_mostly_ascii(&decoded.bytes) {
                debug!(page = index + 1, "stream is not ASCII-dominant; left untouched");
                continue;
            }
            let Ok(text) = String::from_utf8(decoded.bytes) else {
                debug!(page = index + 1, "stream is not valid UTF-8; left untouched");
                continue;
            };

            let normalized = normalize_newlines(&text);
            let (cleaned, removed) = strip_common_black_rect_fills(&normalized);
            if removed == 0 {
                continue;
            }
            replace_content_stream(
                &mut doc,
                page_id,
                stream_ref,
                cleaned.into_bytes(),
                decoded.decompressed,
            )?;
            removed_overlay_ops += removed;
            debug!(page = index + 1, removed, "stream rewritten");
        }
    }

    let cleaned_bytes = doc.serialize()?;

    let removed_redact_annots_estimate = audit
        .map(|a| a.pages.iter().map(|p| p.signals.redact_annots).sum())
        .unwrap_or(0);

    Ok(CleanOutcome {
        cleaned_bytes,
        actions: ActionsSummary {
            removed_redact_annots_estimate,
            removed_annots_pages,
            removed_overlay_ops_estimate: removed_overlay_ops,
            note: CLEAN_NOTE.to_string(),
        },
    })
}
