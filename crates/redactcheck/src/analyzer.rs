//! Document analysis: per-page signal collection, scoring, and audit
//! assembly.

use chrono::{SecondsFormat, Utc};
use tracing::debug;

use redactcheck_core::{
    AuditLog, AuditSummary, CancelToken, CheckError, DeviceRect, PageAudit, PageSignals, Risk,
    SourceInfo, ToolInfo, Viewport, count_redact_annotations, count_text_chars, findings_for_page,
    reconstruct_rects, round_ratio, score_page, sha256_hex, text_boxes,
};
use redactcheck_core::{AUDIT_SCHEMA, AUDIT_SCHEMA_VERSION};
use redactcheck_pdf::{PdfFile, page_annotations, page_draw_ops, page_text_items};

use crate::validate_magic;

/// Analyze a PDF and produce its audit log.
///
/// `file_name` is recorded verbatim in the audit's source block; it is not
/// used to read anything.
pub fn analyze(bytes: &[u8], file_name: &str) -> Result<AuditLog, CheckError> {
    analyze_with_cancel(bytes, file_name, &CancelToken::new())
}

/// [`analyze`] with cooperative cancellation, checked between pages.
pub fn analyze_with_cancel(
    bytes: &[u8],
    file_name: &str,
    cancel: &CancelToken,
) -> Result<AuditLog, CheckError> {
    validate_magic(bytes)?;
    let doc = PdfFile::open(bytes)?;
    let page_count = doc.page_count();

    let mut pages = Vec::with_capacity(page_count);
    for index in 0..page_count {
        if cancel.is_cancelled() {
            return Err(CheckError::Cancelled);
        }
        pages.push(audit_page(&doc, index)?);
    }

    let pages_flagged = pages.iter().filter(|p| p.risk == Risk::Flagged).count();
    debug!(page_count, pages_flagged, "analysis complete");

    Ok(AuditLog {
        schema: AUDIT_SCHEMA.to_string(),
        schema_version: AUDIT_SCHEMA_VERSION.to_string(),
        tool: ToolInfo::current(env!("CARGO_PKG_VERSION")),
        source: SourceInfo {
            file_name: file_name.to_string(),
            file_size_bytes: bytes.len() as u64,
            sha256: sha256_hex(bytes),
            page_count,
        },
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        summary: AuditSummary { pages_flagged },
        pages,
    })
}

/// Collect signals and score a single page. `index` is 0-based.
pub(crate) fn audit_page(doc: &PdfFile, index: usize) -> Result<PageAudit, CheckError> {
    let page_id = doc.page_id(index)?;
    let (page_w, page_h) = doc.page_size(page_id)?;
    let viewport = Viewport::new(page_w, page_h);

    let ops = page_draw_ops(doc, page_id)?;
    let rects = reconstruct_rects(&ops, &viewport);

    let items = page_text_items(doc, page_id)?;
    let boxes = text_boxes(&items, &viewport);
    let text_chars = count_text_chars(&items);

    let redact_annots = count_redact_annotations(&page_annotations(doc, page_id));

    let overlaps_text_likely = rects
        .iter()
        .any(|rect| boxes.iter().any(|text_box| rect.intersects(text_box)));
    let rect_area: f64 = rects.iter().map(DeviceRect::area).sum();

    let signals = PageSignals {
        has_text: PageSignals::has_text_for(text_chars),
        text_chars,
        dark_rects: rects.len(),
        dark_rect_area_ratio: round_ratio(rect_area / viewport.area()),
        redact_annots,
        overlaps_text_likely,
    };
    let (confidence, risk) = score_page(&signals, &rects, viewport.area());
    let findings = findings_for_page(&rects, redact_annots);

    debug!(
        page = index + 1,
        confidence,
        dark_rects = signals.dark_rects,
        redact_annots,
        "page scored"
    );

    Ok(PageAudit {
        page: index + 1,
        risk,
        confidence,
        signals,
        findings,
    })
}
