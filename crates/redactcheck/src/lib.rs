//! Detect and repair improperly redacted PDF documents.
//!
//! An *improperly redacted* PDF visually obscures text — with a drawn black
//! rectangle or a redaction annotation — while the text operators survive in
//! the file, recoverable by any reader that ignores the overlay. This crate
//! provides:
//!
//! - [`analyze`] — walk each page's drawing operators, reconstruct dark
//!   filled rectangles, compare them against text geometry and redaction
//!   annotations, and emit a structured [`AuditLog`] with a per-page
//!   confidence and a binary verdict.
//! - [`clean`] — reparse the document, delete annotation arrays, and rewrite
//!   content streams so black-rectangle overlay idioms are removed and the
//!   hidden content becomes visible for leak verification.
//!
//! Both operations are pure functions of the input bytes, synchronous, and
//! single-threaded; hosts can freely move whole documents across threads.
//! Cooperative cancellation is available through the `*_with_cancel`
//! variants and [`CancelToken`].
//!
//! # Example
//!
//! ```ignore
//! let audit = redactcheck::analyze(&bytes, "report.pdf")?;
//! if audit.summary.pages_flagged > 0 {
//!     let outcome = redactcheck::clean(&bytes, Some(&audit))?;
//!     std::fs::write("report.cleaned.pdf", &outcome.cleaned_bytes)?;
//! }
//! ```

/// Document analysis.
pub mod analyzer;
/// Document cleaning.
pub mod cleaner;

pub use analyzer::{analyze, analyze_with_cancel};
pub use cleaner::{ActionsSummary, CLEAN_NOTE, CleanOutcome, clean, clean_with_cancel};

pub use redactcheck_core::{
    AuditLog, AuditSummary, CancelToken, CheckError, DeviceRect, Finding, PageAudit, PageSignals,
    Risk, SourceInfo, ToolInfo, Viewport,
};

/// Reject empty inputs and inputs without the PDF magic prefix.
pub(crate) fn validate_magic(bytes: &[u8]) -> Result<(), CheckError> {
    if bytes.is_empty() {
        return Err(CheckError::EmptyInput);
    }
    if !bytes.starts_with(b"%PDF-") {
        return Err(CheckError::MalformedPdf);
    }
    Ok(())
}
