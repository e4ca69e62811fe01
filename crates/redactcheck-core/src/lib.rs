//! Backend-independent data model and algorithms for redactcheck.
//!
//! This crate holds everything that does not require a PDF parser: the
//! device-space geometry the audit reasons in, the shape-based rectangle
//! reconstructor, text geometry, annotation inspection, risk scoring, the
//! audit log schema, and the overlay stripper. The `redactcheck-pdf` crate
//! supplies the parsed inputs; the `redactcheck` crate orchestrates.
//!
//! # Modules
//!
//! - [`geometry`] — [`Viewport`], [`DeviceRect`], AABB intersection
//! - [`ops`] — version-agnostic draw-operator shapes: [`ArgValue`], [`DrawOp`]
//! - [`rects`] — rectangle reconstruction from operator streams
//! - [`text`] — [`TextItem`], text boxes, glyph counting
//! - [`annotation`] — [`PageAnnotation`], redaction counting
//! - [`risk`] — [`PageSignals`], scoring, [`Risk`]
//! - [`audit`] — [`AuditLog`] schema types and builders
//! - [`stripper`] — content-stream overlay removal
//! - [`error`] — [`CheckError`]
//! - [`cancel`] — [`CancelToken`]

#![deny(missing_docs)]

/// Page annotation inspection.
pub mod annotation;
/// Audit log schema types, hashing, and finding builders.
pub mod audit;
/// Cooperative cancellation.
pub mod cancel;
/// Error types shared by the analyzer and the cleaner.
pub mod error;
/// Viewport projection and device-space rectangles.
pub mod geometry;
/// Version-agnostic draw-operator shapes.
pub mod ops;
/// Rectangle reconstruction from draw-operator streams.
pub mod rects;
/// Risk scoring.
pub mod risk;
/// Overlay stripping for content-stream text.
pub mod stripper;
/// Text geometry and glyph counting.
pub mod text;

pub use annotation::{PageAnnotation, count_redact_annotations};
pub use audit::{
    AUDIT_SCHEMA, AUDIT_SCHEMA_VERSION, AuditLog, AuditSummary, Finding, MAX_BBOX_SAMPLES,
    PageAudit, SourceInfo, ToolInfo, findings_for_page, round_ratio, sha256_hex,
};
pub use cancel::CancelToken;
pub use error::CheckError;
pub use geometry::{DeviceRect, VIEWPORT_SCALE, Viewport};
pub use ops::{ArgValue, DrawOp};
pub use rects::reconstruct_rects;
pub use risk::{FLAG_THRESHOLD, PageSignals, Risk, TEXT_CHAR_THRESHOLD, score_page};
pub use stripper::{is_mostly_ascii, normalize_newlines, strip_common_black_rect_fills};
pub use text::{TextItem, count_text_chars, text_boxes};
