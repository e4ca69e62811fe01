//! Audit log schema and builders.
//!
//! The JSON shape emitted here is a stable contract: top-level keys, field
//! names, and the schema identifiers are fixed. Consumers key on
//! [`AUDIT_SCHEMA`] / [`AUDIT_SCHEMA_VERSION`] and must not receive legacy
//! severity buckets — the verdict is binary.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::geometry::DeviceRect;
use crate::risk::{PageSignals, Risk};

/// Stable schema identifier.
pub const AUDIT_SCHEMA: &str = "com.example.redact-check";
/// Stable schema version.
pub const AUDIT_SCHEMA_VERSION: &str = "1.0.0";
/// Tool name recorded in every audit.
pub const TOOL_NAME: &str = "redactcheck";
/// Build channel recorded in every audit.
pub const TOOL_BUILD: &str = "cli";
/// At most this many rectangle samples are embedded per finding.
pub const MAX_BBOX_SAMPLES: usize = 3;

/// The complete audit for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    /// Schema identifier ([`AUDIT_SCHEMA`]).
    pub schema: String,
    /// Schema version ([`AUDIT_SCHEMA_VERSION`]).
    pub schema_version: String,
    /// Producing tool.
    pub tool: ToolInfo,
    /// The analyzed input.
    pub source: SourceInfo,
    /// ISO-8601 UTC timestamp of audit generation.
    pub generated_at: String,
    /// Document-level rollup.
    pub summary: AuditSummary,
    /// Per-page audits, ordered by page number.
    pub pages: Vec<PageAudit>,
}

/// Identity of the producing tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Tool version.
    pub version: String,
    /// Build channel.
    pub build: String,
}

impl ToolInfo {
    /// The fixed identity of this crate family, with the given version.
    pub fn current(version: &str) -> Self {
        Self {
            name: TOOL_NAME.to_string(),
            version: version.to_string(),
            build: TOOL_BUILD.to_string(),
        }
    }
}

/// Identity and fingerprint of the analyzed input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Caller-supplied file name.
    pub file_name: String,
    /// Input length in bytes.
    pub file_size_bytes: u64,
    /// Lowercase-hex SHA-256 of the input bytes.
    pub sha256: String,
    /// Number of pages in the document.
    pub page_count: usize,
}

/// Document-level rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Number of pages whose verdict is `flagged`.
    pub pages_flagged: usize,
}

/// The audit record for a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAudit {
    /// 1-based page number.
    pub page: usize,
    /// Binary verdict.
    pub risk: Risk,
    /// Clamped confidence, 0–100.
    pub confidence: u8,
    /// The evidence behind the verdict.
    pub signals: PageSignals,
    /// Structured findings.
    pub findings: Vec<Finding>,
}

/// A structured per-page finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Finding {
    /// One or more dark rectangles that look like drawn-on overlays.
    SuspectedOverlayRect {
        /// Total reconstructed rectangle count.
        count: usize,
        /// Up to [`MAX_BBOX_SAMPLES`] sample bounding boxes, device space.
        bbox_samples: Vec<DeviceRect>,
    },
    /// One or more redaction annotations.
    RedactAnnotation {
        /// Annotation count.
        count: usize,
    },
}

/// Lowercase-hex SHA-256 of a byte buffer.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Round a ratio to 4 decimal places for emission.
pub fn round_ratio(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Assemble the findings list for a page from its reconstructed rectangles
/// and redaction-annotation count.
pub fn findings_for_page(rects: &[DeviceRect], redact_annots: usize) -> Vec<Finding> {
    let mut findings = Vec::new();
    if !rects.is_empty() {
        findings.push(Finding::SuspectedOverlayRect {
            count: rects.len(),
            bbox_samples: rects.iter().take(MAX_BBOX_SAMPLES).copied().collect(),
        });
    }
    if redact_annots > 0 {
        findings.push(Finding::RedactAnnotation {
            count: redact_annots,
        });
    }
    findings
}
