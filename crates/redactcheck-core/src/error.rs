//! Error types for redactcheck.
//!
//! Provides [`CheckError`], the single fatal error type shared by the
//! analyzer and the cleaner. Partial results are never surfaced alongside an
//! error: an operation either completes or fails with one of these kinds.

use std::fmt;

/// Fatal error for analyze and clean operations.
///
/// Local recovery (unknown operators, undecodable streams, unparseable
/// annotations) is handled inside the pipeline by skipping the offending
/// element; only the conditions below abort an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// The input byte buffer was empty.
    EmptyInput,
    /// The input does not begin with the `%PDF-` magic prefix.
    MalformedPdf,
    /// The underlying PDF parser refused the file.
    ParseFailed(String),
    /// The reserializer refused to emit the cleaned document.
    SerializeFailed(String),
    /// The operation was cancelled at a page boundary.
    Cancelled,
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::EmptyInput => write!(f, "input is empty"),
            CheckError::MalformedPdf => write!(f, "input is not a PDF (missing %PDF- header)"),
            CheckError::ParseFailed(msg) => write!(f, "PDF parse failed: {msg}"),
            CheckError::SerializeFailed(msg) => write!(f, "PDF serialization failed: {msg}"),
            CheckError::Cancelled => write!(f, "operation cancelled"),
        }
    }
}

impl std::error::Error for CheckError {}
