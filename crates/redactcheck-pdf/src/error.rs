//! Error types for the PDF access layer.
//!
//! Uses [`thiserror`] for ergonomic derivation. [`BackendError`] wraps
//! lopdf and I/O failures and converts losslessly into the public
//! [`CheckError`] contract.

use redactcheck_core::CheckError;
use thiserror::Error;

/// Error type for PDF backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading or decoding a stream.
    #[error("stream error: {0}")]
    Stream(String),

    /// Error emitting the rewritten document.
    #[error("serialize error: {0}")]
    Serialize(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BackendError> for CheckError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => CheckError::ParseFailed(msg),
            BackendError::Stream(msg) => CheckError::ParseFailed(msg),
            BackendError::Serialize(msg) => CheckError::SerializeFailed(msg),
            BackendError::Io(e) => CheckError::ParseFailed(e.to_string()),
        }
    }
}
