//! Error types for the lecture2notes library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`NotesError`] is **fatal**: the run cannot proceed at all (input file
//!   missing, unsupported extension, download failed, DOCX could not be
//!   written). Returned as `Err(NotesError)` from the top-level
//!   `generate_notes*` functions.
//!
//! * [`GenerationError`] is **non-fatal**: one output section could not be
//!   generated (backend error, missing API key). Stored inside
//!   [`crate::output::SectionOutcome::Failed`] so the remaining sections are
//!   still produced and the error text still reaches the exported document.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the lecture2notes library.
///
/// Section-level failures use [`GenerationError`] and never surface here.
#[derive(Debug, Error)]
pub enum NotesError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Lecture file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file extension is not one of the accepted lecture formats.
    #[error("Unsupported lecture file '{name}': expected a .txt, .pdf or .mp3 file")]
    UnsupportedFormat { name: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The DOCX container could not be assembled.
    #[error("Failed to build DOCX document: {0}")]
    ExportFailed(String),

    /// Could not create or write the output document.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<zip::result::ZipError> for NotesError {
    fn from(e: zip::result::ZipError) -> Self {
        NotesError::ExportFailed(e.to_string())
    }
}

/// A non-fatal error for a single output section.
///
/// The `Display` text is what ends up in the aggregated notes in place of
/// the generated section.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum GenerationError {
    /// No backend could be constructed at start-up (usually a missing API key).
    /// Every call on such a client returns this same error.
    #[error("Error: LLM provider '{provider}' is not configured. {hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The backend call itself failed (network, HTTP status, malformed body).
    #[error("Error calling LLM API: {detail}")]
    ApiError { detail: String },
}
