//! Error types for the pdftrans library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`TranslateError`], **fatal**: the run cannot proceed at all (bad input
//!   file, unknown model, missing credential, output mode incompatible with
//!   the pipeline mode). Returned as `Err(TranslateError)` from the top-level
//!   `translate*` functions.
//!
//! * [`PageError`], **non-fatal**: a single page failed (render glitch,
//!   translation call exhausted its retries) but all other pages are fine.
//!   Stored inside [`crate::output::PageTranslation`] so the assembled
//!   artifact keeps page-count parity with the source, marking the failed
//!   page in place instead of dropping it.
//!
//! The separation lets callers decide their own tolerance: abort on the first
//! page failure, or ship a complete artifact with failures marked in place.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdftrans library.
///
/// Page-level failures use [`PageError`] and are stored in
/// [`crate::output::PageTranslation`] rather than propagated here.
#[derive(Debug, Error)]
pub enum TranslateError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The file could not be parsed as a PDF (corrupt structure, or
    /// encrypted without credentials).
    #[error("Cannot read PDF '{path}': {detail}")]
    DocumentUnreadable { path: PathBuf, detail: String },

    // ── Pre-translation validation ────────────────────────────────────────
    /// The requested model is not in the catalog.
    #[error("Unknown model '{id}'\nUse --list-models to see available models.")]
    UnknownModel { id: String },

    /// The pipeline mode needs a capability the selected model lacks.
    #[error(
        "Model '{model}' does not accept image input; multimodal mode needs a \
         multimodal-capable model.\nUse --list-models, or pass --text-only."
    )]
    ModelCapabilityMismatch { model: String },

    /// PDF output requested while the pipeline runs in text-only mode.
    #[error(
        "PDF output is only available in multimodal mode.\n\
         Drop --text-only, or write a text artifact instead."
    )]
    UnsupportedOutputForMode,

    /// No API key was supplied via flag, environment, or .env file.
    #[error(
        "No Gemini API key configured.\n\
         Pass --api-key, set GEMINI_API_KEY, or add it to a .env file."
    )]
    MissingCredential,

    // ── Run-level failures ────────────────────────────────────────────────
    /// Every page failed after all retries; output would carry no translation.
    #[error("All {total} pages failed translation.\nFirst error: {first_error}")]
    AllPagesFailed { total: usize, first_error: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output artifact.
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

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
         Install libpdfium, or place the shared library next to the executable."
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
///
/// Stored alongside [`crate::output::PageTranslation`] when a page fails.
/// The overall run continues unless ALL pages fail.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// Page rasterisation or text extraction failed.
    #[error("Page {page}: extraction failed: {detail}")]
    Render { page: usize, detail: String },

    /// Translation call failed after retries.
    #[error("Page {page}: translation failed after {retries} retries: {detail}")]
    Translation {
        page: usize,
        retries: u32,
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_model_mentions_list_flag() {
        let e = TranslateError::UnknownModel {
            id: "gemini-9000".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("gemini-9000"), "got: {msg}");
        assert!(msg.contains("--list-models"), "got: {msg}");
    }

    #[test]
    fn capability_mismatch_names_model() {
        let e = TranslateError::ModelCapabilityMismatch {
            model: "gemma-3-4b-it".into(),
        };
        assert!(e.to_string().contains("gemma-3-4b-it"));
    }

    #[test]
    fn unsupported_output_mentions_multimodal() {
        let e = TranslateError::UnsupportedOutputForMode;
        assert!(e.to_string().contains("multimodal"));
    }

    #[test]
    fn all_pages_failed_display() {
        let e = TranslateError::AllPagesFailed {
            total: 7,
            first_error: "HTTP 500".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains('7'), "got: {msg}");
        assert!(msg.contains("HTTP 500"), "got: {msg}");
    }

    #[test]
    fn page_error_translation_display() {
        let e = PageError::Translation {
            page: 3,
            retries: 2,
            detail: "rate limited".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Page 3"));
        assert!(msg.contains("2 retries"));
        assert!(msg.contains("rate limited"));
    }
}
