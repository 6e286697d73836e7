//! Result types produced by a translation run.

use crate::error::PageError;
use serde::Serialize;

/// Translation result for a single page.
///
/// `error: None` means the page translated successfully; otherwise `text` is
/// empty and the assembler renders a visible placeholder in its place.
#[derive(Debug, Clone, Serialize)]
pub struct PageTranslation {
    /// 0-indexed page number, unique and contiguous within a run.
    pub page_index: usize,
    /// Translated text, opaque to the pipeline. Empty on failure.
    pub text: String,
    /// Retries spent before the terminal outcome.
    pub retries: u32,
    /// Wall-clock time for this page, including retries.
    pub duration_ms: u64,
    /// Terminal failure, if the page could not be translated.
    pub error: Option<PageError>,
}

impl PageTranslation {
    /// Whether this page reached a successful translation.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate statistics for a run.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationStats {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Pages that translated successfully.
    pub translated_pages: usize,
    /// Pages that failed after retries.
    pub failed_pages: usize,
    /// End-to-end wall-clock time.
    pub total_duration_ms: u64,
    /// Time spent in extraction (pdfium).
    pub extract_duration_ms: u64,
    /// Time spent in translation calls.
    pub translate_duration_ms: u64,
}

/// Full result of [`crate::translate::translate`].
#[derive(Debug, Clone, Serialize)]
pub struct TranslationOutput {
    /// Per-page results, sorted by `page_index`, one per source page.
    pub pages: Vec<PageTranslation>,
    /// Run statistics.
    pub stats: TranslationStats,
}
