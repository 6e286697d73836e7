//! Assembly: turn per-page translations into the output artifact.
//!
//! Both writers share the same contract: one output section (or page) per
//! source page, in page order, with failed pages marked in place by a visible
//! placeholder. The artifact always has the same page count as the source
//! document, so a reader can line the two up side by side.
//!
//! Text output is the default: a UTF-8 file with `=== Page N ===` boundary
//! markers. PDF output reconstructs a document with one A4 page of translated
//! text per source page, using a platform CJK font so non-Latin scripts
//! render, falling back to a built-in font when none is installed.

use crate::error::TranslateError;
use crate::fonts::FontDescriptor;
use crate::output::PageTranslation;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// A4 portrait in points, with the layout constants the text writer uses.
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const FONT_SIZE: f32 = 11.0;
const LEADING: f32 = 16.0;

/// Maximum line width in half-width character units (CJK characters count
/// double). Sized for A4 at the font size above.
const LINE_UNITS: usize = 90;

/// Marker line written before each page's content in text output.
fn page_marker(page_index: usize) -> String {
    format!("=== Page {} ===", page_index + 1)
}

/// Placeholder rendered in place of a failed page's translation.
fn failure_placeholder(page: &PageTranslation) -> String {
    let reason = page
        .error
        .as_ref()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "unknown error".to_string());
    format!("[translation failed: {reason}]")
}

/// Check the per-page results are one-per-page, 0-indexed, and in order.
///
/// The orchestrator sorts results before assembly; a gap or duplicate here
/// means a pipeline bug, not bad input.
fn ensure_contiguous(pages: &[PageTranslation]) -> Result<(), TranslateError> {
    for (expected, page) in pages.iter().enumerate() {
        if page.page_index != expected {
            return Err(TranslateError::Internal(format!(
                "page results not contiguous: expected index {}, found {}",
                expected, page.page_index
            )));
        }
    }
    Ok(())
}

/// Render the page results as marker-delimited text.
pub fn assemble_text(pages: &[PageTranslation]) -> Result<String, TranslateError> {
    ensure_contiguous(pages)?;

    let mut out = String::new();
    for page in pages {
        out.push_str(&page_marker(page.page_index));
        out.push('\n');
        if page.is_success() {
            out.push_str(page.text.trim_end());
        } else {
            out.push_str(&failure_placeholder(page));
        }
        out.push_str("\n\n");
    }
    Ok(out)
}

/// Write the text artifact.
///
/// Writes to a sibling temp file and renames into place, so a crash or full
/// disk never leaves a truncated artifact at the target path.
pub fn write_text(pages: &[PageTranslation], path: &Path) -> Result<(), TranslateError> {
    let content = assemble_text(pages)?;

    let tmp = temp_sibling(path);
    let write = || -> std::io::Result<()> {
        std::fs::write(&tmp, &content)?;
        std::fs::rename(&tmp, path)
    };
    write().map_err(|source| {
        let _ = std::fs::remove_file(&tmp);
        TranslateError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        }
    })?;

    info!("Wrote text artifact: {} ({} pages)", path.display(), pages.len());
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "output".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write the reconstructed PDF artifact.
///
/// One A4 page of translated text per source page. Pdfium is CPU-bound and
/// not async-safe, so the whole job runs under `spawn_blocking`.
pub async fn write_pdf(
    pages: Vec<PageTranslation>,
    path: PathBuf,
    font: FontDescriptor,
) -> Result<(), TranslateError> {
    ensure_contiguous(&pages)?;

    tokio::task::spawn_blocking(move || write_pdf_blocking(&pages, &path, &font))
        .await
        .map_err(|e| TranslateError::Internal(format!("PDF writer task panicked: {e}")))?
}

fn write_pdf_blocking(
    pages: &[PageTranslation],
    path: &Path,
    font: &FontDescriptor,
) -> Result<(), TranslateError> {
    let pdfium = crate::pipeline::extract::bind_pdfium()?;
    let mut document = pdfium
        .create_new_pdf()
        .map_err(|e| pdf_write_error(path, e))?;

    // Load the CJK font once; pdfium embeds it into the document. An
    // unregistered descriptor or a load failure degrades to Helvetica, which
    // drops non-Latin glyphs but still produces a readable artifact.
    let font_token = if font.registered {
        match document.fonts_mut().load_true_type_from_file(&font.path, true) {
            Ok(token) => token,
            Err(e) => {
                warn!(
                    "Could not load font '{}' from {}: {:?}; falling back to Helvetica",
                    font.family,
                    font.path.display(),
                    e
                );
                document.fonts_mut().helvetica()
            }
        }
    } else {
        document.fonts_mut().helvetica()
    };

    let max_lines = ((PAGE_HEIGHT - 2.0 * MARGIN) / LEADING) as usize;

    for page in pages {
        let mut pdf_page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::a4())
            .map_err(|e| pdf_write_error(path, e))?;

        let body = if page.is_success() {
            page.text.clone()
        } else {
            failure_placeholder(page)
        };

        let mut lines = vec![page_marker(page.page_index), String::new()];
        lines.extend(wrap_text(&body, LINE_UNITS));

        if lines.len() > max_lines {
            warn!(
                "Page {}: translated text overflows one page ({} lines), clipping to {}",
                page.page_index + 1,
                lines.len(),
                max_lines
            );
            lines.truncate(max_lines);
        }

        for (row, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let y = PAGE_HEIGHT - MARGIN - LEADING * (row as f32 + 1.0);
            pdf_page
                .objects_mut()
                .create_text_object(
                    PdfPoints::new(MARGIN),
                    PdfPoints::new(y),
                    line,
                    font_token,
                    PdfPoints::new(FONT_SIZE),
                )
                .map_err(|e| pdf_write_error(path, e))?;
        }
        debug!("Laid out page {} ({} lines)", page.page_index + 1, lines.len());
    }

    document
        .save_to_file(path)
        .map_err(|e| pdf_write_error(path, e))?;

    info!("Wrote PDF artifact: {} ({} pages)", path.display(), pages.len());
    Ok(())
}

fn pdf_write_error(path: &Path, e: PdfiumError) -> TranslateError {
    TranslateError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: std::io::Error::other(format!("{e:?}")),
    }
}

/// Display width of a character in half-width units.
///
/// CJK ideographs, Hangul, kana, and full-width forms occupy two columns in
/// the layout grid; everything else counts one.
fn char_units(c: char) -> usize {
    match c as u32 {
        0x1100..=0x11FF   // Hangul Jamo
        | 0x3000..=0x9FFF // CJK punctuation, kana, ideographs
        | 0xAC00..=0xD7AF // Hangul syllables
        | 0xF900..=0xFAFF // CJK compatibility ideographs
        | 0xFF00..=0xFFEF // full-width forms
        => 2,
        _ => 1,
    }
}

/// Wrap text into lines no wider than `max_units` half-width columns.
///
/// Breaks at character granularity. Word-boundary wrapping is deliberately
/// not attempted: the dominant target scripts are CJK, where character
/// breaks are correct and space-delimited words often don't exist.
fn wrap_text(text: &str, max_units: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for source_line in text.lines() {
        if source_line.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        let mut units = 0usize;
        for c in source_line.chars() {
            let w = char_units(c);
            if units + w > max_units && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                units = 0;
            }
            current.push(c);
            units += w;
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PageError;

    fn ok_page(page_index: usize, text: &str) -> PageTranslation {
        PageTranslation {
            page_index,
            text: text.to_string(),
            retries: 0,
            duration_ms: 10,
            error: None,
        }
    }

    fn failed_page(page_index: usize) -> PageTranslation {
        PageTranslation {
            page_index,
            text: String::new(),
            retries: 3,
            duration_ms: 10,
            error: Some(PageError::Translation {
                page: page_index + 1,
                retries: 3,
                detail: "HTTP 503".into(),
            }),
        }
    }

    #[test]
    fn text_output_has_one_marker_per_page() {
        let pages = vec![ok_page(0, "첫 페이지"), ok_page(1, "둘째 페이지")];
        let out = assemble_text(&pages).unwrap();
        assert!(out.contains("=== Page 1 ==="));
        assert!(out.contains("=== Page 2 ==="));
        assert!(out.contains("첫 페이지"));
        assert!(out.contains("둘째 페이지"));
        // Page 1's marker comes before page 2's.
        assert!(out.find("=== Page 1 ===").unwrap() < out.find("=== Page 2 ===").unwrap());
    }

    #[test]
    fn failed_page_gets_placeholder_in_place() {
        let pages = vec![ok_page(0, "ok"), failed_page(1), ok_page(2, "ok too")];
        let out = assemble_text(&pages).unwrap();
        assert!(out.contains("=== Page 2 ===\n[translation failed:"));
        assert!(out.contains("HTTP 503"));
        // Parity: all three markers present.
        assert!(out.contains("=== Page 3 ==="));
    }

    #[test]
    fn non_contiguous_pages_are_a_pipeline_bug() {
        let pages = vec![ok_page(0, "a"), ok_page(2, "c")];
        let err = assemble_text(&pages).unwrap_err();
        assert!(matches!(err, TranslateError::Internal(_)));
    }

    #[test]
    fn write_text_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out_translated.txt");
        write_text(&[ok_page(0, "안녕하세요")], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("안녕하세요"));
        // No temp file left behind.
        assert!(!dir.path().join("out_translated.txt.tmp").exists());
    }

    #[test]
    fn write_text_fails_on_unwritable_path() {
        let err = write_text(
            &[ok_page(0, "x")],
            Path::new("/nonexistent-dir/out.txt"),
        )
        .unwrap_err();
        assert!(matches!(err, TranslateError::OutputWriteFailed { .. }));
    }

    #[test]
    fn ascii_wraps_at_limit() {
        let text = "a".repeat(25);
        let lines = wrap_text(&text, 10);
        assert_eq!(lines, vec!["a".repeat(10), "a".repeat(10), "a".repeat(5)]);
    }

    #[test]
    fn hangul_counts_double_width() {
        // Each syllable is 2 units, so 10 units fit 5 syllables.
        let text = "가".repeat(8);
        let lines = wrap_text(&text, 10);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].chars().count(), 5);
        assert_eq!(lines[1].chars().count(), 3);
    }

    #[test]
    fn blank_lines_are_preserved() {
        let lines = wrap_text("first\n\nsecond", 80);
        assert_eq!(lines, vec!["first", "", "second"]);
    }

    #[test]
    fn char_widths() {
        assert_eq!(char_units('a'), 1);
        assert_eq!(char_units('한'), 2);
        assert_eq!(char_units('漢'), 2);
        assert_eq!(char_units('ア'), 2);
        assert_eq!(char_units('！'), 2); // full-width exclamation
    }
}
