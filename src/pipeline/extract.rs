//! Extraction: turn a PDF into an ordered sequence of per-page units.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto a dedicated thread pool
//! thread so the async workers never stall on CPU-heavy rendering.
//!
//! ## Page-index contiguity
//!
//! Every source page produces exactly one unit, in page order, including
//! pages with no extractable text (empty-text unit) and pages whose render
//! failed (an `Err` slot carrying the page error). Downstream consumers rely
//! on `units.len() == page_count` to keep the output artifact page-parallel
//! with the source document.

use crate::config::{TranslationConfig, TranslationMode};
use crate::error::{PageError, TranslateError};
use crate::pipeline::encode;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One page's extracted content, ready for translation.
#[derive(Debug, Clone)]
pub enum PageUnit {
    /// Extracted text runs in visual reading order. May be empty.
    Text { page_index: usize, text: String },
    /// Rasterised page as PNG bytes, with cheaply-extracted text attached
    /// as a hint when available.
    Image {
        page_index: usize,
        png: Vec<u8>,
        text_hint: Option<String>,
    },
}

impl PageUnit {
    /// 0-indexed page number of this unit.
    pub fn page_index(&self) -> usize {
        match self {
            PageUnit::Text { page_index, .. } => *page_index,
            PageUnit::Image { page_index, .. } => *page_index,
        }
    }
}

/// One slot per source page: either a unit, or the page-level error that
/// prevented producing one. Keeps page-count parity through the pipeline.
pub type ExtractedUnit = Result<PageUnit, PageError>;

/// Bind to a pdfium shared library, preferring a copy next to the executable.
pub(crate) fn bind_pdfium() -> Result<Pdfium, TranslateError> {
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| TranslateError::PdfiumBindingFailed(format!("{e:?}")))
}

/// Validate the path points at a readable PDF before handing it to pdfium.
///
/// The magic-byte check turns "pdfium refused an arbitrary file" into a
/// precise error for the two common mistakes: wrong path and wrong file type.
fn validate_pdf_file(path: &Path) -> Result<(), TranslateError> {
    use std::io::Read;

    let mut file = std::fs::File::open(path).map_err(|_| TranslateError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
        return Err(TranslateError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}

/// Extract one unit per page from the document, in page order.
///
/// # Errors
/// [`TranslateError::DocumentUnreadable`] when the file cannot be parsed as
/// a PDF (corrupt structure, encrypted). Fatal, no partial output.
pub async fn extract(
    pdf_path: &Path,
    config: &TranslationConfig,
) -> Result<Vec<ExtractedUnit>, TranslateError> {
    validate_pdf_file(pdf_path)?;

    let path = pdf_path.to_path_buf();
    let mode = config.mode;
    let max_pixels = config.max_render_pixels;

    tokio::task::spawn_blocking(move || extract_blocking(&path, mode, max_pixels))
        .await
        .map_err(|e| TranslateError::Internal(format!("extraction task panicked: {e}")))?
}

fn extract_blocking(
    path: &PathBuf,
    mode: TranslationMode,
    max_pixels: u32,
) -> Result<Vec<ExtractedUnit>, TranslateError> {
    let pdfium = bind_pdfium()?;

    let document =
        pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| TranslateError::DocumentUnreadable {
                path: path.clone(),
                detail: format!("{e:?}"),
            })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let mut units = Vec::with_capacity(total_pages);

    for (page_index, page) in pages.iter().enumerate() {
        let unit = match mode {
            TranslationMode::TextOnly => Ok(PageUnit::Text {
                page_index,
                text: page_text(&page, page_index),
            }),
            TranslationMode::Multimodal => rasterise_page(&page, page_index, &render_config),
        };
        units.push(unit);
    }

    Ok(units)
}

/// Pull the page's text in visual order; an unreadable text layer is treated
/// as an empty page, not an error.
fn page_text(page: &PdfPage, page_index: usize) -> String {
    match page.text() {
        Ok(text) => text.all(),
        Err(e) => {
            warn!("Page {}: no readable text layer ({:?})", page_index + 1, e);
            String::new()
        }
    }
}

/// Render one page to a PNG unit. Text-hint extraction failure is tolerated;
/// a render failure marks this page failed without touching the others.
fn rasterise_page(
    page: &PdfPage,
    page_index: usize,
    render_config: &PdfRenderConfig,
) -> ExtractedUnit {
    let bitmap = page
        .render_with_config(render_config)
        .map_err(|e| PageError::Render {
            page: page_index + 1,
            detail: format!("{e:?}"),
        })?;

    let image = bitmap.as_image();
    debug!(
        "Rendered page {} → {}x{} px",
        page_index + 1,
        image.width(),
        image.height()
    );

    let png = encode::encode_png(&image).map_err(|e| PageError::Render {
        page: page_index + 1,
        detail: format!("PNG encoding failed: {e}"),
    })?;

    let hint = page.text().map(|t| t.all()).ok().filter(|t| !t.trim().is_empty());

    Ok(PageUnit::Image {
        page_index,
        png,
        text_hint: hint,
    })
}
