//! Top-level orchestration: extract, translate concurrently, assemble.
//!
//! [`translate`] produces the in-memory result; [`translate_to_file`] also
//! writes the artifact, deriving the output path from the input when the
//! caller gives none. Fatal problems (bad file, unknown model, missing
//! credential) surface before any network call is made; page-level failures
//! are carried in the result and marked in the artifact instead of aborting
//! the run.

use crate::config::{OutputMode, TranslationConfig, TranslationMode};
use crate::error::{PageError, TranslateError};
use crate::fonts;
use crate::models;
use crate::output::{PageTranslation, TranslationOutput, TranslationStats};
use crate::pipeline::assemble;
use crate::pipeline::client::{GeminiBackend, TranslationBackend, TranslationClient, UnitError};
use crate::pipeline::extract::{self, ExtractedUnit};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Translate a PDF and return the per-page results without writing a file.
///
/// # Errors
/// Fatal [`TranslateError`]s only; single-page failures are reported in
/// [`TranslationOutput::pages`]. [`TranslateError::AllPagesFailed`] is
/// returned when the document has pages but none translated.
pub async fn translate(
    pdf_path: &Path,
    config: &TranslationConfig,
) -> Result<TranslationOutput, TranslateError> {
    config.validate()?;

    let model = models::resolve(&config.model)?;
    if config.mode == TranslationMode::Multimodal && !model.supports_multimodal {
        return Err(TranslateError::ModelCapabilityMismatch {
            model: model.logical_id.to_string(),
        });
    }

    let backend = resolve_backend(config)?;
    let client = TranslationClient::new(backend, config.retry);

    let run_start = Instant::now();
    let units = extract::extract(pdf_path, config).await?;
    let extract_duration = run_start.elapsed();
    let total_pages = units.len();

    if let Some(progress) = &config.progress {
        progress.on_start(total_pages);
    }

    info!(
        "Translating {} pages to {} with {} ({} concurrent)",
        total_pages, config.target_language, model.logical_id, config.concurrency
    );

    let translate_start = Instant::now();
    let pages = translate_units(units, &client, config, model).await;
    let translate_duration = translate_start.elapsed();

    let translated_pages = pages.iter().filter(|p| p.is_success()).count();
    let failed_pages = total_pages - translated_pages;

    if let Some(progress) = &config.progress {
        progress.on_finish(total_pages, translated_pages);
    }

    if total_pages > 0 && translated_pages == 0 {
        let first_error = pages
            .iter()
            .find_map(|p| p.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(TranslateError::AllPagesFailed {
            total: total_pages,
            first_error,
        });
    }

    if failed_pages > 0 {
        warn!(
            "{} of {} pages failed; failures are marked in the output",
            failed_pages, total_pages
        );
    }

    Ok(TranslationOutput {
        pages,
        stats: TranslationStats {
            total_pages,
            translated_pages,
            failed_pages,
            total_duration_ms: run_start.elapsed().as_millis() as u64,
            extract_duration_ms: extract_duration.as_millis() as u64,
            translate_duration_ms: translate_duration.as_millis() as u64,
        },
    })
}

/// Translate a PDF and write the artifact.
///
/// When `output_path` is `None`, the artifact lands next to the input as
/// `{stem}_translated.txt` or `{stem}_translated.pdf` per the output mode.
/// Returns the path actually written along with the run result.
pub async fn translate_to_file(
    pdf_path: &Path,
    output_path: Option<&Path>,
    config: &TranslationConfig,
) -> Result<(PathBuf, TranslationOutput), TranslateError> {
    let result = translate(pdf_path, config).await?;

    let path = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(pdf_path, config.output));

    match config.output {
        OutputMode::Text => assemble::write_text(&result.pages, &path)?,
        OutputMode::Pdf => {
            let font = fonts::register(config.font_platform);
            assemble::write_pdf(result.pages.clone(), path.clone(), font).await?;
        }
    }

    Ok((path, result))
}

/// Derive the default output path: `{stem}_translated.{txt|pdf}` next to the
/// input.
pub fn default_output_path(pdf_path: &Path, output: OutputMode) -> PathBuf {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let ext = match output {
        OutputMode::Text => "txt",
        OutputMode::Pdf => "pdf",
    };
    pdf_path.with_file_name(format!("{stem}_translated.{ext}"))
}

/// Fan the extracted units out through the client with bounded concurrency
/// and collect one terminal result per page, sorted by page index.
///
/// Public as the pure concurrent stage of the pipeline: it touches no file
/// and no pdfium state, so failure isolation and ordering are testable with
/// a scripted backend alone.
pub async fn translate_units(
    units: Vec<ExtractedUnit>,
    client: &TranslationClient,
    config: &TranslationConfig,
    model: &'static models::ModelDescriptor,
) -> Vec<PageTranslation> {
    let total_pages = units.len();
    let mut pages: Vec<PageTranslation> = stream::iter(units)
        .map(|slot| async move {
            let page = translate_slot(slot, client, config, model).await;
            if let Some(progress) = &config.progress {
                progress.on_page_done(page.page_index + 1, total_pages, page.is_success());
            }
            page
        })
        .buffer_unordered(config.concurrency)
        .collect()
        .await;

    // buffer_unordered yields in completion order; restore page order.
    pages.sort_by_key(|p| p.page_index);
    pages
}

fn resolve_backend(
    config: &TranslationConfig,
) -> Result<Arc<dyn TranslationBackend>, TranslateError> {
    if let Some(backend) = &config.backend {
        return Ok(backend.clone());
    }
    if config.api_key.trim().is_empty() {
        return Err(TranslateError::MissingCredential);
    }
    let backend = GeminiBackend::new(
        config.api_key.clone(),
        Duration::from_secs(config.api_timeout_secs),
    )
    .map_err(|e| TranslateError::Internal(format!("HTTP client construction failed: {e}")))?;
    Ok(Arc::new(backend))
}

/// Drive one extracted slot to a terminal per-page result.
///
/// Extraction failures short-circuit without a backend call; translation
/// failures come back from the client already classified and retried.
async fn translate_slot(
    slot: ExtractedUnit,
    client: &TranslationClient,
    config: &TranslationConfig,
    model: &'static models::ModelDescriptor,
) -> PageTranslation {
    let start = Instant::now();
    match slot {
        Err(error) => {
            let page_index = match &error {
                PageError::Render { page, .. } | PageError::Translation { page, .. } => page - 1,
            };
            PageTranslation {
                page_index,
                text: String::new(),
                retries: 0,
                duration_ms: start.elapsed().as_millis() as u64,
                error: Some(error),
            }
        }
        Ok(unit) => {
            let page_index = unit.page_index();
            match client
                .translate_unit(&unit, &config.target_language, model)
                .await
            {
                Ok(translated) => PageTranslation {
                    page_index,
                    text: translated.text,
                    retries: translated.retries,
                    duration_ms: start.elapsed().as_millis() as u64,
                    error: None,
                },
                Err(err) => {
                    let (retries, detail) = match err {
                        UnitError::CapabilityMismatch { .. } => (0, err.to_string()),
                        UnitError::Failed { retries, ref source } => (retries, source.to_string()),
                    };
                    PageTranslation {
                        page_index,
                        text: String::new(),
                        retries,
                        duration_ms: start.elapsed().as_millis() as u64,
                        error: Some(PageError::Translation {
                            page: page_index + 1,
                            retries,
                            detail,
                        }),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_text_output_path() {
        let path = default_output_path(Path::new("/docs/paper.pdf"), OutputMode::Text);
        assert_eq!(path, PathBuf::from("/docs/paper_translated.txt"));
    }

    #[test]
    fn default_pdf_output_path() {
        let path = default_output_path(Path::new("report.pdf"), OutputMode::Pdf);
        assert_eq!(path, PathBuf::from("report_translated.pdf"));
    }

    #[tokio::test]
    async fn missing_credential_is_fatal() {
        let config = TranslationConfig::default();
        let err = translate(Path::new("/tmp/whatever.pdf"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::MissingCredential));
    }

    #[tokio::test]
    async fn unknown_model_is_fatal() {
        let config = TranslationConfig::builder()
            .api_key("k")
            .model("gemini-9000")
            .build()
            .unwrap();
        let err = translate(Path::new("/tmp/whatever.pdf"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::UnknownModel { .. }));
    }

    #[tokio::test]
    async fn multimodal_mode_rejects_text_only_model() {
        let config = TranslationConfig::builder()
            .api_key("k")
            .model("gemma-3-4b-it")
            .mode(TranslationMode::Multimodal)
            .build()
            .unwrap();
        let err = translate(Path::new("/tmp/whatever.pdf"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::ModelCapabilityMismatch { .. }));
    }
}
