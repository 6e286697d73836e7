//! End-to-end integration tests for pdftrans.
//!
//! These tests use real PDF files in `./test_cases/` and make live Gemini API
//! calls. They are gated behind the `E2E_ENABLED` environment variable so
//! they do not run in CI unless explicitly requested, and they additionally
//! need `GEMINI_API_KEY` set and a pdfium shared library available.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture

use pdftrans::{
    translate, translate_to_file, OutputMode, TranslationConfig, TranslationMode,
};
use std::path::PathBuf;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

fn output_dir() -> PathBuf {
    let d = test_cases_dir().join("output");
    std::fs::create_dir_all(&d).ok();
    d
}

fn api_key() -> String {
    std::env::var("GEMINI_API_KEY").unwrap_or_default()
}

/// Skip this test unless E2E_ENABLED is set, an API key is configured, and
/// the PDF at `path` exists.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        if api_key().is_empty() {
            println!("SKIP — set GEMINI_API_KEY to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            return;
        }
        p
    }};
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn multimodal_translation_produces_every_page() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));

    let config = TranslationConfig::builder()
        .api_key(api_key())
        .target_language("Korean")
        .concurrency(2)
        .build()
        .unwrap();

    let result = translate(&path, &config).await.expect("translation failed");

    assert!(result.stats.total_pages > 0);
    assert_eq!(result.pages.len(), result.stats.total_pages);
    // Indices are contiguous from 0.
    for (i, page) in result.pages.iter().enumerate() {
        assert_eq!(page.page_index, i);
    }
    // At least one page carries Hangul.
    assert!(
        result
            .pages
            .iter()
            .filter(|p| p.is_success())
            .any(|p| p.text.chars().any(|c| ('\u{AC00}'..='\u{D7AF}').contains(&c))),
        "expected Korean output on at least one page"
    );

    println!(
        "Translated {}/{} pages in {}ms",
        result.stats.translated_pages, result.stats.total_pages, result.stats.total_duration_ms
    );
}

#[tokio::test]
async fn text_only_translation_writes_marked_artifact() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));

    let config = TranslationConfig::builder()
        .api_key(api_key())
        .mode(TranslationMode::TextOnly)
        .build()
        .unwrap();

    let out = output_dir().join("sample_text_only.txt");
    let (written, result) = translate_to_file(&path, Some(&out), &config)
        .await
        .expect("translation failed");

    assert_eq!(written, out);
    let content = std::fs::read_to_string(&out).expect("artifact readable");
    for i in 1..=result.stats.total_pages {
        assert!(
            content.contains(&format!("=== Page {i} ===")),
            "missing marker for page {i}"
        );
    }
}

#[tokio::test]
async fn pdf_output_reconstructs_a_readable_document() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));

    let config = TranslationConfig::builder()
        .api_key(api_key())
        .output(OutputMode::Pdf)
        .build()
        .unwrap();

    let out = output_dir().join("sample_translated.pdf");
    translate_to_file(&path, Some(&out), &config)
        .await
        .expect("translation failed");

    let bytes = std::fs::read(&out).expect("artifact readable");
    assert_eq!(&bytes[..4], b"%PDF", "output is not a PDF");
}

#[tokio::test]
async fn default_output_path_lands_next_to_the_input() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));

    // Copy to a temp dir so the derived artifact doesn't pollute test_cases/.
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.pdf");
    std::fs::copy(&path, &input).unwrap();

    let config = TranslationConfig::builder()
        .api_key(api_key())
        .mode(TranslationMode::TextOnly)
        .build()
        .unwrap();

    let (written, _) = translate_to_file(&input, None, &config)
        .await
        .expect("translation failed");

    assert_eq!(written, dir.path().join("doc_translated.txt"));
    assert!(written.exists());
}
