//! # pdftrans
//!
//! Translate PDF documents with Google's Gemini models.
//!
//! Each page of the source document is turned into a translation unit, either
//! its extracted text or a rendered page image, sent to the model with
//! bounded concurrency and retry, and reassembled into a page-parallel
//! artifact: a marker-delimited text file or a reconstructed PDF.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use pdftrans::{translate_to_file, TranslationConfig};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pdftrans::TranslateError> {
//!     let config = TranslationConfig::builder()
//!         .api_key(std::env::var("GEMINI_API_KEY").unwrap_or_default())
//!         .target_language("Korean")
//!         .build()?;
//!
//!     let (path, result) = translate_to_file(Path::new("paper.pdf"), None, &config).await?;
//!     println!(
//!         "{}: {}/{} pages translated",
//!         path.display(),
//!         result.stats.translated_pages,
//!         result.stats.total_pages
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Failure model
//!
//! Problems that invalidate the whole run (unreadable file, unknown model,
//! missing credential) return a fatal [`TranslateError`] before any API call.
//! A single page failing to render or translate does not: it is recorded as a
//! [`PageError`] on that page's result and the artifact marks it in place, so
//! one bad page never costs the other pages' paid translations.
//!
//! ## Requirements
//!
//! A pdfium shared library must be available at runtime, either next to the
//! executable or installed system-wide.

pub mod config;
pub mod error;
pub mod fonts;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod translate;

pub use config::{OutputMode, RetryPolicy, TranslationConfig, TranslationMode};
pub use error::{PageError, TranslateError};
pub use fonts::{FontDescriptor, Platform};
pub use models::{ModelDescriptor, DEFAULT_MODEL};
pub use output::{PageTranslation, TranslationOutput, TranslationStats};
pub use pipeline::client::{BackendError, TranslationBackend, TranslationClient, TranslationRequest};
pub use pipeline::extract::{ExtractedUnit, PageUnit};
pub use progress::{NoopProgress, ProgressObserver};
pub use translate::{default_output_path, translate, translate_to_file, translate_units};
