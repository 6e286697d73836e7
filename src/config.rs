//! Configuration types for a PDF translation run.
//!
//! All behaviour is controlled through [`TranslationConfig`], built via its
//! [`TranslationConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across tasks and to validate the output-mode /
//! pipeline-mode contract once, up front, before any extraction or network
//! work starts.

use crate::error::TranslateError;
use crate::fonts::Platform;
use crate::models::DEFAULT_MODEL;
use crate::pipeline::client::TranslationBackend;
use crate::progress::ProgressObserver;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// How page content is extracted and sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TranslationMode {
    /// Extract text runs per page and translate the text.
    TextOnly,
    /// Rasterise each page and let the model read the image (default).
    #[default]
    Multimodal,
}

/// The kind of artifact the assembler writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputMode {
    /// UTF-8 text file with page-boundary markers (default).
    #[default]
    Text,
    /// Reconstructed PDF, one page per source page. Multimodal mode only.
    Pdf,
}

/// Retry behaviour for transient backend failures.
///
/// The policy is injected into the translation client rather than hard-coded
/// so tests can run with zero backoff against a scripted backend. Which
/// errors count as retryable is decided by
/// [`crate::pipeline::client::BackendError::is_transient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per page, including the first. Minimum 1.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each attempt.
    pub initial_backoff: Duration,
    /// Upper bound on a single backoff sleep.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries (single attempt).
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Backoff before retry number `retry` (1-indexed): `initial * 2^(retry-1)`,
    /// capped at `max_backoff`.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Configuration for a PDF translation run.
///
/// Built via [`TranslationConfig::builder()`].
///
/// # Example
/// ```rust
/// use pdftrans::{TranslationConfig, TranslationMode};
///
/// let config = TranslationConfig::builder()
///     .api_key("AIza...")
///     .target_language("French")
///     .mode(TranslationMode::TextOnly)
///     .concurrency(2)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct TranslationConfig {
    /// Resolved Gemini API key. The library never reads the environment;
    /// credential resolution (flag > env > .env) is the CLI's job.
    pub api_key: String,

    /// Target language name as it appears in the prompt. Default: "Korean".
    pub target_language: String,

    /// Logical model id, validated against the catalog at preflight.
    pub model: String,

    /// Extraction/translation mode. Default: multimodal.
    pub mode: TranslationMode,

    /// Output artifact kind. Default: text.
    pub output: OutputMode,

    /// Number of concurrent translation calls. Default: 4.
    ///
    /// Translation is network-bound; a handful of in-flight requests cuts
    /// wall-clock time substantially without tripping API rate limits.
    pub concurrency: usize,

    /// Longest edge of a rendered page in pixels. Default: 2000.
    ///
    /// Caps memory per page regardless of physical page size while keeping
    /// figures and small print legible to the model.
    pub max_render_pixels: u32,

    /// Per-call HTTP timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Retry policy for transient backend failures.
    pub retry: RetryPolicy,

    /// Font platform override; `None` auto-detects the running platform.
    pub font_platform: Option<Platform>,

    /// Pre-constructed translation backend. Takes precedence over the
    /// built-in Gemini backend; used by tests and embedders.
    pub backend: Option<Arc<dyn TranslationBackend>>,

    /// Per-page progress observer. `None` disables progress events.
    pub progress: Option<Arc<dyn ProgressObserver>>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            target_language: "Korean".to_string(),
            model: DEFAULT_MODEL.to_string(),
            mode: TranslationMode::default(),
            output: OutputMode::default(),
            concurrency: 4,
            max_render_pixels: 2000,
            api_timeout_secs: 60,
            retry: RetryPolicy::default(),
            font_platform: None,
            backend: None,
            progress: None,
        }
    }
}

impl fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("api_key", &"<redacted>")
            .field("target_language", &self.target_language)
            .field("model", &self.model)
            .field("mode", &self.mode)
            .field("output", &self.output)
            .field("concurrency", &self.concurrency)
            .field("max_render_pixels", &self.max_render_pixels)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("retry", &self.retry)
            .field("font_platform", &self.font_platform)
            .field("backend", &self.backend.as_ref().map(|_| "<dyn TranslationBackend>"))
            .finish()
    }
}

impl TranslationConfig {
    /// Create a new builder.
    pub fn builder() -> TranslationConfigBuilder {
        TranslationConfigBuilder {
            config: Self::default(),
        }
    }

    /// Check the output-mode / pipeline-mode contract.
    ///
    /// Called from the builder and again at pipeline preflight so configs
    /// constructed by hand get the same guarantee.
    pub fn validate(&self) -> Result<(), TranslateError> {
        if self.output == OutputMode::Pdf && self.mode == TranslationMode::TextOnly {
            return Err(TranslateError::UnsupportedOutputForMode);
        }
        if self.concurrency == 0 {
            return Err(TranslateError::InvalidConfig(
                "concurrency must be >= 1".into(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(TranslateError::InvalidConfig(
                "retry.max_attempts must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`TranslationConfig`].
#[derive(Debug)]
pub struct TranslationConfigBuilder {
    config: TranslationConfig,
}

impl TranslationConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn target_language(mut self, lang: impl Into<String>) -> Self {
        self.config.target_language = lang.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn mode(mut self, mode: TranslationMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn output(mut self, output: OutputMode) -> Self {
        self.config.output = output;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn max_render_pixels(mut self, px: u32) -> Self {
        self.config.max_render_pixels = px.max(100);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    pub fn font_platform(mut self, platform: Platform) -> Self {
        self.config.font_platform = Some(platform);
        self
    }

    pub fn backend(mut self, backend: Arc<dyn TranslationBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    pub fn progress(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.config.progress = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<TranslationConfig, TranslateError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
