//! Translation client: build Gemini requests and drive them to a terminal
//! result under a retry policy.
//!
//! The transport is hidden behind the [`TranslationBackend`] trait so tests
//! can script failure sequences without a network, and so the retry loop in
//! [`TranslationClient`] stays independent of any one provider's API shape.
//!
//! ## Retry strategy
//!
//! HTTP 429 / 5xx / timeout errors are transient and frequent under
//! concurrent load; they are retried with exponential backoff per the
//! injected [`RetryPolicy`]. Authentication failures, malformed requests,
//! and safety blocks are permanent and propagate immediately; retrying them
//! only burns quota.

use crate::config::RetryPolicy;
use crate::models::ModelDescriptor;
use crate::pipeline::encode;
use crate::pipeline::extract::PageUnit;
use crate::prompts;
use serde_json::{json, Value};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Default endpoint of the Gemini `generateContent` API.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A single translation call: one unit, one target language, one model.
///
/// Constructed per call, never persisted.
pub struct TranslationRequest<'a> {
    pub unit: &'a PageUnit,
    pub target_language: &'a str,
    pub model: &'static ModelDescriptor,
}

/// Classified failure from a translation backend.
///
/// [`BackendError::is_transient`] is the retryable-error predicate the retry
/// loop consults; everything else about retrying lives in [`RetryPolicy`].
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// HTTP 429; the server may name a delay to wait.
    #[error("rate limited (429)")]
    RateLimited { retry_after_secs: Option<u64> },

    /// 5xx-class server error.
    #[error("server error: HTTP {status}")]
    Server { status: u16 },

    /// The call exceeded its timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// Credential rejected (401/403).
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// The API rejected the request itself (400).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The safety layer blocked the content.
    #[error("content blocked by safety policy: {0}")]
    Blocked(String),

    /// A successful response that carried no text.
    #[error("response carried no text")]
    EmptyResponse,
}

impl BackendError {
    /// Whether a retry has a realistic chance of succeeding.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BackendError::RateLimited { .. }
                | BackendError::Server { .. }
                | BackendError::Timeout
                | BackendError::Network(_)
        )
    }
}

/// A transport that can execute one translation call.
///
/// Object-safe so configs can carry `Arc<dyn TranslationBackend>`; the
/// manually boxed future keeps the trait free of macro dependencies.
pub trait TranslationBackend: Send + Sync {
    fn translate<'a>(
        &'a self,
        request: &'a TranslationRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<String, BackendError>> + Send + 'a>>;
}

// ── Gemini backend ───────────────────────────────────────────────────────

/// Production backend: Google Gemini `generateContent` over HTTPS.
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiBackend {
    /// Create a backend with a per-call timeout.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Point the backend at a different endpoint (local proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the `generateContent` request body for a unit.
    fn request_body(request: &TranslationRequest<'_>) -> Value {
        let parts = match request.unit {
            PageUnit::Text { text, .. } => {
                let instruction = prompts::text_instruction(request.target_language);
                vec![json!({ "text": format!("{instruction}{text}") })]
            }
            PageUnit::Image { png, text_hint, .. } => {
                let instruction =
                    prompts::image_instruction(request.target_language, text_hint.as_deref());
                vec![
                    json!({ "text": instruction }),
                    json!({
                        "inline_data": {
                            "mime_type": "image/png",
                            "data": encode::to_base64(png),
                        }
                    }),
                ]
            }
        };
        json!({ "contents": [{ "parts": parts }] })
    }

    /// Pull the translated text out of a successful response body.
    fn response_text(body: &Value) -> Result<String, BackendError> {
        if let Some(reason) = body["promptFeedback"]["blockReason"].as_str() {
            return Err(BackendError::Blocked(reason.to_string()));
        }

        let text = body["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(text)
    }
}

impl TranslationBackend for GeminiBackend {
    fn translate<'a>(
        &'a self,
        request: &'a TranslationRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<String, BackendError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{}/{}:generateContent", self.base_url, request.model.api_name);
            let body = Self::request_body(request);

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        BackendError::Timeout
                    } else {
                        BackendError::Network(e.to_string())
                    }
                })?;

            let status = response.status();
            match status.as_u16() {
                200..=299 => {}
                429 => {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse().ok());
                    return Err(BackendError::RateLimited { retry_after_secs });
                }
                401 | 403 => {
                    return Err(BackendError::Auth(api_error_message(response).await));
                }
                400 => {
                    return Err(BackendError::InvalidRequest(
                        api_error_message(response).await,
                    ));
                }
                s if s >= 500 => return Err(BackendError::Server { status: s }),
                s => {
                    return Err(BackendError::InvalidRequest(format!(
                        "unexpected HTTP {s}"
                    )))
                }
            }

            let body: Value = response
                .json()
                .await
                .map_err(|e| BackendError::Network(format!("malformed response: {e}")))?;

            Self::response_text(&body)
        })
    }
}

/// Best-effort extraction of the API's error message from a failed response.
async fn api_error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<Value>().await {
        Ok(body) => body["error"]["message"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {status}")),
        Err(_) => format!("HTTP {status}"),
    }
}

// ── Retry-driving client ─────────────────────────────────────────────────

/// Successful outcome of a unit translation, with the retries it cost.
#[derive(Debug, Clone)]
pub struct Translated {
    pub text: String,
    pub retries: u32,
}

/// Terminal failure of a unit translation.
#[derive(Debug, Error)]
pub enum UnitError {
    /// The unit carries an image but the model is text-only. Detected before
    /// any backend call is issued.
    #[error("model '{model}' does not accept image input")]
    CapabilityMismatch { model: &'static str },

    /// The backend failed and the retry budget is spent (or the failure was
    /// permanent).
    #[error("{source}")]
    Failed { retries: u32, source: BackendError },
}

/// Drives a [`TranslationBackend`] under a [`RetryPolicy`].
pub struct TranslationClient {
    backend: Arc<dyn TranslationBackend>,
    policy: RetryPolicy,
}

impl TranslationClient {
    pub fn new(backend: Arc<dyn TranslationBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// Translate one unit to a terminal result.
    ///
    /// Image units are checked against the model's capabilities first; the
    /// mismatch error is returned without issuing any network call.
    pub async fn translate_unit(
        &self,
        unit: &PageUnit,
        target_language: &str,
        model: &'static ModelDescriptor,
    ) -> Result<Translated, UnitError> {
        if matches!(unit, PageUnit::Image { .. }) && !model.supports_multimodal {
            return Err(UnitError::CapabilityMismatch {
                model: model.logical_id,
            });
        }

        let request = TranslationRequest {
            unit,
            target_language,
            model,
        };
        let page_num = unit.page_index() + 1;
        let mut retries = 0u32;

        loop {
            match self.backend.translate(&request).await {
                Ok(text) => {
                    debug!("Page {}: translated after {} retries", page_num, retries);
                    return Ok(Translated { text, retries });
                }
                Err(e) => {
                    let attempts_made = retries + 1;
                    if !e.is_transient() || attempts_made >= self.policy.max_attempts {
                        return Err(UnitError::Failed { retries, source: e });
                    }
                    retries += 1;
                    let backoff = backoff_for(&self.policy, retries, &e);
                    warn!(
                        "Page {}: attempt {} failed ({}), retrying in {:?}",
                        page_num, attempts_made, e, backoff
                    );
                    sleep(backoff).await;
                }
            }
        }
    }
}

/// Exponential backoff, stretched to honour a server-specified Retry-After.
fn backoff_for(policy: &RetryPolicy, retry: u32, error: &BackendError) -> Duration {
    let base = policy.backoff(retry);
    if let BackendError::RateLimited {
        retry_after_secs: Some(secs),
    } = error
    {
        base.max(Duration::from_secs(*secs))
    } else {
        base
    }
}
