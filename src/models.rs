//! Static catalog of Gemini models the translator can target.
//!
//! The catalog maps a short logical id (what users type on the command line)
//! to the API model name the `generateContent` endpoint expects, plus the one
//! capability the pipeline cares about: whether the model accepts image
//! input. It is a plain lookup table, immutable after compilation, with no
//! network discovery.

use crate::error::TranslateError;

/// One entry of the model catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ModelDescriptor {
    /// Short id used on the CLI and in configs, e.g. `gemini-1.5-flash`.
    pub logical_id: &'static str,
    /// Fully-qualified API model name, e.g. `models/gemini-1.5-flash`.
    pub api_name: &'static str,
    /// Whether the model accepts inline image parts.
    pub supports_multimodal: bool,
}

/// Logical id of the default model: fast, cheap, multimodal-capable.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// All models the translator knows about, in display order.
///
/// Gemini generation models all accept image input; the Gemma instruction
/// models served through the same API are text-only.
static CATALOG: &[ModelDescriptor] = &[
    ModelDescriptor {
        logical_id: "gemini-1.5-flash",
        api_name: "models/gemini-1.5-flash",
        supports_multimodal: true,
    },
    ModelDescriptor {
        logical_id: "gemini-1.5-flash-8b",
        api_name: "models/gemini-1.5-flash-8b",
        supports_multimodal: true,
    },
    ModelDescriptor {
        logical_id: "gemini-1.5-pro",
        api_name: "models/gemini-1.5-pro",
        supports_multimodal: true,
    },
    ModelDescriptor {
        logical_id: "gemini-2.0-flash",
        api_name: "models/gemini-2.0-flash",
        supports_multimodal: true,
    },
    ModelDescriptor {
        logical_id: "gemini-2.0-flash-lite",
        api_name: "models/gemini-2.0-flash-lite",
        supports_multimodal: true,
    },
    ModelDescriptor {
        logical_id: "gemini-2.5-flash",
        api_name: "models/gemini-2.5-flash-preview-04-17",
        supports_multimodal: true,
    },
    ModelDescriptor {
        logical_id: "gemini-2.5-pro",
        api_name: "models/gemini-2.5-pro-preview-03-25",
        supports_multimodal: true,
    },
    ModelDescriptor {
        logical_id: "gemma-3-4b-it",
        api_name: "models/gemma-3-4b-it",
        supports_multimodal: false,
    },
    ModelDescriptor {
        logical_id: "gemma-3-12b-it",
        api_name: "models/gemma-3-12b-it",
        supports_multimodal: false,
    },
    ModelDescriptor {
        logical_id: "gemma-3-27b-it",
        api_name: "models/gemma-3-27b-it",
        supports_multimodal: false,
    },
];

/// Look up a model by logical id.
///
/// # Errors
/// Returns [`TranslateError::UnknownModel`] when the id is not in the catalog.
pub fn resolve(logical_id: &str) -> Result<&'static ModelDescriptor, TranslateError> {
    CATALOG
        .iter()
        .find(|m| m.logical_id == logical_id)
        .ok_or_else(|| TranslateError::UnknownModel {
            id: logical_id.to_string(),
        })
}

/// The full catalog in display order, for `--list-models`.
pub fn all() -> &'static [ModelDescriptor] {
    CATALOG
}
