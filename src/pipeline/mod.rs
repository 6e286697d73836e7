//! The translation pipeline, stage by stage:
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Extract   per-page units: text runs, or rasterised page images
//!  ├─ 2. Encode    PNG → base64 inline_data payload (multimodal only)
//!  ├─ 3. Translate concurrent Gemini calls with retry/backoff
//!  └─ 4. Assemble  page-ordered text artifact or reconstructed PDF
//! ```
//!
//! Stages 1 and 4 are CPU-bound pdfium work and run under `spawn_blocking`;
//! stage 3 is network-bound and fans out through `buffer_unordered`.

pub mod assemble;
pub mod client;
pub mod encode;
pub mod extract;
