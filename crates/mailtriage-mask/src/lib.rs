//! MailTriage Mask — PII detection and masking pipeline.
//!
//! Provides the `NerBackend` trait for full-name detection. When the
//! `onnx` feature is enabled and model files are present, `OnnxNer`
//! loads a token-classification model for PERSON spans. Without it,
//! `NoopNer` is used and masking falls back to pattern detectors only.

pub mod ner;
pub mod onnx_ner;
pub mod patterns;
pub mod pipeline;
pub mod resolve;
pub mod types;

pub use ner::{NerBackend, NoopNer};
pub use pipeline::PiiMasker;
pub use types::{CandidateSpan, MaskedEntity, MaskingResult, PiiLabel};

#[cfg(feature = "onnx")]
pub use onnx_ner::OnnxNer;

use std::path::Path;
use std::sync::Arc;

/// Create the best available NER backend for the given model directory.
///
/// Tries ONNX first (if feature enabled and model files present),
/// falls back to `NoopNer`. The fallback is logged once here, at
/// startup; per-request calls never surface the unavailability.
pub fn create_ner(model_dir: &Path) -> Arc<dyn NerBackend> {
    #[cfg(feature = "onnx")]
    {
        match OnnxNer::load(model_dir) {
            Ok(ner) => {
                tracing::info!("Using ONNX NER backend for full-name detection");
                return Arc::new(ner);
            }
            Err(e) => {
                tracing::warn!(
                    "NER backend unavailable: {}. Full-name detection disabled.",
                    e
                );
            }
        }
    }

    #[cfg(not(feature = "onnx"))]
    {
        let _ = model_dir;
        tracing::info!("ONNX feature disabled. Full-name detection disabled.");
    }

    Arc::new(NoopNer)
}
