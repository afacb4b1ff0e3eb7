//! NER backend trait and the no-op implementation.
//!
//! The `NerBackend` trait abstracts over full-name detection.
//! Implementations:
//! - `OnnxNer`: ONNX Runtime token-classification model (requires `onnx` feature)
//! - `NoopNer`: always returns no detections (pattern-only masking)

use crate::types::CandidateSpan;

/// Trait for full-name detection backends.
///
/// Implementations must be reentrant: `detect_names` is called from
/// concurrent requests against a shared, read-only backend.
pub trait NerBackend: Send + Sync {
    /// Detect full-name spans in text.
    ///
    /// Per-call failures are handled inside the implementation and
    /// reported as zero detections, never as an error.
    fn detect_names(&self, text: &str) -> Vec<CandidateSpan>;

    /// Check whether a model is actually loaded.
    fn is_available(&self) -> bool;
}

/// Backend used when no NER model is available.
pub struct NoopNer;

impl NerBackend for NoopNer {
    fn detect_names(&self, _text: &str) -> Vec<CandidateSpan> {
        Vec::new()
    }

    fn is_available(&self) -> bool {
        false
    }
}
