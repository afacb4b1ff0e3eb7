//! Classifier backend trait and the no-op implementation.

use std::collections::HashMap;

use serde::Serialize;

/// A category prediction with per-category confidence scores.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub category: String,
    pub probabilities: HashMap<String, f32>,
}

/// Trait for classification backends.
///
/// Implementations must be reentrant: `predict` is called from
/// concurrent requests against a shared, read-only backend.
pub trait ClassifierBackend: Send + Sync {
    /// Predict the support category for a (masked) email body.
    ///
    /// Returns `None` when prediction fails; the caller substitutes a
    /// sentinel category and never treats this as a request error.
    fn predict(&self, text: &str) -> Option<Prediction>;

    /// Check whether a model is actually loaded.
    fn is_available(&self) -> bool;

    /// Backend name, reported by the health endpoint.
    fn name(&self) -> &'static str;
}

/// Backend used when no classification model is available.
pub struct NoopClassifier;

impl ClassifierBackend for NoopClassifier {
    fn predict(&self, _text: &str) -> Option<Prediction> {
        None
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
