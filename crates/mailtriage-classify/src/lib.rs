//! MailTriage Classify — support-category prediction backend.
//!
//! Provides the `ClassifierBackend` trait for classifying masked email
//! text. When the `onnx` feature is enabled and model files are
//! present, `OnnxClassifier` runs a sequence-classification model.
//! Without it, `NoopClassifier` is used and the server reports the
//! classifier as unavailable.

pub mod classifier;
pub mod onnx_classifier;

pub use classifier::{ClassifierBackend, NoopClassifier, Prediction};

#[cfg(feature = "onnx")]
pub use onnx_classifier::OnnxClassifier;

use std::path::Path;
use std::sync::Arc;

/// Create the best available classifier for the given model directory.
///
/// Tries ONNX first (if feature enabled and model files present),
/// falls back to `NoopClassifier`. The fallback is logged once here;
/// per-request calls never surface the unavailability as an error.
pub fn create_classifier(model_dir: &Path) -> Arc<dyn ClassifierBackend> {
    #[cfg(feature = "onnx")]
    {
        match OnnxClassifier::load(model_dir) {
            Ok(classifier) => {
                tracing::info!(
                    "Using ONNX classifier ({} categories)",
                    classifier.categories().len()
                );
                return Arc::new(classifier);
            }
            Err(e) => {
                tracing::warn!("Classifier unavailable: {}. Emails will not be categorized.", e);
            }
        }
    }

    #[cfg(not(feature = "onnx"))]
    {
        let _ = model_dir;
        tracing::info!("ONNX feature disabled. Emails will not be categorized.");
    }

    Arc::new(NoopClassifier)
}
