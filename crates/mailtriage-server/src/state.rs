//! Shared application state.

use std::sync::Arc;

use mailtriage_classify::ClassifierBackend;
use mailtriage_core::MailTriageConfig;
use mailtriage_mask::{NerBackend, PiiMasker};

/// Shared application state accessible from all route handlers.
///
/// Everything here is read-only after startup; requests share it
/// without locking.
pub struct AppState {
    pub config: MailTriageConfig,
    pub masker: PiiMasker,
    pub classifier: Arc<dyn ClassifierBackend>,
}

impl AppState {
    pub fn new(
        config: MailTriageConfig,
        ner: Arc<dyn NerBackend>,
        classifier: Arc<dyn ClassifierBackend>,
    ) -> Self {
        Self {
            config,
            masker: PiiMasker::new(ner),
            classifier,
        }
    }
}
