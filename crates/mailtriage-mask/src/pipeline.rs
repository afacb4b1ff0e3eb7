//! The masking pipeline: detector registry, overlap resolution, rewrite.

use std::sync::Arc;

use tracing::warn;

use crate::ner::NerBackend;
use crate::patterns;
use crate::resolve;
use crate::types::{MaskedEntity, MaskingResult, PiiLabel};

/// PII masker holding the detector registry for the process lifetime.
///
/// Constructed explicitly at startup and shared read-only across
/// requests; `mask` is a pure, synchronous, request-scoped computation.
pub struct PiiMasker {
    ner: Arc<dyn NerBackend>,
}

impl PiiMasker {
    pub fn new(ner: Arc<dyn NerBackend>) -> Self {
        Self { ner }
    }

    pub fn ner_available(&self) -> bool {
        self.ner.is_available()
    }

    /// Detect and mask PII in `text`.
    ///
    /// Returns the masked text plus a report of every masked entity
    /// with its offsets into the ORIGINAL input. A failing individual
    /// detector is logged and contributes zero candidates; it never
    /// aborts the request.
    pub fn mask(&self, text: &str) -> MaskingResult {
        if text.is_empty() {
            return MaskingResult {
                masked_text: String::new(),
                entities: Vec::new(),
            };
        }

        // NER candidates first, then pattern detectors in declared
        // order. Discovery order is the resolver's tie-break.
        let mut candidates = self.ner.detect_names(text);
        for outcome in patterns::scan_all(text) {
            match outcome.result {
                Ok(spans) => candidates.extend(spans),
                Err(reason) => {
                    warn!(
                        "Detector {} degraded to zero matches: {}",
                        outcome.label.as_str(),
                        reason
                    );
                }
            }
        }

        let accepted = resolve::resolve_overlaps(candidates);

        // Single sweep: gap verbatim, placeholder, ..., tail verbatim.
        let mut masked = String::with_capacity(text.len());
        let mut entities = Vec::with_capacity(accepted.len());
        let mut last_end = 0;

        for span in accepted {
            masked.push_str(&text[last_end..span.start]);
            masked.push_str(span.label.placeholder());
            last_end = span.end;
            entities.push(MaskedEntity {
                position: [span.start, span.end],
                classification: span.label,
                entity: span.text,
            });
        }
        masked.push_str(&text[last_end..]);

        MaskingResult {
            masked_text: masked,
            entities,
        }
    }
}

impl Default for PiiMasker {
    fn default() -> Self {
        Self::new(Arc::new(crate::ner::NoopNer))
    }
}

/// Stub backend for tests: emits fixed full-name spans.
#[cfg(test)]
pub(crate) struct FixedNer(pub Vec<(usize, usize)>);

#[cfg(test)]
impl NerBackend for FixedNer {
    fn detect_names(&self, text: &str) -> Vec<crate::types::CandidateSpan> {
        self.0
            .iter()
            .filter_map(|&(start, end)| {
                text.get(start..end).map(|s| crate::types::CandidateSpan {
                    start,
                    end,
                    label: PiiLabel::FullName,
                    text: s.to_string(),
                })
            })
            .collect()
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let masker = PiiMasker::default();
        let result = masker.mask("");
        assert_eq!(result.masked_text, "");
        assert!(result.entities.is_empty());
    }

    #[test]
    fn test_email_and_ssn_end_to_end() {
        let masker = PiiMasker::default();
        let text = "My email is a@b.com and SSN 123-45-6789.";
        let result = masker.mask(text);

        assert_eq!(
            result.masked_text,
            "My email is [EMAIL] and SSN [SSN]."
        );
        assert_eq!(result.entities.len(), 2);

        assert_eq!(result.entities[0].classification, PiiLabel::Email);
        assert_eq!(result.entities[0].position, [12, 19]);
        assert_eq!(result.entities[0].entity, "a@b.com");

        assert_eq!(result.entities[1].classification, PiiLabel::Ssn);
        assert_eq!(result.entities[1].position, [28, 39]);
        assert_eq!(result.entities[1].entity, "123-45-6789");
    }

    #[test]
    fn test_entities_ordered_by_start() {
        let masker = PiiMasker::default();
        let result = masker.mask("SSN 123-45-6789 then email x@y.com and dob 01/02/1990");
        for pair in result.entities.windows(2) {
            assert!(pair[0].position[0] < pair[1].position[0]);
        }
    }

    #[test]
    fn test_overlap_email_beats_later_phone() {
        // The email at offset 8 starts before any phone-shaped span
        // inside or after it; exactly one of the conflicting spans
        // survives, the earlier-starting email.
        let masker = PiiMasker::default();
        let text = "Contact john@x.com or call 123-456-7890";
        let result = masker.mask(text);

        let labels: Vec<PiiLabel> =
            result.entities.iter().map(|e| e.classification).collect();
        assert_eq!(labels, vec![PiiLabel::Email, PiiLabel::PhoneNumber]);
        assert_eq!(result.entities[0].entity, "john@x.com");
        assert_eq!(result.masked_text, "Contact [EMAIL] or call [PHONE_NUMBER]");
    }

    #[test]
    fn test_reconstruction_property() {
        let masker = PiiMasker::default();
        let text = "Reach me at a@b.com, card 1234-5678-9012-3456, acct account 123456789.";
        let result = masker.mask(text);

        // Gaps plus original entity text reproduce the input exactly.
        let mut rebuilt = String::new();
        let mut last_end = 0;
        for entity in &result.entities {
            rebuilt.push_str(&text[last_end..entity.position[0]]);
            rebuilt.push_str(&entity.entity);
            last_end = entity.position[1];
        }
        rebuilt.push_str(&text[last_end..]);
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_remask_does_not_panic() {
        // Not idempotent by design; must simply not crash.
        let masker = PiiMasker::default();
        let first = masker.mask("cvv: 738 and mail a@b.com");
        let _second = masker.mask(&first.masked_text);
    }

    #[test]
    fn test_ner_candidates_masked_and_first_on_tie() {
        let text = "John Smith wrote from j@x.io";
        let masker = PiiMasker::new(Arc::new(FixedNer(vec![(0, 10)])));
        let result = masker.mask(text);

        assert_eq!(result.masked_text, "[FULL_NAME] wrote from [EMAIL]");
        assert_eq!(result.entities[0].classification, PiiLabel::FullName);
        assert_eq!(result.entities[0].entity, "John Smith");
    }

    #[test]
    fn test_noop_ner_matches_pattern_only_output() {
        let text = "Jane Doe, SSN 123-45-6789, a@b.com";
        let with_stub = PiiMasker::new(Arc::new(FixedNer(Vec::new())));
        let pattern_only = PiiMasker::default();
        assert_eq!(
            with_stub.mask(text).masked_text,
            pattern_only.mask(text).masked_text
        );
    }

    #[test]
    fn test_multibyte_text_around_entities() {
        let masker = PiiMasker::default();
        let text = "héllo a@b.com wörld";
        let result = masker.mask(text);
        assert_eq!(result.masked_text, "héllo [EMAIL] wörld");
        assert_eq!(result.entities[0].entity, "a@b.com");
    }
}
