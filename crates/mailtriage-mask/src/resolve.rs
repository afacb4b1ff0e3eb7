//! Overlap resolution for candidate spans.
//!
//! Greedy interval scheduling: candidates are stably sorted by start
//! position and swept left to right, accepting a span iff it begins at
//! or after the end of the last accepted span. First-in-sorted-order
//! wins; rejected spans are dropped, never merged or truncated.
//!
//! The stable sort makes discovery order the tie-break for equal
//! starts: NER candidates are gathered first, then pattern detectors in
//! their declared table order (see `patterns::scan_all`). The order is
//! fixed; `aadhar_num` always beats `credit_debit_no` on an equal start.

use crate::types::CandidateSpan;

/// Reduce candidates to a sorted, pairwise non-overlapping list.
pub fn resolve_overlaps(mut candidates: Vec<CandidateSpan>) -> Vec<CandidateSpan> {
    candidates.sort_by_key(|c| c.start);

    let mut accepted = Vec::with_capacity(candidates.len());
    let mut last_end = 0;
    for candidate in candidates {
        if candidate.start >= last_end {
            last_end = candidate.end;
            accepted.push(candidate);
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PiiLabel;

    fn span(start: usize, end: usize, label: PiiLabel) -> CandidateSpan {
        CandidateSpan {
            start,
            end,
            label,
            text: "x".repeat(end - start),
        }
    }

    #[test]
    fn test_non_overlapping_all_kept() {
        let accepted = resolve_overlaps(vec![
            span(10, 20, PiiLabel::Email),
            span(0, 5, PiiLabel::Ssn),
            span(25, 30, PiiLabel::Dob),
        ]);
        let starts: Vec<usize> = accepted.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0, 10, 25]);
    }

    #[test]
    fn test_overlap_first_start_wins() {
        // Email [8,19) overlaps a phone-like span [15,27): earliest start wins.
        let accepted = resolve_overlaps(vec![
            span(8, 19, PiiLabel::Email),
            span(15, 27, PiiLabel::PhoneNumber),
        ]);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].label, PiiLabel::Email);
    }

    #[test]
    fn test_equal_start_discovery_order_wins() {
        // Aadhar is discovered before the card detector; equal starts
        // must resolve to it even when the card span is longer.
        let accepted = resolve_overlaps(vec![
            span(4, 18, PiiLabel::AadharNum),
            span(4, 23, PiiLabel::CreditDebitNo),
        ]);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].label, PiiLabel::AadharNum);
    }

    #[test]
    fn test_adjacent_spans_both_kept() {
        // Half-open intervals: end == next start is not an overlap.
        let accepted = resolve_overlaps(vec![
            span(0, 5, PiiLabel::Email),
            span(5, 9, PiiLabel::Ssn),
        ]);
        assert_eq!(accepted.len(), 2);
    }

    #[test]
    fn test_accepted_pairwise_non_overlapping() {
        let accepted = resolve_overlaps(vec![
            span(0, 10, PiiLabel::Email),
            span(3, 6, PiiLabel::CvvNo),
            span(9, 14, PiiLabel::Ssn),
            span(12, 20, PiiLabel::Dob),
            span(20, 25, PiiLabel::ExpiryDate),
        ]);
        for pair in accepted.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve_overlaps(Vec::new()).is_empty());
    }
}
