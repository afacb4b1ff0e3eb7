//! The pattern detector set: fixed regexes, one per PII label.
//!
//! Each detector runs independently over the original, unmodified text
//! and yields raw candidate spans. Detectors never abort a request: a
//! pattern that failed to compile at init reports a per-detector failure
//! that the pipeline logs and skips.

use mailtriage_core::Error;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::types::{CandidateSpan, PiiLabel};

/// Outcome of running one detector over a text.
#[derive(Debug)]
pub struct DetectorOutcome {
    pub label: PiiLabel,
    pub result: Result<Vec<CandidateSpan>, Error>,
}

/// Compile a pattern, returning None (and logging) on failure so a bad
/// pattern degrades to zero matches instead of panicking at init.
fn compile(label: &str, pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Pattern for {} failed to compile: {}", label, e);
            None
        }
    }
}

static EMAIL_RE: Lazy<Option<Regex>> =
    Lazy::new(|| compile("email", r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"));
static PHONE_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    compile(
        "phone_number",
        r"\b(?:\+?\d{1,3}[-.\s]?)?(?:\(?\d{3}\)?[-.\s]?){1,2}\d{3,4}[-.\s]?\d{3,4}\b",
    )
});
static DOB_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    compile(
        "dob",
        r"\b(?:0?[1-9]|[12][0-9]|3[01])[/-](?:0?[1-9]|1[0-2])[/-](?:19|20)?\d{2}\b",
    )
});
static AADHAR_RE: Lazy<Option<Regex>> =
    Lazy::new(|| compile("aadhar_num", r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}\b"));
static CARD_RE: Lazy<Option<Regex>> =
    Lazy::new(|| compile("credit_debit_no", r"\b(?:\d{4}[-\s]?){3,4}\d{1,4}\b"));
static CVV_RE: Lazy<Option<Regex>> = Lazy::new(|| compile("cvv_no", r"\b\d{3,4}\b"));
static EXPIRY_RE: Lazy<Option<Regex>> =
    Lazy::new(|| compile("expiry_date", r"\b(?:0[1-9]|1[0-2])[/-](?:\d{2}|\d{4})\b"));
static SSN_RE: Lazy<Option<Regex>> = Lazy::new(|| compile("ssn", r"\b\d{3}-?\d{2}-?\d{4}\b"));
static ACCOUNT_RE: Lazy<Option<Regex>> =
    Lazy::new(|| compile("account_number", r"(?i)\b(?:account|acct)[\s#:]*\d{8,17}\b"));

/// Declared detector order. Authoritative for resolver tie-breaking:
/// equal-start candidates resolve to the earlier entry in this table
/// (NER candidates, gathered before any pattern, come earlier still).
static PATTERNS: Lazy<Vec<(PiiLabel, &'static Option<Regex>)>> = Lazy::new(|| {
    vec![
        (PiiLabel::Email, &EMAIL_RE),
        (PiiLabel::PhoneNumber, &PHONE_RE),
        (PiiLabel::Dob, &DOB_RE),
        (PiiLabel::AadharNum, &AADHAR_RE),
        (PiiLabel::CreditDebitNo, &CARD_RE),
        (PiiLabel::CvvNo, &CVV_RE),
        (PiiLabel::ExpiryDate, &EXPIRY_RE),
        (PiiLabel::Ssn, &SSN_RE),
        (PiiLabel::AccountNumber, &ACCOUNT_RE),
    ]
});

/// Run every pattern detector over `text`, in declared order.
pub fn scan_all(text: &str) -> Vec<DetectorOutcome> {
    PATTERNS
        .iter()
        .map(|(label, regex)| DetectorOutcome {
            label: *label,
            result: run_detector(*label, regex, text),
        })
        .collect()
}

fn run_detector(
    label: PiiLabel,
    regex: &Option<Regex>,
    text: &str,
) -> Result<Vec<CandidateSpan>, Error> {
    let Some(re) = regex else {
        return Err(Error::Detector(format!(
            "pattern for {} failed to compile",
            label.as_str()
        )));
    };

    let mut spans = Vec::new();
    for m in re.find_iter(text) {
        if label == PiiLabel::CvvNo && !cvv_accepted(text, m.start(), m.end()) {
            continue;
        }
        spans.push(CandidateSpan {
            start: m.start(),
            end: m.end(),
            label,
            text: m.as_str().to_string(),
        });
    }
    Ok(spans)
}

/// Keywords that must appear near a bare 3-4 digit token for it to count
/// as a CVV. Without this gate the detector matches almost any short
/// number in an email.
const CVV_KEYWORDS: [&str; 4] = ["cvv", "cvc", "security", "code"];

/// Window, in bytes either side of the match, searched for CVV keywords.
const CVV_CONTEXT_WINDOW: usize = 10;

fn cvv_accepted(text: &str, start: usize, end: usize) -> bool {
    // The token must be followed by whitespace or end of text.
    if !text[end..].chars().next().map_or(true, |c| c.is_whitespace()) {
        return false;
    }

    let lo = floor_char_boundary(text, start.saturating_sub(CVV_CONTEXT_WINDOW));
    let hi = ceil_char_boundary(text, end + CVV_CONTEXT_WINDOW);
    let context = text[lo..hi].to_lowercase();
    CVV_KEYWORDS.iter().any(|kw| context.contains(kw))
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
    let n = s.len();
    if i >= n {
        return n;
    }
    while i < n && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}
