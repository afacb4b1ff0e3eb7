//! Span and entity types shared across the masking pipeline.

use serde::{Deserialize, Serialize};

/// Kinds of PII the pipeline can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiLabel {
    FullName,
    Email,
    PhoneNumber,
    Dob,
    AadharNum,
    CreditDebitNo,
    CvvNo,
    ExpiryDate,
    Ssn,
    AccountNumber,
}

impl PiiLabel {
    /// Wire label, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PiiLabel::FullName => "full_name",
            PiiLabel::Email => "email",
            PiiLabel::PhoneNumber => "phone_number",
            PiiLabel::Dob => "dob",
            PiiLabel::AadharNum => "aadhar_num",
            PiiLabel::CreditDebitNo => "credit_debit_no",
            PiiLabel::CvvNo => "cvv_no",
            PiiLabel::ExpiryDate => "expiry_date",
            PiiLabel::Ssn => "ssn",
            PiiLabel::AccountNumber => "account_number",
        }
    }

    /// Token substituted for a masked span: `[` + uppercase label + `]`.
    pub fn placeholder(&self) -> &'static str {
        match self {
            PiiLabel::FullName => "[FULL_NAME]",
            PiiLabel::Email => "[EMAIL]",
            PiiLabel::PhoneNumber => "[PHONE_NUMBER]",
            PiiLabel::Dob => "[DOB]",
            PiiLabel::AadharNum => "[AADHAR_NUM]",
            PiiLabel::CreditDebitNo => "[CREDIT_DEBIT_NO]",
            PiiLabel::CvvNo => "[CVV_NO]",
            PiiLabel::ExpiryDate => "[EXPIRY_DATE]",
            PiiLabel::Ssn => "[SSN]",
            PiiLabel::AccountNumber => "[ACCOUNT_NUMBER]",
        }
    }
}

/// A raw detector match before overlap resolution.
///
/// `start`/`end` are byte offsets into the original text, half-open.
/// `text` always equals the source slice `&input[start..end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSpan {
    pub start: usize,
    pub end: usize,
    pub label: PiiLabel,
    pub text: String,
}

/// A masked entity as reported to the caller. Positions reference the
/// original input text, not the masked output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskedEntity {
    pub position: [usize; 2],
    pub classification: PiiLabel,
    pub entity: String,
}

/// Result of masking one input text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskingResult {
    pub masked_text: String,
    /// Ordered by ascending original start position.
    pub entities: Vec<MaskedEntity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_format() {
        assert_eq!(PiiLabel::Email.placeholder(), "[EMAIL]");
        assert_eq!(PiiLabel::PhoneNumber.placeholder(), "[PHONE_NUMBER]");
        assert_eq!(PiiLabel::CvvNo.placeholder(), "[CVV_NO]");
    }

    #[test]
    fn test_label_serde_snake_case() {
        let json = serde_json::to_string(&PiiLabel::CreditDebitNo).unwrap();
        assert_eq!(json, "\"credit_debit_no\"");
    }
}
