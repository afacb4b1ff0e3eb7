use mailtriage_mask::PiiMasker;
use proptest::prelude::*;

// ── Masked output never contains the raw detected entity ──────────────────

proptest! {
    #[test]
    fn masked_output_never_contains_detected_email(
        user in "[a-z]{3,8}",
        domain in "[a-z]{3,8}"
    ) {
        let email = format!("{user}@{domain}.com");
        let input = format!("please write to {email} soon");
        let masker = PiiMasker::default();
        let result = masker.mask(&input);
        prop_assert!(
            !result.masked_text.contains(&email),
            "Raw email found in masked output: {}",
            result.masked_text
        );
        prop_assert!(result.masked_text.contains("[EMAIL]"));
    }

    #[test]
    fn masked_output_never_contains_detected_ssn(
        a in 100u32..1000,
        b in 10u32..100,
        c in 1000u32..10000
    ) {
        let ssn = format!("{a}-{b}-{c}");
        let input = format!("my ssn is {ssn} thanks");
        let masker = PiiMasker::default();
        let result = masker.mask(&input);
        prop_assert!(
            !result.masked_text.contains(&ssn),
            "Raw SSN found in masked output: {}",
            result.masked_text
        );
    }
}

// ── Structural invariants on arbitrary text ───────────────────────────────

proptest! {
    #[test]
    fn accepted_spans_pairwise_non_overlapping(text in ".{0,200}") {
        let masker = PiiMasker::default();
        let result = masker.mask(&text);
        for pair in result.entities.windows(2) {
            prop_assert!(
                pair[0].position[1] <= pair[1].position[0],
                "Overlapping entities: {:?} / {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn gaps_plus_entities_reconstruct_input(text in ".{0,200}") {
        let masker = PiiMasker::default();
        let result = masker.mask(&text);
        if text.is_empty() {
            prop_assert_eq!(&result.masked_text, "");
            return Ok(());
        }

        let mut rebuilt = String::new();
        let mut last_end = 0;
        for entity in &result.entities {
            prop_assert_eq!(
                &entity.entity,
                &text[entity.position[0]..entity.position[1]]
            );
            rebuilt.push_str(&text[last_end..entity.position[0]]);
            rebuilt.push_str(&entity.entity);
            last_end = entity.position[1];
        }
        rebuilt.push_str(&text[last_end..]);
        prop_assert_eq!(rebuilt, text);
    }

    #[test]
    fn remasking_masked_text_never_panics(text in ".{0,200}") {
        let masker = PiiMasker::default();
        let first = masker.mask(&text);
        let _ = masker.mask(&first.masked_text);
    }
}
