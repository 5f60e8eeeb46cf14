//! Property tests for counting and expansion.

use ner_features::{
    count_entities, expand, CountingPolicy, EntityCounts, MockModel, Table, Tabular,
};
use proptest::prelude::*;
use serde_json::json;

const LEXICON: [&str; 4] = ["Paris", "Berlin", "Rome", "Oslo"];

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("Paris".to_string()),
            Just("Berlin".to_string()),
            Just("Rome".to_string()),
            Just("Oslo".to_string()),
            "[a-z]{1,6}",
        ],
        0..8,
    )
    .prop_map(|words| words.join(" "))
}

fn corpus() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(document(), 0..12)
}

fn count(texts: &[String], policy: CountingPolicy) -> EntityCounts {
    let table = Table::from_texts("text", texts.iter().cloned());
    let model = MockModel::new("lexicon").with_lexicon(LEXICON);
    count_entities(&table, "text", &model, policy).unwrap().counts
}

proptest! {
    #[test]
    fn once_per_document_never_exceeds_every_occurrence(texts in corpus()) {
        let once = count(&texts, CountingPolicy::OncePerDocument);
        let every = count(&texts, CountingPolicy::EveryOccurrence);
        for (entity, n) in once.iter() {
            prop_assert!(n <= every.get(entity));
            prop_assert!(n <= texts.len());
        }
    }

    #[test]
    fn columns_are_exactly_the_passing_entities(
        texts in corpus(),
        cutoffs in prop::collection::vec(-1i64..6, 1..5),
    ) {
        let table = Table::from_texts("text", texts.iter().cloned());
        let counts = count(&texts, CountingPolicy::OncePerDocument);
        let features = expand(&table, "text", &counts, &cutoffs).unwrap();

        let mut expected_keys = cutoffs.clone();
        expected_keys.sort_unstable();
        expected_keys.dedup();
        prop_assert_eq!(features.cutoffs(), expected_keys);

        for &cutoff in &cutoffs {
            let output = features.get(cutoff).unwrap();
            for (entity, n) in counts.iter() {
                let column = format!("f_entity_{entity}");
                prop_assert_eq!(output.has_column(&column), n as i64 >= cutoff);
            }
            prop_assert_eq!(
                output.num_columns(),
                1 + features.feature_columns(cutoff).unwrap().len()
            );
        }
    }

    #[test]
    fn columns_shrink_as_cutoff_grows(texts in corpus(), low in 0i64..4, step in 0i64..4) {
        let table = Table::from_texts("text", texts.iter().cloned());
        let counts = count(&texts, CountingPolicy::EveryOccurrence);
        let high = low + step;
        let features = expand(&table, "text", &counts, &[low, high]).unwrap();

        let low_cols = features.feature_columns(low).unwrap();
        for column in features.feature_columns(high).unwrap() {
            prop_assert!(low_cols.contains(column));
        }
    }

    #[test]
    fn indicator_is_substring_containment(texts in corpus()) {
        let table = Table::from_texts("text", texts.iter().cloned());
        let counts = count(&texts, CountingPolicy::OncePerDocument);
        let features = expand(&table, "text", &counts, &[1]).unwrap();
        let output = features.get(1).unwrap();

        for (entity, _) in counts.iter() {
            let column = output.column(&format!("f_entity_{entity}")).unwrap();
            for (row, text) in texts.iter().enumerate() {
                let expected = if text.contains(entity) { json!(1) } else { json!(0) };
                prop_assert_eq!(&column[row], &expected);
            }
        }
    }

    #[test]
    fn expansion_leaves_input_untouched(texts in corpus()) {
        let table = Table::from_texts("text", texts.iter().cloned());
        let before = table.clone();
        let counts = count(&texts, CountingPolicy::OncePerDocument);
        let _ = expand(&table, "text", &counts, &[0, 1, 2]).unwrap();
        prop_assert_eq!(table, before);
    }
}
