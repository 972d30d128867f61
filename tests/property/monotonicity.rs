//! Lowering the threshold never loses a match.

use proptest::prelude::*;
use simstr::{IndexConfig, Reader};

use super::common::build_db;
use super::{as_strs, measure_strategy, vocabulary_strategy, word_strategy};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_results_shrink_as_threshold_grows(
        words in vocabulary_strategy(),
        query in word_strategy(),
        measure in measure_strategy(),
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let words = as_strs(&words);
        let db = build_db::<u8>(&words, &IndexConfig::default());
        let reader = Reader::<u8>::open(&db.path).unwrap();

        let loose: Vec<u32> = reader.retrieve_scored(&query, measure, low).unwrap().iter().map(|m| m.id).collect();
        let strict = reader.retrieve_scored(&query, measure, high).unwrap();
        for m in &strict {
            prop_assert!(loose.contains(&m.id), "id {} at {} missing at {}", m.id, high, low);
        }
        prop_assert!(strict.len() <= loose.len());
    }

    /// A hit for `check` exists exactly when `retrieve` is non-empty.
    #[test]
    fn prop_check_agrees_with_retrieve(
        words in vocabulary_strategy(),
        query in word_strategy(),
        measure in measure_strategy(),
        threshold in 0.0f64..=1.0,
    ) {
        let words = as_strs(&words);
        let db = build_db::<u8>(&words, &IndexConfig::default());
        let reader = Reader::<u8>::open(&db.path).unwrap();

        let found = reader.check(&query, measure, threshold).unwrap();
        let results = reader.retrieve(&query, measure, threshold).unwrap();
        prop_assert_eq!(found, !results.is_empty());
    }
}
