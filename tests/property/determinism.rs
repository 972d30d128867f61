//! Identical inputs give identical outputs, across queries and rebuilds.

use proptest::prelude::*;
use simstr::{IndexConfig, Reader};

use super::common::build_db;
use super::{as_strs, measure_strategy, threshold_strategy, vocabulary_strategy, word_strategy};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_repeated_queries_identical(
        words in vocabulary_strategy(),
        query in word_strategy(),
        measure in measure_strategy(),
        threshold in threshold_strategy(),
    ) {
        let words = as_strs(&words);
        let db = build_db::<u8>(&words, &IndexConfig::default());
        let reader = Reader::<u8>::open(&db.path).unwrap();

        let first = reader.retrieve_scored(&query, measure, threshold).unwrap();
        for _ in 0..3 {
            prop_assert_eq!(&reader.retrieve_scored(&query, measure, threshold).unwrap(), &first);
        }

        // Reopening sees the same database
        let reopened = Reader::<u8>::open(&db.path).unwrap();
        prop_assert_eq!(&reopened.retrieve_scored(&query, measure, threshold).unwrap(), &first);
    }

    /// Building the same strings twice produces byte-identical files.
    #[test]
    fn prop_build_is_deterministic(words in vocabulary_strategy()) {
        let words = as_strs(&words);
        let a = build_db::<u8>(&words, &IndexConfig::default());
        let b = build_db::<u8>(&words, &IndexConfig::default());
        prop_assert_eq!(std::fs::read(&a.path).unwrap(), std::fs::read(&b.path).unwrap());
    }
}
