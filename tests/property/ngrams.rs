//! N-gram generator properties.

use std::collections::HashSet;

use proptest::prelude::*;
use simstr::NgramGenerator;

use super::common::{multiset_overlap, window_counts};
use super::{unicode_word_strategy, word_strategy};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every string decomposes into at least one n-gram, the same way twice.
    #[test]
    fn prop_ngrams_nonempty_and_deterministic(
        s in word_strategy(),
        n in 1usize..6,
        marks in any::<bool>(),
    ) {
        let gen = NgramGenerator::new(n).unwrap().with_boundary_marks(marks);
        let first = gen.generate::<u8>(&s);
        prop_assert!(!first.is_empty());
        prop_assert_eq!(&first, &gen.generate::<u8>(&s));
    }

    /// With marks on, a string of L units yields L + n - 1 n-grams.
    #[test]
    fn prop_marked_count(s in unicode_word_strategy(), n in 1usize..6) {
        let gen = NgramGenerator::new(n).unwrap();
        prop_assert_eq!(gen.generate::<char>(&s).len(), s.chars().count() + n - 1);
        prop_assert_eq!(gen.generate::<u8>(&s).len(), s.len() + n - 1);
    }

    /// Occurrence tagging makes keys unique within one string.
    #[test]
    fn prop_keys_distinct(s in word_strategy(), n in 1usize..4, marks in any::<bool>()) {
        let gen = NgramGenerator::new(n).unwrap().with_boundary_marks(marks);
        let keys = gen.keys::<u8>(&s);
        let unique: HashSet<_> = keys.iter().collect();
        prop_assert_eq!(unique.len(), keys.len());
    }

    /// Shared tagged keys count the multiset intersection of raw windows.
    #[test]
    fn prop_key_overlap_is_multiset_overlap(
        a in word_strategy(),
        b in word_strategy(),
        n in 1usize..4,
        marks in any::<bool>(),
    ) {
        let gen = NgramGenerator::new(n).unwrap().with_boundary_marks(marks);
        let a_keys: HashSet<Vec<u8>> = gen.keys::<u8>(&a).into_iter().collect();
        let shared = gen.keys::<u8>(&b).iter().filter(|k| a_keys.contains(*k)).count();

        let expected = multiset_overlap(&window_counts::<u8>(&gen, &a), &window_counts::<u8>(&gen, &b));
        prop_assert_eq!(shared, expected);
    }
}
