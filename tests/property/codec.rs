//! Format decoders on arbitrary bytes.

use proptest::prelude::*;
use simstr::binary::{decode_postings, decode_varint, encode_varint, Layout};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Garbage is rejected or decodes to a strictly ascending list.
    #[test]
    fn prop_decode_postings_arbitrary(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        if let Ok((ids, consumed)) = decode_postings(&bytes) {
            prop_assert!(consumed <= bytes.len());
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }

    /// A count followed by arbitrary (possibly huge) deltas.
    #[test]
    fn prop_decode_postings_large_deltas(deltas in prop::collection::vec(any::<u64>(), 1..6)) {
        let mut buf = Vec::new();
        encode_varint(deltas.len() as u64, &mut buf);
        for &delta in &deltas {
            encode_varint(delta, &mut buf);
        }
        if let Ok((ids, _)) = decode_postings(&buf) {
            prop_assert_eq!(ids.len(), deltas.len());
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
            let sum: u128 = deltas.iter().map(|&d| u128::from(d)).sum();
            prop_assert_eq!(u128::from(*ids.last().unwrap()), sum);
        }
    }

    #[test]
    fn prop_decode_varint_arbitrary(bytes in prop::collection::vec(any::<u8>(), 0..16)) {
        if let Ok((_, consumed)) = decode_varint(&bytes) {
            prop_assert!(consumed >= 1 && consumed <= bytes.len());
        }
    }

    #[test]
    fn prop_layout_parse_arbitrary(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = Layout::parse(&bytes);
    }
}
