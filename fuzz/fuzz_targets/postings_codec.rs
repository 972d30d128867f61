// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Posting list codec: garbage must be rejected, valid lists must roundtrip.

#![no_main]

use libfuzzer_sys::fuzz_target;
use simstr::binary::{decode_postings, encode_postings};

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes never panics
    if let Ok((ids, consumed)) = decode_postings(data) {
        assert!(consumed <= data.len());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    // Any strictly ascending id list roundtrips
    let mut ids: Vec<u32> = data
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let mut buf = Vec::new();
    encode_postings(&ids, &mut buf);
    let (decoded, consumed) = decode_postings(&buf).expect("encoded postings must decode");
    assert_eq!(decoded, ids);
    assert_eq!(consumed, buf.len());
});
