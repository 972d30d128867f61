// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for varint (LEB128) encoding/decoding.
//!
//! Varints carry every length and delta in the format. Decoding garbage must
//! return Err, and anything that decodes must survive a roundtrip.

#![no_main]

use libfuzzer_sys::fuzz_target;
use simstr::binary::{decode_varint, encode_varint, MAX_VARINT_BYTES};

fuzz_target!(|data: &[u8]| {
    if let Ok((value, consumed)) = decode_varint(data) {
        let mut reencoded = Vec::new();
        encode_varint(value, &mut reencoded);

        let (redecoded, reconsumed) =
            decode_varint(&reencoded).expect("re-encoded varint must decode");
        assert_eq!(value, redecoded);
        assert_eq!(reconsumed, reencoded.len());

        assert!(consumed <= MAX_VARINT_BYTES);
        assert!(consumed <= data.len());
    }
});
