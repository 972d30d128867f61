// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! End-to-end: arbitrary strings in, arbitrary queries out.
//!
//! Whatever gets inserted, every query must succeed and every hit must
//! actually satisfy the measure it was retrieved under.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use simstr::{IndexConfig, Measure, Reader, Writer};

#[derive(Arbitrary, Debug)]
struct Input {
    words: Vec<String>,
    query: String,
    measure: u8,
    threshold: u8,
    n: u8,
    marks: bool,
}

fuzz_target!(|input: Input| {
    let config = IndexConfig {
        ngram_size: 1 + usize::from(input.n % 4),
        boundary_marks: input.marks,
        ..IndexConfig::default()
    };
    let measure = Measure::ALL[usize::from(input.measure) % Measure::ALL.len()];
    let threshold = f64::from(input.threshold) / 255.0;

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("fuzz.db");
    let mut writer = Writer::<u8>::create(&path, &config).unwrap();
    for w in input.words.iter().take(64) {
        writer.insert(w).unwrap();
    }
    writer.close().unwrap();

    let reader = Reader::<u8>::open(&path).unwrap();
    let gen = reader.generator();
    let query_keys = gen.keys::<u8>(&input.query);
    for m in reader.retrieve_scored(&input.query, measure, threshold).unwrap() {
        let keys = gen.keys::<u8>(reader.string(m.id).unwrap());
        let overlap = keys.iter().filter(|k| query_keys.contains(k)).count();
        assert!(overlap > 0);
        assert!(measure.satisfies(query_keys.len(), keys.len(), overlap, threshold));
    }
});
