//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use simstr::{CodeUnit, IndexConfig, Measure, NgramGenerator, Writer};
use tempfile::TempDir;

// ============================================================================
// FIXTURES
// ============================================================================

/// Small vocabulary with shared prefixes, suffixes and a duplicate.
pub const WORDS: &[&str] = &[
    "night", "nacht", "natch", "knight", "nightly", "light", "right", "nigh", "sight", "tight",
    "eight", "weight", "height", "might", "fight", "nights", "nightingale", "evening", "night",
    "a", "", "ab", "abc", "xy",
];

/// Multi-byte strings for wide/narrow comparisons.
pub const UNICODE_WORDS: &[&str] = &[
    "café", "cafe", "caffè", "naïve", "naive", "résumé", "resume", "über", "uber", "tōkyō",
    "tokyo", "harīṣh", "tummalachērla",
];

/// A built database living in its own temporary directory.
pub struct TestDb {
    pub dir: TempDir,
    pub path: PathBuf,
}

/// Build a database of `strings` with `config`.
pub fn build_db<C: CodeUnit>(strings: &[&str], config: &IndexConfig) -> TestDb {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.db");
    write_db::<C>(&path, strings, config);
    TestDb { dir, path }
}

pub fn write_db<C: CodeUnit>(path: &Path, strings: &[&str], config: &IndexConfig) {
    let mut writer = Writer::<C>::create(path, config).unwrap();
    for s in strings {
        writer.insert(s).unwrap();
    }
    writer.close().unwrap();
}

pub fn config(n: usize, boundary_marks: bool) -> IndexConfig {
    IndexConfig {
        ngram_size: n,
        boundary_marks,
        ..IndexConfig::default()
    }
}

// ============================================================================
// ORACLE
// ============================================================================

/// Windows of `s` as a multiset, built without the engine's occurrence tags.
pub fn window_counts<C: CodeUnit>(gen: &NgramGenerator, s: &str) -> HashMap<Vec<C>, usize> {
    let n = gen.n();
    let pad = if gen.boundary_marks() { n - 1 } else { 0 };

    let mut units = vec![C::MARK; pad];
    units.extend(C::decompose(s));
    units.extend(vec![C::MARK; pad]);
    while units.len() < n {
        units.push(C::MARK);
    }

    let mut counts = HashMap::new();
    for window in units.windows(n) {
        *counts.entry(window.to_vec()).or_insert(0) += 1;
    }
    counts
}

/// Multiset intersection size: the smaller count of every shared window.
pub fn multiset_overlap<C: CodeUnit>(a: &HashMap<Vec<C>, usize>, b: &HashMap<Vec<C>, usize>) -> usize {
    a.iter()
        .filter_map(|(window, &count)| b.get(window).map(|&other| count.min(other)))
        .sum()
}

/// Brute-force retrieval: score every stored string against the query.
///
/// Returns `(n-gram count, id)` pairs in the engine's output order.
pub fn oracle<C: CodeUnit>(
    gen: &NgramGenerator,
    strings: &[&str],
    query: &str,
    measure: Measure,
    threshold: f64,
) -> Vec<(usize, u32)> {
    let query_counts = window_counts::<C>(gen, query);
    let q: usize = query_counts.values().sum();

    let mut hits: Vec<(usize, u32)> = strings
        .iter()
        .enumerate()
        .filter_map(|(id, s)| {
            let counts = window_counts::<C>(gen, s);
            let x: usize = counts.values().sum();
            let overlap = multiset_overlap(&query_counts, &counts);
            let exact_ok = measure != Measure::Exact || *s == query;
            (overlap > 0 && exact_ok && measure.satisfies(q, x, overlap, threshold))
                .then_some((x, id as u32))
        })
        .collect();
    hits.sort_unstable();
    hits
}

/// Oracle results as strings.
pub fn oracle_strings<C: CodeUnit>(
    gen: &NgramGenerator,
    strings: &[&str],
    query: &str,
    measure: Measure,
    threshold: f64,
) -> Vec<String> {
    oracle::<C>(gen, strings, query, measure, threshold)
        .into_iter()
        .map(|(_, id)| strings[id as usize].to_string())
        .collect()
}
