//! Worked examples over tiny databases.

use crate::common::{build_db, config};
use simstr::{IndexConfig, Measure, Reader};

const TRIO: &[&str] = &["night", "nacht", "natch"];

#[test]
fn test_exact_returns_only_the_query() {
    let db = build_db::<u8>(TRIO, &IndexConfig::default());
    let reader = Reader::<u8>::open(&db.path).unwrap();

    assert_eq!(reader.retrieve("night", Measure::Exact, 0.0).unwrap(), vec!["night"]);
    assert!(reader.retrieve("nigh", Measure::Exact, 0.0).unwrap().is_empty());
}

#[test]
fn test_dice_trigrams() {
    let db = build_db::<u8>(TRIO, &IndexConfig::default());
    let reader = Reader::<u8>::open(&db.path).unwrap();

    // night/nacht share $$n, ht$, t$$: dice = 6/14
    // night/natch share only $$n: dice = 2/14
    assert_eq!(reader.retrieve("night", Measure::Dice, 0.7).unwrap(), vec!["night"]);
    assert_eq!(
        reader.retrieve("night", Measure::Dice, 0.4).unwrap(),
        vec!["night", "nacht"]
    );
    assert_eq!(
        reader.retrieve("night", Measure::Dice, 0.1).unwrap(),
        vec!["night", "nacht", "natch"]
    );
}

#[test]
fn test_scores_are_reported() {
    let db = build_db::<u8>(TRIO, &IndexConfig::default());
    let reader = Reader::<u8>::open(&db.path).unwrap();

    let matches = reader.retrieve_scored("night", Measure::Dice, 0.4).unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].id, 0);
    assert!((matches[0].score - 1.0).abs() < 1e-12);
    assert_eq!(matches[1].id, 1);
    assert!((matches[1].score - 6.0 / 14.0).abs() < 1e-12);
}

#[test]
fn test_overlap_full_containment() {
    let db = build_db::<u8>(&["ab", "abc", "xy"], &config(2, false));
    let reader = Reader::<u8>::open(&db.path).unwrap();

    assert_eq!(
        reader.retrieve("ab", Measure::Overlap, 1.0).unwrap(),
        vec!["ab", "abc"]
    );
}

#[test]
fn test_duplicates_are_returned_twice() {
    let db = build_db::<u8>(&["night", "day", "night"], &IndexConfig::default());
    let reader = Reader::<u8>::open(&db.path).unwrap();

    let matches = reader.retrieve_scored("night", Measure::Exact, 0.0).unwrap();
    let ids: Vec<u32> = matches.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![0, 2]);
}

#[test]
fn test_empty_string_is_retrievable() {
    let db = build_db::<u8>(&["", "a"], &IndexConfig::default());
    let reader = Reader::<u8>::open(&db.path).unwrap();

    assert_eq!(reader.retrieve("", Measure::Exact, 0.0).unwrap(), vec![""]);
}

#[test]
fn test_results_ordered_by_size_then_insertion() {
    let words = ["nightly", "night", "nights", "nigh"];
    let db = build_db::<u8>(&words, &IndexConfig::default());
    let reader = Reader::<u8>::open(&db.path).unwrap();

    // Sizes with n = 3 and marks: nigh 6, night 7, nights 8, nightly 9
    assert_eq!(
        reader.retrieve("night", Measure::Cosine, 0.5).unwrap(),
        vec!["nigh", "night", "nights", "nightly"]
    );
}

#[test]
fn test_check_reports_existence() {
    let db = build_db::<u8>(TRIO, &IndexConfig::default());
    let reader = Reader::<u8>::open(&db.path).unwrap();

    assert!(reader.check("nacht", Measure::Exact, 0.0).unwrap());
    assert!(reader.check("nachts", Measure::Jaccard, 0.5).unwrap());
    assert!(!reader.check("zzzzz", Measure::Jaccard, 0.1).unwrap());
}

#[test]
fn test_wide_database() {
    let words = ["café", "cafe", "caffè"];
    let config = IndexConfig {
        char_type: simstr::CharType::Wide,
        ..IndexConfig::default()
    };
    let db = build_db::<char>(&words, &config);
    let reader = Reader::<char>::open(&db.path).unwrap();

    assert_eq!(reader.retrieve("café", Measure::Exact, 0.0).unwrap(), vec!["café"]);
    // café/cafe share $$c, $ca, caf: cosine = 3/6
    assert_eq!(
        reader.retrieve("café", Measure::Cosine, 0.5).unwrap(),
        vec!["café", "cafe"]
    );
}
