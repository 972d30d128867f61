//! Open/build/close lifecycle and the errors each step can raise.

use crate::common::{build_db, config, write_db, WORDS};
use simstr::{
    inspect, BuildError, CharType, IndexConfig, Measure, QueryError, Reader, Writer,
};
use tempfile::TempDir;

#[test]
fn test_open_missing_database() {
    let dir = TempDir::new().unwrap();
    let result = Reader::<u8>::open(dir.path().join("missing.db"));
    assert!(matches!(result, Err(QueryError::NotFound(_))));
}

#[test]
fn test_open_unfinished_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.db");
    let mut writer = Writer::<u8>::create(&path, &IndexConfig::default()).unwrap();
    writer.insert("night").unwrap();

    // Still building while the writer is alive
    assert!(matches!(
        Reader::<u8>::open(&path),
        Err(QueryError::NotFinalized(_))
    ));
    drop(writer);
    assert!(matches!(
        Reader::<u8>::open(&path),
        Err(QueryError::NotFinalized(_))
    ));
}

#[test]
fn test_char_type_mismatch_on_open() {
    let db = build_db::<u8>(WORDS, &IndexConfig::default());
    assert!(matches!(
        Reader::<char>::open(&db.path),
        Err(QueryError::CharTypeMismatch {
            database: CharType::Narrow,
            reader: CharType::Wide,
        })
    ));
}

#[test]
fn test_finalized_database_is_not_overwritten() {
    let db = build_db::<u8>(&["night"], &IndexConfig::default());
    assert!(matches!(
        Writer::<u8>::create(&db.path, &IndexConfig::default()),
        Err(BuildError::AlreadyFinalized(_))
    ));

    // Original contents are intact
    let reader = Reader::<u8>::open(&db.path).unwrap();
    assert_eq!(reader.len(), 1);
    assert_eq!(reader.string(0).unwrap(), "night");
}

#[test]
fn test_closed_writer_rejects_everything() {
    let dir = TempDir::new().unwrap();
    let mut writer = Writer::<u8>::create(dir.path().join("db"), &IndexConfig::default()).unwrap();
    writer.close().unwrap();
    assert!(matches!(writer.insert("x"), Err(BuildError::Closed(_))));
    assert!(matches!(writer.close(), Err(BuildError::Closed(_))));
}

#[test]
fn test_empty_database() {
    let db = build_db::<u8>(&[], &IndexConfig::default());
    let reader = Reader::<u8>::open(&db.path).unwrap();

    assert!(reader.is_empty());
    for measure in Measure::ALL {
        assert!(reader.retrieve("night", measure, 0.5).unwrap().is_empty());
    }
    reader.verify().unwrap();
}

#[test]
fn test_reader_uses_build_configuration() {
    // Marks off and bigrams: "ab" vs "abc" fully overlap
    let db = build_db::<u8>(&["ab", "abc", "xy"], &config(2, false));
    let reader = Reader::<u8>::open(&db.path).unwrap();

    assert_eq!(reader.generator().n(), 2);
    assert!(!reader.generator().boundary_marks());
    assert_eq!(reader.retrieve("abc", Measure::Overlap, 1.0).unwrap(), vec!["ab", "abc"]);
}

#[test]
fn test_strings_by_id() {
    let db = build_db::<u8>(WORDS, &IndexConfig::default());
    let reader = Reader::<u8>::open(&db.path).unwrap();

    assert_eq!(reader.len(), WORDS.len());
    for (id, word) in WORDS.iter().enumerate() {
        assert_eq!(reader.string(id as u32).unwrap(), *word);
    }
    assert!(matches!(
        reader.string(WORDS.len() as u32),
        Err(QueryError::Corrupt(_))
    ));
}

#[test]
fn test_inspect_describes_database() {
    let config = IndexConfig {
        ngram_size: 2,
        char_type: CharType::Wide,
        boundary_marks: false,
    };
    let db = build_db::<char>(&["ab", "abc", "abcd", "xy"], &config);
    let info = inspect(&db.path, true).unwrap();

    assert_eq!(info.char_type, CharType::Wide);
    assert_eq!(info.ngram_size, 2);
    assert!(!info.boundary_marks);
    assert_eq!(info.string_count, 4);
    assert_eq!(info.file_size, std::fs::metadata(&db.path).unwrap().len());

    let sizes: Vec<(u32, u32)> = info.groups.iter().map(|g| (g.size, g.ngrams)).collect();
    // size 1: ab, xy; size 2: ab, bc; size 3: ab, bc, cd
    assert_eq!(sizes, vec![(1, 2), (2, 2), (3, 3)]);

    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["char_type"], "wide");
    assert_eq!(json["string_count"], 4);
}

#[test]
fn test_rebuild_after_abandoned_build() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db");
    {
        let mut writer = Writer::<u8>::create(&path, &IndexConfig::default()).unwrap();
        writer.insert("abandoned").unwrap();
    }
    write_db::<u8>(&path, &["fresh"], &IndexConfig::default());

    let reader = Reader::<u8>::open(&path).unwrap();
    assert_eq!(reader.len(), 1);
    assert_eq!(reader.retrieve("fresh", Measure::Exact, 0.0).unwrap(), vec!["fresh"]);
}
