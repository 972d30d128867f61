//! One reader shared across threads.

use std::sync::Arc;
use std::thread;

use crate::common::{build_db, WORDS};
use simstr::{IndexConfig, Measure, Reader};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_reader_is_send_and_sync() {
    assert_send_sync::<Reader<u8>>();
    assert_send_sync::<Reader<char>>();
}

#[test]
fn test_concurrent_queries_agree() {
    let db = build_db::<u8>(WORDS, &IndexConfig::default());
    let reader = Arc::new(Reader::<u8>::open(&db.path).unwrap());
    let queries = ["night", "eight", "nightingale", "tight", "ab"];

    let expected: Vec<Vec<String>> = queries
        .iter()
        .map(|q| reader.retrieve(q, Measure::Cosine, 0.5).unwrap())
        .collect();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let reader = Arc::clone(&reader);
            thread::spawn(move || {
                (0..50)
                    .map(|i| {
                        let q = queries[(t + i) % queries.len()];
                        ((t + i) % queries.len(), reader.retrieve(q, Measure::Cosine, 0.5).unwrap())
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for (idx, result) in handle.join().unwrap() {
            assert_eq!(result, expected[idx]);
        }
    }
}

#[test]
fn test_independent_readers_on_one_file() {
    let db = build_db::<u8>(WORDS, &IndexConfig::default());
    let path = db.path.clone();

    let results: Vec<Vec<String>> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    let reader = Reader::<u8>::open(&path).unwrap();
                    reader.retrieve("nights", Measure::Jaccard, 0.4).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for r in &results {
        assert_eq!(r, &results[0]);
        assert!(r.iter().any(|s| s == "nights"));
    }
}
