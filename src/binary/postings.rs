// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Posting list encoding.
//!
//! A posting list is the ascending list of string ids that contain one n-gram
//! key within one length-group. Ids are assigned in insertion order, so every
//! list is already sorted when it is written and delta encoding is free.
//! If strings 100, 102, 105, 110 contain "nig", we store [100, 2, 3, 5].
//!
//! # References
//!
//! - **Delta Encoding for Postings**: Zobel & Moffat (2006): "Inverted Files
//!   for Text Search Engines", ACM Computing Surveys.

use std::io;

use super::encoding::{decode_varint, encode_varint};
use super::header::MAX_POSTING_SIZE;

/// Encode a sorted posting list with delta+varint compression
///
/// Format:
/// - doc_freq: varint
/// - For each id (ascending): delta from the previous id, varint
pub fn encode_postings(ids: &[u32], buf: &mut Vec<u8>) {
    debug_assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids must be strictly ascending");
    encode_varint(ids.len() as u64, buf);

    let mut prev = 0u32;
    for &id in ids {
        encode_varint(u64::from(id - prev), buf);
        prev = id;
    }
}

/// Decode a posting list, returning (ids, bytes_consumed)
pub fn decode_postings(bytes: &[u8]) -> io::Result<(Vec<u32>, usize)> {
    let (doc_freq, mut pos) = decode_varint(bytes)?;
    let doc_freq = doc_freq as usize;

    if doc_freq > MAX_POSTING_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Posting list too large: {} (max {})", doc_freq, MAX_POSTING_SIZE),
        ));
    }
    // Every delta needs at least one byte
    if doc_freq > bytes.len() - pos {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Posting list claims {} entries in {} bytes", doc_freq, bytes.len() - pos),
        ));
    }

    let mut ids = Vec::with_capacity(doc_freq);
    let mut prev = 0u64;

    for i in 0..doc_freq {
        let (delta, consumed) = decode_varint(&bytes[pos..])?;
        pos += consumed;
        if i > 0 && delta == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Posting list is not strictly ascending",
            ));
        }
        let id = prev
            .checked_add(delta)
            .and_then(|id| u32::try_from(id).ok())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Posting id {} + {} overflows u32", prev, delta),
                )
            })?;
        ids.push(id);
        prev = u64::from(id);
    }

    Ok((ids, pos))
}
