// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CPMerge: τ-overlap join over posting lists.
//!
//! Given the query's posting lists inside one length-group and the minimum
//! overlap τ, find every id that appears in at least τ of them, with its exact
//! count.
//!
//! 1. Order the lists by document frequency, shortest first.
//! 2. Any id reaching τ must appear in at least one of the first `q - τ + 1`
//!    lists (pigeonhole), so merging just those yields a complete candidate
//!    set.
//! 3. Each remaining list is only probed, by binary search, for the
//!    candidates still alive. A candidate whose count plus the number of
//!    unprobed lists falls below τ is dropped.
//! 4. Once no candidate survives, the remaining lists are never loaded.
//!
//! The longest lists, usually the most expensive to decode, are exactly the
//! ones step 4 tends to skip.
//!
//! # References
//!
//! - Okazaki & Tsujii (2010): "Simple and Efficient Algorithm for Approximate
//!   Dictionary Matching", COLING 2010.

/// An id that reached τ, with the number of query lists it appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub id: u32,
    pub overlap: usize,
}

/// Run CPMerge over `doc_freqs.len()` lists.
///
/// `doc_freqs[i]` is the length of list `i`; `load(i)` produces its ids in
/// ascending order. An absent list is simply one with frequency 0. Returns the
/// candidates with `overlap >= tau`, ascending by id.
pub fn cpmerge<E>(
    doc_freqs: &[u32],
    tau: usize,
    mut load: impl FnMut(usize) -> Result<Vec<u32>, E>,
) -> Result<Vec<Candidate>, E> {
    let q = doc_freqs.len();
    if tau == 0 || tau > q {
        return Ok(Vec::new());
    }

    // Stable: equal frequencies keep query order
    let mut order: Vec<usize> = (0..q).collect();
    order.sort_by_key(|&i| doc_freqs[i]);

    let signature = q - tau + 1;
    let mut candidates: Vec<(u32, usize)> = Vec::new();
    for &i in &order[..signature] {
        if doc_freqs[i] == 0 {
            continue;
        }
        let list = load(i)?;
        candidates = merge_counts(&candidates, &list);
    }

    for (step, &i) in order.iter().enumerate().skip(signature) {
        if candidates.is_empty() {
            break;
        }
        // Lists still unprobed after this one
        let remaining = q - step - 1;
        let list = if doc_freqs[i] == 0 {
            Vec::new()
        } else {
            load(i)?
        };
        candidates.retain_mut(|(id, count)| {
            if list.binary_search(id).is_ok() {
                *count += 1;
            }
            *count + remaining >= tau
        });
    }

    Ok(candidates
        .into_iter()
        .filter(|&(_, count)| count >= tau)
        .map(|(id, overlap)| Candidate { id, overlap })
        .collect())
}

/// Merge a sorted id list into sorted `(id, count)` pairs.
fn merge_counts(acc: &[(u32, usize)], list: &[u32]) -> Vec<(u32, usize)> {
    let mut out = Vec::with_capacity(acc.len() + list.len());
    let (mut a, mut b) = (0, 0);
    while a < acc.len() && b < list.len() {
        let (id, count) = acc[a];
        match id.cmp(&list[b]) {
            std::cmp::Ordering::Less => {
                out.push((id, count));
                a += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push((list[b], 1));
                b += 1;
            }
            std::cmp::Ordering::Equal => {
                out.push((id, count + 1));
                a += 1;
                b += 1;
            }
        }
    }
    out.extend_from_slice(&acc[a..]);
    out.extend(list[b..].iter().map(|&id| (id, 1)));
    out
}
