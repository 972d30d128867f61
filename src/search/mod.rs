// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Retrieval: from a decomposed query to scored matches.
//!
//! The measure bounds which length-groups can hold a match at all. Each group
//! in that range is an independent CPMerge over the query's posting lists
//! inside it, so with the `parallel` feature the groups fan out over the rayon
//! pool. Results are concatenated in group order, which keeps the output
//! deterministic regardless of scheduling.

mod cpmerge;

pub use cpmerge::{cpmerge, Candidate};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::binary::GroupEntry;
use crate::error::QueryError;
use crate::measure::Measure;
use crate::store::Store;

/// One retrieved string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Insertion-order identifier
    pub id: u32,
    pub score: f64,
}

/// A decomposed query, ready to run against one database.
pub(crate) struct Query<'a> {
    pub text: &'a str,
    /// One key per query n-gram
    pub keys: Vec<Vec<u8>>,
    pub measure: Measure,
    pub threshold: f64,
}

impl Query<'_> {
    fn groups<'s>(&self, store: &'s Store) -> &'s [GroupEntry] {
        let (lo, hi) = self
            .measure
            .feasible_length_range(self.keys.len(), self.threshold);
        let groups = store.groups_in(lo, hi);
        tracing::debug!(
            query = self.text,
            measure = %self.measure,
            threshold = self.threshold,
            ngrams = self.keys.len(),
            lo,
            hi,
            groups = groups.len(),
            "length range"
        );
        groups
    }

    /// Every match, ascending by group size then id.
    pub fn run(&self, store: &Store) -> Result<Vec<Match>, QueryError> {
        let groups = self.groups(store);

        #[cfg(feature = "parallel")]
        let per_group: Vec<Vec<Match>> = groups
            .par_iter()
            .map(|group| self.search_group(store, group))
            .collect::<Result<_, _>>()?;

        #[cfg(not(feature = "parallel"))]
        let per_group: Vec<Vec<Match>> = groups
            .iter()
            .map(|group| self.search_group(store, group))
            .collect::<Result<_, _>>()?;

        Ok(per_group.into_iter().flatten().collect())
    }

    /// Whether any match exists. Groups are tried in order and the first hit
    /// ends the search.
    pub fn any(&self, store: &Store) -> Result<bool, QueryError> {
        for group in self.groups(store) {
            if !self.search_group(store, group)?.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn search_group(&self, store: &Store, group: &GroupEntry) -> Result<Vec<Match>, QueryError> {
        let q = self.keys.len();
        let x = group.size as usize;
        let tau = self.measure.min_overlap(q, x, self.threshold);
        if tau > q.min(x) {
            return Ok(Vec::new());
        }

        let lists = self
            .keys
            .iter()
            .map(|key| store.lookup(group, key))
            .collect::<Result<Vec<_>, _>>()?;
        let doc_freqs: Vec<u32> = lists.iter().map(|l| l.map_or(0, |l| l.doc_freq)).collect();

        let candidates = cpmerge(&doc_freqs, tau, |i| match lists[i] {
            Some(list) => store.postings(list),
            None => Ok(Vec::new()),
        })?;

        let mut matches = Vec::with_capacity(candidates.len());
        for c in &candidates {
            if !self.measure.satisfies(q, x, c.overlap, self.threshold) {
                continue;
            }
            if self.measure == Measure::Exact && store.string(c.id)? != self.text {
                continue;
            }
            matches.push(Match {
                id: c.id,
                score: self.measure.score(q, x, c.overlap),
            });
        }

        tracing::debug!(
            size = group.size,
            tau,
            candidates = candidates.len(),
            matches = matches.len(),
            "searched group"
        );
        Ok(matches)
    }
}
