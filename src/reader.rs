// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Typed query handle over a finalized database.

use std::marker::PhantomData;
use std::path::Path;

use crate::error::QueryError;
use crate::measure::Measure;
use crate::ngram::{CodeUnit, NgramGenerator};
use crate::search::{Match, Query};
use crate::store::{DatabaseInfo, Store};

/// Read handle for a database built over code unit `C`.
///
/// The n-gram generator is rebuilt from the header, so queries are always
/// decomposed exactly like the stored strings were. All methods take `&self`;
/// share a `Reader` across threads freely.
pub struct Reader<C: CodeUnit> {
    store: Store,
    generator: NgramGenerator,
    _unit: PhantomData<C>,
}

impl<C: CodeUnit> Reader<C> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, QueryError> {
        Self::from_store(Store::open(path)?)
    }

    /// Wrap an already opened store, checking its granularity.
    pub fn from_store(store: Store) -> Result<Self, QueryError> {
        let header = store.header();
        if header.char_type != C::CHAR_TYPE {
            return Err(QueryError::CharTypeMismatch {
                database: header.char_type,
                reader: C::CHAR_TYPE,
            });
        }
        let generator = NgramGenerator::new(header.ngram_size as usize)
            .map_err(|e| QueryError::corrupt(format!("header: {}", e)))?
            .with_boundary_marks(header.flags.boundary_marks());

        tracing::info!(
            path = %store.path().display(),
            strings = store.len(),
            n = generator.n(),
            char_type = %C::CHAR_TYPE,
            "opened database"
        );
        Ok(Self {
            store,
            generator,
            _unit: PhantomData,
        })
    }

    /// Stored strings similar to `query`, ascending by n-gram count then
    /// insertion order.
    pub fn retrieve(
        &self,
        query: &str,
        measure: Measure,
        threshold: f64,
    ) -> Result<Vec<String>, QueryError> {
        self.retrieve_scored(query, measure, threshold)?
            .into_iter()
            .map(|m| self.store.string(m.id).map(str::to_string))
            .collect()
    }

    /// Like `retrieve`, but returns ids and scores instead of text.
    pub fn retrieve_scored(
        &self,
        query: &str,
        measure: Measure,
        threshold: f64,
    ) -> Result<Vec<Match>, QueryError> {
        self.query(query, measure, threshold)?.run(&self.store)
    }

    /// Whether at least one stored string is similar to `query`.
    pub fn check(&self, query: &str, measure: Measure, threshold: f64) -> Result<bool, QueryError> {
        self.query(query, measure, threshold)?.any(&self.store)
    }

    /// Text of the string with identifier `id`.
    pub fn string(&self, id: u32) -> Result<&str, QueryError> {
        self.store.string(id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn generator(&self) -> &NgramGenerator {
        &self.generator
    }

    pub fn info(&self) -> DatabaseInfo {
        self.store.info()
    }

    /// Check the stored checksum against the file contents.
    pub fn verify(&self) -> Result<(), QueryError> {
        self.store.verify()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    fn query<'q>(
        &self,
        text: &'q str,
        measure: Measure,
        threshold: f64,
    ) -> Result<Query<'q>, QueryError> {
        measure.validate_threshold(threshold)?;
        Ok(Query {
            text,
            keys: self.generator.keys::<C>(text),
            measure,
            threshold,
        })
    }
}
