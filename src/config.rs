// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build-time and query-time settings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::measure::{Measure, DEFAULT_THRESHOLD};
use crate::ngram::{CharType, NgramGenerator, DEFAULT_NGRAM_SIZE};

/// How a database is built. Persisted in its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub ngram_size: usize,
    pub char_type: CharType,
    pub boundary_marks: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            ngram_size: DEFAULT_NGRAM_SIZE,
            char_type: CharType::default(),
            boundary_marks: true,
        }
    }
}

impl IndexConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generator().map(|_| ())
    }

    /// Generator matching this configuration.
    pub fn generator(&self) -> Result<NgramGenerator, ConfigError> {
        Ok(NgramGenerator::new(self.ngram_size)?.with_boundary_marks(self.boundary_marks))
    }
}

/// How a query is scored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub measure: Measure,
    pub threshold: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            measure: Measure::default(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl QueryConfig {
    pub fn new(measure: Measure, threshold: f64) -> Result<Self, ConfigError> {
        let config = Self { measure, threshold };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.measure.validate_threshold(self.threshold)
    }
}
