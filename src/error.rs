// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types, one enum per phase.
//!
//! Configuration mistakes surface before any file is touched. Build errors are
//! fatal to the writer that raised them (the half-written file is left for the
//! caller to delete). Query errors are fatal to the call that raised them and
//! never touch the database on disk.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::ngram::CharType;

/// Umbrella error for callers that drive several phases.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Invalid configuration values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// n-gram length must be within `1..=MAX_NGRAM_SIZE`.
    #[error("invalid n-gram length: {0} (must be between 1 and 255)")]
    InvalidNgramSize(usize),

    /// Threshold outside `[0, 1]`, or NaN.
    #[error("invalid threshold: {0} (must be within [0, 1])")]
    InvalidThreshold(f64),

    #[error("unknown similarity measure: {0:?} (expected exact, dice, cosine, jaccard or overlap)")]
    UnknownMeasure(String),

    #[error("unknown character type: {0:?} (expected char or wchar)")]
    UnknownCharType(String),

    /// The configured granularity does not match the code unit the engine
    /// was instantiated with.
    #[error("character type mismatch: configured {configured}, engine uses {engine}")]
    CharTypeMismatch {
        configured: CharType,
        engine: CharType,
    },
}

/// Failures while building a database.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Finalized databases are immutable.
    #[error("database {0} is already finalized; remove it before rebuilding")]
    AlreadyFinalized(PathBuf),

    /// Refuses to truncate a file it did not write.
    #[error("{0} exists and is not a simstr database")]
    NotADatabase(PathBuf),

    /// The writer was already closed.
    #[error("database writer for {0} is closed")]
    Closed(PathBuf),

    /// String identifiers are 32-bit.
    #[error("too many strings: the database holds at most {} entries", u32::MAX)]
    TooManyStrings,

    /// A single database section outgrew its offset width.
    #[error("section {section} too large: {len} bytes")]
    SectionTooLarge { section: &'static str, len: u64 },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures while opening or querying a database.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The build session never reached `close()`.
    #[error("database {0} was never finalized")]
    NotFinalized(PathBuf),

    #[error("character type mismatch: database uses {database}, reader expects {reader}")]
    CharTypeMismatch { database: CharType, reader: CharType },

    #[error("unsupported database version {found} (expected {expected})")]
    UnsupportedVersion { found: u8, expected: u8 },

    /// Structural damage: bad magic, truncation, out-of-range offsets,
    /// checksum mismatch.
    #[error("corrupt database: {0}")]
    Corrupt(String),
}

impl QueryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }
}
