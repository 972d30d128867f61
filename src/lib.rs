// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Approximate string retrieval over character n-grams.
//!
//! Build a database of strings once, then ask for every stored string whose
//! n-gram similarity to a query reaches a threshold. Retrieval uses CPMerge
//! (Okazaki & Tsujii, 2010): strings are grouped by n-gram count, the measure
//! bounds which groups can match, and a τ-overlap join over posting lists
//! finds the candidates without scanning the collection.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  ngram.rs   │────▶│  writer.rs   │────▶│  binary/    │
//! │ (n-grams,   │     │ (insert,     │     │ (format,    │
//! │  keys)      │     │  close)      │     │  codecs)    │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!        │                                        │
//!        ▼                                        ▼
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ measure.rs  │────▶│  search/     │◀────│  store.rs   │
//! │ (bounds, τ) │     │ (CPMerge)    │     │ (mmap view) │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌──────────────┐
//!                     │  reader.rs   │
//!                     └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use simstr::{IndexConfig, Measure, Reader, Writer};
//!
//! let mut writer = Writer::<u8>::create("names.db", &IndexConfig::default())?;
//! for name in ["night", "nacht", "natch"] {
//!     writer.insert(name)?;
//! }
//! writer.close()?;
//!
//! let reader = Reader::<u8>::open("names.db")?;
//! let hits = reader.retrieve("nigth", Measure::Cosine, 0.4)?;
//! # Ok::<(), simstr::Error>(())
//! ```

pub mod binary;
pub mod config;
pub mod error;
pub mod measure;
pub mod ngram;
pub mod reader;
pub mod search;
pub mod store;
pub mod writer;

pub use config::{IndexConfig, QueryConfig};
pub use error::{BuildError, ConfigError, Error, QueryError};
pub use measure::{Measure, DEFAULT_THRESHOLD};
pub use ngram::{CharType, CodeUnit, Ngram, NgramGenerator, DEFAULT_NGRAM_SIZE};
pub use reader::Reader;
pub use search::Match;
pub use store::{inspect, DatabaseInfo, GroupInfo, ListRef, Store};
pub use writer::Writer;
