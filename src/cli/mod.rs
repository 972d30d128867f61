// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the simstr command-line interface.
//!
//! Three subcommands: `build` reads strings from stdin into a new database,
//! `query` answers similarity queries read line by line from stdin, and
//! `inspect` describes a database without caring how it was built. Every
//! option can also come from a `SIMSTR_*` environment variable.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use simstr::{CharType, Measure, DEFAULT_NGRAM_SIZE, DEFAULT_THRESHOLD};

#[derive(Parser)]
#[command(
    name = "simstr",
    about = "Approximate string retrieval over character n-grams",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a database from strings on stdin, one per line
    Build {
        /// Database file to create
        #[arg(short, long, env = "SIMSTR_DB")]
        database: PathBuf,

        /// Length of character n-grams
        #[arg(short, long, default_value_t = DEFAULT_NGRAM_SIZE, env = "SIMSTR_NGRAM")]
        ngram: usize,

        /// Code unit: `char` (UTF-8 bytes) or `wchar` (Unicode scalar values)
        #[arg(short = 'c', long, default_value_t = CharType::Narrow, env = "SIMSTR_CHAR_TYPE")]
        char_type: CharType,

        /// Do not pad strings with begin/end marks
        #[arg(long, env = "SIMSTR_NO_MARKS")]
        no_marks: bool,
    },

    /// Retrieve similar strings for each query line read from stdin
    Query {
        /// Database file to search
        #[arg(short, long, env = "SIMSTR_DB")]
        database: PathBuf,

        /// Code unit; defaults to whatever the database was built with
        #[arg(short = 'c', long, env = "SIMSTR_CHAR_TYPE")]
        char_type: Option<CharType>,

        /// Similarity measure: exact, dice, cosine, jaccard, overlap
        #[arg(short = 's', long, default_value_t = Measure::Exact, env = "SIMSTR_MEASURE")]
        measure: Measure,

        /// Similarity threshold in [0, 1]
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD, env = "SIMSTR_THRESHOLD")]
        threshold: f64,

        /// Print the score next to each string
        #[arg(long)]
        scores: bool,
    },

    /// Inspect a database file
    Inspect {
        /// Path to the database
        database: PathBuf,

        /// Also recompute the checksum
        #[arg(long)]
        verify: bool,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}
