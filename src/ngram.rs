// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Character n-gram decomposition.
//!
//! A string becomes the ordered list of its overlapping windows of `n` code
//! units. With boundary marks on, `n - 1` marks (`0x01`) are added at both ends
//! so the first and last characters get windows of their own and a string of
//! length `L` yields exactly `L + n - 1` n-grams.
//!
//! Similarity is defined over n-gram *multisets*. Rather than carrying counts
//! around, each repetition of a window is tagged with its occurrence ordinal:
//! in "banana" with n = 2, "an" appears as `(an, 0)` and `(an, 1)`. Two strings
//! then share `min(a, b)` tagged copies of a window that occurs `a` and `b`
//! times, which is exactly the multiset intersection, and a plain set of keys
//! per posting list does the rest.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::binary::encode_varint;
use crate::error::ConfigError;

/// Default n-gram length.
pub const DEFAULT_NGRAM_SIZE: usize = 3;

/// Longest supported n-gram.
pub const MAX_NGRAM_SIZE: usize = 255;

// ============================================================================
// CODE UNITS
// ============================================================================

/// Character granularity of a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharType {
    /// UTF-8 bytes.
    #[default]
    Narrow,
    /// Unicode scalar values.
    Wide,
}

impl CharType {
    pub(crate) const fn tag(self) -> u8 {
        match self {
            Self::Narrow => 0,
            Self::Wide => 1,
        }
    }

    pub(crate) const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Narrow),
            1 => Some(Self::Wide),
            _ => None,
        }
    }
}

impl fmt::Display for CharType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Narrow => "char",
            Self::Wide => "wchar",
        })
    }
}

impl FromStr for CharType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "char" | "narrow" => Ok(Self::Narrow),
            "wchar" | "wide" => Ok(Self::Wide),
            _ => Err(ConfigError::UnknownCharType(s.to_string())),
        }
    }
}

/// A unit of text the engine slides its window over.
///
/// The granularity is fixed per database: a database built over `u8` can only
/// be opened by a `Reader<u8>`.
pub trait CodeUnit: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + 'static {
    /// Tag persisted in the database header.
    const CHAR_TYPE: CharType;

    /// Boundary mark used for padding.
    const MARK: Self;

    /// Split a string into code units.
    fn decompose(s: &str) -> Vec<Self>;

    /// Append the key encoding of this unit. Must be prefix-free.
    fn encode(self, buf: &mut Vec<u8>);
}

impl CodeUnit for u8 {
    const CHAR_TYPE: CharType = CharType::Narrow;
    const MARK: Self = 0x01;

    fn decompose(s: &str) -> Vec<Self> {
        s.as_bytes().to_vec()
    }

    #[inline]
    fn encode(self, buf: &mut Vec<u8>) {
        buf.push(self);
    }
}

impl CodeUnit for char {
    const CHAR_TYPE: CharType = CharType::Wide;
    const MARK: Self = '\u{1}';

    fn decompose(s: &str) -> Vec<Self> {
        s.chars().collect()
    }

    #[inline]
    fn encode(self, buf: &mut Vec<u8>) {
        let mut tmp = [0u8; 4];
        buf.extend_from_slice(self.encode_utf8(&mut tmp).as_bytes());
    }
}

// ============================================================================
// N-GRAMS
// ============================================================================

/// One window of a string, tagged with how many identical windows precede it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ngram<C> {
    pub units: Vec<C>,
    pub occurrence: u32,
}

impl<C: CodeUnit> Ngram<C> {
    /// Storage key: the encoded units followed by the occurrence as a varint.
    ///
    /// Units have a fixed count and a prefix-free encoding, so the key is
    /// unambiguous.
    pub fn key(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.units.len() + 1);
        for &unit in &self.units {
            unit.encode(&mut buf);
        }
        encode_varint(u64::from(self.occurrence), &mut buf);
        buf
    }
}

/// Splits strings into tagged n-grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NgramGenerator {
    n: usize,
    boundary_marks: bool,
}

impl NgramGenerator {
    /// Generator for windows of `n` units, with boundary marks on.
    pub fn new(n: usize) -> Result<Self, ConfigError> {
        if n == 0 || n > MAX_NGRAM_SIZE {
            return Err(ConfigError::InvalidNgramSize(n));
        }
        Ok(Self {
            n,
            boundary_marks: true,
        })
    }

    pub fn with_boundary_marks(mut self, yes: bool) -> Self {
        self.boundary_marks = yes;
        self
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn boundary_marks(&self) -> bool {
        self.boundary_marks
    }

    /// Decompose `s` into its n-grams, in window order.
    ///
    /// Never empty: a sequence shorter than `n` is right-padded with marks.
    pub fn generate<C: CodeUnit>(&self, s: &str) -> Vec<Ngram<C>> {
        let n = self.n;
        let units = C::decompose(s);

        let mut src = Vec::with_capacity(units.len() + 2 * (n - 1));
        if self.boundary_marks {
            src.extend(std::iter::repeat(C::MARK).take(n - 1));
            src.extend_from_slice(&units);
            src.extend(std::iter::repeat(C::MARK).take(n - 1));
        } else {
            src.extend_from_slice(&units);
        }
        if src.len() < n {
            src.resize(n, C::MARK);
        }

        let mut seen: HashMap<&[C], u32> = HashMap::new();
        src.windows(n)
            .map(|window| {
                let count = seen.entry(window).or_insert(0);
                let occurrence = *count;
                *count += 1;
                Ngram {
                    units: window.to_vec(),
                    occurrence,
                }
            })
            .collect()
    }

    /// Storage keys for `s`, one per n-gram.
    pub fn keys<C: CodeUnit>(&self, s: &str) -> Vec<Vec<u8>> {
        self.generate::<C>(s).iter().map(Ngram::key).collect()
    }
}

impl Default for NgramGenerator {
    fn default() -> Self {
        Self {
            n: DEFAULT_NGRAM_SIZE,
            boundary_marks: true,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
