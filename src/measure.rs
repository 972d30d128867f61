// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Similarity measures and the bounds CPMerge prunes with.
//!
//! Every measure is a function of three numbers: the query's n-gram count
//! `q`, the candidate's count `x`, and their overlap `o`. Two bounds fall out
//! of each formula:
//!
//! - **Length range**: set `o = min(q, x)` (the best any candidate can do)
//!   and solve for `x`. Candidates outside the range cannot reach the
//!   threshold no matter what they contain.
//! - **Minimum overlap** (τ): fix `q` and `x`, solve for `o`.
//!
//! | Measure | Score                  | x range                         | τ                      |
//! |---------|------------------------|---------------------------------|------------------------|
//! | Exact   | `q == x && o == q`     | `[q, q]`                        | `q`                    |
//! | Dice    | `2o / (q + x)`         | `[αq / (2-α), (2-α)q / α]`      | `α(q + x) / 2`         |
//! | Cosine  | `o / √(qx)`            | `[α²q, q / α²]`                 | `α√(qx)`               |
//! | Jaccard | `o / (q + x - o)`      | `[αq, q / α]`                   | `α(q + x) / (1 + α)`   |
//! | Overlap | `o / min(q, x)`        | `[1, ∞)`                        | `α·min(q, x)`          |
//!
//! Bounds are widened by a small epsilon before rounding so floating-point
//! noise can only loosen them, never cut off a true match.
//!
//! # References
//!
//! - Okazaki & Tsujii (2010): "Simple and Efficient Algorithm for Approximate
//!   Dictionary Matching", COLING 2010.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default similarity threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Relative slack applied to bounds before rounding.
const BOUND_EPSILON: f64 = 1e-6;

/// Slack applied to the final score comparison.
const SCORE_EPSILON: f64 = 1e-9;

/// Set-similarity measure over n-gram multisets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    /// Identical strings only; the threshold is ignored.
    #[default]
    Exact,
    Dice,
    Cosine,
    Jaccard,
    /// Overlap normalized by the smaller set: `o / min(q, x)`.
    Overlap,
}

impl Measure {
    pub const ALL: [Measure; 5] = [
        Measure::Exact,
        Measure::Dice,
        Measure::Cosine,
        Measure::Jaccard,
        Measure::Overlap,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Dice => "dice",
            Self::Cosine => "cosine",
            Self::Jaccard => "jaccard",
            Self::Overlap => "overlap",
        }
    }

    /// Reject thresholds outside `[0, 1]`. Exact accepts anything.
    pub fn validate_threshold(self, threshold: f64) -> Result<(), ConfigError> {
        if self == Self::Exact || (0.0..=1.0).contains(&threshold) {
            Ok(())
        } else {
            Err(ConfigError::InvalidThreshold(threshold))
        }
    }

    /// Similarity score in `[0, 1]`.
    pub fn score(self, q: usize, x: usize, overlap: usize) -> f64 {
        if q == 0 || x == 0 {
            return 0.0;
        }
        let (qf, xf, of) = (q as f64, x as f64, overlap as f64);
        match self {
            Self::Exact => {
                if q == x && overlap == q {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Dice => 2.0 * of / (qf + xf),
            Self::Cosine => of / (qf * xf).sqrt(),
            Self::Jaccard => of / (qf + xf - of),
            Self::Overlap => of / q.min(x) as f64,
        }
    }

    /// Whether a candidate with these counts qualifies.
    pub fn satisfies(self, q: usize, x: usize, overlap: usize, threshold: f64) -> bool {
        match self {
            Self::Exact => q == x && overlap == q,
            _ => self.score(q, x, overlap) + SCORE_EPSILON >= threshold,
        }
    }

    /// Inclusive range of candidate n-gram counts that could reach `threshold`.
    pub fn feasible_length_range(self, q: usize, threshold: f64) -> (usize, usize) {
        let qf = q as f64;
        let a = threshold;
        let (lo, hi) = match self {
            Self::Exact => return (q, q),
            Self::Dice => (a * qf / (2.0 - a), (2.0 - a) * qf / a),
            Self::Cosine => (a * a * qf, qf / (a * a)),
            Self::Jaccard => (a * qf, qf / a),
            Self::Overlap => (1.0, f64::INFINITY),
        };
        (ceil_loose(lo).max(1), floor_loose(hi))
    }

    /// Minimum overlap (τ) a candidate of size `x` needs. At least 1.
    pub fn min_overlap(self, q: usize, x: usize, threshold: f64) -> usize {
        let (qf, xf) = (q as f64, x as f64);
        let a = threshold;
        let tau = match self {
            Self::Exact => return q.max(1),
            Self::Dice => 0.5 * a * (qf + xf),
            Self::Cosine => a * (qf * xf).sqrt(),
            Self::Jaccard => a * (qf + xf) / (1.0 + a),
            Self::Overlap => a * q.min(x) as f64,
        };
        ceil_loose(tau).max(1)
    }
}

fn ceil_loose(v: f64) -> usize {
    (v - BOUND_EPSILON * v.abs().max(1.0)).ceil().max(0.0) as usize
}

// NaN and infinity saturate through `as`.
fn floor_loose(v: f64) -> usize {
    if v.is_nan() {
        return usize::MAX;
    }
    (v + BOUND_EPSILON * v.abs().max(1.0)).floor() as usize
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Measure {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == lower)
            .ok_or_else(|| ConfigError::UnknownMeasure(s.to_string()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
