//! Turning two timing samples into a winner.

use crate::sample::BenchmarkSample;
use serde::{Deserialize, Serialize};

/// Relative difference, in percent, below which neither side wins.
pub const TIE_THRESHOLD_PERCENT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    A,
    B,
    Tie,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonVerdict {
    pub winner: Winner,
    /// `(avg_a - avg_b) / avg_a * 100`; positive means B was faster.
    pub percent_difference: f64,
    /// Slower average divided by faster average.
    pub speedup: f64,
}

impl ComparisonVerdict {
    pub fn from_averages(avg_a: f64, avg_b: f64) -> Self {
        let percent_difference = if avg_a > 0.0 {
            (avg_a - avg_b) / avg_a * 100.0
        } else if avg_b > 0.0 {
            f64::NEG_INFINITY
        } else {
            0.0
        };

        let (slower, faster) = if avg_a >= avg_b {
            (avg_a, avg_b)
        } else {
            (avg_b, avg_a)
        };
        let speedup = if faster > 0.0 {
            slower / faster
        } else if slower > 0.0 {
            f64::INFINITY
        } else {
            1.0
        };

        let winner = if percent_difference.abs() < TIE_THRESHOLD_PERCENT {
            Winner::Tie
        } else if avg_b < avg_a {
            Winner::B
        } else {
            Winner::A
        };

        Self {
            winner,
            percent_difference,
            speedup,
        }
    }

    pub fn from_samples(sample_a: &BenchmarkSample, sample_b: &BenchmarkSample) -> Self {
        Self::from_averages(sample_a.mean_ms(), sample_b.mean_ms())
    }

    pub fn is_tie(&self) -> bool {
        self.winner == Winner::Tie
    }
}
