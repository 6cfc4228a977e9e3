//! Timing samples and their summary statistics.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wall-clock time of every call, in milliseconds, in call order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSample {
    pub times_ms: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleStatistics {
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub runs: usize,
}

impl BenchmarkSample {
    pub fn with_capacity(iterations: usize) -> Self {
        Self {
            times_ms: Vec::with_capacity(iterations),
        }
    }

    pub fn from_millis(times_ms: Vec<f64>) -> Self {
        Self { times_ms }
    }

    pub fn record(&mut self, elapsed: Duration) {
        self.times_ms.push(elapsed.as_secs_f64() * 1000.0);
    }

    pub fn len(&self) -> usize {
        self.times_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times_ms.is_empty()
    }

    pub fn mean_ms(&self) -> f64 {
        if self.times_ms.is_empty() {
            return 0.0;
        }
        self.times_ms.iter().sum::<f64>() / self.times_ms.len() as f64
    }

    pub fn min_ms(&self) -> f64 {
        self.times_ms.iter().copied().reduce(f64::min).unwrap_or(0.0)
    }

    pub fn max_ms(&self) -> f64 {
        self.times_ms.iter().copied().reduce(f64::max).unwrap_or(0.0)
    }

    pub fn statistics(&self) -> SampleStatistics {
        SampleStatistics {
            avg_ms: self.mean_ms(),
            min_ms: self.min_ms(),
            max_ms: self.max_ms(),
            runs: self.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn statistics_cover_every_run() {
        let sample = BenchmarkSample::from_millis(vec![4.0, 1.0, 7.0]);
        let stats = sample.statistics();
        assert_relative_eq!(stats.avg_ms, 4.0);
        assert_relative_eq!(stats.min_ms, 1.0);
        assert_relative_eq!(stats.max_ms, 7.0);
        assert_eq!(stats.runs, 3);
    }

    #[test]
    fn durations_are_recorded_in_millis() {
        let mut sample = BenchmarkSample::with_capacity(2);
        sample.record(Duration::from_micros(1500));
        sample.record(Duration::from_millis(2));
        assert_eq!(sample.len(), 2);
        assert_relative_eq!(sample.times_ms[0], 1.5, epsilon = 1e-9);
        assert_relative_eq!(sample.mean_ms(), 1.75, epsilon = 1e-9);
    }

    #[test]
    fn empty_sample_is_all_zero() {
        let stats = BenchmarkSample::default().statistics();
        assert_eq!(stats.avg_ms, 0.0);
        assert_eq!(stats.min_ms, 0.0);
        assert_eq!(stats.runs, 0);
    }
}
