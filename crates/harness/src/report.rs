//! Serializable comparison reports.

use crate::runner::Comparison;
use crate::sample::{BenchmarkSample, SampleStatistics};
use crate::verdict::ComparisonVerdict;
use crate::verify::VerificationResult;
use kernelduel_kernels::{KernelKind, MultiplyStrategy};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideReport {
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<MultiplyStrategy>,
    pub statistics: SampleStatistics,
    pub sample: BenchmarkSample,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub kernel: KernelKind,
    pub iterations: usize,
    pub a: SideReport,
    pub b: SideReport,
    pub verdict: ComparisonVerdict,
    pub outputs_agree: bool,
    pub verification: VerificationResult,
}

impl From<&Comparison> for ComparisonReport {
    fn from(comparison: &Comparison) -> Self {
        let side = |provider: &str, strategy, sample: &BenchmarkSample| SideReport {
            provider: provider.to_string(),
            strategy,
            statistics: sample.statistics(),
            sample: sample.clone(),
        };
        let (strategy_a, strategy_b) = comparison.strategies.unzip();

        Self {
            kernel: comparison.kernel,
            iterations: comparison.iterations,
            a: side(&comparison.provider_a, strategy_a, &comparison.sample_a),
            b: side(&comparison.provider_b, strategy_b, &comparison.sample_b),
            verdict: comparison.verdict,
            outputs_agree: comparison.verification.passed(),
            verification: comparison.verification.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub generated_at_unix_ms: u128,
    pub comparisons: Vec<ComparisonReport>,
}

impl SuiteReport {
    pub fn new(comparisons: &[Comparison]) -> Self {
        let generated_at_unix_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|_| Duration::from_secs(0))
            .as_millis();

        Self {
            generated_at_unix_ms,
            comparisons: comparisons.iter().map(ComparisonReport::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::Winner;

    fn comparison() -> Comparison {
        let sample_a = BenchmarkSample::from_millis(vec![10.0, 10.0]);
        let sample_b = BenchmarkSample::from_millis(vec![5.0, 5.0]);
        Comparison {
            kernel: KernelKind::Matrix,
            provider_a: "reference".into(),
            provider_b: "optimized".into(),
            strategies: Some((MultiplyStrategy::Naive, MultiplyStrategy::Optimized)),
            iterations: 2,
            verdict: ComparisonVerdict::from_samples(&sample_a, &sample_b),
            sample_a,
            sample_b,
            verification: VerificationResult::Passed {
                max_abs_error: 0.0,
                max_rel_error: 0.0,
            },
        }
    }

    #[test]
    fn report_carries_statistics_and_verdict() {
        let report = ComparisonReport::from(&comparison());
        assert_eq!(report.a.statistics.runs, 2);
        assert_eq!(report.b.strategy, Some(MultiplyStrategy::Optimized));
        assert_eq!(report.verdict.winner, Winner::B);
        assert!(report.outputs_agree);
    }

    #[test]
    fn suite_report_json_shape() {
        let report = SuiteReport::new(&[comparison()]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["comparisons"][0]["kernel"], "matrix");
        assert_eq!(json["comparisons"][0]["a"]["strategy"], "naive");
        assert_eq!(json["comparisons"][0]["verdict"]["winner"], "b");
        assert!(json["generated_at_unix_ms"].as_u64().is_some());
    }
}
