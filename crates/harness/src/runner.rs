//! Sequential A-then-B comparison protocol.

use crate::error::{HarnessError, HarnessResult, Side};
use crate::input::{KernelOutput, PreparedInput};
use crate::params::KernelParams;
use crate::sample::BenchmarkSample;
use crate::verdict::ComparisonVerdict;
use crate::verify::{VerificationResult, Verifier};
use kernelduel_kernels::{
    DynKernelProvider, KernelKind, KernelProvider, MultiplyStrategy, ProviderRegistry,
};
use serde::{Deserialize, Serialize};
use std::hint::black_box;
use std::time::Instant;
use tracing::{debug, info};

/// Boundaries at which an observer may be given control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    GenerateInput,
    Run(Side),
    Aggregate,
}

/// Cooperative scheduling point between phases. Observers see progress but
/// cannot alter inputs, timings or the verdict.
pub trait PhaseObserver {
    fn before_phase(&mut self, kernel: KernelKind, phase: Phase);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PhaseObserver for NoopObserver {
    fn before_phase(&mut self, _kernel: KernelKind, _phase: Phase) {}
}

/// Emits a `debug!` event per phase.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PhaseObserver for TracingObserver {
    fn before_phase(&mut self, kernel: KernelKind, phase: Phase) {
        debug!(%kernel, ?phase, "entering phase");
    }
}

/// Outcome of one comparison run.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub kernel: KernelKind,
    pub provider_a: String,
    pub provider_b: String,
    pub strategies: Option<(MultiplyStrategy, MultiplyStrategy)>,
    pub iterations: usize,
    pub sample_a: BenchmarkSample,
    pub sample_b: BenchmarkSample,
    pub verdict: ComparisonVerdict,
    pub verification: VerificationResult,
}

pub struct ComparisonRunner {
    iterations: usize,
    verifier: Verifier,
}

impl ComparisonRunner {
    pub fn new(iterations: usize) -> HarnessResult<Self> {
        if iterations == 0 {
            return Err(HarnessError::InvalidArgument {
                name: "iterations",
                reason: "must be at least 1".into(),
            });
        }
        Ok(Self {
            iterations,
            verifier: Verifier::new(),
        })
    }

    pub fn with_verifier(mut self, verifier: Verifier) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn run(
        &self,
        provider_a: &dyn KernelProvider,
        provider_b: &dyn KernelProvider,
        params: &KernelParams,
    ) -> HarnessResult<Comparison> {
        self.run_observed(provider_a, provider_b, params, &mut NoopObserver)
    }

    /// Generates the input, times A, times B, then aggregates.
    ///
    /// Any kernel failure aborts the run and is returned as-is; no verdict is
    /// produced for a run in which either side failed or the sides disagreed.
    pub fn run_observed(
        &self,
        provider_a: &dyn KernelProvider,
        provider_b: &dyn KernelProvider,
        params: &KernelParams,
        observer: &mut dyn PhaseObserver,
    ) -> HarnessResult<Comparison> {
        let kernel = params.kind();

        observer.before_phase(kernel, Phase::GenerateInput);
        let input =
            PreparedInput::generate(params).map_err(|source| HarnessError::Input { kernel, source })?;

        let (strategy_a, strategy_b) = match params {
            KernelParams::Matrix(matrix) => (matrix.strategy_a, matrix.strategy_b),
            _ => (MultiplyStrategy::default(), MultiplyStrategy::default()),
        };

        observer.before_phase(kernel, Phase::Run(Side::A));
        let (sample_a, output_a) = self.time_side(Side::A, provider_a, &input, strategy_a)?;

        observer.before_phase(kernel, Phase::Run(Side::B));
        let (sample_b, output_b) = self.time_side(Side::B, provider_b, &input, strategy_b)?;

        observer.before_phase(kernel, Phase::Aggregate);
        let verification = self.verifier.compare(&output_a, &output_b);
        if let VerificationResult::Failed { reason } = &verification {
            return Err(HarnessError::OutputMismatch {
                kernel,
                provider_a: provider_a.name().to_string(),
                provider_b: provider_b.name().to_string(),
                reason: reason.clone(),
            });
        }

        let verdict = ComparisonVerdict::from_samples(&sample_a, &sample_b);
        info!(
            %kernel,
            provider_a = provider_a.name(),
            provider_b = provider_b.name(),
            avg_a_ms = sample_a.mean_ms(),
            avg_b_ms = sample_b.mean_ms(),
            winner = ?verdict.winner,
            percent_difference = verdict.percent_difference,
            "comparison finished"
        );

        Ok(Comparison {
            kernel,
            provider_a: provider_a.name().to_string(),
            provider_b: provider_b.name().to_string(),
            strategies: matches!(kernel, KernelKind::Matrix).then_some((strategy_a, strategy_b)),
            iterations: self.iterations,
            sample_a,
            sample_b,
            verdict,
            verification,
        })
    }

    /// Runs each parameter set in order, stopping at the first failure.
    pub fn run_suite(
        &self,
        provider_a: &dyn KernelProvider,
        provider_b: &dyn KernelProvider,
        suite: &[KernelParams],
        observer: &mut dyn PhaseObserver,
    ) -> HarnessResult<Vec<Comparison>> {
        suite
            .iter()
            .map(|params| self.run_observed(provider_a, provider_b, params, observer))
            .collect()
    }

    /// Calls `provider` exactly `iterations` times, timing each call on its own.
    /// The first output is kept for cross-checking.
    fn time_side(
        &self,
        side: Side,
        provider: &dyn KernelProvider,
        input: &PreparedInput,
        strategy: MultiplyStrategy,
    ) -> HarnessResult<(BenchmarkSample, KernelOutput)> {
        let kernel = input.kind();
        let mut sample = BenchmarkSample::with_capacity(self.iterations);
        let mut first_output = None;

        for _ in 0..self.iterations {
            let start = Instant::now();
            let result = input.execute(provider, strategy);
            let elapsed = start.elapsed();

            let output = result.map_err(|source| HarnessError::Kernel {
                side,
                provider: provider.name().to_string(),
                kernel,
                source,
            })?;
            sample.record(elapsed);

            if first_output.is_none() {
                first_output = Some(output);
            } else {
                drop(black_box(output));
            }
        }

        debug!(
            %kernel,
            %side,
            provider = provider.name(),
            avg_ms = sample.mean_ms(),
            min_ms = sample.min_ms(),
            max_ms = sample.max_ms(),
            "side timed"
        );

        let output = first_output.ok_or_else(|| HarnessError::InvalidArgument {
            name: "iterations",
            reason: "must be at least 1".into(),
        })?;
        Ok((sample, output))
    }
}

pub fn resolve_provider(registry: &ProviderRegistry, name: &str) -> HarnessResult<DynKernelProvider> {
    registry
        .find(name)
        .ok_or_else(|| HarnessError::UnknownProvider {
            name: name.to_string(),
            available: registry.names().join(", "),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{BlurParams, PrimesParams};
    use kernelduel_kernels::{OptimizedKernels, ReferenceKernels};

    #[derive(Default)]
    struct RecordingObserver {
        phases: Vec<Phase>,
    }

    impl PhaseObserver for RecordingObserver {
        fn before_phase(&mut self, _kernel: KernelKind, phase: Phase) {
            self.phases.push(phase);
        }
    }

    #[test]
    fn zero_iterations_are_rejected() {
        assert!(matches!(
            ComparisonRunner::new(0),
            Err(HarnessError::InvalidArgument { name: "iterations", .. })
        ));
    }

    #[test]
    fn every_iteration_is_timed() {
        let runner = ComparisonRunner::new(4).unwrap();
        let params = KernelParams::Primes(PrimesParams {
            limit: 5_000,
            enumerate: false,
        });
        let comparison = runner
            .run(&ReferenceKernels::new(), &OptimizedKernels::new(), &params)
            .unwrap();
        assert_eq!(comparison.sample_a.len(), 4);
        assert_eq!(comparison.sample_b.len(), 4);
        assert!(comparison.verification.passed());
        assert_eq!(comparison.strategies, None);
    }

    #[test]
    fn phases_run_in_protocol_order() {
        let runner = ComparisonRunner::new(1).unwrap();
        let mut observer = RecordingObserver::default();
        let params = KernelParams::Blur(BlurParams {
            width: 16,
            height: 16,
            radius: 1,
        });
        runner
            .run_observed(
                &ReferenceKernels::new(),
                &OptimizedKernels::new(),
                &params,
                &mut observer,
            )
            .unwrap();
        assert_eq!(
            observer.phases,
            vec![
                Phase::GenerateInput,
                Phase::Run(Side::A),
                Phase::Run(Side::B),
                Phase::Aggregate
            ]
        );
    }

    #[test]
    fn unknown_provider_lists_alternatives() {
        let registry = ProviderRegistry::with_default_providers();
        let err = resolve_provider(&registry, "js").err().unwrap();
        assert!(err.to_string().contains("reference, optimized"));
    }
}
