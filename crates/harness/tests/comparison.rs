use anyhow::Result;
use kernelduel_harness::kernels::{
    ComplexViewport, KernelError, KernelKind, KernelProvider, KernelResult, MultiplyStrategy,
    OptimizedKernels, ReferenceKernels, SquareMatrix,
};
use kernelduel_harness::{
    BlurParams, ComparisonReport, ComparisonRunner, HarnessError, KernelParams, MatrixParams,
    PrimesParams, Side, SuiteReport, Winner,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

#[derive(Clone, Copy)]
enum Quirk {
    Sleep(Duration),
    FailPrimes,
    OffByOnePrimes,
}

/// Delegates to the reference kernels but misbehaves in one chosen way.
struct QuirkyKernels {
    quirk: Quirk,
    calls: AtomicUsize,
}

impl QuirkyKernels {
    fn new(quirk: Quirk) -> Self {
        Self {
            quirk,
            calls: AtomicUsize::new(0),
        }
    }

    fn before_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Quirk::Sleep(delay) = self.quirk {
            thread::sleep(delay);
        }
    }
}

impl KernelProvider for QuirkyKernels {
    fn name(&self) -> &'static str {
        "quirky"
    }

    fn module_name(&self) -> &'static str {
        "test double"
    }

    fn render_fractal(&self, viewport: &ComplexViewport) -> KernelResult<Vec<u8>> {
        self.before_call();
        ReferenceKernels.render_fractal(viewport)
    }

    fn count_primes(&self, limit: i64) -> KernelResult<u64> {
        self.before_call();
        match self.quirk {
            Quirk::FailPrimes => Err(KernelError::invalid("limit", "refused by test double")),
            Quirk::OffByOnePrimes => ReferenceKernels.count_primes(limit).map(|n| n + 1),
            Quirk::Sleep(_) => ReferenceKernels.count_primes(limit),
        }
    }

    fn enumerate_primes(&self, limit: i64) -> KernelResult<Vec<u64>> {
        self.before_call();
        ReferenceKernels.enumerate_primes(limit)
    }

    fn multiply_naive(&self, lhs: &[f64], rhs: &[f64], size: usize) -> KernelResult<SquareMatrix> {
        self.before_call();
        ReferenceKernels.multiply_naive(lhs, rhs, size)
    }

    fn multiply_optimized(
        &self,
        lhs: &[f64],
        rhs: &[f64],
        size: usize,
    ) -> KernelResult<SquareMatrix> {
        self.before_call();
        ReferenceKernels.multiply_optimized(lhs, rhs, size)
    }

    fn box_blur(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        radius: i32,
    ) -> KernelResult<Vec<u8>> {
        self.before_call();
        ReferenceKernels.box_blur(pixels, width, height, radius)
    }
}

fn small_primes() -> KernelParams {
    KernelParams::Primes(PrimesParams {
        limit: 10_000,
        enumerate: false,
    })
}

#[test]
fn reference_and_optimized_agree_on_every_kernel() -> Result<()> {
    let runner = ComparisonRunner::new(2)?;
    let suite = vec![
        KernelParams::Fractal(ComplexViewport::new(48, 32, -0.5, 0.0, 1.0, 64)?),
        small_primes(),
        KernelParams::Matrix(MatrixParams {
            size: 24,
            ..MatrixParams::default()
        }),
        KernelParams::Blur(BlurParams {
            width: 40,
            height: 30,
            radius: 2,
        }),
    ];

    let comparisons = runner.run_suite(
        &ReferenceKernels::new(),
        &OptimizedKernels::new(),
        &suite,
        &mut kernelduel_harness::NoopObserver,
    )?;

    assert_eq!(comparisons.len(), 4);
    for comparison in &comparisons {
        assert!(comparison.verification.passed(), "{:?}", comparison.kernel);
        assert_eq!(comparison.sample_a.len(), 2);
        assert_eq!(comparison.sample_b.len(), 2);
        assert!(comparison.verdict.speedup >= 1.0);
    }
    assert_eq!(
        comparisons[2].strategies,
        Some((MultiplyStrategy::Naive, MultiplyStrategy::Optimized))
    );
    Ok(())
}

#[test]
fn slower_provider_loses() -> Result<()> {
    let slow = QuirkyKernels::new(Quirk::Sleep(Duration::from_millis(20)));
    let params = KernelParams::Primes(PrimesParams {
        limit: 100,
        enumerate: false,
    });

    let comparison = ComparisonRunner::new(3)?.run(&slow, &ReferenceKernels::new(), &params)?;

    assert_eq!(slow.calls.load(Ordering::SeqCst), 3);
    assert_eq!(comparison.verdict.winner, Winner::B);
    assert!(comparison.sample_a.min_ms() >= 20.0);
    Ok(())
}

#[test]
fn kernel_failure_aborts_without_running_b() -> Result<()> {
    let failing = QuirkyKernels::new(Quirk::FailPrimes);
    let untouched = QuirkyKernels::new(Quirk::Sleep(Duration::ZERO));

    let err = ComparisonRunner::new(5)?
        .run(&failing, &untouched, &small_primes())
        .unwrap_err();

    match &err {
        HarnessError::Kernel {
            side,
            provider,
            kernel,
            source,
        } => {
            assert_eq!(*side, Side::A);
            assert_eq!(provider, "quirky");
            assert_eq!(*kernel, KernelKind::Primes);
            assert!(source.is_invalid_argument());
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    assert_eq!(untouched.calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn invalid_parameters_surface_as_kernel_errors() -> Result<()> {
    let params = KernelParams::Blur(BlurParams {
        width: 8,
        height: 8,
        radius: -1,
    });
    let err = ComparisonRunner::new(1)?
        .run(&ReferenceKernels::new(), &OptimizedKernels::new(), &params)
        .unwrap_err();
    assert!(matches!(err, HarnessError::Kernel { side: Side::A, .. }));
    assert!(err.kernel_error().is_some_and(KernelError::is_invalid_argument));
    Ok(())
}

#[test]
fn disagreeing_outputs_produce_no_verdict() -> Result<()> {
    let wrong = QuirkyKernels::new(Quirk::OffByOnePrimes);
    let err = ComparisonRunner::new(2)?
        .run(&ReferenceKernels::new(), &wrong, &small_primes())
        .unwrap_err();
    match err {
        HarnessError::OutputMismatch {
            kernel,
            provider_a,
            provider_b,
            reason,
        } => {
            assert_eq!(kernel, KernelKind::Primes);
            assert_eq!(provider_a, "reference");
            assert_eq!(provider_b, "quirky");
            assert!(reason.contains("1229"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    Ok(())
}

#[test]
fn a_provider_can_race_itself_across_strategies() -> Result<()> {
    let params = KernelParams::Matrix(MatrixParams {
        size: 16,
        seed: 7,
        strategy_a: MultiplyStrategy::Naive,
        strategy_b: MultiplyStrategy::Optimized,
    });
    let provider = OptimizedKernels::new();
    let comparison = ComparisonRunner::new(1)?.run(&provider, &provider, &params)?;
    let report = ComparisonReport::from(&comparison);
    assert!(report.outputs_agree);
    assert_eq!(report.a.provider, report.b.provider);

    let json = serde_json::to_value(SuiteReport::new(&[comparison]))?;
    assert_eq!(json["comparisons"][0]["b"]["strategy"], "optimized");
    Ok(())
}
