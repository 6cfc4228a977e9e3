//! Head-to-head comparison harness for kernelduel.
//!
//! A comparison generates one input, times provider A on it, then provider B,
//! checks that both produced the same result and reports which side was faster.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod params;
pub mod report;
pub mod runner;
pub mod sample;
pub mod verdict;
pub mod verify;

pub use config::{HarnessConfig, DEFAULT_ITERATIONS};
pub use error::{HarnessError, HarnessResult, Side};
pub use input::{KernelOutput, PreparedInput};
pub use params::{BlurParams, KernelParams, MatrixParams, PrimesParams};
pub use report::{ComparisonReport, SideReport, SuiteReport};
pub use runner::{
    resolve_provider, Comparison, ComparisonRunner, NoopObserver, Phase, PhaseObserver,
    TracingObserver,
};
pub use sample::{BenchmarkSample, SampleStatistics};
pub use verdict::{ComparisonVerdict, Winner, TIE_THRESHOLD_PERCENT};
pub use verify::{VerificationResult, VerificationTolerance, Verifier};

pub use kernelduel_kernels as kernels;
