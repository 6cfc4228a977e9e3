//! Input generation and kernel dispatch.

use crate::params::{BlurParams, KernelParams, MatrixParams, PrimesParams};
use kernelduel_kernels::{
    generate_test_image, ComplexViewport, KernelKind, KernelProvider, KernelResult,
    MultiplyStrategy, SquareMatrix,
};

/// A fully materialised input, shared read-only by both sides of a comparison.
#[derive(Debug, Clone)]
pub enum PreparedInput {
    Fractal(ComplexViewport),
    Primes(PrimesParams),
    Matrix {
        lhs: SquareMatrix,
        rhs: SquareMatrix,
        params: MatrixParams,
    },
    Blur {
        pixels: Vec<u8>,
        params: BlurParams,
    },
}

/// What one kernel call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelOutput {
    Pixels(Vec<u8>),
    PrimeCount(u64),
    Primes(Vec<u64>),
    Matrix(SquareMatrix),
}

impl PreparedInput {
    /// Builds the input described by `params`. Values that the kernels would
    /// reject are passed through untouched so the kernels report them.
    pub fn generate(params: &KernelParams) -> KernelResult<Self> {
        Ok(match *params {
            KernelParams::Fractal(viewport) => PreparedInput::Fractal(viewport),
            KernelParams::Primes(primes) => PreparedInput::Primes(primes),
            KernelParams::Matrix(matrix) => {
                let mut rng = fastrand::Rng::with_seed(matrix.seed);
                let lhs = SquareMatrix::from_fn(matrix.size, |_, _| rng.f64() * 2.0 - 1.0)?;
                let rhs = SquareMatrix::from_fn(matrix.size, |_, _| rng.f64() * 2.0 - 1.0)?;
                PreparedInput::Matrix {
                    lhs,
                    rhs,
                    params: matrix,
                }
            }
            KernelParams::Blur(blur) => PreparedInput::Blur {
                pixels: generate_test_image(blur.width, blur.height)?,
                params: blur,
            },
        })
    }

    pub fn kind(&self) -> KernelKind {
        match self {
            PreparedInput::Fractal(_) => KernelKind::Fractal,
            PreparedInput::Primes(_) => KernelKind::Primes,
            PreparedInput::Matrix { .. } => KernelKind::Matrix,
            PreparedInput::Blur { .. } => KernelKind::Blur,
        }
    }

    /// Runs the kernel this input belongs to on `provider`.
    ///
    /// `strategy` only matters for matrix inputs.
    pub fn execute(
        &self,
        provider: &dyn KernelProvider,
        strategy: MultiplyStrategy,
    ) -> KernelResult<KernelOutput> {
        match self {
            PreparedInput::Fractal(viewport) => {
                provider.render_fractal(viewport).map(KernelOutput::Pixels)
            }
            PreparedInput::Primes(params) if params.enumerate => provider
                .enumerate_primes(params.limit)
                .map(KernelOutput::Primes),
            PreparedInput::Primes(params) => provider
                .count_primes(params.limit)
                .map(KernelOutput::PrimeCount),
            PreparedInput::Matrix { lhs, rhs, .. } => provider
                .multiply(lhs.as_slice(), rhs.as_slice(), lhs.size(), strategy)
                .map(KernelOutput::Matrix),
            PreparedInput::Blur { pixels, params } => provider
                .box_blur(pixels, params.width, params.height, params.radius)
                .map(KernelOutput::Pixels),
        }
    }
}
