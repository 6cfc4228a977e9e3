//! The kernel contract the harness compares, and the two built-in providers.

use crate::blur::{box_blur, box_blur_separable};
use crate::config::{ComplexViewport, MultiplyStrategy};
use crate::error::KernelResult;
use crate::fractal::{render_fractal, render_fractal_rows};
use crate::matrix::{multiply_naive, multiply_optimized, SquareMatrix};
use crate::primes::{count_primes, count_primes_bytewise, enumerate_primes};
use std::sync::Arc;

/// One interchangeable implementation of all four kernels.
///
/// Implementations must honor the same preconditions and numeric results as the
/// free functions in this crate; inputs are borrowed and must not be mutated.
pub trait KernelProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn module_name(&self) -> &'static str;

    fn render_fractal(&self, viewport: &ComplexViewport) -> KernelResult<Vec<u8>>;

    fn count_primes(&self, limit: i64) -> KernelResult<u64>;
    fn enumerate_primes(&self, limit: i64) -> KernelResult<Vec<u64>>;

    fn multiply_naive(&self, lhs: &[f64], rhs: &[f64], size: usize) -> KernelResult<SquareMatrix>;
    fn multiply_optimized(
        &self,
        lhs: &[f64],
        rhs: &[f64],
        size: usize,
    ) -> KernelResult<SquareMatrix>;

    fn box_blur(&self, pixels: &[u8], width: u32, height: u32, radius: i32)
        -> KernelResult<Vec<u8>>;

    fn multiply(
        &self,
        lhs: &[f64],
        rhs: &[f64],
        size: usize,
        strategy: MultiplyStrategy,
    ) -> KernelResult<SquareMatrix> {
        match strategy {
            MultiplyStrategy::Naive => self.multiply_naive(lhs, rhs, size),
            MultiplyStrategy::Optimized => self.multiply_optimized(lhs, rhs, size),
        }
    }
}

pub type DynKernelProvider = Arc<dyn KernelProvider>;

/// Straight-line implementations: per-pixel mapping, bit-by-bit counting and a
/// full-window blur.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceKernels;

impl ReferenceKernels {
    pub fn new() -> Self {
        Self
    }
}

impl KernelProvider for ReferenceKernels {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn module_name(&self) -> &'static str {
        "Rust (reference)"
    }

    fn render_fractal(&self, viewport: &ComplexViewport) -> KernelResult<Vec<u8>> {
        render_fractal(viewport)
    }

    fn count_primes(&self, limit: i64) -> KernelResult<u64> {
        count_primes(limit)
    }

    fn enumerate_primes(&self, limit: i64) -> KernelResult<Vec<u64>> {
        enumerate_primes(limit)
    }

    fn multiply_naive(&self, lhs: &[f64], rhs: &[f64], size: usize) -> KernelResult<SquareMatrix> {
        multiply_naive(lhs, rhs, size)
    }

    fn multiply_optimized(
        &self,
        lhs: &[f64],
        rhs: &[f64],
        size: usize,
    ) -> KernelResult<SquareMatrix> {
        multiply_optimized(lhs, rhs, size)
    }

    fn box_blur(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        radius: i32,
    ) -> KernelResult<Vec<u8>> {
        box_blur(pixels, width, height, radius)
    }
}

/// Same results through cheaper paths: row-hoisted fractal rows, byte popcounts
/// and a separable running-sum blur.
#[derive(Debug, Default, Clone, Copy)]
pub struct OptimizedKernels;

impl OptimizedKernels {
    pub fn new() -> Self {
        Self
    }
}

impl KernelProvider for OptimizedKernels {
    fn name(&self) -> &'static str {
        "optimized"
    }

    fn module_name(&self) -> &'static str {
        "Rust (optimized)"
    }

    fn render_fractal(&self, viewport: &ComplexViewport) -> KernelResult<Vec<u8>> {
        render_fractal_rows(viewport)
    }

    fn count_primes(&self, limit: i64) -> KernelResult<u64> {
        count_primes_bytewise(limit)
    }

    fn enumerate_primes(&self, limit: i64) -> KernelResult<Vec<u64>> {
        enumerate_primes(limit)
    }

    fn multiply_naive(&self, lhs: &[f64], rhs: &[f64], size: usize) -> KernelResult<SquareMatrix> {
        multiply_naive(lhs, rhs, size)
    }

    fn multiply_optimized(
        &self,
        lhs: &[f64],
        rhs: &[f64],
        size: usize,
    ) -> KernelResult<SquareMatrix> {
        multiply_optimized(lhs, rhs, size)
    }

    fn box_blur(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        radius: i32,
    ) -> KernelResult<Vec<u8>> {
        box_blur_separable(pixels, width, height, radius)
    }
}
