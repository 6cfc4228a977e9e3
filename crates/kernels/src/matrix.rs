//! Square matrix multiplication kernels.

use crate::config::MultiplyStrategy;
use crate::error::{KernelError, KernelResult};
use crate::utils::try_filled_vec;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Row-major `size x size` matrix of `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquareMatrix {
    size: usize,
    data: Vec<f64>,
}

impl SquareMatrix {
    pub fn new(size: usize, data: Vec<f64>) -> KernelResult<Self> {
        let expected = element_count(size)?;
        if data.len() != expected {
            return Err(KernelError::ShapeMismatch {
                name: "matrix",
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { size, data })
    }

    pub fn from_fn<F>(size: usize, mut f: F) -> KernelResult<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let len = element_count(size)?;
        let mut data = try_filled_vec(len, 0.0, "matrix")?;
        for (idx, value) in data.iter_mut().enumerate() {
            *value = f(idx / size, idx % size);
        }
        Ok(Self { size, data })
    }

    pub fn identity(size: usize) -> KernelResult<Self> {
        Self::from_fn(size, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }

    /// Borrowed 2-D view for use with `ndarray` routines.
    pub fn view(&self) -> KernelResult<ArrayView2<'_, f64>> {
        ArrayView2::from_shape((self.size, self.size), &self.data).map_err(|_| {
            KernelError::ShapeMismatch {
                name: "matrix",
                expected: self.size * self.size,
                actual: self.data.len(),
            }
        })
    }

    pub fn multiply(&self, rhs: &SquareMatrix, strategy: MultiplyStrategy) -> KernelResult<Self> {
        if self.size != rhs.size {
            return Err(KernelError::ShapeMismatch {
                name: "rhs",
                expected: self.data.len(),
                actual: rhs.data.len(),
            });
        }
        match strategy {
            MultiplyStrategy::Naive => multiply_naive(&self.data, &rhs.data, self.size),
            MultiplyStrategy::Optimized => multiply_optimized(&self.data, &rhs.data, self.size),
        }
    }
}

fn element_count(size: usize) -> KernelResult<usize> {
    if size == 0 {
        return Err(KernelError::invalid("size", "must be greater than zero"));
    }
    size.checked_mul(size)
        .filter(|len| *len <= isize::MAX as usize / std::mem::size_of::<f64>())
        .ok_or(KernelError::ResourceExhausted {
            what: "matrix",
            requested: size as u128 * size as u128,
        })
}

pub fn validate_operands(lhs: &[f64], rhs: &[f64], size: usize) -> KernelResult<usize> {
    let expected = element_count(size)?;
    for (name, operand) in [("lhs", lhs), ("rhs", rhs)] {
        if operand.len() != expected {
            return Err(KernelError::ShapeMismatch {
                name,
                expected,
                actual: operand.len(),
            });
        }
    }
    Ok(expected)
}

/// Textbook triple loop: `c[i][j] = sum_k a[i][k] * b[k][j]`.
pub fn multiply_naive(lhs: &[f64], rhs: &[f64], size: usize) -> KernelResult<SquareMatrix> {
    let len = validate_operands(lhs, rhs, size)?;
    let mut data = try_filled_vec(len, 0.0, "matrix product")?;

    for i in 0..size {
        for j in 0..size {
            let mut sum = 0.0;
            for k in 0..size {
                sum += lhs[i * size + k] * rhs[k * size + j];
            }
            data[i * size + j] = sum;
        }
    }

    Ok(SquareMatrix { size, data })
}

/// `rhs` transposed into a fresh row-major buffer.
pub fn transpose(rhs: &[f64], size: usize) -> KernelResult<Vec<f64>> {
    let mut transposed = try_filled_vec(rhs.len(), 0.0, "transposed matrix")?;
    for i in 0..size {
        for j in 0..size {
            transposed[j * size + i] = rhs[i * size + j];
        }
    }
    Ok(transposed)
}

/// Multiplies against a transposed copy of `rhs` so both inner-product operands
/// are walked contiguously. Summation order over `k` matches [`multiply_naive`].
pub fn multiply_optimized(lhs: &[f64], rhs: &[f64], size: usize) -> KernelResult<SquareMatrix> {
    let len = validate_operands(lhs, rhs, size)?;
    let rhs_t = transpose(rhs, size)?;
    let mut data = try_filled_vec(len, 0.0, "matrix product")?;

    for (lhs_row, out_row) in lhs.chunks_exact(size).zip(data.chunks_exact_mut(size)) {
        for (rhs_col, out) in rhs_t.chunks_exact(size).zip(out_row.iter_mut()) {
            let mut sum = 0.0;
            for (a, b) in lhs_row.iter().zip(rhs_col) {
                sum += a * b;
            }
            *out = sum;
        }
    }

    Ok(SquareMatrix { size, data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seeded(size: usize, seed: u64) -> SquareMatrix {
        let mut rng = fastrand::Rng::with_seed(seed);
        SquareMatrix::from_fn(size, |_, _| rng.f64() * 2.0 - 1.0).unwrap()
    }

    #[test]
    fn two_by_two_products() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];
        let expected = vec![19.0, 22.0, 43.0, 50.0];
        assert_eq!(multiply_naive(&a, &b, 2).unwrap().into_vec(), expected);
        assert_eq!(multiply_optimized(&a, &b, 2).unwrap().into_vec(), expected);
    }

    #[test]
    fn variants_agree_on_random_inputs() {
        for (size, seed) in [(1, 1), (7, 2), (32, 3), (65, 4)] {
            let a = seeded(size, seed);
            let b = seeded(size, seed + 100);
            let naive = a.multiply(&b, MultiplyStrategy::Naive).unwrap();
            let optimized = a.multiply(&b, MultiplyStrategy::Optimized).unwrap();
            for (x, y) in naive.as_slice().iter().zip(optimized.as_slice()) {
                assert_relative_eq!(*x, *y, epsilon = 1e-12, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn matches_ndarray_dot() {
        let a = seeded(24, 9);
        let b = seeded(24, 10);
        let expected = a.view().unwrap().dot(&b.view().unwrap());
        let optimized = a.multiply(&b, MultiplyStrategy::Optimized).unwrap();
        for ((i, j), value) in expected.indexed_iter() {
            assert_relative_eq!(optimized.get(i, j), *value, epsilon = 1e-12, max_relative = 1e-9);
        }
    }

    #[test]
    fn identity_is_neutral() {
        let a = seeded(16, 42);
        let id = SquareMatrix::identity(16).unwrap();
        assert_eq!(a.multiply(&id, MultiplyStrategy::Naive).unwrap(), a);
        assert_eq!(id.multiply(&a, MultiplyStrategy::Optimized).unwrap(), a);
    }

    #[test]
    fn mismatched_operands_are_rejected() {
        let err = multiply_naive(&[1.0; 4], &[1.0; 9], 2).unwrap_err();
        assert_eq!(
            err,
            KernelError::ShapeMismatch {
                name: "rhs",
                expected: 4,
                actual: 9
            }
        );
        let a = SquareMatrix::identity(2).unwrap();
        let b = SquareMatrix::identity(3).unwrap();
        assert!(a
            .multiply(&b, MultiplyStrategy::Optimized)
            .unwrap_err()
            .is_shape_mismatch());
    }

    #[test]
    fn zero_size_is_invalid() {
        assert!(multiply_optimized(&[], &[], 0).unwrap_err().is_invalid_argument());
        assert!(SquareMatrix::new(0, Vec::new()).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn overflowing_size_is_reported() {
        assert!(multiply_naive(&[], &[], usize::MAX)
            .unwrap_err()
            .is_resource_exhausted());
    }
}
