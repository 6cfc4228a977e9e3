//! Cross-checks that both sides of a comparison computed the same thing.

use crate::input::KernelOutput;
use serde::{Deserialize, Serialize};

/// Tolerance for floating-point outputs. Integer and pixel outputs must match exactly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VerificationTolerance {
    /// Maximum relative error for values whose magnitude exceeds `min_magnitude`.
    pub max_rel_error: f64,
    /// Maximum absolute error for values at or below `min_magnitude`.
    pub max_abs_error: f64,
    pub min_magnitude: f64,
}

impl Default for VerificationTolerance {
    fn default() -> Self {
        Self {
            max_rel_error: 1e-9,
            max_abs_error: 1e-12,
            min_magnitude: 1e-6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum VerificationResult {
    Passed { max_abs_error: f64, max_rel_error: f64 },
    Failed { reason: String },
}

impl VerificationResult {
    pub fn passed(&self) -> bool {
        matches!(self, VerificationResult::Passed { .. })
    }

    fn exact() -> Self {
        VerificationResult::Passed {
            max_abs_error: 0.0,
            max_rel_error: 0.0,
        }
    }
}

pub struct Verifier {
    tolerance: VerificationTolerance,
}

impl Verifier {
    pub fn new() -> Self {
        Self::with_tolerance(VerificationTolerance::default())
    }

    pub fn with_tolerance(tolerance: VerificationTolerance) -> Self {
        Self { tolerance }
    }

    pub fn compare(&self, reference: &KernelOutput, candidate: &KernelOutput) -> VerificationResult {
        match (reference, candidate) {
            (KernelOutput::Pixels(a), KernelOutput::Pixels(b)) => compare_exact(a, b, "pixel byte"),
            (KernelOutput::Primes(a), KernelOutput::Primes(b)) => compare_exact(a, b, "prime"),
            (KernelOutput::PrimeCount(a), KernelOutput::PrimeCount(b)) => {
                if a == b {
                    VerificationResult::exact()
                } else {
                    VerificationResult::Failed {
                        reason: format!("prime counts differ: {a} vs {b}"),
                    }
                }
            }
            (KernelOutput::Matrix(a), KernelOutput::Matrix(b)) => {
                if a.size() != b.size() {
                    return VerificationResult::Failed {
                        reason: format!("matrix sizes differ: {} vs {}", a.size(), b.size()),
                    };
                }
                self.compare_floats(a.as_slice(), b.as_slice())
            }
            _ => VerificationResult::Failed {
                reason: "outputs are of different kinds".into(),
            },
        }
    }

    fn compare_floats(&self, reference: &[f64], candidate: &[f64]) -> VerificationResult {
        let mut max_abs = 0.0f64;
        let mut max_rel = 0.0f64;

        for (idx, (r, c)) in reference.iter().zip(candidate).enumerate() {
            let abs_err = (r - c).abs();
            if !abs_err.is_finite() && r != c {
                return VerificationResult::Failed {
                    reason: format!("element {idx} is not comparable: {r} vs {c}"),
                };
            }
            max_abs = max_abs.max(abs_err);

            if r.abs() > self.tolerance.min_magnitude {
                let rel_err = abs_err / r.abs();
                max_rel = max_rel.max(rel_err);
                if rel_err > self.tolerance.max_rel_error {
                    return VerificationResult::Failed {
                        reason: format!(
                            "element {idx}: relative error {rel_err:e} exceeds tolerance {:e}",
                            self.tolerance.max_rel_error
                        ),
                    };
                }
            } else if abs_err > self.tolerance.max_abs_error {
                return VerificationResult::Failed {
                    reason: format!(
                        "element {idx}: absolute error {abs_err:e} exceeds tolerance {:e}",
                        self.tolerance.max_abs_error
                    ),
                };
            }
        }

        VerificationResult::Passed {
            max_abs_error: max_abs,
            max_rel_error: max_rel,
        }
    }
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}

fn compare_exact<T: PartialEq + std::fmt::Debug>(a: &[T], b: &[T], what: &str) -> VerificationResult {
    if a.len() != b.len() {
        return VerificationResult::Failed {
            reason: format!("length mismatch: {} vs {}", a.len(), b.len()),
        };
    }
    match a.iter().zip(b).position(|(x, y)| x != y) {
        None => VerificationResult::exact(),
        Some(idx) => VerificationResult::Failed {
            reason: format!("first differing {what} at index {idx}: {:?} vs {:?}", a[idx], b[idx]),
        },
    }
}
