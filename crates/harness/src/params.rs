//! Per-kernel comparison parameters.

use kernelduel_kernels::{ComplexViewport, KernelKind, MultiplyStrategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimesParams {
    pub limit: i64,
    /// Time enumeration instead of counting.
    pub enumerate: bool,
}

impl Default for PrimesParams {
    fn default() -> Self {
        Self {
            limit: 10_000_000,
            enumerate: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixParams {
    pub size: usize,
    /// Seed for the operand generator; both sides see the same operands.
    pub seed: u64,
    pub strategy_a: MultiplyStrategy,
    pub strategy_b: MultiplyStrategy,
}

impl Default for MatrixParams {
    fn default() -> Self {
        Self {
            size: 256,
            seed: 0x5eed,
            strategy_a: MultiplyStrategy::Naive,
            strategy_b: MultiplyStrategy::Optimized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurParams {
    pub width: u32,
    pub height: u32,
    pub radius: i32,
}

impl Default for BlurParams {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            radius: 3,
        }
    }
}

/// Everything needed to build one kernel's input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kernel", rename_all = "lowercase")]
pub enum KernelParams {
    Fractal(ComplexViewport),
    Primes(PrimesParams),
    Matrix(MatrixParams),
    Blur(BlurParams),
}

impl KernelParams {
    pub fn kind(&self) -> KernelKind {
        match self {
            KernelParams::Fractal(_) => KernelKind::Fractal,
            KernelParams::Primes(_) => KernelKind::Primes,
            KernelParams::Matrix(_) => KernelKind::Matrix,
            KernelParams::Blur(_) => KernelKind::Blur,
        }
    }
}

impl From<ComplexViewport> for KernelParams {
    fn from(value: ComplexViewport) -> Self {
        KernelParams::Fractal(value)
    }
}

impl From<PrimesParams> for KernelParams {
    fn from(value: PrimesParams) -> Self {
        KernelParams::Primes(value)
    }
}

impl From<MatrixParams> for KernelParams {
    fn from(value: MatrixParams) -> Self {
        KernelParams::Matrix(value)
    }
}

impl From<BlurParams> for KernelParams {
    fn from(value: BlurParams) -> Self {
        KernelParams::Blur(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_report_their_kernel() {
        assert_eq!(
            KernelParams::from(ComplexViewport::default()).kind(),
            KernelKind::Fractal
        );
        assert_eq!(KernelParams::from(BlurParams::default()).kind(), KernelKind::Blur);
    }

    #[test]
    fn tagged_json_form() {
        let json = serde_json::to_value(KernelParams::from(PrimesParams {
            limit: 100,
            enumerate: true,
        }))
        .unwrap();
        assert_eq!(json["kernel"], "primes");
        assert_eq!(json["limit"], 100);

        let parsed: KernelParams =
            serde_json::from_str(r#"{"kernel":"blur","radius":5}"#).unwrap();
        assert_eq!(
            parsed,
            KernelParams::Blur(BlurParams {
                radius: 5,
                ..BlurParams::default()
            })
        );
    }
}
