//! Harness configuration loaded from JSON.

use crate::error::{HarnessError, HarnessResult};
use crate::params::{BlurParams, KernelParams, MatrixParams, PrimesParams};
use kernelduel_kernels::{ComplexViewport, KernelKind};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_ITERATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub iterations: usize,
    pub provider_a: String,
    pub provider_b: String,
    pub fractal: ComplexViewport,
    pub primes: PrimesParams,
    pub matrix: MatrixParams,
    pub blur: BlurParams,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            provider_a: "reference".to_string(),
            provider_b: "optimized".to_string(),
            fractal: ComplexViewport::default(),
            primes: PrimesParams::default(),
            matrix: MatrixParams::default(),
            blur: BlurParams::default(),
        }
    }
}

impl HarnessConfig {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let path = path.as_ref();
        let blob = match std::fs::read_to_string(path) {
            Ok(blob) => blob,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "config file not found; using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(HarnessError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        let config = Self::from_json(&blob).map_err(|source| HarnessError::Config {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), iterations = config.iterations, "config loaded");
        Ok(config)
    }

    pub fn from_json(blob: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(blob)
    }

    pub fn params_for(&self, kind: KernelKind) -> KernelParams {
        match kind {
            KernelKind::Fractal => KernelParams::Fractal(self.fractal),
            KernelKind::Primes => KernelParams::Primes(self.primes),
            KernelKind::Matrix => KernelParams::Matrix(self.matrix),
            KernelKind::Blur => KernelParams::Blur(self.blur),
        }
    }

    /// Parameters for every kernel, in suite order.
    pub fn suite(&self) -> Vec<KernelParams> {
        KernelKind::ALL
            .iter()
            .map(|&kind| self.params_for(kind))
            .collect()
    }
}
