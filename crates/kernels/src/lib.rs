//! Compute kernels for kernelduel.
//!
//! Each kernel is a pure function over borrowed inputs: escape-time fractal
//! rendering, an odd-only prime sieve, square matrix multiplication and a
//! clamped box blur. [`KernelProvider`] bundles one implementation of all four
//! so a harness can race two providers against each other.

pub mod blur;
pub mod config;
pub mod error;
pub mod fractal;
pub mod matrix;
pub mod palette;
pub mod primes;
pub mod provider;
pub mod registry;
pub mod utils;

pub use blur::*;
pub use config::*;
pub use error::*;
pub use fractal::*;
pub use matrix::*;
pub use palette::*;
pub use primes::*;
pub use provider::*;
pub use registry::*;
pub use utils::CHANNELS;
