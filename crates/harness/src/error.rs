//! Error types for comparison runs.

use kernelduel_kernels::{KernelError, KernelKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which half of a comparison an event or failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("implementation A"),
            Side::B => f.write_str("implementation B"),
        }
    }
}

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("input generation for {kernel} failed: {source}")]
    Input {
        kernel: KernelKind,
        #[source]
        source: KernelError,
    },

    #[error("{side} ({provider}) failed on {kernel}: {source}")]
    Kernel {
        side: Side,
        provider: String,
        kernel: KernelKind,
        #[source]
        source: KernelError,
    },

    #[error("invalid harness argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("unknown provider `{name}`; registered: {available}")]
    UnknownProvider { name: String, available: String },

    #[error("{kernel} outputs disagree between {provider_a} and {provider_b}: {reason}")]
    OutputMismatch {
        kernel: KernelKind,
        provider_a: String,
        provider_b: String,
        reason: String,
    },

    #[error("failed to parse configuration file '{path}': {source}")]
    Config {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    /// The kernel failure behind this error, if a kernel raised it.
    pub fn kernel_error(&self) -> Option<&KernelError> {
        match self {
            HarnessError::Input { source, .. } | HarnessError::Kernel { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type HarnessResult<T> = std::result::Result<T, HarnessError>;
