//! Error taxonomy shared by every kernel.

use thiserror::Error;

/// Failure raised by a kernel before any output is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("shape mismatch for `{name}`: expected {expected} elements, got {actual}")]
    ShapeMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("cannot allocate {what}: {requested} elements requested")]
    ResourceExhausted { what: &'static str, requested: u128 },
}

impl KernelError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        KernelError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, KernelError::InvalidArgument { .. })
    }

    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, KernelError::ShapeMismatch { .. })
    }

    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self, KernelError::ResourceExhausted { .. })
    }
}

pub type KernelResult<T> = std::result::Result<T, KernelError>;
