//! Shared helpers for kernel implementations.

use crate::error::{KernelError, KernelResult};

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

pub fn ensure_dimension(name: &'static str, value: u32) -> KernelResult<()> {
    if value == 0 {
        return Err(KernelError::invalid(name, "must be greater than zero"));
    }
    Ok(())
}

/// Validates an image extent and returns the RGBA buffer length it implies.
pub fn pixel_buffer_len(width: u32, height: u32) -> KernelResult<usize> {
    ensure_dimension("width", width)?;
    ensure_dimension("height", height)?;

    let requested = width as u128 * height as u128 * CHANNELS as u128;
    usize::try_from(requested)
        .ok()
        .filter(|len| *len <= isize::MAX as usize)
        .ok_or(KernelError::ResourceExhausted {
            what: "pixel buffer",
            requested,
        })
}

pub fn validate_pixel_buffer(pixels: &[u8], width: u32, height: u32) -> KernelResult<usize> {
    let expected = pixel_buffer_len(width, height)?;
    if pixels.len() != expected {
        return Err(KernelError::ShapeMismatch {
            name: "pixels",
            expected,
            actual: pixels.len(),
        });
    }
    Ok(expected)
}

/// Allocates `len` copies of `fill`, reporting allocation failure instead of aborting.
pub fn try_filled_vec<T: Clone>(len: usize, fill: T, what: &'static str) -> KernelResult<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| KernelError::ResourceExhausted {
            what,
            requested: len as u128,
        })?;
    buffer.resize(len, fill);
    Ok(buffer)
}
