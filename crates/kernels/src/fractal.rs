//! Escape-time rasterization of the Mandelbrot set.

use crate::config::ComplexViewport;
use crate::error::KernelResult;
use crate::palette::ColorPalette;
use crate::utils::{pixel_buffer_len, try_filled_vec, CHANNELS};

const BAILOUT: f64 = 4.0;
const INTERIOR: [u8; 4] = [0, 0, 0, 255];

/// Number of iterations before `z <- z^2 + c` leaves the bailout radius, capped at
/// `max_iterations`.
#[inline]
pub fn escape_time(x0: f64, y0: f64, max_iterations: u32) -> u32 {
    let mut x = 0.0f64;
    let mut y = 0.0f64;
    let mut x2 = 0.0f64;
    let mut y2 = 0.0f64;
    let mut iteration = 0u32;

    while x2 + y2 <= BAILOUT && iteration < max_iterations {
        y = 2.0 * x * y + y0;
        x = x2 - y2 + x0;
        x2 = x * x;
        y2 = y * y;
        iteration += 1;
    }

    iteration
}

/// RGBA colour for an iteration count. Points that never escaped are black.
#[inline]
pub fn shade(iteration: u32, max_iterations: u32, palette: &ColorPalette) -> [u8; 4] {
    if iteration >= max_iterations {
        return INTERIOR;
    }
    let [r, g, b] = palette.color(ColorPalette::index_for(iteration, max_iterations));
    [r, g, b, 255]
}

/// Renders `viewport` pixel by pixel through [`ComplexViewport::pixel_to_point`].
pub fn render_fractal(viewport: &ComplexViewport) -> KernelResult<Vec<u8>> {
    viewport.validate()?;
    let len = pixel_buffer_len(viewport.width, viewport.height)?;
    let mut pixels = try_filled_vec(len, 0u8, "fractal pixel buffer")?;
    let palette = ColorPalette::global();

    for py in 0..viewport.height {
        for px in 0..viewport.width {
            let (x0, y0) = viewport.pixel_to_point(px, py);
            let iteration = escape_time(x0, y0, viewport.max_iterations);
            let idx = (py as usize * viewport.width as usize + px as usize) * CHANNELS;
            pixels[idx..idx + CHANNELS]
                .copy_from_slice(&shade(iteration, viewport.max_iterations, palette));
        }
    }

    Ok(pixels)
}

/// Same mapping as [`render_fractal`] with the per-row terms hoisted and output
/// written row chunk by row chunk.
pub fn render_fractal_rows(viewport: &ComplexViewport) -> KernelResult<Vec<u8>> {
    viewport.validate()?;
    let len = pixel_buffer_len(viewport.width, viewport.height)?;
    let mut pixels = try_filled_vec(len, 0u8, "fractal pixel buffer")?;
    let palette = ColorPalette::global();

    let scale = viewport.scale();
    let half_width = viewport.width as f64 / 2.0;
    let half_height = viewport.height as f64 / 2.0;
    let max_iterations = viewport.max_iterations;
    let row_len = viewport.width as usize * CHANNELS;

    for (py, row) in pixels.chunks_exact_mut(row_len).enumerate() {
        let y0 = (py as f64 - half_height) * scale + viewport.center_y;
        for (px, pixel) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let x0 = (px as f64 - half_width) * scale + viewport.center_x;
            let iteration = escape_time(x0, y0, max_iterations);
            pixel.copy_from_slice(&shade(iteration, max_iterations, palette));
        }
    }

    Ok(pixels)
}
