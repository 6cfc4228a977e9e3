//! Box blur with clamped edge sampling, plus the synthetic image it is benchmarked on.

use crate::error::{KernelError, KernelResult};
use crate::utils::{pixel_buffer_len, try_filled_vec, validate_pixel_buffer, CHANNELS};

const STRIPE_PERIOD: usize = 40;
const STRIPE_WIDTH: usize = 3;
const STRIPE_SHADE: u8 = 50;
const CIRCLE_FRACTION: f32 = 0.3;

/// Deterministic RGBA test card: colour gradient, a white disc in the middle and
/// dark diagonal stripes.
pub fn generate_test_image(width: u32, height: u32) -> KernelResult<Vec<u8>> {
    let len = pixel_buffer_len(width, height)?;
    let mut pixels = try_filled_vec(len, 0u8, "test image")?;
    let width = width as usize;
    let height = height as usize;

    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let radius = (cx * cx + cy * cy).sqrt() * CIRCLE_FRACTION;

    for (idx, pixel) in pixels.chunks_exact_mut(CHANNELS).enumerate() {
        let x = idx % width;
        let y = idx / width;

        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let rgb = if (dx * dx + dy * dy).sqrt() < radius {
            [255, 255, 255]
        } else if (x + y) % STRIPE_PERIOD < STRIPE_WIDTH {
            [STRIPE_SHADE; 3]
        } else {
            [
                (x as f32 / width as f32 * 255.0) as u8,
                (y as f32 / height as f32 * 255.0) as u8,
                ((x + y) as f32 / (width + height) as f32 * 255.0) as u8,
            ]
        };

        pixel[..3].copy_from_slice(&rgb);
        pixel[3] = 255;
    }

    Ok(pixels)
}

fn validate_radius(radius: i32) -> KernelResult<usize> {
    usize::try_from(radius)
        .map_err(|_| KernelError::invalid("radius", format!("must be non-negative, got {radius}")))
}

#[inline]
fn clamp_index(value: isize, len: usize) -> usize {
    value.clamp(0, len as isize - 1) as usize
}

/// Direct window average: every output pixel sums its full `(2r+1)^2` neighbourhood.
pub fn box_blur(pixels: &[u8], width: u32, height: u32, radius: i32) -> KernelResult<Vec<u8>> {
    let len = validate_pixel_buffer(pixels, width, height)?;
    let radius = validate_radius(radius)?;
    if radius == 0 {
        return Ok(pixels.to_vec());
    }

    let width = width as usize;
    let height = height as usize;
    let r = radius as isize;
    let side = 2 * radius as u128 + 1;
    let area = side * side;
    let mut output = try_filled_vec(len, 0u8, "blurred image")?;

    for y in 0..height {
        for x in 0..width {
            let mut sums = [0u128; CHANNELS];
            for ky in -r..=r {
                let sy = clamp_index(y as isize + ky, height);
                for kx in -r..=r {
                    let sx = clamp_index(x as isize + kx, width);
                    let src = (sy * width + sx) * CHANNELS;
                    for (sum, value) in sums.iter_mut().zip(&pixels[src..src + CHANNELS]) {
                        *sum += *value as u128;
                    }
                }
            }

            let dst = (y * width + x) * CHANNELS;
            for (out, sum) in output[dst..dst + CHANNELS].iter_mut().zip(sums) {
                *out = (sum / area) as u8;
            }
        }
    }

    Ok(output)
}

/// Two running-sum passes (horizontal, then vertical) over clamped samples.
///
/// The window sums are the same integers [`box_blur`] accumulates, so the output
/// is byte-identical.
pub fn box_blur_separable(
    pixels: &[u8],
    width: u32,
    height: u32,
    radius: i32,
) -> KernelResult<Vec<u8>> {
    let len = validate_pixel_buffer(pixels, width, height)?;
    let radius = validate_radius(radius)?;
    if radius == 0 {
        return Ok(pixels.to_vec());
    }

    let width = width as usize;
    let height = height as usize;
    let r = radius as isize;
    let side = 2 * radius as u128 + 1;
    let area = side * side;

    let mut rows = try_filled_vec(len, 0u128, "blur row sums")?;
    for y in 0..height {
        let line = &pixels[y * width * CHANNELS..(y + 1) * width * CHANNELS];
        let sums = &mut rows[y * width * CHANNELS..(y + 1) * width * CHANNELS];
        running_window(width, r, move |i| &line[i * CHANNELS..(i + 1) * CHANNELS], |i, acc| {
            sums[i * CHANNELS..(i + 1) * CHANNELS].copy_from_slice(acc);
        });
    }

    let mut output = try_filled_vec(len, 0u8, "blurred image")?;
    let mut column = try_filled_vec(height, [0u128; CHANNELS], "blur column")?;
    for x in 0..width {
        for (y, cell) in column.iter_mut().enumerate() {
            let src = (y * width + x) * CHANNELS;
            cell.copy_from_slice(&rows[src..src + CHANNELS]);
        }
        let column = &column;
        running_window(height, r, move |i| &column[i][..], |y, acc| {
            let dst = (y * width + x) * CHANNELS;
            for (out, sum) in output[dst..dst + CHANNELS].iter_mut().zip(acc) {
                *out = (*sum / area) as u8;
            }
        });
    }

    Ok(output)
}

/// Slides a clamped `2r+1` window across `len` samples, handing each position's
/// per-channel sum to `emit`. Sums are `u128`: a full `(2r+1)^2` window of
/// 255s stays in range for every `i32` radius.
fn running_window<'a, T, S, E>(len: usize, r: isize, sample: S, mut emit: E)
where
    T: Copy + Into<u128> + 'a,
    S: Fn(usize) -> &'a [T],
    E: FnMut(usize, &[u128; CHANNELS]),
{
    let mut acc = [0u128; CHANNELS];
    for k in -r..=r {
        add_sample(&mut acc, sample(clamp_index(k, len)));
    }
    emit(0, &acc);

    for i in 1..len {
        let entering = clamp_index(i as isize + r, len);
        let leaving = clamp_index(i as isize - 1 - r, len);
        add_sample(&mut acc, sample(entering));
        for (sum, value) in acc.iter_mut().zip(sample(leaving)) {
            *sum -= (*value).into();
        }
        emit(i, &acc);
    }
}

#[inline]
fn add_sample<T: Copy + Into<u128>>(acc: &mut [u128; CHANNELS], values: &[T]) {
    for (sum, value) in acc.iter_mut().zip(values) {
        *sum += (*value).into();
    }
}
