//! Process-wide colour ramp used by the fractal kernel.

use std::sync::OnceLock;

pub const PALETTE_SIZE: usize = 2048;

const SATURATION: f32 = 0.8;
const LIGHTNESS: f32 = 0.5;

static GLOBAL_PALETTE: OnceLock<ColorPalette> = OnceLock::new();

/// Fixed HSL hue sweep, one RGB triple per entry.
#[derive(Clone, PartialEq, Eq)]
pub struct ColorPalette {
    colors: Box<[[u8; 3]; PALETTE_SIZE]>,
}

impl ColorPalette {
    /// Builds a fresh palette. Prefer [`ColorPalette::global`] outside tests.
    pub fn build() -> Self {
        let mut colors = Box::new([[0u8; 3]; PALETTE_SIZE]);
        for (i, color) in colors.iter_mut().enumerate() {
            let hue = i as f32 / PALETTE_SIZE as f32;
            *color = hsl_to_rgb(hue, SATURATION, LIGHTNESS);
        }
        Self { colors }
    }

    /// Shared palette, constructed exactly once per process.
    pub fn global() -> &'static ColorPalette {
        GLOBAL_PALETTE.get_or_init(Self::build)
    }

    /// Palette slot for an escaped point.
    pub fn index_for(iteration: u32, max_iterations: u32) -> usize {
        let scaled = iteration as u64 * PALETTE_SIZE as u64 / max_iterations.max(1) as u64;
        (scaled as usize).min(PALETTE_SIZE - 1)
    }

    pub fn color(&self, index: usize) -> [u8; 3] {
        self.colors[index.min(PALETTE_SIZE - 1)]
    }

    pub fn len(&self) -> usize {
        PALETTE_SIZE
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::fmt::Debug for ColorPalette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorPalette")
            .field("entries", &PALETTE_SIZE)
            .finish()
    }
}

/// Forces palette construction up front so the first render is not charged for it.
pub fn warm_palette() {
    let palette = ColorPalette::global();
    tracing::debug!(entries = palette.len(), "colour palette ready");
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [u8; 3] {
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    let r = hue_to_channel(p, q, h + 1.0 / 3.0);
    let g = hue_to_channel(p, q, h);
    let b = hue_to_channel(p, q, h - 1.0 / 3.0);

    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_palette_matches_a_fresh_build() {
        assert_eq!(ColorPalette::global(), &ColorPalette::build());
        assert!(std::ptr::eq(ColorPalette::global(), ColorPalette::global()));
    }

    #[test]
    fn ramp_entries_are_pinned() {
        let palette = ColorPalette::build();
        assert_eq!(palette.color(0), [229, 25, 25]);
        assert_eq!(palette.color(300), [229, 204, 25]);
        assert_eq!(palette.color(1024), [25, 229, 229]);
        assert_eq!(palette.color(1500), [105, 25, 229]);
        assert_eq!(palette.color(2047), [229, 25, 26]);
    }

    #[test]
    fn index_scales_and_clamps() {
        assert_eq!(ColorPalette::index_for(0, 100), 0);
        assert_eq!(ColorPalette::index_for(1, 100), 20);
        assert_eq!(ColorPalette::index_for(50, 100), 1024);
        assert_eq!(ColorPalette::index_for(99, 100), 2027);
        assert_eq!(ColorPalette::index_for(5, 1), 2047);
    }
}
