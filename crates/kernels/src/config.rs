//! Kernel configuration structures.

use crate::error::{KernelError, KernelResult};
use crate::utils::ensure_dimension;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four workloads every provider implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    Fractal,
    Primes,
    Matrix,
    Blur,
}

impl KernelKind {
    pub const ALL: [KernelKind; 4] = [
        KernelKind::Fractal,
        KernelKind::Primes,
        KernelKind::Matrix,
        KernelKind::Blur,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KernelKind::Fractal => "fractal",
            KernelKind::Primes => "primes",
            KernelKind::Matrix => "matrix",
            KernelKind::Blur => "blur",
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MultiplyStrategy {
    Naive,
    #[default]
    Optimized,
}

/// Region of the complex plane sampled onto a `width` x `height` pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexViewport {
    pub width: u32,
    pub height: u32,
    pub center_x: f64,
    pub center_y: f64,
    pub zoom: f64,
    pub max_iterations: u32,
}

impl ComplexViewport {
    pub fn new(
        width: u32,
        height: u32,
        center_x: f64,
        center_y: f64,
        zoom: f64,
        max_iterations: u32,
    ) -> KernelResult<Self> {
        let viewport = Self {
            width,
            height,
            center_x,
            center_y,
            zoom,
            max_iterations,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    pub fn validate(&self) -> KernelResult<()> {
        ensure_dimension("width", self.width)?;
        ensure_dimension("height", self.height)?;
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(KernelError::invalid(
                "zoom",
                format!("must be finite and positive, got {}", self.zoom),
            ));
        }
        if !(self.center_x.is_finite() && self.center_y.is_finite()) {
            return Err(KernelError::invalid("center", "coordinates must be finite"));
        }
        if self.max_iterations < 1 {
            return Err(KernelError::invalid("max_iterations", "must be at least 1"));
        }
        Ok(())
    }

    /// Complex-plane distance between horizontally adjacent pixels.
    pub fn scale(&self) -> f64 {
        4.0 / (self.width as f64 * self.zoom)
    }

    pub fn pixel_to_point(&self, px: u32, py: u32) -> (f64, f64) {
        let scale = self.scale();
        let x0 = (px as f64 - self.width as f64 / 2.0) * scale + self.center_x;
        let y0 = (py as f64 - self.height as f64 / 2.0) * scale + self.center_y;
        (x0, y0)
    }

    /// Viewport recentred on the clicked pixel at twice the magnification.
    pub fn zoom_at(&self, px: u32, py: u32) -> Self {
        let (center_x, center_y) = self.pixel_to_point(px, py);
        Self {
            center_x,
            center_y,
            zoom: self.zoom * 2.0,
            ..*self
        }
    }
}

impl Default for ComplexViewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            center_x: -0.5,
            center_y: 0.0,
            zoom: 1.0,
            max_iterations: 256,
        }
    }
}
