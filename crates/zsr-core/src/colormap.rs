//! Colormaps for report charts
//!
//! Provides:
//! - Sequential scales with a saturation bound (heatmap cells)
//! - Evenly sampled categorical palettes (one color per book)

use serde::{Deserialize, Serialize};

/// A color in RGBA format (0.0 to 1.0)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a color from RGB (alpha = 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from hex string (e.g., "#FF5733" or "FF5733")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()? as f32 / 255.0;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()? as f32 / 255.0;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()? as f32 / 255.0;

        Some(Self::rgb(r, g, b))
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }

    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }
}

/// A colormap for mapping scalar values to colors
#[derive(Clone, Debug)]
pub struct Colormap {
    /// Color stops, evenly spaced over [0, 1]
    stops: Vec<Color>,
}

impl Colormap {
    /// Create a colormap from evenly spaced colors
    pub fn from_colors(stops: Vec<Color>) -> Self {
        Self { stops }
    }

    /// Sample the colormap at a position (0.0 to 1.0)
    pub fn sample(&self, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        match self.stops.len() {
            0 => Color::rgb(0.5, 0.5, 0.5),
            1 => self.stops[0],
            n => {
                let pos = t * (n - 1) as f32;
                let lo = (pos.floor() as usize).min(n - 2);
                Color::lerp(&self.stops[lo], &self.stops[lo + 1], pos - lo as f32)
            }
        }
    }

    /// `n` colors sampled evenly from end to end
    pub fn palette(&self, n: usize) -> Vec<Color> {
        match n {
            0 => Vec::new(),
            1 => vec![self.sample(0.5)],
            _ => (0..n)
                .map(|i| self.sample(i as f32 / (n - 1) as f32))
                .collect(),
        }
    }
}

/// The "Greens" sequential colormap (white to dark green)
pub fn greens() -> Colormap {
    Colormap::from_colors(
        ["#F7FCF5", "#E5F5E0", "#C7E9C0", "#A1D99B", "#74C476", "#41AB5D", "#238B45", "#006D2C", "#00441B"]
            .iter()
            .filter_map(|hex| Color::from_hex(hex))
            .collect(),
    )
}

/// The viridis colormap (perceptually uniform, colorblind-safe)
pub fn viridis() -> Colormap {
    Colormap::from_colors(vec![
        Color::rgb(0.267, 0.005, 0.329),
        Color::rgb(0.282, 0.141, 0.458),
        Color::rgb(0.254, 0.265, 0.530),
        Color::rgb(0.207, 0.372, 0.553),
        Color::rgb(0.164, 0.471, 0.558),
        Color::rgb(0.128, 0.567, 0.551),
        Color::rgb(0.135, 0.659, 0.518),
        Color::rgb(0.267, 0.749, 0.441),
        Color::rgb(0.478, 0.821, 0.318),
        Color::rgb(0.741, 0.873, 0.150),
        Color::rgb(0.993, 0.906, 0.144),
    ])
}

/// Sequential color scale from 0 to a saturation bound
///
/// Values at or above `vmax` take the top color (they are capped, not
/// dropped). Values at or below zero take the `under` color.
#[derive(Clone, Debug)]
pub struct SequentialScale {
    colormap: Colormap,
    vmax: f64,
    under: Color,
}

impl SequentialScale {
    /// A scale saturating at `vmax`; non-positive bounds fall back to 1.0
    pub fn new(colormap: Colormap, vmax: f64) -> Self {
        let vmax = if vmax.is_finite() && vmax > 0.0 { vmax } else { 1.0 };
        Self {
            colormap,
            vmax,
            under: Color::white(),
        }
    }

    pub fn vmax(&self) -> f64 {
        self.vmax
    }

    /// Value clamped into the scale's range
    pub fn cap(&self, value: f64) -> f64 {
        value.clamp(0.0, self.vmax)
    }

    /// Position of a value on the scale, 0.0 to 1.0
    pub fn normalize(&self, value: f64) -> f64 {
        self.cap(value) / self.vmax
    }

    pub fn color(&self, value: f64) -> Color {
        if value.is_nan() || value <= 0.0 {
            return self.under;
        }
        self.colormap.sample(self.normalize(value) as f32)
    }
}
