//! Gaussian kernel density estimation
//!
//! Used to draw the outline of a violin plot. The bandwidth follows
//! Scott's rule, `h = s * n^(-1/5)` with `s` the sample standard deviation.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// How many bandwidths past the data extremes a curve extends
pub const DEFAULT_CUT: f64 = 2.0;

/// A point on an estimated density curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub x: f64,
    pub density: f64,
}

/// Gaussian KDE fitted to a sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelDensity {
    values: Vec<f64>,
    bandwidth: f64,
}

impl KernelDensity {
    /// Fit with Scott's rule bandwidth
    ///
    /// A sample with a single distinct value gets a unit bandwidth.
    /// Returns `None` when no finite values are present.
    pub fn fit(data: &[f64]) -> Option<Self> {
        let values: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let bandwidth = if values.len() < 2 {
            1.0
        } else {
            let mean = values.iter().sum::<f64>() / n;
            let var = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
            let h = var.sqrt() * n.powf(-0.2);
            if h > 0.0 {
                h
            } else {
                1.0
            }
        };

        Some(Self { values, bandwidth })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Density estimate at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        let norm = 1.0 / ((2.0 * PI).sqrt() * self.bandwidth * self.values.len() as f64);
        self.values
            .iter()
            .map(|v| {
                let z = (x - v) / self.bandwidth;
                (-0.5 * z * z).exp()
            })
            .sum::<f64>()
            * norm
    }

    /// Evenly spaced curve over `[lo, hi]`
    pub fn curve_between(&self, lo: f64, hi: f64, points: usize) -> Vec<DensityPoint> {
        if points == 0 {
            return Vec::new();
        }
        if points == 1 || hi <= lo {
            return vec![DensityPoint {
                x: lo,
                density: self.evaluate(lo),
            }];
        }

        let step = (hi - lo) / (points - 1) as f64;
        (0..points)
            .map(|i| {
                let x = lo + step * i as f64;
                DensityPoint {
                    x,
                    density: self.evaluate(x),
                }
            })
            .collect()
    }

    /// Curve from `cut` bandwidths below the minimum to `cut` above the maximum
    pub fn curve(&self, points: usize, cut: f64) -> Vec<DensityPoint> {
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let pad = cut * self.bandwidth;
        self.curve_between(min - pad, max + pad, points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trapezoid(points: &[DensityPoint]) -> f64 {
        points
            .windows(2)
            .map(|w| (w[1].x - w[0].x) * (w[0].density + w[1].density) / 2.0)
            .sum()
    }

    #[test]
    fn test_density_integrates_to_one() {
        let data = vec![12.0, 20.0, 25.0, 31.0, 40.0, 44.0, 60.0, 75.0];
        let kde = KernelDensity::fit(&data).unwrap();
        let curve = kde.curve(2000, 8.0);

        assert!((trapezoid(&curve) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_density_peaks_near_cluster() {
        let data = vec![10.0, 10.0, 11.0, 9.0, 50.0];
        let kde = KernelDensity::fit(&data).unwrap();

        assert!(kde.evaluate(10.0) > kde.evaluate(50.0));
        assert!(kde.evaluate(10.0) > kde.evaluate(30.0));
    }

    #[test]
    fn test_degenerate_samples() {
        assert!(KernelDensity::fit(&[]).is_none());

        let single = KernelDensity::fit(&[30.0]).unwrap();
        assert_eq!(single.bandwidth(), 1.0);

        let constant = KernelDensity::fit(&[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(constant.bandwidth(), 1.0);
        assert!(constant.evaluate(5.0) > 0.0);
    }

    #[test]
    fn test_curve_shape() {
        // A single value gets a unit bandwidth, so the curve spans +/- 2
        let kde = KernelDensity::fit(&[10.0]).unwrap();
        let curve = kde.curve(5, DEFAULT_CUT);

        assert_eq!(curve.len(), 5);
        assert_eq!(curve[0].x, 8.0);
        assert_eq!(curve[2].x, 10.0);
        assert_eq!(curve[4].x, 12.0);
        assert!(curve[2].density > curve[0].density);
    }
}
