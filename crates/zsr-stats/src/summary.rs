//! Summary statistics for datasets
//!
//! Provides the numbers a box or violin plot is drawn from:
//! - Five-number summary (min, quartiles, max)
//! - Mean and standard deviation
//! - Tukey fences for whiskers

use serde::{Deserialize, Serialize};

use crate::quantile::SortedSample;

/// Summary statistics for a numeric dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of finite values
    pub count: usize,
    /// Number of missing/NaN values
    pub missing: usize,
    pub min: f64,
    /// First quartile
    pub q1: f64,
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

impl SummaryStats {
    /// Compute summary statistics from data
    ///
    /// Returns `None` when no finite values are present.
    pub fn from_data(data: &[f64]) -> Option<Self> {
        let sample = SortedSample::from_data(data);
        if sample.is_empty() {
            return None;
        }

        let count = sample.len();
        let values = sample.values();
        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            missing: data.len() - count,
            min: sample.min()?,
            q1: sample.quantile(0.25)?,
            median: sample.quantile(0.5)?,
            q3: sample.quantile(0.75)?,
            max: sample.max()?,
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Lower whisker end: smallest value not below Q1 - 1.5 * IQR
    pub fn lower_whisker(&self, data: &[f64]) -> f64 {
        let fence = self.q1 - 1.5 * self.iqr();
        data.iter()
            .copied()
            .filter(|x| x.is_finite() && *x >= fence)
            .fold(self.q1, f64::min)
    }

    /// Upper whisker end: largest value not above Q3 + 1.5 * IQR
    pub fn upper_whisker(&self, data: &[f64]) -> f64 {
        let fence = self.q3 + 1.5 * self.iqr();
        data.iter()
            .copied()
            .filter(|x| x.is_finite() && *x <= fence)
            .fold(self.q3, f64::max)
    }
}

/// Arithmetic mean of the finite values, or `None` when there are none
pub fn mean(data: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    Some(finite.iter().sum::<f64>() / finite.len() as f64)
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
