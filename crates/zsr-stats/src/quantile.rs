//! Order-statistic quantiles
//!
//! A `SortedSample` keeps the finite values of a dataset in ascending order
//! so repeated quantile queries are O(1) each.

use serde::{Deserialize, Serialize};

/// Sorted finite values of a sample
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortedSample {
    values: Vec<f64>,
}

impl SortedSample {
    /// Build from raw data; non-finite values are discarded
    pub fn from_data(data: &[f64]) -> Self {
        let mut values: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        Self { values }
    }

    /// Build from the strictly positive values only
    pub fn positive(data: &[f64]) -> Self {
        let positive: Vec<f64> = data.iter().copied().filter(|x| *x > 0.0).collect();
        Self::from_data(&positive)
    }

    /// Quantile at probability `p` in [0, 1]
    ///
    /// Interpolates linearly between the bracketing order statistics at
    /// position `(n - 1) * p`. Returns `None` for an empty sample or an
    /// out-of-range `p`. For a fixed sample the result never decreases as
    /// `p` grows.
    pub fn quantile(&self, p: f64) -> Option<f64> {
        if self.values.is_empty() || !(0.0..=1.0).contains(&p) {
            return None;
        }

        let h = (self.values.len() - 1) as f64 * p;
        let lo = h.floor() as usize;
        let hi = h.ceil() as usize;
        let frac = h - lo as f64;
        Some(self.values[lo] + frac * (self.values[hi] - self.values[lo]))
    }

    pub fn min(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn max(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Number of finite values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The sorted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Linear-interpolated quantile of the strictly positive values of `data`
///
/// Zeros are excluded so that a sparse series does not drag the result
/// toward zero.
pub fn positive_quantile(data: &[f64], p: f64) -> Option<f64> {
    SortedSample::positive(data).quantile(p)
}
