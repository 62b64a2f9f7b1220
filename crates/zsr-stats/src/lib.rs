//! zsr-stats - Statistical functions for reading-log charts
//!
//! This crate provides the small set of statistics the report charts need:
//!
//! - **Quantiles**: linear order-statistic quantiles, optionally over positive values only
//! - **Summary**: five-number summary plus mean and spread
//! - **Density**: Gaussian kernel density estimates for violin outlines
//!
//! All functions ignore non-finite input values.

pub mod density;
pub mod quantile;
pub mod summary;

pub use density::*;
pub use quantile::*;
pub use summary::*;
