//! Statistical kernels for the Vanguard player analytics engine.
//!
//! This crate is free of domain knowledge: every function works on plain
//! `f64` slices. It provides:
//!
//! - **Descriptive statistics**: count, mean, median, quartiles, extremes, sample standard deviation
//! - **Percentiles**: type 7 quantiles and midrank percentile scores
//! - **Histogram generation**: fixed-width frequency distributions
//! - **Correlation**: Pearson coefficient, least-squares regression and scatter sampling
//! - **Analysis of variance**: one-way ANOVA with F-distribution p-values from `statrs`
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Quantiles and rank-based percentile scores
//! - [`histogram`]: Fixed-width histograms for distribution charts
//! - [`correlation`]: Relationship between two paired variables
//! - [`anova`]: Significance test for a difference in group means
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use vanguard_stats::descriptive::StatResult;
//!
//! let stats = StatResult::new([1.0, 2.0, 3.0, 4.0, 5.0]);
//! assert_eq!(stats.mean, Some(3.0));
//! assert_eq!(stats.q1, Some(2.0));
//! ```
//!
//! ## Scoring a value against a population
//!
//! ```
//! use vanguard_stats::percentiles::PercentileRank;
//!
//! let rank = PercentileRank::from_values([1750.0, 1780.0, 1800.0, 1810.0, 1820.0]);
//! assert_eq!(rank.percentile(1800.0), Some(50.0));
//! ```
//!
//! ## Creating a histogram
//!
//! ```
//! use vanguard_stats::histogram::Histogram;
//!
//! let histogram = Histogram::with_fixed_width([1783.0, 1786.0, 1802.0], 10.0);
//! assert_eq!(histogram.bins.len(), 3);
//! assert_eq!(histogram.total_count(), 3);
//! ```
//!
//! ## Testing group means
//!
//! ```
//! use vanguard_stats::anova::{one_way_anova, AnovaOutcome};
//!
//! let titan = [1800.0, 1805.0, 1810.0];
//! let hunter = [1790.0];
//! let outcome = one_way_anova(&[&titan[..], &hunter[..]], 0.05);
//! assert!(matches!(outcome, AnovaOutcome::InsufficientSample { .. }));
//! ```

pub mod anova;
pub mod correlation;
pub mod descriptive;
pub mod histogram;
pub mod percentiles;
