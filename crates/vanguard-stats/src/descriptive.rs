use serde::Serialize;

use crate::percentiles;

/// Descriptive statistics summarizing a dataset.
///
/// Every measure except `count` is `None` for an empty dataset, and `stdev`
/// is also `None` for a single value, since the sample standard deviation
/// needs at least two observations.
///
/// Quartiles and the median share the interpolation rule of
/// [`percentiles::quantile`], so results are comparable across fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatResult {
    /// Number of values in the dataset.
    pub count: usize,
    /// The arithmetic mean.
    pub mean: Option<f64>,
    /// The median (average of the two middle values for even counts).
    pub median: Option<f64>,
    /// The first quartile.
    pub q1: Option<f64>,
    /// The third quartile.
    pub q3: Option<f64>,
    /// The minimum value.
    pub min: Option<f64>,
    /// The maximum value.
    pub max: Option<f64>,
    /// The sample standard deviation (`n - 1` denominator).
    pub stdev: Option<f64>,
}

impl StatResult {
    /// Statistics of an empty dataset.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            count: 0,
            mean: None,
            median: None,
            q1: None,
            q3: None,
            min: None,
            max: None,
            stdev: None,
        }
    }

    /// Computes descriptive statistics from unsorted values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vanguard_stats::descriptive::StatResult;
    /// let stats = StatResult::new([5.0, 2.0, 4.0, 1.0, 3.0]);
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.min, Some(1.0));
    /// assert_eq!(stats.max, Some(5.0));
    /// assert_eq!(stats.mean, Some(3.0));
    /// assert_eq!(stats.median, Some(3.0));
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `sorted_values` is not sorted in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vanguard_stats::descriptive::StatResult;
    /// let stats = StatResult::from_sorted(&[42.0]);
    /// assert_eq!(stats.median, Some(42.0));
    /// assert_eq!(stats.q1, Some(42.0));
    /// assert_eq!(stats.stdev, None);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Self {
        debug_assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let (Some(&min), Some(&max)) = (sorted_values.first(), sorted_values.last()) else {
            return Self::empty();
        };
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let stdev = (count >= 2).then(|| {
            let sum_sq = sorted_values
                .iter()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>();
            (sum_sq / (n - 1.0)).sqrt()
        });

        Self {
            count,
            mean: Some(mean),
            median: percentiles::quantile(sorted_values, 0.5),
            q1: percentiles::quantile(sorted_values, 0.25),
            q3: percentiles::quantile(sorted_values, 0.75),
            min: Some(min),
            max: Some(max),
            stdev,
        }
    }

    /// Whether too few values are present for a variance to exist.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.count < 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("value should be defined");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_empty_dataset() {
        let stats = StatResult::new([]);
        assert_eq!(stats, StatResult::empty());
        assert!(stats.is_degenerate());
    }

    #[test]
    fn test_single_value() {
        let stats = StatResult::new([1800.0]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, Some(1800.0));
        assert_eq!(stats.max, Some(1800.0));
        assert_eq!(stats.median, Some(1800.0));
        assert_eq!(stats.q1, Some(1800.0));
        assert_eq!(stats.q3, Some(1800.0));
        assert_eq!(stats.stdev, None);
        assert!(stats.is_degenerate());
    }

    #[test]
    fn test_even_count_median_averages_middle() {
        let stats = StatResult::new([4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.median, Some(2.5));
        assert_close(stats.q1, 1.75);
        assert_close(stats.q3, 3.25);
    }

    #[test]
    fn test_sample_standard_deviation() {
        // Population variance is 4, sample variance is 32 / 7
        let stats = StatResult::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_close(stats.mean, 5.0);
        assert_close(stats.stdev, (32.0_f64 / 7.0).sqrt());
    }

    #[test]
    fn test_weighted_light_level_distribution() {
        let values = [
            (1780.0, 45),
            (1790.0, 120),
            (1800.0, 280),
            (1810.0, 350),
            (1820.0, 180),
        ]
        .into_iter()
        .flat_map(|(value, count)| std::iter::repeat_n(value, count));
        let stats = StatResult::new(values);

        assert_eq!(stats.count, 975);
        assert_close(stats.mean, 1_760_000.0 / 975.0);
        // h = 487 → 1810
        assert_eq!(stats.median, Some(1810.0));
        // h = 243.5 → positions 243 and 244 are both 1800
        assert_eq!(stats.q1, Some(1800.0));
        // h = 730.5 → positions 730 and 731 are both 1810
        assert_eq!(stats.q3, Some(1810.0));
        assert_eq!(stats.min, Some(1780.0));
        assert_eq!(stats.max, Some(1820.0));
    }

    #[test]
    fn test_quartile_ordering() {
        let stats = StatResult::new([9.0, 1.0, 8.0, 2.0, 7.0, 3.0, 6.0]);
        let (min, q1, median, q3, max) = (
            stats.min.unwrap(),
            stats.q1.unwrap(),
            stats.median.unwrap(),
            stats.q3.unwrap(),
            stats.max.unwrap(),
        );
        assert!(min <= q1 && q1 <= median && median <= q3 && q3 <= max);
    }

    #[test]
    fn test_serializes_missing_values_as_null() {
        let json = serde_json::to_value(StatResult::new([3.0])).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["mean"], 3.0);
        assert!(json["stdev"].is_null());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "values must be sorted in ascending order")]
    fn test_unsorted_input_is_caught_in_debug_builds() {
        let _ = StatResult::from_sorted(&[2.0, 1.0]);
    }
}
