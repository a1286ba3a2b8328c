use std::ops::Range;

use serde::{Serialize, Serializer};

/// A fixed-width histogram of a dataset's distribution.
///
/// Bins are aligned to multiples of the bin width: the first bin starts at the
/// dataset minimum rounded down to a multiple of the width, and bins continue
/// until the one containing the dataset maximum. Interior bins without values
/// are kept with a zero count so that the bins form a continuous axis.
///
/// Serializes as an ordered JSON object mapping each bin label to its count.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// The width shared by every bin.
    pub bin_width: f64,
    /// The bins in ascending order.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end).
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl HistogramBin {
    /// Label of the bin: its start value, without a fractional part when integral.
    #[must_use]
    pub fn label(&self) -> String {
        format_bound(self.range.start)
    }
}

impl Histogram {
    /// Creates a fixed-width histogram from unsorted values.
    ///
    /// # Panics
    ///
    /// Panics if `bin_width` is not a positive finite number, or if any value is not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vanguard_stats::histogram::Histogram;
    /// let histogram = Histogram::with_fixed_width([1783.0, 1791.0, 1799.0, 1812.0], 10.0);
    /// let labels = histogram.bins.iter().map(|b| b.label()).collect::<Vec<_>>();
    /// assert_eq!(labels, ["1780", "1790", "1800", "1810"]);
    /// assert_eq!(histogram.total_count(), 4);
    /// ```
    #[must_use]
    pub fn with_fixed_width<I>(values: I, bin_width: f64) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, bin_width)
    }

    /// Creates a fixed-width histogram from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `bin_width` is not a positive finite number or if any value is
    /// not finite. In debug mode, also panics if `sorted_values` is not sorted
    /// in ascending order.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], bin_width: f64) -> Self {
        debug_assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );
        assert!(
            bin_width.is_finite() && bin_width > 0.0,
            "bin width must be a positive finite number"
        );
        assert!(
            sorted_values.iter().all(|v| v.is_finite()),
            "values must be finite"
        );

        let (Some(&min), Some(&max)) = (sorted_values.first(), sorted_values.last()) else {
            return Self {
                bin_width,
                bins: vec![],
            };
        };

        let first_bin_start = (min / bin_width).floor() * bin_width;
        let bin_index = |value: f64| ((value - first_bin_start) / bin_width).floor() as usize;
        let num_bins = bin_index(max) + 1;

        // Recompute each bound from the index to avoid accumulated rounding
        let mut bins = (0..num_bins)
            .map(|idx| HistogramBin {
                range: first_bin_start + idx as f64 * bin_width
                    ..first_bin_start + (idx + 1) as f64 * bin_width,
                count: 0,
            })
            .collect::<Vec<_>>();

        // `bin_index` is monotone, so no value of a sorted input maps past the maximum's bin
        for &value in sorted_values {
            bins[bin_index(value)].count += 1;
        }

        Self { bin_width, bins }
    }

    /// Sum of all bin counts.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }
}

impl Serialize for Histogram {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.bins.iter().map(|bin| (bin.label(), bin.count)))
    }
}

fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        let histogram = Histogram::with_fixed_width([], 10.0);
        assert!(histogram.bins.is_empty());
        assert_eq!(histogram.total_count(), 0);
    }

    #[test]
    fn test_first_bin_is_aligned_to_width() {
        let histogram = Histogram::with_fixed_width([1803.0, 1807.0], 10.0);
        assert_eq!(histogram.bins.len(), 1);
        assert_eq!(histogram.bins[0].range, 1800.0..1810.0);
        assert_eq!(histogram.bins[0].count, 2);
    }

    #[test]
    fn test_boundary_value_starts_new_bin() {
        let histogram = Histogram::with_fixed_width([1800.0, 1809.0, 1810.0], 10.0);
        let counts = histogram.bins.iter().map(|b| b.count).collect::<Vec<_>>();
        assert_eq!(counts, [2, 1]);
    }

    #[test]
    fn test_gaps_are_zero_filled() {
        let histogram = Histogram::with_fixed_width([1.0, 35.0], 10.0);
        let counts = histogram.bins.iter().map(|b| b.count).collect::<Vec<_>>();
        assert_eq!(counts, [1, 0, 0, 1]);
    }

    #[test]
    fn test_counts_sum_to_input_length() {
        let values = (0..997).map(|i| f64::from(i % 83) * 1.7 + 0.3).collect::<Vec<_>>();
        let histogram = Histogram::with_fixed_width(values.iter().copied(), 10.0);
        assert_eq!(histogram.total_count(), 997);
        for value in &values {
            let matching = histogram
                .bins
                .iter()
                .filter(|b| b.range.contains(value))
                .count();
            assert_eq!(matching, 1, "value {value} matched {matching} bins");
        }
    }

    #[test]
    fn test_negative_values_round_down() {
        let histogram = Histogram::with_fixed_width([-3.0, 4.0], 5.0);
        assert_eq!(histogram.bins[0].range.start, -5.0);
        assert_eq!(histogram.total_count(), 2);
    }

    #[test]
    fn test_fractional_width_labels() {
        let histogram = Histogram::with_fixed_width([0.3, 0.7], 0.5);
        let labels = histogram.bins.iter().map(HistogramBin::label).collect::<Vec<_>>();
        assert_eq!(labels, ["0", "0.5"]);
    }

    #[test]
    fn test_fractional_width_rounding_keeps_maximum_in_last_bin() {
        // 0.7 / 0.1 evaluates to 6.999..., so 0.7 belongs to the bin starting at 0.6
        let values = [0.0, 0.3, 0.6, 0.7];
        let histogram = Histogram::with_fixed_width(values, 0.1);
        let counts = histogram.bins.iter().map(|b| b.count).collect::<Vec<_>>();
        assert_eq!(counts, [1, 0, 1, 0, 0, 1, 1]);
        for value in &values {
            let matching = histogram
                .bins
                .iter()
                .filter(|b| b.range.contains(value))
                .count();
            assert_eq!(matching, 1, "value {value} matched {matching} bins");
        }
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let histogram = Histogram::with_fixed_width([95.0, 105.0, 20.0], 10.0);
        let json = serde_json::to_string(&histogram).unwrap();
        assert!(json.starts_with(r#"{"20":1,"30":0"#), "got {json}");
        assert!(json.ends_with(r#""90":1,"100":1}"#), "got {json}");
    }

    #[test]
    #[should_panic(expected = "bin width must be a positive finite number")]
    fn test_rejects_zero_width() {
        let _ = Histogram::with_fixed_width([1.0], 0.0);
    }
}
