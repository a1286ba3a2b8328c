//! Quantiles and rank-based percentile scores.
//!
//! Two directions are covered here:
//!
//! - [`quantile`] maps a probability to a value (used for medians and quartiles)
//! - [`PercentileRank`] maps a value to its 0–100 position inside a reference set

/// Computes a quantile from sorted data by linear interpolation between order statistics.
///
/// With `n` sorted values and probability `p`, the position is `h = (n - 1) * p`
/// and the result is `x[⌊h⌋] + (h - ⌊h⌋) * (x[⌊h⌋ + 1] - x[⌊h⌋])`
/// (Hyndman–Fan type 7). `p = 0.5` yields the conventional median, including the
/// average of the two middle values for even `n`.
///
/// Returns `None` if the input is empty.
///
/// # Panics
///
/// Panics if `p` is outside `[0, 1]`, and in debug mode if `sorted_values`
/// is not sorted in ascending order.
///
/// # Examples
///
/// ```
/// use vanguard_stats::percentiles::quantile;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(quantile(&values, 0.5), Some(2.5));
/// assert_eq!(quantile(&values, 0.25), Some(1.75));
/// assert_eq!(quantile(&[], 0.5), None);
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn quantile(sorted_values: &[f64], p: f64) -> Option<f64> {
    debug_assert!(
        sorted_values.is_sorted_by(|a, b| a <= b),
        "values must be sorted in ascending order"
    );
    assert!((0.0..=1.0).contains(&p), "quantile probability must be in [0, 1]");

    let last = sorted_values.len().checked_sub(1)?;
    let h = last as f64 * p;
    let lower = (h.floor() as usize).min(last);
    let upper = (lower + 1).min(last);
    let frac = h - lower as f64;
    let lo = sorted_values[lower];
    let hi = sorted_values[upper];
    Some(lo + frac * (hi - lo))
}

/// Midrank percentile scores against a fixed reference set.
///
/// The reference values are sorted once; each lookup is two binary searches.
///
/// For a value `v`, let `below` be the number of reference values `< v` and
/// `equal` the number `== v`. Tied values share the midpoint of their rank
/// range, `below + (equal - 1) / 2`; a value absent from the reference sits
/// half a rank below the next larger one. The position is scaled by `n - 1`
/// and clamped to `[0, 100]`, so a unique minimum scores 0 and a unique
/// maximum scores 100.
///
/// # Examples
///
/// ```
/// use vanguard_stats::percentiles::PercentileRank;
///
/// let rank = PercentileRank::from_values([10.0, 20.0, 30.0, 40.0, 50.0]);
/// assert_eq!(rank.percentile(10.0), Some(0.0));
/// assert_eq!(rank.percentile(30.0), Some(50.0));
/// assert_eq!(rank.percentile(50.0), Some(100.0));
/// ```
#[derive(Debug, Clone)]
pub struct PercentileRank {
    sorted: Vec<f64>,
}

impl PercentileRank {
    /// Builds a ranker from unsorted reference values.
    #[must_use]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self { sorted }
    }

    /// Number of reference values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Reference values in ascending order.
    #[must_use]
    pub fn sorted_values(&self) -> &[f64] {
        &self.sorted
    }

    /// Percentile of `value` within the reference set, in `[0, 100]`.
    ///
    /// Returns `None` when the reference set is empty.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn percentile(&self, value: f64) -> Option<f64> {
        let n = self.sorted.len();
        if n == 0 {
            return None;
        }
        let below = self.sorted.partition_point(|x| *x < value);
        let below_or_equal = self.sorted.partition_point(|x| *x <= value);
        let equal = below_or_equal - below;

        if n == 1 {
            let score = match (below, equal) {
                (0, 0) => 0.0,
                (_, 0) => 100.0,
                _ => 50.0,
            };
            return Some(score);
        }

        let position = if equal > 0 {
            below as f64 + (equal - 1) as f64 / 2.0
        } else {
            below as f64 - 0.5
        };
        Some((100.0 * position / (n - 1) as f64).clamp(0.0, 100.0))
    }
}
