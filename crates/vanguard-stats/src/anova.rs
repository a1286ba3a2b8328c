//! One-way analysis of variance for a difference in group means.
//!
//! For two groups the F statistic equals the square of the pooled two-sample
//! t statistic, so a single test covers every group count.
//!
//! # Conventions
//!
//! - Degrees of freedom are `(k - 1, N - k)` for `k` groups and `N` observations.
//! - The p-value is the upper tail `P(F ≥ f)`.
//! - The null hypothesis of equal means is rejected when `p < alpha`.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF as _, FisherSnedecor};

/// Why a test could not produce a finite statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientReason {
    /// Fewer than two groups were supplied.
    #[display("at least two groups are required")]
    TooFewGroups,
    /// At least one group has fewer than two observations.
    #[display("every group needs at least two observations")]
    DegenerateGroup,
    /// Every group is internally constant, so the statistic would be infinite.
    #[display("within-group variance is zero")]
    ZeroWithinGroupVariance,
}

/// Decision at the configured significance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    RejectNull,
    FailToRejectNull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DegreesOfFreedom {
    pub between: usize,
    pub within: usize,
}

/// Per-group summary reported alongside the test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub n: usize,
    pub mean: f64,
    pub stdev: f64,
    pub min: f64,
    pub max: f64,
}

/// A completed one-way ANOVA.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaResult {
    /// The F statistic.
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: DegreesOfFreedom,
    pub alpha: f64,
    pub conclusion: Conclusion,
    /// Share of total variance explained by group membership.
    pub eta_squared: f64,
    pub groups: Vec<GroupSummary>,
}

/// Result of [`one_way_anova`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnovaOutcome {
    Completed(AnovaResult),
    InsufficientSample {
        reason: InsufficientReason,
        group_sizes: Vec<usize>,
    },
}

impl AnovaOutcome {
    #[must_use]
    pub fn completed(&self) -> Option<&AnovaResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::InsufficientSample { .. } => None,
        }
    }
}

/// Runs a one-way ANOVA over `groups`.
///
/// # Examples
///
/// ```
/// use vanguard_stats::anova::{one_way_anova, Conclusion};
///
/// let low = [1.0, 2.0, 3.0, 2.0];
/// let high = [11.0, 12.0, 13.0, 12.0];
/// let result = one_way_anova(&[&low, &high], 0.05);
/// let result = result.completed().unwrap();
/// assert_eq!(result.conclusion, Conclusion::RejectNull);
/// assert_eq!(result.degrees_of_freedom.between, 1);
/// assert_eq!(result.degrees_of_freedom.within, 6);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn one_way_anova<G>(groups: &[G], alpha: f64) -> AnovaOutcome
where
    G: AsRef<[f64]>,
{
    let group_sizes = groups.iter().map(|g| g.as_ref().len()).collect::<Vec<_>>();
    let insufficient = |reason| AnovaOutcome::InsufficientSample {
        reason,
        group_sizes: group_sizes.clone(),
    };

    let k = groups.len();
    if k < 2 {
        return insufficient(InsufficientReason::TooFewGroups);
    }
    if group_sizes.iter().any(|&n| n < 2) {
        return insufficient(InsufficientReason::DegenerateGroup);
    }

    let total_n = group_sizes.iter().sum::<usize>();
    let grand_mean = groups.iter().flat_map(|g| g.as_ref()).sum::<f64>() / total_n as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    let mut summaries = Vec::with_capacity(k);
    for group in groups {
        let values = group.as_ref();
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        ss_between += n * (mean - grand_mean).powi(2);
        ss_within += ss;
        summaries.push(GroupSummary {
            n: values.len(),
            mean,
            stdev: (ss / (n - 1.0)).sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        });
    }

    if ss_within <= 0.0 {
        return insufficient(InsufficientReason::ZeroWithinGroupVariance);
    }

    let degrees_of_freedom = DegreesOfFreedom {
        between: k - 1,
        within: total_n - k,
    };
    let df_between = degrees_of_freedom.between as f64;
    let df_within = degrees_of_freedom.within as f64;
    let statistic = (ss_between / df_between) / (ss_within / df_within);
    // Both df are at least 1 here, so the distribution always exists
    let p_value = FisherSnedecor::new(df_between, df_within)
        .map_or(f64::NAN, |f_dist| f_dist.sf(statistic));
    let conclusion = if p_value < alpha {
        Conclusion::RejectNull
    } else {
        Conclusion::FailToRejectNull
    };

    AnovaOutcome::Completed(AnovaResult {
        statistic,
        p_value,
        degrees_of_freedom,
        alpha,
        conclusion,
        eta_squared: ss_between / (ss_between + ss_within),
        groups: summaries,
    })
}
