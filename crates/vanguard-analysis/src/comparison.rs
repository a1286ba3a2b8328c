//! Per-class comparison of a metric.
//!
//! Records are partitioned by their main class. Each group gets descriptive
//! statistics and its sorted raw values (for box plots), and the groups can
//! be tested for a difference in means with a one-way ANOVA.
//!
//! Records without a synced light level are left out of every group.
//!
//! # Example
//!
//! ```
//! use vanguard_analysis::{
//!     comparison::ClassComparison,
//!     metric::Metric,
//!     sample::{SampleConfig, generate},
//! };
//!
//! let records = generate(SampleConfig::default());
//! let comparison = ClassComparison::from_records(&records, Metric::LightLevel);
//! for group in &comparison.groups {
//!     println!("{}: n={}", group.group_key, group.stats.count);
//! }
//! let outcome = comparison.test_means(0.05);
//! assert!(outcome.completed().is_some());
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use vanguard_stats::{
    anova::{self, AnovaOutcome},
    descriptive::StatResult,
};

use crate::{
    metric::Metric,
    record::{CharacterClass, Record},
};

/// Statistics of one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupResult {
    pub group_key: CharacterClass,
    pub stats: StatResult,
    /// Metric values of the group, ascending
    pub raw_values: Vec<f64>,
}

impl GroupResult {
    /// A group too small for a sample standard deviation.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.stats.is_degenerate()
    }
}

/// A metric compared across classes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassComparison {
    pub metric: Metric,
    /// Non-empty groups in class order (titan, hunter, warlock)
    pub groups: Vec<GroupResult>,
}

impl ClassComparison {
    pub fn from_records<'a, I>(records: I, metric: Metric) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut values_by_class: BTreeMap<CharacterClass, Vec<f64>> = BTreeMap::new();
        for record in records.into_iter().filter(|r| r.has_synced_light()) {
            values_by_class
                .entry(record.class_tag)
                .or_default()
                .push(metric.value(record));
        }

        let groups = values_by_class
            .into_iter()
            .map(|(group_key, mut raw_values)| {
                raw_values.sort_by(f64::total_cmp);
                GroupResult {
                    group_key,
                    stats: StatResult::from_sorted(&raw_values),
                    raw_values,
                }
            })
            .collect();

        Self { metric, groups }
    }

    #[must_use]
    pub fn group(&self, class: CharacterClass) -> Option<&GroupResult> {
        self.groups.iter().find(|g| g.group_key == class)
    }

    /// One-way ANOVA of the group means at significance level `alpha`.
    #[must_use]
    pub fn test_means(&self, alpha: f64) -> AnovaOutcome {
        let groups = self
            .groups
            .iter()
            .map(|g| g.raw_values.as_slice())
            .collect::<Vec<_>>();
        anova::one_way_anova(&groups, alpha)
    }
}

#[cfg(test)]
mod tests {
    use vanguard_stats::anova::{Conclusion, InsufficientReason};

    use super::*;
    use crate::record::test_util::record;

    #[test]
    fn test_groups_in_class_order_without_empty_classes() {
        let records = [
            record("1", CharacterClass::Warlock, 1810, 0, 0.0),
            record("2", CharacterClass::Titan, 1800, 0, 0.0),
            record("3", CharacterClass::Warlock, 1790, 0, 0.0),
        ];
        let comparison = ClassComparison::from_records(&records, Metric::LightLevel);
        let keys = comparison
            .groups
            .iter()
            .map(|g| g.group_key)
            .collect::<Vec<_>>();
        assert_eq!(keys, [CharacterClass::Titan, CharacterClass::Warlock]);
        assert!(comparison.group(CharacterClass::Hunter).is_none());

        let warlock = comparison.group(CharacterClass::Warlock).unwrap();
        assert_eq!(warlock.raw_values, [1790.0, 1810.0]);
        assert_eq!(warlock.stats.mean, Some(1800.0));
    }

    #[test]
    fn test_single_member_group_is_degenerate() {
        let records = [
            record("1", CharacterClass::Titan, 1800, 0, 0.0),
            record("2", CharacterClass::Titan, 1810, 0, 0.0),
            record("3", CharacterClass::Hunter, 1790, 0, 0.0),
        ];
        let comparison = ClassComparison::from_records(&records, Metric::LightLevel);
        let hunter = comparison.group(CharacterClass::Hunter).unwrap();
        assert!(hunter.is_degenerate());
        assert_eq!(hunter.stats.stdev, None);
        assert!(matches!(
            comparison.test_means(0.05),
            AnovaOutcome::InsufficientSample {
                reason: InsufficientReason::DegenerateGroup,
                ..
            }
        ));
    }

    #[test]
    fn test_separated_classes_reject_null() {
        let mut records = vec![];
        for (i, light) in [1700, 1702, 1704, 1706].into_iter().enumerate() {
            records.push(record(&format!("t{i}"), CharacterClass::Titan, light, 0, 0.0));
            records.push(record(&format!("h{i}"), CharacterClass::Hunter, light + 100, 0, 0.0));
            records.push(record(&format!("w{i}"), CharacterClass::Warlock, light + 200, 0, 0.0));
        }
        let comparison = ClassComparison::from_records(&records, Metric::LightLevel);
        let outcome = comparison.test_means(0.05);
        let result = outcome.completed().unwrap();
        assert_eq!(result.conclusion, Conclusion::RejectNull);
        assert_eq!(result.degrees_of_freedom.between, 2);
        assert_eq!(result.degrees_of_freedom.within, 9);
    }

    #[test]
    fn test_unsynced_records_are_left_out() {
        let mut records = vec![record("t0", CharacterClass::Titan, 0, 0, 0.0)];
        for (i, light) in [1800, 1805, 1810].into_iter().enumerate() {
            records.push(record(&format!("t{}", i + 1), CharacterClass::Titan, light, 0, 0.0));
            records.push(record(&format!("h{i}"), CharacterClass::Hunter, light, 0, 0.0));
            records.push(record(&format!("w{i}"), CharacterClass::Warlock, light, 0, 0.0));
        }
        let comparison = ClassComparison::from_records(&records, Metric::LightLevel);
        let titan = comparison.group(CharacterClass::Titan).unwrap();
        assert_eq!(titan.raw_values, [1800.0, 1805.0, 1810.0]);
        assert_eq!(titan.stats.mean, Some(1805.0));

        let outcome = comparison.test_means(0.05);
        let result = outcome.completed().unwrap();
        assert!(result.statistic.abs() < 1e-12);
        assert_eq!(result.degrees_of_freedom.within, 6);
        assert_eq!(result.conclusion, Conclusion::FailToRejectNull);
    }

    #[test]
    fn test_only_unsynced_class_is_omitted() {
        let records = [
            record("1", CharacterClass::Titan, 1800, 0, 0.0),
            record("2", CharacterClass::Hunter, 0, 0, 0.0),
        ];
        let comparison = ClassComparison::from_records(&records, Metric::Triumph);
        assert!(comparison.group(CharacterClass::Hunter).is_none());
        assert_eq!(comparison.groups.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let comparison = ClassComparison::from_records(&Vec::<Record>::new(), Metric::Triumph);
        assert!(comparison.groups.is_empty());
        assert!(comparison.test_means(0.05).completed().is_none());
    }
}
