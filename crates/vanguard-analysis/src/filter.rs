//! Range filters over player records.
//!
//! A [`FilterSpec`] is what a client asks for: optional inclusive bounds on
//! play time, light level and triumph score. It is untrusted until
//! [`FilterSpec::validate`] turns it into a [`RecordFilter`], which is the only
//! type that can select records.
//!
//! # Query parameters
//!
//! | Parameter | Field |
//! |---|---|
//! | `min_playtime`, `max_playtime` | `play_time_hours` |
//! | `min_light`, `max_light` | `light_level` |
//! | `min_triumph`, `max_triumph` | `triumph_score` |
//!
//! Empty values are treated as absent and unknown parameters are ignored.
//!
//! # Examples
//!
//! ```
//! use vanguard_analysis::filter::{FilterError, FilterSpec};
//!
//! let spec = FilterSpec::from_query_params([("min_light", "1800"), ("max_light", "")]).unwrap();
//! assert_eq!(spec.light_level.min, Some(1800.0));
//! assert_eq!(spec.light_level.max, None);
//!
//! let inverted = FilterSpec::from_query_params([("min_light", "1900"), ("max_light", "1800")])
//!     .unwrap()
//!     .validate();
//! assert!(matches!(inverted, Err(FilterError::InvertedBounds { .. })));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::{Population, Record};

/// A record field that can be bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    PlayTimeHours,
    LightLevel,
    TriumphScore,
}

impl FilterField {
    pub const ALL: [Self; 3] = [Self::PlayTimeHours, Self::LightLevel, Self::TriumphScore];

    #[must_use]
    pub fn to_str(self) -> &'static str {
        match self {
            FilterField::PlayTimeHours => "play_time_hours",
            FilterField::LightLevel => "light_level",
            FilterField::TriumphScore => "triumph_score",
        }
    }

    /// Query parameter names for the lower and upper bound.
    #[must_use]
    pub fn params(self) -> (&'static str, &'static str) {
        match self {
            FilterField::PlayTimeHours => ("min_playtime", "max_playtime"),
            FilterField::LightLevel => ("min_light", "max_light"),
            FilterField::TriumphScore => ("min_triumph", "max_triumph"),
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn value(self, record: &Record) -> f64 {
        match self {
            FilterField::PlayTimeHours => record.play_time_hours,
            FilterField::LightLevel => f64::from(record.light_level),
            FilterField::TriumphScore => record.triumph_score as f64,
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.to_str(), f)
    }
}

/// Why a filter was rejected.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum FilterError {
    #[display("{field}: minimum {min} is greater than maximum {max}")]
    InvertedBounds { field: FilterField, min: f64, max: f64 },
    #[display("{field}: bounds must be finite numbers")]
    NonFinite { field: FilterField },
    #[display("{param}: '{value}' is not a number")]
    NotANumber { param: String, value: String },
}

impl FilterError {
    /// Name of the offending field or query parameter.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            FilterError::InvertedBounds { field, .. } | FilterError::NonFinite { field } => {
                field.to_str()
            }
            FilterError::NotANumber { param, .. } => param,
        }
    }
}

/// Optional inclusive bounds on one field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    #[must_use]
    pub const fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    fn validate(self, field: FilterField) -> Result<Self, FilterError> {
        if self.min.into_iter().chain(self.max).any(|b| !b.is_finite()) {
            return Err(FilterError::NonFinite { field });
        }
        if let (Some(min), Some(max)) = (self.min, self.max)
            && min > max
        {
            return Err(FilterError::InvertedBounds { field, min, max });
        }
        Ok(self)
    }

    fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Client-supplied filter criteria, not yet validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub play_time: Bounds,
    pub light_level: Bounds,
    pub triumph_score: Bounds,
}

impl FilterSpec {
    /// A filter that matches every record.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bounds(&self, field: FilterField) -> &Bounds {
        match field {
            FilterField::PlayTimeHours => &self.play_time,
            FilterField::LightLevel => &self.light_level,
            FilterField::TriumphScore => &self.triumph_score,
        }
    }

    pub fn bounds_mut(&mut self, field: FilterField) -> &mut Bounds {
        match field {
            FilterField::PlayTimeHours => &mut self.play_time,
            FilterField::LightLevel => &mut self.light_level,
            FilterField::TriumphScore => &mut self.triumph_score,
        }
    }

    /// Parses the filter query parameters.
    ///
    /// Only numeric syntax is checked here; bound ordering is checked by
    /// [`validate`](Self::validate). A repeated parameter keeps its last value.
    pub fn from_query_params<I, K, V>(params: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut spec = Self::default();
        for (key, value) in params {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            let Some((field, is_min)) = FilterField::ALL.into_iter().find_map(|field| {
                let (min, max) = field.params();
                (key == min)
                    .then_some((field, true))
                    .or_else(|| (key == max).then_some((field, false)))
            }) else {
                continue;
            };
            let bound = if value.is_empty() {
                None
            } else {
                let parsed = value
                    .parse::<f64>()
                    .map_err(|_| FilterError::NotANumber {
                        param: key.to_owned(),
                        value: value.to_owned(),
                    })?;
                Some(parsed)
            };
            let bounds = spec.bounds_mut(field);
            if is_min {
                bounds.min = bound;
            } else {
                bounds.max = bound;
            }
        }
        Ok(spec)
    }

    /// Query parameters reproducing this filter.
    #[must_use]
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![];
        for field in FilterField::ALL {
            let bounds = self.bounds(field);
            let (min_param, max_param) = field.params();
            if let Some(min) = bounds.min {
                params.push((min_param, min.to_string()));
            }
            if let Some(max) = bounds.max {
                params.push((max_param, max.to_string()));
            }
        }
        params
    }

    /// Checks every bound and produces an executable filter.
    ///
    /// Inverted bounds are reported, never swapped.
    pub fn validate(&self) -> Result<RecordFilter, FilterError> {
        let mut filter = RecordFilter {
            spec: Self::default(),
        };
        for field in FilterField::ALL {
            *filter.spec.bounds_mut(field) = self.bounds(field).validate(field)?;
        }
        Ok(filter)
    }
}

/// A validated filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordFilter {
    spec: FilterSpec,
}

impl RecordFilter {
    #[must_use]
    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// Whether `record` satisfies every bound (inclusive).
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        FilterField::ALL
            .into_iter()
            .all(|field| self.spec.bounds(field).contains(field.value(record)))
    }

    /// Records of `population` passing the filter, in population order.
    #[must_use]
    pub fn apply<'a>(&self, population: &'a Population) -> Vec<&'a Record> {
        population
            .records()
            .iter()
            .filter(|r| self.matches(r))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CharacterClass, test_util::record};

    fn population() -> Population {
        Population::new(
            None,
            vec![
                record("1", CharacterClass::Titan, 1780, 1_000, 10.0),
                record("2", CharacterClass::Hunter, 1800, 5_000, 250.0),
                record("3", CharacterClass::Warlock, 1810, 9_000, 600.0),
                record("4", CharacterClass::Titan, 1820, 20_000, 1200.0),
            ],
        )
        .unwrap()
    }

    fn ids(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.player_id.clone()).collect()
    }

    #[test]
    fn test_unbounded_filter_keeps_everything() {
        let population = population();
        let filter = FilterSpec::unbounded().validate().unwrap();
        assert_eq!(filter.apply(&population).len(), 4);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let population = population();
        let filter = FilterSpec::from_query_params([("min_light", "1800"), ("max_light", "1810")])
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(ids(&filter.apply(&population)), ["2", "3"]);
    }

    #[test]
    fn test_bounds_on_every_field_combine() {
        let population = population();
        let filter = FilterSpec::from_query_params([
            ("min_playtime", "100"),
            ("max_triumph", "9000"),
            ("min_light", "1790"),
        ])
        .unwrap()
        .validate()
        .unwrap();
        assert_eq!(ids(&filter.apply(&population)), ["2", "3"]);
    }

    #[test]
    fn test_equal_bounds_select_exact_value() {
        let population = population();
        let filter = FilterSpec::from_query_params([("min_light", "1810"), ("max_light", "1810")])
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(ids(&filter.apply(&population)), ["3"]);
    }

    #[test]
    fn test_tightening_never_grows_result() {
        let population = population();
        let mut previous = usize::MAX;
        for min in [1700.0, 1790.0, 1805.0, 1815.0, 1900.0] {
            let spec = FilterSpec {
                light_level: Bounds::new(Some(min), None),
                ..FilterSpec::default()
            };
            let len = spec.validate().unwrap().apply(&population).len();
            assert!(len <= previous);
            previous = len;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let spec = FilterSpec::from_query_params([("min_triumph", "10"), ("max_triumph", "5")]).unwrap();
        let err = spec.validate().unwrap_err();
        assert_eq!(
            err,
            FilterError::InvertedBounds {
                field: FilterField::TriumphScore,
                min: 10.0,
                max: 5.0,
            }
        );
        assert_eq!(err.field(), "triumph_score");
    }

    #[test]
    fn test_non_finite_bounds_are_rejected() {
        let spec = FilterSpec::from_query_params([("max_playtime", "NaN")]).unwrap();
        assert_eq!(
            spec.validate(),
            Err(FilterError::NonFinite {
                field: FilterField::PlayTimeHours
            })
        );
        let spec = FilterSpec::from_query_params([("min_light", "inf")]).unwrap();
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_non_numeric_parameter_is_rejected() {
        let err = FilterSpec::from_query_params([("min_light", "high")]).unwrap_err();
        assert_eq!(err.field(), "min_light");
        assert!(err.to_string().contains("high"));
    }

    #[test]
    fn test_unknown_and_empty_parameters_are_ignored() {
        let spec = FilterSpec::from_query_params([("page", "2"), ("min_light", " ")]).unwrap();
        assert_eq!(spec, FilterSpec::unbounded());
    }

    #[test]
    fn test_query_params_round_trip() {
        let spec = FilterSpec {
            play_time: Bounds::new(None, Some(99.5)),
            triumph_score: Bounds::new(Some(100.0), Some(200.0)),
            ..FilterSpec::default()
        };
        let params = spec.to_query_params();
        assert_eq!(FilterSpec::from_query_params(params).unwrap(), spec);
    }
}
