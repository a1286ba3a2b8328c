//! Percentile profiles for radar-style charts.
//!
//! A profile places a subject (one player, or the median of a filtered
//! subset) within a reference population, scoring each tracked metric from
//! 0 to 100 with midrank percentiles. The reference population is always
//! chosen explicitly through [`Reference`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use vanguard_stats::percentiles::{self, PercentileRank};

use crate::{metric::Metric, record::Record};

/// Population a subject is ranked against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reference {
    /// Every record in the snapshot
    #[default]
    Full,
    /// Only records passing the request's filter
    Filtered,
}

impl Reference {
    #[must_use]
    pub fn to_str(self) -> &'static str {
        match self {
            Reference::Full => "full",
            Reference::Filtered => "filtered",
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.to_str(), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown reference population '{value}', expected 'full' or 'filtered'")]
pub struct UnknownReference {
    pub value: String,
}

impl FromStr for Reference {
    type Err = UnknownReference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Self::Full),
            "filtered" => Ok(Self::Filtered),
            _ => Err(UnknownReference {
                value: s.to_owned(),
            }),
        }
    }
}

/// Sorted metric values of a reference population.
#[derive(Debug, Clone)]
pub struct PopulationRanks {
    // Indexed by `Metric as usize`; `Metric::PROFILE` lists every metric in declaration order
    ranks: [PercentileRank; Metric::PROFILE.len()],
}

impl PopulationRanks {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let records = records.into_iter().collect::<Vec<_>>();
        let ranks = Metric::PROFILE
            .map(|metric| PercentileRank::from_values(metric.values(records.iter().copied())));
        Self { ranks }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks[0].len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks[0].is_empty()
    }

    #[must_use]
    pub fn rank(&self, metric: Metric) -> &PercentileRank {
        &self.ranks[metric as usize]
    }
}

/// Percentile scores in `[0, 100]`, one per tracked metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileProfile {
    pub light_level: f64,
    pub triumph: f64,
    pub play_time: f64,
    pub characters: f64,
    pub versatility: f64,
}

impl PercentileProfile {
    /// Scores `subject(metric)` for every metric against `reference`.
    ///
    /// Returns `None` when the reference population is empty.
    pub fn of_values<F>(reference: &PopulationRanks, mut subject: F) -> Option<Self>
    where
        F: FnMut(Metric) -> f64,
    {
        let mut score = |metric| reference.rank(metric).percentile(subject(metric));
        Some(Self {
            light_level: score(Metric::LightLevel)?,
            triumph: score(Metric::Triumph)?,
            play_time: score(Metric::PlayTime)?,
            characters: score(Metric::Characters)?,
            versatility: score(Metric::Versatility)?,
        })
    }

    /// Profile of one record.
    #[must_use]
    pub fn of_record(reference: &PopulationRanks, record: &Record) -> Option<Self> {
        Self::of_values(reference, |metric| metric.value(record))
    }

    /// Profile of the per-metric medians of `subset`.
    ///
    /// Returns `None` when `subset` or the reference population is empty.
    pub fn of_medians<'a, I>(reference: &PopulationRanks, subset: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let subset = PopulationRanks::from_records(subset);
        let medians = Metric::PROFILE
            .into_iter()
            .map(|metric| percentiles::quantile(subset.rank(metric).sorted_values(), 0.5))
            .collect::<Option<Vec<_>>>()?;
        Self::of_values(reference, |metric| medians[metric as usize])
    }

    #[must_use]
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::LightLevel => self.light_level,
            Metric::Triumph => self.triumph,
            Metric::PlayTime => self.play_time,
            Metric::Characters => self.characters,
            Metric::Versatility => self.versatility,
        }
    }
}
