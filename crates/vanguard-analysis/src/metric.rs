//! Numeric views of a record.

use serde::Serialize;

use crate::record::Record;

/// A numeric quantity measured on every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    LightLevel,
    Triumph,
    PlayTime,
    Characters,
    Versatility,
}

impl Metric {
    /// Metrics tracked by a percentile profile, in display order.
    pub const PROFILE: [Self; 5] = [
        Self::LightLevel,
        Self::Triumph,
        Self::PlayTime,
        Self::Characters,
        Self::Versatility,
    ];

    #[must_use]
    pub fn to_str(self) -> &'static str {
        match self {
            Metric::LightLevel => "light_level",
            Metric::Triumph => "triumph",
            Metric::PlayTime => "play_time",
            Metric::Characters => "characters",
            Metric::Versatility => "versatility",
        }
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn value(self, record: &Record) -> f64 {
        match self {
            Metric::LightLevel => f64::from(record.light_level),
            // Triumph scores stay far below 2^53, so the conversion is exact
            Metric::Triumph => record.triumph_score as f64,
            Metric::PlayTime => record.play_time_hours,
            Metric::Characters => f64::from(record.character_count),
            Metric::Versatility => f64::from(record.versatility()),
        }
    }

    /// Collects this metric over `records`, preserving their order.
    pub fn values<'a, I>(self, records: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records.into_iter().map(|r| self.value(r)).collect()
    }
}
