//! The statistics query facade.
//!
//! [`StatisticsEngine::run`] is the single entry point used by every surface
//! (HTTP, CLI). A run always follows the same steps:
//!
//! 1. Validate the filter (before any I/O or computation)
//! 2. Take one snapshot from the dataset accessor
//! 3. Select the filtered subset
//! 4. Compute the requested statistics
//! 5. Attach [`Metadata`] describing the population
//!
//! Runs are pure with respect to the snapshot: the same query against an
//! unchanged snapshot always produces the same response.

use std::{collections::BTreeMap, sync::Arc, time::Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use vanguard_stats::{
    anova::AnovaOutcome,
    correlation::{Correlation, Direction, RegressionError, ScatterSample, Strength},
    descriptive::StatResult,
    histogram::Histogram,
};

use crate::{
    comparison::ClassComparison,
    dataset::{DatasetAccessor, DatasetError},
    filter::{FilterError, FilterSpec},
    metric::Metric,
    profile::{PercentileProfile, PopulationRanks, Reference},
    record::{CharacterClass, Population, Record},
};

/// Fewest measured records a correlation is reported for.
pub const MIN_CORRELATION_SAMPLE: usize = 3;

/// Tunable parameters of the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Width of a light level histogram bucket
    pub bucket_width: f64,
    /// Maximum number of points in a scatter sample
    pub scatter_cap: usize,
    /// Significance level of hypothesis tests
    pub alpha: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bucket_width: 10.0,
            scatter_cap: 200,
            alpha: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidConfig {
    #[display("bucket width must be a positive finite number, got {_0}")]
    BucketWidth(#[error(not(source))] f64),
    #[display("scatter cap must be at least 1")]
    ScatterCap,
    #[display("alpha must lie strictly between 0 and 1, got {_0}")]
    Alpha(#[error(not(source))] f64),
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if !(self.bucket_width.is_finite() && self.bucket_width > 0.0) {
            return Err(InvalidConfig::BucketWidth(self.bucket_width));
        }
        if self.scatter_cap == 0 {
            return Err(InvalidConfig::ScatterCap);
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(InvalidConfig::Alpha(self.alpha));
        }
        Ok(())
    }
}

/// The closed set of statistics the engine answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    Descriptive,
    Distribution,
    ClassComparison,
    Correlation,
    HypothesisTests,
    FilteredCount,
    Profile {
        player_id: String,
        reference: Reference,
    },
}

impl QueryKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            QueryKind::Descriptive => "descriptive",
            QueryKind::Distribution => "distribution",
            QueryKind::ClassComparison => "class-comparison",
            QueryKind::Correlation => "correlation",
            QueryKind::HypothesisTests => "hypothesis-tests",
            QueryKind::FilteredCount => "filtered-count",
            QueryKind::Profile { .. } => "profile",
        }
    }
}

/// A statistics request: what to compute, over which records.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub kind: QueryKind,
    pub filter: FilterSpec,
}

impl Query {
    #[must_use]
    pub fn new(kind: QueryKind, filter: FilterSpec) -> Self {
        Self { kind, filter }
    }
}

/// Population summary attached to every response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub total_players: usize,
    pub filtered_count: usize,
    pub generated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveResponse {
    pub light_level: StatResult,
    pub triumph_score: StatResult,
    pub play_time_hours: StatResult,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionResponse {
    pub light_level_distribution: Histogram,
    pub bucket_width: f64,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualizationData {
    /// Sorted light levels per class, for box plots
    pub data: BTreeMap<CharacterClass, Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassComparisonResponse {
    #[serde(flatten)]
    pub classes: BTreeMap<CharacterClass, StatResult>,
    pub visualization_data: VisualizationData,
    pub metadata: Metadata,
}

/// Regression line, or why none exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegressionSummary {
    Fitted {
        slope: f64,
        intercept: f64,
        /// Standard error of the slope
        std_error: Option<f64>,
        r: Option<f64>,
    },
    Undefined {
        reason: RegressionError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationAnalysis {
    pub x_metric: Metric,
    pub y_metric: Metric,
    pub sample_size: usize,
    pub scatter_data: ScatterSample,
    pub regression: RegressionSummary,
    /// End points of the regression line over the observed x range
    pub trend_line: Option<[(f64, f64); 2]>,
    pub r: Option<f64>,
    pub r_squared: Option<f64>,
    pub p_value: Option<f64>,
    pub strength: Option<Strength>,
    pub direction: Option<Direction>,
}

/// Correlation analysis, or why too few records qualified for one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CorrelationOutcome {
    Completed(CorrelationAnalysis),
    InsufficientSample {
        sample_size: usize,
        minimum_sample_size: usize,
    },
}

impl CorrelationOutcome {
    #[must_use]
    pub fn completed(&self) -> Option<&CorrelationAnalysis> {
        match self {
            Self::Completed(analysis) => Some(analysis),
            Self::InsufficientSample { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResponse {
    pub correlation_analysis: CorrelationOutcome,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HypothesisTestsResponse {
    pub metric: Metric,
    #[serde(flatten)]
    pub outcome: AnovaOutcome,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredCountResponse {
    pub filtered_count: usize,
    pub total_players: usize,
    /// Median of the filtered subset ranked against the full population
    pub percentiles: Option<PercentileProfile>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileResponse {
    pub player_id: String,
    pub display_name: String,
    pub reference: Reference,
    pub percentiles: Option<PercentileProfile>,
    pub metadata: Metadata,
}

/// Response of [`StatisticsEngine::run`], shaped by the query kind.
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::From)]
#[serde(untagged)]
pub enum QueryResponse {
    Descriptive(DescriptiveResponse),
    Distribution(DistributionResponse),
    ClassComparison(ClassComparisonResponse),
    Correlation(CorrelationResponse),
    HypothesisTests(HypothesisTestsResponse),
    FilteredCount(FilteredCountResponse),
    Profile(ProfileResponse),
}

impl QueryResponse {
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        match self {
            QueryResponse::Descriptive(r) => &r.metadata,
            QueryResponse::Distribution(r) => &r.metadata,
            QueryResponse::ClassComparison(r) => &r.metadata,
            QueryResponse::Correlation(r) => &r.metadata,
            QueryResponse::HypothesisTests(r) => &r.metadata,
            QueryResponse::FilteredCount(r) => &r.metadata,
            QueryResponse::Profile(r) => &r.metadata,
        }
    }
}

/// Why a query failed.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum QueryError {
    #[display("invalid filter: {_0}")]
    InvalidFilter(#[error(source)] FilterError),
    #[display("data unavailable: {_0}")]
    DataUnavailable(#[error(source)] DatasetError),
    #[display("player '{player_id}' not found")]
    #[from(skip)]
    PlayerNotFound { player_id: String },
    #[display("internal computation error: {message}")]
    #[from(skip)]
    InternalComputation { message: String },
}

/// Answers statistics queries over a dataset accessor.
pub struct StatisticsEngine {
    accessor: Arc<dyn DatasetAccessor>,
    config: EngineConfig,
}

impl StatisticsEngine {
    pub fn new(
        accessor: Arc<dyn DatasetAccessor>,
        config: EngineConfig,
    ) -> Result<Self, InvalidConfig> {
        config.validate()?;
        Ok(Self { accessor, config })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn run(&self, query: &Query) -> Result<QueryResponse, QueryError> {
        let start = Instant::now();
        let filter = query.filter.validate()?;
        let snapshot = self.accessor.snapshot()?;
        let filtered = filter.apply(&snapshot);
        let metadata = Metadata {
            total_players: snapshot.len(),
            filtered_count: filtered.len(),
            generated_at: snapshot.generated_at(),
        };

        let response = match &query.kind {
            QueryKind::Descriptive => descriptive(&filtered, metadata).into(),
            QueryKind::Distribution => self.distribution(&filtered, metadata).into(),
            QueryKind::ClassComparison => class_comparison(&filtered, metadata).into(),
            QueryKind::Correlation => self.correlation(&filtered, metadata)?.into(),
            QueryKind::HypothesisTests => self.hypothesis_tests(&filtered, metadata)?.into(),
            QueryKind::FilteredCount => filtered_count(&snapshot, &filtered, metadata)?.into(),
            QueryKind::Profile {
                player_id,
                reference,
            } => profile(&snapshot, &filtered, player_id, *reference, metadata)?.into(),
        };

        debug!(
            kind = query.kind.name(),
            source = self.accessor.name(),
            total_players = snapshot.len(),
            filtered_count = filtered.len(),
            elapsed = ?start.elapsed(),
            "statistics query completed"
        );
        Ok(response)
    }

    fn distribution(&self, filtered: &[&Record], metadata: Metadata) -> DistributionResponse {
        let values = Metric::LightLevel.values(filtered.iter().copied());
        DistributionResponse {
            light_level_distribution: Histogram::with_fixed_width(values, self.config.bucket_width),
            bucket_width: self.config.bucket_width,
            metadata,
        }
    }

    fn correlation(
        &self,
        filtered: &[&Record],
        metadata: Metadata,
    ) -> Result<CorrelationResponse, QueryError> {
        let (x_metric, y_metric) = (Metric::LightLevel, Metric::Triumph);
        // Unsynced light and zero triumph are placeholders for players without data
        let measured = filtered
            .iter()
            .copied()
            .filter(|r| r.has_synced_light() && r.triumph_score > 0)
            .collect::<Vec<_>>();
        if measured.len() < MIN_CORRELATION_SAMPLE {
            return Ok(CorrelationResponse {
                correlation_analysis: CorrelationOutcome::InsufficientSample {
                    sample_size: measured.len(),
                    minimum_sample_size: MIN_CORRELATION_SAMPLE,
                },
                metadata,
            });
        }

        let xs = x_metric.values(measured.iter().copied());
        let ys = y_metric.values(measured.iter().copied());
        let correlation = Correlation::compute(&xs, &ys, self.config.scatter_cap);

        let regression = match correlation.regression {
            Ok(line) => {
                ensure_finite(
                    "regression",
                    [line.slope, line.intercept].into_iter().chain(line.std_error),
                )?;
                RegressionSummary::Fitted {
                    slope: line.slope,
                    intercept: line.intercept,
                    std_error: line.std_error,
                    r: correlation.r,
                }
            }
            Err(reason) => RegressionSummary::Undefined { reason },
        };
        ensure_finite("correlation", correlation.r.into_iter().chain(correlation.p_value))?;

        Ok(CorrelationResponse {
            correlation_analysis: CorrelationOutcome::Completed(CorrelationAnalysis {
                x_metric,
                y_metric,
                sample_size: correlation.sample_size,
                trend_line: correlation.trend_line(),
                regression,
                r: correlation.r,
                r_squared: correlation.r_squared(),
                p_value: correlation.p_value,
                strength: correlation.r.map(Strength::from_r),
                direction: correlation.r.map(Direction::from_r),
                scatter_data: correlation.scatter,
            }),
            metadata,
        })
    }

    fn hypothesis_tests(
        &self,
        filtered: &[&Record],
        metadata: Metadata,
    ) -> Result<HypothesisTestsResponse, QueryError> {
        let metric = Metric::LightLevel;
        let comparison = ClassComparison::from_records(filtered.iter().copied(), metric);
        let outcome = comparison.test_means(self.config.alpha);
        if let Some(result) = outcome.completed() {
            ensure_finite("hypothesis test", [result.statistic, result.p_value])?;
        }
        Ok(HypothesisTestsResponse {
            metric,
            outcome,
            metadata,
        })
    }
}

fn descriptive(filtered: &[&Record], metadata: Metadata) -> DescriptiveResponse {
    let stats = |metric: Metric| StatResult::new(metric.values(filtered.iter().copied()));
    DescriptiveResponse {
        light_level: stats(Metric::LightLevel),
        triumph_score: stats(Metric::Triumph),
        play_time_hours: stats(Metric::PlayTime),
        metadata,
    }
}

fn class_comparison(filtered: &[&Record], metadata: Metadata) -> ClassComparisonResponse {
    let comparison = ClassComparison::from_records(filtered.iter().copied(), Metric::LightLevel);
    let mut classes = BTreeMap::new();
    let mut data = BTreeMap::new();
    for group in comparison.groups {
        classes.insert(group.group_key, group.stats);
        data.insert(group.group_key, group.raw_values);
    }
    ClassComparisonResponse {
        classes,
        visualization_data: VisualizationData { data },
        metadata,
    }
}

fn filtered_count(
    snapshot: &Population,
    filtered: &[&Record],
    metadata: Metadata,
) -> Result<FilteredCountResponse, QueryError> {
    let full = PopulationRanks::from_records(snapshot.records());
    let percentiles = PercentileProfile::of_medians(&full, filtered.iter().copied());
    if let Some(profile) = &percentiles {
        ensure_finite("percentile profile", Metric::PROFILE.map(|m| profile.get(m)))?;
    }
    Ok(FilteredCountResponse {
        filtered_count: metadata.filtered_count,
        total_players: metadata.total_players,
        percentiles,
        metadata,
    })
}

fn profile(
    snapshot: &Population,
    filtered: &[&Record],
    player_id: &str,
    reference: Reference,
    metadata: Metadata,
) -> Result<ProfileResponse, QueryError> {
    let record = snapshot
        .find(player_id)
        .ok_or_else(|| QueryError::PlayerNotFound {
            player_id: player_id.to_owned(),
        })?;
    let ranks = match reference {
        Reference::Full => PopulationRanks::from_records(snapshot.records()),
        Reference::Filtered => PopulationRanks::from_records(filtered.iter().copied()),
    };
    let percentiles = PercentileProfile::of_record(&ranks, record);
    if let Some(profile) = &percentiles {
        ensure_finite("percentile profile", Metric::PROFILE.map(|m| profile.get(m)))?;
    }
    Ok(ProfileResponse {
        player_id: record.player_id.clone(),
        display_name: record.display_name.clone(),
        reference,
        percentiles,
        metadata,
    })
}

/// Rejects NaN or infinite results, which the numeric guards should make impossible.
fn ensure_finite<I>(what: &str, values: I) -> Result<(), QueryError>
where
    I: IntoIterator<Item = f64>,
{
    if values.into_iter().all(f64::is_finite) {
        Ok(())
    } else {
        Err(QueryError::InternalComputation {
            message: format!("{what} produced a non-finite value"),
        })
    }
}
