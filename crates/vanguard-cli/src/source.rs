//! Arguments shared by the commands that run queries.

use std::{path::PathBuf, sync::Arc};

use vanguard_analysis::{
    dataset::{DatasetAccessor, FileSource, RankedSource, SampleSource},
    filter::{Bounds, FilterSpec},
    query::{EngineConfig, StatisticsEngine},
    sample::SampleConfig,
};

/// Where player records come from.
///
/// With `--records` the file is read (and re-read whenever it changes), and
/// the generated sample only stands in while the file cannot be loaded.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SourceArg {
    /// JSON file of player records
    #[arg(long, env = "VANGUARD_RECORDS")]
    records: Option<PathBuf>,
    /// Number of records in the generated sample population
    #[arg(long, default_value_t = SampleConfig::default().num_records)]
    sample_size: usize,
    /// Seed of the generated sample population
    #[arg(long, default_value_t = SampleConfig::default().seed)]
    sample_seed: u64,
}

impl SourceArg {
    pub(crate) fn accessor(&self) -> Arc<dyn DatasetAccessor> {
        let sample = SampleSource::generate(SampleConfig {
            num_records: self.sample_size,
            seed: self.sample_seed,
        });
        match &self.records {
            Some(path) => Arc::new(RankedSource::new(FileSource::new(path.clone()), sample)),
            None => Arc::new(sample),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EngineArg {
    /// Width of a light level histogram bucket
    #[arg(long, default_value_t = EngineConfig::default().bucket_width)]
    bucket_width: f64,
    /// Maximum number of points in the correlation scatter sample
    #[arg(long, default_value_t = EngineConfig::default().scatter_cap)]
    scatter_cap: usize,
    /// Significance level of the ANOVA
    #[arg(long, default_value_t = EngineConfig::default().alpha)]
    alpha: f64,
}

impl EngineArg {
    pub(crate) fn config(&self) -> EngineConfig {
        EngineConfig {
            bucket_width: self.bucket_width,
            scatter_cap: self.scatter_cap,
            alpha: self.alpha,
        }
    }
}

/// Builds an engine over the records selected by `source`.
pub(crate) fn build_engine(
    source: &SourceArg,
    engine: &EngineArg,
) -> anyhow::Result<StatisticsEngine> {
    let accessor = source.accessor();
    tracing::info!(source = accessor.name(), "using player records");
    Ok(StatisticsEngine::new(accessor, engine.config())?)
}

/// Inclusive bounds on the filterable fields.
#[derive(Debug, Clone, Default, clap::Args)]
pub(crate) struct FilterArg {
    #[arg(long)]
    min_playtime: Option<f64>,
    #[arg(long)]
    max_playtime: Option<f64>,
    #[arg(long)]
    min_light: Option<f64>,
    #[arg(long)]
    max_light: Option<f64>,
    #[arg(long)]
    min_triumph: Option<f64>,
    #[arg(long)]
    max_triumph: Option<f64>,
}

impl FilterArg {
    pub(crate) fn spec(&self) -> FilterSpec {
        FilterSpec {
            play_time: Bounds::new(self.min_playtime, self.max_playtime),
            light_level: Bounds::new(self.min_light, self.max_light),
            triumph_score: Bounds::new(self.min_triumph, self.max_triumph),
        }
    }
}
