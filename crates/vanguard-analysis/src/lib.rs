//! Player analytics over snapshots of Destiny player records
//!
//! This crate turns a population of player records into the statistics shown
//! on the analytics dashboard. Numeric work is delegated to `vanguard_stats`;
//! this crate owns the domain: records, filters, data sources and the query
//! facade that ties them together.
//!
//! # Overview
//!
//! ## Query Workflow
//!
//! Every statistic is produced by the same pipeline:
//!
//! 1. **Parse Filter** ([`filter::FilterSpec`]): Optional min/max bounds from the client
//! 2. **Validate** ([`filter::RecordFilter`]): Reject inverted or non-finite bounds
//! 3. **Snapshot** ([`dataset::DatasetAccessor`]): One immutable [`record::Population`] per query
//! 4. **Compute**: descriptive statistics, histograms, [`comparison::ClassComparison`],
//!    correlation, hypothesis tests, or a [`profile::PercentileProfile`]
//! 5. **Respond** ([`query::QueryResponse`]): Results plus population [`query::Metadata`]
//!
//! ## Data Sources
//!
//! - [`dataset::FileSource`]: records exported by the ingestion process, reloaded on change
//! - [`dataset::SampleSource`]: a seeded synthetic population ([`sample`])
//! - [`dataset::RankedSource`]: primary source with a fallback on failure
//!
//! ## Dashboard
//!
//! [`dashboard::View`] maps each dashboard panel to its query.
//! [`dashboard::Navigator`] tracks navigation and [`dashboard::Generations`]
//! keeps slow responses from overwriting newer ones.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use vanguard_analysis::{
//!     dataset::SampleSource,
//!     filter::FilterSpec,
//!     query::{EngineConfig, Query, QueryKind, QueryResponse, StatisticsEngine},
//!     sample::SampleConfig,
//! };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let source = SampleSource::generate(SampleConfig::default());
//! let engine = StatisticsEngine::new(Arc::new(source), EngineConfig::default())?;
//!
//! let filter = FilterSpec::from_query_params([("min_light", "1790")])?;
//! let response = engine.run(&Query::new(QueryKind::Descriptive, filter))?;
//! if let QueryResponse::Descriptive(response) = &response {
//!     println!("mean light level: {:?}", response.light_level.mean);
//! }
//! println!("{}", serde_json::to_string_pretty(&response)?);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`record`]: Player records and validated populations
//! - [`metric`]: Numeric metrics derived from a record
//! - [`filter`]: Range filters and query parameter parsing
//! - [`dataset`]: Population snapshots from files, samples and ranked sources
//! - [`sample`]: Deterministic synthetic records
//! - [`comparison`]: Per-class statistics and mean comparison
//! - [`profile`]: Percentile profiles against an explicit reference population
//! - [`query`]: The statistics facade and its responses
//! - [`dashboard`]: Dashboard views, navigation and request generations

pub mod comparison;
pub mod dashboard;
pub mod dataset;
pub mod filter;
pub mod metric;
pub mod profile;
pub mod query;
pub mod record;
pub mod sample;
