//! Read-only access to the record population.
//!
//! Every statistic is computed over one [`Population`] snapshot obtained from
//! a [`DatasetAccessor`]. Snapshots are shared as `Arc<Population>` and never
//! mutated, so a request keeps a consistent view even if the source reloads
//! while it runs.
//!
//! # Sources
//!
//! - [`FileSource`]: a JSON [`RecordCollection`] on disk, reloaded when its
//!   modification time changes
//! - [`SampleSource`]: a fixed in-memory population, normally the seeded
//!   synthetic sample
//! - [`RankedSource`]: a primary source with a fallback that is consulted only
//!   when the primary fails

use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
    time::SystemTime,
};

use tracing::{info, warn};

use crate::{
    filter::RecordFilter,
    record::{Population, RecordCollection, RecordError},
    sample::{self, SampleConfig},
};

/// Why a population snapshot could not be produced.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum DatasetError {
    #[display("failed to read records from {}", path.display())]
    #[from(skip)]
    Io { path: PathBuf, source: io::Error },
    #[display("failed to parse records from {}", path.display())]
    #[from(skip)]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("invalid record")]
    InvalidRecord(#[error(source)] RecordError),
    #[display("record cache lock is poisoned")]
    #[from(skip)]
    Poisoned,
}

/// A read-only provider of population snapshots.
pub trait DatasetAccessor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// The current population.
    fn snapshot(&self) -> Result<Arc<Population>, DatasetError>;

    /// The current population restricted to records passing `filter`.
    ///
    /// An unbounded filter yields the whole population.
    fn fetch(&self, filter: &RecordFilter) -> Result<Population, DatasetError> {
        let snapshot = self.snapshot()?;
        let records = filter.apply(&snapshot).into_iter().cloned().collect();
        Ok(Population::from_valid(snapshot.generated_at(), records))
    }
}

#[derive(Debug)]
struct CachedPopulation {
    modified: SystemTime,
    population: Arc<Population>,
}

/// Records loaded from a JSON file.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    cache: RwLock<Option<CachedPopulation>>,
}

impl FileSource {
    /// Creates a source for `path`. The file is read lazily on first use.
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> DatasetError {
        DatasetError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<Population, DatasetError> {
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let reader = BufReader::new(file);
        let collection: RecordCollection =
            serde_json::from_reader(reader).map_err(|source| DatasetError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(Population::from_collection(collection)?)
    }
}

impl DatasetAccessor for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    fn snapshot(&self) -> Result<Arc<Population>, DatasetError> {
        let modified = self
            .path
            .metadata()
            .and_then(|m| m.modified())
            .map_err(|e| self.io_error(e))?;

        {
            let cache = self.cache.read().map_err(|_| DatasetError::Poisoned)?;
            if let Some(cached) = cache.as_ref()
                && cached.modified == modified
            {
                return Ok(Arc::clone(&cached.population));
            }
        }

        let population = Arc::new(self.load()?);
        info!(
            path = %self.path.display(),
            records = population.len(),
            "loaded player records"
        );
        let mut cache = self.cache.write().map_err(|_| DatasetError::Poisoned)?;
        *cache = Some(CachedPopulation {
            modified,
            population: Arc::clone(&population),
        });
        Ok(population)
    }
}

/// A fixed population held in memory.
#[derive(Debug, Clone)]
pub struct SampleSource {
    population: Arc<Population>,
}

impl SampleSource {
    /// A seeded synthetic population.
    #[must_use]
    pub fn generate(config: SampleConfig) -> Self {
        let records = sample::generate(config);
        Self {
            population: Arc::new(Population::from_valid(None, records)),
        }
    }

    #[must_use]
    pub fn from_population(population: Population) -> Self {
        Self {
            population: Arc::new(population),
        }
    }
}

impl DatasetAccessor for SampleSource {
    fn name(&self) -> &str {
        "sample"
    }

    fn snapshot(&self) -> Result<Arc<Population>, DatasetError> {
        Ok(Arc::clone(&self.population))
    }
}

/// A primary source backed by a fallback.
///
/// Each snapshot comes entirely from one source: the fallback is used only
/// when the primary fails, and the two are never merged.
pub struct RankedSource {
    primary: Box<dyn DatasetAccessor>,
    fallback: Box<dyn DatasetAccessor>,
}

impl RankedSource {
    pub fn new<P, F>(primary: P, fallback: F) -> Self
    where
        P: DatasetAccessor + 'static,
        F: DatasetAccessor + 'static,
    {
        Self {
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        }
    }
}

impl DatasetAccessor for RankedSource {
    fn name(&self) -> &str {
        self.primary.name()
    }

    fn snapshot(&self) -> Result<Arc<Population>, DatasetError> {
        match self.primary.snapshot() {
            Ok(population) => Ok(population),
            Err(error) => {
                warn!(
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    %error,
                    "primary data source failed, using fallback"
                );
                self.fallback.snapshot()
            }
        }
    }
}
