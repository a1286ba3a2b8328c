//! Shared application state for the statistics server.

use std::sync::Arc;

use vanguard_analysis::query::StatisticsEngine;

/// State shared by every handler.
///
/// The engine is immutable; each request takes its own population snapshot,
/// so cloning the state only clones the `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<StatisticsEngine>,
}

impl AppState {
    #[must_use]
    pub fn new(engine: StatisticsEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
