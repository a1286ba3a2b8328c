//! Dashboard navigation and request ordering.
//!
//! The dashboard is a fixed set of panels ([`View`]), each backed by exactly
//! one statistics query. [`Navigator`] is the navigation state machine: it
//! remembers the current view and which views were visited, and reports each
//! move as a [`Transition`] from which the breadcrumb and progress are
//! derived without further state.
//!
//! Interactive filtering issues queries faster than they may complete.
//! [`Generations`] numbers every request so that only the response to the
//! newest one is applied.

use std::{
    collections::BTreeSet,
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
};

use tracing::debug;

use crate::{
    filter::FilterSpec,
    query::{Query, QueryKind},
};

/// A dashboard panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum View {
    Overview,
    Descriptive,
    Distribution,
    ClassComparison,
    Correlation,
    HypothesisTests,
    Explorer,
}

impl View {
    /// Every view, in navigation order.
    pub const ALL: [Self; 7] = [
        Self::Overview,
        Self::Descriptive,
        Self::Distribution,
        Self::ClassComparison,
        Self::Correlation,
        Self::HypothesisTests,
        Self::Explorer,
    ];

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            View::Overview => "overview",
            View::Descriptive => "descriptive",
            View::Distribution => "distribution",
            View::ClassComparison => "class-comparison",
            View::Correlation => "correlation",
            View::HypothesisTests => "hypothesis-tests",
            View::Explorer => "explorer",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Descriptive => "Descriptive Statistics",
            View::Distribution => "Light Level Distribution",
            View::ClassComparison => "Class Comparison",
            View::Correlation => "Light vs Triumph",
            View::HypothesisTests => "Hypothesis Tests",
            View::Explorer => "Explorer",
        }
    }

    /// The query that populates this view.
    #[must_use]
    pub fn query(self, filter: FilterSpec) -> Query {
        let kind = match self {
            View::Overview | View::Explorer => QueryKind::FilteredCount,
            View::Descriptive => QueryKind::Descriptive,
            View::Distribution => QueryKind::Distribution,
            View::ClassComparison => QueryKind::ClassComparison,
            View::Correlation => QueryKind::Correlation,
            View::HypothesisTests => QueryKind::HypothesisTests,
        };
        Query::new(kind, filter)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.title(), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown view '{name}'")]
pub struct UnknownView {
    pub name: String,
}

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|view| view.slug() == s)
            .ok_or_else(|| UnknownView { name: s.to_owned() })
    }
}

/// A move between two views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: View,
    pub to: View,
}

impl Transition {
    /// Whether the move stays on the same view.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    /// Breadcrumb trail shown after the move.
    #[must_use]
    pub fn breadcrumb(&self) -> String {
        if self.is_noop() || self.to == View::Overview {
            self.to.title().to_owned()
        } else if self.from == View::Overview {
            format!("{} › {}", View::Overview, self.to)
        } else {
            format!("{} › {} › {}", View::Overview, self.from, self.to)
        }
    }
}

/// Share of views visited so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub visited: usize,
    pub total: usize,
}

impl Progress {
    #[must_use]
    pub fn of(visited: &BTreeSet<View>) -> Self {
        Self {
            visited: visited.len(),
            total: View::ALL.len(),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.visited == self.total
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.visited, self.total)
    }
}

/// Navigation state: the current view and the views seen so far.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: View,
    visited: BTreeSet<View>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Starts on the overview.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: View::Overview,
            visited: BTreeSet::from([View::Overview]),
        }
    }

    #[must_use]
    pub fn current(&self) -> View {
        self.current
    }

    #[must_use]
    pub fn visited(&self) -> &BTreeSet<View> {
        &self.visited
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress::of(&self.visited)
    }

    pub fn navigate(&mut self, to: View) -> Transition {
        let transition = Transition {
            from: self.current,
            to,
        };
        self.current = to;
        self.visited.insert(to);
        transition
    }
}

/// A request generation number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues request generations and decides which responses are still current.
///
/// Shared between the thread issuing requests and the threads completing them.
#[derive(Debug, Default)]
pub struct Generations {
    latest: AtomicU64,
}

impl Generations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a generation newer than every previous one.
    pub fn issue(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    #[must_use]
    pub fn latest(&self) -> Option<Generation> {
        match self.latest.load(Ordering::Acquire) {
            0 => None,
            n => Some(Generation(n)),
        }
    }

    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest() == Some(generation)
    }

    /// Whether a response for `generation` may be applied.
    pub fn accept(&self, generation: Generation) -> bool {
        let current = self.is_current(generation);
        if !current {
            debug!(%generation, latest = ?self.latest(), "discarding stale response");
        }
        current
    }
}
