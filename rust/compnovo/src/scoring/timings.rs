//! Per stage wall clock measurements of a search.

use serde::Serialize;
use std::time::Duration;

/// Accumulated time spent in each stage of the search.
///
/// When spectra are processed in parallel the timings of all of them are
/// summed, so the total can exceed the wall clock time of the run.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SearchTimings {
    /// Peak indexing and mass graph construction.
    pub graph: Duration,
    pub decomposition: Duration,
    /// Rescoring, filtering and ranking of full length candidates.
    pub reduction: Duration,
}

impl SearchTimings {
    pub fn total(&self) -> Duration {
        self.graph + self.decomposition + self.reduction
    }
}

impl Serialize for SearchTimings {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("SearchTimings", 3)?;
        state.serialize_field("graph_ms", &self.graph.as_millis())?;
        state.serialize_field("decomposition_ms", &self.decomposition.as_millis())?;
        state.serialize_field("reduction_ms", &self.reduction.as_millis())?;
        state.end()
    }
}

impl std::ops::AddAssign for SearchTimings {
    fn add_assign(&mut self, rhs: Self) {
        self.graph += rhs.graph;
        self.decomposition += rhs.decomposition;
        self.reduction += rhs.reduction;
    }
}
