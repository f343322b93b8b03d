//! Configuration options for a surveillance analysis run.

use serde::{Deserialize, Serialize};

use crate::interval::DateRange;

/// Options threaded through ingestion and analysis.
///
/// Built once by the caller and never mutated afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Records outside this window are dropped at ingestion; records that
    /// straddle it are clipped.
    pub range: DateRange,
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }
}
