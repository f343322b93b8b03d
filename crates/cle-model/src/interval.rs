//! Half-open calendar-day intervals and the analysis date range.
//!
//! Every span in the model is a `[start, end)` pair of midnight-truncated
//! dates: a catheter inserted on Jan 2 and removed on Jan 8 covers the six
//! days Jan 2..=Jan 7. Day counts come from the interval width; day *sets*
//! are only materialized where overlapping spans must be deduplicated.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// A half-open `[start, end)` span of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayInterval {
    start: NaiveDate,
    end: NaiveDate,
}

impl DayInterval {
    /// Build an interval, rejecting spans whose end precedes their start.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ModelError::InvertedSpan { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of whole days covered (`end - start`).
    pub fn days(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Half-open membership: `start <= date < end`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Overlap with another interval, or `None` when they share no day.
    pub fn intersect(&self, other: &DayInterval) -> Option<DayInterval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(DayInterval { start, end })
    }

    /// Iterate the individual days in the interval, end exclusive.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day < end)
    }

    pub fn day_set(&self) -> BTreeSet<NaiveDate> {
        day_set(self.start, self.end)
    }
}

impl fmt::Display for DayInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Expand `[start, end)` into the set of calendar days it covers.
///
/// Returns an empty set when `end <= start`.
pub fn day_set(start: NaiveDate, end: NaiveDate) -> BTreeSet<NaiveDate> {
    start.iter_days().take_while(|day| *day < end).collect()
}

/// The active analysis window, `[start, end)` with either bound optional.
///
/// The default is unbounded on both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Build a range, rejecting one that cannot contain any day.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(start), Some(end)) = (start, end)
            && start >= end
        {
            return Err(ModelError::EmptyRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| start <= date) && self.end.is_none_or(|end| date < end)
    }

    /// Intersect `interval` with this range. See [`clip`].
    pub fn clip(&self, interval: &DayInterval) -> Option<DayInterval> {
        clip(interval, self.start, self.end)
    }

    /// Clip a record that events can still match up to `reach` days after
    /// its end, counting the end day itself.
    ///
    /// A record that ends before the range but reaches its first day is kept
    /// as an empty span at the range start instead of being dropped.
    pub fn clip_with_reach(&self, interval: &DayInterval, reach: i64) -> Option<DayInterval> {
        if let Some(clipped) = self.clip(interval) {
            return Some(clipped);
        }
        let start = self.start?;
        let last = interval
            .end
            .checked_add_days(Days::new(reach.unsigned_abs()))?;
        (interval.start <= start && start <= last).then_some(DayInterval { start, end: start })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (None, None) => f.write_str("all dates"),
            (Some(start), None) => write!(f, "from {start}"),
            (None, Some(end)) => write!(f, "before {end}"),
            (Some(start), Some(end)) => write!(f, "[{start}, {end})"),
        }
    }
}

/// Intersect a half-open interval with an optional `[range_start, range_end)`.
///
/// Returns `None` when the two are disjoint. A non-empty interval that only
/// touches the window boundary is disjoint; a zero-length interval survives
/// when its single instant lies inside the window.
pub fn clip(
    interval: &DayInterval,
    range_start: Option<NaiveDate>,
    range_end: Option<NaiveDate>,
) -> Option<DayInterval> {
    if interval.is_empty() {
        let inside = DateRange {
            start: range_start,
            end: range_end,
        }
        .contains(interval.start);
        return inside.then_some(*interval);
    }
    let start = range_start.map_or(interval.start, |bound| bound.max(interval.start));
    let end = range_end.map_or(interval.end, |bound| bound.min(interval.end));
    (start < end).then_some(DayInterval { start, end })
}
