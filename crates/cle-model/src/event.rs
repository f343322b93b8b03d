//! Infection and complication events.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{LineId, PatientId};

/// The event kinds tracked by surveillance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Central-line-associated bloodstream infection.
    Clabsi,
    /// Non-infectious central-line-associated complication.
    Clanc,
}

impl EventKind {
    pub const ALL: [EventKind; 2] = [EventKind::Clabsi, EventKind::Clanc];

    pub fn label(self) -> &'static str {
        match self {
            EventKind::Clabsi => "CLABSI",
            EventKind::Clanc => "CLANC",
        }
    }

    /// Days after check-out that still count as part of the stay.
    ///
    /// A bloodstream infection reported the day after discharge is attributed
    /// to the admission.
    pub fn discharge_grace_days(self) -> i64 {
        match self {
            EventKind::Clabsi => 1,
            EventKind::Clanc => 0,
        }
    }

    /// Longest discharge grace over all kinds.
    pub fn max_discharge_grace_days() -> i64 {
        Self::ALL
            .iter()
            .copied()
            .map(EventKind::discharge_grace_days)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventKind(pub String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event type '{}'", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let key = trimmed.trim_end_matches(['s', 'S']);
        if key.eq_ignore_ascii_case("clabsi") {
            Ok(EventKind::Clabsi)
        } else if key.eq_ignore_ascii_case("clanc") {
            Ok(EventKind::Clanc)
        } else {
            Err(UnknownEventKind(trimmed.to_string()))
        }
    }
}

/// A bloodstream infection, with the lines in place on its date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClabsiEvent {
    pub patient_id: PatientId,
    pub date: NaiveDate,
    /// Lines with `in_date <= date <= out_date`. May be empty.
    pub active_lines: Vec<LineId>,
    pub inpatient: bool,
}

impl ClabsiEvent {
    /// Fraction of this event credited to each active line.
    pub fn weight_per_line(&self) -> f64 {
        if self.active_lines.is_empty() {
            0.0
        } else {
            1.0 / self.active_lines.len() as f64
        }
    }

    pub fn is_attributed(&self) -> bool {
        !self.active_lines.is_empty()
    }
}

/// A non-infectious complication attributed to exactly one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClancEvent {
    pub patient_id: PatientId,
    pub line_id: LineId,
    pub date: NaiveDate,
    pub inpatient: bool,
}
