//! Catheter-day aggregation.
//!
//! Overlapping lines are deduplicated by unioning day *sets*, never by adding
//! interval widths: two catheters in place on the same day make one
//! catheter-day.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use cle_model::{DateRange, DayInterval, Line, Patient, Visit};

/// One line's exposure inside the analysis range.
#[derive(Debug, Clone, PartialEq)]
pub struct LineExposure<'a> {
    pub line: &'a Line,
    /// The line span clipped to the range.
    pub span: DayInterval,
    /// Days of `span` that fall inside at least one visit.
    pub inpatient_days: i64,
}

impl LineExposure<'_> {
    pub fn days(&self) -> i64 {
        self.span.days()
    }

    pub fn outpatient_days(&self) -> i64 {
        self.days() - self.inpatient_days
    }

    pub fn lumen_days(&self) -> i64 {
        self.days() * i64::from(self.line.lumens)
    }

    pub fn inpatient_lumen_days(&self) -> i64 {
        self.inpatient_days * i64::from(self.line.lumens)
    }

    pub fn outpatient_lumen_days(&self) -> i64 {
        self.lumen_days() - self.inpatient_lumen_days()
    }
}

/// Deduplicated catheter days for one patient.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatheterDays<'a> {
    /// Days with at least one line in place.
    pub any: BTreeSet<NaiveDate>,
    /// Subset of `any` that falls inside a visit.
    pub inpatient: BTreeSet<NaiveDate>,
    pub lines: Vec<LineExposure<'a>>,
    /// Sum of visit lengths inside the range.
    pub visit_days: i64,
}

impl CatheterDays<'_> {
    pub fn total(&self) -> i64 {
        self.any.len() as i64
    }

    pub fn inpatient_days(&self) -> i64 {
        self.inpatient.len() as i64
    }

    pub fn outpatient_days(&self) -> i64 {
        self.total() - self.inpatient_days()
    }
}

/// Compute the any-catheter day set of `patient` and split it by visit.
///
/// Lines are expected in chronological order; iteration stops at the first
/// line that starts at or after the range end. Spans are clipped to `range`
/// again; clipping an already clipped span is a no-op.
pub fn aggregate<'a>(patient: &'a Patient, range: &DateRange) -> CatheterDays<'a> {
    let mut days = CatheterDays {
        visit_days: patient
            .visits()
            .iter()
            .filter_map(|visit| range.clip(&visit.span))
            .map(|span| span.days())
            .sum(),
        ..CatheterDays::default()
    };
    let visit_days = visit_day_set(patient.visits());

    for line in patient.lines() {
        if range.end.is_some_and(|end| line.in_date() >= end) {
            break;
        }
        let Some(span) = range.clip(&line.span) else {
            continue;
        };

        let line_days = span.day_set();
        let inpatient: BTreeSet<NaiveDate> =
            line_days.intersection(&visit_days).copied().collect();

        days.any.extend(line_days);
        days.inpatient.extend(inpatient.iter().copied());
        days.lines.push(LineExposure {
            line,
            span,
            inpatient_days: inpatient.len() as i64,
        });
    }
    days
}

/// Days covered by any visit, check-out day excluded.
fn visit_day_set(visits: &[Visit]) -> BTreeSet<NaiveDate> {
    visits
        .iter()
        .flat_map(|visit| visit.span.iter_days())
        .collect()
}
