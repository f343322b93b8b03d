//! Patients, their admissions and their catheter placements.

use std::cmp::Ordering;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::event::{ClabsiEvent, ClancEvent, EventKind};
use crate::ids::{LineId, PatientId};
use crate::interval::DayInterval;

/// A single inpatient admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub patient_id: PatientId,
    /// `[check_in, check_out)`, already clipped to the analysis range.
    pub span: DayInterval,
    /// The stay as recorded, before clipping. Events are classified against
    /// this span.
    pub recorded: DayInterval,
}

impl Visit {
    /// A visit that was not clipped.
    pub fn new(patient_id: PatientId, span: DayInterval) -> Self {
        Self::clipped(patient_id, span, span)
    }

    pub fn clipped(patient_id: PatientId, recorded: DayInterval, span: DayInterval) -> Self {
        Self {
            patient_id,
            span,
            recorded,
        }
    }

    pub fn check_in(&self) -> NaiveDate {
        self.span.start()
    }

    pub fn check_out(&self) -> NaiveDate {
        self.span.end()
    }

    pub fn days(&self) -> i64 {
        self.span.days()
    }

    /// Whether an event of `kind` on `date` happened during this stay.
    ///
    /// Inclusive of the recorded check-out day, plus the kind's discharge
    /// grace.
    pub fn covers(&self, date: NaiveDate, kind: EventKind) -> bool {
        let grace = Days::new(kind.discharge_grace_days().unsigned_abs());
        let last = self
            .recorded
            .end()
            .checked_add_days(grace)
            .unwrap_or(NaiveDate::MAX);
        self.recorded.start() <= date && date <= last
    }
}

/// A central venous catheter placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub patient_id: PatientId,
    pub line_id: LineId,
    pub line_type: String,
    pub lumens: u32,
    /// `[in_date, out_date)`, already clipped to the analysis range.
    pub span: DayInterval,
    /// Placement as recorded, before clipping.
    pub recorded: DayInterval,
    pub removal_reason: Option<String>,
    /// The complication attributed to this line, if any.
    pub clanc: Option<ClancEvent>,
}

impl Line {
    pub fn in_date(&self) -> NaiveDate {
        self.span.start()
    }

    pub fn out_date(&self) -> NaiveDate {
        self.span.end()
    }

    pub fn days(&self) -> i64 {
        self.span.days()
    }

    pub fn lumen_days(&self) -> i64 {
        self.days() * i64::from(self.lumens)
    }

    /// Whether the line was in place on `date`, counting both the recorded
    /// insertion and removal day.
    pub fn is_in_place_on(&self, date: NaiveDate) -> bool {
        self.recorded.start() <= date && date <= self.recorded.end()
    }

    /// Chronological order: insertion date, then removal date.
    pub fn chronological(a: &Line, b: &Line) -> Ordering {
        a.in_date()
            .cmp(&b.in_date())
            .then_with(|| a.out_date().cmp(&b.out_date()))
    }
}

/// Everything recorded for one patient during an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    visits: Vec<Visit>,
    lines: Vec<Line>,
    clabsi: Vec<ClabsiEvent>,
}

impl Patient {
    pub fn new(id: PatientId) -> Self {
        Self {
            id,
            visits: Vec::new(),
            lines: Vec::new(),
            clabsi: Vec::new(),
        }
    }

    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Lines in chronological order once [`Patient::sort_lines`] has run.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn clabsi_events(&self) -> &[ClabsiEvent] {
        &self.clabsi
    }

    pub fn clanc_events(&self) -> impl Iterator<Item = &ClancEvent> {
        self.lines.iter().filter_map(|line| line.clanc.as_ref())
    }

    pub fn add_visit(&mut self, visit: Visit) {
        debug_assert_eq!(visit.patient_id, self.id);
        self.visits.push(visit);
    }

    pub fn add_line(&mut self, line: Line) {
        debug_assert_eq!(line.patient_id, self.id);
        self.lines.push(line);
    }

    pub fn sort_lines(&mut self) {
        self.lines.sort_by(Line::chronological);
    }

    pub fn line(&self, line_id: LineId) -> Option<&Line> {
        self.lines.iter().find(|line| line.line_id == line_id)
    }

    pub fn line_mut(&mut self, line_id: LineId) -> Option<&mut Line> {
        self.lines.iter_mut().find(|line| line.line_id == line_id)
    }

    /// True iff the date falls within any visit (OR over all visits).
    pub fn is_inpatient_on(&self, date: NaiveDate, kind: EventKind) -> bool {
        self.visits.iter().any(|visit| visit.covers(date, kind))
    }

    pub fn lines_in_place_on(&self, date: NaiveDate) -> Vec<LineId> {
        self.lines
            .iter()
            .filter(|line| line.is_in_place_on(date))
            .map(|line| line.line_id)
            .collect()
    }

    /// Record a bloodstream infection, classifying it against the visits and
    /// lines already attached to this patient.
    pub fn record_clabsi(&mut self, date: NaiveDate) -> &ClabsiEvent {
        let event = ClabsiEvent {
            patient_id: self.id,
            date,
            active_lines: self.lines_in_place_on(date),
            inpatient: self.is_inpatient_on(date, EventKind::Clabsi),
        };
        self.clabsi.push(event);
        &self.clabsi[self.clabsi.len() - 1]
    }

    /// Attach a complication to `line_id`.
    pub fn record_clanc(
        &mut self,
        line_id: LineId,
        date: NaiveDate,
    ) -> Result<&ClancEvent, ClancRejection> {
        let inpatient = self.is_inpatient_on(date, EventKind::Clanc);
        let patient_id = self.id;
        let line = self.line_mut(line_id).ok_or(ClancRejection::UnknownLine)?;
        if line.clanc.is_some() {
            return Err(ClancRejection::AlreadyRecorded);
        }
        Ok(&*line.clanc.insert(ClancEvent {
            patient_id,
            line_id,
            date,
            inpatient,
        }))
    }

    pub fn total_visit_days(&self) -> i64 {
        self.visits.iter().map(Visit::days).sum()
    }

    pub fn total_line_days(&self) -> i64 {
        self.lines.iter().map(Line::days).sum()
    }

    pub fn total_lumen_days(&self) -> i64 {
        self.lines.iter().map(Line::lumen_days).sum()
    }
}

/// Why a complication could not be attached to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClancRejection {
    UnknownLine,
    AlreadyRecorded,
}
