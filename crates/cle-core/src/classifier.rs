//! Event attribution.
//!
//! A bloodstream infection is split evenly across the lines in place on its
//! date; a complication belongs wholly to its line. Inpatient flags were fixed
//! when the events were recorded and are only read here.

use std::collections::BTreeMap;

use cle_model::{LineId, Patient};

use crate::metrics::EventCounts;

/// Event credit accumulated by a single line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineAttribution {
    pub clabsi: f64,
    pub clabsi_inpatient: f64,
    pub clabsi_outpatient: f64,
    pub clanc: bool,
    pub clanc_inpatient: bool,
}

impl LineAttribution {
    /// CLABSI weight plus one for a complication.
    pub fn events(&self) -> f64 {
        self.clabsi + if self.clanc { 1.0 } else { 0.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attribution {
    pub counts: EventCounts,
    pub lines: BTreeMap<LineId, LineAttribution>,
}

impl Attribution {
    pub fn line(&self, line_id: LineId) -> LineAttribution {
        self.lines.get(&line_id).copied().unwrap_or_default()
    }

    /// Sum of fractional CLABSI weight over all lines.
    ///
    /// Equals `counts.clabsi - counts.clabsi_unattributed` up to rounding.
    pub fn attributed_clabsi(&self) -> f64 {
        self.lines.values().map(|line| line.clabsi).sum()
    }
}

/// Count a patient's events and credit them to lines.
pub fn attribute(patient: &Patient) -> Attribution {
    let mut attribution = Attribution::default();
    for line in patient.lines() {
        attribution.lines.entry(line.line_id).or_default();
    }

    for event in patient.clabsi_events() {
        attribution.counts.clabsi += 1;
        if event.inpatient {
            attribution.counts.clabsi_inpatient += 1;
        } else {
            attribution.counts.clabsi_outpatient += 1;
        }
        if !event.is_attributed() {
            attribution.counts.clabsi_unattributed += 1;
            continue;
        }
        let weight = event.weight_per_line();
        for line_id in &event.active_lines {
            let line = attribution.lines.entry(*line_id).or_default();
            line.clabsi += weight;
            if event.inpatient {
                line.clabsi_inpatient += weight;
            } else {
                line.clabsi_outpatient += weight;
            }
        }
    }

    for event in patient.clanc_events() {
        attribution.counts.clanc += 1;
        if event.inpatient {
            attribution.counts.clanc_inpatient += 1;
        } else {
            attribution.counts.clanc_outpatient += 1;
        }
        let line = attribution.lines.entry(event.line_id).or_default();
        line.clanc = true;
        line.clanc_inpatient = event.inpatient;
    }
    attribution
}
