//! Per-patient, per-line and population metric rows.

use std::ops::AddAssign;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use cle_model::{LineId, PatientId};

use crate::aggregator::{CatheterDays, LineExposure};
use crate::classifier::LineAttribution;
use crate::rates::{Rates, rate_per_1000};

/// Exposure counts, in days unless noted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exposure {
    pub visit_days: i64,
    /// Number of lines.
    pub lines: usize,
    pub line_days: i64,
    pub lumen_days: i64,
    pub inpatient_line_days: i64,
    pub outpatient_line_days: i64,
    pub inpatient_lumen_days: i64,
    pub outpatient_lumen_days: i64,
    /// Distinct days with any line in place.
    pub catheter_days: i64,
    pub inpatient_catheter_days: i64,
    pub outpatient_catheter_days: i64,
}

impl Exposure {
    pub fn from_days(days: &CatheterDays<'_>) -> Self {
        let mut exposure = Exposure {
            visit_days: days.visit_days,
            lines: days.lines.len(),
            catheter_days: days.total(),
            inpatient_catheter_days: days.inpatient_days(),
            outpatient_catheter_days: days.outpatient_days(),
            ..Exposure::default()
        };
        for line in &days.lines {
            exposure.line_days += line.days();
            exposure.lumen_days += line.lumen_days();
            exposure.inpatient_line_days += line.inpatient_days;
            exposure.outpatient_line_days += line.outpatient_days();
            exposure.inpatient_lumen_days += line.inpatient_lumen_days();
            exposure.outpatient_lumen_days += line.outpatient_lumen_days();
        }
        exposure
    }
}

impl AddAssign for Exposure {
    fn add_assign(&mut self, other: Self) {
        self.visit_days += other.visit_days;
        self.lines += other.lines;
        self.line_days += other.line_days;
        self.lumen_days += other.lumen_days;
        self.inpatient_line_days += other.inpatient_line_days;
        self.outpatient_line_days += other.outpatient_line_days;
        self.inpatient_lumen_days += other.inpatient_lumen_days;
        self.outpatient_lumen_days += other.outpatient_lumen_days;
        self.catheter_days += other.catheter_days;
        self.inpatient_catheter_days += other.inpatient_catheter_days;
        self.outpatient_catheter_days += other.outpatient_catheter_days;
    }
}

/// Whole-event counts. A CLABSI counts once however many lines share it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    pub clabsi: usize,
    pub clabsi_inpatient: usize,
    pub clabsi_outpatient: usize,
    /// CLABSI events with no line in place on their date.
    pub clabsi_unattributed: usize,
    pub clanc: usize,
    pub clanc_inpatient: usize,
    pub clanc_outpatient: usize,
}

impl EventCounts {
    pub fn total(&self) -> usize {
        self.clabsi + self.clanc
    }
}

impl AddAssign for EventCounts {
    fn add_assign(&mut self, other: Self) {
        self.clabsi += other.clabsi;
        self.clabsi_inpatient += other.clabsi_inpatient;
        self.clabsi_outpatient += other.clabsi_outpatient;
        self.clabsi_unattributed += other.clabsi_unattributed;
        self.clanc += other.clanc;
        self.clanc_inpatient += other.clanc_inpatient;
        self.clanc_outpatient += other.clanc_outpatient;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientMetrics {
    pub patient_id: PatientId,
    pub exposure: Exposure,
    pub events: EventCounts,
    pub rates: Rates,
}

impl PatientMetrics {
    pub fn new(patient_id: PatientId, exposure: Exposure, events: EventCounts) -> Self {
        Self {
            patient_id,
            rates: Rates::derive(&exposure, &events),
            exposure,
            events,
        }
    }
}

/// One line's exposure and the event credit it received.
///
/// Rates are per 1000 days of this line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineMetrics {
    pub patient_id: PatientId,
    pub line_id: LineId,
    pub line_type: String,
    pub lumens: u32,
    pub in_date: NaiveDate,
    pub out_date: NaiveDate,
    pub removal_reason: Option<String>,
    pub days: i64,
    pub lumen_days: i64,
    pub inpatient_days: i64,
    pub outpatient_days: i64,
    pub inpatient_lumen_days: i64,
    pub outpatient_lumen_days: i64,
    pub clabsi_weight: f64,
    pub clabsi_inpatient_weight: f64,
    pub clabsi_outpatient_weight: f64,
    pub clanc: bool,
    pub clanc_inpatient: bool,
    /// CLABSI weight plus one for a complication.
    pub events: f64,
    pub clabsi_rate: f64,
    pub clanc_rate: f64,
    pub event_rate: f64,
}

impl LineMetrics {
    pub fn new(exposure: &LineExposure<'_>, attribution: LineAttribution) -> Self {
        let line = exposure.line;
        let days = exposure.days() as f64;
        let clanc = if attribution.clanc { 1.0 } else { 0.0 };
        Self {
            patient_id: line.patient_id,
            line_id: line.line_id,
            line_type: line.line_type.clone(),
            lumens: line.lumens,
            in_date: exposure.span.start(),
            out_date: exposure.span.end(),
            removal_reason: line.removal_reason.clone(),
            days: exposure.days(),
            lumen_days: exposure.lumen_days(),
            inpatient_days: exposure.inpatient_days,
            outpatient_days: exposure.outpatient_days(),
            inpatient_lumen_days: exposure.inpatient_lumen_days(),
            outpatient_lumen_days: exposure.outpatient_lumen_days(),
            clabsi_weight: attribution.clabsi,
            clabsi_inpatient_weight: attribution.clabsi_inpatient,
            clabsi_outpatient_weight: attribution.clabsi_outpatient,
            clanc: attribution.clanc,
            clanc_inpatient: attribution.clanc_inpatient,
            events: attribution.events(),
            clabsi_rate: rate_per_1000(attribution.clabsi, days),
            clanc_rate: rate_per_1000(clanc, days),
            event_rate: rate_per_1000(attribution.events(), days),
        }
    }
}

/// The summary row: summed counts with rates re-derived from the sums.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationTotals {
    pub patients: usize,
    pub exposure: Exposure,
    pub events: EventCounts,
    pub rates: Rates,
}

impl PopulationTotals {
    pub fn from_patients(patients: &[PatientMetrics]) -> Self {
        let mut exposure = Exposure::default();
        let mut events = EventCounts::default();
        for patient in patients {
            exposure += patient.exposure;
            events += patient.events;
        }
        Self {
            patients: patients.len(),
            rates: Rates::derive(&exposure, &events),
            exposure,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(id: i64, catheter_days: i64, clabsi: usize) -> PatientMetrics {
        let exposure = Exposure {
            lines: 1,
            line_days: catheter_days,
            lumen_days: catheter_days,
            catheter_days,
            outpatient_catheter_days: catheter_days,
            ..Exposure::default()
        };
        let events = EventCounts {
            clabsi,
            clabsi_outpatient: clabsi,
            ..EventCounts::default()
        };
        PatientMetrics::new(PatientId::new(id), exposure, events)
    }

    #[test]
    fn population_rates_are_rederived_not_summed() {
        let patients = [patient(1, 10, 1), patient(2, 40, 1)];
        assert_eq!(patients[0].rates.clabsi, 100.0);
        assert_eq!(patients[1].rates.clabsi, 25.0);

        let totals = PopulationTotals::from_patients(&patients);
        assert_eq!(totals.patients, 2);
        assert_eq!(totals.exposure.catheter_days, 50);
        assert_eq!(totals.events.clabsi, 2);
        assert_eq!(totals.rates.clabsi, 40.0);
        assert_eq!(totals.rates.mean_line_days, 25.0);
    }

    #[test]
    fn empty_population_is_all_zero() {
        let totals = PopulationTotals::from_patients(&[]);
        assert_eq!(totals, PopulationTotals::default());
    }
}
