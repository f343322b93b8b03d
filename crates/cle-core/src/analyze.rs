use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use cle_model::{AnalysisOptions, Cohort, DateRange, PatientId};

use crate::aggregator::aggregate;
use crate::classifier::attribute;
use crate::metrics::{Exposure, LineMetrics, PatientMetrics, PopulationTotals};

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveillanceReport {
    pub range: DateRange,
    /// One row per patient, ordered by patient id.
    pub patients: Vec<PatientMetrics>,
    /// One row per line, grouped by patient and in chronological order.
    pub lines: Vec<LineMetrics>,
    pub population: PopulationTotals,
}

impl SurveillanceReport {
    pub fn patient(&self, patient_id: PatientId) -> Option<&PatientMetrics> {
        self.patients
            .iter()
            .find(|metrics| metrics.patient_id == patient_id)
    }

    pub fn lines_for(&self, patient_id: PatientId) -> impl Iterator<Item = &LineMetrics> {
        self.lines
            .iter()
            .filter(move |line| line.patient_id == patient_id)
    }
}

/// Compute per-patient and per-line metrics, then roll them up.
///
/// The population row is built only after every patient has been processed.
pub fn analyze(cohort: &Cohort, options: &AnalysisOptions) -> SurveillanceReport {
    let span = info_span!("analyze", patients = cohort.len(), range = %options.range);
    let _guard = span.enter();

    let mut patients = Vec::with_capacity(cohort.len());
    let mut lines = Vec::with_capacity(cohort.line_count());
    for patient in cohort.patients() {
        let days = aggregate(patient, &options.range);
        let attribution = attribute(patient);
        debug_assert!(
            (attribution.attributed_clabsi() + attribution.counts.clabsi_unattributed as f64
                - attribution.counts.clabsi as f64)
                .abs()
                < 1e-9,
            "CLABSI weights must add up to the event count"
        );

        lines.extend(
            days.lines
                .iter()
                .map(|exposure| LineMetrics::new(exposure, attribution.line(exposure.line.line_id))),
        );
        patients.push(PatientMetrics::new(
            patient.id,
            Exposure::from_days(&days),
            attribution.counts,
        ));
    }
    debug!(patients = patients.len(), lines = lines.len(), "per-patient metrics done");

    let population = PopulationTotals::from_patients(&patients);
    info!(
        patients = population.patients,
        lines = population.exposure.lines,
        catheter_days = population.exposure.catheter_days,
        clabsi = population.events.clabsi,
        clanc = population.events.clanc,
        clabsi_rate = population.rates.clabsi,
        "analysis complete"
    );

    SurveillanceReport {
        range: options.range,
        patients,
        lines,
        population,
    }
}
