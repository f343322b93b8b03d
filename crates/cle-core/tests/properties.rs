//! Set-based invariants of aggregation and attribution.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use cle_core::{aggregate, analyze, attribute};
use cle_model::{AnalysisOptions, Cohort, DateRange, DayInterval, Line, LineId, Patient, PatientId, Visit};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    base() + Days::new(offset)
}

fn span(start: u64, len: u64) -> DayInterval {
    DayInterval::new(day(start), day(start + len)).unwrap()
}

#[derive(Debug, Clone)]
struct PatientSpec {
    visits: Vec<(u64, u64)>,
    lines: Vec<(u64, u64, u32)>,
    clabsi: Vec<u64>,
}

fn patient_spec() -> impl Strategy<Value = PatientSpec> {
    (
        prop::collection::vec((0u64..60, 1u64..20), 0..4),
        prop::collection::vec((0u64..60, 0u64..30, 1u32..4), 0..6),
        prop::collection::vec(0u64..90, 0..5),
    )
        .prop_map(|(visits, lines, clabsi)| PatientSpec {
            visits,
            lines,
            clabsi,
        })
}

fn build_for(id: PatientId, spec: &PatientSpec) -> Patient {
    let mut patient = Patient::new(id);
    for &(start, len) in &spec.visits {
        patient.add_visit(Visit::new(id, span(start, len)));
    }
    for (index, &(start, len, lumens)) in spec.lines.iter().enumerate() {
        patient.add_line(Line {
            patient_id: id,
            line_id: LineId::new(index as i64),
            line_type: "PICC".to_string(),
            lumens,
            span: span(start, len),
            recorded: span(start, len),
            removal_reason: None,
            clanc: None,
        });
    }
    patient.sort_lines();
    for &offset in &spec.clabsi {
        patient.record_clabsi(day(offset));
    }
    patient
}

fn build(spec: &PatientSpec) -> Patient {
    build_for(PatientId::new(1), spec)
}

proptest! {
    #[test]
    fn inpatient_and_outpatient_days_partition_catheter_days(spec in patient_spec()) {
        let patient = build(&spec);
        let days = aggregate(&patient, &DateRange::unbounded());
        prop_assert!(days.inpatient.is_subset(&days.any));
        prop_assert_eq!(days.inpatient_days() + days.outpatient_days(), days.total());
        for line in &days.lines {
            prop_assert_eq!(line.inpatient_days + line.outpatient_days(), line.days());
        }
    }

    #[test]
    fn catheter_days_count_each_day_once(spec in patient_spec()) {
        let patient = build(&spec);
        let days = aggregate(&patient, &DateRange::unbounded());
        let expected = (0..120)
            .map(day)
            .filter(|date| patient.lines().iter().any(|line| line.span.contains(*date)))
            .count() as i64;
        prop_assert_eq!(days.total(), expected);
        let widest = days.lines.iter().map(|line| line.days()).max().unwrap_or(0);
        let summed: i64 = days.lines.iter().map(|line| line.days()).sum();
        prop_assert!(widest <= days.total() && days.total() <= summed);
    }

    #[test]
    fn clabsi_weights_add_up_to_event_count(spec in patient_spec()) {
        let patient = build(&spec);
        let attribution = attribute(&patient);
        let total = attribution.attributed_clabsi()
            + attribution.counts.clabsi_unattributed as f64;
        prop_assert!((total - attribution.counts.clabsi as f64).abs() < 1e-9);
        prop_assert_eq!(attribution.counts.clabsi, spec.clabsi.len());
    }

    #[test]
    fn aggregation_is_idempotent(spec in patient_spec()) {
        let patient = build(&spec);
        let first = aggregate(&patient, &DateRange::unbounded());
        let second = aggregate(&patient, &DateRange::unbounded());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn overlapping_pair_spans_first_start_to_last_end(
        d1 in 0u64..20,
        gap1 in 1u64..10,
        gap2 in 1u64..10,
        gap3 in 1u64..10,
    ) {
        let (d2, d3) = (d1 + gap1, d1 + gap1 + gap2);
        let d4 = d3 + gap3;
        let spec = PatientSpec {
            visits: Vec::new(),
            lines: vec![(d1, d3 - d1, 1), (d2, d4 - d2, 1)],
            clabsi: Vec::new(),
        };
        let patient = build(&spec);
        let days = aggregate(&patient, &DateRange::unbounded());
        prop_assert_eq!(days.total(), (d4 - d1) as i64);
    }

    #[test]
    fn population_counts_are_sums_of_patient_rows(specs in prop::collection::vec(patient_spec(), 0..5)) {
        let mut cohort = Cohort::new();
        for (index, spec) in specs.iter().enumerate() {
            let id = PatientId::new(index as i64);
            *cohort.register(id) = build_for(id, spec);
        }
        let report = analyze(&cohort, &AnalysisOptions::default());
        let catheter_days: i64 = report.patients.iter().map(|p| p.exposure.catheter_days).sum();
        let clabsi: usize = report.patients.iter().map(|p| p.events.clabsi).sum();
        prop_assert_eq!(report.population.exposure.catheter_days, catheter_days);
        prop_assert_eq!(report.population.events.clabsi, clabsi);
        prop_assert_eq!(report.population.patients, specs.len());
        for patient in &report.patients {
            prop_assert!(patient.rates.clabsi.is_finite());
        }
    }
}
