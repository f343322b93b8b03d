//! Tests for cle-model types.

use chrono::NaiveDate;
use cle_model::{
    AnalysisOptions, ClancRejection, Cohort, DateRange, DayInterval, EventKind, Line, LineId,
    Patient, PatientId, Visit,
};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn span(from: NaiveDate, to: NaiveDate) -> DayInterval {
    DayInterval::new(from, to).unwrap()
}

fn line(patient: PatientId, id: i64, from: NaiveDate, to: NaiveDate) -> Line {
    Line {
        patient_id: patient,
        line_id: LineId::new(id),
        line_type: "PICC".to_string(),
        lumens: 2,
        span: span(from, to),
        recorded: span(from, to),
        removal_reason: None,
        clanc: None,
    }
}

#[test]
fn line_days_and_lumen_days() {
    let l = line(PatientId::new(1), 7, date(1, 2), date(1, 8));
    assert_eq!(l.days(), 6);
    assert_eq!(l.lumen_days(), 12);
    assert!(l.is_in_place_on(date(1, 2)));
    assert!(l.is_in_place_on(date(1, 8)));
    assert!(!l.is_in_place_on(date(1, 9)));
}

#[test]
fn clipped_records_classify_against_recorded_dates() {
    let id = PatientId::new(1);
    let range = DateRange::new(Some(date(1, 5)), None).unwrap();
    let recorded = span(date(1, 1), date(1, 5));
    let kept = range.clip_with_reach(&recorded, 1).unwrap();
    let visit = Visit::clipped(id, recorded, kept);
    assert_eq!(visit.days(), 0);
    assert!(visit.covers(date(1, 5), EventKind::Clanc));
    assert!(visit.covers(date(1, 6), EventKind::Clabsi));
    assert!(!visit.covers(date(1, 6), EventKind::Clanc));
    assert_eq!(EventKind::max_discharge_grace_days(), 1);
}

#[test]
fn lines_sort_by_insertion_then_removal() {
    let id = PatientId::new(1);
    let mut patient = Patient::new(id);
    patient.add_line(line(id, 3, date(1, 5), date(1, 9)));
    patient.add_line(line(id, 2, date(1, 1), date(1, 20)));
    patient.add_line(line(id, 1, date(1, 1), date(1, 4)));
    patient.sort_lines();
    let order: Vec<i64> = patient.lines().iter().map(|l| l.line_id.get()).collect();
    assert_eq!(order, vec![1, 2, 3]);
}

#[test]
fn inpatient_flag_is_true_when_any_visit_matches() {
    let id = PatientId::new(1);
    let mut patient = Patient::new(id);
    // The matching visit comes first; a later non-matching visit must not
    // overwrite the result.
    patient.add_visit(Visit::new(id, span(date(1, 1), date(1, 10))));
    patient.add_visit(Visit::new(id, span(date(3, 1), date(3, 5))));
    assert!(patient.is_inpatient_on(date(1, 5), EventKind::Clabsi));
    assert!(!patient.is_inpatient_on(date(2, 1), EventKind::Clabsi));
}

#[test]
fn clabsi_gets_one_day_discharge_grace_but_clanc_does_not() {
    let id = PatientId::new(1);
    let mut patient = Patient::new(id);
    patient.add_visit(Visit::new(id, span(date(1, 1), date(1, 10))));
    assert!(patient.is_inpatient_on(date(1, 10), EventKind::Clanc));
    assert!(!patient.is_inpatient_on(date(1, 11), EventKind::Clanc));
    assert!(patient.is_inpatient_on(date(1, 11), EventKind::Clabsi));
    assert!(!patient.is_inpatient_on(date(1, 12), EventKind::Clabsi));
}

#[test]
fn clabsi_records_lines_in_place() {
    let id = PatientId::new(4);
    let mut patient = Patient::new(id);
    patient.add_line(line(id, 1, date(1, 1), date(1, 10)));
    patient.add_line(line(id, 2, date(1, 5), date(1, 20)));
    patient.add_line(line(id, 3, date(2, 1), date(2, 5)));
    patient.sort_lines();

    let event = patient.record_clabsi(date(1, 7)).clone();
    assert_eq!(event.active_lines, vec![LineId::new(1), LineId::new(2)]);
    assert!((event.weight_per_line() - 0.5).abs() < 1e-12);
    assert!(!event.inpatient);

    let orphan = patient.record_clabsi(date(3, 1)).clone();
    assert!(!orphan.is_attributed());
    assert_eq!(orphan.weight_per_line(), 0.0);
    assert_eq!(patient.clabsi_events().len(), 2);
}

#[test]
fn clanc_is_attached_once_per_line() {
    let id = PatientId::new(9);
    let mut patient = Patient::new(id);
    patient.add_visit(Visit::new(id, span(date(1, 1), date(1, 3))));
    patient.add_line(line(id, 1, date(1, 1), date(1, 10)));

    let event = patient.record_clanc(LineId::new(1), date(1, 2)).unwrap();
    assert!(event.inpatient);
    assert_eq!(
        patient.record_clanc(LineId::new(1), date(1, 4)),
        Err(ClancRejection::AlreadyRecorded)
    );
    assert_eq!(
        patient.record_clanc(LineId::new(2), date(1, 4)),
        Err(ClancRejection::UnknownLine)
    );
    assert_eq!(patient.clanc_events().count(), 1);
}

#[test]
fn cohort_registers_patients_once() {
    let mut cohort = Cohort::new();
    cohort.register(PatientId::new(2));
    cohort.register(PatientId::new(1));
    cohort.register(PatientId::new(2));
    assert_eq!(cohort.len(), 2);
    let ids: Vec<i64> = cohort.patients().map(|p| p.id.get()).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn event_kind_parses_labels() {
    assert_eq!("CLABSI".parse::<EventKind>(), Ok(EventKind::Clabsi));
    assert_eq!(" clabsis ".parse::<EventKind>(), Ok(EventKind::Clabsi));
    assert_eq!("Clanc".parse::<EventKind>(), Ok(EventKind::Clanc));
    assert!("VAP".parse::<EventKind>().is_err());
}

#[test]
fn options_round_trip_through_json() {
    let options = AnalysisOptions::new()
        .with_range(DateRange::new(Some(date(1, 5)), Some(date(1, 8))).unwrap());
    let json = serde_json::to_string(&options).expect("serialize options");
    let round: AnalysisOptions = serde_json::from_str(&json).expect("deserialize options");
    assert_eq!(round, options);
    assert!(!round.range.is_unbounded());
}
