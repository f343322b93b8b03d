use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::PatientId;
use crate::patient::Patient;

/// All patients ingested for one analysis run, ordered by identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cohort {
    patients: BTreeMap<PatientId, Patient>,
}

impl Cohort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a patient, creating an empty record on first reference.
    pub fn register(&mut self, id: PatientId) -> &mut Patient {
        self.patients.entry(id).or_insert_with(|| Patient::new(id))
    }

    pub fn get(&self, id: PatientId) -> Option<&Patient> {
        self.patients.get(&id)
    }

    pub fn get_mut(&mut self, id: PatientId) -> Option<&mut Patient> {
        self.patients.get_mut(&id)
    }

    pub fn contains(&self, id: PatientId) -> bool {
        self.patients.contains_key(&id)
    }

    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.patients.values()
    }

    pub fn patients_mut(&mut self) -> impl Iterator<Item = &mut Patient> {
        self.patients.values_mut()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.patients().map(|patient| patient.lines().len()).sum()
    }
}
