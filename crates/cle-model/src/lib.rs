//! Central line event data model.
//!
//! Patients own their visits, lines and bloodstream infection events. A
//! non-infectious complication lives on the line it is attributed to. All
//! spans are half-open day intervals that have already been clipped to the
//! analysis [`DateRange`].

pub mod cohort;
pub mod error;
pub mod event;
pub mod ids;
pub mod interval;
pub mod options;
pub mod patient;

pub use cohort::Cohort;
pub use error::{ModelError, Result};
pub use event::{ClabsiEvent, ClancEvent, EventKind, UnknownEventKind};
pub use ids::{LineId, PatientId};
pub use interval::{DateRange, DayInterval, clip, day_set};
pub use options::AnalysisOptions;
pub use patient::{ClancRejection, Line, Patient, Visit};
