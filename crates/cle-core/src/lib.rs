//! Surveillance metrics for central line events.
//!
//! The pipeline per patient is aggregation ([`aggregate`]), event
//! attribution ([`attribute`]) and rate derivation ([`Rates::derive`]).
//! [`analyze`] runs it over a whole cohort and rolls the results up into
//! population totals.

mod aggregator;
mod analyze;
mod classifier;
mod metrics;
mod rates;

pub use aggregator::{CatheterDays, LineExposure, aggregate};
pub use analyze::{SurveillanceReport, analyze};
pub use classifier::{Attribution, LineAttribution, attribute};
pub use metrics::{EventCounts, Exposure, LineMetrics, PatientMetrics, PopulationTotals};
pub use rates::{Rates, rate_per_1000, safe_ratio};
