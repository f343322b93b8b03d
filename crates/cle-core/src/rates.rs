//! Densities and rates per 1000 device-days.
//!
//! Every division is guarded: a zero denominator yields a rate of zero.

use serde::{Deserialize, Serialize};

use crate::metrics::{EventCounts, Exposure};

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Events per 1000 days of exposure.
pub fn rate_per_1000(events: f64, days: f64) -> f64 {
    safe_ratio(events, days) * 1000.0
}

/// Values derived from an [`Exposure`] and its [`EventCounts`].
///
/// Event rates use catheter-days (days with any line) as the denominator,
/// split into the inpatient and outpatient subsets for the split rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    pub mean_line_days: f64,
    /// Line-days per catheter-day.
    pub line_utilization: f64,
    /// Lumen-days per catheter-day.
    pub lumen_utilization: f64,
    pub clabsi: f64,
    pub clabsi_inpatient: f64,
    pub clabsi_outpatient: f64,
    pub clanc: f64,
    pub clanc_inpatient: f64,
    pub clanc_outpatient: f64,
    pub events: f64,
}

impl Rates {
    pub fn derive(exposure: &Exposure, counts: &EventCounts) -> Self {
        let total = exposure.catheter_days as f64;
        let inpatient = exposure.inpatient_catheter_days as f64;
        let outpatient = exposure.outpatient_catheter_days as f64;
        Self {
            mean_line_days: safe_ratio(exposure.line_days as f64, exposure.lines as f64),
            line_utilization: safe_ratio(exposure.line_days as f64, total),
            lumen_utilization: safe_ratio(exposure.lumen_days as f64, total),
            clabsi: rate_per_1000(counts.clabsi as f64, total),
            clabsi_inpatient: rate_per_1000(counts.clabsi_inpatient as f64, inpatient),
            clabsi_outpatient: rate_per_1000(counts.clabsi_outpatient as f64, outpatient),
            clanc: rate_per_1000(counts.clanc as f64, total),
            clanc_inpatient: rate_per_1000(counts.clanc_inpatient as f64, inpatient),
            clanc_outpatient: rate_per_1000(counts.clanc_outpatient as f64, outpatient),
            events: rate_per_1000(counts.total() as f64, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_yields_zero() {
        assert_eq!(safe_ratio(5.0, 0.0), 0.0);
        assert_eq!(rate_per_1000(2.0, 0.0), 0.0);
        assert!((rate_per_1000(1.0, 6.0) - 166.666_666).abs() < 1e-3);
    }

    #[test]
    fn rates_with_no_exposure_are_zero() {
        let counts = EventCounts {
            clabsi: 2,
            clabsi_outpatient: 2,
            ..EventCounts::default()
        };
        let rates = Rates::derive(&Exposure::default(), &counts);
        assert_eq!(rates, Rates::default());
        assert!(rates.clabsi.is_finite());
    }

    #[test]
    fn split_rates_use_split_denominators() {
        let exposure = Exposure {
            lines: 2,
            line_days: 30,
            lumen_days: 50,
            catheter_days: 20,
            inpatient_catheter_days: 5,
            outpatient_catheter_days: 15,
            ..Exposure::default()
        };
        let counts = EventCounts {
            clabsi: 2,
            clabsi_inpatient: 1,
            clabsi_outpatient: 1,
            clanc: 1,
            clanc_outpatient: 1,
            ..EventCounts::default()
        };
        let rates = Rates::derive(&exposure, &counts);
        assert_eq!(rates.mean_line_days, 15.0);
        assert_eq!(rates.line_utilization, 1.5);
        assert_eq!(rates.lumen_utilization, 2.5);
        assert_eq!(rates.clabsi, 100.0);
        assert_eq!(rates.clabsi_inpatient, 200.0);
        assert!((rates.clabsi_outpatient - 66.667).abs() < 1e-3);
        assert_eq!(rates.clanc_inpatient, 0.0);
        assert_eq!(rates.events, 150.0);
    }
}
