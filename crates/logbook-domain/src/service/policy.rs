//! Maintenance schedule thresholds

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Intervals and alert thresholds used by the diagnostic rules.
///
/// A simplified approximation of manufacturer and regulatory schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenancePolicy {
    /// Distance between two services
    pub service_interval_km: u32,
    /// Calendar time between two services
    pub service_interval_months: u32,
    /// Warn when fewer km than this remain before the next service
    pub service_warning_km: u32,
    /// Belt replacement is due above this distance when never done
    pub drive_belt_km: u32,
    /// Belt replacement is due above this vehicle age when never done
    pub drive_belt_years: f64,
    /// Years between two technical inspections
    pub inspection_interval_years: u32,
    /// Years from first registration to the first inspection
    pub first_inspection_years: u32,
    /// Warn when fewer (30-day) months than this remain before the inspection
    pub inspection_warning_months: f64,
}

impl Default for MaintenancePolicy {
    fn default() -> Self {
        Self {
            service_interval_km: 20_000,
            service_interval_months: 12,
            service_warning_km: 2_000,
            drive_belt_km: 150_000,
            drive_belt_years: 6.0,
            inspection_interval_years: 2,
            first_inspection_years: 4,
            inspection_warning_months: 2.0,
        }
    }
}

/// Calendar month addition; the day is clamped to the end of shorter months
/// (2024-02-29 + 12 months = 2025-02-28).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

pub fn add_years(date: NaiveDate, years: u32) -> NaiveDate {
    add_months(date, years.saturating_mul(12))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_years_clamps_leap_day() {
        let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(add_years(leap, 1), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert_eq!(add_years(leap, 4), NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());
    }

    #[test]
    fn test_policy_partial_json_uses_defaults() {
        let policy: MaintenancePolicy =
            serde_json::from_str(r#"{ "service_interval_km": 15000 }"#).unwrap();
        assert_eq!(policy.service_interval_km, 15_000);
        assert_eq!(policy.drive_belt_km, 150_000);
    }
}
