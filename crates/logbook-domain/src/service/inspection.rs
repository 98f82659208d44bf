//! Next technical inspection date

use chrono::NaiveDate;

use super::classifier::{latest_of_kind, KeywordClassifier, MaintenanceKind, RecordClassifier};
use super::policy::{add_years, MaintenancePolicy};
use crate::model::ServiceRecord;

/// Next inspection due date with the default keywords and policy
pub fn next_inspection_due(
    first_registration_date: NaiveDate,
    records: &[ServiceRecord],
    today: NaiveDate,
) -> NaiveDate {
    next_inspection_due_with(
        &KeywordClassifier::default(),
        &MaintenancePolicy::default(),
        first_registration_date,
        records,
        today,
    )
}

/// Next inspection due date.
///
/// - latest inspection record + the inspection interval, if any;
/// - otherwise the first inspection date while it is still ahead;
/// - otherwise the registration date itself. That date is deliberately in
///   the past so a vehicle old enough for inspection but with no inspection
///   on record is reported overdue. It is a heuristic, not a real due date.
pub fn next_inspection_due_with(
    classifier: &dyn RecordClassifier,
    policy: &MaintenancePolicy,
    first_registration_date: NaiveDate,
    records: &[ServiceRecord],
    today: NaiveDate,
) -> NaiveDate {
    if let Some(last) = latest_of_kind(classifier, records, MaintenanceKind::TechnicalInspection) {
        return add_years(last.date, policy.inspection_interval_years);
    }

    let first_due = add_years(first_registration_date, policy.first_inspection_years);
    if today < first_due {
        return first_due;
    }

    first_registration_date
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 10, 16)
    }

    #[test]
    fn test_young_vehicle_first_inspection() {
        let registered = date(2023, 10, 16);
        let due = next_inspection_due(registered, &[], today());
        assert_eq!(due, date(2027, 10, 16));
        assert!(due > today());
    }

    #[test]
    fn test_old_vehicle_without_inspection_returns_registration_date() {
        let registered = date(2016, 10, 16);
        let due = next_inspection_due(registered, &[], today());
        assert_eq!(due, registered);
        assert!(due < today());
    }

    #[test]
    fn test_first_due_today_is_not_in_future() {
        let registered = date(2022, 10, 16);
        assert_eq!(next_inspection_due(registered, &[], today()), registered);
    }

    #[test]
    fn test_latest_inspection_plus_two_years() {
        let records = vec![
            ServiceRecord::maintenance("v1", "Contrôle technique", date(2022, 5, 3), 60000, 78.0),
            ServiceRecord::maintenance("v1", "Contrôle technique", date(2024, 5, 10), 80000, 82.0),
            ServiceRecord::maintenance("v1", "Vidange", date(2025, 1, 10), 90000, 120.0),
        ];
        let due = next_inspection_due(date(2016, 1, 1), &records, today());
        assert_eq!(due, date(2026, 5, 10));
    }

    #[test]
    fn test_leap_day_inspection() {
        let records = vec![ServiceRecord::maintenance(
            "v1",
            "CT",
            date(2024, 2, 29),
            50000,
            80.0,
        )];
        let due = next_inspection_due(date(2018, 1, 1), &records, today());
        assert_eq!(due, date(2026, 2, 28));
    }

    #[test]
    fn test_custom_policy_interval() {
        let policy = MaintenancePolicy {
            inspection_interval_years: 1,
            ..Default::default()
        };
        let records = vec![ServiceRecord::maintenance(
            "v1",
            "MOT",
            date(2026, 3, 1),
            50000,
            54.0,
        )];
        let due = next_inspection_due_with(
            &KeywordClassifier::english(),
            &policy,
            date(2015, 1, 1),
            &records,
            today(),
        );
        assert_eq!(due, date(2027, 3, 1));
    }
}
