//! Fuel economy aggregation

use crate::model::{FuelEconomySummary, ServiceRecord};

/// Average consumption in litres per 100 km, if computable
pub fn average_consumption(records: &[ServiceRecord]) -> Option<f64> {
    summarize_fuel_economy(records).average_consumption_per_hundred_km
}

/// Aggregate fuel records sorted by odometer.
///
/// The volume of the first fill is left out: it was burnt before the first
/// measured point. A fill without a volume counts as zero litres.
pub fn summarize_fuel_economy(records: &[ServiceRecord]) -> FuelEconomySummary {
    let mut fills: Vec<&ServiceRecord> = records.iter().filter(|r| r.is_fuel()).collect();
    fills.sort_by_key(|r| r.odometer_reading);

    let mut summary = FuelEconomySummary {
        fill_count: fills.len(),
        ..Default::default()
    };

    let (first, rest) = match fills.split_first() {
        Some((first, rest)) if !rest.is_empty() => (first, rest),
        _ => return summary,
    };
    let last = rest[rest.len() - 1];

    let distance = last.odometer_reading - first.odometer_reading;
    let volume: f64 = rest.iter().map(|r| r.fuel_volume.unwrap_or(0.0)).sum();
    if distance == 0 || volume <= 0.0 {
        return summary;
    }

    summary.average_consumption_per_hundred_km = Some((volume / distance as f64) * 100.0);
    summary.tracked_distance = Some(distance);
    summary.tracked_volume = Some(volume);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fill(km: u32, litres: f64) -> ServiceRecord {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        ServiceRecord::fuel("v1", "Plein", date, km, litres * 1.8, litres)
    }

    #[test]
    fn test_no_or_single_fill_is_absent() {
        assert!(average_consumption(&[]).is_none());
        assert!(average_consumption(&[fill(1000, 40.0)]).is_none());
        assert_eq!(summarize_fuel_economy(&[fill(1000, 40.0)]).fill_count, 1);
    }

    #[test]
    fn test_first_fill_volume_excluded() {
        let avg = average_consumption(&[fill(0, 40.0), fill(500, 35.0)]).unwrap();
        assert!((avg - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_sorted_by_odometer_not_storage_order() {
        let records = vec![fill(1500, 30.0), fill(500, 35.0), fill(1000, 32.0)];
        let summary = summarize_fuel_economy(&records);
        // first fill is the 500 km one; (32 + 30) / 1000 km
        assert_eq!(summary.tracked_distance, Some(1000));
        let avg = summary.average_consumption_per_hundred_km.unwrap();
        assert!((avg - 6.2).abs() < 1e-9);
    }

    #[test]
    fn test_maintenance_records_ignored() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let records = vec![
            fill(0, 40.0),
            ServiceRecord::maintenance("v1", "Vidange", date, 90000, 120.0),
            fill(800, 48.0),
        ];
        let avg = average_consumption(&records).unwrap();
        assert!((avg - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_distance_or_volume_is_absent() {
        assert!(average_consumption(&[fill(1000, 40.0), fill(1000, 35.0)]).is_none());
        assert!(average_consumption(&[fill(1000, 40.0), fill(1500, 0.0)]).is_none());

        let mut no_volume = fill(1500, 0.0);
        no_volume.fuel_volume = None;
        assert!(average_consumption(&[fill(1000, 40.0), no_volume]).is_none());
    }
}
