//! Diagnostic output types

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

/// Date format used in verdict messages and deadlines
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Verdict severity, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// When the flagged issue becomes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    /// Not enough data to tell
    Unknown,
    Immediate,
    /// Already past
    Overdue,
    /// Distance left before the deadline
    Distance(i64),
    Date(NaiveDate),
    /// Nothing due
    Clear,
}

impl std::fmt::Display for Deadline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Deadline::Unknown => write!(f, "unknown"),
            Deadline::Immediate => write!(f, "immediate"),
            Deadline::Overdue => write!(f, "overdue"),
            Deadline::Distance(km) => write!(f, "{} km", km),
            Deadline::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Deadline::Clear => write!(f, "none"),
        }
    }
}

impl Serialize for Deadline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Single verdict produced by the diagnostic evaluator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticVerdict {
    pub severity: Severity,
    pub message: String,
    pub next_deadline: Deadline,
    /// Name of the rule that produced this verdict
    pub rule: &'static str,
}

impl DiagnosticVerdict {
    pub fn new(
        rule: &'static str,
        severity: Severity,
        message: impl Into<String>,
        next_deadline: Deadline,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            next_deadline,
            rule,
        }
    }

    /// True for warning and critical verdicts
    pub fn needs_attention(&self) -> bool {
        self.severity != Severity::Ok
    }
}

/// Fuel economy derived from the fuel records of a vehicle
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FuelEconomySummary {
    /// Number of fuel records considered
    pub fill_count: usize,
    /// Litres per 100 km, absent when it cannot be computed
    pub average_consumption_per_hundred_km: Option<f64>,
    /// Distance between the first and last fill
    pub tracked_distance: Option<u32>,
    /// Litres pumped after the first fill
    pub tracked_volume: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_labels() {
        assert_eq!(Deadline::Distance(1500).to_string(), "1500 km");
        assert_eq!(
            Deadline::Date(NaiveDate::from_ymd_opt(2027, 3, 9).unwrap()).to_string(),
            "2027-03-09"
        );
        assert_eq!(Deadline::Clear.to_string(), "none");
    }

    #[test]
    fn test_verdict_serializes_labels() {
        let verdict = DiagnosticVerdict::new(
            "service",
            Severity::Warning,
            "Service due soon",
            Deadline::Distance(1200),
        );
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["next_deadline"], "1200 km");
        assert_eq!(json["rule"], "service");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Ok);
    }
}
