//! Maintenance diagnostic evaluator
//!
//! The verdict comes from an ordered list of rules. Rules are checked in
//! sequence and the first one that fires wins: the most urgent issue is
//! reported, issues are never aggregated. Adding or reordering rules is a
//! change to the list, not to the evaluation loop.
//!
//! Default order:
//! 1. empty history
//! 2. service / oil change (distance or calendar interval)
//! 3. drive belt never replaced on an old or high-mileage vehicle
//! 4. technical inspection overdue or due soon
//!
//! If nothing fires the verdict is `ok`.

use chrono::NaiveDate;
use tracing::debug;

use super::classifier::{latest_of_kind, KeywordClassifier, MaintenanceKind, RecordClassifier};
use super::inspection::next_inspection_due_with;
use super::policy::{add_months, MaintenancePolicy};
use crate::model::verdict::DATE_FORMAT;
use crate::model::{Deadline, DiagnosticVerdict, ServiceRecord, Severity, Vehicle};

/// Inputs shared by every rule during one evaluation
pub struct EvaluationContext<'a> {
    pub vehicle: &'a Vehicle,
    pub records: &'a [ServiceRecord],
    /// Reference date, read once per evaluation
    pub today: NaiveDate,
    /// Highest odometer reading across all records, 0 when there are none.
    /// The vehicle's initial odometer is not consulted.
    pub current_distance: u32,
    pub classifier: &'a dyn RecordClassifier,
    pub policy: &'a MaintenancePolicy,
}

impl<'a> EvaluationContext<'a> {
    pub fn latest(&self, kind: MaintenanceKind) -> Option<&'a ServiceRecord> {
        latest_of_kind(self.classifier, self.records, kind)
    }

    pub fn has_record(&self, kind: MaintenanceKind) -> bool {
        self.records.iter().any(|r| self.classifier.matches(r, kind))
    }
}

/// One step of the rule chain
pub trait DiagnosticRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Some` stops the chain with this verdict, `None` falls through
    fn check(&self, ctx: &EvaluationContext<'_>) -> Option<DiagnosticVerdict>;
}

/// No records at all
pub struct EmptyHistoryRule;

impl DiagnosticRule for EmptyHistoryRule {
    fn name(&self) -> &'static str {
        "empty-history"
    }

    fn check(&self, ctx: &EvaluationContext<'_>) -> Option<DiagnosticVerdict> {
        if !ctx.records.is_empty() {
            return None;
        }
        Some(DiagnosticVerdict::new(
            self.name(),
            Severity::Warning,
            "No maintenance history. Add your last service invoice to enable tracking.",
            Deadline::Unknown,
        ))
    }
}

/// Periodic service: distance or calendar interval since the latest service
pub struct ServiceIntervalRule;

impl DiagnosticRule for ServiceIntervalRule {
    fn name(&self) -> &'static str {
        "service"
    }

    fn check(&self, ctx: &EvaluationContext<'_>) -> Option<DiagnosticVerdict> {
        let last = ctx.latest(MaintenanceKind::Service)?;
        let policy = ctx.policy;

        let since = i64::from(ctx.current_distance) - i64::from(last.odometer_reading);
        let remaining = i64::from(policy.service_interval_km) - since;
        let due_date = add_months(last.date, policy.service_interval_months);

        if since >= i64::from(policy.service_interval_km) {
            return Some(DiagnosticVerdict::new(
                self.name(),
                Severity::Critical,
                format!(
                    "URGENT: service overdue by {} km. Risk of engine damage.",
                    remaining.abs()
                ),
                Deadline::Immediate,
            ));
        }
        if ctx.today > due_date {
            return Some(DiagnosticVerdict::new(
                self.name(),
                Severity::Critical,
                format!(
                    "URGENT: annual service overdue since {}.",
                    due_date.format(DATE_FORMAT)
                ),
                Deadline::Immediate,
            ));
        }
        if remaining < i64::from(policy.service_warning_km) {
            return Some(DiagnosticVerdict::new(
                self.name(),
                Severity::Warning,
                format!("Service due soon ({} km remaining).", remaining),
                Deadline::Distance(remaining),
            ));
        }
        None
    }
}

/// Timing belt never replaced on a vehicle past the distance or age limit
pub struct DriveBeltRule;

impl DiagnosticRule for DriveBeltRule {
    fn name(&self) -> &'static str {
        "drive-belt"
    }

    fn check(&self, ctx: &EvaluationContext<'_>) -> Option<DiagnosticVerdict> {
        if ctx.has_record(MaintenanceKind::DriveBelt) {
            return None;
        }
        let policy = ctx.policy;

        if ctx.current_distance > policy.drive_belt_km {
            return Some(DiagnosticVerdict::new(
                self.name(),
                Severity::Critical,
                format!(
                    "ALERT: timing belt replacement required (over {} km). Risk of engine failure.",
                    policy.drive_belt_km
                ),
                Deadline::Immediate,
            ));
        }

        let age_years = ctx.vehicle.age_years(ctx.today);
        if age_years > policy.drive_belt_years {
            return Some(DiagnosticVerdict::new(
                self.name(),
                Severity::Critical,
                format!(
                    "ALERT: vehicle is {:.1} years old. Timing belt replacement due (over {} years).",
                    age_years, policy.drive_belt_years
                ),
                Deadline::Immediate,
            ));
        }
        None
    }
}

/// Technical inspection overdue or coming up
pub struct TechnicalInspectionRule;

impl DiagnosticRule for TechnicalInspectionRule {
    fn name(&self) -> &'static str {
        "technical-inspection"
    }

    fn check(&self, ctx: &EvaluationContext<'_>) -> Option<DiagnosticVerdict> {
        let next = next_inspection_due_with(
            ctx.classifier,
            ctx.policy,
            ctx.vehicle.first_registration_date,
            ctx.records,
            ctx.today,
        );
        // approximate 30-day months
        let months_left = (next - ctx.today).num_days() as f64 / 30.0;

        if months_left < 0.0 {
            return Some(DiagnosticVerdict::new(
                self.name(),
                Severity::Critical,
                "WARNING: technical inspection overdue. The vehicle is not road-legal.",
                Deadline::Overdue,
            ));
        }
        if months_left < ctx.policy.inspection_warning_months {
            return Some(DiagnosticVerdict::new(
                self.name(),
                Severity::Warning,
                format!(
                    "Technical inspection due by {}.",
                    next.format(DATE_FORMAT)
                ),
                Deadline::Date(next),
            ));
        }
        None
    }
}

/// Default rule chain, most urgent first
pub fn default_rules() -> Vec<Box<dyn DiagnosticRule>> {
    vec![
        Box::new(EmptyHistoryRule),
        Box::new(ServiceIntervalRule),
        Box::new(DriveBeltRule),
        Box::new(TechnicalInspectionRule),
    ]
}

/// Rule-chain evaluator producing one verdict per call
pub struct DiagnosticEvaluator {
    classifier: Box<dyn RecordClassifier>,
    policy: MaintenancePolicy,
    rules: Vec<Box<dyn DiagnosticRule>>,
}

impl DiagnosticEvaluator {
    pub fn new(classifier: Box<dyn RecordClassifier>, policy: MaintenancePolicy) -> Self {
        Self {
            classifier,
            policy,
            rules: default_rules(),
        }
    }

    /// Replace the rule chain
    pub fn with_rules(mut self, rules: Vec<Box<dyn DiagnosticRule>>) -> Self {
        self.rules = rules;
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn classifier(&self) -> &dyn RecordClassifier {
        self.classifier.as_ref()
    }

    pub fn policy(&self) -> &MaintenancePolicy {
        &self.policy
    }

    /// Evaluate a vehicle's records. `records` need not be sorted.
    pub fn evaluate(
        &self,
        vehicle: &Vehicle,
        records: &[ServiceRecord],
        today: NaiveDate,
    ) -> DiagnosticVerdict {
        let ctx = EvaluationContext {
            vehicle,
            records,
            today,
            current_distance: current_distance(records),
            classifier: self.classifier.as_ref(),
            policy: &self.policy,
        };

        for rule in &self.rules {
            if let Some(verdict) = rule.check(&ctx) {
                debug!(
                    vehicle = %vehicle.id,
                    rule = rule.name(),
                    severity = %verdict.severity,
                    "diagnostic rule fired"
                );
                return verdict;
            }
        }

        DiagnosticVerdict::new(
            "default",
            Severity::Ok,
            "Vehicle healthy. All maintenance deadlines are under watch.",
            Deadline::Clear,
        )
    }

    pub fn next_inspection_due(
        &self,
        first_registration_date: NaiveDate,
        records: &[ServiceRecord],
        today: NaiveDate,
    ) -> NaiveDate {
        next_inspection_due_with(
            self.classifier.as_ref(),
            &self.policy,
            first_registration_date,
            records,
            today,
        )
    }
}

impl Default for DiagnosticEvaluator {
    fn default() -> Self {
        Self::new(
            Box::new(KeywordClassifier::default()),
            MaintenancePolicy::default(),
        )
    }
}

/// Evaluate with the default keywords, policy and rules
pub fn evaluate_diagnostic(
    vehicle: &Vehicle,
    records: &[ServiceRecord],
    today: NaiveDate,
) -> DiagnosticVerdict {
    DiagnosticEvaluator::default().evaluate(vehicle, records, today)
}

/// Highest odometer reading, 0 without records
pub fn current_distance(records: &[ServiceRecord]) -> u32 {
    records
        .iter()
        .map(|r| r.odometer_reading)
        .max()
        .unwrap_or(0)
}
