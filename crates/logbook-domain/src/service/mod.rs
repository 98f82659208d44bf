//! Domain services
//!
//! The maintenance diagnostic engine. Every function here is pure: inputs are
//! passed by reference, the reference date is a parameter and nothing is
//! cached between calls.

pub mod classifier;
pub mod diagnostic;
pub mod fuel_economy;
pub mod inspection;
pub mod policy;

pub use classifier::{
    latest_of_kind, KeywordClassifier, KeywordList, KeywordSets, MaintenanceKind,
    RecordClassifier,
};
pub use diagnostic::{
    current_distance, default_rules, evaluate_diagnostic, DiagnosticEvaluator, DiagnosticRule,
    EvaluationContext,
};
pub use fuel_economy::{average_consumption, summarize_fuel_economy};
pub use inspection::{next_inspection_due, next_inspection_due_with};
pub use policy::MaintenancePolicy;
