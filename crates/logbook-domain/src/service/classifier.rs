//! Maintenance record classification
//!
//! Invoices carry no structured service type: the only signal is the free-text
//! title. Classification is a strategy (`RecordClassifier`) so keyword lists
//! can be localized or extended without touching the diagnostic rules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::ServiceRecord;

/// Policy bucket a maintenance record can fall into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaintenanceKind {
    /// Periodic overhaul or oil change
    Service,
    /// Timing/drive belt replacement
    DriveBelt,
    /// Regulatory roadworthiness check
    TechnicalInspection,
}

impl MaintenanceKind {
    pub const ALL: [MaintenanceKind; 3] = [
        MaintenanceKind::Service,
        MaintenanceKind::DriveBelt,
        MaintenanceKind::TechnicalInspection,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceKind::Service => "service",
            MaintenanceKind::DriveBelt => "drive-belt",
            MaintenanceKind::TechnicalInspection => "technical-inspection",
        }
    }
}

impl std::fmt::Display for MaintenanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Strategy mapping a record title to the buckets it matches
pub trait RecordClassifier: Send + Sync {
    /// Every bucket the title matches; buckets are not mutually exclusive
    fn classify_title(&self, title: &str) -> BTreeSet<MaintenanceKind>;

    /// Whether a record belongs to `kind`. Fuel records never do.
    fn matches(&self, record: &ServiceRecord, kind: MaintenanceKind) -> bool {
        record.is_maintenance() && self.classify_title(&record.title).contains(&kind)
    }
}

/// Most recent record of the given kind.
///
/// Records sharing the latest date are ordered by odometer reading, then by
/// position in `records` (the last one wins).
pub fn latest_of_kind<'a>(
    classifier: &dyn RecordClassifier,
    records: &'a [ServiceRecord],
    kind: MaintenanceKind,
) -> Option<&'a ServiceRecord> {
    records
        .iter()
        .filter(|r| classifier.matches(r, kind))
        .max_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.odometer_reading.cmp(&b.odometer_reading))
        })
}

/// Keywords for one bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordList {
    /// Matched anywhere in the title
    #[serde(default)]
    pub phrases: Vec<String>,
    /// Matched only as a whole word. The built-in lists leave this empty;
    /// a keywords file can set it to keep "CT" from hitting "facture".
    #[serde(default)]
    pub abbreviations: Vec<String>,
}

impl KeywordList {
    fn new(phrases: &[&str], abbreviations: &[&str]) -> Self {
        Self {
            phrases: phrases.iter().map(|s| s.to_string()).collect(),
            abbreviations: abbreviations.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn lowercased(&self) -> Self {
        Self {
            phrases: self.phrases.iter().map(|s| s.to_lowercase()).collect(),
            abbreviations: self.abbreviations.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    fn extend(&mut self, other: &KeywordList) {
        for phrase in &other.phrases {
            if !self.phrases.contains(phrase) {
                self.phrases.push(phrase.clone());
            }
        }
        for abbr in &other.abbreviations {
            if !self.abbreviations.contains(abbr) {
                self.abbreviations.push(abbr.clone());
            }
        }
    }

    /// `title` and `words` must already be lowercase
    fn matches(&self, title: &str, words: &[&str]) -> bool {
        self.phrases.iter().any(|p| !p.is_empty() && title.contains(p.as_str()))
            || self
                .abbreviations
                .iter()
                .any(|a| words.iter().any(|w| w == a))
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty() && self.abbreviations.is_empty()
    }
}

/// Keyword lists for every bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSets {
    #[serde(default)]
    pub service: KeywordList,
    #[serde(default)]
    pub drive_belt: KeywordList,
    #[serde(default)]
    pub technical_inspection: KeywordList,
}

impl KeywordSets {
    pub fn french() -> Self {
        Self {
            service: KeywordList::new(&["révision", "revision", "vidange"], &[]),
            drive_belt: KeywordList::new(&["distribution", "courroie"], &[]),
            technical_inspection: KeywordList::new(
                &["contrôle technique", "controle technique", "ct"],
                &[],
            ),
        }
    }

    pub fn english() -> Self {
        Self {
            service: KeywordList::new(&["service", "oil change"], &[]),
            drive_belt: KeywordList::new(&["timing belt", "drive belt", "cambelt", "cam belt"], &[]),
            technical_inspection: KeywordList::new(
                &["technical inspection", "roadworthiness", "mot"],
                &[],
            ),
        }
    }

    /// French and English lists combined
    pub fn multilingual() -> Self {
        let mut sets = Self::french();
        sets.extend(&Self::english());
        sets
    }

    /// Lists for a locale code ("fr", "en" or "all")
    pub fn for_locale(locale: &str) -> Option<Self> {
        match locale.trim().to_lowercase().as_str() {
            "fr" => Some(Self::french()),
            "en" => Some(Self::english()),
            "all" => Some(Self::multilingual()),
            _ => None,
        }
    }

    /// Add the keywords of `other` to these lists
    pub fn extend(&mut self, other: &KeywordSets) {
        self.service.extend(&other.service);
        self.drive_belt.extend(&other.drive_belt);
        self.technical_inspection.extend(&other.technical_inspection);
    }

    fn list(&self, kind: MaintenanceKind) -> &KeywordList {
        match kind {
            MaintenanceKind::Service => &self.service,
            MaintenanceKind::DriveBelt => &self.drive_belt,
            MaintenanceKind::TechnicalInspection => &self.technical_inspection,
        }
    }
}

/// Case-insensitive keyword classifier
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    sets: KeywordSets,
}

impl KeywordClassifier {
    pub fn new(sets: KeywordSets) -> Self {
        Self {
            sets: KeywordSets {
                service: sets.service.lowercased(),
                drive_belt: sets.drive_belt.lowercased(),
                technical_inspection: sets.technical_inspection.lowercased(),
            },
        }
    }

    pub fn french() -> Self {
        Self::new(KeywordSets::french())
    }

    pub fn english() -> Self {
        Self::new(KeywordSets::english())
    }

    pub fn keyword_sets(&self) -> &KeywordSets {
        &self.sets
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(KeywordSets::multilingual())
    }
}

impl RecordClassifier for KeywordClassifier {
    fn classify_title(&self, title: &str) -> BTreeSet<MaintenanceKind> {
        let title = title.to_lowercase();
        let words: Vec<&str> = title
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        MaintenanceKind::ALL
            .into_iter()
            .filter(|kind| self.sets.list(*kind).matches(&title, &words))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn kinds(classifier: &KeywordClassifier, title: &str) -> Vec<MaintenanceKind> {
        classifier.classify_title(title).into_iter().collect()
    }

    #[test]
    fn test_french_titles() {
        let c = KeywordClassifier::french();
        assert_eq!(kinds(&c, "Vidange + filtre à huile"), vec![MaintenanceKind::Service]);
        assert_eq!(kinds(&c, "RÉVISION 60 000 km"), vec![MaintenanceKind::Service]);
        assert_eq!(
            kinds(&c, "Kit courroie de distribution"),
            vec![MaintenanceKind::DriveBelt]
        );
        assert_eq!(
            kinds(&c, "Contrôle Technique"),
            vec![MaintenanceKind::TechnicalInspection]
        );
        assert_eq!(kinds(&c, "CT favorable"), vec![MaintenanceKind::TechnicalInspection]);
        assert!(kinds(&c, "Pneus avant").is_empty());
    }

    #[test]
    fn test_builtin_abbreviation_matches_as_substring() {
        let c = KeywordClassifier::french();
        assert_eq!(
            kinds(&c, "CT2025 favorable"),
            vec![MaintenanceKind::TechnicalInspection]
        );
        assert_eq!(
            kinds(&c, "Facture pneus"),
            vec![MaintenanceKind::TechnicalInspection]
        );
        assert!(c.keyword_sets().technical_inspection.abbreviations.is_empty());
    }

    #[test]
    fn test_whole_word_abbreviation() {
        let mut sets = KeywordSets::default();
        sets.technical_inspection.abbreviations.push("CT".to_string());
        let c = KeywordClassifier::new(sets);
        assert!(kinds(&c, "Facture pneus").is_empty());
        assert!(kinds(&c, "Contact garage").is_empty());
        assert!(kinds(&c, "CT2025 favorable").is_empty());
        assert_eq!(
            kinds(&c, "Visite CT/contre-visite"),
            vec![MaintenanceKind::TechnicalInspection]
        );
    }

    #[test]
    fn test_buckets_are_independent() {
        let c = KeywordClassifier::french();
        assert_eq!(
            kinds(&c, "Révision + courroie de distribution"),
            vec![MaintenanceKind::Service, MaintenanceKind::DriveBelt]
        );
    }

    #[test]
    fn test_english_and_multilingual() {
        let en = KeywordClassifier::english();
        assert_eq!(kinds(&en, "Annual service"), vec![MaintenanceKind::Service]);
        assert_eq!(kinds(&en, "MOT test"), vec![MaintenanceKind::TechnicalInspection]);
        assert!(kinds(&en, "Vidange").is_empty());

        let all = KeywordClassifier::default();
        assert_eq!(kinds(&all, "Vidange"), vec![MaintenanceKind::Service]);
        assert_eq!(kinds(&all, "Cambelt kit"), vec![MaintenanceKind::DriveBelt]);
    }

    #[test]
    fn test_custom_keywords_are_lowercased() {
        let mut sets = KeywordSets::default();
        sets.service.phrases.push("Tagliando".to_string());
        sets.technical_inspection.abbreviations.push("TÜV".to_string());
        let c = KeywordClassifier::new(sets);
        assert_eq!(kinds(&c, "TAGLIANDO completo"), vec![MaintenanceKind::Service]);
        assert_eq!(kinds(&c, "tüv 2026"), vec![MaintenanceKind::TechnicalInspection]);
    }

    #[test]
    fn test_fuel_records_never_match() {
        let c = KeywordClassifier::default();
        let date = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let fuel = ServiceRecord::fuel("v1", "Station service Total", date, 1000, 70.0, 40.0);
        assert!(!c.matches(&fuel, MaintenanceKind::Service));
    }

    #[test]
    fn test_latest_of_kind_tie_break() {
        let c = KeywordClassifier::french();
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let records = vec![
            ServiceRecord::maintenance("v1", "Vidange", date, 41000, 90.0),
            ServiceRecord::maintenance("v1", "Révision", date, 40000, 250.0),
            ServiceRecord::maintenance(
                "v1",
                "Vidange",
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                30000,
                90.0,
            ),
        ];
        let latest = latest_of_kind(&c, &records, MaintenanceKind::Service).unwrap();
        assert_eq!(latest.odometer_reading, 41000);
        assert!(latest_of_kind(&c, &records, MaintenanceKind::DriveBelt).is_none());
    }
}
