//! Configuration management for vehicle-logbook
//!
//! Config stored at: ~/.config/vehicle-logbook/config.json

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use logbook_domain::service::{
    DiagnosticEvaluator, KeywordClassifier, KeywordSets, MaintenancePolicy,
};
use logbook_types::{ConfigError, Error, OutputFormat, Result};

use crate::app::DashboardSettings;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Store directory override (vehicles.json, records.json)
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    /// Built-in keyword lists to classify invoice titles (fr, en, all)
    #[serde(default = "default_keyword_locale")]
    pub keyword_locale: String,

    /// Extra keywords, TOML file with `service`, `drive_belt` and
    /// `technical_inspection` tables
    #[serde(default)]
    pub keywords_file: Option<PathBuf>,

    /// Diesel average (L/100km) above which a notice is shown
    #[serde(default = "default_overconsumption_threshold")]
    pub overconsumption_threshold: f64,

    /// Number of records shown in the dashboard history
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Maintenance intervals and alert thresholds
    #[serde(default)]
    pub policy: MaintenancePolicy,
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_keyword_locale() -> String {
    "all".to_string()
}

fn default_overconsumption_threshold() -> f64 {
    8.5
}

fn default_history_limit() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: None,
            output_format: default_output_format(),
            keyword_locale: default_keyword_locale(),
            keywords_file: None,
            overconsumption_threshold: default_overconsumption_threshold(),
            history_limit: default_history_limit(),
            policy: MaintenancePolicy::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("vehicle-logbook");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the store directory path
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.store_dir {
            return Ok(dir.clone());
        }

        let store_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("vehicle-logbook");
        Ok(store_dir)
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Keyword lists for the configured locale, extended with the keywords file
    pub fn keyword_sets(&self) -> Result<KeywordSets> {
        let mut sets = KeywordSets::for_locale(&self.keyword_locale)
            .ok_or_else(|| ConfigError::UnknownLocale(self.keyword_locale.clone()))?;

        if let Some(ref path) = self.keywords_file {
            if !path.exists() {
                return Err(Error::FileNotFound(format!(
                    "Keywords file not found: {}",
                    path.display()
                )));
            }
            let content = std::fs::read_to_string(path)?;
            let extra: KeywordSets = toml::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            sets.extend(&extra);
        }

        Ok(sets)
    }

    pub fn classifier(&self) -> Result<KeywordClassifier> {
        Ok(KeywordClassifier::new(self.keyword_sets()?))
    }

    /// Diagnostic evaluator built from the configured keywords and policy
    pub fn evaluator(&self) -> Result<DiagnosticEvaluator> {
        Ok(DiagnosticEvaluator::new(
            Box::new(self.classifier()?),
            self.policy.clone(),
        ))
    }

    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            overconsumption_threshold: self.overconsumption_threshold,
            history_limit: self.history_limit,
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Vehicle Logbook Configuration")?;
        writeln!(f, "=============================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Store dir:        {}",
            self.store_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:    {}", self.output_format)?;
        writeln!(f, "Keyword locale:   {}", self.keyword_locale)?;
        writeln!(
            f,
            "Keywords file:    {}",
            self.keywords_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string())
        )?;
        writeln!(f, "Overconsumption:  {} L/100km", self.overconsumption_threshold)?;
        writeln!(f, "History limit:    {}", self.history_limit)?;
        writeln!(f)?;
        writeln!(f, "Maintenance policy")?;
        writeln!(
            f,
            "  Service:        every {} km or {} months (warn {} km before)",
            self.policy.service_interval_km,
            self.policy.service_interval_months,
            self.policy.service_warning_km
        )?;
        writeln!(
            f,
            "  Timing belt:    {} km or {} years",
            self.policy.drive_belt_km, self.policy.drive_belt_years
        )?;
        writeln!(
            f,
            "  Inspection:     first after {} years, then every {} years",
            self.policy.first_inspection_years, self.policy.inspection_interval_years
        )?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:      {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logbook_domain::service::{MaintenanceKind, RecordClassifier};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.overconsumption_threshold, 8.5);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = Config::default();
        config.keyword_locale = "fr".to_string();
        config.policy.service_interval_km = 15_000;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "history_limit": 10, "policy": { "drive_belt_km": 120000 } }"#)
            .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.keyword_locale, "all");
        assert_eq!(config.policy.drive_belt_km, 120_000);
        assert_eq!(config.policy.service_interval_km, 20_000);
    }

    #[test]
    fn test_unknown_locale() {
        let config = Config {
            keyword_locale: "de".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.keyword_sets(),
            Err(Error::Config(ConfigError::UnknownLocale(_)))
        ));
    }

    #[test]
    fn test_keywords_file_extends_locale() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keywords.toml");
        std::fs::write(
            &path,
            "[service]\nphrases = [\"tagliando\"]\n\n[technical_inspection]\nabbreviations = [\"tüv\"]\n",
        )
        .unwrap();

        let config = Config {
            keyword_locale: "fr".to_string(),
            keywords_file: Some(path),
            ..Config::default()
        };
        let classifier = config.classifier().unwrap();
        assert!(classifier
            .classify_title("Tagliando 30000")
            .contains(&MaintenanceKind::Service));
        assert!(classifier
            .classify_title("TÜV Prüfung")
            .contains(&MaintenanceKind::TechnicalInspection));
        assert!(classifier
            .classify_title("Vidange")
            .contains(&MaintenanceKind::Service));
    }

    #[test]
    fn test_missing_keywords_file() {
        let config = Config {
            keywords_file: Some(PathBuf::from("/nonexistent/keywords.toml")),
            ..Config::default()
        };
        assert!(matches!(config.keyword_sets(), Err(Error::FileNotFound(_))));
    }
}
