//! Optional TOML configuration for the `isr` binary.
//!
//! Every key is optional:
//!
//! ```toml
//! tables_dir = "tables"          # load isr_<year>.toml files instead of the built-in tables
//! brackets_file = "brackets.csv" # replace monthly schedules after the tables are loaded
//! default_year = 2024            # used when --year is omitted
//! log_level = "info"             # EnvFilter directive
//! format = "text"                # or "json"
//! ```
//!
//! Command-line flags override these values, which override the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::ValueEnum;
use isr_core::registry::TaxTableRegistry;
use isr_data::{BracketLoader, TaxTableLoader};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub tables_dir: Option<PathBuf>,
    pub brackets_file: Option<PathBuf>,
    pub default_year: Option<i32>,
    pub log_level: String,
    pub format: OutputFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tables_dir: None,
            brackets_file: None,
            default_year: None,
            log_level: "info".to_string(),
            format: OutputFormat::Text,
        }
    }
}

impl AppConfig {
    pub fn from_toml(input: &str) -> Result<Self> {
        toml::from_str(input).context("Invalid configuration")
    }

    /// Reads `path`, or returns the defaults when no path is given.
    ///
    /// Relative paths inside the file are resolved against the file's directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.tables_dir = config.tables_dir.map(|dir| base.join(dir));
            config.brackets_file = config.brackets_file.map(|file| base.join(file));
        }

        Ok(config)
    }

    /// Fiscal year to use: the explicit one, then `default_year`, then the
    /// previous calendar year (the year whose return is normally filed).
    pub fn resolve_year(
        &self,
        explicit: Option<i32>,
    ) -> i32 {
        explicit
            .or(self.default_year)
            .unwrap_or_else(|| Local::now().year() - 1)
    }

    /// Builds the table registry described by this configuration.
    pub fn build_registry(&self) -> Result<TaxTableRegistry> {
        let mut registry = match &self.tables_dir {
            Some(dir) => TaxTableLoader::load_dir(dir)
                .with_context(|| format!("Failed to load tables from: {}", dir.display()))?,
            None => TaxTableRegistry::builtin(),
        };

        if let Some(path) = &self.brackets_file {
            let file = fs::File::open(path)
                .with_context(|| format!("Failed to open: {}", path.display()))?;
            let records = BracketLoader::parse(file)
                .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
            let updated = BracketLoader::apply(&mut registry, &records)
                .with_context(|| format!("Failed to apply brackets from: {}", path.display()))?;
            info!(?updated, "replaced monthly brackets");
        }

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn parses_every_key() {
        let config = AppConfig::from_toml(
            r#"
tables_dir = "tables"
brackets_file = "brackets.csv"
default_year = 2024
log_level = "debug"
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(
            config,
            AppConfig {
                tables_dir: Some(PathBuf::from("tables")),
                brackets_file: Some(PathBuf::from("brackets.csv")),
                default_year: Some(2024),
                log_level: "debug".to_string(),
                format: OutputFormat::Json,
            }
        );
    }

    #[test]
    fn rejects_unknown_key() {
        assert!(AppConfig::from_toml("output = \"pdf\"").is_err());
    }

    #[test]
    fn explicit_year_wins() {
        let config = AppConfig {
            default_year: Some(2024),
            ..Default::default()
        };

        assert_eq!(config.resolve_year(Some(2025)), 2025);
        assert_eq!(config.resolve_year(None), 2024);
    }

    #[test]
    fn year_defaults_to_previous_calendar_year() {
        let expected = Local::now().year() - 1;

        assert_eq!(AppConfig::default().resolve_year(None), expected);
    }

    #[test]
    fn default_registry_is_builtin() {
        let registry = AppConfig::default().build_registry().unwrap();

        assert_eq!(registry, TaxTableRegistry::builtin());
    }
}
