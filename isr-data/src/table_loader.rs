//! TOML loader for complete fiscal-year parameter tables.
//!
//! ## File Format
//!
//! One file per fiscal year, named `isr_<year>.toml`. Amounts may be written
//! as TOML strings (exact) or numbers.
//!
//! ```toml
//! fiscal_year = 2024
//!
//! [constants]
//! uma_daily = "108.57"
//! uma_annual = "39606.36"
//! bonus_exemption_units = 30
//! vacation_premium_exemption_units = 15
//! general_deduction_cap_units = "5"
//! ppr_deduction_cap_units = "5"
//! optical_lenses_cap = "2500"
//! # optional, defaults to 5 and 0.15
//! aggregate_cap_uma_units = "5"
//! aggregate_cap_income_share = "0.15"
//!
//! [tuition_caps]
//! preschool = "14200"
//! elementary = "12900"
//!
//! [[brackets]]
//! lower_bound = "0.01"
//! upper_bound = "746.04"
//! fixed_quota = "0"
//! marginal_rate = "0.0192"
//!
//! [[brackets]]
//! lower_bound = "375975.61"   # no upper_bound: unlimited
//! fixed_quota = "117020.50"
//! marginal_rate = "0.35"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use isr_core::models::{
    Bracket, DEFAULT_AGGREGATE_CAP_INCOME_SHARE, DEFAULT_AGGREGATE_CAP_UMA_UNITS,
    MonthlySchedule, ScheduleError, TaxYearTable, TuitionCaps,
};
use isr_core::registry::TaxTableRegistry;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading fiscal-year tables.
#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid bracket schedule for {fiscal_year}: {source}")]
    Schedule {
        fiscal_year: i32,
        source: ScheduleError,
    },

    #[error("{field} for {fiscal_year} must be positive, got {value}")]
    InvalidConstant {
        fiscal_year: i32,
        field: &'static str,
        value: Decimal,
    },

    #[error("{path} is named for {expected} but declares fiscal year {found}")]
    YearMismatch {
        path: PathBuf,
        expected: i32,
        found: i32,
    },

    #[error("no isr_<year>.toml tables found in {0}")]
    EmptyDirectory(PathBuf),
}

#[derive(Debug, Deserialize)]
struct TableDocument {
    fiscal_year: i32,
    constants: Constants,
    #[serde(default)]
    tuition_caps: TuitionCaps,
    brackets: Vec<Bracket>,
}

#[derive(Debug, Deserialize)]
struct Constants {
    uma_daily: Decimal,
    uma_annual: Decimal,
    bonus_exemption_units: u32,
    vacation_premium_exemption_units: u32,
    general_deduction_cap_units: Decimal,
    ppr_deduction_cap_units: Decimal,
    optical_lenses_cap: Decimal,
    aggregate_cap_uma_units: Option<Decimal>,
    aggregate_cap_income_share: Option<Decimal>,
}

/// Loader for fiscal-year tables stored as TOML.
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse one table from TOML text.
    ///
    /// # Errors
    ///
    /// * [`TableLoadError::Toml`] when the document is malformed or a field is missing.
    /// * [`TableLoadError::Schedule`] when the brackets are not a valid schedule.
    /// * [`TableLoadError::InvalidConstant`] when a UMA value is not positive.
    pub fn parse(input: &str) -> Result<TaxYearTable, TableLoadError> {
        let document: TableDocument = toml::from_str(input)?;
        let fiscal_year = document.fiscal_year;
        let constants = document.constants;

        for (field, value) in [
            ("uma_daily", constants.uma_daily),
            ("uma_annual", constants.uma_annual),
        ] {
            if value <= Decimal::ZERO {
                return Err(TableLoadError::InvalidConstant {
                    fiscal_year,
                    field,
                    value,
                });
            }
        }

        let monthly_brackets = MonthlySchedule::new(document.brackets)
            .map_err(|source| TableLoadError::Schedule { fiscal_year, source })?;

        Ok(TaxYearTable {
            fiscal_year,
            uma_daily: constants.uma_daily,
            uma_annual: constants.uma_annual,
            bonus_exemption_units: constants.bonus_exemption_units,
            vacation_premium_exemption_units: constants.vacation_premium_exemption_units,
            general_deduction_cap_units: constants.general_deduction_cap_units,
            ppr_deduction_cap_units: constants.ppr_deduction_cap_units,
            optical_lenses_cap: constants.optical_lenses_cap,
            aggregate_cap_uma_units: constants
                .aggregate_cap_uma_units
                .unwrap_or(DEFAULT_AGGREGATE_CAP_UMA_UNITS),
            aggregate_cap_income_share: constants
                .aggregate_cap_income_share
                .unwrap_or(DEFAULT_AGGREGATE_CAP_INCOME_SHARE),
            tuition_caps: document.tuition_caps,
            monthly_brackets,
        })
    }

    /// Read and parse a single table file.
    pub fn load_file(path: &Path) -> Result<TaxYearTable, TableLoadError> {
        let contents = fs::read_to_string(path).map_err(|source| TableLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Build a registry from every `isr_<year>.toml` in `dir`.
    ///
    /// Other files are ignored. The year in each file name must match the
    /// `fiscal_year` it declares.
    pub fn load_dir(dir: &Path) -> Result<TaxTableRegistry, TableLoadError> {
        let io_error = |source| TableLoadError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if let Some(year) = table_file_year(&path) {
                files.push((year, path));
            }
        }
        files.sort();

        let mut tables = Vec::with_capacity(files.len());
        for (year, path) in files {
            let table = Self::load_file(&path)?;
            if table.fiscal_year != year {
                return Err(TableLoadError::YearMismatch {
                    path,
                    expected: year,
                    found: table.fiscal_year,
                });
            }
            debug!(fiscal_year = year, path = %path.display(), "loaded tax table");
            tables.push(table);
        }

        TaxTableRegistry::new(tables).map_err(|_| TableLoadError::EmptyDirectory(dir.to_path_buf()))
    }
}

/// `Some(year)` for file names shaped like `isr_2024.toml`.
fn table_file_year(path: &Path) -> Option<i32> {
    if path.extension()? != "toml" {
        return None;
    }
    path.file_stem()?
        .to_str()?
        .strip_prefix("isr_")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL_TOML: &str = r#"
fiscal_year = 2026

[constants]
uma_daily = "113.14"
uma_annual = "41273.52"
bonus_exemption_units = 30
vacation_premium_exemption_units = 15
general_deduction_cap_units = "5"
ppr_deduction_cap_units = "5"
optical_lenses_cap = "2500"

[tuition_caps]
preescolar = "14200"
primaria = "12900"

[[brackets]]
lower_bound = "0.01"
upper_bound = "1000.00"
fixed_quota = "0"
marginal_rate = "0.02"

[[brackets]]
lower_bound = "1000.01"
fixed_quota = "20.00"
marginal_rate = "0.10"
"#;

    #[test]
    fn parse_minimal_table() {
        let table = TaxTableLoader::parse(MINIMAL_TOML).expect("Failed to parse TOML");

        assert_eq!(table.fiscal_year, 2026);
        assert_eq!(table.uma_daily, dec!(113.14));
        assert_eq!(table.bonus_exemption(), dec!(3394.20));
        assert_eq!(table.tuition_caps.preschool, dec!(14200));
        assert_eq!(table.tuition_caps.high_school, dec!(0));
        assert_eq!(table.monthly_brackets.len(), 2);
        assert_eq!(table.monthly_brackets.brackets()[1].upper_bound, None);
    }

    #[test]
    fn parse_defaults_aggregate_cap_factors() {
        let table = TaxTableLoader::parse(MINIMAL_TOML).expect("Failed to parse TOML");

        assert_eq!(table.aggregate_cap_uma_units, dec!(5));
        assert_eq!(table.aggregate_cap_income_share, dec!(0.15));
    }

    #[test]
    fn parse_accepts_numeric_amounts() {
        let toml = MINIMAL_TOML.replace(r#"uma_daily = "113.14""#, "uma_daily = 113.14");

        let table = TaxTableLoader::parse(&toml).expect("Failed to parse TOML");

        assert_eq!(table.uma_daily, dec!(113.14));
    }

    #[test]
    fn parse_rejects_gap_between_brackets() {
        let toml = MINIMAL_TOML.replace(r#"lower_bound = "1000.01""#, r#"lower_bound = "1000.50""#);

        let err = TaxTableLoader::parse(&toml).unwrap_err();

        assert!(matches!(
            err,
            TableLoadError::Schedule {
                fiscal_year: 2026,
                source: ScheduleError::Discontiguous { index: 1, .. },
            }
        ));
    }

    #[test]
    fn parse_rejects_zero_uma() {
        let toml = MINIMAL_TOML.replace(r#"uma_annual = "41273.52""#, r#"uma_annual = "0""#);

        let err = TaxTableLoader::parse(&toml).unwrap_err();

        assert!(matches!(
            err,
            TableLoadError::InvalidConstant {
                field: "uma_annual",
                ..
            }
        ));
    }

    #[test]
    fn parse_rejects_missing_constants() {
        let err = TaxTableLoader::parse("fiscal_year = 2026\nbrackets = []").unwrap_err();

        assert!(matches!(err, TableLoadError::Toml(_)));
    }

    #[test]
    fn table_file_year_matches_only_table_names() {
        assert_eq!(table_file_year(Path::new("tables/isr_2024.toml")), Some(2024));
        assert_eq!(table_file_year(Path::new("tables/isr_2024.json")), None);
        assert_eq!(table_file_year(Path::new("tables/brackets.toml")), None);
        assert_eq!(table_file_year(Path::new("tables/isr_latest.toml")), None);
    }
}
