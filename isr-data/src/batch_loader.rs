//! CSV loader for a batch of taxpayers.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Optional
//! columns may be left out entirely or left empty; either way they count as
//! zero.
//!
//! | Column | Required | Type |
//! |--------|----------|------|
//! | `taxpayer_name` | yes | string |
//! | `fiscal_year` | yes | integer |
//! | `monthly_gross_income` | yes | decimal |
//! | `monthly_net_income` | no | decimal, empty for unknown |
//! | `bonus_days` | no | integer |
//! | `vacation_days` | no | integer |
//! | `vacation_premium_rate` | no | decimal, e.g. `0.25` |
//! | `medical_dental` .. `educational_services` | no | decimal, one column per general deduction category |
//! | `ppr_contributions` | no | decimal |
//! | `preschool_tuition` .. `high_school_tuition` | no | decimal, one column per level |
//!
//! ### Minimal example
//!
//! ```csv
//! taxpayer_name,fiscal_year,monthly_gross_income
//! Ana,2024,12600.00
//! ```

use std::path::Path;

use isr_core::models::{
    GeneralDeductions, InputError, TaxpayerInputs, TaxpayerProfile, TuitionPayments,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    taxpayer_name: String,
    fiscal_year: i32,
    monthly_gross_income: Decimal,
    monthly_net_income: Option<Decimal>,
    bonus_days: Option<i32>,
    vacation_days: Option<i32>,
    vacation_premium_rate: Option<Decimal>,
    medical_dental: Option<Decimal>,
    optical_lenses: Option<Decimal>,
    medical_insurance_premiums: Option<Decimal>,
    funeral: Option<Decimal>,
    donations: Option<Decimal>,
    mortgage_real_interest: Option<Decimal>,
    voluntary_retirement_contributions: Option<Decimal>,
    school_transportation: Option<Decimal>,
    special_savings_deposits: Option<Decimal>,
    educational_services: Option<Decimal>,
    ppr_contributions: Option<Decimal>,
    preschool_tuition: Option<Decimal>,
    elementary_tuition: Option<Decimal>,
    middle_school_tuition: Option<Decimal>,
    technical_school_tuition: Option<Decimal>,
    high_school_tuition: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading a batch file.
#[derive(Debug, Error)]
pub enum BatchLoadError {
    #[error("failed to read batch file: {0}")]
    Io(#[from] std::io::Error),

    /// The row could not be deserialised (missing required column, type
    /// mismatch, wrong column count). `row` is 1-based, header excluded.
    #[error("CSV parse error on row {row}: {source}")]
    Parse { row: usize, source: csv::Error },

    #[error("invalid values on row {row}: {source}")]
    Invalid { row: usize, source: InputError },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(row: CsvRow) -> TaxpayerProfile {
    let amount = Option::unwrap_or_default;

    TaxpayerProfile {
        taxpayer_name: row.taxpayer_name,
        fiscal_year: row.fiscal_year,
        monthly_net_income: row.monthly_net_income,
        inputs: TaxpayerInputs {
            monthly_gross_income: row.monthly_gross_income,
            bonus_days: row.bonus_days.unwrap_or_default(),
            vacation_days: row.vacation_days.unwrap_or_default(),
            vacation_premium_rate: amount(row.vacation_premium_rate),
            general_deductions: GeneralDeductions {
                medical_dental: amount(row.medical_dental),
                optical_lenses: amount(row.optical_lenses),
                medical_insurance_premiums: amount(row.medical_insurance_premiums),
                funeral: amount(row.funeral),
                donations: amount(row.donations),
                mortgage_real_interest: amount(row.mortgage_real_interest),
                voluntary_retirement_contributions: amount(row.voluntary_retirement_contributions),
                school_transportation: amount(row.school_transportation),
                special_savings_deposits: amount(row.special_savings_deposits),
                educational_services: amount(row.educational_services),
            },
            ppr_contributions: amount(row.ppr_contributions),
            tuition: TuitionPayments {
                preschool: amount(row.preschool_tuition),
                elementary: amount(row.elementary_tuition),
                middle_school: amount(row.middle_school_tuition),
                technical_school: amount(row.technical_school_tuition),
                high_school: amount(row.high_school_tuition),
            },
        },
    }
}

/// Parse CSV text and return one validated profile per row, in file order.
///
/// # Errors
///
/// * [`BatchLoadError::Parse`] if a row is structurally invalid.
/// * [`BatchLoadError::Invalid`] if a row has a negative amount or an
///   out-of-range premium rate.
pub fn load_from_str(input: &str) -> Result<Vec<TaxpayerProfile>, BatchLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = idx + 1;
            let profile = convert_row(result.map_err(|source| BatchLoadError::Parse { row, source })?);
            profile
                .inputs
                .validate()
                .map_err(|source| BatchLoadError::Invalid { row, source })?;
            Ok(profile)
        })
        .collect()
}

/// Convenience wrapper: read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<TaxpayerProfile>, BatchLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL_CSV: &str = "\
taxpayer_name,fiscal_year,monthly_gross_income
Ana,2024,12600.00
";

    const MIXED_CSV: &str = "\
monthly_gross_income,taxpayer_name,fiscal_year,bonus_days,vacation_days,vacation_premium_rate,medical_dental,ppr_contributions,elementary_tuition,monthly_net_income
12600.00,Ana,2024,15,12,0.25,58000,8000,5000,
45000.00,Luis,2025,30,20,0.50,,,,38000.00
";

    #[test]
    fn minimal_row_defaults_to_zero() {
        let profiles = load_from_str(MINIMAL_CSV).expect("valid batch");

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].taxpayer_name, "Ana");
        assert_eq!(profiles[0].monthly_net_income, None);
        assert_eq!(
            profiles[0].inputs,
            TaxpayerInputs {
                monthly_gross_income: dec!(12600.00),
                ..Default::default()
            }
        );
    }

    #[test]
    fn columns_match_by_name_in_any_order() {
        let profiles = load_from_str(MIXED_CSV).expect("valid batch");

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].inputs.general_deductions.medical_dental, dec!(58000));
        assert_eq!(profiles[0].inputs.tuition.elementary, dec!(5000));
        assert_eq!(profiles[0].monthly_net_income, None);
        assert_eq!(profiles[1].fiscal_year, 2025);
        assert_eq!(profiles[1].inputs.vacation_premium_rate, dec!(0.50));
        assert_eq!(profiles[1].inputs.ppr_contributions, dec!(0));
        assert_eq!(profiles[1].monthly_net_income, Some(dec!(38000.00)));
    }

    #[test]
    fn whitespace_around_values_is_tolerated() {
        let csv = "taxpayer_name , fiscal_year , monthly_gross_income\n  Ana , 2024 , 12600.00 \n";

        let profiles = load_from_str(csv).expect("valid batch");

        assert_eq!(profiles[0].taxpayer_name, "Ana");
        assert_eq!(profiles[0].inputs.monthly_gross_income, dec!(12600.00));
    }

    #[test]
    fn missing_required_column_is_a_parse_error() {
        let csv = "taxpayer_name,fiscal_year\nAna,2024\n";

        let err = load_from_str(csv).unwrap_err();

        assert!(matches!(err, BatchLoadError::Parse { row: 1, .. }));
    }

    #[test]
    fn invalid_row_reports_one_based_row_number() {
        let csv = "\
taxpayer_name,fiscal_year,monthly_gross_income,donations
Ana,2024,12600.00,100
Luis,2024,9000.00,-50
";

        let err = load_from_str(csv).unwrap_err();

        match err {
            BatchLoadError::Invalid { row, source } => {
                assert_eq!(row, 2);
                assert_eq!(
                    source,
                    InputError::Negative {
                        field: "donations",
                        value: dec!(-50),
                    }
                );
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn header_only_file_yields_no_profiles() {
        let profiles =
            load_from_str("taxpayer_name,fiscal_year,monthly_gross_income\n").expect("valid batch");

        assert!(profiles.is_empty());
    }
}
