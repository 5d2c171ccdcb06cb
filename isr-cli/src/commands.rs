//! Subcommand bodies. Each returns the text to print so it can be tested
//! without a terminal.

use anyhow::{Context, Result};
use isr_core::TaxEngine;
use isr_core::models::{TaxCalculationResult, TaxpayerProfile};
use isr_core::registry::TaxTableRegistry;
use tracing::info;

use crate::config::OutputFormat;
use crate::report::{Report, table_to_text};

fn calculate_one(
    engine: &TaxEngine,
    profile: &TaxpayerProfile,
) -> (i32, TaxCalculationResult) {
    info!(
        taxpayer = %profile.taxpayer_name,
        fiscal_year = profile.fiscal_year,
        "calculating annual balance"
    );
    let table_year = engine.registry().resolve_year(profile.fiscal_year);
    let result = engine.calculate(profile.fiscal_year, &profile.inputs);
    (table_year, result)
}

/// `isr calculate`: one profile, optionally re-dated to `year`.
pub fn calculate(
    engine: &TaxEngine,
    mut profile: TaxpayerProfile,
    year: Option<i32>,
    format: OutputFormat,
) -> Result<String> {
    if let Some(year) = year {
        profile.fiscal_year = year;
    }

    let (table_year, result) = calculate_one(engine, &profile);
    let report = Report::new(&profile, table_year, &result);

    match format {
        OutputFormat::Text => Ok(report.to_text()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&report).context("Failed to serialize report")
        }
    }
}

/// `isr batch`: every profile in file order.
pub fn batch(
    engine: &TaxEngine,
    profiles: &[TaxpayerProfile],
    format: OutputFormat,
) -> Result<String> {
    let results: Vec<_> = profiles
        .iter()
        .map(|profile| calculate_one(engine, profile))
        .collect();

    let reports: Vec<_> = profiles
        .iter()
        .zip(&results)
        .map(|(profile, (table_year, result))| Report::new(profile, *table_year, result))
        .collect();

    info!(count = reports.len(), "calculated batch");

    match format {
        OutputFormat::Text => Ok(reports
            .iter()
            .map(Report::to_text)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&reports).context("Failed to serialize reports")
        }
    }
}

/// `isr table`: the table a calculation for `year` would use.
pub fn table(
    registry: &TaxTableRegistry,
    year: i32,
    format: OutputFormat,
) -> Result<String> {
    let table = registry.get_table(year);

    match format {
        OutputFormat::Text => Ok(table_to_text(table, year)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(table).context("Failed to serialize table")
        }
    }
}
