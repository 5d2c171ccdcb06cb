use std::collections::BTreeMap;
use std::io::Read;

use isr_core::models::{Bracket, MonthlySchedule, ScheduleError};
use isr_core::registry::TaxTableRegistry;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading bracket data.
#[derive(Debug, Error)]
pub enum BracketLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("invalid bracket schedule for {fiscal_year}: {source}")]
    Schedule {
        fiscal_year: i32,
        source: ScheduleError,
    },

    #[error("fiscal year {0} has no table to attach brackets to")]
    UnknownYear(i32),
}

impl From<csv::Error> for BracketLoadError {
    fn from(err: csv::Error) -> Self {
        BracketLoadError::CsvParse(err.to_string())
    }
}

/// A single record from the brackets CSV file.
///
/// - `fiscal_year`: The fiscal year (e.g., 2025)
/// - `lower_bound`: Monthly lower bound of the bracket
/// - `upper_bound`: Monthly upper bound (empty for unlimited)
/// - `fixed_quota`: Tax owed at the lower bound
/// - `marginal_rate`: Rate on the surplus as a decimal (e.g., 0.1088)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub fiscal_year: i32,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub fixed_quota: Decimal,
    pub marginal_rate: Decimal,
}

impl From<&BracketRecord> for Bracket {
    fn from(record: &BracketRecord) -> Self {
        Bracket {
            lower_bound: record.lower_bound,
            upper_bound: record.upper_bound,
            fixed_quota: record.fixed_quota,
            marginal_rate: record.marginal_rate,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for monthly bracket schedules from CSV files.
///
/// Rows may cover several fiscal years; within a year they must be in
/// ascending order.
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Build one validated schedule per fiscal year present in `records`.
    pub fn group_by_year(
        records: &[BracketRecord]
    ) -> Result<BTreeMap<i32, MonthlySchedule>, BracketLoadError> {
        let mut groups: BTreeMap<i32, Vec<Bracket>> = BTreeMap::new();
        for record in records {
            groups.entry(record.fiscal_year).or_default().push(record.into());
        }

        groups
            .into_iter()
            .map(|(fiscal_year, brackets)| {
                MonthlySchedule::new(brackets)
                    .map(|schedule| (fiscal_year, schedule))
                    .map_err(|source| BracketLoadError::Schedule { fiscal_year, source })
            })
            .collect()
    }

    /// Replace the schedule of every fiscal year present in `records`.
    ///
    /// Nothing is changed unless every year validates and is already
    /// registered. Returns the years that were updated.
    pub fn apply(
        registry: &mut TaxTableRegistry,
        records: &[BracketRecord],
    ) -> Result<Vec<i32>, BracketLoadError> {
        let schedules = Self::group_by_year(records)?;

        if let Some(&year) = schedules.keys().find(|year| !registry.contains(**year)) {
            return Err(BracketLoadError::UnknownYear(year));
        }

        let mut updated = Vec::with_capacity(schedules.len());
        for (fiscal_year, schedule) in schedules {
            let mut table = registry.get_table(fiscal_year).clone();
            table.monthly_brackets = schedule;
            registry.register(table);
            debug!(fiscal_year, "replaced monthly brackets");
            updated.push(fiscal_year);
        }

        Ok(updated)
    }
}
