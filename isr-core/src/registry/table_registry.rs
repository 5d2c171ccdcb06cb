use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, warn};

use super::builtin;
use crate::models::TaxYearTable;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("a tax table registry needs at least one fiscal year")]
    Empty,
}

/// Tax tables keyed by fiscal year.
///
/// Lookups never fail: a year that is not registered resolves to the most
/// recent registered year. Callers that need to know whether that happened
/// can compare [`TaxTableRegistry::resolve_year`] with the requested year.
///
/// Typical lifetime:
/// 1. Build with [`TaxTableRegistry::builtin`] or [`TaxTableRegistry::new`].
/// 2. Optionally [`register`](TaxTableRegistry::register) loaded tables.
/// 3. Hand it to a [`TaxEngine`](crate::calculations::TaxEngine) or call
///    [`get_table`](TaxTableRegistry::get_table) directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxTableRegistry {
    tables: BTreeMap<i32, TaxYearTable>,
    latest_year: i32,
}

impl TaxTableRegistry {
    /// Create a registry from a non-empty set of tables.
    ///
    /// Later tables replace earlier ones for the same fiscal year.
    ///
    /// # Errors
    /// * [`RegistryError::Empty`] when `tables` yields nothing.
    pub fn new(tables: impl IntoIterator<Item = TaxYearTable>) -> Result<Self, RegistryError> {
        let mut tables = tables.into_iter();
        let first = tables.next().ok_or(RegistryError::Empty)?;

        Ok(Self::seeded(first, tables))
    }

    /// The tables shipped with the crate (2024 and 2025).
    pub fn builtin() -> Self {
        let [first, rest @ ..] = builtin::all();
        Self::seeded(first, rest)
    }

    fn seeded(
        first: TaxYearTable,
        rest: impl IntoIterator<Item = TaxYearTable>,
    ) -> Self {
        let year = first.fiscal_year;
        let mut registry = Self {
            tables: BTreeMap::from([(year, first)]),
            latest_year: year,
        };
        for table in rest {
            registry.register(table);
        }
        registry
    }

    /// Add or replace the table for `table.fiscal_year`.
    pub fn register(
        &mut self,
        table: TaxYearTable,
    ) {
        debug!(fiscal_year = table.fiscal_year, "registering tax table");
        self.latest_year = self.latest_year.max(table.fiscal_year);
        self.tables.insert(table.fiscal_year, table);
    }

    /// Registered fiscal years in ascending order.
    pub fn years(&self) -> Vec<i32> {
        self.tables.keys().copied().collect()
    }

    pub fn contains(
        &self,
        year: i32,
    ) -> bool {
        self.tables.contains_key(&year)
    }

    pub fn latest_year(&self) -> i32 {
        self.latest_year
    }

    /// The fiscal year whose table [`get_table`](Self::get_table) returns.
    pub fn resolve_year(
        &self,
        year: i32,
    ) -> i32 {
        if self.contains(year) {
            year
        } else {
            self.latest_year()
        }
    }

    /// Parameters for `year`, or for the latest registered year when `year`
    /// is unknown (earlier or later than the registered range alike).
    pub fn get_table(
        &self,
        year: i32,
    ) -> &TaxYearTable {
        if let Some(table) = self.tables.get(&year) {
            return table;
        }

        warn!(
            requested = year,
            resolved = self.latest_year,
            "no tax table for fiscal year, using latest available"
        );
        // Entries are never removed, so the latest year is always present.
        &self.tables[&self.latest_year]
    }

    pub fn tables(&self) -> impl Iterator<Item = &TaxYearTable> {
        self.tables.values()
    }
}
