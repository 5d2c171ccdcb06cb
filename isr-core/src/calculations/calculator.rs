//! Annual ISR balance for salaried individuals.
//!
//! # Calculation Order
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Gross annual income: monthly gross × 12 plus gross bonus and vacation premium |
//! | 2    | Taxable bonus and vacation premium (gross minus UMA exemption, floor 0) |
//! | 3    | Total taxable income: monthly gross × 12 plus the taxable parts of step 2 |
//! | 4    | Authorized deductions (category ceilings, then aggregate ceiling) |
//! | 5    | Taxable base: step 3 minus step 4, floor 0 |
//! | 6    | Determined tax: progressive annual tax on step 5 |
//! | 7    | Withheld tax: progressive annual tax on gross income minus exemptions |
//! | 8    | Balance: withheld minus determined, split into in-favor / to-pay |
//!
//! Step 7 ignores personal deductions on purpose: an employer withholding
//! during the year does not know them.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use isr_core::calculations::TaxCalculator;
//! use isr_core::registry::TaxTableRegistry;
//! use isr_core::{BalanceStatus, TaxpayerInputs};
//!
//! let registry = TaxTableRegistry::builtin();
//! let calculator = TaxCalculator::new(registry.get_table(2024));
//!
//! let inputs = TaxpayerInputs {
//!     monthly_gross_income: dec!(12600.00),
//!     bonus_days: 15,
//!     vacation_days: 12,
//!     vacation_premium_rate: dec!(0.25),
//!     ..Default::default()
//! };
//!
//! let result = calculator.calculate_tax_balance(&inputs);
//!
//! assert_eq!(result.gross_annual_income, dec!(158760));
//! assert_eq!(result.total_taxable_income, dec!(154242.90));
//! assert_eq!(result.taxable_base, result.total_taxable_income);
//! assert_eq!(result.balance_status(), BalanceStatus::NoBalance);
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::annual_tax::annual_tax;
use crate::calculations::common::{MONTHS_PER_YEAR, max};
use crate::calculations::{deductions, exemptions};
use crate::models::{TaxCalculationResult, TaxYearTable, TaxpayerInputs};
use crate::registry::TaxTableRegistry;

/// Calculator bound to one fiscal year's parameters.
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    table: &'a TaxYearTable,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(table: &'a TaxYearTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a TaxYearTable {
        self.table
    }

    /// Runs the full calculation for one taxpayer.
    ///
    /// Never fails: inputs are assumed to be range-checked by the caller
    /// (see [`TaxpayerInputs::validate`]), and every intermediate that could
    /// go negative is floored at zero.
    pub fn calculate_tax_balance(
        &self,
        inputs: &TaxpayerInputs,
    ) -> TaxCalculationResult {
        let salary = inputs.monthly_gross_income * MONTHS_PER_YEAR;
        let bonus = exemptions::bonus(inputs, self.table);
        let premium = exemptions::vacation_premium(inputs, self.table);

        let total_gross_income = salary + bonus.gross + premium.gross;
        let total_taxable_income = salary + bonus.taxable + premium.taxable;
        let total_exemptions = bonus.exempt + premium.exempt;

        let deductions = deductions::authorized_deductions(inputs, self.table, total_gross_income);

        let taxable_base = self.taxable_base(total_taxable_income, deductions.total);
        let determined_tax = self.annual_tax(taxable_base);
        let withheld_tax = self.estimate_withheld_tax(total_gross_income - total_exemptions);

        let difference = withheld_tax - determined_tax;
        let balance_in_favor = max(difference, Decimal::ZERO);
        let balance_to_pay = max(-difference, Decimal::ZERO);

        debug!(
            fiscal_year = self.table.fiscal_year,
            %taxable_base,
            %determined_tax,
            %withheld_tax,
            "calculated annual balance"
        );

        TaxCalculationResult {
            gross_annual_income: total_gross_income,
            taxable_bonus: bonus.taxable,
            taxable_vacation_premium: premium.taxable,
            total_taxable_income,
            authorized_deductions: deductions.total,
            personal_deductions: deductions.personal,
            ppr_deductions: deductions.ppr,
            education_deductions: deductions.education,
            taxable_base,
            determined_tax,
            withheld_tax,
            balance_in_favor,
            balance_to_pay,
        }
    }

    /// Progressive annual tax using this year's schedule.
    pub fn annual_tax(
        &self,
        taxable_base: Decimal,
    ) -> Decimal {
        annual_tax(taxable_base, &self.table.monthly_brackets)
    }

    fn taxable_base(
        &self,
        total_taxable_income: Decimal,
        authorized_deductions: Decimal,
    ) -> Decimal {
        max(total_taxable_income - authorized_deductions, Decimal::ZERO)
    }

    /// Tax an employer would have withheld: same schedule, no personal deductions.
    fn estimate_withheld_tax(
        &self,
        income_without_deductions: Decimal,
    ) -> Decimal {
        self.annual_tax(income_without_deductions)
    }
}

/// Calculator front end that owns a [`TaxTableRegistry`] and picks the
/// table per request.
#[derive(Debug, Clone)]
pub struct TaxEngine {
    registry: TaxTableRegistry,
}

impl TaxEngine {
    pub fn new(registry: TaxTableRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TaxTableRegistry {
        &self.registry
    }

    /// Calculates the balance for `fiscal_year`, falling back to the latest
    /// registered year when that year has no table.
    pub fn calculate(
        &self,
        fiscal_year: i32,
        inputs: &TaxpayerInputs,
    ) -> TaxCalculationResult {
        let table = self.registry.get_table(fiscal_year);
        TaxCalculator::new(table).calculate_tax_balance(inputs)
    }
}

impl Default for TaxEngine {
    fn default() -> Self {
        Self::new(TaxTableRegistry::builtin())
    }
}
