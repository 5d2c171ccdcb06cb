use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of reconciling withheld tax against determined tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "amount", rename_all = "snake_case")]
pub enum BalanceStatus {
    /// Withholding exceeded the determined tax; the taxpayer gets a refund.
    InFavor(Decimal),
    /// Determined tax exceeded withholding; the taxpayer owes the difference.
    ToPay(Decimal),
    NoBalance,
}

/// Result of one annual balance calculation. All amounts are non-negative
/// and at most one of `balance_in_favor` / `balance_to_pay` is positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    // Income
    pub gross_annual_income: Decimal,
    pub taxable_bonus: Decimal,
    pub taxable_vacation_premium: Decimal,
    pub total_taxable_income: Decimal,

    // Deductions
    pub authorized_deductions: Decimal,
    pub personal_deductions: Decimal,
    pub ppr_deductions: Decimal,
    pub education_deductions: Decimal,

    // Tax
    pub taxable_base: Decimal,
    pub determined_tax: Decimal,
    pub withheld_tax: Decimal,

    // Balance
    pub balance_in_favor: Decimal,
    pub balance_to_pay: Decimal,
}

impl TaxCalculationResult {
    pub fn balance_status(&self) -> BalanceStatus {
        if self.balance_in_favor > Decimal::ZERO {
            BalanceStatus::InFavor(self.balance_in_favor)
        } else if self.balance_to_pay > Decimal::ZERO {
            BalanceStatus::ToPay(self.balance_to_pay)
        } else {
            BalanceStatus::NoBalance
        }
    }

    pub fn is_refund_due(&self) -> bool {
        matches!(self.balance_status(), BalanceStatus::InFavor(_))
    }

    /// Determined tax as a fraction of gross annual income (zero without income).
    pub fn effective_tax_rate(&self) -> Decimal {
        if self.gross_annual_income.is_zero() {
            Decimal::ZERO
        } else {
            self.determined_tax / self.gross_annual_income
        }
    }
}
