use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{MonthlySchedule, TuitionCaps};

/// Annual UMA multiples that bound all personal deductions together.
pub const DEFAULT_AGGREGATE_CAP_UMA_UNITS: Decimal = dec!(5);

/// Share of total gross income that bounds all personal deductions together.
pub const DEFAULT_AGGREGATE_CAP_INCOME_SHARE: Decimal = dec!(0.15);

fn default_aggregate_cap_uma_units() -> Decimal {
    DEFAULT_AGGREGATE_CAP_UMA_UNITS
}

fn default_aggregate_cap_income_share() -> Decimal {
    DEFAULT_AGGREGATE_CAP_INCOME_SHARE
}

/// Fiscal parameters for one year: UMA values, exemptions, deduction caps
/// and the monthly ISR schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearTable {
    pub fiscal_year: i32,
    pub uma_daily: Decimal,
    /// Published independently; not necessarily `uma_daily * 365`.
    pub uma_annual: Decimal,
    pub bonus_exemption_units: u32,
    pub vacation_premium_exemption_units: u32,
    pub general_deduction_cap_units: Decimal,
    pub ppr_deduction_cap_units: Decimal,
    /// Published ceiling for optical lenses. Reference data only; general
    /// deductions are limited as a whole by the general ceiling.
    pub optical_lenses_cap: Decimal,
    #[serde(default = "default_aggregate_cap_uma_units")]
    pub aggregate_cap_uma_units: Decimal,
    #[serde(default = "default_aggregate_cap_income_share")]
    pub aggregate_cap_income_share: Decimal,
    pub tuition_caps: TuitionCaps,
    pub monthly_brackets: MonthlySchedule,
}

impl TaxYearTable {
    pub fn bonus_exemption(&self) -> Decimal {
        self.uma_daily * Decimal::from(self.bonus_exemption_units)
    }

    pub fn vacation_premium_exemption(&self) -> Decimal {
        self.uma_daily * Decimal::from(self.vacation_premium_exemption_units)
    }

    pub fn general_deduction_cap(&self) -> Decimal {
        self.uma_annual * self.general_deduction_cap_units
    }

    pub fn ppr_deduction_cap(&self) -> Decimal {
        self.uma_annual * self.ppr_deduction_cap_units
    }

    /// The lesser of the UMA-based ceiling and the income-share ceiling.
    pub fn aggregate_deduction_cap(
        &self,
        total_gross_income: Decimal,
    ) -> Decimal {
        let uma_cap = self.uma_annual * self.aggregate_cap_uma_units;
        let income_cap = total_gross_income * self.aggregate_cap_income_share;
        uma_cap.min(income_cap)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::registry::builtin;

    #[test]
    fn exemptions_multiply_daily_uma() {
        let table = builtin::table_2024();

        assert_eq!(table.bonus_exemption(), dec!(3257.10));
        assert_eq!(table.vacation_premium_exemption(), dec!(1628.55));
    }

    #[test]
    fn caps_multiply_annual_uma() {
        let table = builtin::table_2024();

        assert_eq!(table.general_deduction_cap(), dec!(198031.80));
        assert_eq!(table.ppr_deduction_cap(), dec!(198031.80));
    }

    #[test]
    fn aggregate_cap_uses_income_share_for_moderate_incomes() {
        let table = builtin::table_2024();

        assert_eq!(table.aggregate_deduction_cap(dec!(158760)), dec!(23814.00));
    }

    #[test]
    fn aggregate_cap_uses_uma_ceiling_for_high_incomes() {
        let table = builtin::table_2024();

        assert_eq!(table.aggregate_deduction_cap(dec!(5000000)), dec!(198031.80));
    }

    #[test]
    fn aggregate_cap_honours_table_overrides() {
        let mut table = builtin::table_2024();
        table.aggregate_cap_income_share = dec!(0.10);

        assert_eq!(table.aggregate_deduction_cap(dec!(100000)), dec!(10000.00));
    }
}
