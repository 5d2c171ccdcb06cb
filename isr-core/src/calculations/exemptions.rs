//! Exempt and taxable portions of the year-end bonus (aguinaldo) and the
//! vacation premium.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{DAYS_PER_MONTH, max};
use crate::models::{TaxYearTable, TaxpayerInputs};

/// A gross benefit split by its UMA-based exemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemptionSplit {
    pub gross: Decimal,
    pub exempt: Decimal,
    pub taxable: Decimal,
}

impl ExemptionSplit {
    /// Splits `gross` given the exempt ceiling; the taxable part never goes below zero.
    pub fn new(
        gross: Decimal,
        exemption_ceiling: Decimal,
    ) -> Self {
        let taxable = max(gross - exemption_ceiling, Decimal::ZERO);
        Self {
            gross,
            exempt: gross - taxable,
            taxable,
        }
    }
}

/// Monthly salary over a fixed 30-day month.
pub fn daily_salary(monthly_gross_income: Decimal) -> Decimal {
    monthly_gross_income / DAYS_PER_MONTH
}

pub fn bonus(
    inputs: &TaxpayerInputs,
    table: &TaxYearTable,
) -> ExemptionSplit {
    let gross = daily_salary(inputs.monthly_gross_income) * Decimal::from(inputs.bonus_days);
    ExemptionSplit::new(gross, table.bonus_exemption())
}

pub fn vacation_premium(
    inputs: &TaxpayerInputs,
    table: &TaxYearTable,
) -> ExemptionSplit {
    let gross = daily_salary(inputs.monthly_gross_income)
        * Decimal::from(inputs.vacation_days)
        * inputs.vacation_premium_rate;
    ExemptionSplit::new(gross, table.vacation_premium_exemption())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::registry::builtin;

    fn inputs(
        monthly: Decimal,
        bonus_days: i32,
        vacation_days: i32,
        rate: Decimal,
    ) -> TaxpayerInputs {
        TaxpayerInputs {
            monthly_gross_income: monthly,
            bonus_days,
            vacation_days,
            vacation_premium_rate: rate,
            ..Default::default()
        }
    }

    #[test]
    fn daily_salary_uses_thirty_day_month() {
        assert_eq!(daily_salary(dec!(12600)), dec!(420));
    }

    #[test]
    fn bonus_above_exemption_is_partly_taxable() {
        let table = builtin::table_2024();

        let split = bonus(&inputs(dec!(12600), 15, 0, dec!(0)), &table);

        // 420 * 15 = 6,300 gross, 108.57 * 30 = 3,257.10 exempt
        assert_eq!(
            split,
            ExemptionSplit {
                gross: dec!(6300),
                exempt: dec!(3257.10),
                taxable: dec!(3042.90),
            }
        );
    }

    #[test]
    fn bonus_below_exemption_is_fully_exempt() {
        let table = builtin::table_2024();

        let split = bonus(&inputs(dec!(6000), 15, 0, dec!(0)), &table);

        assert_eq!(split.gross, dec!(3000));
        assert_eq!(split.exempt, dec!(3000));
        assert_eq!(split.taxable, dec!(0));
    }

    #[test]
    fn vacation_premium_applies_rate() {
        let table = builtin::table_2024();

        let split = vacation_premium(&inputs(dec!(12600), 0, 12, dec!(0.25)), &table);

        // 420 * 12 * 0.25 = 1,260, under the 1,628.55 exemption
        assert_eq!(split.gross, dec!(1260));
        assert_eq!(split.taxable, dec!(0));
    }

    #[test]
    fn vacation_premium_above_exemption_for_high_salary() {
        let table = builtin::table_2024();

        let split = vacation_premium(&inputs(dec!(90000), 0, 20, dec!(0.25)), &table);

        // 3,000 * 20 * 0.25 = 15,000 gross, 15,000 - 1,628.55 taxable
        assert_eq!(split.gross, dec!(15000));
        assert_eq!(split.exempt, dec!(1628.55));
        assert_eq!(split.taxable, dec!(13371.45));
    }

    #[test]
    fn zero_days_yield_nothing() {
        let table = builtin::table_2024();

        let split = bonus(&inputs(dec!(50000), 0, 0, dec!(0)), &table);

        assert_eq!(split, ExemptionSplit::new(dec!(0), dec!(3257.10)));
        assert_eq!(split.taxable, dec!(0));
    }
}
