//! Published ISR parameters shipped with the crate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    Bracket, DEFAULT_AGGREGATE_CAP_INCOME_SHARE, DEFAULT_AGGREGATE_CAP_UMA_UNITS,
    MonthlySchedule, TaxYearTable, TuitionCaps,
};

fn bracket(
    lower_bound: Decimal,
    upper_bound: Option<Decimal>,
    fixed_quota: Decimal,
    marginal_rate: Decimal,
) -> Bracket {
    Bracket {
        lower_bound,
        upper_bound,
        fixed_quota,
        marginal_rate,
    }
}

fn tuition_caps() -> TuitionCaps {
    TuitionCaps {
        preschool: dec!(14200.00),
        elementary: dec!(12900.00),
        middle_school: dec!(19900.00),
        technical_school: dec!(17100.00),
        high_school: dec!(24500.00),
    }
}

fn table(
    fiscal_year: i32,
    brackets: Vec<Bracket>,
) -> TaxYearTable {
    TaxYearTable {
        fiscal_year,
        uma_daily: dec!(108.57),
        uma_annual: dec!(39606.36),
        bonus_exemption_units: 30,
        vacation_premium_exemption_units: 15,
        general_deduction_cap_units: dec!(5),
        ppr_deduction_cap_units: dec!(5),
        optical_lenses_cap: dec!(2500.00),
        aggregate_cap_uma_units: DEFAULT_AGGREGATE_CAP_UMA_UNITS,
        aggregate_cap_income_share: DEFAULT_AGGREGATE_CAP_INCOME_SHARE,
        tuition_caps: tuition_caps(),
        monthly_brackets: MonthlySchedule::from_published(brackets),
    }
}

/// Fiscal year 2024.
pub fn table_2024() -> TaxYearTable {
    table(
        2024,
        vec![
            bracket(dec!(0.01), Some(dec!(746.04)), dec!(0.00), dec!(0.0192)),
            bracket(dec!(746.05), Some(dec!(6332.05)), dec!(14.32), dec!(0.0640)),
            bracket(dec!(6332.06), Some(dec!(11128.00)), dec!(371.83), dec!(0.1088)),
            bracket(dec!(11128.01), Some(dec!(12935.81)), dec!(893.64), dec!(0.1600)),
            bracket(dec!(12935.82), Some(dec!(15487.71)), dec!(1182.89), dec!(0.1792)),
            bracket(dec!(15487.72), Some(dec!(31236.49)), dec!(1640.18), dec!(0.2136)),
            bracket(dec!(31236.50), Some(dec!(49233.01)), dec!(4998.95), dec!(0.2352)),
            bracket(dec!(49233.02), Some(dec!(93993.90)), dec!(9235.19), dec!(0.2800)),
            bracket(dec!(93993.91), Some(dec!(125325.20)), dec!(21768.14), dec!(0.3200)),
            bracket(dec!(125325.21), Some(dec!(375975.60)), dec!(31794.26), dec!(0.3400)),
            bracket(dec!(375975.61), None, dec!(117020.50), dec!(0.3500)),
        ],
    )
}

/// Fiscal year 2025. UMA values and tuition caps repeat 2024 until the
/// official figures are published; the 3rd to 5th brackets differ.
pub fn table_2025() -> TaxYearTable {
    table(
        2025,
        vec![
            bracket(dec!(0.01), Some(dec!(746.04)), dec!(0.00), dec!(0.0192)),
            bracket(dec!(746.05), Some(dec!(6332.05)), dec!(14.32), dec!(0.0640)),
            bracket(dec!(6332.06), Some(dec!(11128.01)), dec!(371.83), dec!(0.1088)),
            bracket(dec!(11128.02), Some(dec!(12935.82)), dec!(893.63), dec!(0.1600)),
            bracket(dec!(12935.83), Some(dec!(15487.71)), dec!(1182.88), dec!(0.1792)),
            bracket(dec!(15487.72), Some(dec!(31236.49)), dec!(1640.18), dec!(0.2136)),
            bracket(dec!(31236.50), Some(dec!(49233.01)), dec!(4998.95), dec!(0.2352)),
            bracket(dec!(49233.02), Some(dec!(93993.90)), dec!(9235.19), dec!(0.2800)),
            bracket(dec!(93993.91), Some(dec!(125325.20)), dec!(21768.14), dec!(0.3200)),
            bracket(dec!(125325.21), Some(dec!(375975.60)), dec!(31794.26), dec!(0.3400)),
            bracket(dec!(375975.61), None, dec!(117020.50), dec!(0.3500)),
        ],
    )
}

pub fn all() -> [TaxYearTable; 2] {
    [table_2024(), table_2025()]
}
