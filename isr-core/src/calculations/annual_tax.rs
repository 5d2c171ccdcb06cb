//! Progressive annual ISR from a monthly bracket schedule.
//!
//! The yearly base is spread over twelve months, taxed with the monthly
//! schedule and scaled back to a year:
//!
//! | Step | Formula |
//! |------|---------|
//! | 1    | `monthly_base = taxable_base / 12` |
//! | 2    | bracket whose range holds `monthly_base` |
//! | 3    | `surplus = monthly_base - lower_bound + 0.01` |
//! | 4    | `monthly_tax = fixed_quota + surplus * marginal_rate` |
//! | 5    | `annual_tax = monthly_tax * 12` |
//!
//! The `+ 0.01` in step 3 mirrors the one-cent gap between published
//! brackets and must not be dropped: it shifts the tax at every bracket edge.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::MONTHS_PER_YEAR;
use crate::models::{BRACKET_GAP, MonthlySchedule};

/// Annual tax for `taxable_base`.
///
/// Bases that fall below the first bracket (zero and negative bases
/// included) owe no tax. A monthly base inside the sub-cent gap between two
/// brackets (e.g. 746.045) is taxed in the lower bracket, where a scan over
/// closed `[lower, upper]` ranges would find no bracket and return zero.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use isr_core::calculations::annual_tax;
/// use isr_core::registry::builtin;
///
/// let table = builtin::table_2024();
///
/// // 12,600 a month falls in the 16% bracket: (893.64 + 1,472.00 * 0.16) * 12
/// assert_eq!(annual_tax(dec!(151200), &table.monthly_brackets), dec!(13549.92));
/// assert_eq!(annual_tax(dec!(0), &table.monthly_brackets), dec!(0));
/// ```
pub fn annual_tax(
    taxable_base: Decimal,
    schedule: &MonthlySchedule,
) -> Decimal {
    let monthly_base = taxable_base / MONTHS_PER_YEAR;

    let Some(bracket) = schedule.find(monthly_base) else {
        if monthly_base < Decimal::ZERO {
            debug!(%taxable_base, "negative taxable base, no tax due");
        }
        return Decimal::ZERO;
    };

    let surplus = monthly_base - bracket.lower_bound + BRACKET_GAP;
    let monthly_tax = bracket.fixed_quota + surplus * bracket.marginal_rate;

    monthly_tax * MONTHS_PER_YEAR
}
