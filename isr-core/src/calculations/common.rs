//! Common helpers shared by the ISR calculations.
//!
//! The calculations themselves keep full `Decimal` precision; rounding to
//! cents is left to whoever presents the numbers.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Months in a fiscal year; monthly tables are scaled by this factor.
pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Days in a month for daily-salary purposes (a fixed convention, not the calendar).
pub const DAYS_PER_MONTH: Decimal = dec!(30);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use isr_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(3651.28416)), dec!(3651.28));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
///
/// Used as the `max(0, x)` floor wherever a formula could go negative.
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use isr_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-250.00), Decimal::ZERO), Decimal::ZERO);
/// assert_eq!(max(dec!(200.00), dec!(100.00)), dec!(200.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the smaller of two decimal values.
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}
