//! Text and JSON renderings of a calculation.
//!
//! The text report rounds every amount half-up to cents; the JSON report
//! carries the unrounded values.

use std::fmt::Write;

use isr_core::calculations::common::round_half_up;
use isr_core::models::{BalanceStatus, TaxCalculationResult, TaxYearTable, TaxpayerProfile};
use rust_decimal::Decimal;
use serde::Serialize;

const RULE_WIDTH: usize = 60;
const LABEL_WIDTH: usize = 25;

/// Formats an amount as `$1,234.56` (rounded half-up to cents).
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((&digits, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{cents}")
}

/// One calculation ready to be rendered.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub taxpayer_name: &'a str,
    pub fiscal_year: i32,
    /// Year of the table actually used; differs from `fiscal_year` after a fallback.
    pub table_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_annual_income: Option<Decimal>,
    #[serde(flatten)]
    pub result: &'a TaxCalculationResult,
    pub balance: BalanceStatus,
}

impl<'a> Report<'a> {
    pub fn new(
        profile: &'a TaxpayerProfile,
        table_year: i32,
        result: &'a TaxCalculationResult,
    ) -> Self {
        Self {
            taxpayer_name: &profile.taxpayer_name,
            fiscal_year: profile.fiscal_year,
            table_year,
            net_annual_income: profile.net_annual_income(),
            result,
            balance: result.balance_status(),
        }
    }

    pub fn to_text(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let thin = "-".repeat(RULE_WIDTH);
        let result = self.result;
        let mut out = String::new();

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Calculation results");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Taxpayer: {}", self.taxpayer_name);
        if self.table_year == self.fiscal_year {
            let _ = writeln!(out, "Fiscal year: {}", self.fiscal_year);
        } else {
            let _ = writeln!(
                out,
                "Fiscal year: {} (using {} table)",
                self.fiscal_year, self.table_year
            );
        }
        let _ = writeln!(out, "{thin}");

        line(&mut out, "Gross annual income", result.gross_annual_income);
        if let Some(net) = self.net_annual_income {
            line(&mut out, "Net annual income", net);
        }
        line(&mut out, "Taxable bonus", result.taxable_bonus);
        line(&mut out, "Taxable vacation premium", result.taxable_vacation_premium);
        line(&mut out, "Total taxable income", result.total_taxable_income);
        line(&mut out, "Authorized deductions", result.authorized_deductions);
        line(&mut out, "Taxable base", result.taxable_base);
        line(&mut out, "Determined tax", result.determined_tax);
        line(&mut out, "Withheld tax", result.withheld_tax);
        let _ = writeln!(out, "{thin}");

        match self.balance {
            BalanceStatus::InFavor(amount) => line(&mut out, "Balance in favor", amount),
            BalanceStatus::ToPay(amount) => line(&mut out, "Balance to pay", amount),
            BalanceStatus::NoBalance => {
                let _ = writeln!(out, "No balance");
            }
        }
        let _ = writeln!(out, "{rule}");

        out
    }
}

fn line(
    out: &mut String,
    label: &str,
    amount: Decimal,
) {
    let _ = writeln!(out, "{label:<LABEL_WIDTH$} {}", format_currency(amount));
}

/// Human-readable dump of a fiscal-year table.
pub fn table_to_text(
    table: &TaxYearTable,
    requested_year: i32,
) -> String {
    let mut out = String::new();

    if table.fiscal_year == requested_year {
        let _ = writeln!(out, "ISR table for fiscal year {}", table.fiscal_year);
    } else {
        let _ = writeln!(
            out,
            "No table for fiscal year {requested_year}; showing {}",
            table.fiscal_year
        );
    }
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    line(&mut out, "UMA daily", table.uma_daily);
    line(&mut out, "UMA annual", table.uma_annual);
    line(&mut out, "Bonus exemption", table.bonus_exemption());
    line(&mut out, "Vacation premium exemption", table.vacation_premium_exemption());
    line(&mut out, "General deduction cap", table.general_deduction_cap());
    line(&mut out, "PPR deduction cap", table.ppr_deduction_cap());
    line(&mut out, "Optical lenses cap", table.optical_lenses_cap);

    let _ = writeln!(out, "\nTuition caps");
    for (level, cap) in table.tuition_caps.iter() {
        line(&mut out, level.as_str(), cap);
    }

    let _ = writeln!(out, "\nMonthly brackets");
    let _ = writeln!(
        out,
        "{:>14} {:>14} {:>14} {:>8}",
        "lower", "upper", "fixed quota", "rate"
    );
    for bracket in table.monthly_brackets.brackets() {
        let upper = bracket
            .upper_bound
            .map(|upper| format!("{upper:.2}"))
            .unwrap_or_else(|| "unlimited".to_string());
        let _ = writeln!(
            out,
            "{:>14.2} {:>14} {:>14.2} {:>7.2}%",
            bracket.lower_bound,
            upper,
            bracket.fixed_quota,
            bracket.marginal_rate * Decimal::ONE_HUNDRED
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use isr_core::models::{EducationLevel, GeneralDeductions, TaxpayerInputs, TuitionPayments};
    use isr_core::{TaxEngine, registry::builtin};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn profile(net: Option<Decimal>) -> TaxpayerProfile {
        TaxpayerProfile {
            taxpayer_name: "Ana Torres".to_string(),
            fiscal_year: 2024,
            monthly_net_income: net,
            inputs: TaxpayerInputs {
                monthly_gross_income: dec!(12600.00),
                bonus_days: 15,
                vacation_days: 12,
                vacation_premium_rate: dec!(0.25),
                general_deductions: GeneralDeductions {
                    medical_dental: dec!(58000),
                    ..Default::default()
                },
                ppr_contributions: dec!(8000),
                tuition: TuitionPayments::default().with(EducationLevel::Elementary, dec!(5000)),
            },
        }
    }

    // =========================================================================
    // format_currency tests
    // =========================================================================

    #[test]
    fn format_currency_groups_thousands() {
        assert_eq!(format_currency(dec!(158760)), "$158,760.00");
        assert_eq!(format_currency(dec!(1925148.48)), "$1,925,148.48");
        assert_eq!(format_currency(dec!(999.999)), "$1,000.00");
    }

    #[test]
    fn format_currency_rounds_half_up() {
        assert_eq!(format_currency(dec!(10385.49984)), "$10,385.50");
        assert_eq!(format_currency(dec!(0.005)), "$0.01");
        assert_eq!(format_currency(dec!(0)), "$0.00");
    }

    #[test]
    fn format_currency_keeps_sign() {
        assert_eq!(format_currency(dec!(-1234.5)), "-$1,234.50");
    }

    // =========================================================================
    // Report tests
    // =========================================================================

    #[test]
    fn text_report_matches_console_summary() {
        let profile = profile(Some(dec!(10850.50)));
        let result = TaxEngine::default().calculate(2024, &profile.inputs);

        let text = Report::new(&profile, 2024, &result).to_text();

        let expected = "\
============================================================
Calculation results
============================================================
Taxpayer: Ana Torres
Fiscal year: 2024
------------------------------------------------------------
Gross annual income       $158,760.00
Net annual income         $130,206.00
Taxable bonus             $3,042.90
Taxable vacation premium  $0.00
Total taxable income      $154,242.90
Authorized deductions     $23,814.00
Taxable base              $130,428.90
Determined tax            $10,385.50
Withheld tax              $14,036.78
------------------------------------------------------------
Balance in favor          $3,651.28
============================================================
";
        assert_eq!(text, expected);
    }

    #[test]
    fn text_report_omits_unknown_net_income() {
        let profile = profile(None);
        let result = TaxEngine::default().calculate(2024, &profile.inputs);

        let text = Report::new(&profile, 2024, &result).to_text();

        assert!(!text.contains("Net annual income"));
    }

    #[test]
    fn text_report_notes_table_fallback() {
        let mut profile = profile(None);
        profile.fiscal_year = 2031;
        let result = TaxEngine::default().calculate(2031, &profile.inputs);

        let text = Report::new(&profile, 2025, &result).to_text();

        assert!(text.contains("Fiscal year: 2031 (using 2025 table)"));
    }

    #[test]
    fn text_report_without_balance() {
        let mut profile = profile(None);
        profile.inputs.general_deductions = GeneralDeductions::default();
        profile.inputs.ppr_contributions = dec!(0);
        profile.inputs.tuition = TuitionPayments::default();
        let result = TaxEngine::default().calculate(2024, &profile.inputs);

        let text = Report::new(&profile, 2024, &result).to_text();

        assert!(text.contains("\nNo balance\n"));
        assert!(!text.contains("Balance in favor"));
        assert!(!text.contains("Balance to pay"));
    }

    #[test]
    fn json_report_is_unrounded_and_flat() {
        let profile = profile(None);
        let result = TaxEngine::default().calculate(2024, &profile.inputs);

        let json = serde_json::to_value(Report::new(&profile, 2024, &result)).unwrap();

        assert_eq!(json["taxpayer_name"], "Ana Torres");
        assert_eq!(json["table_year"], 2024);
        assert_eq!(json["determined_tax"], "10385.49984");
        assert_eq!(json["balance"]["status"], "in_favor");
        assert!(json.get("net_annual_income").is_none());
    }

    #[test]
    fn table_text_lists_every_bracket() {
        let table = builtin::table_2024();

        let text = table_to_text(&table, 2024);

        assert!(text.starts_with("ISR table for fiscal year 2024\n"));
        assert!(text.contains("unlimited"));
        assert!(text.contains("10.88%"));
        assert_eq!(text.matches('%').count(), table.monthly_brackets.len());
    }

    #[test]
    fn table_text_notes_fallback() {
        let table = builtin::table_2025();

        let text = table_to_text(&table, 2019);

        assert!(text.starts_with("No table for fiscal year 2019; showing 2025\n"));
    }
}
