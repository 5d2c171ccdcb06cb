use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{EducationLevel, TuitionPayments};
use crate::calculations::common::MONTHS_PER_YEAR;

/// Problems found by [`TaxpayerInputs::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    #[error("{field} must be non-negative, got {value}")]
    NegativeDays { field: &'static str, value: i32 },

    #[error("vacation premium rate must be between 0 and 1, got {0}")]
    VacationPremiumRateOutOfRange(Decimal),
}

/// General personal deductions, one field per expense category.
///
/// Deserializes from either the English field names or the SAT category keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralDeductions {
    #[serde(alias = "gastos_medicos_dentales")]
    pub medical_dental: Decimal,
    #[serde(alias = "lentes_opticos")]
    pub optical_lenses: Decimal,
    #[serde(alias = "primas_seguros_gastos_medicos")]
    pub medical_insurance_premiums: Decimal,
    #[serde(alias = "gastos_funerarios")]
    pub funeral: Decimal,
    #[serde(alias = "donativos")]
    pub donations: Decimal,
    #[serde(alias = "intereses_reales_creditos_hipotecarios")]
    pub mortgage_real_interest: Decimal,
    #[serde(alias = "aportaciones_voluntarias_subcuenta_retiro")]
    pub voluntary_retirement_contributions: Decimal,
    #[serde(alias = "gastos_transportacion_escolar")]
    pub school_transportation: Decimal,
    #[serde(alias = "depositos_cuentas_especiales_ahorro")]
    pub special_savings_deposits: Decimal,
    #[serde(alias = "pagos_servicios_educativos")]
    pub educational_services: Decimal,
}

impl GeneralDeductions {
    fn fields(&self) -> [(&'static str, Decimal); 10] {
        [
            ("medical_dental", self.medical_dental),
            ("optical_lenses", self.optical_lenses),
            ("medical_insurance_premiums", self.medical_insurance_premiums),
            ("funeral", self.funeral),
            ("donations", self.donations),
            ("mortgage_real_interest", self.mortgage_real_interest),
            (
                "voluntary_retirement_contributions",
                self.voluntary_retirement_contributions,
            ),
            ("school_transportation", self.school_transportation),
            ("special_savings_deposits", self.special_savings_deposits),
            ("educational_services", self.educational_services),
        ]
    }

    /// Sum of every category. The general ceiling is applied to this total.
    pub fn total(&self) -> Decimal {
        self.fields().iter().map(|(_, amount)| *amount).sum()
    }
}

/// Everything the engine needs to know about one taxpayer's year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerInputs {
    pub monthly_gross_income: Decimal,
    pub bonus_days: i32,
    pub vacation_days: i32,
    /// Fraction of vacation pay paid as premium, `0..=1`.
    pub vacation_premium_rate: Decimal,
    #[serde(default)]
    pub general_deductions: GeneralDeductions,
    #[serde(default)]
    pub ppr_contributions: Decimal,
    #[serde(default)]
    pub tuition: TuitionPayments,
}

impl TaxpayerInputs {
    /// Checks the ranges the engine assumes but never enforces.
    ///
    /// # Errors
    ///
    /// Returns the first [`InputError`] found: a negative amount or day
    /// count, or a vacation premium rate outside `0..=1`.
    pub fn validate(&self) -> Result<(), InputError> {
        non_negative("monthly_gross_income", self.monthly_gross_income)?;

        if self.bonus_days < 0 {
            return Err(InputError::NegativeDays {
                field: "bonus_days",
                value: self.bonus_days,
            });
        }
        if self.vacation_days < 0 {
            return Err(InputError::NegativeDays {
                field: "vacation_days",
                value: self.vacation_days,
            });
        }

        if self.vacation_premium_rate < Decimal::ZERO || self.vacation_premium_rate > Decimal::ONE {
            return Err(InputError::VacationPremiumRateOutOfRange(
                self.vacation_premium_rate,
            ));
        }

        for (field, amount) in self.general_deductions.fields() {
            non_negative(field, amount)?;
        }
        non_negative("ppr_contributions", self.ppr_contributions)?;

        for level in EducationLevel::ALL {
            non_negative(level.as_str(), self.tuition.get(level))?;
        }

        Ok(())
    }
}

fn non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), InputError> {
    if value < Decimal::ZERO {
        Err(InputError::Negative { field, value })
    } else {
        Ok(())
    }
}

/// Identifying data that travels with a set of inputs but does not affect
/// the computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerProfile {
    pub taxpayer_name: String,
    pub fiscal_year: i32,
    /// Take-home monthly pay, shown in reports when known.
    pub monthly_net_income: Option<Decimal>,
    pub inputs: TaxpayerInputs,
}

impl TaxpayerProfile {
    pub fn net_annual_income(&self) -> Option<Decimal> {
        self.monthly_net_income.map(|net| net * MONTHS_PER_YEAR)
    }
}
