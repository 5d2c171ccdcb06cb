//! JSON loader for a single taxpayer profile.
//!
//! Two document shapes are accepted:
//!
//! * the flat intake form, with one field per amount:
//!
//! ```json
//! {
//!   "taxpayer_name": "Ana",
//!   "fiscal_year": 2024,
//!   "monthly_gross_income": 12600,
//!   "monthly_net_income": 10850,
//!   "bonus_days": 15,
//!   "vacation_days": 12,
//!   "vacation_premium_percentage": 0.25,
//!   "medical_dental_expenses": 58000,
//!   "ppr_contributions": 8000,
//!   "elementary_tuition": 5000
//! }
//! ```
//!
//! * the SAT-style declaration, recognised by its `contribuyente` key, with
//!   `ingresos` and `deducciones_personales` sections and tuition given as a
//!   list of `{ "nivel_educativo", "monto_pagado" }` entries.
//!
//! Omitted amounts are zero. In the flat form the day counts and premium
//! rate default to the statutory minimums (15 bonus days, 12 vacation days,
//! 25% premium).

use std::path::Path;

use isr_core::models::{
    EducationLevel, GeneralDeductions, InputError, TaxpayerInputs, TaxpayerProfile,
    TuitionPayments,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while loading a profile.
#[derive(Debug, Error)]
pub enum ProfileLoadError {
    #[error("failed to read profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid profile for {taxpayer}: {source}")]
    Invalid {
        taxpayer: String,
        source: InputError,
    },
}

// ---------------------------------------------------------------------------
// Flat intake form
// ---------------------------------------------------------------------------

fn default_bonus_days() -> i32 {
    15
}

fn default_vacation_days() -> i32 {
    12
}

fn default_vacation_premium_rate() -> Decimal {
    dec!(0.25)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IntakeForm {
    taxpayer_name: String,
    fiscal_year: i32,
    monthly_gross_income: Decimal,
    #[serde(default)]
    monthly_net_income: Option<Decimal>,
    #[serde(default = "default_bonus_days")]
    bonus_days: i32,
    #[serde(default = "default_vacation_days")]
    vacation_days: i32,
    #[serde(default = "default_vacation_premium_rate", alias = "vacation_premium_rate")]
    vacation_premium_percentage: Decimal,

    #[serde(default)]
    medical_dental_expenses: Decimal,
    #[serde(default)]
    optical_lenses_expenses: Decimal,
    #[serde(default)]
    funeral_expenses: Decimal,
    #[serde(default)]
    donations: Decimal,
    #[serde(default)]
    mortgage_interest: Decimal,
    #[serde(default)]
    voluntary_retirement_contributions: Decimal,
    #[serde(default)]
    medical_insurance_premiums: Decimal,
    #[serde(default)]
    school_transportation_expenses: Decimal,
    #[serde(default)]
    special_savings_account_deposits: Decimal,
    #[serde(default)]
    educational_services_payments: Decimal,

    #[serde(default)]
    ppr_contributions: Decimal,

    #[serde(default)]
    preschool_tuition: Decimal,
    #[serde(default)]
    elementary_tuition: Decimal,
    #[serde(default)]
    middle_school_tuition: Decimal,
    #[serde(default)]
    technical_school_tuition: Decimal,
    #[serde(default)]
    high_school_tuition: Decimal,
}

impl From<IntakeForm> for TaxpayerProfile {
    fn from(form: IntakeForm) -> Self {
        let inputs = TaxpayerInputs {
            monthly_gross_income: form.monthly_gross_income,
            bonus_days: form.bonus_days,
            vacation_days: form.vacation_days,
            vacation_premium_rate: form.vacation_premium_percentage,
            general_deductions: GeneralDeductions {
                medical_dental: form.medical_dental_expenses,
                optical_lenses: form.optical_lenses_expenses,
                medical_insurance_premiums: form.medical_insurance_premiums,
                funeral: form.funeral_expenses,
                donations: form.donations,
                mortgage_real_interest: form.mortgage_interest,
                voluntary_retirement_contributions: form.voluntary_retirement_contributions,
                school_transportation: form.school_transportation_expenses,
                special_savings_deposits: form.special_savings_account_deposits,
                educational_services: form.educational_services_payments,
            },
            ppr_contributions: form.ppr_contributions,
            tuition: TuitionPayments {
                preschool: form.preschool_tuition,
                elementary: form.elementary_tuition,
                middle_school: form.middle_school_tuition,
                technical_school: form.technical_school_tuition,
                high_school: form.high_school_tuition,
            },
        };

        TaxpayerProfile {
            taxpayer_name: form.taxpayer_name,
            fiscal_year: form.fiscal_year,
            // The form posts 0 for a blank field.
            monthly_net_income: form.monthly_net_income.filter(|net| !net.is_zero()),
            inputs,
        }
    }
}

// ---------------------------------------------------------------------------
// SAT-style declaration
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Declaration {
    contribuyente: Taxpayer,
    ingresos: Income,
    #[serde(default)]
    deducciones_personales: PersonalDeductions,
}

#[derive(Debug, Deserialize)]
struct Taxpayer {
    nombre_o_referencia: String,
    ejercicio_fiscal: i32,
}

#[derive(Debug, Deserialize)]
struct Income {
    ingreso_bruto_mensual_ordinario: Decimal,
    ingreso_neto_mensual_ordinario: Option<Decimal>,
    #[serde(default)]
    dias_aguinaldo: i32,
    #[serde(default)]
    dias_vacaciones_anuales: i32,
    #[serde(default)]
    porcentaje_prima_vacacional: Decimal,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PersonalDeductions {
    general: GeneralDeductions,
    ppr: Ppr,
    colegiaturas: Vec<TuitionPayment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Ppr {
    aportaciones_ppr_art_151_frac_v: Decimal,
}

#[derive(Debug, Deserialize)]
struct TuitionPayment {
    nivel_educativo: EducationLevel,
    monto_pagado: Decimal,
}

impl From<Declaration> for TaxpayerProfile {
    fn from(declaration: Declaration) -> Self {
        let deductions = declaration.deducciones_personales;

        let mut tuition = TuitionPayments::default();
        for payment in deductions.colegiaturas {
            *tuition.get_mut(payment.nivel_educativo) += payment.monto_pagado;
        }

        TaxpayerProfile {
            taxpayer_name: declaration.contribuyente.nombre_o_referencia,
            fiscal_year: declaration.contribuyente.ejercicio_fiscal,
            monthly_net_income: declaration.ingresos.ingreso_neto_mensual_ordinario,
            inputs: TaxpayerInputs {
                monthly_gross_income: declaration.ingresos.ingreso_bruto_mensual_ordinario,
                bonus_days: declaration.ingresos.dias_aguinaldo,
                vacation_days: declaration.ingresos.dias_vacaciones_anuales,
                vacation_premium_rate: declaration.ingresos.porcentaje_prima_vacacional,
                general_deductions: deductions.general,
                ppr_contributions: deductions.ppr.aportaciones_ppr_art_151_frac_v,
                tuition,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Parse and validate a profile from JSON text.
///
/// # Errors
///
/// * [`ProfileLoadError::Json`] if the document matches neither shape.
/// * [`ProfileLoadError::Invalid`] if an amount is negative or the premium
///   rate is outside `0..=1`.
pub fn load_from_str(input: &str) -> Result<TaxpayerProfile, ProfileLoadError> {
    let document: Value = serde_json::from_str(input)?;

    let profile: TaxpayerProfile = if document.get("contribuyente").is_some() {
        serde_json::from_value::<Declaration>(document)?.into()
    } else {
        serde_json::from_value::<IntakeForm>(document)?.into()
    };

    profile
        .inputs
        .validate()
        .map_err(|source| ProfileLoadError::Invalid {
            taxpayer: profile.taxpayer_name.clone(),
            source,
        })?;

    Ok(profile)
}

/// Convenience wrapper: read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<TaxpayerProfile, ProfileLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const INTAKE_JSON: &str = r#"{
        "taxpayer_name": "Ana",
        "fiscal_year": 2024,
        "monthly_gross_income": 12600,
        "monthly_net_income": 10850.50,
        "medical_dental_expenses": 58000,
        "ppr_contributions": 8000,
        "elementary_tuition": 5000
    }"#;

    const DECLARATION_JSON: &str = r#"{
        "contribuyente": {"nombre_o_referencia": "Caso 1", "ejercicio_fiscal": 2025},
        "ingresos": {
            "ingreso_bruto_mensual_ordinario": 30000,
            "dias_aguinaldo": 30,
            "dias_vacaciones_anuales": 14,
            "porcentaje_prima_vacacional": 0.30
        },
        "deducciones_personales": {
            "general": {"gastos_medicos_dentales": 12000, "donativos": 1500},
            "ppr": {"aportaciones_ppr_art_151_frac_v": 20000},
            "colegiaturas": [
                {"nivel_educativo": "primaria", "monto_pagado": 9000},
                {"nivel_educativo": "primaria", "monto_pagado": 6000},
                {"nivel_educativo": "preparatoria", "monto_pagado": 18000}
            ]
        }
    }"#;

    // -----------------------------------------------------------------------
    // Flat intake form
    // -----------------------------------------------------------------------

    #[test]
    fn intake_form_maps_every_amount() {
        let profile = load_from_str(INTAKE_JSON).expect("valid profile");

        assert_eq!(profile.taxpayer_name, "Ana");
        assert_eq!(profile.fiscal_year, 2024);
        assert_eq!(profile.monthly_net_income, Some(dec!(10850.50)));
        assert_eq!(profile.inputs.monthly_gross_income, dec!(12600));
        assert_eq!(profile.inputs.general_deductions.medical_dental, dec!(58000));
        assert_eq!(profile.inputs.ppr_contributions, dec!(8000));
        assert_eq!(profile.inputs.tuition.elementary, dec!(5000));
    }

    #[test]
    fn intake_form_defaults_statutory_minimums() {
        let profile = load_from_str(INTAKE_JSON).expect("valid profile");

        assert_eq!(profile.inputs.bonus_days, 15);
        assert_eq!(profile.inputs.vacation_days, 12);
        assert_eq!(profile.inputs.vacation_premium_rate, dec!(0.25));
    }

    #[test]
    fn intake_form_treats_zero_net_income_as_missing() {
        let json = r#"{"taxpayer_name": "B", "fiscal_year": 2024, "monthly_gross_income": 9000, "monthly_net_income": 0}"#;

        let profile = load_from_str(json).expect("valid profile");

        assert_eq!(profile.monthly_net_income, None);
    }

    #[test]
    fn intake_form_rejects_unknown_field() {
        let json = r#"{"taxpayer_name": "B", "fiscal_year": 2024, "monthly_gross_income": 9000, "bonus": 15}"#;

        assert!(matches!(load_from_str(json), Err(ProfileLoadError::Json(_))));
    }

    #[test]
    fn intake_form_rejects_negative_amount() {
        let json = r#"{"taxpayer_name": "B", "fiscal_year": 2024, "monthly_gross_income": 9000, "donations": -1}"#;

        let err = load_from_str(json).unwrap_err();

        assert!(matches!(
            err,
            ProfileLoadError::Invalid {
                source: InputError::Negative {
                    field: "donations",
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn intake_form_rejects_percentage_written_as_whole_number() {
        let json = r#"{"taxpayer_name": "B", "fiscal_year": 2024, "monthly_gross_income": 9000, "vacation_premium_percentage": 25}"#;

        let err = load_from_str(json).unwrap_err();

        assert!(matches!(
            err,
            ProfileLoadError::Invalid {
                source: InputError::VacationPremiumRateOutOfRange(_),
                ..
            }
        ));
    }

    // -----------------------------------------------------------------------
    // SAT-style declaration
    // -----------------------------------------------------------------------

    #[test]
    fn declaration_maps_sections() {
        let profile = load_from_str(DECLARATION_JSON).expect("valid profile");

        assert_eq!(profile.taxpayer_name, "Caso 1");
        assert_eq!(profile.fiscal_year, 2025);
        assert_eq!(profile.monthly_net_income, None);
        assert_eq!(profile.inputs.bonus_days, 30);
        assert_eq!(profile.inputs.vacation_premium_rate, dec!(0.30));
        assert_eq!(profile.inputs.general_deductions.total(), dec!(13500));
        assert_eq!(profile.inputs.ppr_contributions, dec!(20000));
    }

    #[test]
    fn declaration_sums_repeated_tuition_levels() {
        let profile = load_from_str(DECLARATION_JSON).expect("valid profile");

        assert_eq!(profile.inputs.tuition.elementary, dec!(15000));
        assert_eq!(profile.inputs.tuition.high_school, dec!(18000));
        assert_eq!(profile.inputs.tuition.preschool, dec!(0));
    }

    #[test]
    fn declaration_rejects_unknown_education_level() {
        let json = DECLARATION_JSON.replace("preparatoria", "universidad");

        assert!(matches!(load_from_str(&json), Err(ProfileLoadError::Json(_))));
    }
}
