//! Authorized personal deductions.
//!
//! Each category is first limited by its own ceiling, then the three
//! categories together are limited by the aggregate legal ceiling (the
//! lesser of five annual UMAs or 15% of total gross income). When the
//! aggregate ceiling binds, every category is scaled by the same factor so
//! their proportions survive.
//!
//! | Step | Amount |
//! |------|--------|
//! | 1    | general = min(sum of general expenses, UMA annual × general units) |
//! | 2    | ppr = min(PPR contributions, UMA annual × PPR units) |
//! | 3    | education = Σ min(tuition paid, level ceiling) |
//! | 4    | legal cap = min(UMA annual × 5, total gross income × 0.15) |
//! | 5    | uncapped = general + ppr + education |
//! | 6    | if uncapped > legal cap, scale all three by legal cap / uncapped |
//! | 7    | total = min(uncapped, legal cap) |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{max, min};
use crate::models::{TaxYearTable, TaxpayerInputs};

/// Deductions after every ceiling has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedDeductions {
    pub total: Decimal,
    pub personal: Decimal,
    pub ppr: Decimal,
    pub education: Decimal,
    /// The aggregate ceiling that applied for this income.
    pub legal_cap: Decimal,
    /// Factor applied to every category, present only when the aggregate ceiling bound.
    pub scale_factor: Option<Decimal>,
}

/// Tuition limited per level and summed.
pub fn limited_tuition(
    inputs: &TaxpayerInputs,
    table: &TaxYearTable,
) -> Decimal {
    inputs
        .tuition
        .iter()
        .map(|(level, paid)| {
            let cap = table.tuition_caps.get(level);
            if cap.is_zero() && paid > Decimal::ZERO {
                warn!(
                    fiscal_year = table.fiscal_year,
                    level = level.as_str(),
                    %paid,
                    "no tuition ceiling for education level, payment not deductible"
                );
            }
            min(paid, cap)
        })
        .sum()
}

pub fn authorized_deductions(
    inputs: &TaxpayerInputs,
    table: &TaxYearTable,
    total_gross_income: Decimal,
) -> AuthorizedDeductions {
    let general_total = inputs.general_deductions.total();
    let mut personal = min(general_total, table.general_deduction_cap());
    let mut ppr = min(inputs.ppr_contributions, table.ppr_deduction_cap());
    let mut education = limited_tuition(inputs, table);

    let legal_cap = max(table.aggregate_deduction_cap(total_gross_income), Decimal::ZERO);
    let uncapped = personal + ppr + education;

    let scale_factor = if uncapped > legal_cap {
        let factor = if uncapped.is_zero() {
            Decimal::ZERO
        } else {
            legal_cap / uncapped
        };
        personal *= factor;
        ppr *= factor;
        education *= factor;
        debug!(%uncapped, %legal_cap, %factor, "aggregate deduction ceiling applied");
        Some(factor)
    } else {
        None
    };

    AuthorizedDeductions {
        total: min(uncapped, legal_cap),
        personal,
        ppr,
        education,
        legal_cap,
        scale_factor,
    }
}
