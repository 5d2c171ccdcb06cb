mod bracket;
mod education_level;
mod tax_calculation_result;
mod tax_year_table;
mod taxpayer_inputs;

pub use bracket::{BRACKET_GAP, Bracket, MonthlySchedule, ScheduleError};
pub use education_level::{EducationLevel, TuitionByLevel, TuitionCaps, TuitionPayments};
pub use tax_calculation_result::{BalanceStatus, TaxCalculationResult};
pub use tax_year_table::{
    DEFAULT_AGGREGATE_CAP_INCOME_SHARE, DEFAULT_AGGREGATE_CAP_UMA_UNITS, TaxYearTable,
};
pub use taxpayer_inputs::{GeneralDeductions, InputError, TaxpayerInputs, TaxpayerProfile};
