//! ISR annual balance calculations.
//!
//! This module provides the calculation logic for the yearly tax return of
//! a salaried taxpayer, organized by the stage of the return each piece
//! computes.

mod annual_tax;
mod calculator;
pub mod common;
pub mod deductions;
pub mod exemptions;

pub use annual_tax::annual_tax;
pub use calculator::{TaxCalculator, TaxEngine};
pub use deductions::{AuthorizedDeductions, authorized_deductions};
pub use exemptions::ExemptionSplit;
