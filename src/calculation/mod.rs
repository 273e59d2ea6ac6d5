//! Calculation logic for the payslip engine.
//!
//! This module contains the calculation functions for a payslip: gross pay
//! and per-month breakdown, commute allowance, social insurance contributions,
//! progressive income tax, resident tax, and the annual projection of
//! partial-year actuals. Each function returns its amount together with an
//! [`AuditStep`](crate::models::AuditStep) describing how it was reached.

mod annual_projection;
mod commute_allowance;
mod gross_pay;
mod income_tax;
mod resident_tax;
mod rounding;
mod social_insurance;

pub use annual_projection::{AnnualProjectionResult, MONTHS_PER_YEAR, project_annual};
pub use commute_allowance::{
    ASSUMED_WORK_DAYS_PER_MONTH, COMMUTE_YEN_PER_KM, CommuteAllowanceResult, ROUND_TRIP_FACTOR,
    calculate_commute_allowance,
};
pub use gross_pay::{
    GrossPayResult, calculate_gross_pay, calculate_monthly_breakdown, calculate_work_metrics,
};
pub use income_tax::{
    BASIC_DEDUCTION, IncomeTaxResult, calculate_income_tax, employment_income_deduction,
    select_bracket,
};
pub use resident_tax::{RESIDENT_TAX_RATE, ResidentTaxResult, calculate_resident_tax};
pub use rounding::{floor_yen, guarded_div, percentage_of, round_yen};
pub use social_insurance::{SocialInsuranceResult, calculate_social_insurance};
