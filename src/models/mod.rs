//! Core data models for the payslip engine.
//!
//! This module contains all the domain models used throughout the engine.

mod payslip;
mod profile;
mod rates;
mod work_actual;

pub use payslip::{
    AnnualProjection, AuditStep, CalculationWarning, MonthlyPay, Payslip, PayslipBasis,
    PayslipReport, SocialInsurance, WarningCode, WorkMetrics,
};
pub use profile::{EmploymentType, MAX_PROFILE_AMOUNT, StaffCompensationProfile};
pub use rates::{CommuteAllowanceBand, InsuranceKind, InsuranceRate, TaxBracket};
pub use work_actual::{WorkActualSource, WorkActuals, WorkPeriodActual, YearMonth};
