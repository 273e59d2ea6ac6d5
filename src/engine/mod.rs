//! Payslip computation entry points.
//!
//! [`compute_payslip`] runs the full pipeline for one staff member;
//! [`compute_batch`] runs it for many, isolating per-staff failures.
//!
//! # Example
//!
//! ```no_run
//! use payslip_engine::config::RateTableLoader;
//! use payslip_engine::engine::compute_payslip;
//! use payslip_engine::models::{EmploymentType, PayslipBasis, StaffCompensationProfile};
//! use rust_decimal::Decimal;
//!
//! let loader = RateTableLoader::load("./config/jp_2024").unwrap();
//! let profile = StaffCompensationProfile {
//!     staff_id: "staff_001".to_string(),
//!     employment_type: EmploymentType::Salaried,
//!     monthly_salary: Some(Decimal::from(300_000)),
//!     hourly_rate: None,
//!     contract_fee: None,
//!     commute_distance_km: Decimal::from(5),
//!     has_social_insurance: true,
//! };
//!
//! let report = compute_payslip(
//!     &profile,
//!     &[],
//!     &loader,
//!     PayslipBasis::AnnualProjection { year: 2024 },
//!     loader.settings(),
//! )
//! .unwrap();
//! println!("Net salary: {}", report.payslip.net_salary);
//! ```

mod assembler;
mod batch;

pub use assembler::compute_payslip;
pub use batch::{BatchOutcome, StaffFailure, compute_batch};
