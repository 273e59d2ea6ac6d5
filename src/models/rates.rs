//! Rate master data: insurance rates, tax brackets and commute bands.
//!
//! These records are supplied by the rates master data API (or loaded from
//! YAML through [`RateTableLoader`](crate::config::RateTableLoader)).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The kind of social insurance a rate applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceKind {
    /// Health insurance.
    HealthInsurance,
    /// Employees' pension insurance.
    Pension,
    /// Employment insurance.
    EmploymentInsurance,
    /// Workers' compensation; borne entirely by the employer.
    WorkersCompensation,
}

impl InsuranceKind {
    /// Returns the snake_case code used in master data.
    pub fn code(&self) -> &'static str {
        match self {
            InsuranceKind::HealthInsurance => "health_insurance",
            InsuranceKind::Pension => "pension",
            InsuranceKind::EmploymentInsurance => "employment_insurance",
            InsuranceKind::WorkersCompensation => "workers_compensation",
        }
    }
}

/// An employee contribution rate for one kind of insurance.
///
/// # Example
///
/// ```
/// use payslip_engine::models::{InsuranceKind, InsuranceRate};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rate = InsuranceRate {
///     rate_type: InsuranceKind::EmploymentInsurance,
///     employee_percentage: Decimal::from_str("0.6").unwrap(),
///     effective_from: None,
///     effective_to: None,
/// };
/// assert!(rate.is_effective_on(chrono::NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceRate {
    /// The kind of insurance.
    pub rate_type: InsuranceKind,
    /// The employee share as a percentage (0-100).
    pub employee_percentage: Decimal,
    /// First day the rate applies (inclusive), if bounded.
    #[serde(default)]
    pub effective_from: Option<NaiveDate>,
    /// Last day the rate applies (inclusive), if bounded.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

impl InsuranceRate {
    /// Returns true if the rate applies on the given date.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        is_within(self.effective_from, self.effective_to, date)
    }
}

/// A progressive income tax bracket.
///
/// Both bounds are inclusive. A `None` upper bound makes the bracket
/// open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower bound of taxable income (inclusive).
    pub income_from: Decimal,
    /// Upper bound of taxable income (inclusive); `None` for the top bracket.
    #[serde(default)]
    pub income_to: Option<Decimal>,
    /// Marginal tax rate as a percentage.
    pub tax_rate: Decimal,
    /// Fixed amount subtracted after applying the rate.
    #[serde(default)]
    pub deduction_amount: Decimal,
    /// First day the bracket applies (inclusive), if bounded.
    #[serde(default)]
    pub effective_from: Option<NaiveDate>,
    /// Last day the bracket applies (inclusive), if bounded.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

impl TaxBracket {
    /// Returns true if `taxable` lies within this bracket's bounds.
    pub fn contains(&self, taxable: Decimal) -> bool {
        taxable >= self.income_from && self.income_to.is_none_or(|to| taxable <= to)
    }

    /// Returns true if the bracket applies on the given date.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        is_within(self.effective_from, self.effective_to, date)
    }
}

/// A commute allowance band keyed by one-way distance.
///
/// The band covers `distance_from_km <= d < distance_to_km` and pays
/// `allowance_amount` per month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommuteAllowanceBand {
    /// Lower distance bound (inclusive).
    pub distance_from_km: Decimal,
    /// Upper distance bound (exclusive).
    pub distance_to_km: Decimal,
    /// Monthly allowance in yen.
    pub allowance_amount: Decimal,
}

impl CommuteAllowanceBand {
    /// Returns true if the distance falls in this band.
    pub fn contains(&self, distance_km: Decimal) -> bool {
        distance_km >= self.distance_from_km && distance_km < self.distance_to_km
    }
}

fn is_within(from: Option<NaiveDate>, to: Option<NaiveDate>, date: NaiveDate) -> bool {
    from.is_none_or(|f| f <= date) && to.is_none_or(|t| date <= t)
}
