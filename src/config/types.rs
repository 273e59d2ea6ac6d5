//! Configuration types for payslip computation.
//!
//! This module contains the strongly-typed rate tables and engine settings
//! that are deserialized from YAML configuration files, plus the
//! [`RateTableProvider`] trait through which the engine reads rate data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{CommuteAllowanceBand, InsuranceKind, InsuranceRate, TaxBracket};

/// Supplies the three rate tables the engine consults.
///
/// Any table may be empty; the engine then zeroes the affected line items
/// and reports a warning instead of failing.
pub trait RateTableProvider {
    /// All insurance rates, in any order.
    fn insurance_rates(&self) -> &[InsuranceRate];
    /// All tax brackets, in any order.
    fn tax_brackets(&self) -> &[TaxBracket];
    /// All commute allowance bands, in any order.
    fn commute_bands(&self) -> &[CommuteAllowanceBand];

    /// Finds the rate for an insurance kind in force on `as_of`.
    ///
    /// When several rates apply, the one with the latest `effective_from`
    /// wins; undated rates rank lowest.
    fn insurance_rate(&self, kind: InsuranceKind, as_of: NaiveDate) -> Option<&InsuranceRate> {
        self.insurance_rates()
            .iter()
            .filter(|r| r.rate_type == kind && r.is_effective_on(as_of))
            .max_by_key(|r| r.effective_from)
    }

    /// Returns the tax brackets in force on `as_of`, ordered by `income_from`.
    fn brackets_in_force(&self, as_of: NaiveDate) -> Vec<&TaxBracket> {
        let mut brackets: Vec<&TaxBracket> = self
            .tax_brackets()
            .iter()
            .filter(|b| b.is_effective_on(as_of))
            .collect();
        brackets.sort_by(|a, b| a.income_from.cmp(&b.income_from));
        brackets
    }
}

/// Insurance rates file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct InsuranceRatesConfig {
    /// The insurance rates.
    pub insurance_rates: Vec<InsuranceRate>,
}

/// Tax brackets file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxBracketsConfig {
    /// The tax brackets.
    pub tax_brackets: Vec<TaxBracket>,
}

/// Commute allowance file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct CommuteBandsConfig {
    /// The commute allowance bands.
    pub commute_allowance: Vec<CommuteAllowanceBand>,
}

/// In-memory rate tables.
///
/// # Example
///
/// ```
/// use payslip_engine::config::{RateTableProvider, RateTables};
/// use payslip_engine::models::{InsuranceKind, InsuranceRate};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let tables = RateTables {
///     insurance_rates: vec![InsuranceRate {
///         rate_type: InsuranceKind::Pension,
///         employee_percentage: Decimal::from(9),
///         effective_from: None,
///         effective_to: None,
///     }],
///     ..RateTables::default()
/// };
///
/// let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
/// assert!(tables.insurance_rate(InsuranceKind::Pension, date).is_some());
/// assert!(tables.insurance_rate(InsuranceKind::HealthInsurance, date).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTables {
    /// Insurance rates.
    #[serde(default)]
    pub insurance_rates: Vec<InsuranceRate>,
    /// Income tax brackets.
    #[serde(default)]
    pub tax_brackets: Vec<TaxBracket>,
    /// Commute allowance bands.
    #[serde(default)]
    pub commute_bands: Vec<CommuteAllowanceBand>,
}

impl RateTableProvider for RateTables {
    fn insurance_rates(&self) -> &[InsuranceRate] {
        &self.insurance_rates
    }

    fn tax_brackets(&self) -> &[TaxBracket] {
        &self.tax_brackets
    }

    fn commute_bands(&self) -> &[CommuteAllowanceBand] {
        &self.commute_bands
    }
}

/// How the commute allowance is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommutePolicy {
    /// Round-trip kilometres at a fixed yen rate over a fixed number of days.
    #[default]
    FlatRate,
    /// Monthly amount from the commute allowance band table.
    BandTable,
}

/// Engine-wide settings, loaded from the optional `engine.yaml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// How the commute allowance is derived.
    #[serde(default)]
    pub commute_policy: CommutePolicy,
}
