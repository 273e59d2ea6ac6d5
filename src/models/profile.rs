//! Staff compensation profile and employment type.
//!
//! This module defines the [`StaffCompensationProfile`] struct and the
//! [`EmploymentType`] enum describing how a staff member is paid.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents the wage basis of a staff member.
///
/// Master data may carry codes this engine has no wage formula for. Those are
/// preserved as [`EmploymentType::Unrecognized`] so a record still loads, and
/// the computation for that one staff member fails with
/// [`EngineError::UnsupportedEmploymentType`].
///
/// # Example
///
/// ```
/// use payslip_engine::models::EmploymentType;
///
/// assert_eq!(EmploymentType::from("monthly"), EmploymentType::Salaried);
/// assert_eq!(EmploymentType::from("PART_TIME"), EmploymentType::Hourly);
/// assert_eq!(
///     EmploymentType::from("intern"),
///     EmploymentType::Unrecognized("intern".to_string())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmploymentType {
    /// Fixed monthly salary.
    Salaried,
    /// Paid per hour worked.
    Hourly,
    /// Fixed monthly contract fee.
    Contract,
    /// A code with no known wage formula.
    Unrecognized(String),
}

impl EmploymentType {
    /// Returns the canonical code for this employment type.
    pub fn code(&self) -> &str {
        match self {
            EmploymentType::Salaried => "salaried",
            EmploymentType::Hourly => "hourly",
            EmploymentType::Contract => "contract",
            EmploymentType::Unrecognized(code) => code,
        }
    }
}

impl From<&str> for EmploymentType {
    fn from(code: &str) -> Self {
        match code.trim() {
            "salaried" | "SALARIED" | "monthly" | "MONTHLY" | "FULL_TIME" => {
                EmploymentType::Salaried
            }
            "hourly" | "HOURLY" | "PART_TIME" => EmploymentType::Hourly,
            "contract" | "CONTRACT" => EmploymentType::Contract,
            other => EmploymentType::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for EmploymentType {
    fn from(code: String) -> Self {
        EmploymentType::from(code.as_str())
    }
}

impl From<EmploymentType> for String {
    fn from(employment_type: EmploymentType) -> Self {
        employment_type.code().to_string()
    }
}

/// Largest wage or commute distance a profile may carry (10^15).
pub const MAX_PROFILE_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// The employment terms of one staff member.
///
/// Exactly one wage field is meaningful per [`EmploymentType`]; the others
/// are ignored. Missing wage fields are treated as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffCompensationProfile {
    /// Unique identifier for the staff member.
    pub staff_id: String,
    /// How the staff member is paid.
    pub employment_type: EmploymentType,
    /// Monthly salary in yen (salaried staff only).
    #[serde(default)]
    pub monthly_salary: Option<Decimal>,
    /// Hourly rate in yen (hourly staff only).
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Monthly contract fee in yen (contract staff only).
    #[serde(default)]
    pub contract_fee: Option<Decimal>,
    /// One-way commute distance in kilometres.
    #[serde(default)]
    pub commute_distance_km: Decimal,
    /// Whether the staff member is enrolled in health insurance and pension.
    #[serde(default)]
    pub has_social_insurance: bool,
}

impl StaffCompensationProfile {
    /// Returns the fixed monthly wage for salaried and contract staff.
    ///
    /// This is the base for health insurance, pension and (for these types)
    /// employment insurance. Hourly and unrecognized types have no fixed
    /// monthly wage and return zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use payslip_engine::models::{EmploymentType, StaffCompensationProfile};
    /// use rust_decimal::Decimal;
    ///
    /// let profile = StaffCompensationProfile {
    ///     staff_id: "staff_001".to_string(),
    ///     employment_type: EmploymentType::Contract,
    ///     monthly_salary: Some(Decimal::from(300_000)),
    ///     hourly_rate: None,
    ///     contract_fee: Some(Decimal::from(250_000)),
    ///     commute_distance_km: Decimal::ZERO,
    ///     has_social_insurance: true,
    /// };
    ///
    /// assert_eq!(profile.monthly_base(), Decimal::from(250_000));
    /// ```
    pub fn monthly_base(&self) -> Decimal {
        match self.employment_type {
            EmploymentType::Salaried => self.monthly_salary.unwrap_or(Decimal::ZERO),
            EmploymentType::Contract => self.contract_fee.unwrap_or(Decimal::ZERO),
            EmploymentType::Hourly | EmploymentType::Unrecognized(_) => Decimal::ZERO,
        }
    }

    /// Returns the hourly rate, or zero when none is set.
    pub fn hourly_rate_or_zero(&self) -> Decimal {
        self.hourly_rate.unwrap_or(Decimal::ZERO)
    }

    /// Returns true if the staff member is paid by the hour.
    pub fn is_hourly(&self) -> bool {
        self.employment_type == EmploymentType::Hourly
    }

    /// Checks that the profile can be computed.
    ///
    /// # Errors
    ///
    /// - [`EngineError::UnsupportedEmploymentType`] when the employment type
    ///   has no wage formula
    /// - [`EngineError::InvalidProfile`] when a wage or the commute distance
    ///   is negative or above [`MAX_PROFILE_AMOUNT`]
    pub fn validate(&self) -> EngineResult<()> {
        if let EmploymentType::Unrecognized(code) = &self.employment_type {
            return Err(EngineError::UnsupportedEmploymentType {
                staff_id: self.staff_id.clone(),
                employment_type: code.clone(),
            });
        }

        let fields = [
            ("monthly_salary", self.monthly_salary),
            ("hourly_rate", self.hourly_rate),
            ("contract_fee", self.contract_fee),
            ("commute_distance_km", Some(self.commute_distance_km)),
        ];
        for (field, value) in fields {
            if value.is_some_and(|v| v.is_sign_negative() && !v.is_zero()) {
                return Err(EngineError::InvalidProfile {
                    staff_id: self.staff_id.clone(),
                    field: field.to_string(),
                    message: "must not be negative".to_string(),
                });
            }
            if value.is_some_and(|v| v > MAX_PROFILE_AMOUNT) {
                return Err(EngineError::InvalidProfile {
                    staff_id: self.staff_id.clone(),
                    field: field.to_string(),
                    message: format!("must not exceed {MAX_PROFILE_AMOUNT}"),
                });
            }
        }

        Ok(())
    }
}
