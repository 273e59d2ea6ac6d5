//! Payslip and report models.
//!
//! This module contains the [`Payslip`] type and the [`PayslipReport`]
//! wrapping it with warnings, derived metrics, the optional annual
//! projection and the audit trace of every rule applied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::YearMonth;

/// The period a payslip is computed for.
///
/// # Example
///
/// ```
/// use payslip_engine::models::PayslipBasis;
///
/// let basis = PayslipBasis::AnnualProjection { year: 2024 };
/// assert_eq!(basis.year(), 2024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayslipBasis {
    /// Bill the months present in the actuals for the year.
    Actuals {
        /// The target year.
        year: i32,
    },
    /// Bill twelve months, extrapolating days and hours from the actuals.
    AnnualProjection {
        /// The target year.
        year: i32,
    },
    /// A single month, with taxes computed on an annualized base.
    Month {
        /// The target year.
        year: i32,
        /// The target month (1-12).
        month: u32,
    },
}

impl PayslipBasis {
    /// Returns the target year.
    pub fn year(&self) -> i32 {
        match self {
            PayslipBasis::Actuals { year }
            | PayslipBasis::AnnualProjection { year }
            | PayslipBasis::Month { year, .. } => *year,
        }
    }

    /// Returns a snake_case label for logging and audit output.
    pub fn label(&self) -> &'static str {
        match self {
            PayslipBasis::Actuals { .. } => "actuals",
            PayslipBasis::AnnualProjection { .. } => "annual_projection",
            PayslipBasis::Month { .. } => "month",
        }
    }

    /// Returns the month key for [`PayslipBasis::Month`].
    pub fn month_key(&self) -> Option<YearMonth> {
        match self {
            PayslipBasis::Month { year, month } => YearMonth::new(*year, *month),
            _ => None,
        }
    }
}

/// Employee social insurance contributions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialInsurance {
    /// Health insurance contribution.
    pub health: Decimal,
    /// Pension contribution.
    pub pension: Decimal,
    /// Employment insurance contribution.
    pub employment: Decimal,
    /// Sum of the three contributions.
    pub total: Decimal,
}

impl SocialInsurance {
    /// Builds the contributions, deriving the total.
    pub fn new(health: Decimal, pension: Decimal, employment: Decimal) -> Self {
        Self {
            health,
            pension,
            employment,
            total: health + pension + employment,
        }
    }
}

/// An itemized payslip. All yen amounts are integral.
///
/// Construct through [`Payslip::assemble`] so the totals always agree with
/// their line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// Pay from the primary wage formula, excluding commute allowance.
    pub gross_salary: Decimal,
    /// Commute allowance.
    pub commute_allowance: Decimal,
    /// `gross_salary + commute_allowance`.
    pub total_gross: Decimal,
    /// Social insurance contributions.
    pub social_insurance: SocialInsurance,
    /// Income tax; negative values are kept as computed.
    pub income_tax: Decimal,
    /// Resident tax.
    pub resident_tax: Decimal,
    /// `social_insurance.total + income_tax + resident_tax`.
    pub total_deductions: Decimal,
    /// `total_gross - total_deductions`; may be negative.
    pub net_salary: Decimal,
    /// Days worked (actual or projected).
    pub work_days: u32,
    /// Hours worked (actual or projected).
    pub work_hours: Decimal,
}

impl Payslip {
    /// Composes a payslip from its line items.
    ///
    /// # Example
    ///
    /// ```
    /// use payslip_engine::models::{Payslip, SocialInsurance};
    /// use rust_decimal::Decimal;
    ///
    /// let payslip = Payslip::assemble(
    ///     Decimal::from(300_000),
    ///     Decimal::from(4_000),
    ///     SocialInsurance::new(Decimal::from(15_000), Decimal::from(27_000), Decimal::from(1_800)),
    ///     Decimal::from(5_000),
    ///     Decimal::from(30_000),
    ///     20,
    ///     Decimal::from(160),
    /// );
    ///
    /// assert_eq!(payslip.total_gross, Decimal::from(304_000));
    /// assert_eq!(payslip.total_deductions, Decimal::from(78_800));
    /// assert_eq!(payslip.net_salary, Decimal::from(225_200));
    /// ```
    pub fn assemble(
        gross_salary: Decimal,
        commute_allowance: Decimal,
        social_insurance: SocialInsurance,
        income_tax: Decimal,
        resident_tax: Decimal,
        work_days: u32,
        work_hours: Decimal,
    ) -> Self {
        let total_gross = gross_salary + commute_allowance;
        let total_deductions = social_insurance.total + income_tax + resident_tax;

        Self {
            gross_salary,
            commute_allowance,
            total_gross,
            social_insurance,
            income_tax,
            resident_tax,
            total_deductions,
            net_salary: total_gross - total_deductions,
            work_days,
            work_hours,
        }
    }
}

/// The kind of degradation a warning reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    /// A rate, bracket or band lookup found nothing; the line item is zero.
    MissingRateData,
    /// An average had a zero divisor and was reported as zero.
    DivisionGuard,
    /// The taxable amount fell in a gap between brackets and the top bracket
    /// was used.
    BracketFallback,
    /// No worked-period actuals exist for the period.
    NoActuals,
}

/// A non-fatal problem found while computing a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationWarning {
    /// The kind of warning.
    pub code: WarningCode,
    /// A human-readable description.
    pub message: String,
}

impl CalculationWarning {
    /// Creates a warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// Averages derived from the worked-period actuals.
///
/// Each value is zero when its divisor is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkMetrics {
    /// Months with actuals in the billed period.
    pub months_worked: u32,
    /// Actual days divided by months worked.
    pub average_days_per_month: Decimal,
    /// Actual hours divided by months worked.
    pub average_hours_per_month: Decimal,
    /// Billed hours divided by billed days; projected figures on a projection.
    pub average_hours_per_day: Decimal,
    /// Billed gross pay divided by billed days, rounded to the yen.
    pub average_daily_pay: Decimal,
}

/// Pay for one month of actuals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPay {
    /// The month.
    pub period: YearMonth,
    /// Days worked in the month.
    pub days_worked: u32,
    /// Hours worked in the month.
    pub hours_worked: Decimal,
    /// Gross pay for the month.
    pub gross_pay: Decimal,
}

/// A full-year forecast extrapolated from partial-year actuals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualProjection {
    /// The target year.
    pub year: i32,
    /// Number of month keys present for the year.
    pub months_worked: u32,
    /// `12 - months_worked`.
    pub remaining_months: u32,
    /// Actual days in the year so far.
    pub actual_days: u32,
    /// Actual hours in the year so far.
    pub actual_hours: Decimal,
    /// Average days per present month.
    pub average_days_per_month: Decimal,
    /// Average hours per present month.
    pub average_hours_per_month: Decimal,
    /// Forecast days for the remaining months.
    pub predicted_remaining_days: u32,
    /// Forecast hours for the remaining months.
    pub predicted_remaining_hours: Decimal,
    /// `actual_days + predicted_remaining_days`.
    pub predicted_annual_days: u32,
    /// `actual_hours + predicted_remaining_hours`.
    pub predicted_annual_hours: Decimal,
    /// Forecast base pay for the full year.
    pub predicted_annual_gross: Decimal,
}

/// The result of one payslip computation.
///
/// Carries the payslip together with everything a caller needs to tell a
/// legitimately zero line item from one that is zero because data was
/// missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipReport {
    /// The version of the engine that produced this report.
    pub engine_version: String,
    /// The staff member the payslip is for.
    pub staff_id: String,
    /// The period computed.
    pub basis: PayslipBasis,
    /// The itemized payslip.
    pub payslip: Payslip,
    /// Non-fatal problems found during the computation.
    pub warnings: Vec<CalculationWarning>,
    /// True when a line item was zeroed for lack of data.
    pub insufficient_data: bool,
    /// Averages derived from the actuals.
    pub metrics: WorkMetrics,
    /// Per-month pay for the months with actuals in the target year.
    pub monthly_breakdown: Vec<MonthlyPay>,
    /// The forecast, for [`PayslipBasis::AnnualProjection`].
    pub projection: Option<AnnualProjection>,
    /// Every rule applied, in order.
    pub audit_trace: Vec<AuditStep>,
}

impl PayslipReport {
    /// Returns true if any warning carries the given code.
    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_social_insurance_total_is_sum() {
        let si = SocialInsurance::new(dec("180000"), dec("324000"), dec("21600"));
        assert_eq!(si.total, dec("525600"));
    }

    #[test]
    fn test_assemble_keeps_negative_net() {
        let payslip = Payslip::assemble(
            dec("10000"),
            dec("0"),
            SocialInsurance::new(dec("0"), dec("0"), dec("60")),
            dec("0"),
            dec("50000"),
            2,
            dec("8"),
        );

        assert_eq!(payslip.total_deductions, dec("50060"));
        assert_eq!(payslip.net_salary, dec("-40060"));
    }

    #[test]
    fn test_assemble_keeps_negative_income_tax() {
        let payslip = Payslip::assemble(
            dec("100000"),
            dec("2000"),
            SocialInsurance::new(dec("0"), dec("0"), dec("0")),
            dec("-97500"),
            dec("10000"),
            10,
            dec("80"),
        );

        assert_eq!(payslip.total_deductions, dec("-87500"));
        assert_eq!(payslip.net_salary, dec("189500"));
    }

    #[test]
    fn test_basis_serialization_is_tagged() {
        let json = serde_json::to_string(&PayslipBasis::Month {
            year: 2024,
            month: 4,
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"month","year":2024,"month":4}"#);

        let parsed: PayslipBasis =
            serde_json::from_str(r#"{"kind":"annual_projection","year":2025}"#).unwrap();
        assert_eq!(parsed, PayslipBasis::AnnualProjection { year: 2025 });
    }

    #[test]
    fn test_basis_month_key() {
        assert_eq!(
            PayslipBasis::Month {
                year: 2024,
                month: 4
            }
            .month_key(),
            YearMonth::new(2024, 4)
        );
        assert_eq!(PayslipBasis::Actuals { year: 2024 }.month_key(), None);
    }

    #[test]
    fn test_warning_code_serialization() {
        let json = serde_json::to_string(&WarningCode::MissingRateData).unwrap();
        assert_eq!(json, "\"missing_rate_data\"");
        let json = serde_json::to_string(&WarningCode::DivisionGuard).unwrap();
        assert_eq!(json, "\"division_guard\"");
    }

    #[test]
    fn test_payslip_serializes_amounts_as_strings() {
        let payslip = Payslip::assemble(
            dec("300000"),
            dec("4000"),
            SocialInsurance::new(dec("15000"), dec("27000"), dec("1800")),
            dec("5000"),
            dec("30000"),
            20,
            dec("160"),
        );

        let json = serde_json::to_string(&payslip).unwrap();
        assert!(json.contains("\"gross_salary\":\"300000\""));
        assert!(json.contains("\"net_salary\":\"225200\""));
        assert!(json.contains("\"work_days\":20"));
    }
}
