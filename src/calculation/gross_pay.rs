//! Gross pay calculation functionality.
//!
//! This module derives base gross pay from a staff member's employment type
//! and the months or hours being billed, plus the per-month breakdown and
//! the zero-guarded averages shown alongside a payslip.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, CalculationWarning, EmploymentType, MonthlyPay, StaffCompensationProfile,
    WarningCode, WorkMetrics, WorkPeriodActual, YearMonth,
};

use super::rounding::{guarded_div, round_yen};

/// The result of a gross pay calculation, including the amount and audit step.
#[derive(Debug, Clone)]
pub struct GrossPayResult {
    /// Gross pay in yen, excluding commute allowance.
    pub gross_pay: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates gross pay for the billed period.
///
/// - Salaried: `monthly_salary × months_count`
/// - Contract: `contract_fee × months_count`
/// - Hourly: `round(hours_for_period × hourly_rate)`
///
/// # Arguments
///
/// * `profile` - The staff member's employment terms
/// * `months_count` - Months billed (months worked, or 12 for a projection)
/// * `hours_for_period` - Hours billed; only used for hourly staff
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// - [`EngineError::UnsupportedEmploymentType`] when the employment type has
///   no wage formula
/// - [`EngineError::ArithmeticOverflow`] when the product does not fit
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::calculate_gross_pay;
/// use payslip_engine::models::{EmploymentType, StaffCompensationProfile};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let profile = StaffCompensationProfile {
///     staff_id: "staff_001".to_string(),
///     employment_type: EmploymentType::Hourly,
///     monthly_salary: None,
///     hourly_rate: Some(Decimal::from(1_150)),
///     contract_fee: None,
///     commute_distance_km: Decimal::ZERO,
///     has_social_insurance: false,
/// };
///
/// let result = calculate_gross_pay(&profile, 1, Decimal::from_str("80.5").unwrap(), 1).unwrap();
/// assert_eq!(result.gross_pay, Decimal::from(92_575));
/// ```
pub fn calculate_gross_pay(
    profile: &StaffCompensationProfile,
    months_count: u32,
    hours_for_period: Decimal,
    step_number: u32,
) -> EngineResult<GrossPayResult> {
    let months = Decimal::from(months_count);

    let (gross_pay, formula) = match &profile.employment_type {
        EmploymentType::Salaried => {
            let salary = profile.monthly_salary.unwrap_or(Decimal::ZERO);
            (
                salary.checked_mul(months),
                format!("¥{} × {} months", salary.normalize(), months_count),
            )
        }
        EmploymentType::Contract => {
            let fee = profile.contract_fee.unwrap_or(Decimal::ZERO);
            (
                fee.checked_mul(months),
                format!("¥{} × {} months", fee.normalize(), months_count),
            )
        }
        EmploymentType::Hourly => {
            let rate = profile.hourly_rate_or_zero();
            (
                hours_for_period.checked_mul(rate).map(round_yen),
                format!(
                    "round({}h × ¥{})",
                    hours_for_period.normalize(),
                    rate.normalize()
                ),
            )
        }
        EmploymentType::Unrecognized(code) => {
            return Err(EngineError::UnsupportedEmploymentType {
                staff_id: profile.staff_id.clone(),
                employment_type: code.clone(),
            });
        }
    };
    let gross_pay = gross_pay.ok_or_else(|| EngineError::ArithmeticOverflow {
        staff_id: profile.staff_id.clone(),
        step: "gross_pay".to_string(),
    })?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "gross_pay".to_string(),
        rule_name: "Gross Pay".to_string(),
        input: serde_json::json!({
            "employment_type": profile.employment_type.code(),
            "months_count": months_count,
            "hours_for_period": hours_for_period.normalize().to_string()
        }),
        output: serde_json::json!({
            "gross_pay": gross_pay.normalize().to_string()
        }),
        reasoning: format!("{} = ¥{}", formula, gross_pay.normalize()),
    };

    Ok(GrossPayResult {
        gross_pay,
        audit_step,
    })
}

/// Calculates gross pay for each month of actuals.
///
/// Salaried and contract staff earn their fixed monthly wage for every month
/// present; hourly staff earn `round(hours × rate)` for the month.
///
/// # Errors
///
/// Returns [`EngineError::UnsupportedEmploymentType`] when the employment
/// type has no wage formula.
pub fn calculate_monthly_breakdown<'a>(
    profile: &StaffCompensationProfile,
    actuals: impl IntoIterator<Item = &'a WorkPeriodActual>,
) -> EngineResult<Vec<MonthlyPay>> {
    actuals
        .into_iter()
        .map(|actual| {
            let gross_pay = calculate_gross_pay(profile, 1, actual.hours_worked, 0)?.gross_pay;
            Ok(MonthlyPay {
                period: YearMonth {
                    year: actual.year,
                    month: actual.month,
                },
                days_worked: actual.days_worked,
                hours_worked: actual.hours_worked,
                gross_pay,
            })
        })
        .collect()
}

/// Derives the averages shown alongside a payslip.
///
/// Per-month averages divide the actual days and hours by `months_worked`.
/// Per-day averages divide the billed hours and gross pay by `work_days`.
/// Any average whose divisor is zero is reported as zero together with a
/// [`WarningCode::DivisionGuard`] warning.
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::calculate_work_metrics;
/// use rust_decimal::Decimal;
///
/// let (metrics, warnings) =
///     calculate_work_metrics(0, 0, Decimal::ZERO, Decimal::from(300_000), 0, Decimal::ZERO);
///
/// assert_eq!(metrics.average_daily_pay, Decimal::ZERO);
/// assert_eq!(warnings.len(), 2);
/// ```
pub fn calculate_work_metrics(
    months_worked: u32,
    actual_days: u32,
    actual_hours: Decimal,
    gross_pay: Decimal,
    work_days: u32,
    work_hours: Decimal,
) -> (WorkMetrics, Vec<CalculationWarning>) {
    let mut warnings = Vec::new();
    let months = Decimal::from(months_worked);
    let days = Decimal::from(work_days);

    let per_month = (
        guarded_div(Decimal::from(actual_days), months),
        guarded_div(actual_hours, months),
    );
    let (average_days_per_month, average_hours_per_month) = match per_month {
        (Some(d), Some(h)) => (d, h),
        _ => {
            warnings.push(CalculationWarning::new(
                WarningCode::DivisionGuard,
                "No months worked; per-month averages reported as zero",
            ));
            (Decimal::ZERO, Decimal::ZERO)
        }
    };

    let per_day = (guarded_div(work_hours, days), guarded_div(gross_pay, days));
    let (average_hours_per_day, average_daily_pay) = match per_day {
        (Some(h), Some(p)) => (h, round_yen(p)),
        _ => {
            warnings.push(CalculationWarning::new(
                WarningCode::DivisionGuard,
                "No days worked; per-day averages reported as zero",
            ));
            (Decimal::ZERO, Decimal::ZERO)
        }
    };

    let metrics = WorkMetrics {
        months_worked,
        average_days_per_month,
        average_hours_per_month,
        average_hours_per_day,
        average_daily_pay,
    };

    (metrics, warnings)
}
