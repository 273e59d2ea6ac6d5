//! Annual projection functionality.
//!
//! Extrapolates partial-year actuals to a twelve-month forecast by averaging
//! over the months that have actuals and extending those averages across the
//! months that remain.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AnnualProjection, AuditStep, CalculationWarning, StaffCompensationProfile, WarningCode,
    WorkActuals,
};

use super::gross_pay::calculate_gross_pay;
use super::rounding::{guarded_div, round_yen};

/// Months in a projected year.
pub const MONTHS_PER_YEAR: u32 = 12;

/// The result of an annual projection.
#[derive(Debug, Clone)]
pub struct AnnualProjectionResult {
    /// The forecast.
    pub projection: AnnualProjection,
    /// Set when no months had actuals and the forecast is all zero.
    pub warnings: Vec<CalculationWarning>,
    /// The audit step recording this projection.
    pub audit_step: AuditStep,
}

/// Projects a full year from the actuals of `year`.
///
/// - `months_worked` counts the month keys present for the year; missing
///   months are not treated as zero-hour months.
/// - `predicted_remaining_days = round(avg_days × remaining_months)`
/// - `predicted_remaining_hours = avg_hours × remaining_months`
/// - Annual gross is the fixed wage × 12 for salaried and contract staff and
///   `round(predicted_annual_hours × hourly_rate)` for hourly staff.
///
/// With no months worked every figure except the fixed-wage gross is zero,
/// and a [`WarningCode::DivisionGuard`] warning is returned.
///
/// # Errors
///
/// - [`EngineError::UnsupportedEmploymentType`] when the employment type has
///   no wage formula
/// - [`EngineError::ArithmeticOverflow`] when projected days or hours do not
///   fit
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::project_annual;
/// use payslip_engine::models::{EmploymentType, StaffCompensationProfile, WorkActuals, WorkPeriodActual};
/// use rust_decimal::Decimal;
///
/// let profile = StaffCompensationProfile {
///     staff_id: "staff_001".to_string(),
///     employment_type: EmploymentType::Hourly,
///     monthly_salary: None,
///     hourly_rate: Some(Decimal::from(1_000)),
///     contract_fee: None,
///     commute_distance_km: Decimal::ZERO,
///     has_social_insurance: false,
/// };
/// let actuals = WorkActuals::from_records(&[
///     WorkPeriodActual { year: 2024, month: 1, days_worked: 10, hours_worked: Decimal::from(80) },
///     WorkPeriodActual { year: 2024, month: 5, days_worked: 20, hours_worked: Decimal::from(160) },
/// ])
/// .unwrap();
///
/// let result = project_annual(&profile, &actuals, 2024, 1).unwrap();
/// assert_eq!(result.projection.months_worked, 2);
/// assert_eq!(result.projection.predicted_annual_days, 180);
/// assert_eq!(result.projection.predicted_annual_gross, Decimal::from(1_440_000));
/// ```
pub fn project_annual(
    profile: &StaffCompensationProfile,
    actuals: &WorkActuals,
    year: i32,
    step_number: u32,
) -> EngineResult<AnnualProjectionResult> {
    let months_worked = actuals.months_in_year(year).min(MONTHS_PER_YEAR);
    let remaining_months = MONTHS_PER_YEAR - months_worked;
    let overflow = || EngineError::ArithmeticOverflow {
        staff_id: profile.staff_id.clone(),
        step: "annual_projection".to_string(),
    };
    let actual_days = actuals.total_days(year).ok_or_else(overflow)?;
    let actual_hours = actuals.total_hours(year).ok_or_else(overflow)?;

    let months = Decimal::from(months_worked);
    let remaining = Decimal::from(remaining_months);
    let mut warnings = Vec::new();

    let (average_days_per_month, average_hours_per_month) = match (
        guarded_div(Decimal::from(actual_days), months),
        guarded_div(actual_hours, months),
    ) {
        (Some(days), Some(hours)) => (days, hours),
        _ => {
            warnings.push(CalculationWarning::new(
                WarningCode::DivisionGuard,
                format!("No months worked in {year}; projected days and hours are zero"),
            ));
            (Decimal::ZERO, Decimal::ZERO)
        }
    };

    let (predicted_remaining_days, predicted_remaining_hours) = if months_worked == 0 {
        (0, Decimal::ZERO)
    } else {
        (
            round_yen(average_days_per_month * remaining)
                .to_u32()
                .ok_or_else(overflow)?,
            average_hours_per_month
                .checked_mul(remaining)
                .ok_or_else(overflow)?,
        )
    };

    let predicted_annual_days = actual_days
        .checked_add(predicted_remaining_days)
        .ok_or_else(overflow)?;
    let predicted_annual_hours = actual_hours
        .checked_add(predicted_remaining_hours)
        .ok_or_else(overflow)?;

    let predicted_annual_gross =
        calculate_gross_pay(profile, MONTHS_PER_YEAR, predicted_annual_hours, step_number)?
            .gross_pay;

    let projection = AnnualProjection {
        year,
        months_worked,
        remaining_months,
        actual_days,
        actual_hours,
        average_days_per_month,
        average_hours_per_month,
        predicted_remaining_days,
        predicted_remaining_hours,
        predicted_annual_days,
        predicted_annual_hours,
        predicted_annual_gross,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "annual_projection".to_string(),
        rule_name: "Annual Projection".to_string(),
        input: serde_json::json!({
            "year": year,
            "months_worked": months_worked,
            "actual_days": actual_days,
            "actual_hours": actual_hours.normalize().to_string()
        }),
        output: serde_json::json!({
            "remaining_months": remaining_months,
            "predicted_remaining_days": predicted_remaining_days,
            "predicted_remaining_hours": predicted_remaining_hours.normalize().to_string(),
            "predicted_annual_days": predicted_annual_days,
            "predicted_annual_hours": predicted_annual_hours.normalize().to_string(),
            "predicted_annual_gross": predicted_annual_gross.normalize().to_string()
        }),
        reasoning: format!(
            "{} months worked, {} remaining: {} + {} days, {}h + {}h",
            months_worked,
            remaining_months,
            actual_days,
            predicted_remaining_days,
            actual_hours.normalize(),
            predicted_remaining_hours.normalize()
        ),
    };

    Ok(AnnualProjectionResult {
        projection,
        warnings,
        audit_step,
    })
}
