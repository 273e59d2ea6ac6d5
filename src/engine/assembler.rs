//! Payslip assembly.
//!
//! Runs the calculation pipeline for one staff member and composes the
//! results into a [`PayslipReport`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculation::{
    MONTHS_PER_YEAR, calculate_commute_allowance, calculate_gross_pay, calculate_income_tax,
    calculate_monthly_breakdown, calculate_resident_tax, calculate_social_insurance,
    calculate_work_metrics, floor_yen, project_annual,
};
use crate::config::{EngineSettings, RateTableProvider};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, CalculationWarning, Payslip, PayslipBasis, PayslipReport,
    StaffCompensationProfile, WarningCode, WorkActuals, WorkPeriodActual, YearMonth,
};

/// Largest annual base pay the tax and insurance steps accept (10^20 yen).
const MAX_ANNUAL_BASE: Decimal = Decimal::from_parts(1_661_992_960, 1_808_227_885, 5, false, 0);

/// What a basis bills, resolved against the actuals.
struct BilledPeriod<'a> {
    as_of: NaiveDate,
    months_count: u32,
    work_days: u32,
    work_hours: Decimal,
    /// Days and hours actually recorded inside the period.
    actual_days: u32,
    actual_hours: Decimal,
    /// Actuals inside the period, chronological.
    actuals: Vec<&'a WorkPeriodActual>,
    /// Taxes are computed on `gross × 12` and apportioned back to one month.
    annualize_taxes: bool,
}

impl BilledPeriod<'_> {
    fn months_with_actuals(&self) -> u32 {
        self.actuals.len() as u32
    }
}

/// Computes the payslip for one staff member.
///
/// The pipeline is:
///
/// 1. Validate the profile and fold the actuals into one record per month
/// 2. Resolve the billed period from `basis` (projecting the year for
///    [`PayslipBasis::AnnualProjection`])
/// 3. Gross pay, commute allowance and social insurance
/// 4. Income tax and resident tax on the annual base pay
/// 5. Compose the [`Payslip`], work metrics and monthly breakdown
///
/// Rates and brackets are those in force on the last day of the period.
/// Missing rate data zeroes the affected line item and adds a warning;
/// [`PayslipReport::insufficient_data`] is then set. The computation is pure:
/// identical inputs produce identical reports.
///
/// # Errors
///
/// - [`EngineError::UnsupportedEmploymentType`] for an employment type with
///   no wage formula
/// - [`EngineError::InvalidProfile`] for negative or oversized wages or
///   distance
/// - [`EngineError::InvalidActual`] for an actual (or a
///   [`PayslipBasis::Month`]) with a month outside 1-12, or negative hours
/// - [`EngineError::ArithmeticOverflow`] when billed totals or the annual
///   base pay grow too large to compute
///
/// # Examples
///
/// ```
/// use payslip_engine::config::{EngineSettings, RateTables};
/// use payslip_engine::engine::compute_payslip;
/// use payslip_engine::models::{
///     EmploymentType, PayslipBasis, StaffCompensationProfile, WorkPeriodActual,
/// };
/// use rust_decimal::Decimal;
///
/// let profile = StaffCompensationProfile {
///     staff_id: "staff_001".to_string(),
///     employment_type: EmploymentType::Salaried,
///     monthly_salary: Some(Decimal::from(300_000)),
///     hourly_rate: None,
///     contract_fee: None,
///     commute_distance_km: Decimal::from(5),
///     has_social_insurance: true,
/// };
/// let actuals = vec![WorkPeriodActual {
///     year: 2024,
///     month: 4,
///     days_worked: 20,
///     hours_worked: Decimal::from(160),
/// }];
///
/// let report = compute_payslip(
///     &profile,
///     &actuals,
///     &RateTables::default(),
///     PayslipBasis::Actuals { year: 2024 },
///     EngineSettings::default(),
/// )
/// .unwrap();
///
/// assert_eq!(report.payslip.gross_salary, Decimal::from(300_000));
/// assert_eq!(report.payslip.commute_allowance, Decimal::from(4_000));
/// assert!(report.insufficient_data);
/// ```
pub fn compute_payslip(
    profile: &StaffCompensationProfile,
    actual_records: &[WorkPeriodActual],
    rates: &impl RateTableProvider,
    basis: PayslipBasis,
    settings: EngineSettings,
) -> EngineResult<PayslipReport> {
    debug!(
        staff_id = %profile.staff_id,
        basis = basis.label(),
        year = basis.year(),
        records = actual_records.len(),
        "Computing payslip"
    );

    profile.validate()?;
    let actuals = WorkActuals::from_records(actual_records)?;

    let mut step_number: u32 = 1;
    let mut audit_trace: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<CalculationWarning> = Vec::new();
    let mut projection = None;

    let overflow = |step: &str| EngineError::ArithmeticOverflow {
        staff_id: profile.staff_id.clone(),
        step: step.to_string(),
    };

    let period = match basis {
        PayslipBasis::Actuals { year } => {
            let year_actuals: Vec<&WorkPeriodActual> = actuals.for_year(year).collect();
            let work_days = actuals
                .total_days(year)
                .ok_or_else(|| overflow("gross_pay"))?;
            let work_hours = actuals
                .total_hours(year)
                .ok_or_else(|| overflow("gross_pay"))?;
            BilledPeriod {
                as_of: year_end(year),
                months_count: year_actuals.len() as u32,
                work_days,
                work_hours,
                actual_days: work_days,
                actual_hours: work_hours,
                actuals: year_actuals,
                annualize_taxes: false,
            }
        }
        PayslipBasis::AnnualProjection { year } => {
            let result = project_annual(profile, &actuals, year, step_number)?;
            audit_trace.push(result.audit_step);
            warnings.extend(result.warnings);
            step_number += 1;

            let period = BilledPeriod {
                as_of: year_end(year),
                months_count: MONTHS_PER_YEAR,
                work_days: result.projection.predicted_annual_days,
                work_hours: result.projection.predicted_annual_hours,
                actual_days: result.projection.actual_days,
                actual_hours: result.projection.actual_hours,
                actuals: actuals.for_year(year).collect(),
                annualize_taxes: false,
            };
            projection = Some(result.projection);
            period
        }
        PayslipBasis::Month { year, month } => {
            let key = basis
                .month_key()
                .ok_or_else(|| EngineError::InvalidActual {
                    year,
                    month,
                    message: "payslip month must be between 1 and 12".to_string(),
                })?;
            let month_actual = actuals.get(key);
            let work_days = month_actual.map_or(0, |a| a.days_worked);
            let work_hours = month_actual.map_or(Decimal::ZERO, |a| a.hours_worked);
            BilledPeriod {
                as_of: key.last_day(),
                months_count: 1,
                work_days,
                work_hours,
                actual_days: work_days,
                actual_hours: work_hours,
                actuals: month_actual.into_iter().collect(),
                annualize_taxes: true,
            }
        }
    };

    // Gross pay
    let gross_result =
        calculate_gross_pay(profile, period.months_count, period.work_hours, step_number)?;
    let gross_salary = gross_result.gross_pay;
    audit_trace.push(gross_result.audit_step);
    step_number += 1;

    // Taxes are charged on the annual base pay
    let annual_base = if period.annualize_taxes {
        gross_salary
            .checked_mul(Decimal::from(MONTHS_PER_YEAR))
            .ok_or_else(|| overflow("income_tax"))?
    } else {
        gross_salary
    };
    if annual_base > MAX_ANNUAL_BASE {
        return Err(overflow("income_tax"));
    }

    // Commute allowance
    let commute_result = calculate_commute_allowance(
        profile.commute_distance_km,
        period.months_count,
        settings.commute_policy,
        rates.commute_bands(),
        step_number,
    );
    audit_trace.push(commute_result.audit_step);
    warnings.extend(commute_result.warning);
    step_number += 1;

    // Social insurance
    let social_result = calculate_social_insurance(
        profile,
        gross_salary,
        period.months_count,
        rates,
        period.as_of,
        step_number,
    );
    audit_trace.push(social_result.audit_step);
    warnings.extend(social_result.warnings);
    step_number += 1;

    // Taxes
    let income_tax_result = calculate_income_tax(annual_base, rates, period.as_of, step_number);
    audit_trace.push(income_tax_result.audit_step);
    warnings.extend(income_tax_result.warning);
    step_number += 1;

    let resident_tax_result = calculate_resident_tax(annual_base, step_number);
    audit_trace.push(resident_tax_result.audit_step);
    step_number += 1;

    let (income_tax, resident_tax) = if period.annualize_taxes {
        let months = Decimal::from(MONTHS_PER_YEAR);
        let income_tax = floor_yen(income_tax_result.income_tax / months);
        let resident_tax = floor_yen(resident_tax_result.resident_tax / months);

        audit_trace.push(AuditStep {
            step_number,
            rule_id: "monthly_tax_apportionment".to_string(),
            rule_name: "Monthly Tax Apportionment".to_string(),
            input: serde_json::json!({
                "annual_income_tax": income_tax_result.income_tax.normalize().to_string(),
                "annual_resident_tax": resident_tax_result.resident_tax.normalize().to_string()
            }),
            output: serde_json::json!({
                "income_tax": income_tax.normalize().to_string(),
                "resident_tax": resident_tax.normalize().to_string()
            }),
            reasoning: format!(
                "floor(¥{} / 12) = ¥{}; floor(¥{} / 12) = ¥{}",
                income_tax_result.income_tax.normalize(),
                income_tax.normalize(),
                resident_tax_result.resident_tax.normalize(),
                resident_tax.normalize()
            ),
        });

        (income_tax, resident_tax)
    } else {
        (income_tax_result.income_tax, resident_tax_result.resident_tax)
    };

    let payslip = Payslip::assemble(
        gross_salary,
        commute_result.amount,
        social_result.contributions,
        income_tax,
        resident_tax,
        period.work_days,
        period.work_hours,
    );

    let (metrics, metric_warnings) = calculate_work_metrics(
        period.months_with_actuals(),
        period.actual_days,
        period.actual_hours,
        payslip.gross_salary,
        payslip.work_days,
        payslip.work_hours,
    );
    warnings.extend(metric_warnings);

    let monthly_breakdown = calculate_monthly_breakdown(profile, period.actuals.iter().copied())?;

    let no_actuals = period.actuals.is_empty();
    if no_actuals {
        warnings.push(CalculationWarning::new(
            WarningCode::NoActuals,
            format!("No work actuals for {}", describe_period(basis)),
        ));
    }

    // Without actuals hourly pay is unknown, and a yearly actuals basis bills
    // zero months for every type.
    let billed_nothing = no_actuals
        && (profile.is_hourly() || matches!(basis, PayslipBasis::Actuals { .. }));
    let insufficient_data = billed_nothing
        || warnings
            .iter()
            .any(|w| w.code == WarningCode::MissingRateData);

    for warning in &warnings {
        warn!(
            staff_id = %profile.staff_id,
            code = ?warning.code,
            message = %warning.message,
            "Payslip computed with warning"
        );
    }

    info!(
        staff_id = %profile.staff_id,
        basis = basis.label(),
        total_gross = %payslip.total_gross,
        total_deductions = %payslip.total_deductions,
        net_salary = %payslip.net_salary,
        warnings = warnings.len(),
        "Payslip computed"
    );

    Ok(PayslipReport {
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        staff_id: profile.staff_id.clone(),
        basis,
        payslip,
        warnings,
        insufficient_data,
        metrics,
        monthly_breakdown,
        projection,
        audit_trace,
    })
}

fn year_end(year: i32) -> NaiveDate {
    YearMonth { year, month: 12 }.last_day()
}

fn describe_period(basis: PayslipBasis) -> String {
    match basis {
        PayslipBasis::Month { year, month } => format!("{year}-{month:02}"),
        other => other.year().to_string(),
    }
}
