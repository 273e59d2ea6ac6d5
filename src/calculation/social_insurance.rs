//! Social insurance contribution calculation functionality.
//!
//! Health insurance and pension are charged only to enrolled, non-hourly
//! staff, on their fixed monthly wage. Employment insurance is charged to
//! everyone: on the monthly wage for salaried and contract staff, and on the
//! period's gross pay for hourly staff.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::RateTableProvider;
use crate::models::{
    AuditStep, CalculationWarning, InsuranceKind, SocialInsurance, StaffCompensationProfile,
    WarningCode,
};

use super::rounding::percentage_of;

/// The result of a social insurance calculation.
#[derive(Debug, Clone)]
pub struct SocialInsuranceResult {
    /// The employee contributions.
    pub contributions: SocialInsurance,
    /// One warning per applicable insurance with no rate in force.
    pub warnings: Vec<CalculationWarning>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates employee social insurance contributions.
///
/// - Health and pension: `floor(monthly_base × pct / 100) × months_count`,
///   when `has_social_insurance` is set and the staff member is not hourly.
/// - Employment insurance: `floor(monthly_base × pct / 100) × months_count`
///   for salaried and contract staff, `floor(gross_pay × pct / 100)` for
///   hourly staff.
///
/// Rates are those in force on `as_of`. An applicable insurance with no
/// rate contributes zero and adds a [`WarningCode::MissingRateData`] warning.
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::calculate_social_insurance;
/// use payslip_engine::config::RateTables;
/// use payslip_engine::models::{EmploymentType, InsuranceKind, InsuranceRate, StaffCompensationProfile};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let profile = StaffCompensationProfile {
///     staff_id: "staff_001".to_string(),
///     employment_type: EmploymentType::Hourly,
///     monthly_salary: None,
///     hourly_rate: Some(Decimal::from(1_200)),
///     contract_fee: None,
///     commute_distance_km: Decimal::ZERO,
///     has_social_insurance: true,
/// };
/// let rates = RateTables {
///     insurance_rates: vec![InsuranceRate {
///         rate_type: InsuranceKind::EmploymentInsurance,
///         employee_percentage: Decimal::from(1),
///         effective_from: None,
///         effective_to: None,
///     }],
///     ..RateTables::default()
/// };
/// let as_of = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
///
/// let result = calculate_social_insurance(&profile, Decimal::from(96_000), 1, &rates, as_of, 1);
/// assert_eq!(result.contributions.health, Decimal::ZERO);
/// assert_eq!(result.contributions.employment, Decimal::from(960));
/// ```
pub fn calculate_social_insurance(
    profile: &StaffCompensationProfile,
    gross_pay: Decimal,
    months_count: u32,
    rates: &impl RateTableProvider,
    as_of: NaiveDate,
    step_number: u32,
) -> SocialInsuranceResult {
    let months = Decimal::from(months_count);
    let monthly_base = profile.monthly_base();
    let enrolled = profile.has_social_insurance && !profile.is_hourly();
    let mut warnings = Vec::new();

    let mut lookup = |kind: InsuranceKind| -> Option<Decimal> {
        let pct = rates
            .insurance_rate(kind, as_of)
            .map(|r| r.employee_percentage);
        if pct.is_none() {
            warnings.push(CalculationWarning::new(
                WarningCode::MissingRateData,
                format!("No {} rate in force on {}; contribution set to zero", kind.code(), as_of),
            ));
        }
        pct
    };

    let (health_pct, pension_pct) = if enrolled {
        (
            lookup(InsuranceKind::HealthInsurance),
            lookup(InsuranceKind::Pension),
        )
    } else {
        (None, None)
    };
    let employment_pct = lookup(InsuranceKind::EmploymentInsurance);

    let monthly_contribution =
        |pct: Option<Decimal>| pct.map_or(Decimal::ZERO, |p| percentage_of(monthly_base, p) * months);

    let health = monthly_contribution(health_pct);
    let pension = monthly_contribution(pension_pct);
    let employment = if profile.is_hourly() {
        employment_pct.map_or(Decimal::ZERO, |p| percentage_of(gross_pay, p))
    } else {
        monthly_contribution(employment_pct)
    };

    let contributions = SocialInsurance::new(health, pension, employment);

    let employment_base = if profile.is_hourly() {
        format!("gross ¥{}", gross_pay.normalize())
    } else {
        format!("¥{}/month × {} months", monthly_base.normalize(), months_count)
    };
    let reasoning = if enrolled {
        format!(
            "Health ¥{} + pension ¥{} on ¥{}/month × {} months; employment ¥{} on {}; total ¥{}",
            health.normalize(),
            pension.normalize(),
            monthly_base.normalize(),
            months_count,
            employment.normalize(),
            employment_base,
            contributions.total.normalize()
        )
    } else {
        format!(
            "Not enrolled in health insurance and pension; employment ¥{} on {}",
            employment.normalize(),
            employment_base
        )
    };

    let pct_json = |pct: Option<Decimal>| pct.map(|p| p.normalize().to_string());
    let audit_step = AuditStep {
        step_number,
        rule_id: "social_insurance".to_string(),
        rule_name: "Social Insurance".to_string(),
        input: serde_json::json!({
            "employment_type": profile.employment_type.code(),
            "has_social_insurance": profile.has_social_insurance,
            "monthly_base": monthly_base.normalize().to_string(),
            "gross_pay": gross_pay.normalize().to_string(),
            "months_count": months_count,
            "as_of": as_of.to_string(),
            "health_percentage": pct_json(health_pct),
            "pension_percentage": pct_json(pension_pct),
            "employment_percentage": pct_json(employment_pct)
        }),
        output: serde_json::json!({
            "health": health.normalize().to_string(),
            "pension": pension.normalize().to_string(),
            "employment": employment.normalize().to_string(),
            "total": contributions.total.normalize().to_string()
        }),
        reasoning,
    };

    SocialInsuranceResult {
        contributions,
        warnings,
        audit_step,
    }
}
