//! Batch payslip computation.

use tracing::{info, warn};

use crate::config::{EngineSettings, RateTableProvider};
use crate::error::EngineError;
use crate::models::{PayslipBasis, PayslipReport, StaffCompensationProfile, WorkActualSource};

use super::assembler::compute_payslip;

/// A staff member whose payslip could not be computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffFailure {
    /// The staff member.
    pub staff_id: String,
    /// Why the computation failed.
    pub error: EngineError,
}

/// The outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Reports for every staff member that computed, in input order.
    pub reports: Vec<PayslipReport>,
    /// Staff members that failed, in input order.
    pub failures: Vec<StaffFailure>,
}

impl BatchOutcome {
    /// Returns the report for a staff member, if it computed.
    pub fn report_for(&self, staff_id: &str) -> Option<&PayslipReport> {
        self.reports.iter().find(|r| r.staff_id == staff_id)
    }
}

/// Computes payslips for many staff members.
///
/// Actuals are fetched per staff member from `actual_source`. A failure for
/// one staff member is recorded in [`BatchOutcome::failures`] and the run
/// continues with the next.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use payslip_engine::config::{EngineSettings, RateTables};
/// use payslip_engine::engine::compute_batch;
/// use payslip_engine::models::{
///     EmploymentType, PayslipBasis, StaffCompensationProfile, WorkPeriodActual,
/// };
/// use rust_decimal::Decimal;
///
/// let profile = |id: &str, employment_type: EmploymentType| StaffCompensationProfile {
///     staff_id: id.to_string(),
///     employment_type,
///     monthly_salary: Some(Decimal::from(300_000)),
///     hourly_rate: None,
///     contract_fee: None,
///     commute_distance_km: Decimal::ZERO,
///     has_social_insurance: false,
/// };
/// let profiles = vec![
///     profile("staff_001", EmploymentType::Salaried),
///     profile("staff_002", EmploymentType::from("intern")),
/// ];
/// let actuals: HashMap<String, Vec<WorkPeriodActual>> = HashMap::new();
///
/// let outcome = compute_batch(
///     &profiles,
///     &actuals,
///     &RateTables::default(),
///     PayslipBasis::AnnualProjection { year: 2024 },
///     EngineSettings::default(),
/// );
///
/// assert_eq!(outcome.reports.len(), 1);
/// assert_eq!(outcome.failures[0].staff_id, "staff_002");
/// ```
pub fn compute_batch(
    profiles: &[StaffCompensationProfile],
    actual_source: &impl WorkActualSource,
    rates: &impl RateTableProvider,
    basis: PayslipBasis,
    settings: EngineSettings,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for profile in profiles {
        let records = actual_source.actuals_for(&profile.staff_id);

        match compute_payslip(profile, &records, rates, basis, settings) {
            Ok(report) => outcome.reports.push(report),
            Err(error) => {
                warn!(
                    staff_id = %profile.staff_id,
                    error = %error,
                    "Payslip computation failed"
                );
                outcome.failures.push(StaffFailure {
                    staff_id: profile.staff_id.clone(),
                    error,
                });
            }
        }
    }

    info!(
        basis = basis.label(),
        staff = profiles.len(),
        computed = outcome.reports.len(),
        failed = outcome.failures.len(),
        "Batch completed"
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateTables;
    use crate::models::{EmploymentType, WorkPeriodActual};
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    fn create_profile(staff_id: &str, employment_type: EmploymentType) -> StaffCompensationProfile {
        StaffCompensationProfile {
            staff_id: staff_id.to_string(),
            employment_type,
            monthly_salary: Some(Decimal::from(300_000)),
            hourly_rate: Some(Decimal::from(1_000)),
            contract_fee: Some(Decimal::from(250_000)),
            commute_distance_km: Decimal::ZERO,
            has_social_insurance: true,
        }
    }

    fn actual(month: u32, hours: i64) -> WorkPeriodActual {
        WorkPeriodActual {
            year: 2024,
            month,
            days_worked: 10,
            hours_worked: Decimal::from(hours),
        }
    }

    /// BR-001: one failing staff member does not stop the batch
    #[test]
    fn test_failure_is_isolated() {
        let profiles = vec![
            create_profile("a", EmploymentType::Salaried),
            create_profile("b", EmploymentType::Unrecognized("intern".to_string())),
            create_profile("c", EmploymentType::Hourly),
        ];
        let mut actuals = HashMap::new();
        actuals.insert("c".to_string(), vec![actual(1, 80)]);

        let outcome = compute_batch(
            &profiles,
            &actuals,
            &RateTables::default(),
            PayslipBasis::Actuals { year: 2024 },
            EngineSettings::default(),
        );

        assert_eq!(outcome.reports.len(), 2);
        assert_eq!(outcome.reports[0].staff_id, "a");
        assert_eq!(outcome.reports[1].staff_id, "c");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].staff_id, "b");
        assert!(matches!(
            outcome.failures[0].error,
            EngineError::UnsupportedEmploymentType { .. }
        ));
    }

    /// BR-002: actuals are looked up per staff member
    #[test]
    fn test_actuals_are_per_staff() {
        let profiles = vec![
            create_profile("a", EmploymentType::Hourly),
            create_profile("b", EmploymentType::Hourly),
        ];
        let mut actuals = HashMap::new();
        actuals.insert("a".to_string(), vec![actual(1, 80)]);
        actuals.insert("b".to_string(), vec![actual(1, 40), actual(2, 40)]);

        let outcome = compute_batch(
            &profiles,
            &actuals,
            &RateTables::default(),
            PayslipBasis::Actuals { year: 2024 },
            EngineSettings::default(),
        );

        assert_eq!(
            outcome.report_for("a").unwrap().payslip.gross_salary,
            Decimal::from(80_000)
        );
        let b = outcome.report_for("b").unwrap();
        assert_eq!(b.payslip.gross_salary, Decimal::from(80_000));
        assert_eq!(b.metrics.months_worked, 2);
    }

    /// BR-003: an invalid actual fails only its own staff member
    #[test]
    fn test_invalid_actual_is_isolated() {
        let profiles = vec![
            create_profile("a", EmploymentType::Hourly),
            create_profile("b", EmploymentType::Hourly),
        ];
        let mut actuals = HashMap::new();
        actuals.insert("a".to_string(), vec![actual(13, 80)]);
        actuals.insert("b".to_string(), vec![actual(1, 80)]);

        let outcome = compute_batch(
            &profiles,
            &actuals,
            &RateTables::default(),
            PayslipBasis::Actuals { year: 2024 },
            EngineSettings::default(),
        );

        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.failures[0].staff_id, "a");
        assert!(matches!(
            outcome.failures[0].error,
            EngineError::InvalidActual { month: 13, .. }
        ));
    }

    /// BR-004: amounts too large to compute fail only their own staff member
    #[test]
    fn test_oversized_amounts_are_isolated() {
        let mut oversized_salary = create_profile("b", EmploymentType::Salaried);
        oversized_salary.monthly_salary = Some(Decimal::MAX / Decimal::from(4));
        let profiles = vec![
            create_profile("a", EmploymentType::Salaried),
            oversized_salary,
            create_profile("c", EmploymentType::Hourly),
            create_profile("d", EmploymentType::Hourly),
            create_profile("e", EmploymentType::Salaried),
        ];
        let mut actuals = HashMap::new();
        actuals.insert(
            "c".to_string(),
            vec![WorkPeriodActual {
                year: 2024,
                month: 1,
                days_worked: 10,
                hours_worked: Decimal::MAX,
            }],
        );
        actuals.insert(
            "d".to_string(),
            vec![
                WorkPeriodActual {
                    year: 2024,
                    month: 2,
                    days_worked: u32::MAX,
                    hours_worked: Decimal::from(8),
                },
                WorkPeriodActual {
                    year: 2024,
                    month: 2,
                    days_worked: 1,
                    hours_worked: Decimal::from(8),
                },
            ],
        );

        let outcome = compute_batch(
            &profiles,
            &actuals,
            &RateTables::default(),
            PayslipBasis::AnnualProjection { year: 2024 },
            EngineSettings::default(),
        );

        let computed: Vec<&str> = outcome.reports.iter().map(|r| r.staff_id.as_str()).collect();
        assert_eq!(computed, vec!["a", "e"]);
        assert_eq!(
            outcome.report_for("e").unwrap().payslip.gross_salary,
            Decimal::from(3_600_000)
        );

        let failed: Vec<&str> = outcome.failures.iter().map(|f| f.staff_id.as_str()).collect();
        assert_eq!(failed, vec!["b", "c", "d"]);
        assert!(matches!(
            outcome.failures[0].error,
            EngineError::InvalidProfile { ref field, .. } if field == "monthly_salary"
        ));
        assert!(matches!(
            outcome.failures[1].error,
            EngineError::ArithmeticOverflow { ref step, .. } if step == "annual_projection"
        ));
        assert!(matches!(
            outcome.failures[2].error,
            EngineError::InvalidActual { month: 2, .. }
        ));
    }

    #[test]
    fn test_empty_batch() {
        let actuals: HashMap<String, Vec<WorkPeriodActual>> = HashMap::new();

        let outcome = compute_batch(
            &[],
            &actuals,
            &RateTables::default(),
            PayslipBasis::Actuals { year: 2024 },
            EngineSettings::default(),
        );

        assert_eq!(outcome, BatchOutcome::default());
    }
}
