//! Commute allowance calculation functionality.
//!
//! The default policy pays round-trip kilometres at a fixed rate over a fixed
//! number of working days per month. The band table policy pays the monthly
//! amount of the distance band instead.

use rust_decimal::Decimal;

use crate::config::CommutePolicy;
use crate::models::{AuditStep, CalculationWarning, CommuteAllowanceBand, WarningCode};

use super::rounding::floor_yen;

/// Yen paid per kilometre travelled.
pub const COMMUTE_YEN_PER_KM: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Working days per month assumed by the flat-rate formula.
pub const ASSUMED_WORK_DAYS_PER_MONTH: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// One-way distance is doubled for the round trip.
pub const ROUND_TRIP_FACTOR: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// The result of a commute allowance calculation.
#[derive(Debug, Clone)]
pub struct CommuteAllowanceResult {
    /// The allowance in yen.
    pub amount: Decimal,
    /// Set when the band table had no band for the distance.
    pub warning: Option<CalculationWarning>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the commute allowance for the billed months.
///
/// With [`CommutePolicy::FlatRate`] the allowance is
/// `km × 2 × ¥20 × 20 days × months_count`, where `km` is the one-way
/// distance in whole kilometres. The band table is not consulted.
///
/// With [`CommutePolicy::BandTable`] the allowance is the matching band's
/// `allowance_amount × months_count`. When no band matches, the allowance is
/// zero and a [`WarningCode::MissingRateData`] warning is returned.
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::calculate_commute_allowance;
/// use payslip_engine::config::CommutePolicy;
/// use rust_decimal::Decimal;
///
/// let result = calculate_commute_allowance(Decimal::from(5), 12, CommutePolicy::FlatRate, &[], 1);
/// assert_eq!(result.amount, Decimal::from(48_000));
/// assert!(result.warning.is_none());
/// ```
pub fn calculate_commute_allowance(
    distance_km: Decimal,
    months_count: u32,
    policy: CommutePolicy,
    bands: &[CommuteAllowanceBand],
    step_number: u32,
) -> CommuteAllowanceResult {
    let months = Decimal::from(months_count);

    match policy {
        CommutePolicy::FlatRate => {
            let whole_km = distance_km.trunc();
            let amount = floor_yen(
                whole_km
                    * ROUND_TRIP_FACTOR
                    * COMMUTE_YEN_PER_KM
                    * ASSUMED_WORK_DAYS_PER_MONTH
                    * months,
            );

            let audit_step = AuditStep {
                step_number,
                rule_id: "commute_allowance".to_string(),
                rule_name: "Commute Allowance".to_string(),
                input: serde_json::json!({
                    "policy": "flat_rate",
                    "distance_km": distance_km.normalize().to_string(),
                    "months_count": months_count
                }),
                output: serde_json::json!({
                    "amount": amount.normalize().to_string()
                }),
                reasoning: format!(
                    "{}km × {} × ¥{}/km × {} days × {} months = ¥{}",
                    whole_km.normalize(),
                    ROUND_TRIP_FACTOR,
                    COMMUTE_YEN_PER_KM,
                    ASSUMED_WORK_DAYS_PER_MONTH,
                    months_count,
                    amount.normalize()
                ),
            };

            CommuteAllowanceResult {
                amount,
                warning: None,
                audit_step,
            }
        }
        CommutePolicy::BandTable => {
            let band = bands.iter().find(|b| b.contains(distance_km));

            let (amount, warning, reasoning) = match band {
                Some(band) => {
                    let amount = band.allowance_amount * months;
                    let reasoning = format!(
                        "{}km falls in band {}-{}km: ¥{} × {} months = ¥{}",
                        distance_km.normalize(),
                        band.distance_from_km.normalize(),
                        band.distance_to_km.normalize(),
                        band.allowance_amount.normalize(),
                        months_count,
                        amount.normalize()
                    );
                    (amount, None, reasoning)
                }
                None => {
                    let message = format!(
                        "No commute allowance band covers {}km; allowance set to zero",
                        distance_km.normalize()
                    );
                    (
                        Decimal::ZERO,
                        Some(CalculationWarning::new(
                            WarningCode::MissingRateData,
                            message.clone(),
                        )),
                        message,
                    )
                }
            };

            let audit_step = AuditStep {
                step_number,
                rule_id: "commute_allowance".to_string(),
                rule_name: "Commute Allowance".to_string(),
                input: serde_json::json!({
                    "policy": "band_table",
                    "distance_km": distance_km.normalize().to_string(),
                    "months_count": months_count,
                    "bands": bands.len()
                }),
                output: serde_json::json!({
                    "amount": amount.normalize().to_string(),
                    "band_found": band.is_some()
                }),
                reasoning,
            };

            CommuteAllowanceResult {
                amount,
                warning,
                audit_step,
            }
        }
    }
}
