//! Yen rounding and guarded division helpers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to the nearest yen, halves away from zero.
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::round_yen;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_yen(Decimal::from_str("2500.5").unwrap()), Decimal::from(2501));
/// assert_eq!(round_yen(Decimal::from_str("2500.49").unwrap()), Decimal::from(2500));
/// ```
pub fn round_yen(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Truncates toward negative infinity to whole yen.
pub fn floor_yen(amount: Decimal) -> Decimal {
    amount.floor()
}

/// Applies a percentage and floors the result to whole yen.
///
/// `floor(base * percentage / 100)`
pub fn percentage_of(base: Decimal, percentage: Decimal) -> Decimal {
    floor_yen(base * percentage / Decimal::ONE_HUNDRED)
}

/// Divides, returning `None` when the divisor is zero.
pub fn guarded_div(numerator: Decimal, divisor: Decimal) -> Option<Decimal> {
    numerator.checked_div(divisor)
}
