//! Income tax calculation functionality.
//!
//! Income tax is computed on the annual base pay (commute allowance
//! excluded) after the employment income deduction and the basic deduction,
//! using the progressive bracket table in force on the period end.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::RateTableProvider;
use crate::models::{AuditStep, CalculationWarning, TaxBracket, WarningCode};

use super::rounding::floor_yen;

/// The basic deduction every taxpayer receives.
pub const BASIC_DEDUCTION: Decimal = Decimal::from_parts(480_000, 0, 0, false, 0);

/// The result of an income tax calculation.
#[derive(Debug, Clone)]
pub struct IncomeTaxResult {
    /// Income tax in yen. Not clamped; may be negative.
    pub income_tax: Decimal,
    /// The taxable income the bracket was chosen for.
    pub taxable_income: Decimal,
    /// Set when the bracket table was empty or the fallback bracket was used
    /// for an amount inside a gap.
    pub warning: Option<CalculationWarning>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns the employment income deduction for an annual gross.
///
/// | Gross                   | Deduction              |
/// |-------------------------|------------------------|
/// | ≤ 1,625,000             | 550,000                |
/// | ≤ 1,800,000             | gross × 0.4 − 100,000  |
/// | ≤ 3,600,000             | gross × 0.3 + 80,000   |
/// | ≤ 6,600,000             | gross × 0.2 + 440,000  |
/// | ≤ 8,500,000             | gross × 0.1 + 1,100,000|
/// | above                   | 1,950,000              |
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::employment_income_deduction;
/// use rust_decimal::Decimal;
///
/// assert_eq!(employment_income_deduction(Decimal::from(3_600_000)), Decimal::from(1_160_000));
/// assert_eq!(employment_income_deduction(Decimal::from(9_000_000)), Decimal::from(1_950_000));
/// ```
pub fn employment_income_deduction(gross: Decimal) -> Decimal {
    let tenths = |n: u32| Decimal::new(i64::from(n), 1);

    if gross <= Decimal::from(1_625_000) {
        Decimal::from(550_000)
    } else if gross <= Decimal::from(1_800_000) {
        gross * tenths(4) - Decimal::from(100_000)
    } else if gross <= Decimal::from(3_600_000) {
        gross * tenths(3) + Decimal::from(80_000)
    } else if gross <= Decimal::from(6_600_000) {
        gross * tenths(2) + Decimal::from(440_000)
    } else if gross <= Decimal::from(8_500_000) {
        gross * tenths(1) + Decimal::from(1_100_000)
    } else {
        Decimal::from(1_950_000)
    }
}

/// Selects the bracket for a taxable amount.
///
/// Returns the first bracket with `income_from ≤ taxable ≤ income_to`.
/// When none contains the amount, falls back to the bracket with the
/// highest `income_from` and returns `true` as the second element. Returns
/// `None` only when `brackets` is empty.
pub fn select_bracket<'a>(
    brackets: &[&'a TaxBracket],
    taxable: Decimal,
) -> Option<(&'a TaxBracket, bool)> {
    if let Some(bracket) = brackets.iter().find(|b| b.contains(taxable)) {
        return Some((*bracket, false));
    }

    brackets
        .iter()
        .max_by_key(|b| b.income_from)
        .map(|bracket| (*bracket, true))
}

/// Calculates income tax on an annual base.
///
/// 1. `taxable = max(0, base − employment_income_deduction(base) − 480,000)`
/// 2. Select the bracket in force on `as_of` (see [`select_bracket`])
/// 3. `income_tax = floor(taxable × rate / 100 − deduction_amount)`
///
/// The result is not clamped; a bracket deduction larger than the computed
/// tax yields a negative amount.
///
/// An empty bracket table gives zero tax and a
/// [`WarningCode::MissingRateData`] warning. A taxable amount that falls in
/// a gap between brackets is taxed at the fallback bracket with a
/// [`WarningCode::BracketFallback`] warning.
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::calculate_income_tax;
/// use payslip_engine::config::RateTables;
/// use payslip_engine::models::TaxBracket;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let rates = RateTables {
///     tax_brackets: vec![TaxBracket {
///         income_from: Decimal::ZERO,
///         income_to: None,
///         tax_rate: Decimal::from(10),
///         deduction_amount: Decimal::ZERO,
///         effective_from: None,
///         effective_to: None,
///     }],
///     ..RateTables::default()
/// };
/// let as_of = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
///
/// // 3,000,000 − 980,000 − 480,000 = 1,540,000 taxable
/// let result = calculate_income_tax(Decimal::from(3_000_000), &rates, as_of, 1);
/// assert_eq!(result.taxable_income, Decimal::from(1_540_000));
/// assert_eq!(result.income_tax, Decimal::from(154_000));
/// ```
pub fn calculate_income_tax(
    gross_annual_base: Decimal,
    rates: &impl RateTableProvider,
    as_of: NaiveDate,
    step_number: u32,
) -> IncomeTaxResult {
    let eid = employment_income_deduction(gross_annual_base);
    let taxable_income = (gross_annual_base - eid - BASIC_DEDUCTION).max(Decimal::ZERO);

    let brackets = rates.brackets_in_force(as_of);
    let selected = select_bracket(&brackets, taxable_income);

    let (income_tax, warning, bracket_json, reasoning) = match selected {
        Some((bracket, fallback)) => {
            let tax = floor_yen(
                taxable_income * bracket.tax_rate / Decimal::ONE_HUNDRED
                    - bracket.deduction_amount,
            );

            let warning = (fallback && taxable_income < bracket.income_from).then(|| {
                CalculationWarning::new(
                    WarningCode::BracketFallback,
                    format!(
                        "Taxable income ¥{} is not covered by any bracket; taxed at the bracket from ¥{}",
                        taxable_income.normalize(),
                        bracket.income_from.normalize()
                    ),
                )
            });

            let bracket_json = serde_json::json!({
                "income_from": bracket.income_from.normalize().to_string(),
                "income_to": bracket.income_to.map(|t| t.normalize().to_string()),
                "tax_rate": bracket.tax_rate.normalize().to_string(),
                "deduction_amount": bracket.deduction_amount.normalize().to_string(),
                "fallback": fallback
            });

            let reasoning = format!(
                "¥{} − ¥{} employment deduction − ¥{} basic = ¥{} taxable; floor(¥{} × {}% − ¥{}) = ¥{}",
                gross_annual_base.normalize(),
                eid.normalize(),
                BASIC_DEDUCTION,
                taxable_income.normalize(),
                taxable_income.normalize(),
                bracket.tax_rate.normalize(),
                bracket.deduction_amount.normalize(),
                tax.normalize()
            );

            (tax, warning, bracket_json, reasoning)
        }
        None => {
            let message = format!(
                "No tax brackets in force on {}; income tax set to zero",
                as_of
            );
            (
                Decimal::ZERO,
                Some(CalculationWarning::new(
                    WarningCode::MissingRateData,
                    message.clone(),
                )),
                serde_json::Value::Null,
                message,
            )
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Income Tax".to_string(),
        input: serde_json::json!({
            "gross_annual_base": gross_annual_base.normalize().to_string(),
            "as_of": as_of.to_string(),
            "brackets_in_force": brackets.len()
        }),
        output: serde_json::json!({
            "employment_income_deduction": eid.normalize().to_string(),
            "basic_deduction": BASIC_DEDUCTION.to_string(),
            "taxable_income": taxable_income.normalize().to_string(),
            "bracket": bracket_json,
            "income_tax": income_tax.normalize().to_string()
        }),
        reasoning,
    };

    IncomeTaxResult {
        income_tax,
        taxable_income,
        warning,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateTables;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn year_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
    }

    fn bracket(from: &str, to: Option<&str>, rate: &str, deduction: &str) -> TaxBracket {
        TaxBracket {
            income_from: dec(from),
            income_to: to.map(dec),
            tax_rate: dec(rate),
            deduction_amount: dec(deduction),
            effective_from: None,
            effective_to: None,
        }
    }

    fn japanese_brackets() -> RateTables {
        RateTables {
            tax_brackets: vec![
                bracket("0", Some("1949000"), "5", "0"),
                bracket("1950000", Some("3299000"), "10", "97500"),
                bracket("3300000", Some("6949000"), "20", "427500"),
                bracket("6950000", Some("8999000"), "23", "636000"),
                bracket("9000000", Some("17999000"), "33", "1536000"),
                bracket("18000000", Some("39999000"), "40", "2796000"),
                bracket("40000000", None, "45", "4796000"),
            ],
            ..RateTables::default()
        }
    }

    fn rate_for(taxable: &str) -> (Decimal, bool) {
        let tables = japanese_brackets();
        let brackets = tables.brackets_in_force(year_end());
        let (bracket, fallback) = select_bracket(&brackets, dec(taxable)).unwrap();
        (bracket.tax_rate, fallback)
    }

    /// IT-001: employment income deduction at each tier boundary
    #[test]
    fn test_employment_income_deduction_tiers() {
        assert_eq!(employment_income_deduction(dec("0")), dec("550000"));
        assert_eq!(employment_income_deduction(dec("1625000")), dec("550000"));
        assert_eq!(employment_income_deduction(dec("1625001")), dec("550000.4"));
        assert_eq!(employment_income_deduction(dec("1800000")), dec("620000"));
        assert_eq!(employment_income_deduction(dec("3600000")), dec("1160000"));
        assert_eq!(employment_income_deduction(dec("6600000")), dec("1760000"));
        assert_eq!(employment_income_deduction(dec("8500000")), dec("1950000"));
        assert_eq!(employment_income_deduction(dec("8500001")), dec("1950000"));
    }

    /// IT-002: bracket bounds are inclusive on both ends
    #[test]
    fn test_bracket_switches_exactly_at_boundaries() {
        assert_eq!(rate_for("1949000"), (dec("5"), false));
        assert_eq!(rate_for("1950000"), (dec("10"), false));
        assert_eq!(rate_for("3299000"), (dec("10"), false));
        assert_eq!(rate_for("3300000"), (dec("20"), false));
        assert_eq!(rate_for("6949000"), (dec("20"), false));
        assert_eq!(rate_for("6950000"), (dec("23"), false));
        assert_eq!(rate_for("8999000"), (dec("23"), false));
        assert_eq!(rate_for("9000000"), (dec("33"), false));
        assert_eq!(rate_for("17999000"), (dec("33"), false));
        assert_eq!(rate_for("18000000"), (dec("40"), false));
        assert_eq!(rate_for("39999000"), (dec("40"), false));
        assert_eq!(rate_for("40000000"), (dec("45"), false));
    }

    /// IT-003: an amount inside a gap falls back to the top bracket
    #[test]
    fn test_gap_falls_back_to_top_bracket() {
        assert_eq!(rate_for("1949500"), (dec("45"), true));
        assert_eq!(rate_for("3299999"), (dec("45"), true));
    }

    /// IT-004: open-ended top bracket covers any large amount
    #[test]
    fn test_open_ended_top_bracket() {
        assert_eq!(rate_for("500000000"), (dec("45"), false));
    }

    /// IT-005: annual salary of 3,600,000
    #[test]
    fn test_income_tax_for_typical_salary() {
        // 3,600,000 − 1,160,000 − 480,000 = 1,960,000 taxable at 10% − 97,500
        let result = calculate_income_tax(dec("3600000"), &japanese_brackets(), year_end(), 4);

        assert_eq!(result.taxable_income, dec("1960000"));
        assert_eq!(result.income_tax, dec("98500"));
        assert!(result.warning.is_none());
        assert_eq!(result.audit_step.step_number, 4);
        assert_eq!(
            result.audit_step.output["bracket"]["tax_rate"]
                .as_str()
                .unwrap(),
            "10"
        );
    }

    /// IT-006: gross at or below the deductions is not taxed
    #[test]
    fn test_low_income_taxable_is_zero() {
        let result = calculate_income_tax(dec("1000000"), &japanese_brackets(), year_end(), 1);

        assert_eq!(result.taxable_income, Decimal::ZERO);
        assert_eq!(result.income_tax, Decimal::ZERO);
    }

    /// IT-007: negative tax from the bracket deduction is kept
    #[test]
    fn test_income_tax_is_not_clamped() {
        // 2,000,000 − 680,000 − 480,000 = 840,000 taxable
        let rates = RateTables {
            tax_brackets: vec![bracket("0", None, "10", "97500")],
            ..RateTables::default()
        };

        let result = calculate_income_tax(dec("2000000"), &rates, year_end(), 1);

        assert_eq!(result.taxable_income, dec("840000"));
        assert_eq!(result.income_tax, dec("-13500"));
    }

    /// IT-008: tax floors fractional results
    #[test]
    fn test_income_tax_floors() {
        // 1,700,001 − 580,000.4 − 480,000 = 640,000.6 taxable; × 5% = 32,000.03
        let result = calculate_income_tax(dec("1700001"), &japanese_brackets(), year_end(), 1);

        assert_eq!(result.taxable_income, dec("640000.6"));
        assert_eq!(result.income_tax, dec("32000"));
    }

    /// IT-009: empty table warns and taxes nothing
    #[test]
    fn test_empty_bracket_table_warns() {
        let result = calculate_income_tax(dec("5000000"), &RateTables::default(), year_end(), 1);

        assert_eq!(result.income_tax, Decimal::ZERO);
        let warning = result.warning.unwrap();
        assert_eq!(warning.code, WarningCode::MissingRateData);
        assert!(result.audit_step.output["bracket"].is_null());
    }

    /// IT-010: gap fallback warns
    #[test]
    fn test_gap_fallback_warns() {
        // Above 8.5M, taxable = g − 2,430,000; lands between 8,999,000 and 9,000,000
        let result = calculate_income_tax(dec("11429500"), &japanese_brackets(), year_end(), 1);

        assert_eq!(result.taxable_income, dec("8999500"));
        let warning = result.warning.unwrap();
        assert_eq!(warning.code, WarningCode::BracketFallback);
        // 8,999,500 × 45% − 4,796,000 = −746,225
        assert_eq!(result.income_tax, dec("-746225"));
    }

    /// IT-011: above a bounded top bracket uses it without a gap warning
    #[test]
    fn test_above_bounded_top_bracket_no_warning() {
        let rates = RateTables {
            tax_brackets: vec![bracket("0", Some("1000000"), "5", "0")],
            ..RateTables::default()
        };

        let result = calculate_income_tax(dec("20000000"), &rates, year_end(), 1);

        assert!(result.warning.is_none());
        // 17,570,000 × 5%
        assert_eq!(result.income_tax, dec("878500"));
    }

    /// IT-012: brackets outside their effective dates are not used
    #[test]
    fn test_expired_brackets_are_skipped() {
        let mut old = bracket("0", None, "50", "0");
        old.effective_to = NaiveDate::from_ymd_opt(2023, 12, 31);
        let rates = RateTables {
            tax_brackets: vec![old, bracket("0", None, "10", "0")],
            ..RateTables::default()
        };

        let result = calculate_income_tax(dec("3000000"), &rates, year_end(), 1);

        assert_eq!(result.income_tax, dec("154000"));
    }
}
