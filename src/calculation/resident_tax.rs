//! Resident tax calculation functionality.

use rust_decimal::Decimal;

use crate::models::AuditStep;

use super::rounding::floor_yen;

/// Flat resident tax rate (10%).
pub const RESIDENT_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// The result of a resident tax calculation.
#[derive(Debug, Clone)]
pub struct ResidentTaxResult {
    /// Resident tax in yen.
    pub resident_tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates resident tax as `floor(gross_annual_base × 0.10)`.
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::calculate_resident_tax;
/// use rust_decimal::Decimal;
///
/// let result = calculate_resident_tax(Decimal::from(1_234_567), 5);
/// assert_eq!(result.resident_tax, Decimal::from(123_456));
/// ```
pub fn calculate_resident_tax(gross_annual_base: Decimal, step_number: u32) -> ResidentTaxResult {
    let resident_tax = floor_yen(gross_annual_base * RESIDENT_TAX_RATE);

    let audit_step = AuditStep {
        step_number,
        rule_id: "resident_tax".to_string(),
        rule_name: "Resident Tax".to_string(),
        input: serde_json::json!({
            "gross_annual_base": gross_annual_base.normalize().to_string(),
            "rate": RESIDENT_TAX_RATE.normalize().to_string()
        }),
        output: serde_json::json!({
            "resident_tax": resident_tax.normalize().to_string()
        }),
        reasoning: format!(
            "floor(¥{} × {}) = ¥{}",
            gross_annual_base.normalize(),
            RESIDENT_TAX_RATE.normalize(),
            resident_tax.normalize()
        ),
    };

    ResidentTaxResult {
        resident_tax,
        audit_step,
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
    fn test_resident_tax_is_ten_percent() {
        let result = calculate_resident_tax(dec("3600000"), 1);
        assert_eq!(result.resident_tax, dec("360000"));
    }

    #[test]
    fn test_resident_tax_floors() {
        let result = calculate_resident_tax(dec("99999"), 1);
        assert_eq!(result.resident_tax, dec("9999"));
    }

    #[test]
    fn test_resident_tax_zero_base() {
        let result = calculate_resident_tax(Decimal::ZERO, 1);
        assert_eq!(result.resident_tax, Decimal::ZERO);
        assert_eq!(result.audit_step.rule_id, "resident_tax");
        assert_eq!(result.audit_step.input["rate"].as_str().unwrap(), "0.1");
    }
}
