//! Error types for the payslip engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that stops a single staff computation. Conditions
//! that only degrade one line item (a missing rate, a zero divisor) are not
//! errors; they are reported as [`CalculationWarning`](crate::models::CalculationWarning)s
//! on the resulting report.

use thiserror::Error;

/// The main error type for the payslip engine.
///
/// # Example
///
/// ```
/// use payslip_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/tax_brackets.yaml".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Configuration file not found: /missing/tax_brackets.yaml"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The staff member's employment type has no wage formula.
    #[error("Unsupported employment type '{employment_type}' for staff '{staff_id}'")]
    UnsupportedEmploymentType {
        /// The staff member being computed.
        staff_id: String,
        /// The employment type code as supplied by master data.
        employment_type: String,
    },

    /// A compensation profile contained an invalid value.
    #[error("Invalid profile field '{field}' for staff '{staff_id}': {message}")]
    InvalidProfile {
        /// The staff member being computed.
        staff_id: String,
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A worked-period actual contained an invalid value.
    #[error("Invalid work actual for {year}-{month:02}: {message}")]
    InvalidActual {
        /// The year of the offending record.
        year: i32,
        /// The month of the offending record.
        month: u32,
        /// A description of what made the record invalid.
        message: String,
    },

    /// An amount grew past what the engine can represent.
    #[error("Arithmetic overflow in step '{step}' for staff '{staff_id}'")]
    ArithmeticOverflow {
        /// The staff member being computed.
        staff_id: String,
        /// The rule id of the step that overflowed.
        step: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
