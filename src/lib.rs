//! Payslip Engine for Japanese Staff Payroll
//!
//! This crate computes itemized payslips from a staff member's employment
//! terms and monthly work actuals: gross pay, commute allowance, social
//! insurance, progressive income tax, resident tax and net salary, with an
//! optional full-year projection of partial-year actuals.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
