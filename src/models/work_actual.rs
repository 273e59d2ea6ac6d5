//! Worked-period actuals.
//!
//! This module contains the [`WorkPeriodActual`] record supplied by the
//! payroll aggregation API, the [`WorkActuals`] collection keyed uniquely by
//! [`YearMonth`], and the [`WorkActualSource`] trait through which a batch
//! run fetches actuals per staff member.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A calendar month, used as the unique key of a worked-period actual.
///
/// Orders chronologically and displays as `YYYY-MM`.
///
/// # Example
///
/// ```
/// use payslip_engine::models::YearMonth;
///
/// let key = YearMonth::new(2024, 3).unwrap();
/// assert_eq!(key.to_string(), "2024-03");
/// assert_eq!(key.last_day().to_string(), "2024-03-31");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    /// The calendar year.
    pub year: i32,
    /// The calendar month (1-12).
    pub month: u32,
}

impl YearMonth {
    /// Creates a key, returning `None` when the month is outside 1-12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Returns the first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Returns the last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Days and hours worked by one staff member in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPeriodActual {
    /// The calendar year.
    pub year: i32,
    /// The calendar month (1-12).
    pub month: u32,
    /// Number of days worked in the month.
    pub days_worked: u32,
    /// Number of hours worked in the month.
    pub hours_worked: Decimal,
}

impl WorkPeriodActual {
    /// Returns the month key of this record.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidActual`] when the month is outside 1-12
    /// or the hours are negative.
    pub fn key(&self) -> EngineResult<YearMonth> {
        let key = YearMonth::new(self.year, self.month).ok_or_else(|| {
            EngineError::InvalidActual {
                year: self.year,
                month: self.month,
                message: "month must be between 1 and 12".to_string(),
            }
        })?;

        if self.hours_worked.is_sign_negative() && !self.hours_worked.is_zero() {
            return Err(EngineError::InvalidActual {
                year: self.year,
                month: self.month,
                message: "hours_worked must not be negative".to_string(),
            });
        }

        Ok(key)
    }
}

/// A sparse set of worked-period actuals for one staff member.
///
/// Each month appears at most once. Records that share a month are summed
/// when the collection is built, the same way per-payroll rows are folded
/// into a monthly summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkActuals {
    months: BTreeMap<YearMonth, WorkPeriodActual>,
}

impl WorkActuals {
    /// Builds the collection from raw records.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidActual`] for the first record with an
    /// invalid month or negative hours, or whose month total no longer fits
    /// once duplicate records are summed.
    ///
    /// # Examples
    ///
    /// ```
    /// use payslip_engine::models::{WorkActuals, WorkPeriodActual};
    /// use rust_decimal::Decimal;
    ///
    /// let actuals = WorkActuals::from_records(&[
    ///     WorkPeriodActual { year: 2024, month: 1, days_worked: 10, hours_worked: Decimal::from(80) },
    ///     WorkPeriodActual { year: 2024, month: 1, days_worked: 5, hours_worked: Decimal::from(40) },
    ///     WorkPeriodActual { year: 2024, month: 5, days_worked: 20, hours_worked: Decimal::from(160) },
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(actuals.months_in_year(2024), 2);
    /// assert_eq!(actuals.total_days(2024), Some(35));
    /// ```
    pub fn from_records(records: &[WorkPeriodActual]) -> EngineResult<Self> {
        let mut months: BTreeMap<YearMonth, WorkPeriodActual> = BTreeMap::new();

        for record in records {
            let key = record.key()?;
            match months.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(record.clone());
                }
                Entry::Occupied(mut slot) => {
                    let overflow = || EngineError::InvalidActual {
                        year: record.year,
                        month: record.month,
                        message: "month total overflows when summing duplicate records"
                            .to_string(),
                    };
                    let existing = slot.get_mut();
                    existing.days_worked = existing
                        .days_worked
                        .checked_add(record.days_worked)
                        .ok_or_else(overflow)?;
                    existing.hours_worked = existing
                        .hours_worked
                        .checked_add(record.hours_worked)
                        .ok_or_else(overflow)?;
                }
            }
        }

        Ok(Self { months })
    }

    /// Returns the actual for a month, if present.
    pub fn get(&self, key: YearMonth) -> Option<&WorkPeriodActual> {
        self.months.get(&key)
    }

    /// Iterates over all actuals in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &WorkPeriodActual> {
        self.months.values()
    }

    /// Iterates over the actuals of one year in chronological order.
    pub fn for_year(&self, year: i32) -> impl Iterator<Item = &WorkPeriodActual> {
        self.months
            .range(YearMonth { year, month: 1 }..=YearMonth { year, month: 12 })
            .map(|(_, actual)| actual)
    }

    /// Number of months present for a year.
    pub fn months_in_year(&self, year: i32) -> u32 {
        self.for_year(year).count() as u32
    }

    /// Total days worked in a year, or `None` if the sum overflows.
    pub fn total_days(&self, year: i32) -> Option<u32> {
        self.for_year(year)
            .try_fold(0_u32, |total, a| total.checked_add(a.days_worked))
    }

    /// Total hours worked in a year, or `None` if the sum overflows.
    pub fn total_hours(&self, year: i32) -> Option<Decimal> {
        self.for_year(year)
            .try_fold(Decimal::ZERO, |total, a| total.checked_add(a.hours_worked))
    }

    /// Returns true if no months are present at all.
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Supplies raw worked-period actuals per staff member.
///
/// Implemented by whatever aggregates shift records into monthly totals.
pub trait WorkActualSource {
    /// Returns every actual recorded for the staff member.
    fn actuals_for(&self, staff_id: &str) -> Vec<WorkPeriodActual>;
}

impl WorkActualSource for HashMap<String, Vec<WorkPeriodActual>> {
    fn actuals_for(&self, staff_id: &str) -> Vec<WorkPeriodActual> {
        self.get(staff_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn actual(year: i32, month: u32, days: u32, hours: &str) -> WorkPeriodActual {
        WorkPeriodActual {
            year,
            month,
            days_worked: days,
            hours_worked: dec(hours),
        }
    }

    #[test]
    fn test_year_month_rejects_out_of_range() {
        assert!(YearMonth::new(2024, 0).is_none());
        assert!(YearMonth::new(2024, 13).is_none());
        assert!(YearMonth::new(2024, 12).is_some());
    }

    #[test]
    fn test_year_month_last_day_handles_leap_and_december() {
        assert_eq!(
            YearMonth::new(2024, 2).unwrap().last_day(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            YearMonth::new(2023, 12).unwrap().last_day(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_year_month_orders_chronologically() {
        let dec_2023 = YearMonth::new(2023, 12).unwrap();
        let jan_2024 = YearMonth::new(2024, 1).unwrap();
        assert!(dec_2023 < jan_2024);
    }

    #[test]
    fn test_from_records_sums_duplicate_months() {
        let actuals = WorkActuals::from_records(&[
            actual(2024, 3, 8, "64.5"),
            actual(2024, 3, 2, "15.5"),
        ])
        .unwrap();

        let march = actuals.get(YearMonth::new(2024, 3).unwrap()).unwrap();
        assert_eq!(march.days_worked, 10);
        assert_eq!(march.hours_worked, dec("80.0"));
        assert_eq!(actuals.months_in_year(2024), 1);
    }

    #[test]
    fn test_for_year_excludes_other_years() {
        let actuals = WorkActuals::from_records(&[
            actual(2023, 12, 20, "160"),
            actual(2024, 1, 18, "144"),
            actual(2024, 5, 10, "80"),
            actual(2025, 1, 5, "40"),
        ])
        .unwrap();

        assert_eq!(actuals.months_in_year(2024), 2);
        assert_eq!(actuals.total_days(2024), Some(28));
        assert_eq!(actuals.total_hours(2024), Some(dec("224")));
        let months: Vec<u32> = actuals.for_year(2024).map(|a| a.month).collect();
        assert_eq!(months, vec![1, 5]);
    }

    #[test]
    fn test_from_records_rejects_invalid_month() {
        let result = WorkActuals::from_records(&[actual(2024, 13, 1, "8")]);

        match result {
            Err(EngineError::InvalidActual { year, month, .. }) => {
                assert_eq!(year, 2024);
                assert_eq!(month, 13);
            }
            other => panic!("Expected InvalidActual, got {:?}", other),
        }
    }

    #[test]
    fn test_from_records_rejects_negative_hours() {
        let result = WorkActuals::from_records(&[actual(2024, 2, 1, "-1")]);
        assert!(matches!(result, Err(EngineError::InvalidActual { .. })));
    }

    #[test]
    fn test_from_records_rejects_overflowing_duplicate_days() {
        let result = WorkActuals::from_records(&[
            actual(2024, 6, u32::MAX, "8"),
            actual(2024, 6, 1, "8"),
        ]);

        match result {
            Err(EngineError::InvalidActual { month, message, .. }) => {
                assert_eq!(month, 6);
                assert!(message.contains("overflows"));
            }
            other => panic!("Expected InvalidActual, got {:?}", other),
        }
    }

    #[test]
    fn test_total_days_overflow_across_months_is_none() {
        let actuals = WorkActuals::from_records(&[
            actual(2024, 1, u32::MAX, "8"),
            actual(2024, 2, 1, "8"),
        ])
        .unwrap();

        assert_eq!(actuals.total_days(2024), None);
        assert_eq!(actuals.total_hours(2024), Some(dec("16")));
    }

    #[test]
    fn test_empty_year_totals_are_zero() {
        let actuals = WorkActuals::default();
        assert!(actuals.is_empty());
        assert_eq!(actuals.months_in_year(2024), 0);
        assert_eq!(actuals.total_days(2024), Some(0));
        assert_eq!(actuals.total_hours(2024), Some(Decimal::ZERO));
    }

    #[test]
    fn test_hash_map_source_returns_empty_for_unknown_staff() {
        let mut source: HashMap<String, Vec<WorkPeriodActual>> = HashMap::new();
        source.insert("staff_001".to_string(), vec![actual(2024, 1, 20, "160")]);

        assert_eq!(source.actuals_for("staff_001").len(), 1);
        assert!(source.actuals_for("staff_999").is_empty());
    }
}
