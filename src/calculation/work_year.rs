//! Work year resolution.
//!
//! Work years are one-year periods anchored to the employee's hire-date
//! anniversary and indexed from 0. Everything here is pure date arithmetic.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// The work year a reference date falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkYear {
    /// Zero-based work year index.
    pub work_year: u32,
    /// Calendar year in which this work year's anniversary falls.
    pub leave_year: i32,
}

/// Resolves the work year containing `reference_date`.
///
/// The year difference is reduced by one when the reference date falls
/// strictly before this year's anniversary. Dates before the hire date
/// resolve to work year 0.
///
/// # Examples
///
/// ```
/// use leave_engine::calculation::resolve_work_year;
/// use chrono::NaiveDate;
///
/// let hire = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
///
/// let before = resolve_work_year(hire, NaiveDate::from_ymd_opt(2024, 10, 31).unwrap());
/// assert_eq!(before.work_year, 0);
/// assert_eq!(before.leave_year, 2024);
///
/// let on = resolve_work_year(hire, NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());
/// assert_eq!(on.work_year, 1);
/// assert_eq!(on.leave_year, 2025);
/// ```
pub fn resolve_work_year(hire_date: NaiveDate, reference_date: NaiveDate) -> WorkYear {
    let mut years_diff = reference_date.year() - hire_date.year();
    if (reference_date.month(), reference_date.day()) < (hire_date.month(), hire_date.day()) {
        years_diff -= 1;
    }

    let work_year = u32::try_from(years_diff).unwrap_or(0);
    WorkYear {
        work_year,
        leave_year: leave_year_for(hire_date, work_year),
    }
}

/// Returns the leave year of a work year: `max(hire_year + wy + 1, hire_year + 1)`.
///
/// Saturates at `i32::MAX` instead of overflowing for absurd work years.
pub fn leave_year_for(hire_date: NaiveDate, work_year: u32) -> i32 {
    let hire_year = hire_date.year();
    let offset = i32::try_from(work_year).unwrap_or(i32::MAX);
    let first = hire_year.saturating_add(1);
    hire_year.saturating_add(offset).saturating_add(1).max(first)
}

/// Returns the anniversary of `hire_date` in the given calendar year.
///
/// A 29 February hire date has its anniversary on 1 March in non-leap years,
/// which agrees with [`resolve_work_year`]'s month/day comparison.
pub fn anniversary_in(hire_date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, hire_date.month(), hire_date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// The calendar span of one work year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkYearPeriod {
    /// Zero-based work year index.
    pub work_year: u32,
    /// Calendar year of the closing anniversary.
    pub leave_year: i32,
    /// First day of the work year.
    pub start_date: NaiveDate,
    /// The next anniversary (exclusive).
    pub end_date: NaiveDate,
    /// True when the reference date lies inside the period.
    pub is_current: bool,
}

impl WorkYearPeriod {
    /// Whether `date` lies inside `[start_date, end_date)`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date < self.end_date
    }
}

/// Returns the period of a work year.
pub fn work_year_period(hire_date: NaiveDate, work_year: u32) -> Option<WorkYearPeriod> {
    let start_year = hire_date.year().checked_add(i32::try_from(work_year).ok()?)?;
    let start_date = anniversary_in(hire_date, start_year)?;
    let end_date = anniversary_in(hire_date, start_year.checked_add(1)?)?;

    Some(WorkYearPeriod {
        work_year,
        leave_year: leave_year_for(hire_date, work_year),
        start_date,
        end_date,
        is_current: false,
    })
}

/// Lists the work years from 0 up to the one after the current, most recent first.
///
/// # Examples
///
/// ```
/// use leave_engine::calculation::available_work_years;
/// use chrono::NaiveDate;
///
/// let hire = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
/// let today = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
///
/// let periods = available_work_years(hire, today);
/// let indexes: Vec<u32> = periods.iter().map(|p| p.work_year).collect();
/// assert_eq!(indexes, vec![2, 1, 0]);
/// assert!(periods[1].is_current);
/// ```
pub fn available_work_years(hire_date: NaiveDate, today: NaiveDate) -> Vec<WorkYearPeriod> {
    let current = resolve_work_year(hire_date, today).work_year;

    (0..=current.saturating_add(1))
        .rev()
        .filter_map(|wy| work_year_period(hire_date, wy))
        .map(|period| WorkYearPeriod {
            is_current: period.contains(today),
            ..period
        })
        .collect()
}

/// Anniversary information for an employee on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnniversaryInfo {
    /// The anchoring hire date.
    pub hire_date: NaiveDate,
    /// The work year `today` falls in.
    pub current_work_year: u32,
    /// The anniversary that closes the current work year.
    pub next_anniversary: NaiveDate,
    /// Days from `today` until `next_anniversary`.
    pub days_to_anniversary: i64,
}

/// Computes the anniversary information for `today`.
pub fn anniversary_info(hire_date: NaiveDate, today: NaiveDate) -> Option<AnniversaryInfo> {
    let current = resolve_work_year(hire_date, today).work_year;
    let period = work_year_period(hire_date, current)?;

    Some(AnniversaryInfo {
        hire_date,
        current_work_year: current,
        next_anniversary: period.end_date,
        days_to_anniversary: (period.end_date - today).num_days(),
    })
}
