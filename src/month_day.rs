// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Month-day without a year, such as a birthday or an anniversary.
//!
//! A [`MonthDay`] is validated against the *longest* length of its month, so
//! `--02-29` is always constructible.  Whether it exists in a given year is a
//! separate question answered by [`MonthDay::is_valid_year`].

use crate::clock::Clock;
use crate::date::{two_digits, LocalDate};
use crate::error::{Error, Result};
use crate::month::Month;
use crate::year::{is_leap_year, Year};
use std::fmt;
use std::str::FromStr;

/// A month-of-year and day-of-month pair, e.g. `--12-03`.
///
/// Ordering follows the position of the day within a notional year.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: Month,
    day: u8,
}

impl MonthDay {
    /// A range error for an invalid month, or a day past the month's longest
    /// length (Feb 29 is accepted).
    pub fn of(month: i32, day: i32) -> Result<Self> {
        Self::of_month(Month::of(month)?, day)
    }

    pub fn of_month(month: Month, day: i32) -> Result<Self> {
        if !(1..=31).contains(&day) {
            return Err(Error::field_range("DayOfMonth", day as i64, 1, 31));
        }
        if day > month.max_length() as i32 {
            return Err(Error::range(format!(
                "Illegal value for DayOfMonth field, value {day} is not valid for month {month}"
            )));
        }
        Ok(Self {
            month,
            day: day as u8,
        })
    }

    /// Current month-day according to `clock`.
    pub fn now(clock: &Clock) -> Result<Self> {
        let today = LocalDate::now(clock)?;
        Ok(Self {
            month: today.month(),
            day: today.day_of_month(),
        })
    }

    #[inline]
    pub const fn month(&self) -> Month {
        self.month
    }

    #[inline]
    pub const fn month_value(&self) -> u8 {
        self.month.value()
    }

    #[inline]
    pub const fn day_of_month(&self) -> u8 {
        self.day
    }

    /// `false` only for February 29 in a non-leap year.
    pub const fn is_valid_year(&self, year: i32) -> bool {
        !(self.day == 29 && matches!(self.month, Month::February) && !is_leap_year(year as i64))
    }

    /// Same day in another month, clamped to that month's longest length.
    pub fn with_month(&self, month: i32) -> Result<Self> {
        Ok(self.with(Month::of(month)?))
    }

    /// Same day in `month`, clamped to that month's longest length.
    pub fn with(&self, month: Month) -> Self {
        if month == self.month {
            return *self;
        }
        Self {
            month,
            day: self.day.min(month.max_length()),
        }
    }

    pub fn with_day_of_month(&self, day: i32) -> Result<Self> {
        if day == self.day as i32 {
            return Ok(*self);
        }
        Self::of_month(self.month, day)
    }

    /// Combine with a year into a date.
    ///
    /// February 29 in a non-leap year becomes February 28 instead of failing,
    /// unlike [`LocalDate::of`].  Only the year range can fail.
    pub fn at_year(&self, year: i32) -> Result<LocalDate> {
        Year::check(year as i64)?;
        Ok(self.at_year_unchecked(year))
    }

    /// [`MonthDay::at_year`] for a year already known to be in range.
    pub(crate) fn at_year_unchecked(&self, year: i32) -> LocalDate {
        let day = if self.is_valid_year(year) { self.day } else { 28 };
        LocalDate::from_parts(year, self.month, day)
    }

    pub fn is_after(&self, other: &MonthDay) -> bool {
        self > other
    }

    pub fn is_before(&self, other: &MonthDay) -> bool {
        self < other
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{:02}-{:02}", self.month.value(), self.day)
    }
}

impl FromStr for MonthDay {
    type Err = Error;

    /// Parse the ISO `--MM-dd` form.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::parse(s, "Text cannot be parsed to a MonthDay");
        let bytes = s.as_bytes();
        if bytes.len() != 7 || &bytes[..2] != b"--" || bytes[4] != b'-' {
            return Err(invalid());
        }
        let month = two_digits(&bytes[2..4]).ok_or_else(invalid)?;
        let day = two_digits(&bytes[5..7]).ok_or_else(invalid)?;
        Self::of(month, day).map_err(|e| e.context(format!("Text '{s}' could not be parsed")))
    }
}

impl From<LocalDate> for MonthDay {
    fn from(date: LocalDate) -> Self {
        Self {
            month: date.month(),
            day: date.day_of_month(),
        }
    }
}
