// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Proleptic-Gregorian calendar date.
//!
//! [`LocalDate`] is the full `(year, month, day)` composite the partial types
//! ([`MonthDay`](crate::MonthDay), [`YearMonth`](crate::YearMonth),
//! [`Year`](crate::Year)) resolve into, and the reference target for
//! [`Period`](crate::Period) arithmetic.
//!
//! # Epoch days
//!
//! Dates convert to and from a continuous count of days relative to
//! 1970-01-01 ([`LocalDate::to_epoch_day`] / [`LocalDate::of_epoch_day`]).
//! The conversion works on a March-based year so the leap day falls at the
//! end of the computational year, and on 400-year cycles of 146 097 days for
//! dates before year 0.

use crate::clock::Clock;
use crate::day_of_week::DayOfWeek;
use crate::error::{Error, Result};
use crate::instant::Instant;
use crate::month::Month;
use crate::period::Period;
use crate::year::{is_leap_year, split_iso_year, write_iso_year, Year};
use crate::zone::ZoneId;
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Days in a 400-year Gregorian cycle.
const DAYS_PER_CYCLE: i64 = 146_097;

/// Days from 0000-01-01 to 1970-01-01.
const DAYS_0000_TO_1970: i64 = DAYS_PER_CYCLE * 5 - (30 * 365 + 7);

const SECONDS_PER_DAY: i64 = 86_400;

/// A date without time-of-day or zone, e.g. `2007-12-03`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDate {
    year: i32,
    month: Month,
    day: u8,
}

impl LocalDate {
    /// Smallest epoch day, `-999999999-01-01`.
    pub const MIN_EPOCH_DAY: i64 = -365_243_219_162;
    /// Largest epoch day, `+999999999-12-31`.
    pub const MAX_EPOCH_DAY: i64 = 365_241_780_471;

    /// 1970-01-01.
    pub const EPOCH: LocalDate = LocalDate {
        year: 1970,
        month: Month::January,
        day: 1,
    };

    /// A range error when the year, month or day is invalid, including a day
    /// past the end of the month.
    pub fn of(year: i32, month: i32, day: i32) -> Result<Self> {
        Self::of_month(year, Month::of(month)?, day)
    }

    pub fn of_month(year: i32, month: Month, day: i32) -> Result<Self> {
        Year::check(year as i64)?;
        if !(1..=31).contains(&day) {
            return Err(Error::field_range("DayOfMonth", day as i64, 1, 31));
        }
        let leap = is_leap_year(year as i64);
        if day > month.length(leap) as i32 {
            return Err(if day == 29 {
                Error::range(format!(
                    "Invalid date 'February 29' as '{year}' is not a leap year"
                ))
            } else {
                Error::range(format!("Invalid date '{month} {day}'"))
            });
        }
        Ok(Self {
            year,
            month,
            day: day as u8,
        })
    }

    /// Assemble already-validated fields.
    pub(crate) const fn from_parts(year: i32, month: Month, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Date from a year and a 1-based day-of-year.
    pub fn of_year_day(year: i32, day_of_year: i32) -> Result<Self> {
        Year::check(year as i64)?;
        if !(1..=366).contains(&day_of_year) {
            return Err(Error::field_range("DayOfYear", day_of_year as i64, 1, 366));
        }
        let leap = is_leap_year(year as i64);
        if day_of_year == 366 && !leap {
            return Err(Error::range(format!(
                "Invalid date 'DayOfYear 366' as '{year}' is not a leap year"
            )));
        }
        let month = Month::from_day_of_year(day_of_year as u16, leap);
        let day = day_of_year - month.first_day_of_year(leap) as i32 + 1;
        Ok(Self {
            year,
            month,
            day: day as u8,
        })
    }

    /// Date for a count of days since 1970-01-01.
    pub fn of_epoch_day(epoch_day: i64) -> Result<Self> {
        if !(Self::MIN_EPOCH_DAY..=Self::MAX_EPOCH_DAY).contains(&epoch_day) {
            return Err(Error::field_range(
                "EpochDay",
                epoch_day,
                Self::MIN_EPOCH_DAY,
                Self::MAX_EPOCH_DAY,
            ));
        }
        // Shift to a March-based year starting at 0000-03-01.
        let mut zero_day = epoch_day + DAYS_0000_TO_1970 - 60;
        let mut adjust = 0;
        if zero_day < 0 {
            let adjust_cycles = (zero_day + 1) / DAYS_PER_CYCLE - 1;
            adjust = adjust_cycles * 400;
            zero_day += -adjust_cycles * DAYS_PER_CYCLE;
        }
        let mut year_est = (400 * zero_day + 591) / DAYS_PER_CYCLE;
        let mut doy_est =
            zero_day - (365 * year_est + year_est / 4 - year_est / 100 + year_est / 400);
        if doy_est < 0 {
            year_est -= 1;
            doy_est = zero_day - (365 * year_est + year_est / 4 - year_est / 100 + year_est / 400);
        }
        year_est += adjust;

        let march_doy0 = doy_est;
        let march_month0 = (march_doy0 * 5 + 2) / 153;
        let month = (march_month0 + 2) % 12 + 1;
        let day = march_doy0 - (march_month0 * 306 + 5) / 10 + 1;
        year_est += march_month0 / 10;

        Ok(Self {
            year: Year::check(year_est)?,
            month: Month::of(month as i32)?,
            day: day as u8,
        })
    }

    /// Current date according to `clock`, in the clock's zone.
    pub fn now(clock: &Clock) -> Result<Self> {
        Self::of_instant(clock.instant()?, clock.zone())
    }

    /// Local date of `instant` as observed in `zone`.
    pub fn of_instant(instant: Instant, zone: &ZoneId) -> Result<Self> {
        let offset = zone.offset_at(instant)?;
        let local_second = instant.timestamp() + offset.total_seconds() as i64;
        Self::of_epoch_day(local_second.div_euclid(SECONDS_PER_DAY))
    }

    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
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

    pub const fn day_of_year(&self) -> u16 {
        self.month.first_day_of_year(self.is_leap_year()) + self.day as u16 - 1
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        DayOfWeek::from_epoch_day(self.to_epoch_day())
    }

    #[inline]
    pub const fn is_leap_year(&self) -> bool {
        is_leap_year(self.year as i64)
    }

    pub const fn length_of_month(&self) -> u8 {
        self.month.length(self.is_leap_year())
    }

    pub const fn length_of_year(&self) -> u16 {
        if self.is_leap_year() {
            366
        } else {
            365
        }
    }

    /// Days since 1970-01-01 (negative before).
    pub fn to_epoch_day(&self) -> i64 {
        let y = self.year as i64;
        let m = self.month.value() as i64;
        let mut total = 365 * y;
        if y >= 0 {
            total += (y + 3) / 4 - (y + 99) / 100 + (y + 399) / 400;
        } else {
            total -= y / -4 - y / -100 + y / -400;
        }
        total += (367 * m - 362) / 12;
        total += self.day as i64 - 1;
        if m > 2 {
            total -= 1;
            if !self.is_leap_year() {
                total -= 1;
            }
        }
        total - DAYS_0000_TO_1970
    }

    /// Months since year 0, used for month arithmetic.
    #[inline]
    pub(crate) fn proleptic_month(&self) -> i64 {
        self.year as i64 * 12 + self.month.value() as i64 - 1
    }

    /// Build a date, clamping the day to the end of the month.
    fn resolve_previous_valid(year: i32, month: Month, day: u8) -> Self {
        let day = day.min(month.length(is_leap_year(year as i64)));
        Self { year, month, day }
    }

    /// Add years, clamping Feb 29 to Feb 28 in non-leap target years.
    pub fn plus_years(&self, years: i64) -> Result<Self> {
        if years == 0 {
            return Ok(*self);
        }
        let year = (self.year as i64)
            .checked_add(years)
            .ok_or(Error::Overflow("LocalDate::plus_years"))?;
        Ok(Self::resolve_previous_valid(
            Year::check(year)?,
            self.month,
            self.day,
        ))
    }

    /// Add months, clamping the day to the last valid day of the target month.
    pub fn plus_months(&self, months: i64) -> Result<Self> {
        if months == 0 {
            return Ok(*self);
        }
        let calc = self
            .proleptic_month()
            .checked_add(months)
            .ok_or(Error::Overflow("LocalDate::plus_months"))?;
        let year = Year::check(calc.div_euclid(12))?;
        let month = Month::of(calc.rem_euclid(12) as i32 + 1)?;
        Ok(Self::resolve_previous_valid(year, month, self.day))
    }

    pub fn plus_weeks(&self, weeks: i64) -> Result<Self> {
        let days = weeks
            .checked_mul(7)
            .ok_or(Error::Overflow("LocalDate::plus_weeks"))?;
        self.plus_days(days)
    }

    pub fn plus_days(&self, days: i64) -> Result<Self> {
        if days == 0 {
            return Ok(*self);
        }
        let epoch_day = self
            .to_epoch_day()
            .checked_add(days)
            .ok_or(Error::Overflow("LocalDate::plus_days"))?;
        Self::of_epoch_day(epoch_day)
    }

    pub fn minus_years(&self, years: i64) -> Result<Self> {
        self.plus_years(negate(years, "LocalDate::minus_years")?)
    }

    pub fn minus_months(&self, months: i64) -> Result<Self> {
        self.plus_months(negate(months, "LocalDate::minus_months")?)
    }

    pub fn minus_weeks(&self, weeks: i64) -> Result<Self> {
        self.plus_weeks(negate(weeks, "LocalDate::minus_weeks")?)
    }

    pub fn minus_days(&self, days: i64) -> Result<Self> {
        self.plus_days(negate(days, "LocalDate::minus_days")?)
    }

    /// Calendar period from `self` (inclusive) to `end` (exclusive).
    ///
    /// Whole months are counted first; when the day-of-month of `end` is
    /// smaller than that of `self` one month is given back and the remainder
    /// is counted in days, so the day component never takes the opposite sign
    /// of the month component.
    pub fn until(&self, end: &LocalDate) -> Result<Period> {
        let mut total_months = end.proleptic_month() - self.proleptic_month();
        let mut days = end.day as i32 - self.day as i32;
        if total_months > 0 && days < 0 {
            total_months -= 1;
            let calc = self.plus_months(total_months)?;
            days = (end.to_epoch_day() - calc.to_epoch_day()) as i32;
        } else if total_months < 0 && days > 0 {
            total_months += 1;
            days -= end.length_of_month() as i32;
        }
        let years =
            i32::try_from(total_months / 12).map_err(|_| Error::Overflow("LocalDate::until"))?;
        let months = (total_months % 12) as i32;
        Ok(Period::of(years, months, days))
    }
}

fn negate(amount: i64, operation: &'static str) -> Result<i64> {
    amount.checked_neg().ok_or(Error::Overflow(operation))
}

impl fmt::Display for LocalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_iso_year(f, self.year)?;
        write!(f, "-{:02}-{:02}", self.month.value(), self.day)
    }
}

impl FromStr for LocalDate {
    type Err = Error;

    /// Parse `yyyy-MM-dd` with the ISO year rules of [`Year`].
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::parse(s, "Text cannot be parsed to a LocalDate");
        let (year, rest) = split_iso_year(s).ok_or_else(invalid)?;
        let rest = rest.as_bytes();
        if rest.len() != 6 || rest[0] != b'-' || rest[3] != b'-' {
            return Err(invalid());
        }
        let month = two_digits(&rest[1..3]).ok_or_else(invalid)?;
        let day = two_digits(&rest[4..6]).ok_or_else(invalid)?;
        let year = Year::check(year)
            .map_err(|e| e.context(format!("Text '{s}' could not be parsed")))?;
        Self::of(year, month, day).map_err(|e| e.context(format!("Text '{s}' could not be parsed")))
    }
}

/// Two ASCII digits as a number.
pub(crate) fn two_digits(bytes: &[u8]) -> Option<i32> {
    match bytes {
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => {
            Some(((a - b'0') * 10 + (b - b'0')) as i32)
        }
        _ => None,
    }
}

impl From<NaiveDate> for LocalDate {
    fn from(date: NaiveDate) -> Self {
        // chrono's range is a strict subset of ours
        Self {
            year: date.year(),
            month: Month::ALL[date.month0() as usize],
            day: date.day() as u8,
        }
    }
}

impl TryFrom<LocalDate> for NaiveDate {
    type Error = Error;

    fn try_from(date: LocalDate) -> Result<Self> {
        NaiveDate::from_ymd_opt(date.year, date.month.value() as u32, date.day as u32)
            .ok_or_else(|| Error::range(format!("{date} is outside chrono's NaiveDate range")))
    }
}
