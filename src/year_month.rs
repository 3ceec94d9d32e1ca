// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Year-month, such as a card expiry date: `2007-12`.

use crate::clock::Clock;
use crate::date::{two_digits, LocalDate};
use crate::error::{Error, Result};
use crate::month::Month;
use crate::year::{is_leap_year, split_iso_year, write_iso_year, Year};
use std::fmt;
use std::str::FromStr;

/// A year and month-of-year in the ISO calendar.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    pub fn of(year: i32, month: i32) -> Result<Self> {
        Self::of_month(year, Month::of(month)?)
    }

    pub fn of_month(year: i32, month: Month) -> Result<Self> {
        Ok(Self {
            year: Year::check(year as i64)?,
            month,
        })
    }

    pub(crate) const fn from_parts(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// Current year-month according to `clock`.
    pub fn now(clock: &Clock) -> Result<Self> {
        Ok(LocalDate::now(clock)?.into())
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

    pub fn is_valid_day(&self, day: i32) -> bool {
        day >= 1 && day <= self.length_of_month() as i32
    }

    pub fn at_day(&self, day: i32) -> Result<LocalDate> {
        LocalDate::of_month(self.year, self.month, day)
    }

    pub fn at_end_of_month(&self) -> LocalDate {
        LocalDate::from_parts(self.year, self.month, self.length_of_month())
    }

    pub fn with_year(&self, year: i32) -> Result<Self> {
        Self::of_month(year, self.month)
    }

    pub fn with_month(&self, month: i32) -> Result<Self> {
        Ok(Self {
            year: self.year,
            month: Month::of(month)?,
        })
    }

    pub fn plus_years(&self, years: i64) -> Result<Self> {
        if years == 0 {
            return Ok(*self);
        }
        let year = (self.year as i64)
            .checked_add(years)
            .ok_or(Error::Overflow("YearMonth::plus_years"))?;
        Ok(Self {
            year: Year::check(year)?,
            month: self.month,
        })
    }

    pub fn plus_months(&self, months: i64) -> Result<Self> {
        if months == 0 {
            return Ok(*self);
        }
        let count = self.year as i64 * 12 + self.month.value() as i64 - 1;
        let calc = count
            .checked_add(months)
            .ok_or(Error::Overflow("YearMonth::plus_months"))?;
        Ok(Self {
            year: Year::check(calc.div_euclid(12))?,
            month: Month::of(calc.rem_euclid(12) as i32 + 1)?,
        })
    }

    pub fn minus_years(&self, years: i64) -> Result<Self> {
        let years = years
            .checked_neg()
            .ok_or(Error::Overflow("YearMonth::minus_years"))?;
        self.plus_years(years)
    }

    pub fn minus_months(&self, months: i64) -> Result<Self> {
        let months = months
            .checked_neg()
            .ok_or(Error::Overflow("YearMonth::minus_months"))?;
        self.plus_months(months)
    }

    pub fn is_after(&self, other: &YearMonth) -> bool {
        self > other
    }

    pub fn is_before(&self, other: &YearMonth) -> bool {
        self < other
    }
}

impl From<LocalDate> for YearMonth {
    fn from(date: LocalDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_iso_year(f, self.year)?;
        write!(f, "-{:02}", self.month.value())
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parse `yyyy-MM` with the ISO year rules of [`Year`].
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::parse(s, "Text cannot be parsed to a YearMonth");
        let (year, rest) = split_iso_year(s).ok_or_else(invalid)?;
        let rest = rest.as_bytes();
        if rest.len() != 3 || rest[0] != b'-' {
            return Err(invalid());
        }
        let month = two_digits(&rest[1..3]).ok_or_else(invalid)?;
        let year = Year::check(year)
            .map_err(|e| e.context(format!("Text '{s}' could not be parsed")))?;
        Self::of(year, month).map_err(|e| e.context(format!("Text '{s}' could not be parsed")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(y: i32, m: i32) -> YearMonth {
        YearMonth::of(y, m).unwrap()
    }

    #[test]
    fn lengths() {
        assert_eq!(ym(2012, 2).length_of_month(), 29);
        assert_eq!(ym(2011, 2).length_of_month(), 28);
        assert_eq!(ym(2011, 2).length_of_year(), 365);
        assert!(ym(2012, 2).is_valid_day(29));
        assert!(!ym(2011, 2).is_valid_day(29));
        assert!(!ym(2011, 2).is_valid_day(0));
    }

    #[test]
    fn at_day_and_end() {
        assert_eq!(ym(2012, 2).at_end_of_month(), LocalDate::of(2012, 2, 29).unwrap());
        assert_eq!(ym(2012, 4).at_day(30).unwrap(), LocalDate::of(2012, 4, 30).unwrap());
        assert!(ym(2012, 4).at_day(31).unwrap_err().is_range());
    }

    #[test]
    fn arithmetic() {
        assert_eq!(ym(2012, 11).plus_months(3).unwrap(), ym(2013, 2));
        assert_eq!(ym(2012, 1).minus_months(1).unwrap(), ym(2011, 12));
        assert_eq!(ym(2012, 1).plus_months(-25).unwrap(), ym(2009, 12));
        assert_eq!(ym(2012, 6).plus_years(-2013).unwrap(), ym(-1, 6));
        assert!(ym(Year::MAX_VALUE, 12).plus_months(1).unwrap_err().is_range());
        assert!(ym(2012, 1).plus_months(i64::MAX).unwrap_err().is_overflow());
    }

    #[test]
    fn with_fields() {
        assert_eq!(ym(2012, 6).with_year(1999).unwrap(), ym(1999, 6));
        assert_eq!(ym(2012, 6).with_month(1).unwrap(), ym(2012, 1));
        assert!(ym(2012, 6).with_month(13).unwrap_err().is_range());
    }

    #[test]
    fn ordering() {
        assert!(ym(2011, 12) < ym(2012, 1));
        assert!(ym(2012, 2).is_after(&ym(2012, 1)));
        assert!(ym(-1, 12).is_before(&ym(0, 1)));
    }

    #[test]
    fn text_roundtrip() {
        for (value, text) in [
            (ym(2007, 12), "2007-12"),
            (ym(-5, 1), "-0005-01"),
            (ym(10_000, 3), "+10000-03"),
        ] {
            assert_eq!(value.to_string(), text);
            assert_eq!(text.parse::<YearMonth>().unwrap(), value);
        }
        assert!("2007-13".parse::<YearMonth>().unwrap_err().is_range());
        assert!("2007-1".parse::<YearMonth>().unwrap_err().is_parse());
    }
}
