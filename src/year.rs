// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Proleptic ISO year.
//!
//! Years run from [`Year::MIN_VALUE`] to [`Year::MAX_VALUE`]; year 0 is
//! 1 BCE.  The leap-year rule is the Gregorian one applied uniformly over the
//! whole range, see [`is_leap_year`].

use crate::clock::Clock;
use crate::date::LocalDate;
use crate::error::{Error, Result};
use crate::month::Month;
use crate::month_day::MonthDay;
use crate::year_month::YearMonth;
use std::fmt;
use std::str::FromStr;

/// Gregorian leap-year test: divisible by 4, except centuries not divisible
/// by 400.
#[inline]
pub const fn is_leap_year(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// A year in the ISO calendar.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(i32);

impl Year {
    pub const MIN_VALUE: i32 = -999_999_999;
    pub const MAX_VALUE: i32 = 999_999_999;

    pub fn of(year: i32) -> Result<Self> {
        Self::check(year as i64).map(Self)
    }

    /// Validate a year value coming out of wider arithmetic.
    pub(crate) fn check(year: i64) -> Result<i32> {
        if year < Self::MIN_VALUE as i64 || year > Self::MAX_VALUE as i64 {
            return Err(Error::field_range(
                "Year",
                year,
                Self::MIN_VALUE as i64,
                Self::MAX_VALUE as i64,
            ));
        }
        Ok(year as i32)
    }

    /// Same as the free function [`is_leap_year`].
    #[inline]
    pub const fn is_leap_year(year: i64) -> bool {
        is_leap_year(year)
    }

    /// Current year according to `clock`.
    pub fn now(clock: &Clock) -> Result<Self> {
        Ok(Self(LocalDate::now(clock)?.year()))
    }

    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn is_leap(self) -> bool {
        is_leap_year(self.0 as i64)
    }

    /// 365 or 366.
    pub const fn length(self) -> u16 {
        if self.is_leap() {
            366
        } else {
            365
        }
    }

    /// Whether `month_day` exists in this year (false only for Feb 29 in a
    /// non-leap year).
    pub fn is_valid_month_day(self, month_day: MonthDay) -> bool {
        month_day.is_valid_year(self.0)
    }

    pub fn at_day(self, day_of_year: i32) -> Result<LocalDate> {
        LocalDate::of_year_day(self.0, day_of_year)
    }

    pub fn at_month(self, month: Month) -> YearMonth {
        YearMonth::from_parts(self.0, month)
    }

    /// See [`MonthDay::at_year`] for the Feb 29 policy.
    pub fn at_month_day(self, month_day: MonthDay) -> LocalDate {
        month_day.at_year_unchecked(self.0)
    }

    pub fn plus_years(self, years: i64) -> Result<Self> {
        if years == 0 {
            return Ok(self);
        }
        let year = (self.0 as i64)
            .checked_add(years)
            .ok_or(Error::Overflow("Year::plus_years"))?;
        Self::check(year).map(Self)
    }

    pub fn minus_years(self, years: i64) -> Result<Self> {
        let years = years
            .checked_neg()
            .ok_or(Error::Overflow("Year::minus_years"))?;
        self.plus_years(years)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_iso_year(f, self.0)
    }
}

impl FromStr for Year {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match split_iso_year(s) {
            Some((year, "")) => Self::check(year)
                .map(Self)
                .map_err(|e| e.context(format!("Text '{s}' could not be parsed to a Year"))),
            _ => Err(Error::parse(s, "Text cannot be parsed to a Year")),
        }
    }
}

impl TryFrom<i32> for Year {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Self::of(value)
    }
}

impl From<Year> for i32 {
    fn from(year: Year) -> Self {
        year.0
    }
}

/// Write a year the ISO way: at least four digits, `-` for negative years
/// and `+` for years above 9999.
pub(crate) fn write_iso_year(f: &mut fmt::Formatter<'_>, year: i32) -> fmt::Result {
    let abs = year.unsigned_abs();
    if abs < 1000 {
        if year < 0 {
            write!(f, "-{abs:04}")
        } else {
            write!(f, "{abs:04}")
        }
    } else if year > 9999 {
        write!(f, "+{year}")
    } else {
        write!(f, "{year}")
    }
}

/// Split a leading ISO year off `text`.
///
/// Accepts exactly four digits unsigned, four or more with `-`, and more
/// than four with `+` (at most ten digits).  Returns the signed value and the
/// remaining text.
pub(crate) fn split_iso_year(text: &str) -> Option<(i64, &str)> {
    let bytes = text.as_bytes();
    let (sign, start) = match bytes.first()? {
        b'+' => (Some(1i64), 1),
        b'-' => (Some(-1i64), 1),
        _ => (None, 0),
    };
    let digits = bytes[start..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    let valid_width = match sign {
        None => digits == 4,
        Some(1) => digits > 4,
        Some(_) => digits >= 4,
    };
    if !valid_width || digits > 10 {
        return None;
    }
    let end = start + digits;
    let magnitude = text[start..end].parse::<i64>().ok()?;
    Some((sign.unwrap_or(1) * magnitude, &text[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_rules() {
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
        assert!(is_leap_year(1904));
        assert!(!is_leap_year(2001));
        assert!(is_leap_year(0));
        assert!(is_leap_year(-4));
        assert!(!is_leap_year(-100));
        assert!(is_leap_year(-400));
    }

    #[test]
    fn leap_cycle_is_400_years() {
        for y in -2_000..2_000i64 {
            assert_eq!(is_leap_year(y), is_leap_year(y + 400), "year {y}");
        }
    }

    #[test]
    fn bounds() {
        assert!(Year::of(Year::MAX_VALUE).is_ok());
        assert!(Year::of(Year::MIN_VALUE).is_ok());
        assert!(Year::of(Year::MAX_VALUE + 1).unwrap_err().is_range());
        assert!(Year::of(Year::MIN_VALUE - 1).unwrap_err().is_range());
    }

    #[test]
    fn plus_minus_years() {
        let y = Year::of(2010).unwrap();
        assert_eq!(y.plus_years(5).unwrap().value(), 2015);
        assert_eq!(y.minus_years(2011).unwrap().value(), -1);
        assert!(y.plus_years(i64::MAX).unwrap_err().is_overflow());
        assert!(y.minus_years(i64::MIN).unwrap_err().is_overflow());
        assert!(Year::of(Year::MAX_VALUE)
            .unwrap()
            .plus_years(1)
            .unwrap_err()
            .is_range());
    }

    #[test]
    fn lengths_and_month_days() {
        assert_eq!(Year::of(2000).unwrap().length(), 366);
        assert_eq!(Year::of(1900).unwrap().length(), 365);
        let feb29 = MonthDay::of(2, 29).unwrap();
        assert!(Year::of(2012).unwrap().is_valid_month_day(feb29));
        assert!(!Year::of(2011).unwrap().is_valid_month_day(feb29));
    }

    #[test]
    fn composes_into_dates() {
        let y = Year::of(2012).unwrap();
        assert_eq!(y.at_day(60).unwrap(), LocalDate::of(2012, 2, 29).unwrap());
        assert!(Year::of(2011).unwrap().at_day(366).unwrap_err().is_range());
        assert_eq!(y.at_month(Month::June), YearMonth::of(2012, 6).unwrap());
        let feb29 = MonthDay::of(2, 29).unwrap();
        assert_eq!(
            Year::of(2011).unwrap().at_month_day(feb29),
            LocalDate::of(2011, 2, 28).unwrap()
        );
    }

    #[test]
    fn text_roundtrip() {
        for (value, text) in [
            (2012, "2012"),
            (5, "0005"),
            (-5, "-0005"),
            (-2012, "-2012"),
            (12_345, "+12345"),
            (-12_345, "-12345"),
        ] {
            let year = Year::of(value).unwrap();
            assert_eq!(year.to_string(), text);
            assert_eq!(text.parse::<Year>().unwrap(), year);
        }
    }

    #[test]
    fn parse_rejects_bad_widths() {
        for text in ["", "12", "+2012", "12345", "20x2", "2012 ", "+12345678901"] {
            assert!(text.parse::<Year>().is_err(), "{text:?}");
        }
    }
}
