// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Month-of-year.
//!
//! [`Month`] is a closed enum of the twelve ISO months.  All calendrical
//! behaviour is driven by the lookup tables below, indexed by the variant's
//! ordinal (`value() - 1`), so the month-length and day-of-year rules can be
//! audited in one place.
//!
//! | Month | min | max | first day (non-leap) |
//! |-------|-----|-----|----------------------|
//! | January | 31 | 31 | 1 |
//! | February | 28 | 29 | 32 |
//! | March | 31 | 31 | 60 (+1 leap) |
//! | … | | | |
//! | December | 31 | 31 | 335 (+1 leap) |

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Shortest length of each month.
const MIN_LENGTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Longest length of each month.
const MAX_LENGTH: [u8; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// 1-based day-of-year of each month's first day in a non-leap year.
const FIRST_DAY_OF_YEAR: [u16; 12] = [1, 32, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

const NAMES: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// A month-of-year in the ISO calendar.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Obtain a month from its ISO number, 1 (January) to 12 (December).
    pub fn of(month: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::range(format!("Invalid value for MonthOfYear: {month}")));
        }
        Ok(Self::ALL[(month - 1) as usize])
    }

    #[inline]
    const fn ordinal(self) -> usize {
        self as usize
    }

    /// ISO month number, 1 to 12.
    #[inline]
    pub const fn value(self) -> u8 {
        self as u8 + 1
    }

    /// The month `months` later, wrapping around the end of the year.
    pub fn plus(self, months: i64) -> Self {
        let amount = (months % 12) as i32;
        Self::ALL[((self.ordinal() as i32 + amount + 12) % 12) as usize]
    }

    /// The month `months` earlier, wrapping around the start of the year.
    pub fn minus(self, months: i64) -> Self {
        self.plus(-(months % 12))
    }

    /// Length in days for a leap or non-leap year.
    #[inline]
    pub const fn length(self, leap_year: bool) -> u8 {
        if leap_year {
            MAX_LENGTH[self.ordinal()]
        } else {
            MIN_LENGTH[self.ordinal()]
        }
    }

    #[inline]
    pub const fn min_length(self) -> u8 {
        MIN_LENGTH[self.ordinal()]
    }

    #[inline]
    pub const fn max_length(self) -> u8 {
        MAX_LENGTH[self.ordinal()]
    }

    /// Day-of-year (1-based) on which this month starts.
    pub const fn first_day_of_year(self, leap_year: bool) -> u16 {
        let base = FIRST_DAY_OF_YEAR[self.ordinal()];
        if leap_year && self.ordinal() >= Month::March.ordinal() {
            base + 1
        } else {
            base
        }
    }

    /// January, April, July or October for the quarter containing `self`.
    pub const fn first_month_of_quarter(self) -> Self {
        Self::ALL[(self.ordinal() / 3) * 3]
    }

    /// Month containing the given 1-based day-of-year.
    pub(crate) fn from_day_of_year(day_of_year: u16, leap_year: bool) -> Self {
        let mut month = Month::December;
        for candidate in Self::ALL {
            if candidate.first_day_of_year(leap_year) > day_of_year {
                break;
            }
            month = candidate;
        }
        month
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NAMES[self.ordinal()])
    }
}

impl FromStr for Month {
    type Err = Error;

    /// Case-insensitive English month name.
    fn from_str(s: &str) -> Result<Self> {
        NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(s))
            .map(|i| Self::ALL[i])
            .ok_or_else(|| Error::parse(s, "Text cannot be parsed to a Month"))
    }
}

impl TryFrom<i32> for Month {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Self::of(value)
    }
}

impl From<Month> for chrono::Month {
    fn from(month: Month) -> Self {
        match month {
            Month::January => chrono::Month::January,
            Month::February => chrono::Month::February,
            Month::March => chrono::Month::March,
            Month::April => chrono::Month::April,
            Month::May => chrono::Month::May,
            Month::June => chrono::Month::June,
            Month::July => chrono::Month::July,
            Month::August => chrono::Month::August,
            Month::September => chrono::Month::September,
            Month::October => chrono::Month::October,
            Month::November => chrono::Month::November,
            Month::December => chrono::Month::December,
        }
    }
}

impl From<chrono::Month> for Month {
    fn from(month: chrono::Month) -> Self {
        Self::ALL[month.number_from_month() as usize - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_rejects_out_of_range() {
        assert!(Month::of(0).unwrap_err().is_range());
        assert!(Month::of(13).unwrap_err().is_range());
        assert_eq!(Month::of(1).unwrap(), Month::January);
        assert_eq!(Month::of(12).unwrap(), Month::December);
    }

    #[test]
    fn value_roundtrip() {
        for month in Month::ALL {
            assert_eq!(Month::of(month.value() as i32).unwrap(), month);
        }
    }

    #[test]
    fn lengths() {
        assert_eq!(Month::February.length(false), 28);
        assert_eq!(Month::February.length(true), 29);
        assert_eq!(Month::April.max_length(), 30);
        assert_eq!(Month::November.min_length(), 30);
        assert_eq!(Month::December.length(true), 31);
        let total: u32 = Month::ALL.iter().map(|m| m.length(false) as u32).sum();
        assert_eq!(total, 365);
    }

    #[test]
    fn first_day_of_year_matches_cumulative_lengths() {
        for leap in [false, true] {
            let mut expected = 1u16;
            for month in Month::ALL {
                assert_eq!(month.first_day_of_year(leap), expected, "{month} leap={leap}");
                expected += month.length(leap) as u16;
            }
        }
    }

    #[test]
    fn plus_and_minus_wrap() {
        assert_eq!(Month::December.plus(1), Month::January);
        assert_eq!(Month::January.plus(-1), Month::December);
        assert_eq!(Month::January.minus(1), Month::December);
        assert_eq!(Month::March.plus(25), Month::April);
        assert_eq!(Month::March.minus(-25), Month::April);
        assert_eq!(Month::June.plus(i64::MIN), Month::June.plus(i64::MIN % 12));
    }

    #[test]
    fn quarter() {
        assert_eq!(Month::February.first_month_of_quarter(), Month::January);
        assert_eq!(Month::June.first_month_of_quarter(), Month::April);
        assert_eq!(Month::December.first_month_of_quarter(), Month::October);
    }

    #[test]
    fn day_of_year_lookup() {
        assert_eq!(Month::from_day_of_year(1, false), Month::January);
        assert_eq!(Month::from_day_of_year(59, false), Month::February);
        assert_eq!(Month::from_day_of_year(60, false), Month::March);
        assert_eq!(Month::from_day_of_year(60, true), Month::February);
        assert_eq!(Month::from_day_of_year(366, true), Month::December);
    }

    #[test]
    fn names_and_chrono() {
        assert_eq!(Month::September.to_string(), "SEPTEMBER");
        assert_eq!("march".parse::<Month>().unwrap(), Month::March);
        assert!("Marchy".parse::<Month>().unwrap_err().is_parse());
        assert_eq!(chrono::Month::from(Month::May), chrono::Month::May);
        assert_eq!(Month::from(chrono::Month::October), Month::October);
    }
}
