// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Day-of-week, Monday (1) to Sunday (7).

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

const NAMES: [&str; 7] = [
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
    "SUNDAY",
];

/// A day-of-week in the ISO numbering.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Obtain a day-of-week from its ISO number, 1 (Monday) to 7 (Sunday).
    pub fn of(day_of_week: i32) -> Result<Self> {
        if !(1..=7).contains(&day_of_week) {
            return Err(Error::range(format!(
                "Invalid value for DayOfWeek: {day_of_week}"
            )));
        }
        Ok(Self::ALL[(day_of_week - 1) as usize])
    }

    /// Day-of-week of the given epoch day (1970-01-01 was a Thursday).
    pub fn from_epoch_day(epoch_day: i64) -> Self {
        Self::ALL[(epoch_day.rem_euclid(7) + 3) as usize % 7]
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self as u8 + 1
    }

    /// Rotate forward by `days`, wrapping modulo 7.
    pub fn plus(self, days: i64) -> Self {
        Self::ALL[(self as i64 + days % 7).rem_euclid(7) as usize]
    }

    /// Rotate backward by `days`, wrapping modulo 7.
    pub fn minus(self, days: i64) -> Self {
        self.plus(-(days % 7))
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NAMES[*self as usize])
    }
}

impl FromStr for DayOfWeek {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(s))
            .map(|i| Self::ALL[i])
            .ok_or_else(|| Error::parse(s, "Text cannot be parsed to a DayOfWeek"))
    }
}

impl From<DayOfWeek> for chrono::Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Monday => chrono::Weekday::Mon,
            DayOfWeek::Tuesday => chrono::Weekday::Tue,
            DayOfWeek::Wednesday => chrono::Weekday::Wed,
            DayOfWeek::Thursday => chrono::Weekday::Thu,
            DayOfWeek::Friday => chrono::Weekday::Fri,
            DayOfWeek::Saturday => chrono::Weekday::Sat,
            DayOfWeek::Sunday => chrono::Weekday::Sun,
        }
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_bounds() {
        assert!(DayOfWeek::of(0).unwrap_err().is_range());
        assert!(DayOfWeek::of(8).unwrap_err().is_range());
        assert_eq!(DayOfWeek::of(7).unwrap(), DayOfWeek::Sunday);
    }

    #[test]
    fn negative_wraparound() {
        assert_eq!(DayOfWeek::Monday.plus(-1), DayOfWeek::Sunday);
        assert_eq!(DayOfWeek::Monday.minus(1), DayOfWeek::Sunday);
        assert_eq!(DayOfWeek::Sunday.plus(1), DayOfWeek::Monday);
        assert_eq!(DayOfWeek::Wednesday.plus(-15), DayOfWeek::Tuesday);
        assert_eq!(DayOfWeek::Wednesday.minus(15), DayOfWeek::Tuesday);
    }

    #[test]
    fn extreme_amounts_stay_in_range() {
        // i64::MAX is a multiple of 7, i64::MIN is one below a multiple
        for day in DayOfWeek::ALL {
            assert_eq!(day.plus(i64::MAX), day);
            assert_eq!(day.plus(i64::MIN), day.minus(1));
            assert_eq!(day.minus(i64::MIN), day.plus(1));
            assert_eq!(day.minus(i64::MAX), day);
        }
        assert_eq!(DayOfWeek::Monday.plus(i64::MIN), DayOfWeek::Sunday);
        assert_eq!(DayOfWeek::Monday.plus(7 * 1_000_000), DayOfWeek::Monday);
    }

    #[test]
    fn epoch_day() {
        assert_eq!(DayOfWeek::from_epoch_day(0), DayOfWeek::Thursday);
        assert_eq!(DayOfWeek::from_epoch_day(-1), DayOfWeek::Wednesday);
        assert_eq!(DayOfWeek::from_epoch_day(4), DayOfWeek::Monday);
    }

    #[test]
    fn epoch_day_extremes() {
        assert_eq!(DayOfWeek::from_epoch_day(i64::MAX), DayOfWeek::Thursday);
        assert_eq!(DayOfWeek::from_epoch_day(i64::MIN), DayOfWeek::Wednesday);
        assert_eq!(DayOfWeek::from_epoch_day(i64::MAX - 1), DayOfWeek::Wednesday);
    }

    #[test]
    fn chrono_interop() {
        assert_eq!(chrono::Weekday::from(DayOfWeek::Friday), chrono::Weekday::Fri);
        assert_eq!(DayOfWeek::from(chrono::Weekday::Sun), DayOfWeek::Sunday);
        assert_eq!("tuesday".parse::<DayOfWeek>().unwrap(), DayOfWeek::Tuesday);
    }
}
