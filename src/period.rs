// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Date-based amount of time.
//!
//! This module provides:
//! - [`Period`]: a `(years, months, days)` amount, e.g. `P2Y3M4D`
//! - [`Temporal`]: the date-like targets a period can be added to or
//!   subtracted from
//!
//! The three components are independent and individually signed.  Nothing is
//! normalised implicitly: `P15M` and `P1Y3M` are different periods until
//! [`Period::normalized`] is called.  Every combining operation is checked and
//! reports [`Error::Overflow`] instead of wrapping.

use crate::date::LocalDate;
use crate::error::{Error, Result};
use crate::unit::ChronoUnit;
use chrono::NaiveDate;
use qtty::{Day, Days};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Calendar identifier of the ISO-8601 calendar system.
pub const ISO_CALENDAR: &str = "ISO";

/// A date-like value that calendar amounts can be applied to.
///
/// Implementors supply the three primitive steps; [`Period::add_to`] and
/// [`Period::subtract_from`] decide their order.
pub trait Temporal: Sized {
    /// Calendar system of this value.  `None` means unknown and is accepted
    /// wherever an ISO value is.
    fn calendar(&self) -> Option<&str> {
        Some(ISO_CALENDAR)
    }

    /// Add years, clamping the day-of-month when it no longer exists.
    fn plus_years(&self, years: i64) -> Result<Self>;

    /// Add months, clamping the day-of-month to the end of the target month.
    fn plus_months(&self, months: i64) -> Result<Self>;

    fn plus_days(&self, days: i64) -> Result<Self>;
}

impl Temporal for LocalDate {
    fn plus_years(&self, years: i64) -> Result<Self> {
        LocalDate::plus_years(self, years)
    }

    fn plus_months(&self, months: i64) -> Result<Self> {
        LocalDate::plus_months(self, months)
    }

    fn plus_days(&self, days: i64) -> Result<Self> {
        LocalDate::plus_days(self, days)
    }
}

impl Temporal for NaiveDate {
    fn plus_years(&self, years: i64) -> Result<Self> {
        let months = years
            .checked_mul(12)
            .ok_or(Error::Overflow("NaiveDate::plus_years"))?;
        Temporal::plus_months(self, months)
    }

    fn plus_months(&self, months: i64) -> Result<Self> {
        let magnitude = u32::try_from(months.unsigned_abs())
            .map_err(|_| Error::Overflow("NaiveDate::plus_months"))?;
        let step = chrono::Months::new(magnitude);
        let result = if months >= 0 {
            self.checked_add_months(step)
        } else {
            self.checked_sub_months(step)
        };
        result.ok_or_else(|| {
            Error::range(format!("{self} plus {months} months is outside the NaiveDate range"))
        })
    }

    fn plus_days(&self, days: i64) -> Result<Self> {
        let step = chrono::Days::new(days.unsigned_abs());
        let result = if days >= 0 {
            self.checked_add_days(step)
        } else {
            self.checked_sub_days(step)
        };
        result.ok_or_else(|| {
            Error::range(format!("{self} plus {days} days is outside the NaiveDate range"))
        })
    }
}

/// A calendar amount of years, months and days.
///
/// # Examples
///
/// ```
/// use isochron::{LocalDate, Period};
///
/// let p: Period = "P1Y2M3D".parse().unwrap();
/// assert_eq!(p, Period::of(1, 2, 3));
///
/// let start = LocalDate::of(2010, 1, 15).unwrap();
/// let end = LocalDate::of(2011, 3, 18).unwrap();
/// assert_eq!(Period::between(&start, &end).unwrap(), p);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Period {
    years: i32,
    months: i32,
    days: i32,
}

impl Period {
    /// The zero period, rendered `P0D`.
    pub const ZERO: Period = Period::of(0, 0, 0);

    // ── constructors ──────────────────────────────────────────────────

    #[inline]
    pub const fn of(years: i32, months: i32, days: i32) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    #[inline]
    pub const fn of_years(years: i32) -> Self {
        Self::of(years, 0, 0)
    }

    #[inline]
    pub const fn of_months(months: i32) -> Self {
        Self::of(0, months, 0)
    }

    /// `weeks × 7` days.
    pub fn of_weeks(weeks: i32) -> Result<Self> {
        weeks
            .checked_mul(7)
            .map(Self::of_days)
            .ok_or(Error::Overflow("Period::of_weeks"))
    }

    #[inline]
    pub const fn of_days(days: i32) -> Self {
        Self::of(0, 0, days)
    }

    /// Period from `start` (inclusive) to `end` (exclusive).
    ///
    /// If `end` is before `start` every component is zero or negative.
    pub fn between(start: &LocalDate, end: &LocalDate) -> Result<Self> {
        start.until(end)
    }

    // ── accessors ─────────────────────────────────────────────────────

    #[inline]
    pub const fn years(&self) -> i32 {
        self.years
    }

    #[inline]
    pub const fn months(&self) -> i32 {
        self.months
    }

    #[inline]
    pub const fn days(&self) -> i32 {
        self.days
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }

    /// `true` if any component is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.years < 0 || self.months < 0 || self.days < 0
    }

    /// Units this amount is expressed in.
    pub const fn units() -> [ChronoUnit; 3] {
        [ChronoUnit::Years, ChronoUnit::Months, ChronoUnit::Days]
    }

    /// Value of a single unit.
    pub fn get(&self, unit: ChronoUnit) -> Result<i64> {
        match unit {
            ChronoUnit::Years => Ok(self.years as i64),
            ChronoUnit::Months => Ok(self.months as i64),
            ChronoUnit::Days => Ok(self.days as i64),
            other => Err(Error::Unsupported(other.to_string())),
        }
    }

    /// Total months, `years × 12 + months`.
    #[inline]
    pub const fn to_total_months(&self) -> i64 {
        self.years as i64 * 12 + self.months as i64
    }

    /// Approximate length using the mean Gregorian year.
    pub fn estimated_days(&self) -> Days {
        let years = ChronoUnit::Years.estimated_duration() * self.years as f64;
        let months = ChronoUnit::Months.estimated_duration() * self.months as f64;
        (years + months).to::<Day>() + Days::new(self.days as f64)
    }

    // ── withers ───────────────────────────────────────────────────────

    pub const fn with_years(&self, years: i32) -> Self {
        Self::of(years, self.months, self.days)
    }

    pub const fn with_months(&self, months: i32) -> Self {
        Self::of(self.years, months, self.days)
    }

    pub const fn with_days(&self, days: i32) -> Self {
        Self::of(self.years, self.months, days)
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// Component-wise sum.
    pub fn plus(&self, other: &Period) -> Result<Self> {
        const OP: &str = "Period::plus";
        Ok(Self::of(
            checked(self.years.checked_add(other.years), OP)?,
            checked(self.months.checked_add(other.months), OP)?,
            checked(self.days.checked_add(other.days), OP)?,
        ))
    }

    /// Component-wise difference.
    pub fn minus(&self, other: &Period) -> Result<Self> {
        const OP: &str = "Period::minus";
        Ok(Self::of(
            checked(self.years.checked_sub(other.years), OP)?,
            checked(self.months.checked_sub(other.months), OP)?,
            checked(self.days.checked_sub(other.days), OP)?,
        ))
    }

    pub fn plus_years(&self, years: i64) -> Result<Self> {
        Ok(self.with_years(add_component(self.years, years, "Period::plus_years")?))
    }

    pub fn plus_months(&self, months: i64) -> Result<Self> {
        Ok(self.with_months(add_component(self.months, months, "Period::plus_months")?))
    }

    pub fn plus_days(&self, days: i64) -> Result<Self> {
        Ok(self.with_days(add_component(self.days, days, "Period::plus_days")?))
    }

    pub fn minus_years(&self, years: i64) -> Result<Self> {
        Ok(self.with_years(sub_component(self.years, years, "Period::minus_years")?))
    }

    pub fn minus_months(&self, months: i64) -> Result<Self> {
        Ok(self.with_months(sub_component(self.months, months, "Period::minus_months")?))
    }

    pub fn minus_days(&self, days: i64) -> Result<Self> {
        Ok(self.with_days(sub_component(self.days, days, "Period::minus_days")?))
    }

    /// Multiply every component by `scalar`.
    pub fn multiplied_by(&self, scalar: i32) -> Result<Self> {
        if scalar == 1 || self.is_zero() {
            return Ok(*self);
        }
        const OP: &str = "Period::multiplied_by";
        Ok(Self::of(
            checked(self.years.checked_mul(scalar), OP)?,
            checked(self.months.checked_mul(scalar), OP)?,
            checked(self.days.checked_mul(scalar), OP)?,
        ))
    }

    /// Every component negated; fails only for `i32::MIN` components.
    pub fn negated(&self) -> Result<Self> {
        self.multiplied_by(-1)
    }

    /// Fold whole years out of the month count.
    ///
    /// The split truncates toward zero so both resulting fields carry the
    /// sign of the total month count: `P1Y-25M` becomes `P-1Y-1M`.  Days are
    /// left untouched.
    pub fn normalized(&self) -> Result<Self> {
        let total = self.to_total_months();
        let years = total / 12;
        let months = (total % 12) as i32;
        if years == self.years as i64 && months == self.months {
            return Ok(*self);
        }
        let years = i32::try_from(years).map_err(|_| Error::Overflow("Period::normalized"))?;
        Ok(Self::of(years, months, self.days))
    }

    // ── applying to dates ─────────────────────────────────────────────

    /// Add this period to a date-like value.
    ///
    /// Years and months are applied as a single month step (or a year step
    /// when there are no months) and days afterwards.  The order matters at
    /// month ends: Jan 31 plus `P1M31D` first clamps to Feb 28/29 and then
    /// adds 31 days.
    pub fn add_to<T: Temporal>(&self, temporal: T) -> Result<T> {
        validate_calendar(&temporal)?;
        let mut temporal = temporal;
        if self.months == 0 {
            if self.years != 0 {
                temporal = temporal.plus_years(self.years as i64)?;
            }
        } else {
            let total = self.to_total_months();
            if total != 0 {
                temporal = temporal.plus_months(total)?;
            }
        }
        if self.days != 0 {
            temporal = temporal.plus_days(self.days as i64)?;
        }
        Ok(temporal)
    }

    /// Subtract this period from a date-like value, in the same step order as
    /// [`Period::add_to`].
    pub fn subtract_from<T: Temporal>(&self, temporal: T) -> Result<T> {
        validate_calendar(&temporal)?;
        let mut temporal = temporal;
        if self.months == 0 {
            if self.years != 0 {
                temporal = temporal.plus_years(-(self.years as i64))?;
            }
        } else {
            let total = self.to_total_months();
            if total != 0 {
                temporal = temporal.plus_months(-total)?;
            }
        }
        if self.days != 0 {
            temporal = temporal.plus_days(-(self.days as i64))?;
        }
        Ok(temporal)
    }
}

#[inline]
fn checked(value: Option<i32>, operation: &'static str) -> Result<i32> {
    value.ok_or(Error::Overflow(operation))
}

fn add_component(current: i32, amount: i64, operation: &'static str) -> Result<i32> {
    let sum = (current as i64)
        .checked_add(amount)
        .ok_or(Error::Overflow(operation))?;
    i32::try_from(sum).map_err(|_| Error::Overflow(operation))
}

fn sub_component(current: i32, amount: i64, operation: &'static str) -> Result<i32> {
    let diff = (current as i64)
        .checked_sub(amount)
        .ok_or(Error::Overflow(operation))?;
    i32::try_from(diff).map_err(|_| Error::Overflow(operation))
}

fn validate_calendar<T: Temporal>(temporal: &T) -> Result<()> {
    match temporal.calendar() {
        Some(calendar) if calendar != ISO_CALENDAR => Err(Error::CalendarMismatch {
            expected: ISO_CALENDAR.to_owned(),
            actual: calendar.to_owned(),
        }),
        _ => Ok(()),
    }
}

// ── Text ──────────────────────────────────────────────────────────────────

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("P0D");
        }
        f.write_str("P")?;
        if self.years != 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months != 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days != 0 {
            write!(f, "{}D", self.days)?;
        }
        Ok(())
    }
}

impl FromStr for Period {
    type Err = Error;

    /// Parse `[+-]P[nY][nM][nW][nD]`, case-insensitive, each `n` optionally
    /// signed.  Weeks are folded into days.
    fn from_str(text: &str) -> Result<Self> {
        const OP: &str = "Period::parse";
        let invalid = || Error::parse(text, "Text cannot be parsed to a Period");
        let bytes = text.as_bytes();

        let (negate, mut pos) = match bytes.first() {
            Some(b'-') => (-1i64, 1),
            Some(b'+') => (1, 1),
            _ => (1, 0),
        };
        if !matches!(bytes.get(pos), Some(b'P' | b'p')) {
            return Err(invalid());
        }
        pos += 1;

        // Y, M, W, D in that order, each at most once.
        let mut fields: [Option<&str>; 4] = [None; 4];
        let mut next_slot = 0;
        while pos < bytes.len() {
            let start = pos;
            if matches!(bytes[pos], b'+' | b'-') {
                pos += 1;
            }
            let digits = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos == digits || pos == bytes.len() {
                return Err(invalid());
            }
            let slot = match bytes[pos].to_ascii_uppercase() {
                b'Y' => 0,
                b'M' => 1,
                b'W' => 2,
                b'D' => 3,
                _ => return Err(invalid()),
            };
            if slot < next_slot {
                return Err(invalid());
            }
            fields[slot] = Some(&text[start..pos]);
            next_slot = slot + 1;
            pos += 1;
        }
        if fields.iter().all(Option::is_none) {
            return Err(invalid());
        }

        let component = |field: Option<&str>| -> Result<i32> {
            let Some(number) = field else {
                return Ok(0);
            };
            let value = number
                .parse::<i64>()
                .ok()
                .and_then(|v| v.checked_mul(negate))
                .ok_or(Error::Overflow(OP))?;
            i32::try_from(value).map_err(|_| Error::Overflow(OP))
        };
        let years = component(fields[0])?;
        let months = component(fields[1])?;
        let weeks = component(fields[2])?;
        let days = component(fields[3])?;
        let days = weeks
            .checked_mul(7)
            .and_then(|w| days.checked_add(w))
            .ok_or(Error::Overflow(OP))?;
        Ok(Self::of(years, months, days))
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for Period {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Period {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
