// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! ISO-8601 calendar values.
//!
//! Immutable, thread-safe value types for the proleptic Gregorian calendar,
//! fixed UTC offsets, time-zone identifiers, date-based periods and
//! injectable clocks.
//!
//! # Core types
//!
//! | Type | Meaning | Text form |
//! |------|---------|-----------|
//! | [`Year`] | proleptic ISO year | `2024`, `-0044`, `+10000` |
//! | [`Month`] | month-of-year | `FEBRUARY` |
//! | [`DayOfWeek`] | ISO day-of-week, Monday = 1 | `MONDAY` |
//! | [`LocalDate`] | year, month and day | `2024-02-29` |
//! | [`MonthDay`] | month and day without a year | `--02-29` |
//! | [`YearMonth`] | year and month | `2024-02` |
//! | [`Period`] | years, months and days | `P1Y2M3D` |
//! | [`ZoneOffset`] | fixed offset from UTC, ±18:00 | `+05:30`, `Z` |
//! | [`ZoneId`] | offset or region zone | `Europe/Paris`, `UTC+01:00` |
//! | [`Clock`] | source of the current instant | |
//!
//! Instants are [`chrono::DateTime<Utc>`](chrono::DateTime) values
//! (re-exported as [`Instant`]); the date types convert to and from their
//! `chrono` counterparts.
//!
//! # Zone rules
//!
//! Region zones resolve their offsets through a [`ZoneRulesProvider`].  The
//! global [`ZoneRulesRegistry`] knows the fixed UTC aliases only; callers
//! register further rules, or pass their own provider to
//! [`ZoneId::of_with_provider`].
//!
//! # Errors
//!
//! Every fallible operation returns [`Result`] with the shared [`Error`]
//! taxonomy.  Arithmetic is checked and never wraps.
//!
//! # Features
//!
//! * `serde`: (de)serialise the value types as their canonical text.

pub mod clock;
pub mod date;
pub mod day_of_week;
pub mod error;
pub mod instant;
pub mod month;
pub mod month_day;
pub mod offset;
pub mod period;
pub mod rules;
pub mod unit;
pub mod year;
pub mod year_month;
pub mod zone;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use clock::Clock;
pub use date::LocalDate;
pub use day_of_week::DayOfWeek;
pub use error::{Error, Result};
pub use instant::{Instant, InstantExt};
pub use month::Month;
pub use month_day::MonthDay;
pub use offset::{ZoneOffset, ZoneOffsetCache};
pub use period::{Period, Temporal, ISO_CALENDAR};
pub use rules::{ZoneOffsetTransition, ZoneRules, ZoneRulesProvider, ZoneRulesRegistry};
pub use unit::ChronoUnit;
pub use year::Year;
pub use year_month::YearMonth;
pub use zone::{ZoneId, ZoneRegion, SHORT_IDS};

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
macro_rules! serde_as_text {
    ($($ty:ty),* $(,)?) => {$(
        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let text = <String as serde::Deserialize>::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    )*};
}

#[cfg(feature = "serde")]
serde_as_text!(Year, Month, DayOfWeek, LocalDate, MonthDay, YearMonth);
