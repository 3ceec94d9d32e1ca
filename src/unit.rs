// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Date-based units of time.
//!
//! A [`ChronoUnit`] names a calendrical step.  Only the date-based units are
//! modelled; their [estimated durations](ChronoUnit::estimated_duration) use
//! the mean Gregorian year of 365.2425 days and are meant for sorting and
//! approximate comparisons, never for calendar arithmetic.

use qtty::Seconds;
use std::fmt;

/// Seconds in a mean Gregorian year (`365.2425 × 86 400`).
const SECONDS_PER_MEAN_YEAR: f64 = 31_556_952.0;

/// A date-based unit of time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChronoUnit {
    Days,
    Weeks,
    Months,
    Years,
    Decades,
    Centuries,
    Millennia,
}

impl ChronoUnit {
    /// Estimated length of one unit.
    pub fn estimated_duration(self) -> Seconds {
        let secs = match self {
            Self::Days => 86_400.0,
            Self::Weeks => 7.0 * 86_400.0,
            Self::Months => SECONDS_PER_MEAN_YEAR / 12.0,
            Self::Years => SECONDS_PER_MEAN_YEAR,
            Self::Decades => SECONDS_PER_MEAN_YEAR * 10.0,
            Self::Centuries => SECONDS_PER_MEAN_YEAR * 100.0,
            Self::Millennia => SECONDS_PER_MEAN_YEAR * 1_000.0,
        };
        Seconds::new(secs)
    }

    /// `true` for units whose duration varies with the calendar
    /// (everything except [`ChronoUnit::Days`] and [`ChronoUnit::Weeks`]
    /// has an estimated, not exact, length).
    pub fn is_duration_estimated(self) -> bool {
        !matches!(self, Self::Days | Self::Weeks)
    }
}

impl fmt::Display for ChronoUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Days => "Days",
            Self::Weeks => "Weeks",
            Self::Months => "Months",
            Self::Years => "Years",
            Self::Decades => "Decades",
            Self::Centuries => "Centuries",
            Self::Millennia => "Millennia",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtty::{Day, Days};

    #[test]
    fn month_is_a_twelfth_of_a_mean_year() {
        let month = ChronoUnit::Months.estimated_duration().value();
        let year = ChronoUnit::Years.estimated_duration().value();
        assert!((month * 12.0 - year).abs() < 1e-6);
    }

    #[test]
    fn mean_year_in_days() {
        let days: Days = ChronoUnit::Years.estimated_duration().to::<Day>();
        assert!((days - Days::new(365.2425)).abs() < Days::new(1e-9));
    }

    #[test]
    fn exactness() {
        assert!(!ChronoUnit::Days.is_duration_estimated());
        assert!(!ChronoUnit::Weeks.is_duration_estimated());
        assert!(ChronoUnit::Months.is_duration_estimated());
        assert_eq!(ChronoUnit::Centuries.to_string(), "Centuries");
    }
}
