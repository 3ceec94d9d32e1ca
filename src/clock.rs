// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Sources of the current instant.
//!
//! Every `now(&Clock)` constructor in the crate reads time through a
//! [`Clock`], so tests can pin or shift "now" without touching the host
//! clock.
//!
//! | Variant | `instant()` |
//! |---------|-------------|
//! | [`Clock::System`] | host UTC clock |
//! | [`Clock::Fixed`] | always the same instant |
//! | [`Clock::Offset`] | base clock shifted by a fixed duration |
//! | [`Clock::Tick`] | base clock floored to a tick granularity |
//!
//! ```
//! use isochron::{Clock, LocalDate, ZoneId, ZoneOffset};
//! use chrono::{TimeDelta, TimeZone, Utc};
//!
//! let zone = ZoneId::Offset(ZoneOffset::of_hours(1).unwrap());
//! let at = Utc.with_ymd_and_hms(2024, 2, 29, 23, 30, 0).unwrap();
//! let clock = Clock::fixed(at, zone);
//! assert_eq!(LocalDate::now(&clock).unwrap(), LocalDate::of(2024, 3, 1).unwrap());
//!
//! let later = Clock::offset(clock, TimeDelta::days(1));
//! assert_eq!(LocalDate::now(&later).unwrap(), LocalDate::of(2024, 3, 2).unwrap());
//! ```

use crate::error::{Error, Result};
use crate::instant::{InstantExt, Instant, NANOS_PER_MILLI, NANOS_PER_SECOND};
use crate::offset::ZoneOffset;
use crate::zone::ZoneId;
use chrono::{SecondsFormat, TimeDelta, Utc};
use std::fmt;

/// A source of the current instant paired with a zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Clock {
    /// Host clock.
    System { zone: ZoneId },
    /// Frozen at one instant.
    Fixed { instant: Instant, zone: ZoneId },
    /// `base` shifted by `offset`.
    Offset { base: Box<Clock>, offset: TimeDelta },
    /// `base` floored to a multiple of `tick_nanos`.
    Tick { base: Box<Clock>, tick_nanos: i64 },
}

impl Clock {
    // ── constructors ──────────────────────────────────────────────────

    pub fn system(zone: ZoneId) -> Self {
        Self::System { zone }
    }

    pub fn system_utc() -> Self {
        Self::system(ZoneId::Offset(ZoneOffset::UTC))
    }

    /// Host clock in the host zone (UTC when the host zone is unavailable).
    pub fn system_default_zone() -> Self {
        Self::system(ZoneId::system_default())
    }

    pub fn fixed(instant: Instant, zone: ZoneId) -> Self {
        Self::Fixed { instant, zone }
    }

    /// `base` shifted by `offset`; a zero offset returns `base` itself.
    pub fn offset(base: Clock, offset: TimeDelta) -> Self {
        if offset.is_zero() {
            return base;
        }
        Self::Offset {
            base: Box::new(base),
            offset,
        }
    }

    /// `base` floored to multiples of `tick`.
    ///
    /// The tick must be non-negative and either a whole number of
    /// milliseconds or an exact divisor of one second.  Ticks of zero or one
    /// nanosecond return `base` itself.
    pub fn tick(base: Clock, tick: TimeDelta) -> Result<Self> {
        if tick < TimeDelta::zero() {
            return Err(Error::range("Tick duration must not be negative"));
        }
        let tick_nanos = tick.num_nanoseconds().ok_or(Error::Overflow("Clock::tick"))?;
        if tick_nanos % NANOS_PER_MILLI != 0 && NANOS_PER_SECOND % tick_nanos != 0 {
            return Err(Error::range(format!("Invalid tick duration: {tick}")));
        }
        if tick_nanos <= 1 {
            return Ok(base);
        }
        Ok(Self::Tick {
            base: Box::new(base),
            tick_nanos,
        })
    }

    /// Host clock in `zone`, ticking in whole seconds.
    pub fn tick_seconds(zone: ZoneId) -> Self {
        Self::ticking(zone, NANOS_PER_SECOND)
    }

    /// Host clock in `zone`, ticking in whole minutes.
    pub fn tick_minutes(zone: ZoneId) -> Self {
        Self::ticking(zone, 60 * NANOS_PER_SECOND)
    }

    /// Host clock in `zone`, ticking in whole milliseconds.
    pub fn tick_millis(zone: ZoneId) -> Self {
        Self::ticking(zone, NANOS_PER_MILLI)
    }

    fn ticking(zone: ZoneId, tick_nanos: i64) -> Self {
        Self::Tick {
            base: Box::new(Self::system(zone)),
            tick_nanos,
        }
    }

    // ── queries ───────────────────────────────────────────────────────

    /// Zone used to interpret the instant as local date and time.
    pub fn zone(&self) -> &ZoneId {
        match self {
            Self::System { zone } | Self::Fixed { zone, .. } => zone,
            Self::Offset { base, .. } | Self::Tick { base, .. } => base.zone(),
        }
    }

    /// Same clock in another zone; the instant stream is unchanged.
    pub fn with_zone(&self, zone: ZoneId) -> Clock {
        if &zone == self.zone() {
            return self.clone();
        }
        match self {
            Self::System { .. } => Self::System { zone },
            Self::Fixed { instant, .. } => Self::Fixed {
                instant: *instant,
                zone,
            },
            Self::Offset { base, offset } => Self::Offset {
                base: Box::new(base.with_zone(zone)),
                offset: *offset,
            },
            Self::Tick { base, tick_nanos } => Self::Tick {
                base: Box::new(base.with_zone(zone)),
                tick_nanos: *tick_nanos,
            },
        }
    }

    /// Current instant.  The system clock has millisecond precision, matching
    /// [`Clock::millis`].
    pub fn instant(&self) -> Result<Instant> {
        match self {
            Self::System { .. } => crate::instant::of_epoch_milli(Utc::now().timestamp_millis()),
            Self::Fixed { instant, .. } => Ok(*instant),
            Self::Offset { base, offset } => base.instant()?.checked_plus(*offset),
            Self::Tick { base, tick_nanos } => {
                if tick_nanos % NANOS_PER_MILLI == 0 {
                    let millis = floor_to(base.millis()?, tick_nanos / NANOS_PER_MILLI);
                    crate::instant::of_epoch_milli(millis)
                } else {
                    let instant = base.instant()?;
                    let nano_of_second = instant.timestamp_subsec_nanos() as i64;
                    let adjust = nano_of_second.rem_euclid(*tick_nanos);
                    instant.checked_plus(TimeDelta::nanoseconds(-adjust))
                }
            }
        }
    }

    /// Current instant as milliseconds since the epoch.
    pub fn millis(&self) -> Result<i64> {
        match self {
            Self::System { .. } => Ok(Utc::now().timestamp_millis()),
            Self::Fixed { instant, .. } => Ok(instant.epoch_millis()),
            Self::Offset { base, offset } => base
                .millis()?
                .checked_add(offset.num_milliseconds())
                .ok_or(Error::Overflow("Clock::millis")),
            Self::Tick { base, tick_nanos } if tick_nanos % NANOS_PER_MILLI == 0 => {
                Ok(floor_to(base.millis()?, tick_nanos / NANOS_PER_MILLI))
            }
            Self::Tick { .. } => Ok(self.instant()?.epoch_millis()),
        }
    }
}

fn floor_to(value: i64, step: i64) -> i64 {
    value - value.rem_euclid(step)
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System { zone } => write!(f, "SystemClock[{zone}]"),
            Self::Fixed { instant, zone } => write!(
                f,
                "FixedClock[{},{zone}]",
                instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            ),
            Self::Offset { base, offset } => write!(f, "OffsetClock[{base},{offset}]"),
            Self::Tick { base, tick_nanos } => write!(
                f,
                "TickClock[{base},{}]",
                TimeDelta::nanoseconds(*tick_nanos)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::LocalDate;
    use chrono::{DateTime, TimeZone, Timelike};

    fn utc() -> ZoneId {
        ZoneId::Offset(ZoneOffset::UTC)
    }

    fn instant_at(seconds: i64, nanos: u32) -> Instant {
        DateTime::from_timestamp(seconds, nanos).unwrap()
    }

    fn fixed(seconds: i64, nanos: u32) -> Clock {
        Clock::fixed(instant_at(seconds, nanos), utc())
    }

    #[test]
    fn test_fixed_clock() {
        let clock = fixed(1_000, 500_000_000);
        assert_eq!(clock.instant().unwrap(), instant_at(1_000, 500_000_000));
        assert_eq!(clock.millis().unwrap(), 1_000_500);
        assert_eq!(clock.zone(), &utc());
    }

    #[test]
    fn test_system_clock_tracks_host_time() {
        let clock = Clock::system_utc();
        let before = Utc::now();
        let now = clock.instant().unwrap();
        let after = Utc::now();
        assert!(before.timestamp_millis() <= now.timestamp_millis());
        assert!(now.timestamp_millis() <= after.timestamp_millis());
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
        assert!(clock.millis().unwrap() >= now.timestamp_millis());
        assert!(Clock::system_default_zone().instant().is_ok());
    }

    #[test]
    fn test_offset_clock() {
        let clock = Clock::offset(fixed(10, 0), TimeDelta::milliseconds(-2_500));
        assert_eq!(clock.millis().unwrap(), 7_500);
        assert_eq!(clock.instant().unwrap(), instant_at(7, 500_000_000));
        assert_eq!(clock.zone(), &utc());
    }

    #[test]
    fn test_offset_zero_returns_base() {
        let base = fixed(10, 0);
        assert_eq!(Clock::offset(base.clone(), TimeDelta::zero()), base);
    }

    #[test]
    fn test_offset_overflow() {
        let far = Clock::fixed(DateTime::<Utc>::MAX_UTC, utc());
        let clock = Clock::offset(far, TimeDelta::days(1));
        assert!(clock.instant().unwrap_err().is_overflow());
        let huge = Clock::offset(fixed(1_000, 0), TimeDelta::MAX);
        assert!(huge.millis().unwrap_err().is_overflow());
    }

    #[test]
    fn test_tick_truncates_to_whole_seconds() {
        let clock = Clock::tick(fixed(1_234, 987_654_321), TimeDelta::seconds(1)).unwrap();
        let instant = clock.instant().unwrap();
        assert_eq!(instant, instant_at(1_234, 0));
        assert_eq!(instant.nanosecond(), 0);
        assert_eq!(clock.millis().unwrap(), 1_234_000);
    }

    #[test]
    fn test_tick_floors_before_epoch() {
        let clock = Clock::tick(fixed(-2, 500_000_000), TimeDelta::seconds(1)).unwrap();
        assert_eq!(clock.millis().unwrap(), -2_000);
        let minutes = Clock::tick(fixed(-1, 0), TimeDelta::minutes(1)).unwrap();
        assert_eq!(minutes.instant().unwrap(), instant_at(-60, 0));
    }

    #[test]
    fn test_tick_minutes_and_millis() {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 12, 34, 56).unwrap() + TimeDelta::milliseconds(789);
        let base = Clock::fixed(at, utc());
        let minutes = Clock::tick(base.clone(), TimeDelta::minutes(1)).unwrap();
        assert_eq!(
            minutes.instant().unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 6, 12, 34, 0).unwrap()
        );
        let millis = Clock::tick(base, TimeDelta::milliseconds(1)).unwrap();
        assert_eq!(millis.instant().unwrap(), at);
    }

    #[test]
    fn test_sub_millisecond_tick() {
        let clock = Clock::tick(fixed(1, 123_456_789), TimeDelta::microseconds(250)).unwrap();
        assert_eq!(clock.instant().unwrap(), instant_at(1, 123_250_000));
        assert_eq!(clock.millis().unwrap(), 1_123);
        let micros = Clock::tick(fixed(1, 123_456_789), TimeDelta::microseconds(1)).unwrap();
        assert_eq!(micros.instant().unwrap(), instant_at(1, 123_456_000));
    }

    #[test]
    fn test_degenerate_ticks_return_base() {
        let base = fixed(5, 5);
        assert_eq!(Clock::tick(base.clone(), TimeDelta::zero()).unwrap(), base);
        assert_eq!(Clock::tick(base.clone(), TimeDelta::nanoseconds(1)).unwrap(), base);
    }

    #[test]
    fn test_invalid_ticks() {
        let base = fixed(0, 0);
        assert!(Clock::tick(base.clone(), TimeDelta::seconds(-1))
            .unwrap_err()
            .is_range());
        assert!(Clock::tick(base.clone(), TimeDelta::nanoseconds(7))
            .unwrap_err()
            .is_range());
        assert!(Clock::tick(base.clone(), TimeDelta::microseconds(1_500))
            .unwrap_err()
            .is_range());
        assert!(Clock::tick(base, TimeDelta::MAX).unwrap_err().is_overflow());
    }

    #[test]
    fn test_with_zone() {
        let plus_two = ZoneId::Offset(ZoneOffset::of_hours(2).unwrap());
        let base = fixed(0, 0);
        assert_eq!(base.with_zone(utc()), base);

        let ticking = Clock::tick(Clock::offset(base, TimeDelta::hours(1)), TimeDelta::seconds(1))
            .unwrap()
            .with_zone(plus_two.clone());
        assert_eq!(ticking.zone(), &plus_two);
        assert_eq!(ticking.millis().unwrap(), 3_600_000);
        assert_eq!(
            Clock::system_utc().with_zone(plus_two.clone()),
            Clock::system(plus_two)
        );
    }

    #[test]
    fn test_now_uses_clock_zone() {
        let zone = ZoneId::Offset(ZoneOffset::of_hours(1).unwrap());
        let at = Utc.with_ymd_and_hms(2024, 2, 29, 23, 30, 0).unwrap();
        let clock = Clock::fixed(at, zone);
        assert_eq!(LocalDate::now(&clock).unwrap(), LocalDate::of(2024, 3, 1).unwrap());
        assert_eq!(
            LocalDate::now(&clock.with_zone(utc())).unwrap(),
            LocalDate::of(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Clock::system_utc().to_string(), "SystemClock[Z]");
        let base = fixed(0, 0);
        assert_eq!(base.to_string(), "FixedClock[1970-01-01T00:00:00Z,Z]");
        assert_eq!(
            Clock::offset(base.clone(), TimeDelta::seconds(1)).to_string(),
            "OffsetClock[FixedClock[1970-01-01T00:00:00Z,Z],PT1S]"
        );
        assert_eq!(
            Clock::tick(base, TimeDelta::seconds(1)).unwrap().to_string(),
            "TickClock[FixedClock[1970-01-01T00:00:00Z,Z],PT1S]"
        );
    }
}
