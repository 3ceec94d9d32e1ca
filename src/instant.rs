// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Instants on the UTC time-line.
//!
//! An [`Instant`] is a `chrono::DateTime<Utc>`: seconds and nanoseconds from
//! the epoch `1970-01-01T00:00:00Z`.  This module adds the epoch-millisecond
//! view the clocks are specified in and checked arithmetic that reports
//! failures through the crate [`Error`].

use crate::error::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};

/// A point on the UTC time-line with nanosecond precision.
pub type Instant = DateTime<Utc>;

/// `1970-01-01T00:00:00Z`.
pub const EPOCH: Instant = DateTime::UNIX_EPOCH;

pub(crate) const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub(crate) const NANOS_PER_MILLI: i64 = 1_000_000;

/// Instant from milliseconds since the epoch.
pub fn of_epoch_milli(millis: i64) -> Result<Instant> {
    DateTime::from_timestamp_millis(millis).ok_or(Error::Overflow("instant::of_epoch_milli"))
}

/// Instant from seconds since the epoch plus a nanosecond adjustment of any
/// sign or size.
pub fn of_epoch_second(seconds: i64, nano_adjustment: i64) -> Result<Instant> {
    let seconds = seconds
        .checked_add(nano_adjustment.div_euclid(NANOS_PER_SECOND))
        .ok_or(Error::Overflow("instant::of_epoch_second"))?;
    let nanos = nano_adjustment.rem_euclid(NANOS_PER_SECOND) as u32;
    DateTime::from_timestamp(seconds, nanos).ok_or(Error::Overflow("instant::of_epoch_second"))
}

/// Extra operations on [`Instant`].
pub trait InstantExt: Sized {
    /// Milliseconds since the epoch, flooring any sub-millisecond part.
    fn epoch_millis(&self) -> i64;

    /// `self + delta`, or an overflow error outside chrono's range.
    fn checked_plus(&self, delta: TimeDelta) -> Result<Self>;
}

impl InstantExt for Instant {
    fn epoch_millis(&self) -> i64 {
        self.timestamp_millis()
    }

    fn checked_plus(&self, delta: TimeDelta) -> Result<Self> {
        self.checked_add_signed(delta)
            .ok_or(Error::Overflow("Instant::checked_plus"))
    }
}
