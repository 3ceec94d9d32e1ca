// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Fixed offsets from UTC.
//!
//! A [`ZoneOffset`] is the amount of time a zone is ahead of (positive) or
//! behind (negative) UTC, limited to ±18:00.  It is the leaf of every
//! zone-aware computation: a [`ZoneId`](crate::ZoneId) either *is* an offset
//! or resolves to one for each instant through its rules.
//!
//! # Text form
//!
//! | Input | Meaning |
//! |-------|---------|
//! | `Z` | UTC |
//! | `+h`, `+hh` | hours |
//! | `+hh:mm`, `+hhmm` | hours and minutes |
//! | `+hh:mm:ss`, `+hhmmss` | hours, minutes and seconds |
//!
//! The canonical output is `Z` or `±hh:mm`, with `:ss` appended only when the
//! seconds are non-zero.

use crate::error::{Error, Result};
use crate::rules::ZoneRules;
use chrono::{FixedOffset, Offset, Utc};
use log::trace;
use qtty::Seconds;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

const SECONDS_PER_HOUR: i32 = 3_600;
const SECONDS_PER_MINUTE: i32 = 60;
const MAX_SECONDS: i32 = 18 * SECONDS_PER_HOUR;

/// A fixed offset from UTC with one-second precision.
///
/// Offsets compare by total seconds for equality, but *order* from the
/// largest offset to the smallest: `+14:00` sorts before `-12:00`, i.e. in the
/// order the local days start.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ZoneOffset {
    total_seconds: i32,
}

impl ZoneOffset {
    /// The offset of UTC itself, `Z`.
    pub const UTC: ZoneOffset = ZoneOffset { total_seconds: 0 };
    /// Smallest supported offset, `-18:00`.
    pub const MIN: ZoneOffset = ZoneOffset {
        total_seconds: -MAX_SECONDS,
    };
    /// Largest supported offset, `+18:00`.
    pub const MAX: ZoneOffset = ZoneOffset {
        total_seconds: MAX_SECONDS,
    };

    // ── constructors ──────────────────────────────────────────────────

    /// Offset of `total_seconds`; a range error outside -18:00 to +18:00.
    pub fn of_total_seconds(total_seconds: i32) -> Result<Self> {
        if !(-MAX_SECONDS..=MAX_SECONDS).contains(&total_seconds) {
            return Err(Error::range(
                "Zone offset not in valid range: -18:00 to +18:00",
            ));
        }
        Ok(Self { total_seconds })
    }

    /// Whole-hour offset; a range error outside -18 to +18.
    pub fn of_hours(hours: i32) -> Result<Self> {
        Self::of_hours_minutes_seconds(hours, 0, 0)
    }

    /// Fails like [`ZoneOffset::of_hours_minutes_seconds`].
    pub fn of_hours_minutes(hours: i32, minutes: i32) -> Result<Self> {
        Self::of_hours_minutes_seconds(hours, minutes, 0)
    }

    /// Offset from components that must all share the same sign (zero is
    /// compatible with either).
    pub fn of_hours_minutes_seconds(hours: i32, minutes: i32, seconds: i32) -> Result<Self> {
        validate(hours, minutes, seconds)?;
        Ok(Self {
            total_seconds: hours * SECONDS_PER_HOUR + minutes * SECONDS_PER_MINUTE + seconds,
        })
    }

    /// Parse an offset ID, see the [module docs](self) for the accepted forms.
    pub fn of(id: &str) -> Result<Self> {
        parse_offset_id(id)
    }

    // ── accessors ─────────────────────────────────────────────────────

    #[inline]
    pub const fn total_seconds(&self) -> i32 {
        self.total_seconds
    }

    /// Canonical ID: `Z`, `±hh:mm` or `±hh:mm:ss`.
    pub fn id(&self) -> String {
        self.to_string()
    }

    /// Rules that return this offset at every instant.
    pub fn rules(&self) -> ZoneRules {
        ZoneRules::fixed(*self)
    }
}

fn validate(hours: i32, minutes: i32, seconds: i32) -> Result<()> {
    if !(-18..=18).contains(&hours) {
        return Err(Error::range(format!(
            "Zone offset hours not in valid range: value {hours} is not in the range -18 to 18"
        )));
    }
    if hours > 0 {
        if minutes < 0 || seconds < 0 {
            return Err(Error::range(
                "Zone offset minutes and seconds must be positive because hours is positive",
            ));
        }
    } else if hours < 0 {
        if minutes > 0 || seconds > 0 {
            return Err(Error::range(
                "Zone offset minutes and seconds must be negative because hours is negative",
            ));
        }
    } else if (minutes > 0 && seconds < 0) || (minutes < 0 && seconds > 0) {
        return Err(Error::range(
            "Zone offset minutes and seconds must have the same sign",
        ));
    }
    if !(-59..=59).contains(&minutes) {
        return Err(Error::range(format!(
            "Zone offset minutes not in valid range: value {minutes} is not in the range -59 to 59"
        )));
    }
    if !(-59..=59).contains(&seconds) {
        return Err(Error::range(format!(
            "Zone offset seconds not in valid range: value {seconds} is not in the range -59 to 59"
        )));
    }
    if hours.abs() == 18 && (minutes | seconds) != 0 {
        return Err(Error::range(
            "Zone offset not in valid range: -18:00 to +18:00",
        ));
    }
    Ok(())
}

fn parse_offset_id(id: &str) -> Result<ZoneOffset> {
    if id == "Z" {
        return Ok(ZoneOffset::UTC);
    }
    // `+h` is read as `+0h`.
    let padded;
    let bytes = match id.as_bytes() {
        &[sign, digit] => {
            padded = [sign, b'0', digit];
            &padded[..]
        }
        other => other,
    };
    let (hours, minutes, seconds) = match bytes.len() {
        3 => (number(id, bytes, 1, false)?, 0, 0),
        5 => (
            number(id, bytes, 1, false)?,
            number(id, bytes, 3, false)?,
            0,
        ),
        6 => (number(id, bytes, 1, false)?, number(id, bytes, 4, true)?, 0),
        7 => (
            number(id, bytes, 1, false)?,
            number(id, bytes, 3, false)?,
            number(id, bytes, 5, false)?,
        ),
        9 => (
            number(id, bytes, 1, false)?,
            number(id, bytes, 4, true)?,
            number(id, bytes, 7, true)?,
        ),
        _ => {
            return Err(Error::parse(
                id,
                "Invalid ID for ZoneOffset, invalid format",
            ))
        }
    };
    match bytes[0] {
        b'+' => ZoneOffset::of_hours_minutes_seconds(hours, minutes, seconds),
        b'-' => ZoneOffset::of_hours_minutes_seconds(-hours, -minutes, -seconds),
        _ => Err(Error::parse(
            id,
            "Invalid ID for ZoneOffset, plus/minus not found when expected",
        )),
    }
}

/// Two-digit field at `pos`, optionally preceded by a colon.
fn number(id: &str, bytes: &[u8], pos: usize, preceded_by_colon: bool) -> Result<i32> {
    if preceded_by_colon && bytes[pos - 1] != b':' {
        return Err(Error::parse(
            id,
            "Invalid ID for ZoneOffset, colon not found when expected",
        ));
    }
    let (hi, lo) = (bytes[pos], bytes[pos + 1]);
    if !hi.is_ascii_digit() || !lo.is_ascii_digit() {
        return Err(Error::parse(
            id,
            "Invalid ID for ZoneOffset, non numeric characters found",
        ));
    }
    Ok(((hi - b'0') * 10 + (lo - b'0')) as i32)
}

// ── Ordering ──────────────────────────────────────────────────────────────

impl Ord for ZoneOffset {
    fn cmp(&self, other: &Self) -> Ordering {
        other.total_seconds.cmp(&self.total_seconds)
    }
}

impl PartialOrd for ZoneOffset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── Text ──────────────────────────────────────────────────────────────────

impl fmt::Display for ZoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total_seconds == 0 {
            return f.write_str("Z");
        }
        let abs = self.total_seconds.unsigned_abs();
        let sign = if self.total_seconds < 0 { '-' } else { '+' };
        let hours = abs / 3_600;
        let minutes = abs / 60 % 60;
        let seconds = abs % 60;
        write!(f, "{sign}{hours:02}:{minutes:02}")?;
        if seconds != 0 {
            write!(f, ":{seconds:02}")?;
        }
        Ok(())
    }
}

impl FromStr for ZoneOffset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::of(s)
    }
}

// ── Conversions ───────────────────────────────────────────────────────────

impl From<ZoneOffset> for FixedOffset {
    fn from(offset: ZoneOffset) -> Self {
        // ±18:00 is well inside chrono's ±24:00 bound
        FixedOffset::east_opt(offset.total_seconds).unwrap_or_else(|| Utc.fix())
    }
}

impl TryFrom<FixedOffset> for ZoneOffset {
    type Error = Error;

    fn try_from(offset: FixedOffset) -> Result<Self> {
        Self::of_total_seconds(offset.local_minus_utc())
    }
}

impl From<ZoneOffset> for Seconds {
    fn from(offset: ZoneOffset) -> Self {
        Seconds::new(offset.total_seconds as f64)
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for ZoneOffset {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for ZoneOffset {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        ZoneOffset::of(&text).map_err(de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Interning cache
// ═══════════════════════════════════════════════════════════════════════════

/// Explicit interning cache for offset parsing and ID rendering.
///
/// Parsed IDs are remembered so repeated parsing of the same text skips the
/// grammar, and canonical IDs of quarter-hour offsets are rendered once and
/// shared.  The cache never changes results: every lookup falls back to the
/// uncached computation, and two threads racing to fill the same entry store
/// equal values.
#[derive(Debug, Default)]
pub struct ZoneOffsetCache {
    by_id: RwLock<HashMap<String, ZoneOffset>>,
    ids: RwLock<HashMap<i32, Arc<str>>>,
}

impl ZoneOffsetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// [`ZoneOffset::of`], memoised on the input text.
    pub fn parse(&self, id: &str) -> Result<ZoneOffset> {
        if let Some(offset) = self.by_id.read().ok().and_then(|m| m.get(id).copied()) {
            return Ok(offset);
        }
        let offset = ZoneOffset::of(id)?;
        if let Ok(mut map) = self.by_id.write() {
            trace!("caching zone offset {offset} for id {id:?}");
            map.entry(id.to_owned()).or_insert(offset);
        }
        Ok(offset)
    }

    /// Shared canonical ID of `offset`.  Only quarter-hour offsets are kept.
    pub fn id(&self, offset: ZoneOffset) -> Arc<str> {
        let key = offset.total_seconds();
        if let Some(id) = self.ids.read().ok().and_then(|m| m.get(&key).cloned()) {
            return id;
        }
        let id: Arc<str> = Arc::from(offset.to_string());
        if key % (15 * SECONDS_PER_MINUTE) == 0 {
            if let Ok(mut map) = self.ids.write() {
                return map.entry(key).or_insert(id).clone();
            }
        }
        id
    }

    /// Number of memoised parse entries.
    pub fn len(&self) -> usize {
        self.by_id.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(h: i32, m: i32, s: i32) -> ZoneOffset {
        ZoneOffset::of_hours_minutes_seconds(h, m, s).unwrap()
    }

    #[test]
    fn constants() {
        assert_eq!(ZoneOffset::MAX.total_seconds(), 64_800);
        assert_eq!(ZoneOffset::MIN.total_seconds(), -64_800);
        assert_eq!(ZoneOffset::UTC.to_string(), "Z");
        assert_eq!(ZoneOffset::MAX.to_string(), "+18:00");
        assert_eq!(ZoneOffset::MIN.to_string(), "-18:00");
    }

    #[test]
    fn total_seconds_bounds() {
        assert!(ZoneOffset::of_total_seconds(64_800).is_ok());
        assert!(ZoneOffset::of_total_seconds(64_801).unwrap_err().is_range());
        assert!(ZoneOffset::of_total_seconds(-64_801).unwrap_err().is_range());
        assert_eq!(ZoneOffset::of_total_seconds(3_723).unwrap(), hms(1, 2, 3));
    }

    #[test]
    fn hours_out_of_range() {
        assert!(ZoneOffset::of_hours(19).unwrap_err().is_range());
        assert!(ZoneOffset::of_hours(-19).unwrap_err().is_range());
        assert!(ZoneOffset::of_hours(18).is_ok());
        assert!(ZoneOffset::of_hours_minutes(18, 1).unwrap_err().is_range());
        assert!(ZoneOffset::of_hours_minutes_seconds(-18, 0, -1)
            .unwrap_err()
            .is_range());
    }

    #[test]
    fn sign_consistency() {
        assert!(ZoneOffset::of_hours_minutes(1, -1).unwrap_err().is_range());
        assert!(ZoneOffset::of_hours_minutes(-1, 1).unwrap_err().is_range());
        assert!(ZoneOffset::of_hours_minutes_seconds(0, 1, -1)
            .unwrap_err()
            .is_range());
        assert!(ZoneOffset::of_hours_minutes_seconds(0, -1, -1).is_ok());
        assert!(ZoneOffset::of_hours_minutes_seconds(0, 0, -59).is_ok());
        assert!(ZoneOffset::of_hours_minutes(0, 60).unwrap_err().is_range());
        assert!(ZoneOffset::of_hours_minutes_seconds(1, 0, 60)
            .unwrap_err()
            .is_range());
    }

    #[test]
    fn parse_all_shapes() {
        let cases = [
            ("Z", 0),
            ("+1", 3_600),
            ("-7", -25_200),
            ("+01", 3_600),
            ("-01", -3_600),
            ("+0130", 5_400),
            ("+01:30", 5_400),
            ("-01:30", -5_400),
            ("+013015", 5_415),
            ("+01:30:15", 5_415),
            ("-00:00:01", -1),
            ("+18:00", 64_800),
            ("+00", 0),
        ];
        for (text, seconds) in cases {
            assert_eq!(
                ZoneOffset::of(text).unwrap().total_seconds(),
                seconds,
                "{text}"
            );
        }
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        for text in [
            "", "z", "+", "0100", "01:00", "+1:00", "+01:0", "+01-30", "+0a", "+01:3a",
            "+01:30:1", "+01:30:15:00", "+0130:15", "*01", "+01 30", "+1130:0",
        ] {
            let err = ZoneOffset::of(text).unwrap_err();
            assert!(err.is_parse(), "{text:?} -> {err:?}");
        }
        assert!(ZoneOffset::of("+19").unwrap_err().is_range());
        assert!(ZoneOffset::of("+18:01").unwrap_err().is_range());
        assert!(ZoneOffset::of("+01:60").unwrap_err().is_range());
    }

    #[test]
    fn canonical_ids() {
        assert_eq!(hms(1, 0, 0).to_string(), "+01:00");
        assert_eq!(hms(-5, -30, 0).to_string(), "-05:30");
        assert_eq!(hms(0, 0, -15).to_string(), "-00:00:15");
        assert_eq!(hms(12, 34, 56).id(), "+12:34:56");
    }

    #[test]
    fn roundtrip_every_quarter_hour_and_some_seconds() {
        for total in (-64_800..=64_800).step_by(900) {
            let offset = ZoneOffset::of_total_seconds(total).unwrap();
            assert_eq!(ZoneOffset::of(&offset.to_string()).unwrap(), offset);
        }
        for (h, m, s) in [(5, 59, 59), (-5, -59, -59), (0, 0, 1), (0, -1, 0)] {
            let offset = hms(h, m, s);
            assert_eq!(ZoneOffset::of(&offset.id()).unwrap(), offset);
        }
    }

    #[test]
    fn ordering_is_descending() {
        let plus14 = ZoneOffset::of_hours(14).unwrap();
        let minus12 = ZoneOffset::of_hours(-12).unwrap();
        assert!(plus14 < minus12);
        let mut offsets = vec![minus12, ZoneOffset::UTC, plus14];
        offsets.sort();
        assert_eq!(offsets, vec![plus14, ZoneOffset::UTC, minus12]);
    }

    #[test]
    fn conversions() {
        let offset = hms(5, 30, 0);
        let fixed: FixedOffset = offset.into();
        assert_eq!(fixed.local_minus_utc(), 19_800);
        assert_eq!(ZoneOffset::try_from(fixed).unwrap(), offset);
        let too_far = FixedOffset::east_opt(20 * 3_600).unwrap();
        assert!(ZoneOffset::try_from(too_far).unwrap_err().is_range());
        assert_eq!(Seconds::from(offset), Seconds::new(19_800.0));
    }

    #[test]
    fn fixed_rules() {
        let offset = hms(2, 0, 0);
        let rules = offset.rules();
        assert!(rules.is_fixed_offset());
        assert_eq!(rules.standard_offset(), offset);
    }

    #[test]
    fn cache_matches_uncached() {
        let cache = ZoneOffsetCache::new();
        assert!(cache.is_empty());
        let first = cache.parse("+05:30").unwrap();
        let second = cache.parse("+05:30").unwrap();
        assert_eq!(first, second);
        assert_eq!(first, ZoneOffset::of("+05:30").unwrap());
        assert_eq!(cache.len(), 1);
        assert!(cache.parse("+5:30").unwrap_err().is_parse());
        assert_eq!(cache.len(), 1);

        let a = cache.id(first);
        let b = cache.id(first);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(&*a, "+05:30");
        let odd = hms(0, 0, 7);
        assert_eq!(&*cache.id(odd), "+00:00:07");
    }

    #[test]
    fn cache_is_shareable_across_threads() {
        let cache = Arc::new(ZoneOffsetCache::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.parse("-03:00").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), ZoneOffset::of_hours(-3).unwrap());
        }
        assert_eq!(cache.len(), 1);
    }
}
