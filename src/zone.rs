// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-zone identifiers.
//!
//! A [`ZoneId`] is either a fixed [`ZoneOffset`] or a [`ZoneRegion`] whose
//! offsets come from [`ZoneRules`] looked up by ID.
//!
//! # Accepted IDs
//!
//! | Input | Result |
//! |-------|--------|
//! | `Z`, `+hh:mm`, `-hh`, … | [`ZoneId::Offset`] |
//! | `UTC`, `GMT`, `UT` | region with that ID and UTC rules |
//! | `UTC+hh:mm`, `GMT-hh`, `UT+h`, … | region with the prefix and fixed rules; a zero offset keeps only the prefix |
//! | `Area/City` and other region names | region resolved through a [`ZoneRulesProvider`] |
//!
//! Region names must match `[A-Za-z][A-Za-z0-9~/._+-]+`.  A malformed name is
//! a format error; a well-formed name the provider does not know is an
//! unknown-zone error, unless the ID is created leniently with
//! [`ZoneId::of_lenient`], in which case rules stay unresolved until
//! [`ZoneId::rules_with`] is asked again.
//!
//! Two IDs are equal when their ID strings are equal, so `UTC`, `Z` and
//! `Etc/UTC` are three distinct zones even though they share an offset.
//! [`ZoneId::normalized`] folds fixed-offset zones onto their offset.

use crate::error::{Error, Result};
use crate::instant::Instant;
use crate::offset::ZoneOffset;
use crate::rules::{ZoneRules, ZoneRulesProvider, ZoneRulesRegistry};
use log::{debug, warn};
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Legacy three-letter zone IDs and their region (or offset) equivalents,
/// for use with [`ZoneId::of_with_aliases`].
pub static SHORT_IDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ACT", "Australia/Darwin"),
        ("AET", "Australia/Sydney"),
        ("AGT", "America/Argentina/Buenos_Aires"),
        ("ART", "Africa/Cairo"),
        ("AST", "America/Anchorage"),
        ("BET", "America/Sao_Paulo"),
        ("BST", "Asia/Dhaka"),
        ("CAT", "Africa/Harare"),
        ("CNT", "America/St_Johns"),
        ("CST", "America/Chicago"),
        ("CTT", "Asia/Shanghai"),
        ("EAT", "Africa/Addis_Ababa"),
        ("ECT", "Europe/Paris"),
        ("IET", "America/Indiana/Indianapolis"),
        ("IST", "Asia/Kolkata"),
        ("JST", "Asia/Tokyo"),
        ("MIT", "Pacific/Apia"),
        ("NET", "Asia/Yerevan"),
        ("NST", "Pacific/Auckland"),
        ("PLT", "Asia/Karachi"),
        ("PNT", "America/Phoenix"),
        ("PRT", "America/Puerto_Rico"),
        ("PST", "America/Los_Angeles"),
        ("SST", "Pacific/Guadalcanal"),
        ("VST", "Asia/Ho_Chi_Minh"),
        ("EST", "-05:00"),
        ("MST", "-07:00"),
        ("HST", "-10:00"),
    ])
});

// ═══════════════════════════════════════════════════════════════════════════
// ZoneRegion
// ═══════════════════════════════════════════════════════════════════════════

/// A named zone whose rules come from a provider.
#[derive(Debug, Clone)]
pub struct ZoneRegion {
    id: String,
    rules: Option<ZoneRules>,
}

impl ZoneRegion {
    fn resolved(id: impl Into<String>, rules: ZoneRules) -> Self {
        Self {
            id: id.into(),
            rules: Some(rules),
        }
    }

    fn of_id(id: &str, provider: &dyn ZoneRulesProvider, check_available: bool) -> Result<Self> {
        check_region_name(id)?;
        match provider.provide_rules(id, true) {
            Ok(rules) => Ok(Self::resolved(id, rules)),
            Err(err) if check_available => Err(err),
            Err(_) => {
                debug!("zone region {id} created without rules");
                Ok(Self {
                    id: id.to_owned(),
                    rules: None,
                })
            }
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Rules captured at construction, if they could be resolved then.
    pub fn resolved_rules(&self) -> Option<&ZoneRules> {
        self.rules.as_ref()
    }

    /// Captured rules, or a fresh lookup in `provider` when unresolved.
    pub fn rules_with(&self, provider: &dyn ZoneRulesProvider) -> Result<ZoneRules> {
        match &self.rules {
            Some(rules) => Ok(rules.clone()),
            None => provider.provide_rules(&self.id, false),
        }
    }

    /// [`ZoneRegion::rules_with`] against the global registry.
    pub fn rules(&self) -> Result<ZoneRules> {
        self.rules_with(ZoneRulesRegistry::global())
    }
}

impl PartialEq for ZoneRegion {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ZoneRegion {}

impl Hash for ZoneRegion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

fn check_region_name(id: &str) -> Result<()> {
    let bytes = id.as_bytes();
    let well_formed = bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1..]
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'~' | b'/' | b'.' | b'_' | b'+' | b'-'));
    if well_formed {
        Ok(())
    } else {
        Err(Error::format(
            id,
            "Invalid ID for region-based ZoneId, invalid format",
        ))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ZoneId
// ═══════════════════════════════════════════════════════════════════════════

/// A time-zone ID: a fixed offset or a region.
#[derive(Debug, Clone)]
pub enum ZoneId {
    Offset(ZoneOffset),
    Region(ZoneRegion),
}

impl ZoneId {
    /// Parse `id`, resolving regions against the global registry.
    pub fn of(id: &str) -> Result<Self> {
        Self::of_with_provider(id, ZoneRulesRegistry::global())
    }

    /// Parse `id`, resolving regions against `provider`.
    pub fn of_with_provider(id: &str, provider: &dyn ZoneRulesProvider) -> Result<Self> {
        parse_zone_id(id, provider, true)
    }

    /// Like [`ZoneId::of_with_provider`], but a well-formed region unknown to
    /// `provider` is accepted with unresolved rules.
    pub fn of_lenient(id: &str, provider: &dyn ZoneRulesProvider) -> Result<Self> {
        parse_zone_id(id, provider, false)
    }

    /// Parse `id` after replacing it through `aliases`, e.g. [`SHORT_IDS`].
    pub fn of_with_aliases(id: &str, aliases: &HashMap<&str, &str>) -> Result<Self> {
        match aliases.get(id) {
            Some(&target) => {
                debug!("zone alias {id} -> {target}");
                Self::of(target)
            }
            None => Self::of(id),
        }
    }

    /// Zone for `offset`, labelled with `prefix` (`""`, `UTC`, `GMT` or `UT`).
    ///
    /// An empty prefix yields the offset itself; otherwise a region with fixed
    /// rules whose ID is the prefix followed by the offset ID, or just the
    /// prefix for a zero offset.
    pub fn of_offset(prefix: &str, offset: ZoneOffset) -> Result<Self> {
        match prefix {
            "" => Ok(Self::Offset(offset)),
            "UTC" | "GMT" | "UT" => {
                let id = if offset.total_seconds() == 0 {
                    prefix.to_owned()
                } else {
                    format!("{prefix}{offset}")
                };
                Ok(Self::Region(ZoneRegion::resolved(id, offset.rules())))
            }
            _ => Err(Error::range(format!(
                "prefix should be GMT, UTC or UT, is: {prefix}"
            ))),
        }
    }

    /// Zone of the host system, looked up in the global registry.
    ///
    /// Falls back to UTC when the host zone cannot be determined or has no
    /// registered rules.
    pub fn system_default() -> Self {
        match iana_time_zone::get_timezone() {
            Ok(name) => Self::of(&name).unwrap_or_else(|err| {
                warn!("system time zone {name} is not available ({err}), using UTC");
                Self::Offset(ZoneOffset::UTC)
            }),
            Err(err) => {
                warn!("cannot determine system time zone ({err}), using UTC");
                Self::Offset(ZoneOffset::UTC)
            }
        }
    }

    /// The canonical ID string.
    pub fn id(&self) -> Cow<'_, str> {
        match self {
            Self::Offset(offset) => Cow::Owned(offset.id()),
            Self::Region(region) => Cow::Borrowed(region.id()),
        }
    }

    /// Rules of this zone; unresolved regions are looked up in the global
    /// registry again.
    pub fn rules(&self) -> Result<ZoneRules> {
        self.rules_with(ZoneRulesRegistry::global())
    }

    /// Rules of this zone; unresolved regions are looked up in `provider`.
    pub fn rules_with(&self, provider: &dyn ZoneRulesProvider) -> Result<ZoneRules> {
        match self {
            Self::Offset(offset) => Ok(offset.rules()),
            Self::Region(region) => region.rules_with(provider),
        }
    }

    /// Offset in force at `instant`; unresolved regions are looked up in the
    /// global registry.
    pub fn offset_at(&self, instant: Instant) -> Result<ZoneOffset> {
        self.offset_at_with(instant, ZoneRulesRegistry::global())
    }

    /// Offset in force at `instant`; unresolved regions are looked up in
    /// `provider`.
    pub fn offset_at_with(
        &self,
        instant: Instant,
        provider: &dyn ZoneRulesProvider,
    ) -> Result<ZoneOffset> {
        match self {
            Self::Offset(offset) => Ok(*offset),
            Self::Region(region) => match region.resolved_rules() {
                Some(rules) => Ok(rules.offset_at(instant)),
                None => Ok(region.rules_with(provider)?.offset_at(instant)),
            },
        }
    }

    /// The equivalent [`ZoneId::Offset`] when the rules are fixed, otherwise
    /// a copy of `self`.  Unresolved regions are looked up in the global
    /// registry; unresolvable rules leave the ID unchanged.
    pub fn normalized(&self) -> ZoneId {
        self.normalized_with(ZoneRulesRegistry::global())
    }

    /// [`ZoneId::normalized`] with unresolved regions looked up in `provider`.
    pub fn normalized_with(&self, provider: &dyn ZoneRulesProvider) -> ZoneId {
        match self {
            Self::Offset(_) => self.clone(),
            Self::Region(region) => match region.rules_with(provider) {
                Ok(rules) if rules.is_fixed_offset() => Self::Offset(rules.standard_offset()),
                _ => self.clone(),
            },
        }
    }

    /// Region IDs known to the global registry.
    pub fn available_zone_ids() -> BTreeSet<String> {
        ZoneRulesRegistry::global().available_ids()
    }
}

fn parse_zone_id(id: &str, provider: &dyn ZoneRulesProvider, check_available: bool) -> Result<ZoneId> {
    if id.len() <= 1 || id.starts_with('+') || id.starts_with('-') {
        return Ok(ZoneId::Offset(ZoneOffset::of(id)?));
    }
    if id.starts_with("UTC") || id.starts_with("GMT") {
        return parse_with_prefix(id, 3, provider, check_available);
    }
    if id.starts_with("UT") {
        return parse_with_prefix(id, 2, provider, check_available);
    }
    Ok(ZoneId::Region(ZoneRegion::of_id(id, provider, check_available)?))
}

fn parse_with_prefix(
    id: &str,
    prefix_len: usize,
    provider: &dyn ZoneRulesProvider,
    check_available: bool,
) -> Result<ZoneId> {
    let (prefix, rest) = id.split_at(prefix_len);
    if rest.is_empty() {
        return ZoneId::of_offset(prefix, ZoneOffset::UTC);
    }
    if !rest.starts_with('+') && !rest.starts_with('-') {
        return Ok(ZoneId::Region(ZoneRegion::of_id(id, provider, check_available)?));
    }
    let offset = ZoneOffset::of(rest)
        .map_err(|e| e.context(format!("Invalid ID for offset-based ZoneId: {id}")))?;
    ZoneId::of_offset(prefix, offset)
}

// ── Identity ──────────────────────────────────────────────────────────────

impl PartialEq for ZoneId {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ZoneId {}

impl Hash for ZoneId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl From<ZoneOffset> for ZoneId {
    fn from(offset: ZoneOffset) -> Self {
        Self::Offset(offset)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset(offset) => fmt::Display::fmt(offset, f),
            Self::Region(region) => f.write_str(region.id()),
        }
    }
}

impl FromStr for ZoneId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::of(s)
    }
}

#[cfg(feature = "serde")]
impl Serialize for ZoneId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.id())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for ZoneId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        ZoneId::of(&text).map_err(de::Error::custom)
    }
}
