// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Zone rules and the providers that supply them.
//!
//! A [`ZoneRules`] answers one question: which [`ZoneOffset`] applies at a
//! given instant.  Rules are either fixed (a single offset for all time) or a
//! standard offset followed by an ordered list of [`ZoneOffsetTransition`]s.
//!
//! Region IDs such as `Europe/Paris` are resolved to rules through a
//! [`ZoneRulesProvider`].  The crate ships one implementation,
//! [`ZoneRulesRegistry`], an in-memory table that callers populate; the
//! process-wide instance returned by [`ZoneRulesRegistry::global`] is seeded
//! with the fixed UTC aliases `UTC`, `GMT`, `Etc/UTC` and `Etc/GMT`.

use crate::error::{Error, Result};
use crate::instant::Instant;
use crate::offset::ZoneOffset;
use chrono::TimeDelta;
use log::debug;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

// ═══════════════════════════════════════════════════════════════════════════
// Transitions
// ═══════════════════════════════════════════════════════════════════════════

/// A change of offset at an instant, e.g. the start of daylight saving time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ZoneOffsetTransition {
    instant: Instant,
    offset_before: ZoneOffset,
    offset_after: ZoneOffset,
}

impl ZoneOffsetTransition {
    /// Fails with a range error when both offsets are equal.
    pub fn new(instant: Instant, offset_before: ZoneOffset, offset_after: ZoneOffset) -> Result<Self> {
        if offset_before == offset_after {
            return Err(Error::range("Offsets must not be equal"));
        }
        Ok(Self {
            instant,
            offset_before,
            offset_after,
        })
    }

    #[inline]
    pub fn instant(&self) -> Instant {
        self.instant
    }

    #[inline]
    pub fn offset_before(&self) -> ZoneOffset {
        self.offset_before
    }

    #[inline]
    pub fn offset_after(&self) -> ZoneOffset {
        self.offset_after
    }

    /// Signed change of the local clock reading across the transition.
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::seconds(
            self.offset_after.total_seconds() as i64 - self.offset_before.total_seconds() as i64,
        )
    }

    /// Local clocks jump forward, leaving a gap of local times.
    pub fn is_gap(&self) -> bool {
        self.offset_after.total_seconds() > self.offset_before.total_seconds()
    }

    /// Local clocks move back, repeating a range of local times.
    pub fn is_overlap(&self) -> bool {
        !self.is_gap()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Rules
// ═══════════════════════════════════════════════════════════════════════════

/// Offset rules of a zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneRules {
    standard: ZoneOffset,
    transitions: Vec<ZoneOffsetTransition>,
}

impl ZoneRules {
    /// Rules that always return `offset`.
    pub fn fixed(offset: ZoneOffset) -> Self {
        Self {
            standard: offset,
            transitions: Vec::new(),
        }
    }

    /// Rules starting at `standard` and changing at each transition.
    ///
    /// Transitions are sorted by instant.  Each one must start from the offset
    /// left by its predecessor (or `standard` for the first), and no two may
    /// share an instant.
    pub fn of(standard: ZoneOffset, mut transitions: Vec<ZoneOffsetTransition>) -> Result<Self> {
        transitions.sort_by_key(|t| t.instant);
        let mut current = standard;
        let mut previous: Option<Instant> = None;
        for transition in &transitions {
            if previous == Some(transition.instant) {
                return Err(Error::range(format!(
                    "Duplicate zone transition at {}",
                    transition.instant
                )));
            }
            if transition.offset_before != current {
                return Err(Error::range(format!(
                    "Zone transition at {} starts from {} but the offset in force is {}",
                    transition.instant, transition.offset_before, current
                )));
            }
            current = transition.offset_after;
            previous = Some(transition.instant);
        }
        Ok(Self {
            standard,
            transitions,
        })
    }

    /// Offset in force before the first transition.
    #[inline]
    pub fn standard_offset(&self) -> ZoneOffset {
        self.standard
    }

    pub fn transitions(&self) -> &[ZoneOffsetTransition] {
        &self.transitions
    }

    /// `true` when the same offset applies at every instant.
    pub fn is_fixed_offset(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Offset applicable at `instant`.  A transition applies from its own
    /// instant onwards.
    pub fn offset_at(&self, instant: Instant) -> ZoneOffset {
        let passed = self.transitions.partition_point(|t| t.instant <= instant);
        match passed {
            0 => self.standard,
            n => self.transitions[n - 1].offset_after,
        }
    }

    /// First transition strictly after `instant`, if any.
    pub fn next_transition(&self, instant: Instant) -> Option<&ZoneOffsetTransition> {
        let passed = self.transitions.partition_point(|t| t.instant <= instant);
        self.transitions.get(passed)
    }

    /// Last transition at or before `instant`, if any.
    pub fn previous_transition(&self, instant: Instant) -> Option<&ZoneOffsetTransition> {
        let passed = self.transitions.partition_point(|t| t.instant <= instant);
        passed.checked_sub(1).map(|i| &self.transitions[i])
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Providers
// ═══════════════════════════════════════════════════════════════════════════

/// Source of rules for region IDs.
///
/// `for_caching` is `true` when the caller intends to keep the returned
/// rules inside a [`ZoneRegion`](crate::ZoneRegion) rather than use them once.
pub trait ZoneRulesProvider: Send + Sync {
    /// Rules for `id`, or [`Error::UnknownZone`].
    fn provide_rules(&self, id: &str, for_caching: bool) -> Result<ZoneRules>;

    /// Every region ID this provider can resolve.
    fn available_ids(&self) -> BTreeSet<String>;
}

/// In-memory, thread-safe [`ZoneRulesProvider`].
#[derive(Debug, Default)]
pub struct ZoneRulesRegistry {
    zones: RwLock<BTreeMap<String, ZoneRules>>,
}

static GLOBAL: Lazy<ZoneRulesRegistry> = Lazy::new(|| {
    let registry = ZoneRulesRegistry::new();
    for id in ["UTC", "GMT", "Etc/UTC", "Etc/GMT"] {
        registry.register(id, ZoneRules::fixed(ZoneOffset::UTC));
    }
    registry
});

impl ZoneRulesRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by [`ZoneId::of`](crate::ZoneId::of).
    pub fn global() -> &'static ZoneRulesRegistry {
        &GLOBAL
    }

    /// Add or replace the rules for `id`, returning the previous rules.
    pub fn register(&self, id: impl Into<String>, rules: ZoneRules) -> Option<ZoneRules> {
        let id = id.into();
        debug!("registering zone rules for {id}");
        match self.zones.write() {
            Ok(mut zones) => zones.insert(id, rules),
            Err(poisoned) => poisoned.into_inner().insert(id, rules),
        }
    }

    /// Remove the rules for `id`.
    pub fn unregister(&self, id: &str) -> Option<ZoneRules> {
        match self.zones.write() {
            Ok(mut zones) => zones.remove(id),
            Err(poisoned) => poisoned.into_inner().remove(id),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        match self.zones.read() {
            Ok(zones) => zones.contains_key(id),
            Err(poisoned) => poisoned.into_inner().contains_key(id),
        }
    }

    pub fn len(&self) -> usize {
        match self.zones.read() {
            Ok(zones) => zones.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ZoneRulesProvider for ZoneRulesRegistry {
    fn provide_rules(&self, id: &str, for_caching: bool) -> Result<ZoneRules> {
        let found = match self.zones.read() {
            Ok(zones) => zones.get(id).cloned(),
            Err(poisoned) => poisoned.into_inner().get(id).cloned(),
        };
        found.ok_or_else(|| {
            debug!("no zone rules for {id} (for_caching={for_caching})");
            Error::UnknownZone(id.to_owned())
        })
    }

    fn available_ids(&self) -> BTreeSet<String> {
        match self.zones.read() {
            Ok(zones) => zones.keys().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().keys().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> Instant {
        chrono::Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn hours(h: i32) -> ZoneOffset {
        ZoneOffset::of_hours(h).unwrap()
    }

    fn paris_2024() -> ZoneRules {
        ZoneRules::of(
            hours(1),
            vec![
                ZoneOffsetTransition::new(at(2024, 3, 31, 1), hours(1), hours(2)).unwrap(),
                ZoneOffsetTransition::new(at(2024, 10, 27, 1), hours(2), hours(1)).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_fixed_rules() {
        let rules = ZoneRules::fixed(hours(3));
        assert!(rules.is_fixed_offset());
        assert!(rules.transitions().is_empty());
        assert_eq!(rules.offset_at(at(1970, 1, 1, 0)), hours(3));
        assert!(rules.next_transition(at(2000, 1, 1, 0)).is_none());
    }

    #[test]
    fn test_offset_at_follows_transitions() {
        let rules = paris_2024();
        assert!(!rules.is_fixed_offset());
        assert_eq!(rules.offset_at(at(2024, 1, 15, 12)), hours(1));
        assert_eq!(rules.offset_at(at(2024, 3, 31, 0)), hours(1));
        assert_eq!(rules.offset_at(at(2024, 3, 31, 1)), hours(2));
        assert_eq!(rules.offset_at(at(2024, 7, 1, 0)), hours(2));
        assert_eq!(rules.offset_at(at(2024, 12, 1, 0)), hours(1));
    }

    #[test]
    fn test_neighbouring_transitions() {
        let rules = paris_2024();
        let summer = at(2024, 7, 1, 0);
        assert!(rules.previous_transition(summer).unwrap().is_gap());
        assert!(rules.next_transition(summer).unwrap().is_overlap());
        assert_eq!(
            rules.next_transition(summer).unwrap().duration(),
            TimeDelta::hours(-1)
        );
        assert!(rules.previous_transition(at(2000, 1, 1, 0)).is_none());
    }

    #[test]
    fn test_transition_validation() {
        assert!(ZoneOffsetTransition::new(at(2024, 1, 1, 0), hours(1), hours(1))
            .unwrap_err()
            .is_range());
        let broken = ZoneRules::of(
            hours(1),
            vec![ZoneOffsetTransition::new(at(2024, 1, 1, 0), hours(2), hours(3)).unwrap()],
        );
        assert!(broken.unwrap_err().is_range());
        let t = ZoneOffsetTransition::new(at(2024, 1, 1, 0), hours(1), hours(2)).unwrap();
        let back = ZoneOffsetTransition::new(at(2024, 1, 1, 0), hours(2), hours(1)).unwrap();
        assert!(ZoneRules::of(hours(1), vec![t, back]).unwrap_err().is_range());
    }

    #[test]
    fn test_transitions_are_sorted() {
        let late = ZoneOffsetTransition::new(at(2024, 10, 27, 1), hours(2), hours(1)).unwrap();
        let early = ZoneOffsetTransition::new(at(2024, 3, 31, 1), hours(1), hours(2)).unwrap();
        let rules = ZoneRules::of(hours(1), vec![late, early]).unwrap();
        assert_eq!(rules, paris_2024());
    }

    #[test]
    fn test_registry_lookup() {
        let registry = ZoneRulesRegistry::new();
        assert!(registry.is_empty());
        assert!(registry
            .provide_rules("Europe/Paris", false)
            .unwrap_err()
            .is_unknown_zone());
        assert!(registry.register("Europe/Paris", paris_2024()).is_none());
        assert!(registry.contains("Europe/Paris"));
        assert_eq!(registry.provide_rules("Europe/Paris", true).unwrap(), paris_2024());
        assert_eq!(
            registry.available_ids().into_iter().collect::<Vec<_>>(),
            vec!["Europe/Paris".to_owned()]
        );
        assert!(registry.unregister("Europe/Paris").is_some());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_global_registry_is_seeded() {
        let global = ZoneRulesRegistry::global();
        for id in ["UTC", "GMT", "Etc/UTC", "Etc/GMT"] {
            let rules = global.provide_rules(id, false).unwrap();
            assert!(rules.is_fixed_offset());
            assert_eq!(rules.standard_offset(), ZoneOffset::UTC);
        }
    }
}
