// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Incremental cache merge policy.
//!
//! A run only fetches activities newer than the last cached one (the
//! watermark), then appends them to the cache. Gear is fetched only for ids
//! the cache doesn't already hold, and cached gear that no activity
//! references any more is dropped.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::models::{gear_ids, Activity, GearMap, Timestamped};

/// Timestamp boundary for incremental fetches. Zero (the Unix epoch) means
/// "fetch everything".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Watermark(DateTime<Utc>);

impl Watermark {
    pub const ZERO: Watermark = Watermark(DateTime::<Utc>::UNIX_EPOCH);

    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Watermark from Unix epoch seconds. Out-of-range values become zero.
    pub fn from_epoch(secs: i64) -> Self {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .unwrap_or(Self::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.epoch() <= 0
    }

    /// Unix epoch seconds, as sent in the `after` query parameter.
    pub fn epoch(&self) -> i64 {
        self.0.timestamp()
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for Watermark {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Pick the fetch watermark: the newest cached activity's timestamp, or zero
/// for an empty cache or a forced refresh.
///
/// `cached` must be in ascending timestamp order.
pub fn plan<T: Timestamped>(cached: &[T], force_refresh: bool) -> Watermark {
    if force_refresh {
        return Watermark::ZERO;
    }
    cached
        .last()
        .map(|latest| Watermark::new(latest.timestamp()))
        .unwrap_or(Watermark::ZERO)
}

/// Gear ids referenced by `activities` that must be fetched: those missing
/// from `cached`, or all of them on a forced refresh.
pub fn missing_gear_ids(
    activities: &[Activity],
    cached: &GearMap,
    force_refresh: bool,
) -> Vec<String> {
    gear_ids(activities)
        .into_iter()
        .filter(|id| force_refresh || !cached.contains_key(id))
        .collect()
}

/// Combine cached and freshly fetched activities in ascending start order.
///
/// The API's `after` filter may return a record that is already cached (same
/// timestamp as the watermark). Such a record is kept once, using the fresh
/// copy. Distinct records sharing a timestamp are all kept.
pub fn merge_activities(cached: Vec<Activity>, fresh: Vec<Activity>) -> Vec<Activity> {
    let fresh_ids: HashSet<i64> = fresh.iter().map(|a| a.id).collect();
    let before = cached.len();

    let mut merged: Vec<Activity> = cached
        .into_iter()
        .filter(|a| !fresh_ids.contains(&a.id))
        .collect();
    let replaced = before - merged.len();
    if replaced > 0 {
        tracing::debug!(replaced, "Replaced cached activities with fresh copies");
    }

    merged.extend(fresh);
    // Stable: cached records stay ahead of fresh ones with the same timestamp
    merged.sort_by_key(|a| a.timestamp());
    merged
}

/// Combine cached and fresh gear, keeping only gear referenced by `activities`.
pub fn merge_gear(cached: GearMap, fresh: GearMap, activities: &[Activity]) -> GearMap {
    let referenced = gear_ids(activities);
    let mut merged: GearMap = cached
        .into_iter()
        .filter(|(id, _)| referenced.contains(id))
        .collect();
    merged.extend(fresh);
    merged
}
