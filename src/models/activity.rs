// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava activity model for the cache and rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::gear::{Gear, GearMap};

/// Records that carry an ordering timestamp.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Summary activity as returned by `GET /athlete/activities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Strava activity ID
    pub id: i64,
    /// Activity name/title
    #[serde(default)]
    pub name: String,
    /// Activity type (Ride, Run, Hike, etc.)
    #[serde(rename = "type", default)]
    pub activity_type: String,
    /// Distance in meters
    #[serde(default)]
    pub distance: f64,
    /// Elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain: f64,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: u64,
    /// Start date in the athlete's timezone, as returned by Strava
    #[serde(default)]
    pub start_date_local: String,
    /// Start date (UTC); the ordering key
    pub start_date: DateTime<Utc>,
    /// Gear used, if any
    #[serde(default)]
    pub gear_id: Option<String>,
    /// Upload identifier (e.g. device file name)
    #[serde(default)]
    pub external_id: Option<String>,
    /// Work in kJ (rides only)
    #[serde(default)]
    pub kilojoules: f64,
    /// Average power in watts
    #[serde(default)]
    pub average_watts: f64,
    /// Whether power came from a power meter
    #[serde(default)]
    pub device_watts: bool,
}

impl Timestamped for Activity {
    fn timestamp(&self) -> DateTime<Utc> {
        self.start_date
    }
}

impl Activity {
    /// Gear id, treating an empty string like no gear.
    pub fn gear_ref(&self) -> Option<&str> {
        self.gear_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Distinct gear ids referenced by `activities`, in sorted order.
pub fn gear_ids(activities: &[Activity]) -> BTreeSet<String> {
    activities
        .iter()
        .filter_map(|a| a.gear_ref())
        .map(str::to_string)
        .collect()
}

/// An activity joined with its gear, for output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedActivity {
    pub activity: Activity,
    pub gear: Gear,
}

impl DetailedActivity {
    /// Join activities with gear, substituting a placeholder for unknown gear.
    pub fn join(activities: &[Activity], gear: &GearMap) -> Vec<DetailedActivity> {
        activities
            .iter()
            .map(|a| DetailedActivity {
                activity: a.clone(),
                gear: a
                    .gear_ref()
                    .and_then(|id| gear.get(id))
                    .cloned()
                    .unwrap_or_else(Gear::placeholder),
            })
            .collect()
    }
}
