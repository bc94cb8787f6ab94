// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava gear (bikes, shoes) model.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Gear referenced by activities through `gear_id`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Gear {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Gear {
    /// Placeholder shown for activities without known gear.
    pub fn placeholder() -> Self {
        Self {
            id: String::new(),
            name: "-".to_string(),
        }
    }
}

/// Gear keyed by id.
pub type GearMap = HashMap<String, Gear>;
