// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod gear;
pub mod token;

pub use activity::{gear_ids, Activity, DetailedActivity, Timestamped};
pub use gear::{Gear, GearMap};
pub use token::Token;
