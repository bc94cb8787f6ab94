// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! sls: list Strava activities from an incrementally updated local cache.
//!
//! The fetch engine pages through the athlete's activities with a worker
//! pool, fills in referenced gear, and merges the result into JSON caches so
//! later runs only fetch what is new.

pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod services;
pub mod time_utils;
