// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Values come from the process environment, optionally seeded from
//! `~/.sls/config.env` and a local `.env` file.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default Strava API base URL.
pub const DEFAULT_API_URL: &str = "https://www.strava.com/api/v3";
/// Default OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://www.strava.com/oauth/token";

/// Largest page Strava serves. A larger request gets 200 records back,
/// which would read as a short final page.
pub const MAX_PER_PAGE: u32 = 200;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Credentials ---
    /// Strava OAuth client ID
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Bootstrap/refreshed token file
    pub token_path: PathBuf,

    // --- Cache ---
    /// Activity cache file (empty path disables the cache)
    pub activity_cache: PathBuf,
    /// Gear cache file (empty path disables the cache)
    pub gear_cache: PathBuf,

    // --- Fetching ---
    /// Worker pool size for full fetches and gear batches
    pub concurrency: usize,
    /// Page size requested from the activities endpoint
    pub per_page: u32,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Retries for transient network failures (0 = never retry)
    pub max_retries: u32,

    // --- Endpoints ---
    pub api_url: String,
    pub token_url: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            token_path: PathBuf::from("token"),
            activity_cache: PathBuf::new(),
            gear_cache: PathBuf::new(),
            concurrency: 20,
            per_page: 100,
            request_timeout_secs: 30,
            max_retries: 0,
            api_url: DEFAULT_API_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let dir = config_dir();
        dotenvy::from_path(dir.join("config.env")).ok();
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            token_path: path_var("SLS_TOKEN_PATH", &dir, "token"),
            activity_cache: path_var("SLS_ACTIVITY_CACHE", &dir, "activities.json"),
            gear_cache: path_var("SLS_GEAR_CACHE", &dir, "gear.json"),
            concurrency: parse_var("SLS_CONCURRENCY", 20)?,
            per_page: parse_per_page()?,
            request_timeout_secs: parse_var("SLS_REQUEST_TIMEOUT_SECS", 30)?,
            max_retries: parse_var("SLS_MAX_RETRIES", 0)?,
            api_url: env::var("STRAVA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            token_url: env::var("STRAVA_TOKEN_URL")
                .unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string()),
        })
    }
}

/// `~/.sls`, or `.sls` relative to the working directory if there is no home.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".sls"))
        .unwrap_or_else(|| PathBuf::from(".sls"))
}

fn path_var(name: &str, dir: &Path, default_file: &str) -> PathBuf {
    match env::var(name) {
        Ok(v) => expand_tilde(v.trim()),
        Err(_) => dir.join(default_file),
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

fn parse_per_page() -> Result<u32, ConfigError> {
    let per_page = parse_var("SLS_PER_PAGE", 100)?;
    if (1..=MAX_PER_PAGE).contains(&per_page) {
        Ok(per_page)
    } else {
        Err(ConfigError::Invalid {
            name: "SLS_PER_PAGE",
            value: per_page.to_string(),
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: value.clone(),
        }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
