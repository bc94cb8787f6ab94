// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for the fetch engine.
//!
//! Component errors propagate unchanged up to the orchestrator, which is the
//! only place that decides whether a failure is fatal (auth, fetch) or only
//! worth a warning (cache).

use std::path::PathBuf;

use crate::config::ConfigError;

/// Credential failures. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Couldn't read token data from {path}: {source}")]
    MissingCredentials {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Couldn't parse token data: {0}")]
    InvalidCredentials(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Couldn't write token data to {path}: {message}")]
    Persist { path: PathBuf, message: String },

    /// An earlier load or refresh on the same store failed with this message.
    #[error("{0}")]
    Unavailable(String),
}

/// Failure of a single API request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Strava API error (HTTP {status}): {message}")]
    Fault { status: u16, message: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    /// Marker Strava puts in the fault message when a rate limit is hit.
    pub const RATE_LIMIT_MESSAGE: &'static str = "Rate Limit Exceeded";

    /// True if the request was rejected by the API rate limiter.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            ApiError::Fault { status, message } => {
                *status == 429 || message.contains(Self::RATE_LIMIT_MESSAGE)
            }
            ApiError::Http { status, .. } => *status == 429,
            _ => false,
        }
    }

    /// True for network-level failures that may succeed when retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

/// A fetch operation failed; no partial result was produced.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to fetch page {page}: {source}")]
    Page {
        page: u32,
        #[source]
        source: ApiError,
    },

    #[error("Failed to fetch resource {id}: {source}")]
    Resource {
        id: String,
        #[source]
        source: ApiError,
    },

    #[error("Fetch worker failed: {0}")]
    Worker(String),
}

impl FetchError {
    /// The underlying API error, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            FetchError::Page { source, .. } | FetchError::Resource { source, .. } => Some(source),
            FetchError::Worker(_) => None,
        }
    }
}

/// Local cache failures. Never fatal.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Couldn't read cache from {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Couldn't parse cache {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Couldn't write cache to {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Top-level error returned by the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Couldn't set up HTTP client: {0}")]
    Client(String),
}

impl AppError {
    /// True if the failure came from the credential store, either directly
    /// or while authenticating a page or resource request.
    pub fn is_auth(&self) -> bool {
        match self {
            AppError::Auth(_) => true,
            AppError::Fetch(e) => matches!(e.api_error(), Some(ApiError::Auth(_))),
            _ => false,
        }
    }
}

/// Result type alias for the orchestrator
pub type Result<T> = std::result::Result<T, AppError>;
