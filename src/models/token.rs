// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Margin before token expiration when we proactively refresh (5 minutes).
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// OAuth token as stored on disk.
///
/// Field names match the Strava token endpoint response, so a raw refresh
/// response body is also a valid token file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    /// Expiry as Unix epoch seconds
    pub expires_at: i64,
    pub refresh_token: String,
}

impl Token {
    /// True if the token expires within the refresh margin of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        (now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS)).timestamp() > self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
