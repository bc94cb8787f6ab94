// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for listing activities and fetching gear.
//!
//! Handles:
//! - Paginated activity listing (with `after` watermark)
//! - Gear lookups
//! - Bearer auth via the shared credential store
//! - Fault payload detection and optional retry of network failures

use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::batch::ResourceSource;
use super::credentials::CredentialStore;
use super::fault;
use super::merge::Watermark;
use super::pager::PageSource;
use super::retry::{retry_with_backoff, RetryAction, RetryConfig};
use super::transport::Transport;
use crate::error::ApiError;
use crate::models::{Activity, Gear};

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    transport: Arc<dyn Transport>,
    credentials: Arc<CredentialStore>,
    base_url: String,
    retry: RetryConfig,
}

impl StravaClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<CredentialStore>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            credentials,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryConfig::none(),
        }
    }

    /// Retry transient network failures with this policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// List one page of the athlete's activities started after `after`
    /// (Unix timestamp).
    pub async fn list_activities(
        &self,
        after: i64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Activity>, ApiError> {
        let url = format!(
            "{}/athlete/activities?after={}&page={}&per_page={}",
            self.base_url, after, page, per_page
        );
        self.get_json(&url).await
    }

    /// Get gear by ID.
    pub async fn get_gear(&self, gear_id: &str) -> Result<Gear, ApiError> {
        let url = format!("{}/gear/{}", self.base_url, urlencoding::encode(gear_id));
        self.get_json(&url).await
    }

    /// Authenticated GET with fault detection and JSON decoding.
    ///
    /// The access token is re-read from the store on every attempt.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        retry_with_backoff(
            &self.retry,
            |e: &ApiError| {
                if e.is_transient() {
                    RetryAction::Retry
                } else {
                    RetryAction::Abort
                }
            },
            move || async move {
                let access_token = self.credentials.get_access_token().await?;
                let response = self
                    .transport
                    .get(url, &access_token)
                    .await
                    .map_err(|e| ApiError::Transport(e.to_string()))?;
                fault::decode(&response)
            },
        )
        .await
    }
}

#[async_trait::async_trait]
impl PageSource for StravaClient {
    type Record = Activity;

    async fn fetch_page(
        &self,
        watermark: Watermark,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Activity>, ApiError> {
        self.list_activities(watermark.epoch(), page, per_page).await
    }
}

#[async_trait::async_trait]
impl ResourceSource for StravaClient {
    type Resource = Gear;

    async fn fetch_resource(&self, id: &str) -> Result<Gear, ApiError> {
        self.get_gear(id).await
    }
}
