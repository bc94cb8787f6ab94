// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One fetch run: cache load, incremental fetch, gear fill-in, merge.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use super::batch::BatchFetcher;
use super::cache::{JsonCache, Snapshot};
use super::credentials::CredentialStore;
use super::merge::{self, Watermark};
use super::pager::PageFetcher;
use super::retry::RetryConfig;
use super::strava::StravaClient;
use super::transport::{ReqwestTransport, Transport};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Activity, GearMap};
use crate::time_utils::format_utc_rfc3339;

/// Composes the credential store, pager, batch fetcher and caches.
pub struct Orchestrator {
    client: Arc<StravaClient>,
    pager: PageFetcher,
    batch: BatchFetcher,
    activity_cache: JsonCache,
    gear_cache: JsonCache,
    force_refresh: bool,
}

impl Orchestrator {
    /// Build from configuration with the production HTTP transport.
    pub fn from_config(config: &Config, force_refresh: bool) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.request_timeout_secs))
            .map_err(|e| AppError::Client(e.to_string()))?;
        Ok(Self::with_transport(
            config,
            Arc::new(transport),
            force_refresh,
        ))
    }

    /// Build from configuration over an arbitrary transport.
    pub fn with_transport(
        config: &Config,
        transport: Arc<dyn Transport>,
        force_refresh: bool,
    ) -> Self {
        let credentials = Arc::new(CredentialStore::new(
            transport.clone(),
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
            config.token_url.clone(),
            config.token_path.clone(),
        ));
        let client = StravaClient::new(transport, credentials, config.api_url.clone())
            .with_retry(RetryConfig {
                max_retries: config.max_retries,
                ..RetryConfig::default()
            });

        Self {
            client: Arc::new(client),
            pager: PageFetcher::new(config.concurrency, config.per_page),
            batch: BatchFetcher::new(config.concurrency),
            activity_cache: JsonCache::new(config.activity_cache.clone()),
            gear_cache: JsonCache::new(config.gear_cache.clone()),
            force_refresh,
        }
    }

    /// Fetch everything new since the cache was written and merge it in.
    ///
    /// Nothing is written here; see [`Orchestrator::persist`].
    pub async fn run(&self) -> Result<Snapshot> {
        let cached = self.load_cache();
        let watermark = merge::plan(&cached.activities, self.force_refresh);
        tracing::info!(
            cached_activities = cached.activities.len(),
            cached_gear = cached.gear.len(),
            after = %describe(watermark),
            force_refresh = self.force_refresh,
            "Starting fetch"
        );

        let fresh = self.pager.fetch(self.client.clone(), watermark).await?;
        let fresh_count = fresh.len();
        let activities = merge::merge_activities(cached.activities, fresh);

        let missing = merge::missing_gear_ids(&activities, &cached.gear, self.force_refresh);
        let fetched = self.batch.fetch_many(self.client.clone(), &missing).await?;
        let gear = merge::merge_gear(cached.gear, fetched, &activities);

        tracing::info!(
            new_activities = fresh_count,
            activities = activities.len(),
            fetched_gear = missing.len(),
            gear = gear.len(),
            "Fetch complete"
        );
        Ok(Snapshot { activities, gear })
    }

    /// Write both caches. Failures are logged and otherwise ignored.
    pub fn persist(&self, snapshot: &Snapshot) {
        if let Err(e) = self.activity_cache.write(&snapshot.activities) {
            tracing::warn!(error = %e, "Failed to write activity cache");
        }
        if let Err(e) = self.gear_cache.write(&snapshot.gear) {
            tracing::warn!(error = %e, "Failed to write gear cache");
        }
    }

    /// Cached snapshot, or an empty one on a forced refresh. Unreadable or
    /// corrupt cache files count as empty.
    fn load_cache(&self) -> Snapshot {
        if self.force_refresh {
            return Snapshot::default();
        }
        let mut activities: Vec<Activity> = read_or_empty(&self.activity_cache);
        // Hand-edited caches may be out of order
        activities.sort_by_key(|a| a.start_date);
        let gear: GearMap = read_or_empty(&self.gear_cache);
        Snapshot { activities, gear }
    }
}

fn read_or_empty<T: DeserializeOwned + Default>(cache: &JsonCache) -> T {
    match cache.read() {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unusable cache");
            T::default()
        }
    }
}

fn describe(watermark: Watermark) -> String {
    if watermark.is_zero() {
        "beginning".to_string()
    } else {
        format_utc_rfc3339(watermark.as_datetime())
    }
}
