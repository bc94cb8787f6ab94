// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bounded-concurrency fetch of individually addressed resources.

use futures_util::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ApiError, FetchError};

/// An endpoint serving one resource per id.
#[async_trait::async_trait]
pub trait ResourceSource: Send + Sync + 'static {
    type Resource: Send + 'static;

    async fn fetch_resource(&self, id: &str) -> Result<Self::Resource, ApiError>;
}

/// Fetches a set of resources, each exactly once, all-or-nothing.
#[derive(Debug, Clone)]
pub struct BatchFetcher {
    concurrency: usize,
}

impl BatchFetcher {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Fetch every id in `ids`; callers pass already-deduplicated ids.
    ///
    /// The first failure aborts the batch and nothing is returned.
    pub async fn fetch_many<S: ResourceSource>(
        &self,
        source: Arc<S>,
        ids: &[String],
    ) -> Result<HashMap<String, S::Resource>, FetchError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let workers = self.concurrency.min(ids.len());
        tracing::info!(count = ids.len(), workers, "Fetching resources");

        stream::iter(ids.iter().cloned())
            .map(|id| {
                let source = source.clone();
                async move {
                    tracing::debug!(id = %id, "Fetching resource");
                    match source.fetch_resource(&id).await {
                        Ok(resource) => Ok((id, resource)),
                        Err(e) => Err(FetchError::Resource { id, source: e }),
                    }
                }
            })
            .buffer_unordered(workers)
            .try_collect()
            .await
    }
}
