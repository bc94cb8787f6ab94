// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Concurrent fetching of a page-numbered collection of unknown length.
//!
//! Pipeline:
//! 1. A producer task emits page numbers 1, 2, 3, … until told to stop.
//! 2. A pool of workers pulls page numbers and fetches them in parallel.
//!    The first short page (fewer than `per_page` records) marks the end of
//!    the collection and stops the producer; workers finish their in-flight
//!    request and exit.
//! 3. The reducer collects pages as they arrive and, once every worker has
//!    exited, orders the union by timestamp.
//!
//! Any failed page fails the whole fetch and discards what was collected.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::merge::Watermark;
use crate::config::MAX_PER_PAGE;
use crate::error::{ApiError, FetchError};
use crate::models::Timestamped;

/// A page-numbered collection endpoint.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync + 'static {
    type Record: Timestamped + Send + 'static;

    /// Fetch page `page` (1-based) of records newer than `watermark`.
    async fn fetch_page(
        &self,
        watermark: Watermark,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Self::Record>, ApiError>;
}

/// Worker-pool pager.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    concurrency: usize,
    per_page: u32,
}

impl PageFetcher {
    pub fn new(concurrency: usize, per_page: u32) -> Self {
        Self {
            concurrency: concurrency.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Number of workers used for a fetch from `watermark`.
    ///
    /// A full fetch uses the whole pool; overshooting the last page by a few
    /// requests is bounded. An incremental fetch expects only a page or two,
    /// so pages are fetched serially to spare the rate limit.
    pub fn worker_count(&self, watermark: Watermark) -> usize {
        if watermark.is_zero() {
            self.concurrency
        } else {
            1
        }
    }

    /// Fetch every page after `watermark`, ordered by timestamp ascending.
    pub async fn fetch<S: PageSource>(
        &self,
        source: Arc<S>,
        watermark: Watermark,
    ) -> Result<Vec<S::Record>, FetchError> {
        let workers = self.worker_count(watermark);
        tracing::info!(
            after = watermark.epoch(),
            workers,
            per_page = self.per_page,
            "Fetching pages"
        );

        let stop = CancellationToken::new();

        // Producer
        let (page_tx, page_rx) = mpsc::channel::<u32>(1);
        let producer = tokio::spawn(produce_pages(page_tx, stop.clone()));
        let page_rx = Arc::new(Mutex::new(page_rx));

        // Workers
        let (result_tx, mut result_rx) = mpsc::channel::<(u32, Vec<S::Record>)>(workers);
        let mut pool = JoinSet::new();
        for _ in 0..workers {
            pool.spawn(run_worker(
                source.clone(),
                watermark,
                self.per_page,
                page_rx.clone(),
                result_tx.clone(),
                stop.clone(),
            ));
        }
        // Only workers hold senders now, so the reducer ends when they all exit
        drop(result_tx);

        // Reducer
        let mut pages: BTreeMap<u32, Vec<S::Record>> = BTreeMap::new();
        while let Some((page, records)) = result_rx.recv().await {
            pages.insert(page, records);
        }

        let mut first_error: Option<FetchError> = None;
        while let Some(joined) = pool.join_next().await {
            let err = match joined {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e,
                Err(e) => FetchError::Worker(e.to_string()),
            };
            first_error = Some(match first_error.take() {
                Some(prev) if page_of(&prev) <= page_of(&err) => prev,
                _ => err,
            });
        }

        stop.cancel();
        if let Err(e) = producer.await {
            tracing::warn!(error = %e, "Page producer task failed");
        }

        if let Some(err) = first_error {
            tracing::error!(error = %err, discarded_pages = pages.len(), "Page fetch failed");
            return Err(err);
        }

        let mut records: Vec<S::Record> = pages.into_values().flatten().collect();
        records.sort_by_key(|r| r.timestamp());
        tracing::info!(count = records.len(), "Fetched records");
        Ok(records)
    }
}

/// Emit page numbers on demand until `stop` fires or every worker is gone.
async fn produce_pages(tx: mpsc::Sender<u32>, stop: CancellationToken) {
    let mut page = 1u32;
    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            sent = tx.send(page) => {
                if sent.is_err() {
                    break;
                }
                page += 1;
            }
        }
    }
}

async fn run_worker<S: PageSource>(
    source: Arc<S>,
    watermark: Watermark,
    per_page: u32,
    pages: Arc<Mutex<mpsc::Receiver<u32>>>,
    results: mpsc::Sender<(u32, Vec<S::Record>)>,
    stop: CancellationToken,
) -> Result<(), FetchError> {
    loop {
        let next = {
            let mut rx = pages.lock().await;
            tokio::select! {
                biased;
                _ = stop.cancelled() => None,
                page = rx.recv() => page,
            }
        };
        // A page number may already be queued when the stop fires
        let page = match next {
            Some(page) if !stop.is_cancelled() => page,
            _ => return Ok(()),
        };

        tracing::debug!(page, "Fetching page");
        let records = match source.fetch_page(watermark, page, per_page).await {
            Ok(records) => records,
            Err(e) => {
                stop.cancel();
                return Err(FetchError::Page { page, source: e });
            }
        };

        let short = records.len() < per_page as usize;
        if results.send((page, records)).await.is_err() {
            return Ok(());
        }
        if short {
            tracing::debug!(page, "Short page, end of collection");
            stop.cancel();
            return Ok(());
        }
    }
}

fn page_of(err: &FetchError) -> u32 {
    match err {
        FetchError::Page { page, .. } => *page,
        _ => u32::MAX,
    }
}
